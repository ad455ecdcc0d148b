use serde::{Deserialize, Serialize};

pub mod parameters;
pub mod segment_text;

pub use parameters::{evaluate_length, ParameterError, ParameterResult, ParameterTable};
pub use segment_text::{
    format_number, format_segment, parse_profile, parse_segment, ProfileTextError,
    SegmentTextError,
};

/// 2D-точка в плоскости профиля токарной детали (X — радиус, Z — ось)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub z: f64,
}

impl Point2D {
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Евклидово расстояние до другой точки
    pub fn distance(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.z - other.z)
    }
}

/// Тип элемента профиля
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Line,
    Arc,
}

impl SegmentKind {
    /// Метка для логов и пар элементов ("LINE", "ARC")
    pub fn label(&self) -> &'static str {
        match self {
            SegmentKind::Line => "LINE",
            SegmentKind::Arc => "ARC",
        }
    }
}

/// Элемент профиля в мировых координатах
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Line {
        a: Point2D,
        b: Point2D,
    },
    /// Дуга: `a`, `b` — концы, `m` — точка на нужной ветви,
    /// `c` — центр (главный источник истины), `ccw` — сохранённое направление
    Arc {
        a: Point2D,
        b: Point2D,
        m: Point2D,
        c: Point2D,
        ccw: bool,
    },
}

impl Segment {
    pub fn line(a: Point2D, b: Point2D) -> Self {
        Segment::Line { a, b }
    }

    pub fn arc(a: Point2D, m: Point2D, b: Point2D, c: Point2D, ccw: bool) -> Self {
        Segment::Arc { a, b, m, c, ccw }
    }

    pub fn kind(&self) -> SegmentKind {
        match self {
            Segment::Line { .. } => SegmentKind::Line,
            Segment::Arc { .. } => SegmentKind::Arc,
        }
    }

    /// Начальная точка (как сохранена)
    pub fn start(&self) -> Point2D {
        match self {
            Segment::Line { a, .. } | Segment::Arc { a, .. } => *a,
        }
    }

    /// Конечная точка (как сохранена)
    pub fn end(&self) -> Point2D {
        match self {
            Segment::Line { b, .. } | Segment::Arc { b, .. } => *b,
        }
    }

    pub fn endpoint(&self, end: PickedEnd) -> Point2D {
        match end {
            PickedEnd::Start => self.start(),
            PickedEnd::End => self.end(),
        }
    }

    /// Радиус дуги, измеренный от центра до начальной точки
    pub fn radius(&self) -> Option<f64> {
        match self {
            Segment::Line { .. } => None,
            Segment::Arc { a, c, .. } => Some(a.distance(c)),
        }
    }

    pub fn length(&self) -> Option<f64> {
        match self {
            Segment::Line { a, b } => Some(a.distance(b)),
            Segment::Arc { .. } => None,
        }
    }
}

/// Какой конец элемента выбрал пользователь
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickedEnd {
    #[default]
    Start,
    End,
}

impl PickedEnd {
    pub fn opposite(self) -> Self {
        match self {
            PickedEnd::Start => PickedEnd::End,
            PickedEnd::End => PickedEnd::Start,
        }
    }
}

/// Выбор элемента пользователем: элемент, сторона и точка клика
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    /// Индекс элемента в списке профиля хоста
    pub index: usize,
    pub segment: Segment,
    #[serde(default)]
    pub picked_end: PickedEnd,
    pub picked_point: Point2D,
}

impl Pick {
    pub fn new(index: usize, segment: Segment, picked_end: PickedEnd, picked_point: Point2D) -> Self {
        Self {
            index,
            segment,
            picked_end,
            picked_point,
        }
    }
}
