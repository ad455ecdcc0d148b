//! Types and result structures for fillet and trim construction

use kurbo::Point;
use serde::Serialize;
use shared::SegmentKind;

/// Kind of element pair a fillet is built between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PairKind {
    LineLine,
    LineArc,
    ArcArc,
}

impl PairKind {
    /// Arc-Line picks are handled as Line-Arc; the tangent functions stay bound to their picks.
    pub fn from_kinds(a: SegmentKind, b: SegmentKind) -> Self {
        match (a, b) {
            (SegmentKind::Line, SegmentKind::Line) => PairKind::LineLine,
            (SegmentKind::Arc, SegmentKind::Arc) => PairKind::ArcArc,
            _ => PairKind::LineArc,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PairKind::LineLine => "LINE-LINE",
            PairKind::LineArc => "LINE-ARC",
            PairKind::ArcArc => "ARC-ARC",
        }
    }
}

/// One fillet arc candidate
#[derive(Debug, Clone, PartialEq)]
pub struct FilletArcData {
    /// Fillet circle center
    pub cp: Point,
    pub r: f64,
    /// Tangent point on the first picked element
    pub tan1: Point,
    /// Tangent point on the second picked element
    pub tan2: Point,
    /// Middle of the sweep starting at `tan1`
    pub mid_short: Point,
    pub start_angle_cw_from_z: f64,
    /// Sweep from `tan1`; positive runs clockwise
    pub short_sweep_signed: f64,
    /// Companion of a half-turn candidate covering the other semicircle
    pub is_180_complement: bool,
}

/// Sweep class of a trimmed arc branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SweepClass {
    Short,
    Long,
    HalfTurn,
}

impl SweepClass {
    pub fn label(&self) -> &'static str {
        match self {
            SweepClass::Short => "Short",
            SweepClass::Long => "Long",
            SweepClass::HalfTurn => "180°",
        }
    }
}

/// How a trim option changes the picked element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrimOutcomeKind {
    /// Line cut at an interior point, one side kept
    Split,
    /// Line endpoint moved outward along its ray
    Extend,
    /// Arc rebuilt between an endpoint and the intersection
    ArcBranch(SweepClass),
}

/// One trim candidate
#[derive(Debug, Clone, PartialEq)]
pub struct TrimOption {
    pub label: String,
    pub kind: TrimOutcomeKind,
    pub intersection_point: Point,
    pub replacement_text: String,
    pub preview_polyline: Vec<Point>,
    /// Start of the replacement element
    pub endpoint_a: Point,
    /// End of the replacement element
    pub endpoint_b: Point,
}
