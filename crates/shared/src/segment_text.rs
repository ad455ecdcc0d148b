//! Текстовый формат элементов профиля
//!
//! ```text
//! LINE     x1 z1  x2 z2
//! ARC3_CW  xs zs  xm zm  xe ze  cx cz
//! ARC3_CCW xs zs  xm zm  xe ze  cx cz  [vsx vsz  vex vez]
//! ```
//!
//! Числа разделяются пробелами, десятичный разделитель — только точка.

use thiserror::Error;

use crate::{Point2D, Segment};

pub const LINE_KEYWORD: &str = "LINE";
pub const ARC_CW_KEYWORD: &str = "ARC3_CW";
pub const ARC_CCW_KEYWORD: &str = "ARC3_CCW";

/// Ошибки разбора одной записи
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SegmentTextError {
    #[error("empty segment record")]
    Empty,
    #[error("unknown segment keyword '{0}'")]
    UnknownKeyword(String),
    #[error("{keyword} expects {expected} numbers, got {found}")]
    WrongArity {
        keyword: &'static str,
        expected: &'static str,
        found: usize,
    },
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}

/// Ошибка разбора многострочного профиля с номером строки
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {source}")]
pub struct ProfileTextError {
    pub line: usize,
    #[source]
    pub source: SegmentTextError,
}

fn parse_number(token: &str) -> Result<f64, SegmentTextError> {
    // "2,5" — не число в инвариантной культуре
    if token.contains(',') {
        return Err(SegmentTextError::InvalidNumber(token.to_string()));
    }
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(SegmentTextError::InvalidNumber(token.to_string())),
    }
}

fn point_at(values: &[f64], pair: usize) -> Point2D {
    Point2D::new(values[pair * 2], values[pair * 2 + 1])
}

/// Разобрать одну запись `LINE` / `ARC3_CW` / `ARC3_CCW`
pub fn parse_segment(text: &str) -> Result<Segment, SegmentTextError> {
    let mut tokens = text.split_whitespace();
    let keyword = tokens.next().ok_or(SegmentTextError::Empty)?;
    let values = tokens.map(parse_number).collect::<Result<Vec<f64>, _>>()?;

    if keyword.eq_ignore_ascii_case(LINE_KEYWORD) {
        if values.len() != 4 {
            return Err(SegmentTextError::WrongArity {
                keyword: LINE_KEYWORD,
                expected: "4",
                found: values.len(),
            });
        }
        return Ok(Segment::line(point_at(&values, 0), point_at(&values, 1)));
    }

    let (keyword, ccw) = if keyword.eq_ignore_ascii_case(ARC_CCW_KEYWORD) {
        (ARC_CCW_KEYWORD, true)
    } else if keyword.eq_ignore_ascii_case(ARC_CW_KEYWORD) {
        (ARC_CW_KEYWORD, false)
    } else {
        return Err(SegmentTextError::UnknownKeyword(keyword.to_string()));
    };

    // 8 чисел — обычная дуга, 12 — запись скругления с векторами к центру
    if values.len() != 8 && values.len() != 12 {
        return Err(SegmentTextError::WrongArity {
            keyword,
            expected: "8 or 12",
            found: values.len(),
        });
    }

    Ok(Segment::arc(
        point_at(&values, 0),
        point_at(&values, 1),
        point_at(&values, 2),
        point_at(&values, 3),
        ccw,
    ))
}

/// Разобрать профиль построчно. Пустые строки и комментарии (`;`, `#`) пропускаются.
pub fn parse_profile(text: &str) -> Result<Vec<Segment>, ProfileTextError> {
    let mut segments = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        let segment = parse_segment(line).map_err(|source| ProfileTextError { line: i + 1, source })?;
        segments.push(segment);
    }
    Ok(segments)
}

/// Число в инвариантном виде (кратчайшее точное представление, без "-0")
pub fn format_number(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value}")
}

pub fn format_point(p: Point2D) -> String {
    format!("{} {}", format_number(p.x), format_number(p.z))
}

pub fn format_line(a: Point2D, b: Point2D) -> String {
    format!("{LINE_KEYWORD} {} {}", format_point(a), format_point(b))
}

/// Запись дуги по трём точкам и центру
pub fn format_arc3(ccw: bool, start: Point2D, mid: Point2D, end: Point2D, center: Point2D) -> String {
    let keyword = if ccw { ARC_CCW_KEYWORD } else { ARC_CW_KEYWORD };
    format!(
        "{keyword} {} {} {} {}",
        format_point(start),
        format_point(mid),
        format_point(end),
        format_point(center)
    )
}

pub fn format_segment(segment: &Segment) -> String {
    match segment {
        Segment::Line { a, b } => format_line(*a, *b),
        Segment::Arc { a, b, m, c, ccw } => format_arc3(*ccw, *a, *m, *b, *c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let seg = parse_segment("LINE 0 0   10 -2.5").unwrap();
        assert_eq!(seg, Segment::line(Point2D::new(0.0, 0.0), Point2D::new(10.0, -2.5)));
    }

    #[test]
    fn test_parse_fillet_record_ignores_vectors() {
        let seg = parse_segment("ARC3_CCW 8 0 8.6 1.4 10 2 8 2 0 2 -2 0").unwrap();
        match seg {
            Segment::Arc { a, m, b, c, ccw } => {
                assert!(ccw);
                assert_eq!(a, Point2D::new(8.0, 0.0));
                assert_eq!(m, Point2D::new(8.6, 1.4));
                assert_eq!(b, Point2D::new(10.0, 2.0));
                assert_eq!(c, Point2D::new(8.0, 2.0));
            }
            _ => panic!("Expected arc"),
        }
    }

    #[test]
    fn test_parse_rejects_comma_decimal() {
        let err = parse_segment("LINE 0 0 2,5 1").unwrap_err();
        assert_eq!(err, SegmentTextError::InvalidNumber("2,5".to_string()));
    }

    #[test]
    fn test_parse_wrong_arity() {
        assert!(matches!(
            parse_segment("ARC3_CW 1 2 3 4"),
            Err(SegmentTextError::WrongArity { found: 4, .. })
        ));
        assert!(matches!(parse_segment("   "), Err(SegmentTextError::Empty)));
        assert!(matches!(parse_segment("CIRCLE 0 0 1"), Err(SegmentTextError::UnknownKeyword(_))));
    }

    #[test]
    fn test_format_folds_negative_zero() {
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_line(Point2D::new(-0.0, 1.0), Point2D::new(3.0, 0.1)), "LINE 0 1 3 0.1");
    }

    #[test]
    fn test_format_is_exact() {
        let v = 1.0 / 3.0;
        let text = format_segment(&Segment::line(Point2D::new(v, 0.0), Point2D::new(1.0, v)));
        let back = parse_segment(&text).unwrap();
        assert_eq!(back.start().x, v);
        assert_eq!(back.end().z, v);
    }

    #[test]
    fn test_parse_profile_reports_line() {
        let text = "; contour\nLINE 0 0 0 10\n\nLINE 0 10 x 10\n";
        let err = parse_profile(text).unwrap_err();
        assert_eq!(err.line, 4);

        let ok = parse_profile("LINE 0 0 0 10\n# comment\nARC3_CW 0 10 1 11 2 10 1 10").unwrap();
        assert_eq!(ok.len(), 2);
    }
}
