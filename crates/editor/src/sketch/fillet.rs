//! Fillet construction between two profile elements
//!
//! Fillet circle centers come from intersecting offset curves: each line is
//! shifted by ±r along its normal, each arc circle grows or shrinks by r.
//! Elements are treated as infinite lines and full circles.

use kurbo::Point;
use shared::segment_text::{format_number, format_point, ARC_CCW_KEYWORD};
use shared::{Pick, Segment};

use super::arc_law::{build_fillet_arcs, ArcLawReport};
use super::geometry::{
    add_unique_point, dist, intersect_circle_circle, intersect_infinite_lines,
    intersect_line_circle_infinite, left_normal, project_onto_circle, project_onto_line,
    to_point, MIN_RADIUS, POINT_TOL,
};
use super::types::{FilletArcData, PairKind};
use crate::error::ToolError;

const SIGNS: [f64; 2] = [-1.0, 1.0];

/// Allowed difference between |C-A| and |C-B| on a picked arc
const ARC_RADIUS_TOL: f64 = 1e-6;

/// A picked element reduced to what fillet construction needs
#[derive(Debug, Clone, Copy)]
pub(super) enum Primitive {
    Line { a: Point, b: Point },
    Circle { center: Point, radius: f64 },
}

impl Primitive {
    pub(super) fn from_segment(segment: &Segment) -> Result<Self, ToolError> {
        match segment {
            Segment::Line { a, b } => {
                let (a, b) = (to_point(*a), to_point(*b));
                if dist(a, b) < MIN_RADIUS {
                    return Err(ToolError::InvalidSelection("zero-length line".into()));
                }
                Ok(Primitive::Line { a, b })
            }
            Segment::Arc { a, b, c, .. } => {
                let center = to_point(*c);
                let radius = dist(center, to_point(*a));
                if radius <= MIN_RADIUS {
                    return Err(ToolError::InvalidSelection("degenerate arc".into()));
                }
                if (dist(center, to_point(*b)) - radius).abs() > ARC_RADIUS_TOL {
                    return Err(ToolError::InvalidSelection("arc endpoints not on one circle".into()));
                }
                Ok(Primitive::Circle { center, radius })
            }
        }
    }

    /// Touching point of a fillet circle centered at `cp`
    fn tangent_point(&self, cp: Point) -> Option<Point> {
        match *self {
            Primitive::Line { a, b } => project_onto_line(cp, a, b),
            Primitive::Circle { center, radius } => project_onto_circle(cp, center, radius),
        }
    }
}

/// Reject missing, identical or degenerate picks
pub fn validate_picks(pick_a: Option<&Pick>, pick_b: Option<&Pick>) -> Result<(Pick, Pick), ToolError> {
    let (a, b) = match (pick_a, pick_b) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(ToolError::InvalidSelection("two elements must be picked".into())),
    };
    if a.index == b.index {
        return Err(ToolError::InvalidSelection("the same element was picked twice".into()));
    }
    Primitive::from_segment(&a.segment)?;
    Primitive::from_segment(&b.segment)?;
    Ok((a.clone(), b.clone()))
}

// ============================================================================
// Center builders
// ============================================================================

/// Line-Line: the four offset-line intersections
fn line_line_centers(a1: Point, a2: Point, b1: Point, b2: Point, r: f64) -> Vec<Point> {
    let mut centers = Vec::new();
    let (Some(n1), Some(n2)) = (left_normal(a1, a2), left_normal(b1, b2)) else {
        return centers;
    };
    for s1 in SIGNS {
        let o1 = n1 * (s1 * r);
        for s2 in SIGNS {
            let o2 = n2 * (s2 * r);
            if let Some(p) = intersect_infinite_lines(a1 + o1, a2 + o1, b1 + o2, b2 + o2) {
                add_unique_point(&mut centers, p, POINT_TOL);
            }
        }
    }
    centers
}

/// Line-Arc: offset lines against grown/shrunk circles, up to eight centers
fn line_arc_centers(a: Point, b: Point, center: Point, arc_r: f64, r: f64) -> Vec<Point> {
    let mut centers = Vec::new();
    let Some(n) = left_normal(a, b) else {
        return centers;
    };
    for s_line in SIGNS {
        let o = n * (s_line * r);
        for s_arc in SIGNS {
            let ro = arc_r + s_arc * r;
            if ro <= MIN_RADIUS {
                continue;
            }
            for p in intersect_line_circle_infinite(a + o, b + o, center, ro) {
                add_unique_point(&mut centers, p, POINT_TOL);
            }
        }
    }
    centers
}

/// Arc-Arc: grown/shrunk circle pairs, up to eight centers
fn arc_arc_centers(c1: Point, r1: f64, c2: Point, r2: f64, r: f64) -> Vec<Point> {
    let mut centers = Vec::new();
    for s1 in SIGNS {
        let ro1 = r1 + s1 * r;
        if ro1 <= MIN_RADIUS {
            continue;
        }
        for s2 in SIGNS {
            let ro2 = r2 + s2 * r;
            if ro2 <= MIN_RADIUS {
                continue;
            }
            for p in intersect_circle_circle(c1, ro1, c2, ro2) {
                add_unique_point(&mut centers, p, POINT_TOL);
            }
        }
    }
    centers
}

fn centers_for(first: Primitive, second: Primitive, r: f64) -> Vec<Point> {
    match (first, second) {
        (Primitive::Line { a: a1, b: a2 }, Primitive::Line { a: b1, b: b2 }) => {
            line_line_centers(a1, a2, b1, b2, r)
        }
        (Primitive::Line { a, b }, Primitive::Circle { center, radius })
        | (Primitive::Circle { center, radius }, Primitive::Line { a, b }) => {
            line_arc_centers(a, b, center, radius, r)
        }
        (Primitive::Circle { center: c1, radius: r1 }, Primitive::Circle { center: c2, radius: r2 }) => {
            arc_arc_centers(c1, r1, c2, r2, r)
        }
    }
}

/// Deduplicated fillet circle centers for two elements
pub fn fillet_centers(a: &Segment, b: &Segment, r: f64) -> Result<Vec<Point>, ToolError> {
    let first = Primitive::from_segment(a)?;
    let second = Primitive::from_segment(b)?;
    Ok(centers_for(first, second, r))
}

/// Compute the classified fillet candidates for two validated picks.
///
/// Fails with `NoCandidates` when no center survives, leaving the caller to
/// decide whether to keep its session open.
pub fn build_fillet_candidates(pick_a: &Pick, pick_b: &Pick, r: f64) -> Result<ArcLawReport, ToolError> {
    if !r.is_finite() || r <= MIN_RADIUS {
        return Err(ToolError::DegenerateRadius(format!("{r} is not a positive radius")));
    }
    let first = Primitive::from_segment(&pick_a.segment)?;
    let second = Primitive::from_segment(&pick_b.segment)?;
    let pair = PairKind::from_kinds(pick_a.segment.kind(), pick_b.segment.kind());

    let centers = centers_for(first, second, r);
    tracing::debug!("fillet {}: r={} -> {} centers", pair.label(), r, centers.len());
    if centers.is_empty() {
        return Err(ToolError::NoCandidates);
    }

    let report = build_fillet_arcs(
        pair,
        r,
        &centers,
        |cp, _| first.tangent_point(cp),
        |cp, _| second.tangent_point(cp),
    );
    if report.candidates.is_empty() {
        return Err(ToolError::NoCandidates);
    }
    Ok(report)
}

/// Stable order: candidates whose tangent points sit closest to the picks first
pub fn sort_by_pick_distance(candidates: &mut [FilletArcData], pick_a: &Pick, pick_b: &Pick) {
    let pa = to_point(pick_a.picked_point);
    let pb = to_point(pick_b.picked_point);
    candidates.sort_by(|x, y| {
        let dx = dist(x.tan1, pa) + dist(x.tan2, pb);
        let dy = dist(y.tan1, pa) + dist(y.tan2, pb);
        dx.total_cmp(&dy)
    });
}

/// Start and end of the counter-clockwise traversal of a candidate
pub fn ccw_endpoints(d: &FilletArcData) -> (Point, Point) {
    // A positive sweep runs clockwise from tan1, so CCW goes tan2 -> tan1
    if d.short_sweep_signed > 0.0 {
        (d.tan2, d.tan1)
    } else {
        (d.tan1, d.tan2)
    }
}

/// Profile record for a fillet candidate:
/// `ARC3_CCW start mid end center (center-start) (center-end)`
pub fn fillet_arc_text(d: &FilletArcData) -> String {
    let (start, end) = ccw_endpoints(d);
    let c = d.cp;
    let p = |pt: Point| format_point(shared::Point2D::new(pt.x, pt.y));
    format!(
        "{ARC_CCW_KEYWORD} {} {} {} {} {} {} {} {}",
        p(start),
        p(d.mid_short),
        p(end),
        p(c),
        format_number(c.x - start.x),
        format_number(c.y - start.y),
        format_number(c.x - end.x),
        format_number(c.y - end.y)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{arc_ccw, line, pick};
    use shared::{parse_segment, PickedEnd};

    #[test]
    fn test_line_line_centers_corner() {
        let a = line(0.0, 0.0, 10.0, 0.0);
        let b = line(10.0, 0.0, 10.0, 10.0);
        let centers = fillet_centers(&a, &b, 2.0).unwrap();
        assert_eq!(centers.len(), 4);
        for expected in [(8.0, 2.0), (12.0, 2.0), (8.0, -2.0), (12.0, -2.0)] {
            let e = Point::new(expected.0, expected.1);
            assert!(centers.iter().any(|c| dist(*c, e) < 1e-9), "missing {expected:?}");
        }
    }

    #[test]
    fn test_parallel_lines_have_no_centers() {
        let a = line(0.0, 0.0, 10.0, 0.0);
        let b = line(0.0, 5.0, 10.0, 5.0);
        assert!(fillet_centers(&a, &b, 1.0).unwrap().is_empty());
    }

    #[test]
    fn test_arc_arc_centers_touch_both_circles() {
        let a = arc_ccw((5.0, 0.0), (0.0, 5.0), (-5.0, 0.0), (0.0, 0.0));
        let b = arc_ccw((14.0, 0.0), (10.0, 4.0), (6.0, 0.0), (10.0, 0.0));
        let centers = fillet_centers(&a, &b, 1.0).unwrap();
        assert!(!centers.is_empty());
        assert!(centers.len() <= 8);
        for c in &centers {
            let d1 = dist(*c, Point::new(0.0, 0.0));
            let d2 = dist(*c, Point::new(10.0, 0.0));
            assert!((d1 - 4.0).abs() < 1e-9 || (d1 - 6.0).abs() < 1e-9);
            assert!((d2 - 3.0).abs() < 1e-9 || (d2 - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_shrunk_offset_below_zero_skipped() {
        // r larger than the arc radius: only grown circles remain
        let l = line(0.0, -10.0, 0.0, 10.0);
        let a = arc_ccw((2.0, 0.0), (1.0, 1.0), (0.0, 0.0), (1.0, 0.0));
        let centers = fillet_centers(&l, &a, 3.0).unwrap();
        for c in &centers {
            assert!((dist(*c, Point::new(1.0, 0.0)) - 4.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_degenerate_inputs_rejected() {
        let zero = line(1.0, 1.0, 1.0, 1.0);
        let ok = line(0.0, 0.0, 1.0, 0.0);
        assert!(matches!(fillet_centers(&zero, &ok, 1.0), Err(ToolError::InvalidSelection(_))));

        let pa = pick(0, ok.clone(), PickedEnd::End, (1.0, 0.0));
        let pb = pick(0, line(1.0, 0.0, 1.0, 5.0), PickedEnd::Start, (1.0, 0.0));
        assert!(matches!(validate_picks(Some(&pa), Some(&pb)), Err(ToolError::InvalidSelection(_))));
        assert!(matches!(validate_picks(Some(&pa), None), Err(ToolError::InvalidSelection(_))));
    }

    #[test]
    fn test_arc_with_end_off_circle_rejected() {
        let bad = arc_ccw((5.0, 0.0), (3.6, 3.6), (0.0, 5.1), (0.0, 0.0));
        let err = Primitive::from_segment(&bad).unwrap_err();
        assert_eq!(err, ToolError::InvalidSelection("arc endpoints not on one circle".into()));

        let pa = pick(0, bad, PickedEnd::End, (0.0, 5.1));
        let pb = pick(1, line(-5.0, -1.0, -5.0, 1.0), PickedEnd::Start, (-5.0, 0.0));
        assert!(matches!(validate_picks(Some(&pa), Some(&pb)), Err(ToolError::InvalidSelection(_))));
    }

    #[test]
    fn test_fillet_text_is_ccw_and_parses() {
        let pa = pick(0, line(0.0, 0.0, 10.0, 0.0), PickedEnd::End, (9.0, 0.0));
        let pb = pick(1, line(10.0, 0.0, 10.0, 10.0), PickedEnd::Start, (10.0, 1.0));
        let report = build_fillet_candidates(&pa, &pb, 2.0).unwrap();
        let d = report
            .candidates
            .iter()
            .find(|d| dist(d.cp, Point::new(8.0, 2.0)) < 1e-9)
            .unwrap();

        let text = fillet_arc_text(d);
        assert!(text.starts_with("ARC3_CCW 8 0 "), "{text}");
        assert!(text.ends_with(" 10 2 8 2 0 2 -2 0"), "{text}");
        match parse_segment(&text).unwrap() {
            Segment::Arc { a, b, c, ccw, .. } => {
                assert!(ccw);
                assert_eq!((a.x, a.z), (8.0, 0.0));
                assert_eq!((b.x, b.z), (10.0, 2.0));
                assert_eq!((c.x, c.z), (8.0, 2.0));
            }
            _ => panic!("Expected arc"),
        }
    }
}
