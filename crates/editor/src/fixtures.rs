//! Factory functions for creating test data.
//!
//! Provides convenient helpers to construct `Segment`s, `Pick`s and small
//! profiles used in tests and by the command runner.

use shared::{Pick, PickedEnd, Point2D, Segment};

// ── Segment factories ───────────────────────────────────────────

/// Create a line segment.
pub fn line(x1: f64, z1: f64, x2: f64, z2: f64) -> Segment {
    Segment::line(Point2D::new(x1, z1), Point2D::new(x2, z2))
}

fn p(xz: (f64, f64)) -> Point2D {
    Point2D::new(xz.0, xz.1)
}

/// Create a counter-clockwise arc from start, mid, end and center.
pub fn arc_ccw(start: (f64, f64), mid: (f64, f64), end: (f64, f64), center: (f64, f64)) -> Segment {
    Segment::arc(p(start), p(mid), p(end), p(center), true)
}

/// Create a clockwise arc from start, mid, end and center.
pub fn arc_cw(start: (f64, f64), mid: (f64, f64), end: (f64, f64), center: (f64, f64)) -> Segment {
    Segment::arc(p(start), p(mid), p(end), p(center), false)
}

/// Create a counter-clockwise arc on a circle between two math angles (degrees).
pub fn arc_between_degrees(center: (f64, f64), r: f64, from_deg: f64, to_deg: f64) -> Segment {
    let at = |deg: f64| {
        let a = deg.to_radians();
        (center.0 + r * a.cos(), center.1 + r * a.sin())
    };
    arc_ccw(at(from_deg), at((from_deg + to_deg) / 2.0), at(to_deg), center)
}

// ── Pick factories ──────────────────────────────────────────────

/// Create a pick of `segment` stored at `index` in the host profile.
pub fn pick(index: usize, segment: Segment, end: PickedEnd, point: (f64, f64)) -> Pick {
    Pick::new(index, segment, end, p(point))
}

/// Pick a segment near one of its ends.
pub fn pick_end(index: usize, segment: Segment, end: PickedEnd) -> Pick {
    let point = segment.endpoint(end);
    Pick::new(index, segment, end, point)
}

// ── Profiles ────────────────────────────────────────────────────

/// Shoulder corner: face along X followed by a diameter along Z.
pub fn corner_profile() -> Vec<Segment> {
    vec![line(0.0, 0.0, 10.0, 0.0), line(10.0, 0.0, 10.0, 10.0)]
}

/// Profile text of the shoulder corner.
pub fn corner_profile_text() -> &'static str {
    "LINE 0 0 10 0\nLINE 10 0 10 10\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arc_between_degrees() {
        let arc = arc_between_degrees((0.0, 0.0), 5.0, 0.0, 90.0);
        assert!((arc.radius().unwrap() - 5.0).abs() < 1e-12);
        assert!((arc.end().x).abs() < 1e-12);
        assert!((arc.end().z - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_pick_end_uses_endpoint() {
        let seg = line(1.0, 2.0, 3.0, 4.0);
        let p = pick_end(2, seg, PickedEnd::End);
        assert_eq!(p.picked_point, Point2D::new(3.0, 4.0));
        assert_eq!(p.index, 2);
    }

    #[test]
    fn test_corner_profile_text_matches() {
        let parsed = shared::parse_profile(corner_profile_text()).unwrap();
        assert_eq!(parsed, corner_profile());
    }
}
