//! Geometry kernel: distances, angles and infinite-primitive intersections using kurbo.
//!
//! Points are kurbo `Point`s with `x` = X (radius) and `y` = Z (axial).
//! "Math" angles are `atan2(dZ, dX)`; CCW means increasing math angle.
//! "CW from Z" angles start at +Z and turn toward +X: direction `(sin θ, cos θ)`.

use kurbo::{Point, Vec2};
use shared::Point2D;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Point / center identity tolerance for human-scale dedup.
pub const POINT_TOL: f64 = 1e-6;
/// Below this a determinant, discriminant or distance counts as zero.
pub const DEGENERACY_EPS: f64 = 1e-12;
/// Minimum usable radius or element length.
pub const MIN_RADIUS: f64 = 1e-9;

// ============================================================================
// Conversions
// ============================================================================

pub fn to_point(p: Point2D) -> Point {
    Point::new(p.x, p.z)
}

pub fn to_point2d(p: Point) -> Point2D {
    Point2D::new(p.x, p.y)
}

// ============================================================================
// Distances and angles
// ============================================================================

pub fn dist(a: Point, b: Point) -> f64 {
    (b - a).hypot()
}

pub fn dist2(a: Point, b: Point) -> f64 {
    (b - a).hypot2()
}

/// Normalize angle to [0, TAU)
pub fn norm_2pi(angle: f64) -> f64 {
    let mut a = angle % TAU;
    if a < 0.0 {
        a += TAU;
    }
    // -1e-17 + TAU rounds to TAU
    if a >= TAU {
        a -= TAU;
    }
    a
}

/// Angle travelled counter-clockwise from `from` to `to`, in [0, TAU)
pub fn delta_ccw(from: f64, to: f64) -> f64 {
    norm_2pi(to - from)
}

/// Angle travelled clockwise from `from` to `to`, in [0, TAU)
pub fn delta_cw(from: f64, to: f64) -> f64 {
    norm_2pi(from - to)
}

/// Math angle of `p` seen from `center`
pub fn math_angle(center: Point, p: Point) -> f64 {
    (p.y - center.y).atan2(p.x - center.x)
}

/// Convert a math angle into the CW-from-Z convention
pub fn cw_from_z(math_angle: f64) -> f64 {
    norm_2pi(FRAC_PI_2 - math_angle)
}

pub fn point_at_cw_from_z(center: Point, r: f64, theta: f64) -> Point {
    Point::new(center.x + r * theta.sin(), center.y + r * theta.cos())
}

pub fn point_at_math_angle(center: Point, r: f64, angle: f64) -> Point {
    Point::new(center.x + r * angle.cos(), center.y + r * angle.sin())
}

/// Unit left normal of the direction a -> b (None for a zero-length line)
pub fn left_normal(a: Point, b: Point) -> Option<Vec2> {
    let d = b - a;
    let len = d.hypot();
    if len < MIN_RADIUS {
        return None;
    }
    Some(Vec2::new(-d.y / len, d.x / len))
}

/// Foot of the perpendicular from `p` onto the infinite line a-b
pub fn project_onto_line(p: Point, a: Point, b: Point) -> Option<Point> {
    let d = b - a;
    let len_sq = d.hypot2();
    if len_sq < MIN_RADIUS * MIN_RADIUS {
        return None;
    }
    let t = (p - a).dot(d) / len_sq;
    Some(a + d * t)
}

/// Radial projection of `p` onto the circle (center, r)
pub fn project_onto_circle(p: Point, center: Point, r: f64) -> Option<Point> {
    let v = p - center;
    let len = v.hypot();
    if len < DEGENERACY_EPS || r < MIN_RADIUS {
        return None;
    }
    Some(center + v * (r / len))
}

// ============================================================================
// Infinite-primitive intersections
// ============================================================================

/// Intersection of the unbounded lines p1-p2 and p3-p4
pub fn intersect_infinite_lines(p1: Point, p2: Point, p3: Point, p4: Point) -> Option<Point> {
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    let det = d1.x * d2.y - d1.y * d2.x;

    if det.abs() < DEGENERACY_EPS {
        return None;
    }

    let w = p3 - p1;
    let t = (w.x * d2.y - w.y * d2.x) / det;
    Some(p1 + d1 * t)
}

/// Unbounded line a-b against a full circle: 0, 1 (tangent) or 2 points
pub fn intersect_line_circle_infinite(a: Point, b: Point, center: Point, r: f64) -> Vec<Point> {
    let d = b - a;
    let len = d.hypot();
    if len < MIN_RADIUS {
        return Vec::new();
    }
    let u = d / len;
    let f = a - center;

    // Quarter discriminant of |f + t·u|² = r² with |u| = 1
    let half_b = f.dot(u);
    let c = f.hypot2() - r * r;
    let disc = half_b * half_b - c;

    if disc < -DEGENERACY_EPS {
        return Vec::new();
    }
    if disc <= DEGENERACY_EPS {
        return vec![a + u * -half_b];
    }

    let s = disc.sqrt();
    vec![a + u * (-half_b - s), a + u * (-half_b + s)]
}

/// Circle-circle intersection points (concentric circles are rejected)
pub fn intersect_circle_circle(c1: Point, r1: f64, c2: Point, r2: f64) -> Vec<Point> {
    let d_vec = c2 - c1;
    let d = d_vec.hypot();

    if d < DEGENERACY_EPS {
        return Vec::new(); // Concentric
    }
    if d > r1 + r2 + DEGENERACY_EPS {
        return Vec::new(); // Too far apart
    }
    if d < (r1 - r2).abs() - DEGENERACY_EPS {
        return Vec::new(); // One inside other
    }

    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h = (r1 * r1 - a * a).max(0.0).sqrt();

    let p2 = c1 + d_vec * (a / d);
    if h < DEGENERACY_EPS {
        return vec![p2];
    }
    let perp = Vec2::new(-d_vec.y / d, d_vec.x / d);

    vec![p2 + perp * h, p2 - perp * h]
}

// ============================================================================
// Dedup and sampling
// ============================================================================

/// Append `p` unless an existing point lies within `tol`. Returns true if appended.
pub fn add_unique_point(list: &mut Vec<Point>, p: Point, tol: f64) -> bool {
    if list.iter().any(|q| dist(*q, p) <= tol) {
        return false;
    }
    list.push(p);
    true
}

/// Polyline approximation of an arc for preview.
///
/// `signed_sweep` > 0 runs clockwise. The segment count is forced even so the
/// middle sample sits exactly at mid-sweep.
pub fn sample_arc_cw_from_z(
    center: Point,
    r: f64,
    start_angle: f64,
    signed_sweep: f64,
    even_sample_count: usize,
) -> Vec<Point> {
    let mut n = even_sample_count.max(2);
    if n % 2 == 1 {
        n += 1;
    }
    (0..=n)
        .map(|i| {
            let theta = start_angle + signed_sweep * (i as f64 / n as f64);
            point_at_cw_from_z(center, r, theta)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn close(a: Point, b: Point) -> bool {
        dist(a, b) < 1e-9
    }

    #[test]
    fn test_dist_and_dist2() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);
        assert_eq!(dist(a, b), 5.0);
        assert_eq!(dist2(a, b), 25.0);
        assert_eq!(dist2(b, a), dist2(a, b));
    }

    #[test]
    fn test_norm_2pi_range() {
        assert!((norm_2pi(-FRAC_PI_2) - 1.5 * PI).abs() < 1e-12);
        assert_eq!(norm_2pi(TAU), 0.0);
        assert!(norm_2pi(-1e-17) < TAU);
        assert!((norm_2pi(5.0 * PI) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_deltas() {
        assert!((delta_ccw(0.0, FRAC_PI_2) - FRAC_PI_2).abs() < 1e-12);
        assert!((delta_cw(0.0, FRAC_PI_2) - 1.5 * PI).abs() < 1e-12);
        assert!((delta_cw(FRAC_PI_2, 0.0) - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_cw_from_z_convention() {
        let c = Point::new(0.0, 0.0);
        // +Z is zero, +X a quarter turn clockwise
        assert!(cw_from_z(math_angle(c, Point::new(0.0, 1.0))).abs() < 1e-12);
        assert!((cw_from_z(math_angle(c, Point::new(1.0, 0.0))) - FRAC_PI_2).abs() < 1e-12);
        assert!(close(point_at_cw_from_z(c, 2.0, FRAC_PI_2), Point::new(2.0, 0.0)));
    }

    #[test]
    fn test_infinite_lines() {
        let p = intersect_infinite_lines(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(8.0, -3.0),
            Point::new(8.0, 5.0),
        )
        .unwrap();
        assert!(close(p, Point::new(8.0, 0.0)));

        let parallel = intersect_infinite_lines(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(5.0, 1.0),
        );
        assert!(parallel.is_none());
    }

    #[test]
    fn test_line_circle_counts() {
        let c = Point::new(0.0, 0.0);
        let two = intersect_line_circle_infinite(Point::new(-10.0, 0.0), Point::new(-9.0, 0.0), c, 5.0);
        assert_eq!(two.len(), 2);
        assert!(two.iter().any(|p| close(*p, Point::new(5.0, 0.0))));
        assert!(two.iter().any(|p| close(*p, Point::new(-5.0, 0.0))));

        let tangent = intersect_line_circle_infinite(Point::new(-5.0, -1.0), Point::new(-5.0, 1.0), c, 5.0);
        assert_eq!(tangent.len(), 1);
        assert!(close(tangent[0], Point::new(-5.0, 0.0)));

        let miss = intersect_line_circle_infinite(Point::new(6.0, -1.0), Point::new(6.0, 1.0), c, 5.0);
        assert!(miss.is_empty());
    }

    #[test]
    fn test_circle_circle() {
        let ints = intersect_circle_circle(Point::new(0.0, 0.0), 1.0, Point::new(1.0, 0.0), 1.0);
        assert_eq!(ints.len(), 2);
        for p in &ints {
            assert!((dist(*p, Point::new(0.0, 0.0)) - 1.0).abs() < 1e-12);
            assert!((dist(*p, Point::new(1.0, 0.0)) - 1.0).abs() < 1e-12);
        }

        let touching = intersect_circle_circle(Point::new(0.0, 0.0), 1.0, Point::new(2.0, 0.0), 1.0);
        assert_eq!(touching.len(), 1);

        assert!(intersect_circle_circle(Point::new(0.0, 0.0), 1.0, Point::new(0.0, 0.0), 2.0).is_empty());
        assert!(intersect_circle_circle(Point::new(0.0, 0.0), 1.0, Point::new(5.0, 0.0), 1.0).is_empty());
        assert!(intersect_circle_circle(Point::new(0.0, 0.0), 5.0, Point::new(0.5, 0.0), 1.0).is_empty());
    }

    #[test]
    fn test_add_unique_point() {
        let mut pts = Vec::new();
        assert!(add_unique_point(&mut pts, Point::new(1.0, 1.0), 1e-6));
        assert!(!add_unique_point(&mut pts, Point::new(1.0 + 1e-8, 1.0), 1e-6));
        assert!(add_unique_point(&mut pts, Point::new(1.1, 1.0), 1e-6));
        assert_eq!(pts.len(), 2);
    }

    #[test]
    fn test_sample_arc_even_and_midpoint() {
        let c = Point::new(0.0, 0.0);
        let pts = sample_arc_cw_from_z(c, 1.0, 0.0, FRAC_PI_2, 5);
        assert_eq!(pts.len(), 7);
        assert!(close(pts[0], Point::new(0.0, 1.0)));
        assert!(close(pts[6], Point::new(1.0, 0.0)));
        let mid = point_at_cw_from_z(c, 1.0, PI / 4.0);
        assert!(close(pts[3], mid));
    }

    #[test]
    fn test_projections() {
        let foot = project_onto_line(Point::new(3.0, 4.0), Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
        assert!(close(foot, Point::new(3.0, 0.0)));
        assert!(project_onto_line(Point::new(3.0, 4.0), Point::new(1.0, 1.0), Point::new(1.0, 1.0)).is_none());

        let radial = project_onto_circle(Point::new(0.0, 10.0), Point::new(0.0, 0.0), 5.0).unwrap();
        assert!(close(radial, Point::new(0.0, 5.0)));
        assert!(project_onto_circle(Point::new(0.0, 0.0), Point::new(0.0, 0.0), 5.0).is_none());
    }
}
