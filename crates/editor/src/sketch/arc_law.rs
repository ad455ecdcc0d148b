//! Arc law: turns raw fillet-circle centers into classified fillet arcs.
//!
//! For every center the two tangent points are taken from the picked elements,
//! the minor (at most half-turn) sweep from `tan1` to `tan2` is measured in the
//! CW-from-Z convention, and half-turn candidates get a complement covering the
//! other semicircle.

use kurbo::Point;
use std::f64::consts::{PI, TAU};
use std::fmt::Write;

use super::geometry::{cw_from_z, dist, math_angle, norm_2pi, point_at_cw_from_z, POINT_TOL};
use super::types::{FilletArcData, PairKind};

/// Two sweeps closer than this to a half turn cannot be told apart.
const HALF_TURN_TOL: f64 = 1e-7;

/// Candidates plus the plain-text diagnostic log of one build
#[derive(Debug, Clone, Default)]
pub struct ArcLawReport {
    pub candidates: Vec<FilletArcData>,
    pub log: String,
}

/// Build fillet arcs for `centers`, keeping their order.
///
/// `tangent1` / `tangent2` map a fillet circle `(center, r)` to its touching
/// point on the first / second picked element, or `None` when undefined.
pub fn build_fillet_arcs<F1, F2>(
    pair: PairKind,
    r: f64,
    centers: &[Point],
    tangent1: F1,
    tangent2: F2,
) -> ArcLawReport
where
    F1: Fn(Point, f64) -> Option<Point>,
    F2: Fn(Point, f64) -> Option<Point>,
{
    let mut report = ArcLawReport::default();
    let _ = writeln!(
        report.log,
        "ArcLaw {} r={} centers={}",
        pair.label(),
        r,
        centers.len()
    );

    for (i, &cp) in centers.iter().enumerate() {
        let (tan1, tan2) = match (tangent1(cp, r), tangent2(cp, r)) {
            (Some(t1), Some(t2)) => (t1, t2),
            _ => {
                let _ = writeln!(report.log, "  #{i} CP=({:.6}, {:.6}) rejected: no tangent point", cp.x, cp.y);
                tracing::debug!("arc law: center #{} rejected, tangent undefined", i);
                continue;
            }
        };

        let d1 = dist(cp, tan1);
        let d2 = dist(cp, tan2);
        if (d1 - r).abs() > POINT_TOL || (d2 - r).abs() > POINT_TOL {
            let _ = writeln!(
                report.log,
                "  #{i} CP=({:.6}, {:.6}) rejected: tangent distance {:.9}/{:.9}",
                cp.x, cp.y, d1, d2
            );
            continue;
        }
        if dist(tan1, tan2) < POINT_TOL {
            let _ = writeln!(report.log, "  #{i} CP=({:.6}, {:.6}) rejected: zero-length arc", cp.x, cp.y);
            continue;
        }

        let start = cw_from_z(math_angle(cp, tan1));
        let end = cw_from_z(math_angle(cp, tan2));
        let cw = norm_2pi(end - start);
        let sweep = if cw <= PI { cw } else { cw - TAU };

        let data = FilletArcData {
            cp,
            r,
            tan1,
            tan2,
            mid_short: point_at_cw_from_z(cp, r, start + sweep / 2.0),
            start_angle_cw_from_z: start,
            short_sweep_signed: sweep,
            is_180_complement: false,
        };
        log_candidate(&mut report.log, report.candidates.len(), &data);
        report.candidates.push(data);

        if (sweep.abs() - PI).abs() <= HALF_TURN_TOL {
            let other = if sweep > 0.0 { sweep - TAU } else { sweep + TAU };
            let complement = FilletArcData {
                cp,
                r,
                tan1,
                tan2,
                mid_short: point_at_cw_from_z(cp, r, start + other / 2.0),
                start_angle_cw_from_z: start,
                short_sweep_signed: other,
                is_180_complement: true,
            };
            log_candidate(&mut report.log, report.candidates.len(), &complement);
            report.candidates.push(complement);
        }
    }

    let _ = writeln!(report.log, "candidates={}", report.candidates.len());
    tracing::debug!(
        "arc law {}: {} centers -> {} candidates",
        pair.label(),
        centers.len(),
        report.candidates.len()
    );
    report
}

fn log_candidate(log: &mut String, index: usize, d: &FilletArcData) {
    let _ = writeln!(
        log,
        "  [{index}] CP=({:.6}, {:.6}) Tan1=({:.6}, {:.6}) Tan2=({:.6}, {:.6}) start={:.3}° sweep={:.3}°{}",
        d.cp.x,
        d.cp.y,
        d.tan1.x,
        d.tan1.y,
        d.tan2.x,
        d.tan2.y,
        d.start_angle_cw_from_z.to_degrees(),
        d.short_sweep_signed.to_degrees(),
        if d.is_180_complement { " complement" } else { "" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch::geometry::{project_onto_circle, project_onto_line};

    fn on_x_axis(cp: Point, _r: f64) -> Option<Point> {
        project_onto_line(cp, Point::new(0.0, 0.0), Point::new(10.0, 0.0))
    }

    fn on_vertical(cp: Point, _r: f64) -> Option<Point> {
        project_onto_line(cp, Point::new(10.0, 0.0), Point::new(10.0, 10.0))
    }

    #[test]
    fn test_quarter_fillet_is_short() {
        let report = build_fillet_arcs(
            PairKind::LineLine,
            2.0,
            &[Point::new(8.0, 2.0)],
            on_x_axis,
            on_vertical,
        );
        assert_eq!(report.candidates.len(), 1);
        let d = &report.candidates[0];
        assert!(dist(d.tan1, Point::new(8.0, 0.0)) < 1e-9);
        assert!(dist(d.tan2, Point::new(10.0, 2.0)) < 1e-9);
        assert!((d.short_sweep_signed.abs() - PI / 2.0).abs() < 1e-9);
        // tan1 sits straight below CP (180° from +Z), tan2 to its right (90°): counter-clockwise
        assert!(d.short_sweep_signed < 0.0);
        assert!(!d.is_180_complement);
        assert!((dist(d.mid_short, d.cp) - 2.0).abs() < 1e-9);
        assert!(report.log.contains("LINE-LINE"));
    }

    #[test]
    fn test_half_turn_gets_complement() {
        // Two parallel lines 4 apart, r = 2: tangent points are diametrically opposite
        let top = |cp: Point, _r: f64| project_onto_line(cp, Point::new(0.0, 4.0), Point::new(10.0, 4.0));
        let report = build_fillet_arcs(PairKind::LineLine, 2.0, &[Point::new(5.0, 2.0)], on_x_axis, top);
        assert_eq!(report.candidates.len(), 2);
        let (a, b) = (&report.candidates[0], &report.candidates[1]);
        assert!(!a.is_180_complement);
        assert!(b.is_180_complement);
        assert!((a.short_sweep_signed + b.short_sweep_signed).abs() < 1e-6);
        assert!(dist(a.mid_short, b.mid_short) > 3.9);
    }

    #[test]
    fn test_failed_tangent_discards_center() {
        let none = |_cp: Point, _r: f64| None;
        let report = build_fillet_arcs(PairKind::LineArc, 1.0, &[Point::new(1.0, 1.0)], on_x_axis, none);
        assert!(report.candidates.is_empty());
        assert!(report.log.contains("rejected"));
    }

    #[test]
    fn test_tangent_off_radius_discarded() {
        // Center 3 away from the circle, but r = 1
        let circle = |cp: Point, _r: f64| project_onto_circle(cp, Point::new(0.0, 0.0), 5.0);
        let report = build_fillet_arcs(PairKind::LineArc, 1.0, &[Point::new(0.0, 8.0)], on_x_axis, circle);
        assert!(report.candidates.is_empty());
    }
}
