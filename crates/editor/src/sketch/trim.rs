//! Trim operations for profile elements
//!
//! The target element is intersected against the cutter taken as an infinite
//! line or full circle. Every geometrically valid replacement is enumerated:
//! split/extend/trim outcomes for lines, directed clockwise branches for arcs.

use kurbo::Point;
use shared::segment_text::{format_arc3, format_line};
use shared::{Pick, PickedEnd, Segment};

use super::fillet::Primitive;
use super::geometry::{
    add_unique_point, cw_from_z, delta_cw, dist, intersect_circle_circle, intersect_infinite_lines,
    intersect_line_circle_infinite, math_angle, point_at_math_angle, sample_arc_cw_from_z, to_point,
    to_point2d, MIN_RADIUS,
};
use super::types::{SweepClass, TrimOption, TrimOutcomeKind};
use crate::error::ToolError;
use std::f64::consts::{PI, TAU};

/// Intersection points closer than this are the same point.
const INTERSECTION_TOL: f64 = 1e-7;
/// Collinearity and ray-direction tolerance for line outcomes.
const LINE_TOL: f64 = 1e-7;
/// Distance from the full circle still accepted as "on the arc".
const ON_CIRCLE_TOL: f64 = 1e-4;
/// Options whose intersection and endpoints all agree within this are duplicates.
const OPTION_TOL: f64 = 1e-9;
/// Sweep difference from a half turn still labelled "180°".
const HALF_TURN_TOL: f64 = 1e-9;

/// Reject missing, identical or degenerate picks
pub fn validate_trim_picks(pick_a: Option<&Pick>, pick_b: Option<&Pick>) -> Result<(Pick, Pick), ToolError> {
    let (a, b) = match (pick_a, pick_b) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(ToolError::InvalidSelection("pick the element to trim and the cutting element".into())),
    };
    if a.index == b.index {
        return Err(ToolError::InvalidSelection("an element cannot trim itself".into()));
    }
    Primitive::from_segment(&a.segment)?;
    Primitive::from_segment(&b.segment)?;
    Ok((a.clone(), b.clone()))
}

// ============================================================================
// Intersections
// ============================================================================

/// Intersections of two elements taken as infinite lines / full circles
pub fn trim_intersections(target: &Segment, cutter: &Segment) -> Result<Vec<Point>, ToolError> {
    let raw = match (Primitive::from_segment(target)?, Primitive::from_segment(cutter)?) {
        (Primitive::Line { a: a1, b: a2 }, Primitive::Line { a: b1, b: b2 }) => {
            intersect_infinite_lines(a1, a2, b1, b2).into_iter().collect()
        }
        (Primitive::Line { a, b }, Primitive::Circle { center, radius })
        | (Primitive::Circle { center, radius }, Primitive::Line { a, b }) => {
            intersect_line_circle_infinite(a, b, center, radius)
        }
        (Primitive::Circle { center: c1, radius: r1 }, Primitive::Circle { center: c2, radius: r2 }) => {
            intersect_circle_circle(c1, r1, c2, r2)
        }
    };

    let mut points = Vec::new();
    for p in raw {
        add_unique_point(&mut points, p, INTERSECTION_TOL);
    }
    Ok(points)
}

// ============================================================================
// Line outcomes
// ============================================================================

fn line_option(kind: TrimOutcomeKind, label: String, ip: Point, start: Point, end: Point) -> TrimOption {
    TrimOption {
        label,
        kind,
        intersection_point: ip,
        replacement_text: format_line(to_point2d(start), to_point2d(end)),
        preview_polyline: vec![start, end],
        endpoint_a: start,
        endpoint_b: end,
    }
}

fn end_name(end: PickedEnd) -> &'static str {
    match end {
        PickedEnd::Start => "Start",
        PickedEnd::End => "End",
    }
}

fn line_options(a: Point, b: Point, picked: PickedEnd, intersections: &[Point]) -> Vec<TrimOption> {
    let mut options = Vec::new();
    let d = b - a;
    let len = d.hypot();
    let len_sq = d.hypot2();

    for &ip in intersections {
        let w = ip - a;
        let off_line = (w.x * d.y - w.y * d.x).abs() / len;
        if off_line > LINE_TOL {
            continue;
        }
        let t = w.dot(d) / len_sq;

        if t > 0.0 && t < 1.0 && dist(ip, a) > MIN_RADIUS && dist(ip, b) > MIN_RADIUS {
            options.push(line_option(
                TrimOutcomeKind::Split,
                "Split: keep Start→IP".to_string(),
                ip,
                a,
                ip,
            ));
            options.push(line_option(
                TrimOutcomeKind::Split,
                "Split: keep IP→End".to_string(),
                ip,
                ip,
                b,
            ));
            continue;
        }

        // The picked side is only a hint: try moving either endpoint
        for moving_end in [picked, picked.opposite()] {
            let (moving, fixed) = match moving_end {
                PickedEnd::Start => (a, b),
                PickedEnd::End => (b, a),
            };
            if dist(ip, moving) <= MIN_RADIUS || dist(ip, fixed) <= MIN_RADIUS {
                continue;
            }
            if (ip - fixed).dot(moving - fixed) < -LINE_TOL {
                continue;
            }
            // Interior points split above, so a moved endpoint always lengthens the line
            let label = format!("Extend {} to IP", end_name(moving_end));
            let (start, end) = match moving_end {
                PickedEnd::Start => (ip, b),
                PickedEnd::End => (a, ip),
            };
            options.push(line_option(TrimOutcomeKind::Extend, label, ip, start, end));
        }
    }
    options
}

// ============================================================================
// Arc outcomes
// ============================================================================

fn classify_sweep(sweep: f64) -> SweepClass {
    if (sweep - PI).abs() <= HALF_TURN_TOL {
        SweepClass::HalfTurn
    } else if sweep < PI {
        SweepClass::Short
    } else {
        SweepClass::Long
    }
}

/// Clockwise branch from `start` to `end` on the circle (center, r)
fn arc_branch(
    center: Point,
    r: f64,
    start: Point,
    end: Point,
    ip: Point,
    label: String,
    samples: usize,
) -> Option<TrimOption> {
    let from = math_angle(center, start);
    let sweep = delta_cw(from, math_angle(center, end));
    if sweep <= MIN_RADIUS || sweep >= TAU - MIN_RADIUS {
        return None;
    }
    let class = classify_sweep(sweep);
    let mid = point_at_math_angle(center, r, from - sweep / 2.0);

    // Always written as ARC3_CCW although the branch is swept clockwise;
    // the mid point is what pins the branch.
    let text = format_arc3(true, to_point2d(start), to_point2d(mid), to_point2d(end), to_point2d(center));

    Some(TrimOption {
        label: format!("{label} CW ({})", class.label()),
        kind: TrimOutcomeKind::ArcBranch(class),
        intersection_point: ip,
        replacement_text: text,
        preview_polyline: sample_arc_cw_from_z(center, r, cw_from_z(from), sweep, samples),
        endpoint_a: start,
        endpoint_b: end,
    })
}

fn arc_options(segment: &Segment, intersections: &[Point], samples: usize) -> Vec<TrimOption> {
    let Segment::Arc { a, b, c, ccw, .. } = segment else {
        return Vec::new();
    };
    let center = to_point(*c);
    let r = dist(center, to_point(*a));

    // Canonical clockwise bookkeeping: a CCW arc read backwards
    let (p1, p2) = if *ccw {
        (to_point(*b), to_point(*a))
    } else {
        (to_point(*a), to_point(*b))
    };

    let mut options = Vec::new();
    for &raw_ip in intersections {
        let v = raw_ip - center;
        let d = v.hypot();
        if (d - r).abs() > ON_CIRCLE_TOL || d < MIN_RADIUS {
            continue;
        }
        // Snap onto the circle so the radius is preserved
        let ip = center + v * (r / d);

        for (name, fixed) in [("P1", p1), ("P2", p2)] {
            if dist(fixed, ip) <= MIN_RADIUS {
                continue;
            }
            let forward = arc_branch(center, r, fixed, ip, ip, format!("Arc {name}→IP"), samples);
            let backward = arc_branch(center, r, ip, fixed, ip, format!("Arc IP→{name}"), samples);
            options.extend(forward);
            options.extend(backward);
        }
    }
    options
}

// ============================================================================
// Enumeration, dedup, default choice
// ============================================================================

fn same_option(x: &TrimOption, y: &TrimOption) -> bool {
    x.replacement_text == y.replacement_text
        || (dist(x.intersection_point, y.intersection_point) <= OPTION_TOL
            && dist(x.endpoint_a, y.endpoint_a) <= OPTION_TOL
            && dist(x.endpoint_b, y.endpoint_b) <= OPTION_TOL)
}

/// Drop options repeating an earlier one, keeping first occurrences
pub fn dedup_options(options: Vec<TrimOption>) -> Vec<TrimOption> {
    let mut unique: Vec<TrimOption> = Vec::with_capacity(options.len());
    for option in options {
        if !unique.iter().any(|u| same_option(u, &option)) {
            unique.push(option);
        }
    }
    unique
}

/// All trim outcomes of the picked target for the given intersections
pub fn enumerate_trim_options(target: &Pick, intersections: &[Point], samples: usize) -> Vec<TrimOption> {
    let options = match &target.segment {
        Segment::Line { a, b } => line_options(to_point(*a), to_point(*b), target.picked_end, intersections),
        arc @ Segment::Arc { .. } => arc_options(arc, intersections, samples),
    };
    dedup_options(options)
}

/// Preferred option: one that keeps the unpicked endpoint and moves the picked
/// one, landing nearest the pick point. Falls back to 0.
pub fn default_option_index(options: &[TrimOption], target: &Pick) -> usize {
    let kept = to_point(target.segment.endpoint(target.picked_end.opposite()));
    let picked = to_point(target.segment.endpoint(target.picked_end));
    let click = to_point(target.picked_point);

    options
        .iter()
        .enumerate()
        .filter_map(|(i, o)| {
            let moved = if dist(o.endpoint_a, kept) <= OPTION_TOL {
                o.endpoint_b
            } else if dist(o.endpoint_b, kept) <= OPTION_TOL {
                o.endpoint_a
            } else {
                return None;
            };
            if dist(moved, picked) <= OPTION_TOL {
                return None;
            }
            Some((i, dist(moved, click)))
        })
        .min_by(|x, y| x.1.total_cmp(&y.1))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Build the ordered trim options for a validated pair of picks
pub fn build_trim_options(target: &Pick, cutter: &Pick, samples: usize) -> Result<Vec<TrimOption>, ToolError> {
    let intersections = trim_intersections(&target.segment, &cutter.segment)?;
    tracing::debug!("trim: {} intersections", intersections.len());
    if intersections.is_empty() {
        return Err(ToolError::NoIntersections);
    }

    let options = enumerate_trim_options(target, &intersections, samples);
    if options.is_empty() {
        return Err(ToolError::NoValidOutcomes);
    }
    Ok(options)
}
