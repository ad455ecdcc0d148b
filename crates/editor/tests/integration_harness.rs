//! Integration tests for ProfileHarness.
//!
//! Drives fillet and trim sessions the way a host does and checks what ends
//! up in the profile.

use lathe_editor_lib::fixtures::{corner_profile, corner_profile_text};
use lathe_editor_lib::harness::{ActiveTool, ProfileHarness};
use lathe_editor_lib::preview::PreviewCall;
use shared::{parse_profile, PickedEnd, Segment};

fn corner_harness() -> ProfileHarness {
    let mut h = ProfileHarness::new();
    h.load_profile_text(corner_profile_text()).unwrap();
    h
}

#[test]
fn test_harness_fillet_then_export() {
    let mut h = corner_harness();
    let a = h.pick(0, 9.0, 0.0, None).unwrap();
    let b = h.pick(1, 10.0, 1.0, None).unwrap();
    let view = h.begin_fillet(&a, &b, Some("2")).unwrap();
    assert_eq!(view.candidate_count, 4);
    assert_eq!(view.cursor, None);

    let view = h.cycle(false).unwrap();
    assert_eq!(view.cursor, Some(0));
    h.keep().unwrap();

    let exported = h.export_profile_text();
    let lines: Vec<&str> = exported.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "LINE 0 0 10 0");
    assert!(lines[1].starts_with("ARC3_CCW 8 0 "));
    assert!(lines[1].contains(" 10 2 8 2"));
    assert_eq!(lines[2], "LINE 10 0 10 10");

    // Exported text loads back unchanged
    assert_eq!(parse_profile(&exported).unwrap(), h.profile);
}

#[test]
fn test_harness_trim_replaces_element() {
    let mut h = ProfileHarness::new();
    h.load_profile_text("LINE 0 0 5 0\nLINE 8 -2 8 2\n").unwrap();
    let target = h.pick(0, 4.5, 0.0, None).unwrap();
    assert_eq!(target.picked_end, PickedEnd::End);
    let cutter = h.pick(1, 8.0, 0.0, None).unwrap();
    h.begin_trim(&target, &cutter).unwrap();
    let outcome = h.keep().unwrap();
    assert_eq!(outcome.replace_index, Some(0));
    assert_eq!(h.segment_count(), 2);
    assert_eq!(h.export_profile_text(), "LINE 0 0 8 0\nLINE 8 -2 8 2\n");
}

#[test]
fn test_harness_cancel_leaves_profile() {
    let mut h = ProfileHarness::new();
    h.load_profile(corner_profile());
    let before = h.profile.clone();
    let a = h.pick(0, 9.0, 0.0, None).unwrap();
    let b = h.pick(1, 10.0, 1.0, None).unwrap();
    h.begin_fillet(&a, &b, Some("2")).unwrap();
    h.cycle(false).unwrap();
    h.cancel().unwrap();
    assert_eq!(h.profile, before);
    assert!(!h.has_active_session());
    assert_eq!(h.last_status(), "Cancelled");
    assert!(matches!(h.preview.calls.last(), Some(PreviewCall::Clear)));
}

#[test]
fn test_harness_no_candidates_keeps_profile() {
    let mut h = ProfileHarness::new();
    h.load_profile_text("LINE 0 0 10 0\nLINE 0 5 10 5\n").unwrap();
    let before = h.profile.clone();
    let a = h.pick(0, 9.0, 0.0, None).unwrap();
    let b = h.pick(1, 9.0, 5.0, None).unwrap();
    let view = h.begin_fillet(&a, &b, Some("1")).unwrap();
    assert_eq!(view.candidate_count, 0);
    assert_eq!(view.status, "No fillet is possible here");
    assert_eq!(h.keep().unwrap_err(), "Nothing highlighted to keep");
    assert_eq!(h.profile, before);
}

#[test]
fn test_harness_radius_from_parameter() {
    let mut h = corner_harness();
    h.set_parameter("R_nose", 1.5);
    let a = h.pick(0, 9.0, 0.0, None).unwrap();
    let b = h.pick(1, 10.0, 1.0, None).unwrap();
    h.begin_fillet(&a, &b, Some("1")).unwrap();
    h.set_radius("R_nose * 2").unwrap();
    h.cycle(false).unwrap();
    let text = h.highlighted_text().unwrap();
    assert!(text.starts_with("ARC3_CCW 7 0 "), "{text}");
}

#[test]
fn test_harness_set_radius_on_trim_fails() {
    let mut h = ProfileHarness::new();
    h.load_profile_text("LINE 0 0 5 0\nLINE 8 -2 8 2\n").unwrap();
    let target = h.pick(0, 4.5, 0.0, None).unwrap();
    let cutter = h.pick(1, 8.0, 0.0, None).unwrap();
    h.begin_trim(&target, &cutter).unwrap();
    assert!(h.set_radius("2").is_err());
    assert!(matches!(h.active(), Some(ActiveTool::Trim(_))));
}

#[test]
fn test_harness_new_session_replaces_open_one() {
    let mut h = ProfileHarness::new();
    h.load_profile_text("LINE 0 0 10 0\nLINE 10 0 10 10\nLINE 4 -2 4 2\n").unwrap();
    let a = h.pick(0, 9.0, 0.0, None).unwrap();
    let b = h.pick(1, 10.0, 1.0, None).unwrap();
    h.begin_fillet(&a, &b, Some("2")).unwrap();
    let cutter = h.pick(2, 4.0, 0.0, None).unwrap();
    let view = h.begin_trim(&a, &cutter).unwrap();
    assert_eq!(view.candidate_count, 2);
    assert!(matches!(h.active(), Some(ActiveTool::Trim(_))));
}

#[test]
fn test_harness_failed_open_keeps_current_session() {
    let mut h = corner_harness();
    let a = h.pick(0, 9.0, 0.0, None).unwrap();
    let b = h.pick(1, 10.0, 1.0, None).unwrap();
    h.begin_fillet(&a, &b, Some("2")).unwrap();
    h.cycle(false).unwrap();

    // The corner lines only meet at the fixed endpoint (10, 0)
    assert_eq!(h.begin_trim(&a, &b).unwrap_err(), "No valid trim outcome");
    assert_eq!(h.last_status(), "No valid trim outcome");
    assert!(h.begin_fillet(&a, &a, Some("2")).is_err());

    let view = h.view().unwrap();
    assert_eq!(view.cursor, Some(0));
    assert!(matches!(h.active(), Some(ActiveTool::Fillet(_))));
    h.keep().unwrap();
    assert_eq!(h.segment_count(), 3);
}

#[test]
fn test_harness_trim_arc_keeps_circle() {
    let mut h = ProfileHarness::new();
    h.load_profile_text("ARC3_CCW 5 0 3.5355339059327378 3.5355339059327378 0 5 0 0\nLINE -5 -1 -5 1\n")
        .unwrap();
    let target = h.pick(0, 0.5, 5.0, None).unwrap();
    let cutter = h.pick(1, -5.0, 0.0, None).unwrap();
    let view = h.begin_trim(&target, &cutter).unwrap();
    assert_eq!(view.candidate_count, 4);
    h.keep().unwrap();
    match &h.profile[0] {
        Segment::Arc { c, .. } => assert_eq!((c.x, c.z), (0.0, 0.0)),
        other => panic!("Expected arc, got {other:?}"),
    }
}
