//! Profile construction kernel: geometry primitives, fillet and trim builders.

pub mod arc_law;
pub mod fillet;
pub mod geometry;
pub mod trim;
pub mod types;

pub use arc_law::{build_fillet_arcs, ArcLawReport};
pub use fillet::{build_fillet_candidates, fillet_arc_text, sort_by_pick_distance, validate_picks};
pub use trim::{build_trim_options, default_option_index, validate_trim_picks};
pub use types::{FilletArcData, PairKind, SweepClass, TrimOption, TrimOutcomeKind};
