//! Error types for the fillet and trim tools.
//!
//! `ToolError`'s `Display` text doubles as the status string shown to the user.

use thiserror::Error;

/// Recoverable failure of a tool operation. Nothing is committed when one is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    /// Missing, identical or degenerate picks
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Radius text is unparsable, zero or negative
    #[error("Invalid fillet radius: {0}")]
    DegenerateRadius(String),

    /// No fillet circle touches both elements
    #[error("No fillet is possible here")]
    NoCandidates,

    /// The two elements never meet, even when extended
    #[error("The elements do not intersect")]
    NoIntersections,

    /// Intersections exist but none gives a valid trim
    #[error("No valid trim outcome")]
    NoValidOutcomes,

    /// Keep was requested with no highlighted candidate
    #[error("Nothing highlighted to keep")]
    NothingToKeep,

    /// The session already ended with Keep or Cancel (or was never opened)
    #[error("No open tool session")]
    SessionClosed,
}

/// Failure to read or write the settings file
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No platform config directory")]
    NoConfigDir,
}
