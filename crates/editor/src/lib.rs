// Library crate: fillet/trim kernel, tool sessions, harness and the JSON command interface.
// The binary is a thin script runner over these modules.

pub mod command;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod preview;
pub mod sketch;
pub mod state;
