//! JSON command protocol for scripted and agent-driven profile editing.

use serde::{Deserialize, Serialize};
use shared::PickedEnd;

use crate::harness::{ActiveTool, ProfileHarness};

/// Element pick as sent over the protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickSpec {
    pub index: usize,
    pub x: f64,
    pub z: f64,
    /// Nearest endpoint to `(x, z)` when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<PickedEnd>,
}

/// A command the agent can execute against the harness.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Replace the profile with records in text form
    LoadProfile { text: String },
    /// Define a named parameter usable in radius expressions
    SetParameter { name: String, value: f64 },
    /// Open a fillet session between two elements
    BeginFillet {
        a: PickSpec,
        b: PickSpec,
        #[serde(default)]
        radius: Option<String>,
    },
    /// Open a trim session: `target` is replaced, `cutter` is extended as needed
    BeginTrim { target: PickSpec, cutter: PickSpec },
    /// New radius text for the open fillet session
    SetRadius { radius: String },
    /// Highlight the next (or previous) candidate
    Cycle {
        #[serde(default)]
        backward: bool,
    },
    /// Commit the highlighted candidate
    Keep,
    /// Close the session without changes
    Cancel,
    /// Describe the profile and the open session
    Inspect,
    /// Export the profile as text
    ExportProfile,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn view_response(harness: &ProfileHarness, view: crate::state::SessionView) -> CommandResponse {
    CommandResponse::ok_with_data(serde_json::json!({
        "session": view,
        "highlighted": harness.highlighted_text(),
    }))
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut ProfileHarness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::LoadProfile { text } => match harness.load_profile_text(&text) {
            Ok(count) => CommandResponse::ok_with_data(serde_json::json!({ "segment_count": count })),
            Err(e) => CommandResponse::err(e),
        },

        AgentCommand::SetParameter { name, value } => {
            harness.set_parameter(&name, value);
            CommandResponse::ok()
        }

        AgentCommand::BeginFillet { a, b, radius } => {
            let picks = harness
                .pick(a.index, a.x, a.z, a.end)
                .and_then(|pa| harness.pick(b.index, b.x, b.z, b.end).map(|pb| (pa, pb)));
            match picks.and_then(|(pa, pb)| harness.begin_fillet(&pa, &pb, radius.as_deref())) {
                Ok(view) => view_response(harness, view),
                Err(e) => CommandResponse::err(e),
            }
        }

        AgentCommand::BeginTrim { target, cutter } => {
            let picks = harness
                .pick(target.index, target.x, target.z, target.end)
                .and_then(|pt| harness.pick(cutter.index, cutter.x, cutter.z, cutter.end).map(|pc| (pt, pc)));
            match picks.and_then(|(pt, pc)| harness.begin_trim(&pt, &pc)) {
                Ok(view) => view_response(harness, view),
                Err(e) => CommandResponse::err(e),
            }
        }

        AgentCommand::SetRadius { radius } => match harness.set_radius(&radius) {
            Ok(view) => view_response(harness, view),
            Err(e) => CommandResponse::err(e),
        },

        AgentCommand::Cycle { backward } => match harness.cycle(backward) {
            Ok(view) => view_response(harness, view),
            Err(e) => CommandResponse::err(e),
        },

        AgentCommand::Keep => match harness.keep() {
            Ok(outcome) => CommandResponse::ok_with_data(serde_json::json!({
                "accepted": outcome.accepted,
                "replace_index": outcome.replace_index,
                "replacement": outcome.replacement,
                "status": outcome.status,
                "segment_count": harness.segment_count(),
            })),
            Err(e) => CommandResponse::err(e),
        },

        AgentCommand::Cancel => match harness.cancel() {
            Ok(()) => CommandResponse::ok(),
            Err(e) => CommandResponse::err(e),
        },

        AgentCommand::Inspect => {
            let segments: Vec<serde_json::Value> = harness
                .profile
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    serde_json::json!({
                        "index": i,
                        "kind": s.kind().label(),
                        "text": shared::format_segment(s),
                    })
                })
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "segment_count": segments.len(),
                "segments": segments,
                "tool": harness.active().map(ActiveTool::name),
                "session": harness.view(),
                "candidates": harness.candidate_texts(),
                "status": harness.last_status(),
            }))
        }

        AgentCommand::ExportProfile => {
            CommandResponse::ok_with_data(serde_json::json!({ "profile_text": harness.export_profile_text() }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut ProfileHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand = serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(harness: &mut ProfileHarness, json: &str) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> = serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds.into_iter().map(|cmd| execute_command(harness, cmd)).collect())
}
