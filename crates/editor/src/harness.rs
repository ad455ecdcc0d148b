//! Headless test harness for driving fillet and trim on a profile.
//!
//! Stands in for the GUI host: owns the segment list, named parameters,
//! settings, a recording preview and at most one open tool session.

use shared::{format_segment, parse_profile, parse_segment, ParameterTable, Pick, PickedEnd, Point2D, Segment};

use crate::error::ToolError;
use crate::preview::RecordingPreview;
use crate::state::{FilletSession, SessionView, ToolOutcome, ToolSettings, TrimSession};

fn no_session() -> String {
    ToolError::SessionClosed.to_string()
}

/// Currently open tool
#[derive(Debug, Clone)]
pub enum ActiveTool {
    Fillet(FilletSession),
    Trim(TrimSession),
}

impl ActiveTool {
    pub fn view(&self) -> SessionView {
        match self {
            ActiveTool::Fillet(s) => s.view(),
            ActiveTool::Trim(s) => s.view(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActiveTool::Fillet(_) => "fillet",
            ActiveTool::Trim(_) => "trim",
        }
    }
}

/// Headless host: profile, parameters, preview and the active session
pub struct ProfileHarness {
    pub profile: Vec<Segment>,
    pub parameters: ParameterTable,
    pub settings: ToolSettings,
    pub preview: RecordingPreview,
    active: Option<ActiveTool>,
    last_status: String,
}

impl Default for ProfileHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileHarness {
    /// Create a new empty harness with default settings.
    pub fn new() -> Self {
        Self::with_settings(ToolSettings::default())
    }

    pub fn with_settings(settings: ToolSettings) -> Self {
        Self {
            profile: Vec::new(),
            parameters: ParameterTable::new(),
            settings,
            preview: RecordingPreview::new(),
            active: None,
            last_status: String::new(),
        }
    }

    // ── Profile ───────────────────────────────────────────────

    /// Replace the profile; any open session is dropped
    pub fn load_profile(&mut self, segments: Vec<Segment>) {
        self.active = None;
        self.preview.reset();
        self.profile = segments;
    }

    /// Load a profile from its text form
    pub fn load_profile_text(&mut self, text: &str) -> Result<usize, String> {
        let segments = parse_profile(text).map_err(|e| e.to_string())?;
        self.load_profile(segments);
        Ok(self.profile.len())
    }

    /// Export the profile, one record per line
    pub fn export_profile_text(&self) -> String {
        self.profile.iter().map(|s| format_segment(s) + "\n").collect()
    }

    pub fn segment_count(&self) -> usize {
        self.profile.len()
    }

    pub fn set_parameter(&mut self, name: &str, value: f64) {
        self.parameters.set(name, value);
    }

    // ── Picking ───────────────────────────────────────────────

    /// Pick element `index` at `(x, z)`; the picked end defaults to the nearer endpoint
    pub fn pick(&self, index: usize, x: f64, z: f64, end: Option<PickedEnd>) -> Result<Pick, String> {
        let segment = self
            .profile
            .get(index)
            .ok_or_else(|| format!("No element at index {index}"))?;
        let point = Point2D::new(x, z);
        let end = end.unwrap_or_else(|| {
            if point.distance(&segment.start()) <= point.distance(&segment.end()) {
                PickedEnd::Start
            } else {
                PickedEnd::End
            }
        });
        Ok(Pick::new(index, segment.clone(), end, point))
    }

    // ── Sessions ──────────────────────────────────────────────

    fn replace_active(&mut self, tool: ActiveTool) {
        if let Some(old) = self.active.replace(tool) {
            tracing::debug!("dropping open {} session", old.name());
        }
    }

    /// Open a fillet session; `radius` defaults to the configured text.
    ///
    /// The open session is replaced only once the new one has opened.
    pub fn begin_fillet(&mut self, pick_a: &Pick, pick_b: &Pick, radius: Option<&str>) -> Result<SessionView, String> {
        let radius = radius.unwrap_or(&self.settings.fillet.default_radius).to_string();
        let session = FilletSession::open(
            Some(pick_a),
            Some(pick_b),
            &radius,
            &self.parameters,
            &self.settings,
            &mut self.preview,
        )
        .map_err(|e| self.fail(e.to_string()))?;
        let view = session.view();
        self.last_status = view.status.clone();
        self.replace_active(ActiveTool::Fillet(session));
        Ok(view)
    }

    /// Open a trim session for `target` cut by `cutter`; a failed open keeps the current one
    pub fn begin_trim(&mut self, target: &Pick, cutter: &Pick) -> Result<SessionView, String> {
        let session = TrimSession::open(Some(target), Some(cutter), &self.settings, &mut self.preview)
            .map_err(|e| self.fail(e.to_string()))?;
        let view = session.view();
        self.last_status = view.status.clone();
        self.replace_active(ActiveTool::Trim(session));
        Ok(view)
    }

    fn fail(&mut self, status: String) -> String {
        self.last_status = status.clone();
        status
    }

    /// New radius text for the open fillet session
    pub fn set_radius(&mut self, text: &str) -> Result<SessionView, String> {
        let preview = &mut self.preview;
        let tool = self
            .active
            .as_mut()
            .ok_or_else(no_session)?;
        let ActiveTool::Fillet(session) = tool else {
            return Err("Radius applies to the fillet tool only".to_string());
        };
        let result = session.recompute(text, preview);
        let view = session.view();
        self.last_status = view.status.clone();
        result.map(|_| view).map_err(|e| e.to_string())
    }

    /// Move the highlight forward (or back) and return the new view
    pub fn cycle(&mut self, backward: bool) -> Result<SessionView, String> {
        let preview = &mut self.preview;
        let tool = self
            .active
            .as_mut()
            .ok_or_else(no_session)?;
        let result = match (tool, backward) {
            (ActiveTool::Fillet(s), false) => s.cycle(preview).map(|_| s.view()),
            (ActiveTool::Fillet(s), true) => s.cycle_back(preview).map(|_| s.view()),
            (ActiveTool::Trim(s), false) => s.cycle(preview).map(|_| s.view()),
            (ActiveTool::Trim(s), true) => s.cycle_back(preview).map(|_| s.view()),
        };
        result.map_err(|e| e.to_string())
    }

    /// Commit the highlighted candidate into the profile.
    ///
    /// Trim replaces the trimmed element; fillet inserts the arc right after
    /// the first picked element. A failed keep leaves the session open.
    pub fn keep(&mut self) -> Result<ToolOutcome, String> {
        let preview = &mut self.preview;
        let tool = self
            .active
            .as_mut()
            .ok_or_else(no_session)?;

        let (outcome, insert_at) = match tool {
            ActiveTool::Fillet(s) => {
                let text = s.keep(preview).map_err(|e| e.to_string())?;
                let after = s.pick_a().index + 1;
                (ToolOutcome::accepted(None, text, s.status()), Some(after))
            }
            ActiveTool::Trim(s) => {
                let (index, text) = s.keep(preview).map_err(|e| e.to_string())?;
                (ToolOutcome::accepted(Some(index), text, s.status()), None)
            }
        };
        self.active = None;

        let text = outcome.replacement.as_deref().unwrap_or_default();
        let segment = parse_segment(text).map_err(|e| self.fail(format!("Replacement not applied: {e}")))?;
        match (outcome.replace_index, insert_at) {
            (Some(index), _) if index < self.profile.len() => self.profile[index] = segment,
            (None, Some(at)) => self.profile.insert(at.min(self.profile.len()), segment),
            _ => return Err(self.fail("Replacement target is out of range".to_string())),
        }
        tracing::info!("profile now has {} elements", self.profile.len());
        self.last_status = outcome.status.clone();
        Ok(outcome)
    }

    pub fn cancel(&mut self) -> Result<(), String> {
        let preview = &mut self.preview;
        let tool = self
            .active
            .as_mut()
            .ok_or_else(no_session)?;
        let result = match tool {
            ActiveTool::Fillet(s) => s.cancel(preview),
            ActiveTool::Trim(s) => s.cancel(preview),
        };
        self.active = None;
        self.last_status = "Cancelled".to_string();
        result.map_err(|e| e.to_string())
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn active(&self) -> Option<&ActiveTool> {
        self.active.as_ref()
    }

    pub fn has_active_session(&self) -> bool {
        self.active.is_some()
    }

    /// Current view of the open session, if any
    pub fn view(&self) -> Option<SessionView> {
        self.active.as_ref().map(ActiveTool::view)
    }

    /// Replacement text of the highlighted candidate
    pub fn highlighted_text(&self) -> Option<String> {
        match self.active.as_ref()? {
            ActiveTool::Fillet(s) => s.current().map(crate::sketch::fillet_arc_text),
            ActiveTool::Trim(s) => s.current().map(|o| o.replacement_text.clone()),
        }
    }

    /// All candidate texts of the open session, in cycle order
    pub fn candidate_texts(&self) -> Vec<String> {
        match self.active.as_ref() {
            Some(ActiveTool::Fillet(s)) => s.candidates().iter().map(crate::sketch::fillet_arc_text).collect(),
            Some(ActiveTool::Trim(s)) => s.candidates().iter().map(|o| o.replacement_text.clone()).collect(),
            None => Vec::new(),
        }
    }

    pub fn last_status(&self) -> &str {
        &self.last_status
    }
}
