//! Fillet tool session

use shared::{evaluate_length, ParameterTable, Pick};
use uuid::Uuid;

use super::settings::ToolSettings;
use super::{step_back, step_forward, SessionAction, SessionDriver, SessionState, SessionView, ToolOutcome};
use crate::error::ToolError;
use crate::preview::PreviewHost;
use crate::sketch::fillet::{build_fillet_candidates, fillet_arc_text, sort_by_pick_distance, validate_picks};
use crate::sketch::geometry::{sample_arc_cw_from_z, to_point2d};
use crate::sketch::types::FilletArcData;

/// State of one fillet interaction between two picked elements
#[derive(Debug, Clone)]
pub struct FilletSession {
    id: Uuid,
    pick_a: Pick,
    pick_b: Pick,
    parameters: ParameterTable,
    settings: ToolSettings,
    radius_text: String,
    radius: Option<f64>,
    candidates: Vec<FilletArcData>,
    cursor: Option<usize>,
    state: SessionState,
    status: String,
    last_error: Option<ToolError>,
    log: String,
}

impl FilletSession {
    /// Validate the picks and compute candidates for `radius_text`.
    ///
    /// Only a bad selection refuses to open. A bad radius or an empty candidate
    /// set leaves the session open with the failure as its status.
    pub fn open(
        pick_a: Option<&Pick>,
        pick_b: Option<&Pick>,
        radius_text: &str,
        parameters: &ParameterTable,
        settings: &ToolSettings,
        host: &mut dyn PreviewHost,
    ) -> Result<Self, ToolError> {
        let (pick_a, pick_b) = validate_picks(pick_a, pick_b).inspect_err(|e| {
            tracing::warn!("fillet not opened: {e}");
        })?;

        let mut session = Self {
            id: Uuid::new_v4(),
            pick_a,
            pick_b,
            parameters: parameters.clone(),
            settings: settings.clone(),
            radius_text: String::new(),
            radius: None,
            candidates: Vec::new(),
            cursor: None,
            state: SessionState::Open,
            status: String::new(),
            last_error: None,
            log: String::new(),
        };
        tracing::info!(
            "fillet session {} opened on elements {} and {}",
            session.id,
            session.pick_a.index,
            session.pick_b.index
        );
        let _ = session.recompute(radius_text, host);
        Ok(session)
    }

    fn ensure_open(&self) -> Result<(), ToolError> {
        if self.state.is_open() {
            Ok(())
        } else {
            Err(ToolError::SessionClosed)
        }
    }

    fn parse_radius(&self, text: &str) -> Result<f64, ToolError> {
        let r = evaluate_length(text, &self.parameters).map_err(|e| ToolError::DegenerateRadius(e.to_string()))?;
        if r <= 0.0 {
            return Err(ToolError::DegenerateRadius(format!("{text} is not positive")));
        }
        Ok(r)
    }

    /// Rebuild candidates for new radius text. Clears the highlight.
    pub fn recompute(&mut self, radius_text: &str, host: &mut dyn PreviewHost) -> Result<usize, ToolError> {
        self.ensure_open()?;
        self.radius_text = radius_text.to_string();
        self.cursor = None;
        self.candidates.clear();
        self.log.clear();

        let built = self
            .parse_radius(radius_text)
            .inspect(|r| self.radius = Some(*r))
            .and_then(|r| build_fillet_candidates(&self.pick_a, &self.pick_b, r));

        let result = match built {
            Ok(report) => {
                self.candidates = report.candidates;
                self.log = report.log;
                if self.settings.fillet.sort_by_pick {
                    sort_by_pick_distance(&mut self.candidates, &self.pick_a, &self.pick_b);
                }
                self.status = format!("{} fillet candidates", self.candidates.len());
                self.last_error = None;
                tracing::info!("fillet {}: r={} -> {} candidates", self.id, radius_text, self.candidates.len());
                host.show_log("Fillet", &self.log);
                Ok(self.candidates.len())
            }
            Err(e) => {
                if matches!(e, ToolError::DegenerateRadius(_)) {
                    self.radius = None;
                }
                tracing::warn!("fillet {}: {e}", self.id);
                self.status = e.to_string();
                self.last_error = Some(e.clone());
                Err(e)
            }
        };
        self.render(host);
        result
    }

    /// Highlight the next candidate, wrapping. No-op without candidates.
    pub fn cycle(&mut self, host: &mut dyn PreviewHost) -> Result<Option<usize>, ToolError> {
        self.ensure_open()?;
        self.cursor = step_forward(self.cursor, self.candidates.len());
        self.render(host);
        Ok(self.cursor)
    }

    pub fn cycle_back(&mut self, host: &mut dyn PreviewHost) -> Result<Option<usize>, ToolError> {
        self.ensure_open()?;
        self.cursor = step_back(self.cursor, self.candidates.len());
        self.render(host);
        Ok(self.cursor)
    }

    /// Commit the highlighted candidate and return its profile record
    pub fn keep(&mut self, host: &mut dyn PreviewHost) -> Result<String, ToolError> {
        self.ensure_open()?;
        let Some(d) = self.current() else {
            self.status = ToolError::NothingToKeep.to_string();
            return Err(ToolError::NothingToKeep);
        };
        let text = fillet_arc_text(d);
        self.state = SessionState::Kept;
        self.status = "Fillet kept".to_string();
        host.clear_preview_only();
        tracing::info!("fillet {} kept: {}", self.id, text);
        Ok(text)
    }

    pub fn cancel(&mut self, host: &mut dyn PreviewHost) -> Result<(), ToolError> {
        self.ensure_open()?;
        self.state = SessionState::Cancelled;
        self.status = "Cancelled".to_string();
        host.clear_preview_only();
        tracing::info!("fillet {} cancelled", self.id);
        Ok(())
    }

    pub fn current(&self) -> Option<&FilletArcData> {
        self.cursor.and_then(|i| self.candidates.get(i))
    }

    pub fn candidates(&self) -> &[FilletArcData] {
        &self.candidates
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Failure of the last recompute, cleared by a successful one
    pub fn last_error(&self) -> Option<&ToolError> {
        self.last_error.as_ref()
    }

    pub fn radius(&self) -> Option<f64> {
        self.radius
    }

    pub fn radius_text(&self) -> &str {
        &self.radius_text
    }

    pub fn pick_a(&self) -> &Pick {
        &self.pick_a
    }

    /// Diagnostic text of the last successful build
    pub fn log(&self) -> &str {
        &self.log
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id.to_string(),
            state: self.state,
            candidate_count: self.candidates.len(),
            cursor: self.cursor,
            current_label: self.current().map(fillet_arc_text),
            status: self.status.clone(),
        }
    }

    fn render(&self, host: &mut dyn PreviewHost) {
        if !host.is_mapping_valid() {
            return;
        }
        host.clear_preview_only();
        let p = &self.settings.preview;

        for (i, d) in self.candidates.iter().enumerate() {
            let points: Vec<_> = sample_arc_cw_from_z(d.cp, d.r, d.start_angle_cw_from_z, d.short_sweep_signed, p.arc_samples)
                .into_iter()
                .map(to_point2d)
                .collect();
            let (color, thickness, opacity) = if Some(i) == self.cursor {
                (p.highlight_color, p.highlight_thickness, p.highlight_opacity)
            } else if d.is_180_complement {
                (p.complement_color, p.complement_thickness, p.candidate_opacity)
            } else {
                (p.candidate_color, p.candidate_thickness, p.candidate_opacity)
            };
            host.draw_preview_polyline_world(&points, color, thickness, opacity);
        }

        if let Some(d) = self.current() {
            for t in [d.tan1, d.tan2] {
                host.draw_preview_point_world(to_point2d(t), p.tangent_point_color, p.point_diameter, p.highlight_opacity);
            }
        }
    }
}

/// Modal fillet: open a session and let `driver` cycle until Keep or Cancel
pub fn run_fillet(
    pick_a: Option<&Pick>,
    pick_b: Option<&Pick>,
    radius_text: &str,
    parameters: &ParameterTable,
    settings: &ToolSettings,
    host: &mut dyn PreviewHost,
    driver: &mut dyn SessionDriver,
) -> ToolOutcome {
    let mut session = match FilletSession::open(pick_a, pick_b, radius_text, parameters, settings, host) {
        Ok(s) => s,
        Err(e) => return ToolOutcome::rejected(e),
    };

    loop {
        let action = driver.next_action(&session.view()).unwrap_or(SessionAction::Cancel);
        match action {
            SessionAction::SetRadius(text) => {
                let _ = session.recompute(&text, host);
            }
            SessionAction::Next => {
                let _ = session.cycle(host);
            }
            SessionAction::Prev => {
                let _ = session.cycle_back(host);
            }
            SessionAction::Keep => {
                if let Ok(text) = session.keep(host) {
                    return ToolOutcome::accepted(None, text, session.status());
                }
            }
            SessionAction::Cancel => {
                let _ = session.cancel(host);
                // Closing on a failed build reports that failure
                return match session.last_error() {
                    Some(e) => ToolOutcome::rejected(e.clone()),
                    None => ToolOutcome::cancelled(),
                };
            }
        }
    }
}
