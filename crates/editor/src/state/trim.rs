//! Trim tool session

use shared::Pick;
use uuid::Uuid;

use super::settings::ToolSettings;
use super::{step_back, step_forward, SessionAction, SessionDriver, SessionState, SessionView, ToolOutcome};
use crate::error::ToolError;
use crate::preview::PreviewHost;
use crate::sketch::geometry::to_point2d;
use crate::sketch::trim::{build_trim_options, default_option_index, validate_trim_picks};
use crate::sketch::types::TrimOption;

/// State of one trim interaction: element A cut against element B
#[derive(Debug, Clone)]
pub struct TrimSession {
    id: Uuid,
    target: Pick,
    cutter: Pick,
    settings: ToolSettings,
    options: Vec<TrimOption>,
    cursor: Option<usize>,
    state: SessionState,
    status: String,
}

impl TrimSession {
    /// Enumerate trim options and highlight the preferred one.
    ///
    /// Fails when the selection is invalid or nothing can be trimmed; no
    /// session exists in that case.
    pub fn open(
        target: Option<&Pick>,
        cutter: Option<&Pick>,
        settings: &ToolSettings,
        host: &mut dyn PreviewHost,
    ) -> Result<Self, ToolError> {
        let (target, cutter) = validate_trim_picks(target, cutter)?;
        let options = build_trim_options(&target, &cutter, settings.preview.arc_samples).inspect_err(|e| {
            tracing::warn!("trim of element {} by {}: {e}", target.index, cutter.index);
        })?;
        let cursor = Some(default_option_index(&options, &target));

        let session = Self {
            id: Uuid::new_v4(),
            status: format!("{} trim options", options.len()),
            target,
            cutter,
            settings: settings.clone(),
            options,
            cursor,
            state: SessionState::Open,
        };
        tracing::info!(
            "trim session {} opened: element {} by {}, {} options",
            session.id,
            session.target.index,
            session.cutter.index,
            session.options.len()
        );
        session.render(host);
        Ok(session)
    }

    fn ensure_open(&self) -> Result<(), ToolError> {
        if self.state.is_open() {
            Ok(())
        } else {
            Err(ToolError::SessionClosed)
        }
    }

    pub fn cycle(&mut self, host: &mut dyn PreviewHost) -> Result<Option<usize>, ToolError> {
        self.ensure_open()?;
        self.cursor = step_forward(self.cursor, self.options.len());
        self.render(host);
        Ok(self.cursor)
    }

    pub fn cycle_back(&mut self, host: &mut dyn PreviewHost) -> Result<Option<usize>, ToolError> {
        self.ensure_open()?;
        self.cursor = step_back(self.cursor, self.options.len());
        self.render(host);
        Ok(self.cursor)
    }

    /// Commit the shown option: returns the index to replace and its new record
    pub fn keep(&mut self, host: &mut dyn PreviewHost) -> Result<(usize, String), ToolError> {
        self.ensure_open()?;
        let Some(option) = self.current() else {
            self.status = ToolError::NothingToKeep.to_string();
            return Err(ToolError::NothingToKeep);
        };
        let text = option.replacement_text.clone();
        self.status = format!("Trim kept: {}", option.label);
        self.state = SessionState::Kept;
        host.clear_preview_only();
        tracing::info!("trim {} kept: {}", self.id, text);
        Ok((self.target.index, text))
    }

    pub fn cancel(&mut self, host: &mut dyn PreviewHost) -> Result<(), ToolError> {
        self.ensure_open()?;
        self.state = SessionState::Cancelled;
        self.status = "Cancelled".to_string();
        host.clear_preview_only();
        tracing::info!("trim {} cancelled", self.id);
        Ok(())
    }

    pub fn current(&self) -> Option<&TrimOption> {
        self.cursor.and_then(|i| self.options.get(i))
    }

    pub fn candidates(&self) -> &[TrimOption] {
        &self.options
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

    /// Index of the element being replaced
    pub fn replace_index(&self) -> usize {
        self.target.index
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id.to_string(),
            state: self.state,
            candidate_count: self.options.len(),
            cursor: self.cursor,
            current_label: self.current().map(|o| o.label.clone()),
            status: self.status.clone(),
        }
    }

    fn render(&self, host: &mut dyn PreviewHost) {
        if !host.is_mapping_valid() {
            return;
        }
        host.clear_preview_only();
        let p = &self.settings.preview;

        // Highlighted option drawn last so it stays on top
        let order = (0..self.options.len())
            .filter(|i| Some(*i) != self.cursor)
            .chain(self.cursor.filter(|i| *i < self.options.len()));
        for i in order {
            let option = &self.options[i];
            let points: Vec<_> = option.preview_polyline.iter().copied().map(to_point2d).collect();
            if Some(i) == self.cursor {
                host.draw_preview_polyline_world(&points, p.highlight_color, p.highlight_thickness, p.highlight_opacity);
                host.draw_preview_point_world(
                    to_point2d(option.intersection_point),
                    p.intersection_point_color,
                    p.point_diameter,
                    p.highlight_opacity,
                );
            } else {
                host.draw_preview_polyline_world(&points, p.candidate_color, p.candidate_thickness, p.candidate_opacity);
            }
        }
    }
}

/// Modal trim: open a session and let `driver` cycle until Keep or Cancel
pub fn run_trim(
    target: Option<&Pick>,
    cutter: Option<&Pick>,
    settings: &ToolSettings,
    host: &mut dyn PreviewHost,
    driver: &mut dyn SessionDriver,
) -> ToolOutcome {
    let mut session = match TrimSession::open(target, cutter, settings, host) {
        Ok(s) => s,
        Err(e) => return ToolOutcome::rejected(e),
    };

    loop {
        let action = driver.next_action(&session.view()).unwrap_or(SessionAction::Cancel);
        match action {
            SessionAction::SetRadius(_) => {}
            SessionAction::Next => {
                let _ = session.cycle(host);
            }
            SessionAction::Prev => {
                let _ = session.cycle_back(host);
            }
            SessionAction::Keep => {
                if let Ok((index, text)) = session.keep(host) {
                    return ToolOutcome::accepted(Some(index), text, session.status());
                }
            }
            SessionAction::Cancel => {
                let _ = session.cancel(host);
                return ToolOutcome::cancelled();
            }
        }
    }
}
