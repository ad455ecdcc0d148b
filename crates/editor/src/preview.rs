//! Preview host interface
//!
//! Sessions draw candidates through a `PreviewHost` in world coordinates
//! (X = radius, Z = axial); pixel mapping stays with the host.

use shared::Point2D;

/// RGB color
pub type Rgb = [u8; 3];

/// Rendering callbacks a host offers to a tool session
pub trait PreviewHost {
    /// False while the world-to-screen mapping is unusable; sessions skip drawing.
    fn is_mapping_valid(&self) -> bool {
        true
    }

    /// Remove transient preview geometry only, never the profile itself.
    fn clear_preview_only(&mut self);

    fn draw_preview_polyline_world(&mut self, points: &[Point2D], stroke: Rgb, thickness: f32, opacity: f32);

    fn draw_preview_point_world(&mut self, point: Point2D, fill: Rgb, diameter_px: f32, opacity: f32);

    /// Optional diagnostic log viewer
    fn show_log(&mut self, _title: &str, _text: &str) {}
}

/// Host that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPreview;

impl PreviewHost for NullPreview {
    fn clear_preview_only(&mut self) {}

    fn draw_preview_polyline_world(&mut self, _points: &[Point2D], _stroke: Rgb, _thickness: f32, _opacity: f32) {}

    fn draw_preview_point_world(&mut self, _point: Point2D, _fill: Rgb, _diameter_px: f32, _opacity: f32) {}
}

/// One recorded host call
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewCall {
    Clear,
    Polyline {
        points: Vec<Point2D>,
        stroke: Rgb,
        thickness: f32,
        opacity: f32,
    },
    Point {
        point: Point2D,
        fill: Rgb,
        diameter_px: f32,
        opacity: f32,
    },
    Log {
        title: String,
        text: String,
    },
}

/// Host that records every call, for the harness and tests
#[derive(Debug, Clone)]
pub struct RecordingPreview {
    pub calls: Vec<PreviewCall>,
    pub mapping_valid: bool,
}

impl Default for RecordingPreview {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            mapping_valid: true,
        }
    }
}

impl RecordingPreview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.calls.clear();
    }

    /// Calls recorded since the last `Clear`
    pub fn current_frame(&self) -> &[PreviewCall] {
        match self.calls.iter().rposition(|c| matches!(c, PreviewCall::Clear)) {
            Some(i) => &self.calls[i + 1..],
            None => &self.calls,
        }
    }

    pub fn polyline_count(&self) -> usize {
        self.current_frame()
            .iter()
            .filter(|c| matches!(c, PreviewCall::Polyline { .. }))
            .count()
    }

    pub fn point_count(&self) -> usize {
        self.current_frame()
            .iter()
            .filter(|c| matches!(c, PreviewCall::Point { .. }))
            .count()
    }

    pub fn clear_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, PreviewCall::Clear)).count()
    }

    /// Text of the most recent log shown
    pub fn last_log(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            PreviewCall::Log { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl PreviewHost for RecordingPreview {
    fn is_mapping_valid(&self) -> bool {
        self.mapping_valid
    }

    fn clear_preview_only(&mut self) {
        self.calls.push(PreviewCall::Clear);
    }

    fn draw_preview_polyline_world(&mut self, points: &[Point2D], stroke: Rgb, thickness: f32, opacity: f32) {
        self.calls.push(PreviewCall::Polyline {
            points: points.to_vec(),
            stroke,
            thickness,
            opacity,
        });
    }

    fn draw_preview_point_world(&mut self, point: Point2D, fill: Rgb, diameter_px: f32, opacity: f32) {
        self.calls.push(PreviewCall::Point {
            point,
            fill,
            diameter_px,
            opacity,
        });
    }

    fn show_log(&mut self, title: &str, text: &str) {
        self.calls.push(PreviewCall::Log {
            title: title.to_string(),
            text: text.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_frame_starts_after_clear() {
        let mut rec = RecordingPreview::new();
        rec.draw_preview_point_world(Point2D::new(0.0, 0.0), [1, 2, 3], 6.0, 1.0);
        rec.clear_preview_only();
        rec.draw_preview_polyline_world(&[Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0)], [0, 0, 0], 2.0, 1.0);
        assert_eq!(rec.polyline_count(), 1);
        assert_eq!(rec.point_count(), 0);
        assert_eq!(rec.clear_count(), 1);
    }

    #[test]
    fn test_log_recorded() {
        let mut rec = RecordingPreview::new();
        rec.show_log("Fillet", "candidates=2");
        assert_eq!(rec.last_log(), Some("candidates=2"));
    }
}
