use serde::{Deserialize, Serialize};

use crate::model::config::ZoomConfig;

/// Current zoom of a timeline view. Always within the config's `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomState {
    pub level: f64,
}

impl ZoomState {
    pub fn new(config: &ZoomConfig) -> Self {
        ZoomState {
            level: clamp(config.default, config),
        }
    }

    /// Set an explicit level, clamped into range
    pub fn set(&mut self, level: f64, config: &ZoomConfig) {
        self.level = clamp(level, config);
    }

    pub fn zoom_in(&mut self, config: &ZoomConfig) {
        self.set(self.level + config.step, config);
    }

    pub fn zoom_out(&mut self, config: &ZoomConfig) {
        self.set(self.level - config.step, config);
    }

    /// Back to the default level; done on every range navigation
    pub fn reset(&mut self, config: &ZoomConfig) {
        *self = ZoomState::new(config);
    }

    /// Pixel width of one day segment at this zoom
    pub fn segment_width(&self, config: &ZoomConfig) -> f64 {
        config.base_segment_width * self.level
    }

    /// `150%` style label
    pub fn percent_label(&self) -> String {
        format!("{}%", (self.level * 100.0).round() as i64)
    }
}

fn clamp(level: f64, config: &ZoomConfig) -> f64 {
    level.max(config.min).min(config.max)
}

/// Scroll offset that keeps the same content point under the anchor after
/// the content width changes.
///
/// `anchor` is a viewport-relative x; `None` anchors at the viewport centre.
/// The result is never negative.
pub fn anchored_scroll(
    scroll_left: f64,
    viewport_width: f64,
    old_content_width: f64,
    new_content_width: f64,
    anchor: Option<f64>,
) -> f64 {
    if old_content_width <= 0.0 {
        return 0.0;
    }
    let anchor_x = anchor.unwrap_or(viewport_width / 2.0);
    let ratio = (scroll_left + anchor_x) / old_content_width;
    (ratio * new_content_width - anchor_x).max(0.0)
}
