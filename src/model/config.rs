use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Configuration from dayline.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub notes: NotesConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub zoom: ZoomConfig,
    #[serde(default)]
    pub view: ViewConfig,
    /// Per-tag dot colour and emoji, keyed by tag name without `#`.
    /// Order is preserved so the legend prints in file order.
    #[serde(default)]
    pub tag_styles: IndexMap<String, TagStyle>,
}

impl Settings {
    pub fn tag_style(&self, tag: Option<&str>) -> Option<&TagStyle> {
        tag.and_then(|t| self.tag_styles.get(t))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesConfig {
    /// Folder holding daily notes, relative to the vault root. Empty = root.
    #[serde(default)]
    pub folder: String,
    /// `YYYY-MM-DD` extracts the date from anywhere in the filename;
    /// any other value uses the whole filename stem.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_range_months")]
    pub default_range_months: u32,
}

impl Default for NotesConfig {
    fn default() -> Self {
        NotesConfig {
            folder: String::new(),
            date_format: default_date_format(),
            default_range_months: default_range_months(),
        }
    }
}

fn default_date_format() -> String {
    "YYYY-MM-DD".to_string()
}

fn default_range_months() -> u32 {
    1
}

/// Clustering thresholds, in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_true")]
    pub enable_grouping: bool,
    /// Neighbouring dots closer than this merge
    #[serde(default = "default_min_spacing")]
    pub min_spacing_pixels: f64,
    /// A cluster never spans this many pixels or more
    #[serde(default = "default_max_group_span")]
    pub max_group_span_pixels: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            enable_grouping: true,
            min_spacing_pixels: default_min_spacing(),
            max_group_span_pixels: default_max_group_span(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_min_spacing() -> f64 {
    25.0
}

fn default_max_group_span() -> f64 {
    60.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    #[serde(default = "default_zoom_min")]
    pub min: f64,
    #[serde(default = "default_zoom_max")]
    pub max: f64,
    #[serde(default = "default_zoom_default")]
    pub default: f64,
    #[serde(default = "default_zoom_step")]
    pub step: f64,
    /// Width of one day at zoom 1.0
    #[serde(default = "default_base_segment_width")]
    pub base_segment_width: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        ZoomConfig {
            min: default_zoom_min(),
            max: default_zoom_max(),
            default: default_zoom_default(),
            step: default_zoom_step(),
            base_segment_width: default_base_segment_width(),
        }
    }
}

fn default_zoom_min() -> f64 {
    0.7
}

fn default_zoom_max() -> f64 {
    10.0
}

fn default_zoom_default() -> f64 {
    1.0
}

fn default_zoom_step() -> f64 {
    0.5
}

fn default_base_segment_width() -> f64 {
    200.0
}

/// How the default range is chosen when no range flag is given
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Month,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub mode: ViewMode,
    /// `YYYY-MM-DD` or `DD.MM.YYYY`, used in custom mode
    #[serde(default)]
    pub custom_start: String,
    #[serde(default)]
    pub custom_end: String,
    /// Quick preset used in custom mode when no explicit dates are set
    /// (`last-7`, `this-week`, ...), or `custom`
    #[serde(default = "default_last_preset")]
    pub last_preset: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            mode: ViewMode::Month,
            custom_start: String::new(),
            custom_end: String::new(),
            last_preset: default_last_preset(),
        }
    }
}

fn default_last_preset() -> String {
    "custom".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagStyle {
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub emoji: String,
}
