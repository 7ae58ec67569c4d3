use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::io::atomic::atomic_write;
use crate::ops::range::{DateRange, QuickRange};

pub const STATE_FILE: &str = ".dayline-state.json";

/// View state carried between `dl timeline` runs (written to .dayline-state.json)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Last zoom level used
    #[serde(default)]
    pub zoom: Option<f64>,
    /// Last quick preset chosen, if the range came from one
    #[serde(default)]
    pub last_preset: Option<QuickRange>,
    /// Last range shown; `--prev`/`--next` step from here
    #[serde(default)]
    pub last_range: Option<DateRange>,
}

/// Read the view state from the vault root. Missing or malformed files give `None`.
pub fn read_view_state(root: &Path) -> Option<ViewState> {
    let content = std::fs::read_to_string(root.join(STATE_FILE)).ok()?;
    serde_json::from_str(&content).ok()
}

pub fn write_view_state(root: &Path, state: &ViewState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    atomic_write(&root.join(STATE_FILE), content.as_bytes())
}
