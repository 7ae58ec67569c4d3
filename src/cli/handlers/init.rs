use std::path::{Component, Path};

use tracing::info;

use crate::cli::commands::InitArgs;
use crate::io::atomic::atomic_write;
use crate::io::vault_io::{self, CONFIG_FILE};

const DAYLINE_TOML_TEMPLATE: &str = r##"[notes]
# Folder holding daily notes, relative to this file. "" = this directory.
folder = {folder}
# YYYY-MM-DD finds the date anywhere in the file name; any other value
# requires the whole name (without .md) to be the date.
date_format = "YYYY-MM-DD"
# Months shown by `dl timeline` in month mode
default_range_months = 1

[layout]
enable_grouping = true
# Dots closer than this many pixels merge into a cluster
min_spacing_pixels = 25.0
# A cluster never spans this many pixels or more
max_group_span_pixels = 60.0

[view]
mode = "month"                # month | custom
custom_start = ""
custom_end = ""
last_preset = "custom"        # custom | last-7 | last-30 | this-week | this-month | last-3m

# --- Zoom ---
# Uncomment to override defaults.
#
# [zoom]
# min = 0.7
# max = 10.0
# default = 1.0
# step = 0.5
# base_segment_width = 200.0

# --- Tag styles ---
# Keyed by the first #tag of a task.
#
# [tag_styles.work]
# color = "#4488FF"
# emoji = "💼"
#
# [tag_styles.sport]
# color = "#44FF88"
# emoji = "🏃"
"##;

/// The notes folder must stay inside the vault.
fn validate_folder(folder: &str) -> Result<(), String> {
    let path = Path::new(folder);
    if path.is_absolute() {
        return Err(format!("notes folder \"{}\" must be relative to the vault", folder));
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(format!("notes folder \"{}\" may not contain \"..\"", folder));
    }
    Ok(())
}

fn render_config(folder: &str) -> String {
    let quoted = toml_edit::Value::from(folder).to_string();
    DAYLINE_TOML_TEMPLATE.replace("{folder}", &quoted)
}

pub fn cmd_init(args: InitArgs, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() && !args.force {
        return Err(format!("{} already exists (use --force to overwrite)", CONFIG_FILE).into());
    }

    if let Some(parent) = dir.parent()
        && let Ok(outer) = vault_io::discover_vault(parent)
    {
        eprintln!("Note: enclosing vault found at {}/", outer.display());
    }

    let folder = args.folder.as_deref().unwrap_or("").trim_matches('/');
    validate_folder(folder)?;

    atomic_write(&config_path, render_config(folder).as_bytes())?;
    info!(path = %config_path.display(), "wrote config");

    println!("Initialized dayline vault in {}", dir.display());
    if !folder.is_empty() {
        println!("  notes folder: {}", folder);
        if !dir.join(folder).is_dir() {
            println!("  (folder does not exist yet)");
        }
    }
    Ok(())
}
