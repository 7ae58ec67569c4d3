use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, warn};

use crate::model::config::Settings;
use crate::model::note::DailyNote;
use crate::model::vault::Vault;
use crate::ops::range::DateRange;
use crate::parse::{date_from_filename, parse_note_tasks};

/// Name of the vault config file, at the vault root
pub const CONFIG_FILE: &str = "dayline.toml";

/// Error type for vault I/O operations
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("not a dayline vault: no {CONFIG_FILE} found")]
    NotAVault,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {CONFIG_FILE}: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not parse {CONFIG_FILE} for editing: {0}")]
    ConfigEditError(#[from] toml_edit::TomlError),
    #[error("invalid config key '{0}': expected section.key")]
    InvalidKey(String),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Find the vault root by walking up from `start` until a directory
/// containing `dayline.toml` is found.
pub fn discover_vault(start: &Path) -> Result<PathBuf, VaultError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).is_file() {
            debug!(root = %current.display(), "found vault");
            return Ok(current);
        }
        if !current.pop() {
            return Err(VaultError::NotAVault);
        }
    }
}

/// Read the vault's config. The notes themselves are loaded on demand.
pub fn load_vault(root: &Path) -> Result<Vault, VaultError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.is_file() {
        return Err(VaultError::NotAVault);
    }
    let text = fs::read_to_string(&config_path).map_err(|e| VaultError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let settings: Settings = toml::from_str(&text)?;

    Ok(Vault {
        root: root.to_path_buf(),
        settings,
    })
}

/// Load the daily notes dated within `range` that contain at least one task,
/// sorted by date.
///
/// Notes that cannot be read are skipped with a warning.
#[tracing::instrument(skip(vault), fields(root = %vault.root.display()))]
pub fn load_daily_notes(vault: &Vault, range: &DateRange) -> Result<Vec<DailyNote>, VaultError> {
    let mut notes = Vec::new();
    for (date, path) in note_files(vault)? {
        if !range.contains(date) {
            continue;
        }
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable note");
                continue;
            }
        };
        let tasks = parse_note_tasks(&text, Some(date));
        if tasks.is_empty() {
            continue;
        }
        let rel = path.strip_prefix(&vault.root).unwrap_or(&path).to_path_buf();
        notes.push(DailyNote {
            date,
            path: rel,
            tasks,
        });
    }
    notes.sort_by_key(|n| n.date);

    info!(notes = notes.len(), %range, "loaded daily notes");
    Ok(notes)
}

/// Distinct `(year, month)` pairs that have a dated note, newest first
pub fn available_months(vault: &Vault) -> Result<Vec<(i32, u32)>, VaultError> {
    let mut months: Vec<(i32, u32)> = note_files(vault)?
        .into_iter()
        .map(|(date, _)| (date.year(), date.month()))
        .collect();
    months.sort_unstable_by(|a, b| b.cmp(a));
    months.dedup();
    Ok(months)
}

/// Every `.md` file under the notes folder whose name carries a date.
/// Hidden directories are not descended into.
fn note_files(vault: &Vault) -> Result<Vec<(NaiveDate, PathBuf)>, VaultError> {
    let dir = vault.notes_dir();
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "notes folder does not exist");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let mut pending = vec![dir];
    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(|e| VaultError::ReadError {
            path: dir.clone(),
            source: e,
        })?;
        for entry in entries {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            if path.is_dir() {
                pending.push(path);
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            match date_from_filename(name, &vault.settings.notes.date_format) {
                Some(date) => files.push((date, path)),
                None => debug!(file = name, "no date in file name"),
            }
        }
    }
    Ok(files)
}
