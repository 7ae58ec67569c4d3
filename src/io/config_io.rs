use std::fs;
use std::path::Path;

use toml_edit::{DocumentMut, Item, Table, Value};
use tracing::debug;

use crate::io::atomic::atomic_write;
use crate::io::vault_io::{CONFIG_FILE, VaultError};
use crate::model::config::Settings;

/// Read the vault config, returning both the parsed settings and the raw
/// toml_edit document for round-trip-safe editing.
pub fn read_config(root: &Path) -> Result<(Settings, DocumentMut), VaultError> {
    let config_path = root.join(CONFIG_FILE);
    let text = fs::read_to_string(&config_path).map_err(|e| VaultError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let settings: Settings = toml::from_str(&text)?;
    let doc: DocumentMut = text.parse()?;
    Ok((settings, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(root: &Path, doc: &DocumentMut) -> Result<(), VaultError> {
    let config_path = root.join(CONFIG_FILE);
    atomic_write(&config_path, doc.to_string().as_bytes())?;
    debug!(path = %config_path.display(), "wrote config");
    Ok(())
}

/// Look up a dotted key such as `layout.min_spacing_pixels`
pub fn get_value(doc: &DocumentMut, key: &str) -> Option<String> {
    let mut item = doc.as_item();
    for part in key.split('.') {
        item = item.get(part)?;
    }
    item.as_value().map(|v| match v.as_str() {
        Some(s) => s.to_string(),
        None => v.clone().decorated("", "").to_string(),
    })
}

/// Set a scalar at a dotted key, creating missing tables.
///
/// The type is inferred from the text: `true`/`false`, an integer, a float,
/// or else a string. An integer written over a float stays a float. The
/// comments around an existing value are kept.
pub fn set_value(doc: &mut DocumentMut, key: &str, raw: &str) -> Result<(), VaultError> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((last, sections)) = parts.split_last() else {
        return Err(VaultError::InvalidKey(key.to_string()));
    };
    if sections.is_empty() || parts.iter().any(|p| p.is_empty()) {
        return Err(VaultError::InvalidKey(key.to_string()));
    }

    let mut table: &mut Table = doc.as_table_mut();
    for section in sections {
        table = table
            .entry(section)
            .or_insert_with(|| {
                let mut t = Table::new();
                t.set_implicit(true);
                Item::Table(t)
            })
            .as_table_mut()
            .ok_or_else(|| VaultError::InvalidKey(key.to_string()))?;
    }

    let was_float = table.get(last).and_then(|i| i.as_float()).is_some();
    let new = infer_value(raw, was_float);
    match table.get_mut(last).and_then(|i| i.as_value_mut()) {
        Some(existing) => {
            let decor = existing.decor().clone();
            *existing = new;
            *existing.decor_mut() = decor;
        }
        None => {
            table.insert(last, Item::Value(new));
        }
    }
    Ok(())
}

fn infer_value(raw: &str, prefer_float: bool) -> Value {
    let raw = raw.trim();
    if let Ok(b) = raw.parse::<bool>() {
        return Value::from(b);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return if prefer_float {
            Value::from(i as f64)
        } else {
            Value::from(i)
        };
    }
    if let Ok(f) = raw.parse::<f64>()
        && f.is_finite()
    {
        return Value::from(f);
    }
    Value::from(raw)
}
