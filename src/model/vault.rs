use std::path::PathBuf;

use super::config::Settings;

/// A loaded notes vault
#[derive(Debug)]
pub struct Vault {
    /// Directory holding dayline.toml
    pub root: PathBuf,
    /// Parsed dayline.toml
    pub settings: Settings,
}

impl Vault {
    /// Absolute path of the daily notes folder
    pub fn notes_dir(&self) -> PathBuf {
        let folder = self.settings.notes.folder.trim_matches('/');
        if folder.is_empty() {
            self.root.clone()
        } else {
            self.root.join(folder)
        }
    }
}
