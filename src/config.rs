//! User configuration — the listing file remembered from the previous run.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/dump-tree/config.toml` (default
//! `~/.config/dump-tree/config.toml`).  Remembering the last opened listing
//! lets `dump-tree` with no argument reopen it.

use std::path::PathBuf;

/// Persisted application settings.
#[derive(Debug, Default)]
pub struct AppConfig {
    /// Listing file opened last time, if any.
    pub last_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                return Self::parse_config(&contents);
            }
        }
        Self::default()
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();
        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            if key.trim() == "last_file" {
                let value = value.trim().trim_matches('"');
                if !value.is_empty() {
                    config.last_file = Some(PathBuf::from(value));
                }
            }
        }
        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec!["# dump-tree configuration".to_string(), String::new()];
        if let Some(ref file) = self.last_file {
            lines.push(format!("last_file = \"{}\"", file.display()));
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/dump-tree/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("dump-tree").join("config.toml")
}
