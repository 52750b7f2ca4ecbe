// src/config/settings.rs
//
// Persisted frontend settings. The API key is never written to disk.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use super::consts::{DEFAULT_DOWNLOAD_DIR, DEFAULT_SERVER};
use crate::error::ClientError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: String,
    pub download_dir: String,
    pub last_course_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: s!(DEFAULT_SERVER),
            download_dir: s!(DEFAULT_DOWNLOAD_DIR),
            last_course_url: s!(),
        }
    }
}

/// Missing or unreadable settings fall back to defaults.
pub fn load(path: &Path) -> Settings {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            logd!("Settings: {} not loaded ({})", path.display(), e);
            return Settings::default();
        }
    };
    match serde_json::from_str(&text) {
        Ok(s) => s,
        Err(e) => {
            loge!("Settings: {} is malformed ({}), using defaults", path.display(), e);
            Settings::default()
        }
    }
}

pub fn save(path: &Path, settings: &Settings) -> Result<(), ClientError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let text = serde_json::to_string_pretty(settings)?;
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = load(&dir.path().join("nope.json"));
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("settings.json");
        fs::write(&p, r#"{"server":"http://localhost:8080"}"#).unwrap();
        let s = load(&p);
        assert_eq!(s.server, "http://localhost:8080");
        assert_eq!(s.download_dir, DEFAULT_DOWNLOAD_DIR);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("nested").join("settings.json");
        let s = Settings {
            server: s!("http://example.test"),
            download_dir: s!("out"),
            last_course_url: s!("https://canvas.example.edu/courses/1"),
        };
        save(&p, &s).unwrap();
        assert_eq!(load(&p), s);
    }
}
