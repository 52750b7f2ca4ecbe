// src/config/options.rs
use std::path::{Path, PathBuf};

use url::Url;

use super::consts::*;
use super::settings::Settings;
use crate::error::NetError;

/// Resolved runtime options shared by both frontends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientOptions {
    pub server: Url,
    pub download_dir: PathBuf,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            // Constant is a valid absolute URL.
            server: Url::parse(DEFAULT_SERVER).expect("DEFAULT_SERVER parses"),
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
        }
    }
}

impl ClientOptions {
    pub fn from_settings(settings: &Settings) -> Result<Self, NetError> {
        let mut opts = Self::default();
        opts.set_server(&settings.server)?;
        opts.set_download_dir(&settings.download_dir);
        Ok(opts)
    }

    pub fn set_server(&mut self, text: &str) -> Result<(), NetError> {
        let text = text.trim();
        let url = Url::parse(text).map_err(|e| NetError::BadServer(format!("{text}: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(NetError::BadServer(s!(text)));
        }
        self.server = url;
        Ok(())
    }

    /// Empty text keeps the current directory.
    pub fn set_download_dir(&mut self, text: &str) {
        let s = text.trim();
        if !s.is_empty() {
            self.download_dir = PathBuf::from(s);
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Mirror back into persisted settings, keeping fields we don't own.
    pub fn write_into(&self, settings: &mut Settings) {
        settings.server = self.server.as_str().trim_end_matches('/').to_string();
        settings.download_dir = self.download_dir.to_string_lossy().into_owned();
    }
}
