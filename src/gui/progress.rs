// src/gui/progress.rs
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::notify::{Flow, Notifier};

/// Mirrors flow notices into the status line at the bottom of the window.
pub struct GuiProgress {
    status: Arc<Mutex<String>>,
}

impl GuiProgress {
    pub fn new(status: Arc<Mutex<String>>) -> Self {
        Self { status }
    }

    fn set_status(&self, msg: impl Into<String>) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }
}

impl Notifier for GuiProgress {
    fn busy(&mut self, flow: Flow, busy: bool) {
        if busy {
            self.set_status(match flow {
                Flow::Extract => "Extracting course data…",
                Flow::Export => "Exporting…",
            });
        }
    }

    fn error(&mut self, _flow: Flow, message: &str) {
        self.set_status(message);
    }

    fn rendered(&mut self, title: Option<&str>) {
        self.set_status(format!("Loaded {}", title.unwrap_or("results")));
    }

    fn downloaded(&mut self, path: &Path) {
        self.set_status(format!("Saved {}", path.display()));
    }
}
