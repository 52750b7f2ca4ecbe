// src/notify.rs
//
// One notification channel for both flows. The controller renders every
// notice inline on the page; frontends that need to mirror it elsewhere
// (CLI stderr, GUI status line) implement `Notifier`.

use std::path::Path;

use crate::config::consts::{ERROR, EXPORT_ERROR, EXPORT_LOADING, LOADING, PREFIX_EXPORT_ERROR, PREFIX_EXTRACT_ERROR};
use crate::error::FlowError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flow {
    Extract,
    Export,
}

impl Flow {
    /// Element that shows this flow's busy indicator.
    pub fn loading_id(self) -> &'static str {
        match self {
            Flow::Extract => LOADING,
            Flow::Export => EXPORT_LOADING,
        }
    }

    /// Element that shows this flow's error text.
    pub fn error_id(self) -> &'static str {
        match self {
            Flow::Extract => ERROR,
            Flow::Export => EXPORT_ERROR,
        }
    }

    /// User-facing text for a failed action.
    pub fn message(self, err: &FlowError) -> String {
        match (self, err) {
            // Validation text stands alone.
            (_, FlowError::InvalidCourseUrl) => err.to_string(),
            (Flow::Extract, _) => format!("{PREFIX_EXTRACT_ERROR}{err}"),
            (Flow::Export, _) => format!("{PREFIX_EXPORT_ERROR}{err}"),
        }
    }
}

/// Frontend hooks. All methods default to no-ops.
pub trait Notifier {
    /// A flow became busy (`true`) or settled (`false`).
    fn busy(&mut self, _flow: Flow, _busy: bool) {}

    /// A flow ended with a user-facing error message.
    fn error(&mut self, _flow: Flow, _message: &str) {}

    /// Extract finished and the page was replaced.
    fn rendered(&mut self, _title: Option<&str>) {}

    /// Export finished and the file was saved.
    fn downloaded(&mut self, _path: &Path) {}
}

/// A no-op notifier.
pub struct NullNotifier;
impl Notifier for NullNotifier {}
