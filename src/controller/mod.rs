// src/controller/mod.rs
//! # Page controller
//!
//! Owns one `Page` and reacts to user events on it. Two flows exist:
//!
//! - **extract** (`submit` on `#extractForm`): validate the course URL, post
//!   the form to `/extract`, replace the page with the returned markup.
//! - **export** (`click` on `#exportBtn`): scrape the tables, post them to
//!   `/export`, save the returned file.
//!
//! ## Event delegation
//! Events carry the target id and are matched against the page as it is
//! *now*. Nothing is bound to elements, so replacing the page cannot leave a
//! stale handler behind and nothing needs re-registering after extract.
//!
//! ## Phases
//! ```text
//! dispatch(event) ──► Dispatch::Started(Pending)   UI thread: indicators, validation, scrape
//!                        │
//!              Pending::send(&dyn Transport)       any thread: the HTTP call
//!                        │
//! settle(Settled) ◄──────┘                         UI thread: apply result, unwind
//! ```
//! `settle` always unwinds the flow's busy state (indicator hidden, button
//! re-enabled, in-flight guard released), whatever the result.
//! `run` chains all three for callers that can block.

mod export;
mod extract;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

use crate::config::consts::{
    EXPORT_BTN, EXPORT_PATH, EXTRACT_FORM, EXTRACT_PATH, FIELD_API_KEY, FIELD_COURSE_URL, INDEX_PATH,
};
use crate::core::net::{HttpResponse, Transport};
use crate::download::{BlobStore, DownloadSink};
use crate::error::{FlowError, NetError};
use crate::notify::{Flow, Notifier, NullNotifier};
use crate::page::{FormData, Page};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Submit { form: String },
    Click { target: String },
}

impl Event {
    pub fn submit(form: &str) -> Self {
        Event::Submit { form: s!(form) }
    }

    pub fn click(target: &str) -> Self {
        Event::Click { target: s!(target) }
    }
}

/// What `dispatch` did with an event.
#[derive(Debug)]
pub enum Dispatch {
    /// No handler for the target, or the flow is already running.
    Ignored,
    /// Failed before any request; already rendered on the page.
    Rejected(FlowError),
    /// Request ready to send.
    Started(Pending),
}

/// A request waiting for the network. `Send`, so it can go to a worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pending {
    Extract(FormData),
    Export(Vec<u8>),
}

impl Pending {
    pub fn flow(&self) -> Flow {
        match self {
            Pending::Extract(_) => Flow::Extract,
            Pending::Export(_) => Flow::Export,
        }
    }

    pub fn send(self, transport: &dyn Transport) -> Settled {
        match self {
            Pending::Extract(form) => Settled {
                flow: Flow::Extract,
                result: transport.post_form(EXTRACT_PATH, &form),
            },
            Pending::Export(body) => Settled {
                flow: Flow::Export,
                result: transport.post_json(EXPORT_PATH, body),
            },
        }
    }
}

/// A finished (or abandoned) request, ready to apply to the page.
#[derive(Debug)]
pub struct Settled {
    pub flow: Flow,
    pub result: Result<HttpResponse, NetError>,
}

impl Settled {
    /// The request never produced a response (worker died, channel closed).
    pub fn aborted(flow: Flow) -> Self {
        Self { flow, result: Err(NetError::Aborted) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Rendered,
    Downloaded(PathBuf),
}

pub struct PageController {
    page: Page,
    transport: Arc<dyn Transport>,
    downloads: Box<dyn DownloadSink>,
    notifier: Box<dyn Notifier>,
    blobs: BlobStore,
    in_flight: HashSet<Flow>,
}

impl PageController {
    pub fn new(page: Page, transport: Arc<dyn Transport>, downloads: Box<dyn DownloadSink>) -> Self {
        Self {
            page,
            transport,
            downloads,
            notifier: Box::new(NullNotifier),
            blobs: BlobStore::new(),
            in_flight: HashSet::new(),
        }
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Requests already sent keep the transport they were sent with.
    pub fn set_transport(&mut self, transport: Arc<dyn Transport>) {
        self.transport = transport;
    }

    pub fn set_downloads(&mut self, downloads: Box<dyn DownloadSink>) {
        self.downloads = downloads;
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    pub fn is_busy(&self, flow: Flow) -> bool {
        self.in_flight.contains(&flow)
    }

    /// Route an event to its flow by looking the target up on the current page.
    pub fn dispatch(&mut self, event: &Event) -> Dispatch {
        match event {
            Event::Submit { form } if form == EXTRACT_FORM && self.page.contains(form) => {
                self.begin_extract()
            }
            Event::Click { target } if target == EXPORT_BTN && self.page.contains(target) => {
                if self.page.is_disabled(target) {
                    logd!("Event: click on disabled #{}", target);
                    return Dispatch::Ignored;
                }
                self.begin_export()
            }
            _ => {
                logd!("Event: no handler for {:?}", event);
                Dispatch::Ignored
            }
        }
    }

    /// Apply a finished request. Busy state is unwound on every path.
    pub fn settle(&mut self, settled: Settled) -> Result<Outcome, FlowError> {
        let Settled { flow, result } = settled;
        let outcome = match flow {
            Flow::Extract => self.finish_extract(result),
            Flow::Export => self.finish_export(result),
        };
        if let Err(e) = &outcome {
            loge!("{:?}: Error: {}", flow, e);
            self.report(flow, e);
        }
        self.leave(flow);
        outcome
    }

    /// Dispatch, send and settle in one go. `None` when the event was ignored.
    pub fn run(&mut self, event: &Event) -> Option<Result<Outcome, FlowError>> {
        match self.dispatch(event) {
            Dispatch::Ignored => None,
            Dispatch::Rejected(e) => Some(Err(e)),
            Dispatch::Started(pending) => {
                let transport = self.transport();
                let settled = pending.send(transport.as_ref());
                Some(self.settle(settled))
            }
        }
    }

    /// Swap in a start page. Course URL and API key typed so far survive.
    pub fn restart(&mut self, start: &Page) {
        let carried: Vec<(&str, String)> = [FIELD_COURSE_URL, FIELD_API_KEY]
            .into_iter()
            .filter_map(|name| Some((name, self.page.input(name).filter(|v| !v.is_empty())?)))
            .collect();
        self.page.replace_body(start.html());
        for (name, value) in carried {
            self.page.set_input(name, value);
        }
    }

    /* ---------- shared flow plumbing ---------- */

    fn enter(&mut self, flow: Flow) {
        self.in_flight.insert(flow);
        self.notifier.busy(flow, true);
    }

    fn leave(&mut self, flow: Flow) {
        self.page.hide(flow.loading_id());
        if flow == Flow::Export {
            self.page.set_disabled(EXPORT_BTN, false);
        }
        if self.in_flight.remove(&flow) {
            self.notifier.busy(flow, false);
        }
    }

    /// Render an error inline and mirror it to the notifier.
    fn report(&mut self, flow: Flow, err: &FlowError) {
        let msg = flow.message(err);
        self.page.set_text(flow.error_id(), msg.clone());
        self.page.show(flow.error_id());
        self.notifier.error(flow, &msg);
    }
}

/// `GET /`, or the built-in start page when the server can't provide one.
/// Blocks on the request; the GUI sends it from a worker and uses `start_page`.
pub fn load_start_page(transport: &dyn Transport) -> Page {
    start_page(transport.get(INDEX_PATH))
}

/// Page for the answer to `GET /`. Anything unusable gives the built-in page.
pub fn start_page(result: Result<HttpResponse, NetError>) -> Page {
    match result {
        Ok(resp) if resp.is_success() => {
            let page = Page::from_html(resp.text());
            if page.contains(EXTRACT_FORM) {
                logf!("Start: loaded index ({} bytes)", resp.body.len());
                return page;
            }
            logd!("Start: index has no #{}, using built-in page", EXTRACT_FORM);
        }
        Ok(resp) => logd!("Start: index returned {}, using built-in page", resp.status),
        Err(e) => logd!("Start: index unreachable ({}), using built-in page", e),
    }
    Page::default()
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<serde_json::Value>,
}

/// Error for a non-2xx response: the body's `error` string when there is a
/// usable one, `fallback` otherwise.
pub(crate) fn server_error(resp: &HttpResponse, fallback: &str) -> FlowError {
    let message = serde_json::from_slice::<ErrorBody>(&resp.body)
        .ok()
        .and_then(|b| match b.error {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
        .unwrap_or_else(|| s!(fallback));
    FlowError::Server { status: resp.status, message }
}
