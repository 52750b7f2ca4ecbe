// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use canvas_roster::controller::PageController;
use canvas_roster::core::net::{HttpResponse, Transport};
use canvas_roster::download::DownloadSink;
use canvas_roster::error::NetError;
use canvas_roster::page::{FormData, Page};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sent {
    Get(String),
    Form(String, Vec<(String, String)>),
    Json(String, Vec<u8>),
}

/// Answers requests from a queue and remembers what was asked.
#[derive(Default)]
pub struct FakeTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, NetError>>>,
    sent: Mutex<Vec<Sent>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, resp: HttpResponse) {
        self.replies.lock().unwrap().push_back(Ok(resp));
    }

    pub fn fail(&self, err: NetError) {
        self.replies.lock().unwrap().push_back(Err(err));
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn answer(&self, sent: Sent) -> Result<HttpResponse, NetError> {
        self.sent.lock().unwrap().push(sent);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(NetError::BadServer("no scripted reply".into())))
    }
}

impl Transport for FakeTransport {
    fn get(&self, path: &str) -> Result<HttpResponse, NetError> {
        self.answer(Sent::Get(path.into()))
    }

    fn post_form(&self, path: &str, form: &FormData) -> Result<HttpResponse, NetError> {
        let pairs = form.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        self.answer(Sent::Form(path.into(), pairs))
    }

    fn post_json(&self, path: &str, body: Vec<u8>) -> Result<HttpResponse, NetError> {
        self.answer(Sent::Json(path.into(), body))
    }
}

/// Keeps every download in memory.
#[derive(Clone, Default)]
pub struct MemDownloads {
    pub saved: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl MemDownloads {
    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().unwrap().clone()
    }
}

impl DownloadSink for MemDownloads {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        self.saved.lock().unwrap().push((filename.into(), bytes.to_vec()));
        Ok(PathBuf::from("mem").join(filename))
    }
}

/// A download folder that is always full.
pub struct FullDisk;

impl DownloadSink for FullDisk {
    fn save(&mut self, _filename: &str, _bytes: &[u8]) -> io::Result<PathBuf> {
        Err(io::Error::other("disk full"))
    }
}

pub const RESULTS_HTML: &str = r#"<!DOCTYPE html>
<html><head><title>Course Data</title></head><body>
  <h1>Course Data</h1>
  <h2>Students</h2>
  <table>
    <thead><tr><th>ID</th><th>Name</th><th>Email</th><th>Groups</th></tr></thead>
    <tbody>
      <tr><td>101</td><td>Alice</td><td>a@x.edu</td><td>TeamX, TeamY</td></tr>
      <tr><td>102</td><td>Bob</td><td>b@x.edu</td><td>No Group</td></tr>
    </tbody>
  </table>
  <h2>Groups</h2>
  <table>
    <thead><tr><th>ID</th><th>Name</th><th>Members</th></tr></thead>
    <tbody>
      <tr><td>7</td><td>TeamX</td><td>3</td></tr>
      <tr><td>8</td><td>TeamY</td><td>n/a</td></tr>
    </tbody>
  </table>
  <button id="exportBtn">Export to CSV</button>
  <div id="exportLoading" style="display: none;"><p>Exporting...</p></div>
  <div id="exportError" style="display: none;"></div>
</body></html>"#;

pub fn controller(page: Page, transport: &Arc<FakeTransport>) -> (PageController, MemDownloads) {
    let downloads = MemDownloads::default();
    let t: Arc<dyn Transport> = transport.clone();
    let ctl = PageController::new(page, t, Box::new(downloads.clone()));
    (ctl, downloads)
}

pub fn form_value<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
}
