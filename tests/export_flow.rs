// tests/export_flow.rs
mod common;

use std::sync::Arc;

use serde_json::{json, Value};

use canvas_roster::config::consts::*;
use canvas_roster::controller::{Dispatch, Event, Outcome, PageController};
use canvas_roster::core::net::{HttpResponse, Transport};
use canvas_roster::error::FlowError;
use canvas_roster::notify::Flow;
use canvas_roster::page::Page;

use common::{controller, FakeTransport, FullDisk, Sent, RESULTS_HTML};

fn results() -> Page {
    Page::from_html(RESULTS_HTML)
}

fn posted_json(t: &FakeTransport) -> Value {
    match t.sent().as_slice() {
        [Sent::Json(path, body)] => {
            assert_eq!(path, EXPORT_PATH);
            serde_json::from_slice(body).unwrap()
        }
        other => panic!("expected one JSON post, got {other:?}"),
    }
}

#[test]
fn payload_matches_tables() {
    let t = FakeTransport::new();
    t.reply(HttpResponse::new(200, "csv"));
    let (mut ctl, _) = controller(results(), &t);

    ctl.run(&Event::click(EXPORT_BTN)).unwrap().unwrap();

    let body = posted_json(&t);
    assert_eq!(
        body,
        json!({
            "students": [
                {"id": "101", "name": "Alice", "email": "a@x.edu", "groups": ["TeamX", "TeamY"]},
                {"id": "102", "name": "Bob", "email": "b@x.edu", "groups": []}
            ],
            "groups": [
                {"id": "7", "name": "TeamX", "members_count": 3},
                {"id": "8", "name": "TeamY", "members_count": null}
            ],
            "group_categories": []
        })
    );
}

#[test]
fn download_saved_once_and_url_revoked() {
    let t = FakeTransport::new();
    t.reply(HttpResponse::new(200, "id,name\n101,Alice\n").with_content_type("text/csv"));
    let (mut ctl, downloads) = controller(results(), &t);

    let res = ctl.run(&Event::click(EXPORT_BTN));
    assert!(matches!(res, Some(Ok(Outcome::Downloaded(_)))));

    let saved = downloads.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, EXPORT_FILENAME);
    assert_eq!(saved[0].1, b"id,name\n101,Alice\n");
    assert_eq!(ctl.blobs().live_count(), 0);

    let page = ctl.page();
    assert!(!page.is_visible(EXPORT_LOADING));
    assert!(!page.is_visible(EXPORT_ERROR));
    assert!(!page.is_disabled(EXPORT_BTN));
}

#[test]
fn server_error_is_prefixed() {
    let t = FakeTransport::new();
    t.reply(HttpResponse::new(500, r#"{"error": "quota exceeded"}"#));
    let (mut ctl, downloads) = controller(results(), &t);

    let res = ctl.run(&Event::click(EXPORT_BTN));
    assert!(matches!(res, Some(Err(FlowError::Server { status: 500, .. }))));
    assert_eq!(
        ctl.page().text(EXPORT_ERROR).as_deref(),
        Some("Export failed: quota exceeded")
    );
    assert!(ctl.page().is_visible(EXPORT_ERROR));
    assert!(downloads.saved().is_empty());
    assert!(!ctl.page().is_disabled(EXPORT_BTN));
}

#[test]
fn unreadable_error_body_uses_fallback() {
    let t = FakeTransport::new();
    t.reply(HttpResponse::new(503, "Service Unavailable"));
    let (mut ctl, _) = controller(results(), &t);

    ctl.run(&Event::click(EXPORT_BTN));
    assert_eq!(
        ctl.page().text(EXPORT_ERROR).as_deref(),
        Some("Export failed: Export failed")
    );
}

#[test]
fn short_row_stops_before_request() {
    let html = RESULTS_HTML.replace("<td>102</td><td>Bob</td>", "<td>102</td>");
    let t = FakeTransport::new();
    let (mut ctl, _) = controller(Page::from_html(html), &t);

    let res = ctl.run(&Event::click(EXPORT_BTN));
    assert!(matches!(res, Some(Err(FlowError::Scrape(_)))));
    assert!(t.sent().is_empty());

    let page = ctl.page();
    assert!(page.is_visible(EXPORT_ERROR));
    assert!(!page.is_visible(EXPORT_LOADING));
    assert!(!page.is_disabled(EXPORT_BTN));
    assert!(!ctl.is_busy(Flow::Export));
}

#[test]
fn button_disabled_while_pending() {
    let t = FakeTransport::new();
    let (mut ctl, downloads) = controller(results(), &t);

    let Dispatch::Started(pending) = ctl.dispatch(&Event::click(EXPORT_BTN)) else {
        panic!("export should start");
    };
    assert!(ctl.page().is_disabled(EXPORT_BTN));
    assert!(ctl.page().is_visible(EXPORT_LOADING));
    assert!(matches!(ctl.dispatch(&Event::click(EXPORT_BTN)), Dispatch::Ignored));

    t.reply(HttpResponse::new(200, "x"));
    ctl.settle(pending.send(t.as_ref())).unwrap();

    assert!(!ctl.page().is_disabled(EXPORT_BTN));
    assert!(!ctl.page().is_visible(EXPORT_LOADING));
    assert_eq!(downloads.saved().len(), 1);
}

#[test]
fn failed_save_still_revokes() {
    let t = FakeTransport::new();
    t.reply(HttpResponse::new(200, "x"));
    let transport: Arc<dyn Transport> = t.clone();
    let mut ctl = PageController::new(results(), transport, Box::new(FullDisk));

    let res = ctl.run(&Event::click(EXPORT_BTN));
    assert!(matches!(res, Some(Err(FlowError::Download(_)))));
    assert_eq!(ctl.blobs().live_count(), 0);
    let msg = ctl.page().text(EXPORT_ERROR).unwrap_or_default();
    assert!(msg.contains("disk full"), "{msg}");
}

#[test]
fn single_table_has_no_groups() {
    let html = r#"<html><body>
      <table><tbody><tr><td>1</td><td>A</td><td>a@x</td><td>G1</td></tr></tbody></table>
      <button id="exportBtn">Export to CSV</button>
      <div id="exportLoading" style="display:none"></div><div id="exportError" style="display:none"></div>
    </body></html>"#;
    let t = FakeTransport::new();
    t.reply(HttpResponse::new(200, "x"));
    let (mut ctl, _) = controller(Page::from_html(html), &t);

    ctl.run(&Event::click(EXPORT_BTN)).unwrap().unwrap();
    let body = posted_json(&t);
    assert_eq!(body["students"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["groups"], json!([]));
}
