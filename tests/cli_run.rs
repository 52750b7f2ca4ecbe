// tests/cli_run.rs
//
// Headless runs against a localhost server that answers by path.
#![cfg(feature = "cli")]

mod common;

use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::{mpsc, OnceLock};
use std::thread;

use canvas_roster::cli::{run_with, Args};
use canvas_roster::config::consts::EXPORT_FILENAME;

use common::RESULTS_HTML;

const CSV: &str = "id,name\n101,Alice\n102,Bob\n";

struct Request {
    method: String,
    path: String,
    body: Vec<u8>,
}

/// Settings and logs go under the working directory; keep them out of the repo.
fn scratch_cwd() {
    static DIR: OnceLock<tempfile::TempDir> = OnceLock::new();
    let dir = DIR.get_or_init(|| tempfile::tempdir().unwrap());
    std::env::set_current_dir(dir.path()).unwrap();
}

/// `GET /` → 404 (built-in page), `/extract` → results page, `/export` → CSV.
fn serve() -> (String, mpsc::Receiver<Request>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let mut parts = line.split_whitespace();
            let method = parts.next().unwrap_or_default().to_string();
            let path = parts.next().unwrap_or_default().to_string();

            let mut len = 0;
            loop {
                let mut h = String::new();
                reader.read_line(&mut h).unwrap();
                let h = h.trim_end();
                if h.is_empty() {
                    break;
                }
                if let Some((k, v)) = h.split_once(':') {
                    if k.eq_ignore_ascii_case("content-length") {
                        len = v.trim().parse().unwrap_or(0);
                    }
                }
            }
            let mut body = vec![0; len];
            reader.read_exact(&mut body).unwrap();

            let (status, ctype, reply) = match (method.as_str(), path.as_str()) {
                ("POST", "/extract") => ("200 OK", "text/html", RESULTS_HTML),
                ("POST", "/export") => ("200 OK", "text/csv", CSV),
                _ => ("404 Not Found", "text/plain", "not found"),
            };
            // Record before answering so the client never outruns the log.
            let _ = tx.send(Request { method, path, body });
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: {ctype}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
                reply.len()
            )
            .unwrap();
            stream.flush().unwrap();
        }
    });

    (format!("http://{addr}"), rx)
}

fn args(server: String, out: &std::path::Path, no_export: bool) -> Args {
    Args {
        course_url: "https://canvas.example.edu/courses/12345".into(),
        api_key: "tok en".into(),
        server: Some(server),
        out: Some(out.to_path_buf()),
        no_export,
        log_level: "debug".into(),
    }
}

#[test]
fn extract_then_export_writes_csv() {
    scratch_cwd();
    let (server, rx) = serve();
    let out = tempfile::tempdir().unwrap();

    run_with(args(server, out.path(), false)).unwrap();

    let reqs: Vec<Request> = rx.try_iter().collect();
    let paths: Vec<(&str, &str)> = reqs.iter().map(|r| (r.method.as_str(), r.path.as_str())).collect();
    assert_eq!(paths, [("GET", "/"), ("POST", "/extract"), ("POST", "/export")]);

    let form: Vec<(String, String)> = url::form_urlencoded::parse(&reqs[1].body).into_owned().collect();
    assert_eq!(
        form,
        [
            ("api_key".to_string(), "tok en".to_string()),
            ("base_url".to_string(), "https://canvas.example.edu".to_string()),
            ("course_id".to_string(), "12345".to_string()),
        ]
    );

    let json: serde_json::Value = serde_json::from_slice(&reqs[2].body).unwrap();
    assert_eq!(json["students"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["groups"][0]["members_count"], 3);

    let written = fs::read_to_string(out.path().join(EXPORT_FILENAME)).unwrap();
    assert_eq!(written, CSV);
}

#[test]
fn no_export_stops_after_extract() {
    scratch_cwd();
    let (server, rx) = serve();
    let out = tempfile::tempdir().unwrap();

    run_with(args(server, out.path(), true)).unwrap();

    let reqs: Vec<Request> = rx.try_iter().collect();
    assert!(reqs.iter().any(|r| r.path == "/extract"));
    assert!(reqs.iter().all(|r| r.path != "/export"));
    assert!(!out.path().join(EXPORT_FILENAME).exists());
}
