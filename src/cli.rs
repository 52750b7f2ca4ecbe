// src/cli.rs
//
// Headless run: load the start page, fill the form, extract, export.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::Parser;

use crate::{
    config::{
        consts::*,
        options::ClientOptions,
        settings,
    },
    controller::{load_start_page, Event, Outcome, PageController},
    core::net::HttpTransport,
    download::DirDownloads,
    error::{ClientError, FlowError},
    notify::{Flow, Notifier},
    page::PageView,
};

#[derive(Debug, Parser)]
#[command(name = "cli", version, about = "Extract a course roster and save it as CSV")]
pub struct Args {
    /// Course page URL, e.g. https://canvas.example.edu/courses/12345
    #[arg(short = 'u', long)]
    pub course_url: String,

    /// Course platform API key
    #[arg(short = 'k', long, env = "CANVAS_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Extract/export server (defaults to the saved setting)
    #[arg(short = 's', long)]
    pub server: Option<String>,

    /// Directory the CSV is saved into
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Stop after extracting
    #[arg(long)]
    pub no_export: bool,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Mirrors flow progress to the terminal.
struct CliNotifier;

impl Notifier for CliNotifier {
    fn busy(&mut self, flow: Flow, busy: bool) {
        if busy {
            match flow {
                Flow::Extract => eprintln!("Extracting course data..."),
                Flow::Export => eprintln!("Exporting..."),
            }
        }
    }

    fn error(&mut self, _flow: Flow, message: &str) {
        eprintln!("{message}");
    }

    fn rendered(&mut self, title: Option<&str>) {
        eprintln!("Loaded {}", title.unwrap_or("results"));
    }
}

pub fn run() -> Result<(), ClientError> {
    run_with(Args::parse())
}

pub fn run_with(args: Args) -> Result<(), ClientError> {
    crate::log::init(Path::new(LOG_FILE), &args.log_level)?;

    let settings_path = Path::new(SETTINGS_FILE);
    let mut saved = settings::load(settings_path);
    let mut opts = ClientOptions::from_settings(&saved).unwrap_or_else(|e| {
        loge!("Settings: {}; using defaults", e);
        ClientOptions::default()
    });
    if let Some(server) = &args.server {
        opts.set_server(server)?;
    }
    if let Some(out) = &args.out {
        opts.set_download_dir(&out.to_string_lossy());
    }
    logf!("CLI: server={} out={}", opts.server, opts.download_dir().display());

    let transport = Arc::new(HttpTransport::new(opts.server.clone())?);
    let page = load_start_page(transport.as_ref());
    let mut ctl = PageController::new(page, transport, Box::new(DirDownloads::new(opts.download_dir())))
        .with_notifier(Box::new(CliNotifier));

    ctl.page_mut().set_input(FIELD_COURSE_URL, args.course_url.as_str());
    ctl.page_mut().set_input(FIELD_API_KEY, args.api_key.as_str());

    match ctl.run(&Event::submit(EXTRACT_FORM)) {
        Some(Ok(_)) => {}
        Some(Err(e)) => return Err(ClientError::Flow(Flow::Extract.message(&e))),
        None => return Err(ClientError::Flow(s!("start page has no extract form"))),
    }

    saved.last_course_url = args.course_url.clone();
    opts.write_into(&mut saved);
    if let Err(e) = settings::save(settings_path, &saved) {
        loge!("Settings: save failed: {}", e);
    }

    let view = PageView::build(ctl.page());
    for (ix, t) in view.tables().enumerate() {
        let name = t.caption.clone().unwrap_or_else(|| format!("table {}", ix + 1));
        eprintln!("  {name}: {} row(s)", t.rows.len());
    }

    if args.no_export {
        return Ok(());
    }

    let path = exported(ctl.run(&Event::click(EXPORT_BTN)))?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Where the export click left the file, or why it didn't.
fn exported(result: Option<Result<Outcome, FlowError>>) -> Result<PathBuf, ClientError> {
    match result {
        Some(Ok(Outcome::Downloaded(path))) => Ok(path),
        Some(Ok(other)) => Err(ClientError::Flow(format!("unexpected export outcome: {other:?}"))),
        Some(Err(e)) => Err(ClientError::Flow(Flow::Export.message(&e))),
        None => Err(ClientError::Flow(s!("results page has no export button"))),
    }
}
