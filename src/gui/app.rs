// src/gui/app.rs
use std::{
    error::Error,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use eframe::egui;

use crate::{
    config::{
        consts::{FIELD_COURSE_URL, LOG_FILE, SETTINGS_FILE},
        options::ClientOptions,
        settings::{self, Settings},
    },
    controller::{start_page, Dispatch, Event, Outcome, PageController},
    core::net::{HttpTransport, Transport},
    download::DirDownloads,
    error::ClientError,
    notify::Flow,
    page::{Page, PageView},
};

use super::{progress::GuiProgress, worker::Worker};

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    if let Err(e) = crate::log::init(Path::new(LOG_FILE), "info") {
        eprintln!("Logging disabled: {e}");
    }
    eframe::run_native(
        "Canvas Roster",
        options,
        Box::new(|cc| Ok(Box::new(App::new(&cc.egui_ctx)?))),
    )?;
    Ok(())
}

pub struct App {
    pub ctl: PageController,

    // persisted settings + what they resolve to
    pub settings: Settings,
    pub options: ClientOptions,

    // settings bar text fields (applied on demand)
    pub server_text: String,
    pub download_dir_text: String,

    // view of the current page, rebuilt when the page is replaced
    pub view: PageView,
    view_generation: u64,

    // events raised while drawing, handled after the frame's widgets
    pub events: Vec<Event>,

    // course URL of the extract in flight, saved once it succeeds
    pending_course_url: Option<String>,

    worker: Worker,
    pub status: Arc<Mutex<String>>,
}

impl App {
    /// Starts on the built-in page; the server's `GET /` replaces it when it
    /// arrives.
    pub fn new(ctx: &egui::Context) -> Result<Self, ClientError> {
        let settings = settings::load(Path::new(SETTINGS_FILE));
        let options = ClientOptions::from_settings(&settings).unwrap_or_else(|e| {
            loge!("Settings: {}; using defaults", e);
            ClientOptions::default()
        });

        let status = Arc::new(Mutex::new(s!("Loading start page…")));
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(options.server.clone())?);
        let mut worker = Worker::default();
        worker.fetch_index(0, Arc::clone(&transport), ctx.clone());

        let mut ctl = PageController::new(Page::default(), transport, Box::new(DirDownloads::new(options.download_dir())))
            .with_notifier(Box::new(GuiProgress::new(status.clone())));
        if !settings.last_course_url.is_empty() {
            ctl.page_mut().set_input(FIELD_COURSE_URL, settings.last_course_url.as_str());
        }

        let view = PageView::build(ctl.page());
        let view_generation = ctl.page().generation();

        logf!("Init: server={} downloads={}", options.server, options.download_dir().display());

        Ok(Self {
            server_text: settings.server.clone(),
            download_dir_text: settings.download_dir.clone(),
            settings,
            options,
            ctl,
            view,
            view_generation,
            events: Vec::new(),
            pending_course_url: None,
            worker,
            status,
        })
    }

    /* ---------- tiny helpers ---------- */

    #[inline]
    pub fn status<T: Into<String>>(&self, msg: T) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }

    #[inline]
    pub fn is_busy(&self, flow: Flow) -> bool {
        self.ctl.is_busy(flow)
    }

    /// Apply the settings bar. Server changes reload the start page.
    pub fn apply_settings(&mut self, ctx: &egui::Context) {
        let server_changed = self.server_text.trim() != self.settings.server;

        if let Err(e) = self.options.set_server(&self.server_text) {
            loge!("UI: {}", e);
            self.status(e.to_string());
            return;
        }
        self.options.set_download_dir(&self.download_dir_text);
        self.ctl.set_downloads(Box::new(DirDownloads::new(self.options.download_dir())));

        if server_changed {
            match HttpTransport::new(self.options.server.clone()) {
                Ok(t) => {
                    self.ctl.set_transport(Arc::new(t));
                    self.reload_start_page(ctx);
                }
                Err(e) => {
                    loge!("UI: {}", e);
                    self.status(e.to_string());
                    return;
                }
            }
        }

        self.options.write_into(&mut self.settings);
        self.server_text = self.settings.server.clone();
        self.save_settings();
        logf!("UI: settings applied server={} downloads={}", self.options.server, self.options.download_dir().display());
    }

    /// Back to the built-in page right away; the server's page follows from
    /// the worker.
    pub fn reload_start_page(&mut self, ctx: &egui::Context) {
        self.ctl.restart(&Page::default());
        self.prefill_course_url();
        self.worker.fetch_index(self.ctl.page().generation(), self.ctl.transport(), ctx.clone());
        self.status("Loading start page…");
    }

    fn prefill_course_url(&mut self) {
        let typed = self.ctl.page().input(FIELD_COURSE_URL).is_some_and(|v| !v.is_empty());
        if !typed && !self.settings.last_course_url.is_empty() {
            let url = self.settings.last_course_url.clone();
            self.ctl.page_mut().set_input(FIELD_COURSE_URL, url);
        }
    }

    fn save_settings(&self) {
        if let Err(e) = settings::save(Path::new(SETTINGS_FILE), &self.settings) {
            loge!("Settings: save failed: {}", e);
        }
    }

    /// Dispatch events raised during drawing; start their requests.
    fn handle_events(&mut self, ctx: &egui::Context) {
        for event in std::mem::take(&mut self.events) {
            let course_url = self.ctl.page().input(FIELD_COURSE_URL);
            match self.ctl.dispatch(&event) {
                Dispatch::Started(pending) => {
                    if pending.flow() == Flow::Extract {
                        self.pending_course_url = course_url;
                    }
                    self.worker.spawn(pending, self.ctl.transport(), ctx.clone());
                }
                Dispatch::Rejected(e) => logd!("UI: {:?} rejected: {}", event, e),
                Dispatch::Ignored => {}
            }
        }
    }

    /// Settle whatever the workers finished.
    fn pump(&mut self) {
        if let Some((generation, result)) = self.worker.poll_index() {
            // An extract may have replaced the page meanwhile; keep that one.
            if generation == self.ctl.page().generation() {
                let start = start_page(result);
                self.ctl.restart(&start);
                self.prefill_course_url();
                self.status("Start page loaded");
            } else {
                logd!("Start: page changed while loading index, dropped");
            }
        }

        for settled in self.worker.poll() {
            let flow = settled.flow;
            if let Ok(Outcome::Rendered) = self.ctl.settle(settled) {
                if let Some(url) = self.pending_course_url.take() {
                    self.settings.last_course_url = url;
                    self.save_settings();
                }
            } else if flow == Flow::Extract {
                self.pending_course_url = None;
            }
        }

        if self.ctl.page().generation() != self.view_generation {
            self.view = PageView::build(self.ctl.page());
            self.view_generation = self.ctl.page().generation();
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump();

        egui::TopBottomPanel::top("settings").show(ctx, |ui| {
            super::components::settings_bar::draw(ui, self);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            let status = self.status.lock().map(|s| s.clone()).unwrap_or_default();
            ui.horizontal(|ui| {
                if self.worker.loading_index() {
                    ui.add(egui::Spinner::new());
                }
                ui.label(format!("Status: {status}"));
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    super::components::page_view::draw(ui, self);
                });
        });

        self.handle_events(ctx);

        if !self.worker.is_idle() {
            // Workers also request a repaint when they finish.
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}
