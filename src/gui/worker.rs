// src/gui/worker.rs
//
// Runs each request on its own thread so the UI keeps painting.

use std::sync::{
    Arc,
    mpsc::{self, Receiver, TryRecvError},
};
use std::thread;

use eframe::egui;

use crate::config::consts::INDEX_PATH;
use crate::controller::{Pending, Settled};
use crate::core::net::{HttpResponse, Transport};
use crate::error::NetError;
use crate::notify::Flow;

type IndexResult = Result<HttpResponse, NetError>;

#[derive(Default)]
pub struct Worker {
    jobs: Vec<(Flow, Receiver<Settled>)>,
    failed: Vec<Settled>,
    // start page fetch, tagged with the page generation it was asked for
    index: Option<(u64, Receiver<IndexResult>)>,
    index_failed: Option<u64>,
}

impl Worker {
    pub fn spawn(&mut self, pending: Pending, transport: Arc<dyn Transport>, ctx: egui::Context) {
        let flow = pending.flow();
        let (tx, rx) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name(format!("{flow:?}").to_ascii_lowercase())
            .spawn(move || {
                let settled = pending.send(transport.as_ref());
                let _ = tx.send(settled);
                ctx.request_repaint();
            });

        match spawned {
            Ok(_) => self.jobs.push((flow, rx)),
            Err(e) => {
                loge!("Worker: spawn failed for {:?}: {}", flow, e);
                self.failed.push(Settled::aborted(flow));
            }
        }
    }

    /// `GET /` in the background. A newer fetch replaces an older one.
    pub fn fetch_index(&mut self, generation: u64, transport: Arc<dyn Transport>, ctx: egui::Context) {
        let (tx, rx) = mpsc::channel();

        let spawned = thread::Builder::new().name(s!("index")).spawn(move || {
            let _ = tx.send(transport.get(INDEX_PATH));
            ctx.request_repaint();
        });

        match spawned {
            Ok(_) => {
                self.index = Some((generation, rx));
                self.index_failed = None;
            }
            Err(e) => {
                loge!("Worker: spawn failed for index: {}", e);
                self.index = None;
                self.index_failed = Some(generation);
            }
        }
    }

    /// Finished requests. A worker that died without answering comes back
    /// as an aborted request so its flow still settles.
    pub fn poll(&mut self) -> Vec<Settled> {
        let mut done = std::mem::take(&mut self.failed);
        self.jobs.retain(|(flow, rx)| match rx.try_recv() {
            Ok(settled) => {
                done.push(settled);
                false
            }
            Err(TryRecvError::Empty) => true,
            Err(TryRecvError::Disconnected) => {
                loge!("Worker: {:?} ended without a response", flow);
                done.push(Settled::aborted(*flow));
                false
            }
        });
        done
    }

    /// The start page answer once it is in, with the generation it was
    /// requested for. A dead fetch answers `Aborted`.
    pub fn poll_index(&mut self) -> Option<(u64, IndexResult)> {
        if let Some(generation) = self.index_failed.take() {
            return Some((generation, Err(NetError::Aborted)));
        }
        let (generation, rx) = self.index.as_ref()?;
        let generation = *generation;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                loge!("Worker: index fetch ended without a response");
                Err(NetError::Aborted)
            }
        };
        self.index = None;
        Some((generation, result))
    }

    pub fn loading_index(&self) -> bool {
        self.index.is_some()
    }

    pub fn is_idle(&self) -> bool {
        self.jobs.is_empty()
            && self.failed.is_empty()
            && self.index.is_none()
            && self.index_failed.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use crate::page::FormData;

    struct Answers(u16);

    impl Transport for Answers {
        fn get(&self, _path: &str) -> Result<HttpResponse, NetError> {
            Ok(HttpResponse::new(self.0, "<html></html>"))
        }
        fn post_form(&self, _path: &str, _form: &FormData) -> Result<HttpResponse, NetError> {
            Ok(HttpResponse::new(self.0, ""))
        }
        fn post_json(&self, _path: &str, _body: Vec<u8>) -> Result<HttpResponse, NetError> {
            Ok(HttpResponse::new(self.0, ""))
        }
    }

    struct Crashes;

    impl Transport for Crashes {
        fn get(&self, _path: &str) -> Result<HttpResponse, NetError> {
            panic!("transport crashed")
        }
        fn post_form(&self, _path: &str, _form: &FormData) -> Result<HttpResponse, NetError> {
            panic!("transport crashed")
        }
        fn post_json(&self, _path: &str, _body: Vec<u8>) -> Result<HttpResponse, NetError> {
            panic!("transport crashed")
        }
    }

    fn poll_until<T>(mut f: impl FnMut() -> Option<T>) -> T {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(v) = f() {
                return v;
            }
            assert!(Instant::now() < deadline, "worker never answered");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn dropped_sender_settles_as_aborted() {
        let mut w = Worker::default();
        let (tx, rx) = mpsc::channel::<Settled>();
        drop(tx);
        w.jobs.push((Flow::Export, rx));

        let done = w.poll();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].flow, Flow::Export);
        assert!(matches!(done[0].result, Err(NetError::Aborted)));
        assert!(w.is_idle());
    }

    #[test]
    fn panicking_request_settles_as_aborted() {
        let mut w = Worker::default();
        w.spawn(Pending::Export(b"{}".to_vec()), Arc::new(Crashes), egui::Context::default());

        let done = poll_until(|| Some(w.poll()).filter(|d| !d.is_empty()));
        assert_eq!(done[0].flow, Flow::Export);
        assert!(matches!(done[0].result, Err(NetError::Aborted)));
    }

    #[test]
    fn finished_request_is_returned() {
        let mut w = Worker::default();
        w.spawn(Pending::Extract(FormData::new()), Arc::new(Answers(200)), egui::Context::default());
        assert!(!w.is_idle());

        let done = poll_until(|| Some(w.poll()).filter(|d| !d.is_empty()));
        assert_eq!(done[0].flow, Flow::Extract);
        assert!(done[0].result.as_ref().is_ok_and(|r| r.status == 200));
        assert!(w.is_idle());
    }

    #[test]
    fn index_fetch_reports_generation() {
        let mut w = Worker::default();
        w.fetch_index(3, Arc::new(Answers(200)), egui::Context::default());
        assert!(w.loading_index());

        let (generation, result) = poll_until(|| w.poll_index());
        assert_eq!(generation, 3);
        assert!(result.is_ok());
        assert!(w.is_idle());
    }

    #[test]
    fn crashed_index_fetch_is_aborted() {
        let mut w = Worker::default();
        w.fetch_index(0, Arc::new(Crashes), egui::Context::default());

        let (_, result) = poll_until(|| w.poll_index());
        assert!(matches!(result, Err(NetError::Aborted)));
        assert!(!w.loading_index());
    }
}
