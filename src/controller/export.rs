// src/controller/export.rs
use super::{server_error, Dispatch, Outcome, PageController, Pending};
use crate::config::consts::*;
use crate::core::net::HttpResponse;
use crate::download::save_blob;
use crate::error::{FlowError, NetError};
use crate::notify::Flow;
use crate::records::scrape_payload;

impl PageController {
    pub(super) fn begin_export(&mut self) -> Dispatch {
        if self.is_busy(Flow::Export) {
            logd!("Export: already in flight, click ignored");
            return Dispatch::Ignored;
        }

        self.page.show(EXPORT_LOADING);
        self.page.hide(EXPORT_ERROR);
        self.page.set_disabled(EXPORT_BTN, true);
        self.enter(Flow::Export);

        let body = scrape_payload(self.page.document())
            .map_err(FlowError::from)
            .and_then(|payload| {
                logf!(
                    "Export: Begin students={} groups={}",
                    payload.students.len(),
                    payload.groups.len()
                );
                payload.to_json().map_err(FlowError::from)
            });

        match body {
            Ok(body) => Dispatch::Started(Pending::Export(body)),
            Err(e) => {
                loge!("Export: Error before request: {}", e);
                self.report(Flow::Export, &e);
                self.leave(Flow::Export);
                Dispatch::Rejected(e)
            }
        }
    }

    pub(super) fn finish_export(
        &mut self,
        result: Result<HttpResponse, NetError>,
    ) -> Result<Outcome, FlowError> {
        let resp = result?;
        if !resp.is_success() {
            return Err(server_error(&resp, MSG_EXPORT_FALLBACK));
        }

        let bytes = resp.body.len();
        let path = save_blob(&mut self.blobs, self.downloads.as_mut(), resp.body, EXPORT_FILENAME)?;
        logf!("Export: OK bytes={} → {}", bytes, path.display());
        self.notifier.downloaded(&path);
        Ok(Outcome::Downloaded(path))
    }
}
