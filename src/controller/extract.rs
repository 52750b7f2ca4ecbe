// src/controller/extract.rs
use super::{server_error, Dispatch, Outcome, PageController, Pending};
use crate::config::consts::*;
use crate::core::course_url;
use crate::core::net::HttpResponse;
use crate::error::{FlowError, NetError};
use crate::notify::Flow;

impl PageController {
    pub(super) fn begin_extract(&mut self) -> Dispatch {
        // One extraction at a time; a second submit would race the first render.
        if self.is_busy(Flow::Extract) {
            logd!("Extract: already in flight, submit ignored");
            return Dispatch::Ignored;
        }

        self.page.show(LOADING);
        self.page.hide(ERROR);

        let Some(mut form) = self.page.form_data(EXTRACT_FORM) else {
            self.page.hide(LOADING);
            return Dispatch::Ignored;
        };

        let course_url = s!(form.get(FIELD_COURSE_URL).unwrap_or_default());
        let target = match course_url::derive(&course_url) {
            Ok(t) => t,
            Err(e) => {
                logd!("Extract: rejected course_url={:?}", course_url);
                self.report(Flow::Extract, &e);
                self.page.hide(LOADING);
                return Dispatch::Rejected(e);
            }
        };

        form.set(FIELD_BASE_URL, &target.base_url);
        form.set(FIELD_COURSE_ID, &target.course_id);
        form.delete(FIELD_COURSE_URL);

        logf!(
            "Extract: Begin base_url={} course_id={} fields={}",
            target.base_url,
            target.course_id,
            form.len()
        );
        self.enter(Flow::Extract);
        Dispatch::Started(Pending::Extract(form))
    }

    pub(super) fn finish_extract(
        &mut self,
        result: Result<HttpResponse, NetError>,
    ) -> Result<Outcome, FlowError> {
        let resp = result?;
        if !resp.is_success() {
            return Err(server_error(&resp, MSG_EXTRACT_FALLBACK));
        }

        self.page.replace_body(resp.text());
        let title = self.page.title();
        logf!(
            "Extract: OK status={} bytes={} export_ready={}",
            resp.status,
            resp.body.len(),
            self.page.contains(EXPORT_BTN)
        );
        self.notifier.rendered(title.as_deref());
        Ok(Outcome::Rendered)
    }
}
