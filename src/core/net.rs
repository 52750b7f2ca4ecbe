// src/core/net.rs
//
// HTTP seam. The controller only sees `Transport`; the real client is a
// blocking reqwest client that frontends call off the UI thread.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::config::consts::USER_AGENT;
use crate::error::NetError;
use crate::page::FormData;

/// Whatever came back, success or not. Status checks are the caller's job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, content_type: None, body: body.into() }
    }

    pub fn with_content_type(mut self, ct: &str) -> Self {
        self.content_type = Some(s!(ct));
        self
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub trait Transport: Send + Sync {
    fn get(&self, path: &str) -> Result<HttpResponse, NetError>;

    /// `application/x-www-form-urlencoded` POST.
    fn post_form(&self, path: &str, form: &FormData) -> Result<HttpResponse, NetError>;

    /// `application/json` POST of an already encoded body.
    fn post_json(&self, path: &str, body: Vec<u8>) -> Result<HttpResponse, NetError>;
}

#[derive(Clone, Debug)]
pub struct HttpTransport {
    base: Url,
    client: Client,
}

impl HttpTransport {
    pub fn new(base: Url) -> Result<Self, NetError> {
        if base.cannot_be_a_base() {
            return Err(NetError::BadServer(s!(base.as_str())));
        }
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { base, client })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, NetError> {
        self.base
            .join(path)
            .map_err(|e| NetError::BadServer(format!("{}{}: {}", self.base, path, e)))
    }

    fn collect(resp: reqwest::blocking::Response) -> Result<HttpResponse, NetError> {
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = resp.bytes()?.to_vec();
        Ok(HttpResponse { status, content_type, body })
    }
}

impl Transport for HttpTransport {
    fn get(&self, path: &str) -> Result<HttpResponse, NetError> {
        let url = self.endpoint(path)?;
        logd!("Net: GET {}", url);
        Self::collect(self.client.get(url).send()?)
    }

    fn post_form(&self, path: &str, form: &FormData) -> Result<HttpResponse, NetError> {
        let url = self.endpoint(path)?;
        logd!("Net: POST form {} fields={}", url, form.len());
        Self::collect(self.client.post(url).form(form.pairs()).send()?)
    }

    fn post_json(&self, path: &str, body: Vec<u8>) -> Result<HttpResponse, NetError> {
        let url = self.endpoint(path)?;
        logd!("Net: POST json {} bytes={}", url, body.len());
        let req = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        Self::collect(req.send()?)
    }
}
