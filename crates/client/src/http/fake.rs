//! Scripted transport for unit tests.
//!
//! Routes match on a substring of the *decoded* URL (query values
//! percent-decoded), first registered route wins. Every call is recorded.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use super::HttpTransport;
use coverfind_core::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Fetch,
    Download,
    Validate,
}

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    /// Fetch returns this body.
    Body(String),
    /// Download writes a small file; validate passes.
    Ok,
    Status(u16),
    Timeout,
    Panic,
}

#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub op: Op,
    pub url: String,
    pub with_headers: bool,
}

#[derive(Default)]
pub(crate) struct FakeTransport {
    routes: Vec<(Op, String, Reply)>,
    calls: Mutex<Vec<Call>>,
}

pub(crate) fn decoded(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(parsed) => {
            let base = format!("{}://{}{}", parsed.scheme(), parsed.host_str().unwrap_or(""), parsed.path());
            let pairs: Vec<String> = parsed.query_pairs().map(|(k, v)| format!("{k}={v}")).collect();
            if pairs.is_empty() { base } else { format!("{base}?{}", pairs.join("&")) }
        }
        Err(_) => raw.to_string(),
    }
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, op: Op, pattern: &str, reply: Reply) -> Self {
        self.routes.push((op, pattern.to_string(), reply));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn urls(&self, op: Op) -> Vec<String> {
        self.calls().into_iter().filter(|c| c.op == op).map(|c| c.url).collect()
    }

    pub fn count(&self, op: Op) -> usize {
        self.urls(op).len()
    }

    fn reply(&self, op: Op, url: &str, with_headers: bool) -> Option<Reply> {
        let url = decoded(url);
        self.calls.lock().unwrap().push(Call { op, url: url.clone(), with_headers });
        self.routes
            .iter()
            .find(|(route_op, pattern, _)| *route_op == op && url.contains(pattern.as_str()))
            .map(|(_, _, reply)| reply.clone())
    }
}

fn failure(reply: Reply, url: &str) -> Error {
    match reply {
        Reply::Status(status) => Error::HttpStatus { status, url: url.to_string() },
        Reply::Timeout => Error::Timeout(url.to_string()),
        Reply::Panic => panic!("scripted panic for {url}"),
        Reply::Body(_) | Reply::Ok => Error::Network(format!("unexpected reply for {url}")),
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn fetch(&self, url: &str, headers: Option<&HeaderMap>) -> Result<String, Error> {
        match self.reply(Op::Fetch, url, headers.is_some()) {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Ok) => Ok(String::new()),
            Some(other) => Err(failure(other, url)),
            None => Err(Error::HttpStatus { status: 404, url: url.to_string() }),
        }
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<(), Error> {
        match self.reply(Op::Download, url, false) {
            Some(Reply::Ok) | Some(Reply::Body(_)) => {
                tokio::fs::write(dest, b"\xFF\xD8\xFFfake-jpeg").await?;
                Ok(())
            }
            Some(other) => Err(failure(other, url)),
            None => Err(Error::HttpStatus { status: 404, url: url.to_string() }),
        }
    }

    async fn validate(&self, url: &str) -> Result<(), Error> {
        match self.reply(Op::Validate, url, false) {
            Some(Reply::Ok) | Some(Reply::Body(_)) => Ok(()),
            Some(other) => Err(failure(other, url)),
            None => Err(Error::Validation(format!("{url}: not an image"))),
        }
    }
}
