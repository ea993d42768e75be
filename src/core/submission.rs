use std::future::Future;

use reqwest::{
    header::CONTENT_TYPE,
    Client,
    Url,
};
use tracing::{
    info,
    warn,
};

use super::{
    http::http_client,
    PipError,
    Record,
};

/// Raw HTTP reply from the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

/// Sends a JSON body to a URL. One call per submission, never retried.
pub trait Transport {
    fn post_json(&self, url: Url, body: String) -> impl Future<Output = Result<Reply, PipError>> + Send;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, PipError> {
        Ok(Self { client: http_client()? })
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, url: Url, body: String) -> impl Future<Output = Result<Reply, PipError>> + Send {
        let request = self.client.post(url).header(CONTENT_TYPE, "application/json").body(body);

        async move {
            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(Reply { status, body })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgement {
    /// The receiver answered with its success marker.
    Confirmed,
    /// A 2xx reply without the marker, e.g. a redirect page. Treated as sent.
    Opaque,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub count: usize,
    pub ack: Acknowledgement,
}

/// Checks that `destination` is an absolute http(s) URL.
pub fn parse_destination(destination: &str) -> Result<Url, PipError> {
    let destination = destination.trim();
    if destination.is_empty() {
        return Err(PipError::MissingDestination);
    }

    let url = Url::parse(destination)
        .map_err(|e| PipError::InvalidDestination(format!("{destination}: {e}")))?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(PipError::InvalidDestination(destination.to_string())),
    }
}

fn read_reply(reply: &Reply) -> Result<Acknowledgement, PipError> {
    let body = reply.body.trim();

    if !(200..300).contains(&reply.status) {
        return Err(PipError::Rejected(format!("HTTP {}", reply.status)));
    }
    if body.starts_with("Error") {
        return Err(PipError::Rejected(body.to_string()));
    }
    if body == "Success" {
        Ok(Acknowledgement::Confirmed)
    } else {
        Ok(Acknowledgement::Opaque)
    }
}

pub struct SubmissionClient<T: Transport> {
    transport: T,
}

impl SubmissionClient<HttpTransport> {
    pub fn http() -> Result<Self, PipError> {
        Ok(Self::new(HttpTransport::new()?))
    }
}

impl<T: Transport> SubmissionClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Posts every record as one JSON array. The caller keeps its queue
    /// untouched unless this returns `Ok`.
    pub async fn submit(&self, records: &[Record], destination: &str) -> Result<SubmitReceipt, PipError> {
        if records.is_empty() {
            return Err(PipError::EmptyQueue);
        }

        let url = parse_destination(destination)?;
        let body = serde_json::to_string(records)?;

        info!("Submitting {} records to {}", records.len(), url.host_str().unwrap_or_default());

        let reply = self.transport.post_json(url, body).await?;
        let ack = read_reply(&reply).inspect_err(|e| warn!("Submission rejected: {e}"))?;

        info!("Submission accepted ({:?})", ack);
        Ok(SubmitReceipt { count: records.len(), ack })
    }
}
