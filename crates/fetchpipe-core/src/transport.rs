//! Transport seam performing the actual network call
//!
//! The dispatcher only sees [`TransportOutcome`]: either a response with its
//! body fully buffered, or a transport-level failure. Streaming bodies are
//! out of scope, so buffering up front keeps the decode stage synchronous
//! and lets the envelope retain the raw response alongside the decoded data.

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::warn;
use url::Url;

use crate::config::RequestConfig;
use crate::error::Error;
use crate::middleware::BoxFuture;

/// Network-facing collaborator invoked once per non-cancelled call
pub trait Transport: Send + Sync {
    /// Perform the call described by `config`, with the URL already resolved
    fn send(&self, config: RequestConfig) -> BoxFuture<'_, TransportOutcome>;
}

/// What came back from the wire
#[derive(Debug)]
pub enum TransportOutcome {
    /// The server was reached and answered, successfully or not
    Response(TransportResponse),
    /// No response was produced (connect failure, DNS, invalid URL)
    Failed(Error),
}

/// A transport response with its body fully buffered
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Reason phrase reported for `status`
    pub status_text: String,
    /// Response headers
    pub headers: HeaderMap,
    /// Final URL the response was served from
    pub url: String,
    /// Raw body bytes
    pub body: Bytes,
}

impl TransportResponse {
    /// Decode the body as JSON
    pub fn json(&self) -> serde_json::Result<Value> {
        serde_json::from_slice(&self.body)
    }

    /// Decode the body as UTF-8 text
    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }

    /// The body as a cheaply cloneable byte handle
    pub fn blob(&self) -> Bytes {
        self.body.clone()
    }

    /// The body as an owned contiguous buffer
    pub fn array_buffer(&self) -> Vec<u8> {
        self.body.to_vec()
    }
}

/// Default transport backed by a shared reqwest client
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a fresh reqwest client
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn dispatch(&self, config: RequestConfig) -> TransportOutcome {
        let url = match Url::parse(&config.url) {
            Ok(url) => url,
            Err(err) => {
                warn!(url = %config.url, "request URL did not parse");
                return TransportOutcome::Failed(Error::Transport {
                    message: format!("invalid request URL `{}`", config.url),
                    source: Some(anyhow::Error::new(err)),
                });
            }
        };

        let method = config
            .method
            .map(reqwest::Method::from)
            .unwrap_or(reqwest::Method::GET);

        let mut request = self.client.request(method, url);
        for (name, value) in &config.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = config.body {
            request = request.body(body);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                let status_text = status.canonical_reason().unwrap_or_default().to_string();
                let headers = response.headers().clone();
                let url = response.url().to_string();
                // A failed body read degrades to an empty body; the decode
                // stage reports that as a null payload.
                let body = response.bytes().await.unwrap_or_default();

                TransportOutcome::Response(TransportResponse {
                    status,
                    status_text,
                    headers,
                    url,
                    body,
                })
            }
            Err(err) => {
                warn!(error = %err, "transport request failed");
                TransportOutcome::Failed(Error::Transport {
                    message: err.to_string(),
                    source: Some(anyhow::Error::new(err)),
                })
            }
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, config: RequestConfig) -> BoxFuture<'_, TransportOutcome> {
        Box::pin(self.dispatch(config))
    }
}
