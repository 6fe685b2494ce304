//! Normalized result envelope and response-phase construction
//!
//! Every dispatch terminates in an [`Envelope`]: success, HTTP error status,
//! network failure, and cancellation are all values discriminated by
//! [`FetchStatus`], so callers branch on data instead of catching errors.
//! Construction classifies the transport outcome and decodes the body; it
//! never fails itself.

use bytes::Bytes;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::ResponseType;
use crate::error::{Error, StatusClass};
use crate::transport::{TransportOutcome, TransportResponse};

/// Terminal disposition of one dispatched call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchStatus {
    /// The server was reached and answered inside the 2xx range
    Ok,
    /// The transport failed or the server answered outside the 2xx range
    Error,
    /// A request-phase interceptor cancelled the call before the transport ran
    Abort,
}

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Parsed JSON document
    Json(Value),
    /// UTF-8 text
    Text(String),
    /// Raw bytes behind a cheaply cloneable handle
    Blob(Bytes),
    /// Raw bytes as an owned buffer
    ArrayBuffer(Vec<u8>),
}

/// Normalized outcome of one dispatched call
#[derive(Debug)]
pub struct Envelope {
    /// Terminal disposition
    pub fetch_status: FetchStatus,
    /// Decoded body on success; `None` for 204, decode failures, errors,
    /// and cancellations
    pub data: Option<Payload>,
    /// Raw transport response whenever the server was reached
    pub response: Option<TransportResponse>,
    /// The failure behind a [`FetchStatus::Error`] outcome
    pub error: Option<Error>,
}

impl Envelope {
    /// Envelope for a call cancelled during the request phase
    pub fn cancelled() -> Self {
        Self {
            fetch_status: FetchStatus::Abort,
            data: None,
            response: None,
            error: None,
        }
    }

    /// Classify a transport outcome and decode the body per `response_type`.
    ///
    /// Always produces a fully-populated envelope. A body that fails to
    /// decode degrades to `data: None` on an otherwise Ok envelope; the
    /// failure is logged, not surfaced.
    pub(crate) fn from_outcome(outcome: TransportOutcome, response_type: ResponseType) -> Self {
        let response = match outcome {
            TransportOutcome::Failed(error) => {
                return Self {
                    fetch_status: FetchStatus::Error,
                    data: None,
                    response: None,
                    error: Some(error),
                };
            }
            TransportOutcome::Response(response) => response,
        };

        if !StatusClass::of(response.status.as_u16()).is_success() {
            let error = Error::Status {
                message: response.status_text.clone(),
                status: response.status.as_u16(),
            };
            return Self {
                fetch_status: FetchStatus::Error,
                data: None,
                response: Some(response),
                error: Some(error),
            };
        }

        if response.status == StatusCode::NO_CONTENT {
            return Self {
                fetch_status: FetchStatus::Ok,
                data: None,
                response: Some(response),
                error: None,
            };
        }

        let data = decode_body(&response, response_type);
        Self {
            fetch_status: FetchStatus::Ok,
            data,
            response: Some(response),
            error: None,
        }
    }
}

/// Decode the buffered body according to the declared response type
fn decode_body(response: &TransportResponse, response_type: ResponseType) -> Option<Payload> {
    match response_type {
        ResponseType::Json => match response.json() {
            Ok(value) => Some(Payload::Json(value)),
            Err(err) => {
                debug!(url = %response.url, error = %err, "body did not decode as JSON, substituting null");
                None
            }
        },
        ResponseType::Text => match response.text() {
            Ok(text) => Some(Payload::Text(text)),
            Err(err) => {
                debug!(url = %response.url, error = %err, "body was not valid UTF-8, substituting null");
                None
            }
        },
        ResponseType::Blob => Some(Payload::Blob(response.blob())),
        ResponseType::ArrayBuffer => Some(Payload::ArrayBuffer(response.array_buffer())),
    }
}
