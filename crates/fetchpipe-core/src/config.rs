//! Request configuration and merge semantics
//!
//! A client is constructed with a defaults [`RequestConfig`]; every dispatch
//! merges a per-call configuration over those defaults with per-call values
//! winning. There is no shared mutable default object anywhere.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// HTTP methods understood by the dispatch core
///
/// `None` in [`RequestConfig::method`] leaves the choice to the transport,
/// which defaults to GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Body decoding applied to successful responses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Parse the body as JSON (the default)
    #[default]
    Json,
    /// Decode the body as UTF-8 text
    Text,
    /// Hand back the raw bytes as a cheaply cloneable handle
    Blob,
    /// Hand back the raw bytes as an owned buffer
    ArrayBuffer,
}

/// Inputs needed to perform one call
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Target URL; may be relative to `host`, may be empty in defaults
    pub url: String,
    /// Optional prefix concatenated in front of `url` when present.
    ///
    /// The two strings are joined verbatim with no normalization, so slash
    /// placement is the caller's concern.
    pub host: Option<String>,
    /// HTTP method; `None` lets the transport default apply
    pub method: Option<Method>,
    /// Body decoding for successful responses, JSON when unset
    pub response_type: Option<ResponseType>,
    /// Headers passed through to the transport
    pub headers: HashMap<String, String>,
    /// Raw request body passed through to the transport
    pub body: Option<Bytes>,
}

impl RequestConfig {
    /// Create a configuration targeting `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the host prefix
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the HTTP method
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Set the response body decoding
    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }

    /// Add a single header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the request body
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Merge a per-call configuration over these defaults.
    ///
    /// Precedence is explicit and field-by-field: every per-call value that
    /// is set wins; headers are merged per key with the per-call entry
    /// taking precedence. A per-call empty `url` falls back to the default
    /// `url`.
    pub fn merge(&self, call: RequestConfig) -> RequestConfig {
        let mut headers = self.headers.clone();
        headers.extend(call.headers);

        RequestConfig {
            url: if call.url.is_empty() {
                self.url.clone()
            } else {
                call.url
            },
            host: call.host.or_else(|| self.host.clone()),
            method: call.method.or(self.method),
            response_type: call.response_type.or(self.response_type),
            headers,
            body: call.body.or_else(|| self.body.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_call_values_win() {
        let defaults = RequestConfig::new("/default")
            .with_host("http://default.example")
            .with_method(Method::Get)
            .with_response_type(ResponseType::Json);

        let merged = defaults.merge(
            RequestConfig::new("/call")
                .with_method(Method::Post)
                .with_response_type(ResponseType::Text),
        );

        assert_eq!(merged.url, "/call");
        assert_eq!(merged.host.as_deref(), Some("http://default.example"));
        assert_eq!(merged.method, Some(Method::Post));
        assert_eq!(merged.response_type, Some(ResponseType::Text));
    }

    #[test]
    fn test_empty_call_url_falls_back_to_default() {
        let defaults = RequestConfig::new("http://default.example/ping");
        let merged = defaults.merge(RequestConfig::default());
        assert_eq!(merged.url, "http://default.example/ping");
    }

    #[test]
    fn test_headers_merge_per_key() {
        let defaults = RequestConfig::default()
            .with_header("Accept", "application/json")
            .with_header("X-Token", "default");

        let merged = defaults.merge(RequestConfig::default().with_header("X-Token", "call"));

        assert_eq!(merged.headers["Accept"], "application/json");
        assert_eq!(merged.headers["X-Token"], "call");
    }

    #[test]
    fn test_response_type_defaults_to_json() {
        let merged = RequestConfig::default().merge(RequestConfig::default());
        assert_eq!(merged.response_type.unwrap_or_default(), ResponseType::Json);
    }

    #[test]
    fn test_method_serde_names() {
        assert_eq!(serde_json::to_string(&Method::Delete).unwrap(), "\"DELETE\"");
        assert_eq!(
            serde_json::to_string(&ResponseType::ArrayBuffer).unwrap(),
            "\"array_buffer\""
        );
    }
}
