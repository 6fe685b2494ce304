//! Request-phase context construction

use crate::config::RequestConfig;

/// Mutable state threaded through the request-phase pipeline
///
/// Created once per call and owned by that call's pipeline run. Interceptors
/// may rewrite `config` freely or set `cancel`; once `cancel` is set the
/// transport is never invoked and the call resolves to an abort envelope.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request configuration with the final URL already resolved
    pub config: RequestConfig,
    /// Cancellation flag checked after the request phase completes
    pub cancel: bool,
}

impl RequestContext {
    /// Build the context for one call from an already-merged configuration.
    ///
    /// The final URL is `host + url` when a non-empty host is present,
    /// joined verbatim. No network or async work happens here.
    pub fn new(mut config: RequestConfig) -> Self {
        if let Some(host) = config.host.as_deref() {
            if !host.is_empty() {
                config.url = format!("{}{}", host, config.url);
            }
        }

        Self {
            config,
            cancel: false,
        }
    }
}
