//! Client orchestration over the two-phase pipeline
//!
//! One dispatch is: merge configs, build the request context, run the
//! request-phase chain, check cancellation, invoke the transport, build the
//! envelope, run the response-phase chain, return the envelope.

use std::sync::Arc;

use tracing::debug;

use crate::config::{Method, RequestConfig};
use crate::context::RequestContext;
use crate::envelope::Envelope;
use crate::error::Result;
use crate::middleware::{Middleware, Pipeline};
use crate::transport::{HttpTransport, Transport};

/// Dispatches requests through per-phase interceptor chains
///
/// A client owns its defaults and one append-only interceptor list per
/// phase. Registration happens during setup through `&mut self`; dispatch
/// takes `&self`, so concurrent calls on a shared client are independent —
/// each gets its own context and envelope, with only the defaults and the
/// interceptor lists shared read-only.
pub struct Client {
    transport: Arc<dyn Transport>,
    defaults: RequestConfig,
    request_chain: Vec<Arc<dyn Middleware<RequestContext>>>,
    response_chain: Vec<Arc<dyn Middleware<Envelope>>>,
}

impl Client {
    /// Create a client with the given defaults and the reqwest-backed transport
    pub fn new(defaults: RequestConfig) -> Self {
        Self::with_transport(defaults, Arc::new(HttpTransport::new()))
    }

    /// Create a client over a custom transport
    pub fn with_transport(defaults: RequestConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            defaults,
            request_chain: Vec::new(),
            response_chain: Vec::new(),
        }
    }

    /// Append a request-phase interceptor, returning `self` for chaining
    pub fn on_request<M>(&mut self, middleware: M) -> &mut Self
    where
        M: Middleware<RequestContext> + 'static,
    {
        self.request_chain.push(Arc::new(middleware));
        self
    }

    /// Append a response-phase interceptor, returning `self` for chaining
    pub fn on_response<M>(&mut self, middleware: M) -> &mut Self
    where
        M: Middleware<Envelope> + 'static,
    {
        self.response_chain.push(Arc::new(middleware));
        self
    }

    /// Derive a new client from this one.
    ///
    /// The child's defaults are `overrides` merged over the parent's; its
    /// interceptor lists start empty and stay independent of the parent.
    /// The transport is shared.
    pub fn create(&self, overrides: RequestConfig) -> Client {
        Client::with_transport(self.defaults.merge(overrides), Arc::clone(&self.transport))
    }

    /// The defaults every dispatch merges the per-call configuration over
    pub fn defaults(&self) -> &RequestConfig {
        &self.defaults
    }

    /// Dispatch one call through both pipeline phases.
    ///
    /// Expected outcomes — success, HTTP error status, network failure,
    /// cancellation — come back inside the envelope. Only interceptor
    /// failures surface as `Err`; the client performs no recovery for them.
    pub async fn execute(&self, config: RequestConfig) -> Result<Envelope> {
        let merged = self.defaults.merge(config);
        let response_type = merged.response_type.unwrap_or_default();

        // Snapshot the interceptor lists so registrations made elsewhere
        // never affect an in-flight call.
        let request_pipeline = Pipeline::new(self.request_chain.clone());
        let ctx = request_pipeline.run(RequestContext::new(merged)).await?;

        if ctx.cancel {
            debug!(url = %ctx.config.url, "call cancelled during the request phase");
            return Ok(Envelope::cancelled());
        }

        debug!(url = %ctx.config.url, "dispatching request");
        let outcome = self.transport.send(ctx.config).await;
        let envelope = Envelope::from_outcome(outcome, response_type);

        let response_pipeline = Pipeline::new(self.response_chain.clone());
        response_pipeline.run(envelope).await
    }

    /// GET `url`, with `config` merged over the instance defaults
    pub async fn get(&self, url: impl Into<String>, config: RequestConfig) -> Result<Envelope> {
        self.execute_verb(Method::Get, url.into(), config).await
    }

    /// POST `url`, with `config` merged over the instance defaults
    pub async fn post(&self, url: impl Into<String>, config: RequestConfig) -> Result<Envelope> {
        self.execute_verb(Method::Post, url.into(), config).await
    }

    /// PUT `url`, with `config` merged over the instance defaults
    pub async fn put(&self, url: impl Into<String>, config: RequestConfig) -> Result<Envelope> {
        self.execute_verb(Method::Put, url.into(), config).await
    }

    /// PATCH `url`, with `config` merged over the instance defaults
    pub async fn patch(&self, url: impl Into<String>, config: RequestConfig) -> Result<Envelope> {
        self.execute_verb(Method::Patch, url.into(), config).await
    }

    /// DELETE `url`, with `config` merged over the instance defaults
    pub async fn delete(&self, url: impl Into<String>, config: RequestConfig) -> Result<Envelope> {
        self.execute_verb(Method::Delete, url.into(), config).await
    }

    async fn execute_verb(
        &self,
        method: Method,
        url: String,
        mut config: RequestConfig,
    ) -> Result<Envelope> {
        config.url = url;
        config.method = Some(method);
        self.execute(config).await
    }
}
