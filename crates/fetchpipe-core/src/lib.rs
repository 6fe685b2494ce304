//! Fetchpipe Core - request dispatch through a two-phase middleware pipeline
//!
//! This crate issues outbound HTTP calls through an ordered chain of
//! request-phase interceptors, a pluggable transport, and an ordered chain
//! of response-phase interceptors, always terminating in a normalized
//! [`Envelope`].
//!
//! # Main Components
//!
//! - **Configuration**: [`RequestConfig`] with explicit field-by-field merge
//!   precedence (per-call wins over instance defaults)
//! - **Middleware**: the generic [`Middleware`]/[`Pipeline`] chain threaded
//!   through a shared context, instantiated per phase
//! - **Envelope**: the [`Envelope`] result carrying a [`FetchStatus`]
//!   discriminant so callers branch on data instead of catching errors
//! - **Transport**: the [`Transport`] seam with a reqwest-backed default
//!
//! # Example
//!
//! ```no_run
//! use fetchpipe_core::{Client, RequestConfig};
//!
//! async fn example() -> fetchpipe_core::Result<()> {
//!     let client = Client::new(RequestConfig::default().with_host("http://127.0.0.1:3000"));
//!     let envelope = client.post("/test", RequestConfig::default()).await?;
//!     println!("{:?}", envelope.fetch_status);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod envelope;
pub mod error;
pub mod middleware;
pub mod transport;

// Re-export the main types for convenience
pub use client::Client;
pub use config::{Method, RequestConfig, ResponseType};
pub use context::RequestContext;
pub use envelope::{Envelope, FetchStatus, Payload};
pub use error::{Error, Result, StatusClass};
pub use middleware::{from_fn, BoxFuture, FnMiddleware, Middleware, Next, Pipeline};
pub use transport::{HttpTransport, Transport, TransportOutcome, TransportResponse};

// Re-export commonly used types
pub use reqwest::StatusCode;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
