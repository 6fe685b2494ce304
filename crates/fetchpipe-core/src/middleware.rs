//! Generic middleware pipeline composed per phase of a call
//!
//! A pipeline is an ordered chain of interceptors over one context value.
//! Each interceptor receives the context and a continuation; it may work
//! before handing off, after control returns, or both, and skipping the
//! continuation halts the remaining chain silently. The same machinery is
//! instantiated twice per client: once over the request context and once
//! over the result envelope.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::Result;

/// Boxed future used across the middleware and transport seams
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A chainable interceptor over a context of type `C`
///
/// Implementations take ownership of the context, may mutate it, and hand it
/// to `next` to continue the chain. Returning `Ok(ctx)` without calling
/// `next` stops the remaining interceptors while the context still flows
/// back to the dispatcher. Returning `Err` rejects the whole call.
pub trait Middleware<C>: Send + Sync {
    /// Process the context, optionally delegating to the rest of the chain
    fn handle(&self, ctx: C, next: Next<C>) -> BoxFuture<'_, Result<C>>;
}

/// Continuation over the remaining interceptors of a chain
pub struct Next<C> {
    stack: Arc<[Arc<dyn Middleware<C>>]>,
    index: usize,
}

impl<C: Send + 'static> Next<C> {
    /// Invoke the next interceptor, or resolve immediately at chain end
    pub async fn run(self, ctx: C) -> Result<C> {
        match self.stack.get(self.index).cloned() {
            Some(interceptor) => {
                let next = Next {
                    stack: self.stack,
                    index: self.index + 1,
                };
                interceptor.handle(ctx, next).await
            }
            None => Ok(ctx),
        }
    }
}

/// An ordered interceptor chain composed for one phase of one call
///
/// Composition snapshots the registered interceptors, so registrations made
/// while a call is in flight never affect that call.
pub struct Pipeline<C> {
    stack: Arc<[Arc<dyn Middleware<C>>]>,
}

impl<C: Send + 'static> Pipeline<C> {
    /// Compose a pipeline from a snapshot of registered interceptors
    pub fn new(stack: Vec<Arc<dyn Middleware<C>>>) -> Self {
        Self {
            stack: stack.into(),
        }
    }

    /// Run the chain to completion over `ctx`
    pub async fn run(&self, ctx: C) -> Result<C> {
        Next {
            stack: Arc::clone(&self.stack),
            index: 0,
        }
        .run(ctx)
        .await
    }

    /// Number of interceptors in this pipeline
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether the pipeline has no interceptors
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

/// Adapter turning an async closure into a [`Middleware`]
pub struct FnMiddleware<F> {
    f: F,
}

/// Lift a `(ctx, next) -> future` closure into a middleware
pub fn from_fn<C, F, Fut>(f: F) -> FnMiddleware<F>
where
    C: Send + 'static,
    F: Fn(C, Next<C>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<C>> + Send + 'static,
{
    FnMiddleware { f }
}

impl<C, F, Fut> Middleware<C> for FnMiddleware<F>
where
    C: Send + 'static,
    F: Fn(C, Next<C>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<C>> + Send + 'static,
{
    fn handle(&self, ctx: C, next: Next<C>) -> BoxFuture<'_, Result<C>> {
        Box::pin((self.f)(ctx, next))
    }
}
