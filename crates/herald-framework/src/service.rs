//! Tower integration.
//!
//! [`CommandService`] exposes [`CommandHandler::dispatch`] as a
//! `tower::Service<Arc<Invocation>>`, so hosts can stack ordinary tower
//! layers (timeouts, concurrency limits, load shedding) in front of the
//! pipeline:
//!
//! ```rust,ignore
//! let svc = ServiceBuilder::new()
//!     .concurrency_limit(64)
//!     .service(CommandService::new(handler));
//! let outcome = svc.oneshot(Arc::new(invocation)).await?;
//! ```

use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;
use tower::Service;

use crate::dispatch::DispatchOutcome;
use crate::error::DispatchError;
use crate::handler::CommandHandler;
use crate::invocation::Invocation;

/// A tower [`Service`] that dispatches invocations through a shared
/// [`CommandHandler`].
#[derive(Debug, Clone)]
pub struct CommandService {
    handler: Arc<CommandHandler>,
}

impl CommandService {
    pub fn new(handler: Arc<CommandHandler>) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &Arc<CommandHandler> {
        &self.handler
    }
}

impl From<Arc<CommandHandler>> for CommandService {
    fn from(handler: Arc<CommandHandler>) -> Self {
        Self::new(handler)
    }
}

impl Service<Arc<Invocation>> for CommandService {
    type Response = DispatchOutcome;
    type Error = DispatchError;
    type Future = BoxFuture<'static, Result<DispatchOutcome, DispatchError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, invocation: Arc<Invocation>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        async move { handler.dispatch(invocation).await }.boxed()
    }
}
