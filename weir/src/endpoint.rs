//! Endpoint capabilities consumed by a [`RouteContext`](crate::RouteContext).

use crate::exchange::ExchangeRef;
use std::sync::Arc;
use weir_core::EndpointError;

/// Receives exchanges from an endpoint consumer.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `ExchangeHandler`",
    label = "missing `ExchangeHandler` implementation",
    note = "Handlers implement `handle(exchange)` or are closures `Fn(ExchangeRef)`."
)]
pub trait ExchangeHandler: Send + Sync + 'static {
    /// Handle one inbound exchange.
    fn handle(&self, exchange: ExchangeRef);
}

impl<F> ExchangeHandler for F
where
    F: Fn(ExchangeRef) + Send + Sync + 'static,
{
    fn handle(&self, exchange: ExchangeRef) {
        (self)(exchange);
    }
}

/// A shared exchange handler.
pub type SharedHandler = Arc<dyn ExchangeHandler>;

/// Creates consumers delivering exchanges for an endpoint URI.
pub trait EndpointRegistry: Send + Sync + 'static {
    /// Register `handler` as the consumer of `uri`.
    fn create_consumer(
        &self,
        uri: &str,
        handler: SharedHandler,
    ) -> Result<ConsumerHandle, EndpointError>;
}

impl<R: EndpointRegistry + ?Sized> EndpointRegistry for Arc<R> {
    fn create_consumer(
        &self,
        uri: &str,
        handler: SharedHandler,
    ) -> Result<ConsumerHandle, EndpointError> {
        (**self).create_consumer(uri, handler)
    }
}

/// Starts and stops the endpoints of a context.
pub trait ContextLifecycle: Send + Sync + 'static {
    /// Start delivering exchanges.
    fn start(&self) -> Result<(), EndpointError>;

    /// Stop delivering exchanges.
    fn stop(&self) -> Result<(), EndpointError>;
}

impl<L: ContextLifecycle + ?Sized> ContextLifecycle for Arc<L> {
    fn start(&self) -> Result<(), EndpointError> {
        (**self).start()
    }

    fn stop(&self) -> Result<(), EndpointError> {
        (**self).stop()
    }
}

/// Identifies a registered consumer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConsumerHandle {
    uri: String,
}

impl ConsumerHandle {
    /// A handle for the consumer of `uri`.
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    /// The endpoint URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }
}
