//! Error types for Weir.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`RoutingError`] - Faults raised while a message travels through a route
//! - [`EndpointError`] - Errors from the endpoint capabilities
//! - [`StrategyError`] - Errors while building a concurrency strategy
//!
//! Routing failures are values: once inside a route, an error is attached to
//! the [`Message`](crate::Message) as its exception and travels as a
//! [`Validation::Failure`](crate::Validation::Failure).

use std::{any::Any, sync::Arc, time::Duration};
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A shared error carried by a message.
///
/// Reference counted so a failed message stays cheap to clone.
pub type Exception = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Faults raised while a message travels through a route.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// A user-supplied function panicked.
    #[error("processor panicked: {0}")]
    Panicked(String),

    /// The message was explicitly marked as failed.
    #[error("{0}")]
    Failed(String),

    /// A gather step received a reply it could not place.
    #[error("gather failed: {0}")]
    Gather(String),

    /// No outcome was produced within the configured time.
    #[error("routing timed out after {0:?}")]
    Timeout(Duration),
}

impl RoutingError {
    /// Build a [`RoutingError::Panicked`] from a caught panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_owned()
        };
        RoutingError::Panicked(message)
    }
}

/// Errors reported by the endpoint capabilities.
#[derive(Error, Debug)]
pub enum EndpointError {
    /// A consumer is already registered for this endpoint.
    #[error("consumer already registered for endpoint: {0}")]
    AlreadyRegistered(String),

    /// No consumer is registered for this endpoint.
    #[error("no consumer registered for endpoint: {0}")]
    NotFound(String),

    /// The endpoint context has not been started.
    #[error("endpoint context is not started")]
    NotStarted,

    /// Starting or stopping the context failed.
    #[error("lifecycle error")]
    Lifecycle(#[source] BoxError),
}

/// Errors while building a strategy.
#[derive(Error, Debug)]
pub enum StrategyError {
    /// No tokio runtime is available on the current thread.
    #[error("no tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

impl From<BoxError> for EndpointError {
    fn from(err: BoxError) -> Self {
        EndpointError::Lifecycle(err)
    }
}
