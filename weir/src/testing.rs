//! Testing utilities for endpoint-bound routes.
//!
//! # Features
//!
//! - [`InMemoryRegistry`]: An in-process endpoint registry and lifecycle
//! - [`TestExchange`]: An exchange recording what the adapter writes back
//!
//! The route-level helpers of `weir-std` are re-exported here.

use crate::{
    endpoint::{ConsumerHandle, ContextLifecycle, EndpointRegistry, SharedHandler},
    exchange::{ExchangeRef, ExternalExchange},
};
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};
use tokio::sync::Notify;
use weir_core::{EndpointError, Exception, Message};

pub use weir_std::testing::{ManualStrategy, RecordingSink, collect};

// ============================================================================
// In-Memory Registry
// ============================================================================

/// Direct in-process endpoints.
///
/// Exchanges are handed to the registered consumer on the caller's thread.
/// Nothing is delivered until the registry is started.
#[derive(Default)]
pub struct InMemoryRegistry {
    consumers: Mutex<HashMap<String, SharedHandler>>,
    started: AtomicBool,
}

impl InMemoryRegistry {
    /// Create an empty, stopped registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the registry is started.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Send `message` to `uri` as an in-only exchange.
    pub fn send(&self, uri: &str, message: Message) -> Result<Arc<TestExchange>, EndpointError> {
        self.dispatch(uri, TestExchange::in_only(message))
    }

    /// Send `message` to `uri` as an in-out exchange.
    pub fn request(
        &self,
        uri: &str,
        message: Message,
    ) -> Result<Arc<TestExchange>, EndpointError> {
        self.dispatch(uri, TestExchange::in_out(message))
    }

    fn dispatch(
        &self,
        uri: &str,
        exchange: Arc<TestExchange>,
    ) -> Result<Arc<TestExchange>, EndpointError> {
        if !self.is_started() {
            return Err(EndpointError::NotStarted);
        }
        let handler = self
            .consumers
            .lock()
            .unwrap()
            .get(uri)
            .cloned()
            .ok_or_else(|| EndpointError::NotFound(uri.to_owned()))?;

        let shared: ExchangeRef = exchange.clone();
        handler.handle(shared);
        Ok(exchange)
    }
}

impl EndpointRegistry for InMemoryRegistry {
    fn create_consumer(
        &self,
        uri: &str,
        handler: SharedHandler,
    ) -> Result<ConsumerHandle, EndpointError> {
        let mut consumers = self.consumers.lock().unwrap();
        if consumers.contains_key(uri) {
            return Err(EndpointError::AlreadyRegistered(uri.to_owned()));
        }
        consumers.insert(uri.to_owned(), handler);
        Ok(ConsumerHandle::new(uri))
    }
}

impl ContextLifecycle for InMemoryRegistry {
    fn start(&self) -> Result<(), EndpointError> {
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> Result<(), EndpointError> {
        self.started.store(false, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Test Exchange
// ============================================================================

/// An exchange recording the adapter's writes.
pub struct TestExchange {
    in_message: Message,
    out_capable: bool,
    out_message: Mutex<Option<Message>>,
    exception: Mutex<Option<Exception>>,
    completions: Mutex<Vec<bool>>,
    notify: Notify,
}

impl TestExchange {
    fn build(in_message: Message, out_capable: bool) -> Arc<Self> {
        Arc::new(Self {
            in_message,
            out_capable,
            out_message: Mutex::new(None),
            exception: Mutex::new(None),
            completions: Mutex::new(Vec::new()),
            notify: Notify::new(),
        })
    }

    /// An exchange expecting no response.
    pub fn in_only(message: Message) -> Arc<Self> {
        Self::build(message, false)
    }

    /// An exchange expecting a response.
    pub fn in_out(message: Message) -> Arc<Self> {
        Self::build(message, true)
    }

    /// The response written by the adapter.
    pub fn out_message(&self) -> Option<Message> {
        self.out_message.lock().unwrap().clone()
    }

    /// The failure written by the adapter.
    pub fn exception(&self) -> Option<Exception> {
        self.exception.lock().unwrap().clone()
    }

    /// How many times `complete` was called.
    pub fn completions(&self) -> usize {
        self.completions.lock().unwrap().len()
    }

    /// The `asynchronous` flag of the first completion.
    pub fn completed_asynchronously(&self) -> Option<bool> {
        self.completions.lock().unwrap().first().copied()
    }

    /// Wait until the exchange has been completed at least once.
    pub async fn completed(&self) {
        loop {
            if self.completions() > 0 {
                return;
            }
            self.notify.notified().await;
        }
    }
}

impl ExternalExchange for TestExchange {
    fn is_out_capable(&self) -> bool {
        self.out_capable
    }

    fn in_message(&self) -> Message {
        self.in_message.clone()
    }

    fn set_out_message(&self, message: Message) {
        *self.out_message.lock().unwrap() = Some(message);
    }

    fn set_exception(&self, exception: Exception) {
        *self.exception.lock().unwrap() = Some(exception);
    }

    fn complete(&self, asynchronous: bool) {
        self.completions.lock().unwrap().push(asynchronous);
        self.notify.notify_one();
    }
}
