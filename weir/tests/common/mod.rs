#![allow(dead_code)]

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use weir::{
    BoxError, Continuation, Message, Route, RouteContext, Validation, process_fn,
    testing::InMemoryRegistry,
};

// ============================================================================
// Test Error Types
// ============================================================================

#[derive(Debug, Clone, thiserror::Error)]
#[error("inventory unavailable")]
pub struct InventoryUnavailable;

#[derive(Debug, Clone, thiserror::Error)]
#[error("payment declined: {0}")]
pub struct PaymentDeclined(pub String);

// ============================================================================
// Test Routes
// ============================================================================

/// Appends `suffix` to a string body.
pub fn append(suffix: &'static str) -> Route {
    Route::new(process_fn(move |m: Message| {
        let body = format!("{}{}", m.body_str().unwrap_or_default(), suffix);
        Ok::<_, BoxError>(m.set_body(body))
    }))
}

/// Fails every message with `error`.
pub fn fail_with<E>(error: E) -> Route
where
    E: std::error::Error + Clone + Send + Sync + 'static,
{
    Route::new(process_fn(move |_: Message| Err::<Message, _>(error.clone())))
}

/// Delivers two successes for every input.
pub fn fire_twice(first: &'static str, second: &'static str) -> Route {
    Route::new(move |m: Message, k: Continuation| {
        k(Validation::Success(m.set_body(first)));
        k(Validation::Success(m.set_body(second)));
    })
}

/// Delivers a success after `delay`, from another thread.
pub fn delayed(body: &'static str, delay: Duration) -> Route {
    Route::new(move |m: Message, k: Continuation| {
        std::thread::spawn(move || {
            std::thread::sleep(delay);
            k(Validation::Success(m.set_body(body)));
        });
    })
}

/// Never delivers.
pub fn silent() -> Route {
    Route::new(|_: Message, _: Continuation| {})
}

/// Counts the messages it passes through.
pub fn counting(count: Arc<AtomicUsize>) -> Route {
    Route::new(move |m: Message, k: Continuation| {
        count.fetch_add(1, Ordering::SeqCst);
        k(Validation::from(m));
    })
}

// ============================================================================
// Context Fixture
// ============================================================================

/// A started in-memory context.
pub fn started_context() -> (Arc<InMemoryRegistry>, RouteContext) {
    let registry = Arc::new(InMemoryRegistry::new());
    let context = RouteContext::new(registry.clone()).with_lifecycle(registry.clone());
    context.start().unwrap();
    (registry, context)
}

pub fn body(message: &Message) -> &str {
    message.body_str().unwrap_or_default()
}
