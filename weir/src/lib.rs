//! # weir - Continuation-Passing Message Routing
//!
//! `weir` routes immutable [`Message`]s through composed [`Route`]s. Every step
//! delivers its outcome to a continuation instead of returning it, so a route
//! can finish inline, on a thread pool, or many times over (a multicast)
//! without the caller changing.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use weir::{BoxError, Message, Route, RouteContext, choose, mark_failed, process_fn};
//! use weir::testing::InMemoryRegistry;
//!
//! let append = |suffix: &'static str| {
//!     process_fn(move |m: Message| {
//!         let body = format!("{}{}", m.body_str().unwrap_or_default(), suffix);
//!         Ok::<_, BoxError>(m.set_body(body))
//!     })
//! };
//!
//! let route = Route::new(append("-1"))
//!     >> choose().when(|m: &Message| m.body_str() == Some("a-1"), Route::new(mark_failed("rejected")));
//!
//! let registry = Arc::new(InMemoryRegistry::new());
//! let mut context = RouteContext::new(registry.clone()).with_lifecycle(registry.clone());
//! context.from("direct:in").route(route).unwrap();
//! context.start().unwrap();
//!
//! let accepted = registry.request("direct:in", Message::new("b".to_string())).unwrap();
//! assert_eq!(accepted.out_message().unwrap().body_str(), Some("b-1"));
//!
//! let rejected = registry.request("direct:in", Message::new("a".to_string())).unwrap();
//! assert!(rejected.exception().is_some());
//! ```
//!
//! ## Layers
//!
//! - [`weir_core`]: messages, continuations, strategies, composition
//! - [`weir_std`]: EIP combinators, function processors, [`RoutingConfig`]
//! - this crate: the [`RouteAdapter`] binding routes to endpoints, the
//!   endpoint capabilities and [`RouteContext`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod adapter;
mod context;
mod endpoint;
mod error_handler;
mod exchange;
pub mod testing;

pub use adapter::RouteAdapter;
pub use context::{FromBuilder, RouteContext};
pub use endpoint::{
    ConsumerHandle, ContextLifecycle, EndpointRegistry, ExchangeHandler, SharedHandler,
};
pub use error_handler::ErrorHandler;
pub use exchange::{ExchangeRef, ExternalExchange};

pub use weir_core::{
    BoxError, Callback, Concurrent, Continuation, EndpointError, Exception, Message, Processor,
    Responder, Route, RoutingError, Sequence, Sequential, SharedStrategy, Strategy,
    StrategyError, Thunk, Validation, Value, continuation, discard, once,
};
pub use weir_std::{
    config::RoutingConfig,
    eip::{
        Aggregator, Choice, MarkFailed, Multicast, POSITION, Scatter, ScatterGather, Splitter,
        aggregate, choose, filter, mark_failed, multicast, scatter, split,
    },
    processors,
    processors::{log, process_fn, responder_fn, traced},
};

#[cfg(feature = "macros")]
pub use weir_macros::processor;

/// Common imports for building routes.
pub mod prelude {
    pub use crate::{
        ErrorHandler, Message, Processor, Route, RouteContext, RoutingConfig, Validation,
        choose, filter, multicast, process_fn, scatter, split,
    };
}
