//! # weir-core
//!
//! Core types for the Weir message routing engine.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! extensions that only need to build processors, without the combinator
//! library in `weir-std` or the endpoint adapter in `weir`.
//!
//! # Building Blocks
//!
//! ## Data: [`Message`] and [`Validation`]
//!
//! A [`Message`] is an immutable value: body, headers, an optional exception
//! and a one-way flag. Every change produces a new message. A [`Validation`]
//! tags a message as `Success` or `Failure` and is what continuations receive.
//!
//! ## Continuations: [`Responder`] and [`Continuation`]
//!
//! Routing never blocks and never returns results. A step registers a
//! callback and the result arrives there, inline or from another thread.
//! [`Responder`] is the one-shot registration primitive; [`once`] guards a
//! continuation so that only its first delivery is observed.
//!
//! ## Execution: [`Strategy`]
//!
//! Where a step has to decide how to invoke the next one, it asks a
//! [`Strategy`]: [`Sequential`] runs inline, [`Concurrent`] dispatches to a
//! tokio runtime.
//!
//! ## Composition: [`Processor`] and [`Route`]
//!
//! A [`Processor`] is `Message -> Continuation -> ()`. A [`Route`] is a shared
//! processor; routes compose with [`Route::then`] or `>>`, and a failure
//! short-circuits the rest of the chain.
//!
//! # Error Types
//!
//! - [`RoutingError`] - Faults raised inside a route
//! - [`EndpointError`] - Endpoint capability errors
//! - [`StrategyError`] - Strategy construction errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub mod continuation;
mod error;
mod message;
mod processor;
mod responder;
pub mod strategy;
mod validation;

// Re-exports
pub use continuation::{Continuation, continuation, discard, once};
pub use error::{BoxError, EndpointError, Exception, RoutingError, StrategyError};
pub use message::{Message, Value};
pub use processor::{Processor, Route, Sequence};
pub use responder::{Callback, Responder};
pub use strategy::{Concurrent, Sequential, SharedStrategy, Strategy, Thunk};
pub use validation::Validation;
