//! # Processors and Routes
//!
//! A [`Processor`] is a routing step: it receives a [`Message`] and delivers
//! outcomes to a [`Continuation`] instead of returning them. Because results
//! flow through callbacks, the same step can finish inline or on another
//! thread without the caller noticing.
//!
//! A [`Route`] is a type-erased, clonable processor. Routes are built once
//! and invoked for every message. They compose with [`Route::then`] (or the
//! `>>` operator): the second step runs on every successful outcome of the
//! first, while failures skip it and go straight to the continuation.
//!
//! ```rust
//! use weir_core::{Continuation, Message, Route, Validation};
//!
//! fn append(suffix: &'static str) -> Route {
//!     Route::new(move |m: Message, k: Continuation| {
//!         let body = format!("{}{}", m.body_str().unwrap_or_default(), suffix);
//!         k(Validation::Success(m.set_body(body)));
//!     })
//! }
//!
//! let route = append("-1") >> append("-2");
//! route.run(Message::new("a".to_string()), |v| {
//!     assert_eq!(v.message().body_str(), Some("a-1-2"));
//! });
//! ```

use crate::{
    continuation::Continuation,
    message::Message,
    responder::{Callback, Responder},
    validation::Validation,
};
use std::{ops::Shr, sync::Arc};

/// A routing step.
///
/// Implementations deliver zero or more outcomes to `k`. They must not
/// unwind: failures are delivered as [`Validation::Failure`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Processor`",
    label = "missing `Processor` implementation",
    note = "Processors implement `process(message, k)` or are closures `Fn(Message, Continuation)`."
)]
pub trait Processor: Send + Sync + 'static {
    /// Process `message`, delivering outcomes to `k`.
    fn process(&self, message: Message, k: Continuation);
}

impl<F> Processor for F
where
    F: Fn(Message, Continuation) + Send + Sync + 'static,
{
    fn process(&self, message: Message, k: Continuation) {
        (self)(message, k);
    }
}

/// A composed, shareable processor.
#[derive(Clone)]
pub struct Route {
    inner: Arc<dyn Processor>,
}

impl Route {
    /// Wrap a processor.
    pub fn new<P: Processor>(processor: P) -> Self {
        Self {
            inner: Arc::new(processor),
        }
    }

    /// A route delivering its input unchanged.
    pub fn identity() -> Self {
        Self::new(|m: Message, k: Continuation| k(Validation::from(m)))
    }

    /// Sequence `next` after this route.
    pub fn then<P: Processor>(self, next: P) -> Route {
        Route::new(Sequence {
            first: self,
            second: Route::new(next),
        })
    }

    /// Run the route, delivering outcomes to `k`.
    pub fn run<K>(&self, message: Message, k: K)
    where
        K: Fn(Validation) + Send + Sync + 'static,
    {
        self.inner.process(message, Arc::new(k));
    }

    /// The route as a Kleisli arrow `Message -> Responder<Validation>`.
    pub fn apply(&self, message: Message) -> Responder<Validation> {
        let route = self.clone();
        Responder::new(move |k: Callback<Validation>| route.process(message, k))
    }
}

impl Processor for Route {
    fn process(&self, message: Message, k: Continuation) {
        self.inner.process(message, k);
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route").finish_non_exhaustive()
    }
}

impl<P: Processor> Shr<P> for Route {
    type Output = Route;

    fn shr(self, next: P) -> Route {
        self.then(next)
    }
}

/// Two steps run one after the other, short-circuiting on failure.
pub struct Sequence {
    first: Route,
    second: Route,
}

impl Processor for Sequence {
    fn process(&self, message: Message, k: Continuation) {
        let second = self.second.clone();
        self.first.process(
            message,
            Arc::new(move |outcome: Validation| match outcome {
                Validation::Success(m) => second.process(m, Arc::clone(&k)),
                failure @ Validation::Failure(_) => k(failure),
            }),
        );
    }
}
