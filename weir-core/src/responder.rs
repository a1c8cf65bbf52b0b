//! One-shot continuation registration.
//!
//! A [`Responder`] is "run this computation, call back with the result".
//! Nothing polls it and nothing cancels it: the computation starts when a
//! callback is registered with [`Responder::respond`].

use crate::strategy::Strategy;
use futures::channel::oneshot;
use std::{
    future::Future,
    sync::{Arc, Mutex},
};

/// A callback receiving delivered values.
pub type Callback<A> = Arc<dyn Fn(A) + Send + Sync + 'static>;

type Register<A> = Box<dyn FnOnce(Callback<A>) + Send + 'static>;

/// A computation that delivers its result through a callback.
///
/// Responders built with [`ready`](Responder::ready) or
/// [`spawn`](Responder::spawn) deliver exactly once. Responders produced by
/// routes may deliver zero times (a filter dropped the message) or many times
/// (a multicast).
///
/// `respond` consumes the responder, so a callback can be registered only once.
pub struct Responder<A> {
    register: Register<A>,
}

impl<A: Send + 'static> Responder<A> {
    /// Build a responder from a callback-registration function.
    pub fn new<F>(register: F) -> Self
    where
        F: FnOnce(Callback<A>) + Send + 'static,
    {
        Self {
            register: Box::new(register),
        }
    }

    /// An already resolved responder; `respond` calls back synchronously.
    pub fn ready(value: A) -> Self {
        Self::new(move |k| k(value))
    }

    /// A responder running `thunk` under `strategy`.
    ///
    /// The thunk is submitted to the strategy when the callback is registered.
    pub fn spawn<S, F>(strategy: S, thunk: F) -> Self
    where
        S: Strategy,
        F: FnOnce() -> A + Send + 'static,
    {
        Self::new(move |k| strategy.apply(Box::new(move || k(thunk()))))
    }

    /// Register the delivery callback and start the computation.
    pub fn respond<K>(self, k: K)
    where
        K: Fn(A) + Send + Sync + 'static,
    {
        (self.register)(Arc::new(k));
    }

    /// Register an already shared callback.
    pub fn respond_with(self, k: Callback<A>) {
        (self.register)(k);
    }

    /// Transform every delivered value.
    pub fn map<B, F>(self, f: F) -> Responder<B>
    where
        B: Send + 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        Responder::new(move |k: Callback<B>| self.respond(move |a| k(f(a))))
    }

    /// Resolve with the first delivered value.
    ///
    /// Resolves to `None` when the computation drops its callback without
    /// delivering, which is what a filtered or absorbed message looks like.
    pub fn first(self) -> impl Future<Output = Option<A>> + Send {
        let (tx, rx) = oneshot::channel();
        let slot = Mutex::new(Some(tx));
        self.respond(move |value| {
            let sender = slot.lock().ok().and_then(|mut guard| guard.take());
            if let Some(sender) = sender {
                let _ = sender.send(value);
            }
        });
        async move { rx.await.ok() }
    }
}
