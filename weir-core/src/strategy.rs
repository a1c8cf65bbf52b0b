//! Execution strategies.
//!
//! A [`Strategy`] decides where a unit of work runs: inline on the caller
//! ([`Sequential`]) or on another unit of concurrency ([`Concurrent`]).
//! Combinators take a strategy as a constructor parameter wherever they must
//! decide how to invoke the next stage.

use crate::error::StrategyError;
use std::sync::Arc;
use tokio::runtime::Handle;

/// A unit of work handed to a [`Strategy`].
pub type Thunk = Box<dyn FnOnce() + Send + 'static>;

/// A strategy shared between routes and combinators.
pub type SharedStrategy = Arc<dyn Strategy>;

/// Policy governing how a thunk is executed.
///
/// `apply` never returns a value and never waits for the thunk to finish.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Strategy`",
    label = "missing `Strategy` implementation",
    note = "Strategies must implement `apply` to run a `Thunk`."
)]
pub trait Strategy: Send + Sync + 'static {
    /// Run the thunk according to this policy.
    fn apply(&self, thunk: Thunk);
}

impl<S: Strategy + ?Sized> Strategy for Arc<S> {
    fn apply(&self, thunk: Thunk) {
        (**self).apply(thunk);
    }
}

/// Runs thunks immediately on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sequential;

impl Sequential {
    /// A shared handle to this strategy.
    pub fn shared() -> SharedStrategy {
        Arc::new(Sequential)
    }
}

impl Strategy for Sequential {
    fn apply(&self, thunk: Thunk) {
        thunk();
    }
}

/// Dispatches thunks to the blocking pool of a tokio runtime.
///
/// Thunks are synchronous and may block, so they run on the blocking pool
/// rather than on the async workers. Sibling thunks have no ordering
/// guarantee.
#[derive(Debug, Clone)]
pub struct Concurrent {
    handle: Handle,
}

impl Concurrent {
    /// Dispatch onto the runtime behind `handle`.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Dispatch onto the runtime the caller is running in.
    pub fn current() -> Result<Self, StrategyError> {
        Ok(Self::new(Handle::try_current()?))
    }

    /// A shared handle to this strategy.
    pub fn shared(self) -> SharedStrategy {
        Arc::new(self)
    }
}

impl Strategy for Concurrent {
    fn apply(&self, thunk: Thunk) {
        // Detached: completion is observed through continuations, not the JoinHandle.
        drop(self.handle.spawn_blocking(thunk));
    }
}
