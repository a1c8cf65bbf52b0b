//! Continuations receiving routing outcomes.

use crate::{responder::Callback, validation::Validation};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// The callback a processor delivers its outcomes to.
///
/// A processor may call it zero, one or many times.
pub type Continuation = Callback<Validation>;

/// Build a [`Continuation`] from a closure.
pub fn continuation<F>(f: F) -> Continuation
where
    F: Fn(Validation) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A continuation that ignores every outcome.
pub fn discard() -> Continuation {
    Arc::new(|_| {})
}

/// Guard `k` so that only the first delivery reaches it.
///
/// The guard is a single atomic flag set on the first delivery; later
/// deliveries are dropped.
pub fn once(k: Continuation) -> Continuation {
    let fired = AtomicBool::new(false);
    Arc::new(move |validation: Validation| {
        if fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            k(validation);
        }
    })
}
