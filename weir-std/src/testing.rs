//! Testing utilities for Weir routes.
//!
//! # Features
//!
//! - [`RecordingSink`]: A continuation target recording every outcome it receives
//! - [`ManualStrategy`]: A strategy that queues thunks until the test runs them
//! - [`collect`]: Run a route synchronously and return its outcomes

use std::sync::{Arc, Mutex};
use weir_core::{Continuation, Message, Processor, Route, Strategy, Thunk, Validation};

// ============================================================================
// Recording Sink
// ============================================================================

/// Records every validation delivered to its continuation.
///
/// # Example
///
/// ```rust
/// use weir_core::{Message, Processor, Route};
/// use weir_std::testing::RecordingSink;
///
/// let sink = RecordingSink::new();
/// Route::identity().process(Message::new("x"), sink.continuation());
/// assert_eq!(sink.successes(), 1);
/// ```
#[derive(Clone, Default)]
pub struct RecordingSink {
    outcomes: Arc<Mutex<Vec<Validation>>>,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A continuation appending to this sink.
    pub fn continuation(&self) -> Continuation {
        let outcomes = Arc::clone(&self.outcomes);
        Arc::new(move |outcome: Validation| outcomes.lock().unwrap().push(outcome))
    }

    /// A copy of the recorded outcomes, in delivery order.
    pub fn outcomes(&self) -> Vec<Validation> {
        self.outcomes.lock().unwrap().clone()
    }

    /// Number of deliveries.
    pub fn count(&self) -> usize {
        self.outcomes.lock().unwrap().len()
    }

    /// Number of successful deliveries.
    pub fn successes(&self) -> usize {
        self.outcomes
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.is_success())
            .count()
    }

    /// Number of failed deliveries.
    pub fn failures(&self) -> usize {
        self.count() - self.successes()
    }

    /// String bodies of the delivered messages.
    pub fn bodies(&self) -> Vec<String> {
        self.outcomes
            .lock()
            .unwrap()
            .iter()
            .filter_map(|v| v.message().body_str().map(str::to_owned))
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.outcomes.lock().unwrap().clear();
    }
}

/// Run `route` on `message` and return what it delivered synchronously.
///
/// Outcomes produced later, on other threads, are not included.
pub fn collect(route: &Route, message: Message) -> Vec<Validation> {
    let sink = RecordingSink::new();
    route.process(message, sink.continuation());
    sink.outcomes()
}

// ============================================================================
// Manual Strategy
// ============================================================================

/// A strategy that holds thunks until the test runs them.
///
/// Running queued thunks in a chosen order simulates concurrent completions
/// arriving out of order, deterministically.
#[derive(Clone, Default)]
pub struct ManualStrategy {
    queue: Arc<Mutex<Vec<Option<Thunk>>>>,
}

impl ManualStrategy {
    /// Create a strategy with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// A shared handle to this strategy; queued thunks stay visible here.
    pub fn shared(&self) -> Arc<dyn Strategy> {
        Arc::new(self.clone())
    }

    /// Number of queued thunks not yet run.
    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap().iter().flatten().count()
    }

    /// Run the thunk submitted `index`-th. Returns `false` if it was already run.
    pub fn run(&self, index: usize) -> bool {
        let thunk = self.queue.lock().unwrap().get_mut(index).and_then(Option::take);
        match thunk {
            Some(thunk) => {
                thunk();
                true
            }
            None => false,
        }
    }

    /// Run the thunks at `indices`, in that order.
    pub fn run_in_order(&self, indices: &[usize]) {
        for &index in indices {
            self.run(index);
        }
    }

    /// Run every pending thunk in submission order, including ones queued
    /// while running.
    pub fn run_all(&self) {
        let mut index = 0;
        while index < self.queue.lock().unwrap().len() {
            self.run(index);
            index += 1;
        }
    }
}

impl Strategy for ManualStrategy {
    fn apply(&self, thunk: Thunk) {
        self.queue.lock().unwrap().push(Some(thunk));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_strategy_runs_once() {
        let strategy = ManualStrategy::new();
        let sink = RecordingSink::new();
        let k = sink.continuation();
        strategy.apply(Box::new(move || k(Validation::Success(Message::new("a")))));

        assert_eq!(strategy.pending(), 1);
        assert!(strategy.run(0));
        assert!(!strategy.run(0));
        assert_eq!(strategy.pending(), 0);
        assert_eq!(sink.bodies(), vec!["a".to_owned()]);
    }

    #[test]
    fn test_sink_clear() {
        let sink = RecordingSink::new();
        (sink.continuation())(Validation::Failure(Message::new(())));
        assert_eq!(sink.failures(), 1);
        sink.clear();
        assert_eq!(sink.count(), 0);
    }
}
