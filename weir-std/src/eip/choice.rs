//! Content-based router.

use crate::fault::{catch, failure};
use std::sync::Arc;
use weir_core::{Continuation, Message, Processor, Route, Validation};

type Predicate = Arc<dyn Fn(&Message) -> bool + Send + Sync + 'static>;

/// Routes a message through the first branch whose predicate matches.
///
/// Branches are evaluated in the order they were added. When no branch
/// matches, the message goes to the [`otherwise`](Choice::otherwise) route if
/// one is set, and is otherwise passed through unchanged as a success.
///
/// # Example
///
/// ```rust,ignore
/// let route = choose()
///     .when(|m| m.body_str() == Some("a"), mark_failed("rejected"))
///     .when(|m| m.body_str() == Some("b"), Route::identity());
/// ```
#[derive(Clone, Default)]
pub struct Choice {
    branches: Vec<(Predicate, Route)>,
    otherwise: Option<Route>,
}

/// Start an empty content-based router.
pub fn choose() -> Choice {
    Choice::default()
}

impl Choice {
    /// Add a branch taken when `predicate` matches.
    pub fn when<P, R>(mut self, predicate: P, route: R) -> Self
    where
        P: Fn(&Message) -> bool + Send + Sync + 'static,
        R: Processor,
    {
        self.branches.push((Arc::new(predicate), Route::new(route)));
        self
    }

    /// Route taken when no branch matches.
    pub fn otherwise<R: Processor>(mut self, route: R) -> Self {
        self.otherwise = Some(Route::new(route));
        self
    }

    /// Number of predicate branches.
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// Whether no branch has been added.
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    fn select(&self, message: &Message) -> Option<&Route> {
        self.branches
            .iter()
            .find(|(predicate, _)| predicate(message))
            .map(|(_, route)| route)
            .or(self.otherwise.as_ref())
    }
}

impl Processor for Choice {
    fn process(&self, message: Message, k: Continuation) {
        match catch("choose", || Ok(self.select(&message).cloned())) {
            Ok(Some(route)) => route.process(message, k),
            Ok(None) => k(Validation::Success(message)),
            Err(exception) => k(failure(&message, exception)),
        }
    }
}
