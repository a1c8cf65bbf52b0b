//! Recovery routes selected by exception.

use std::{error::Error, fmt, sync::Arc};
use weir_core::{Exception, Processor, Route};

type ExceptionPredicate = Arc<dyn Fn(&Exception) -> bool + Send + Sync>;

/// An ordered list of `(exception predicate, recovery route)` pairs.
///
/// The first predicate matching a failure's exception selects the route that
/// takes over the failed message.
///
/// # Example
///
/// ```rust
/// use weir::{ErrorHandler, Route, RoutingError};
///
/// let handler = ErrorHandler::new()
///     .on::<RoutingError>(Route::identity())
///     .when(|e| e.to_string().contains("retry"), Route::identity());
/// assert_eq!(handler.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct ErrorHandler {
    handlers: Vec<(ExceptionPredicate, Route)>,
}

impl ErrorHandler {
    /// An empty handler that recovers nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recover exceptions of type `E` with `recovery`.
    pub fn on<E>(self, recovery: impl Processor) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.when(|exception| exception.is::<E>(), recovery)
    }

    /// Recover exceptions satisfying `predicate` with `recovery`.
    pub fn when<P>(mut self, predicate: P, recovery: impl Processor) -> Self
    where
        P: Fn(&Exception) -> bool + Send + Sync + 'static,
    {
        self.handlers.push((Arc::new(predicate), Route::new(recovery)));
        self
    }

    /// The recovery route for `exception`, if any.
    pub fn recovery_for(&self, exception: &Exception) -> Option<&Route> {
        self.handlers
            .iter()
            .find(|(matches, _)| matches(exception))
            .map(|(_, route)| route)
    }

    /// Number of registered recovery routes.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no recovery route is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorHandler")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
