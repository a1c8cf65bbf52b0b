//! Span instrumentation for a section of a route.

use std::sync::Arc;
use weir_core::{Continuation, Message, Processor, Route, Validation};

/// Header read by [`Traced`] to link its span to an upstream trace.
pub const TRACE_ID: &str = "trace_id";

/// A route wrapper that runs its inner route inside a `tracing` span.
///
/// The span is entered while the inner route is invoked and again for every
/// outcome it delivers, so work continued on another thread is still
/// attributed to it. A `String` [`TRACE_ID`] header is recorded on the span.
#[derive(Clone)]
pub struct Traced {
    inner: Route,
    name: &'static str,
}

/// Instrument `route` with a span named after `name`.
pub fn traced(name: &'static str, route: Route) -> Traced {
    Traced { inner: route, name }
}

impl Processor for Traced {
    fn process(&self, message: Message, k: Continuation) {
        let span = match message.header_as::<String>(TRACE_ID) {
            Some(trace_id) => tracing::info_span!("route", step = %self.name, trace_id = %trace_id),
            None => tracing::info_span!("route", step = %self.name),
        };
        let outcome_span = span.clone();
        let k = Arc::new(move |outcome: Validation| {
            outcome_span.in_scope(|| {
                tracing::trace!(success = outcome.is_success(), "outcome delivered");
                k(outcome)
            })
        });
        span.in_scope(|| self.inner.process(message, k));
    }
}
