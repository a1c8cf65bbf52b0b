//! Aggregator and message filter.

use crate::fault::{catch, failure};
use weir_core::{BoxError, Continuation, Message, Processor, Validation};

/// Correlates messages, delivering only when the correlation function
/// produces a result.
///
/// - `Ok(Some(result))` delivers exactly one `Success(result)`.
/// - `Ok(None)` delivers nothing: the message is absorbed.
/// - `Err(_)` delivers a single failure carrying the input message.
///
/// Absorbed messages are never timed out; a route waiting on an aggregate that
/// never completes simply produces no outcome.
pub struct Aggregator<F> {
    correlate: F,
}

/// Build an aggregator from a correlation function.
pub fn aggregate<F, E>(f: F) -> Aggregator<F>
where
    F: Fn(&Message) -> Result<Option<Message>, E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    Aggregator { correlate: f }
}

/// Drop messages that do not satisfy `predicate`.
///
/// Matching messages are delivered unchanged; the others produce no delivery.
pub fn filter<P>(
    predicate: P,
) -> Aggregator<impl Fn(&Message) -> Result<Option<Message>, BoxError> + Send + Sync + 'static>
where
    P: Fn(&Message) -> bool + Send + Sync + 'static,
{
    aggregate(move |m: &Message| Ok::<_, BoxError>(predicate(m).then(|| m.clone())))
}

impl<F, E> Processor for Aggregator<F>
where
    F: Fn(&Message) -> Result<Option<Message>, E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    fn process(&self, message: Message, k: Continuation) {
        match catch("aggregate", || (self.correlate)(&message).map_err(Into::into)) {
            Ok(Some(result)) => k(Validation::Success(result)),
            Ok(None) => tracing::trace!("message absorbed by aggregator"),
            Err(exception) => k(failure(&message, exception)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::collect;
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };
    use weir_core::Route;

    #[test]
    fn test_filter_passes_matching_message_unchanged() {
        let route = Route::new(filter(|m: &Message| m.body_as::<u32>() == Some(&1)));
        let input = Message::new(1u32).add_header("h", "v");

        let out = collect(&route, input);
        assert_eq!(out.len(), 1);
        assert!(out[0].is_success());
        assert_eq!(out[0].message().body_as::<u32>(), Some(&1));
        assert_eq!(out[0].message().header_as::<&str>("h"), Some(&"v"));
    }

    #[test]
    fn test_filter_drops_non_matching_message() {
        let route = Route::new(filter(|m: &Message| m.body_as::<u32>() == Some(&1)));
        assert!(collect(&route, Message::new(2u32)).is_empty());
    }

    #[test]
    fn test_aggregate_batches_by_count() {
        let seen = Mutex::new(Vec::new());
        let route = Route::new(aggregate(move |m: &Message| -> Result<Option<Message>, BoxError> {
            let mut seen = seen.lock().map_err(|_| "poisoned")?;
            seen.push(m.body_as::<u32>().copied().unwrap_or_default());
            if seen.len() < 3 {
                return Ok(None);
            }
            let total: u32 = seen.drain(..).sum();
            Ok(Some(Message::new(total)))
        }));

        let mut outcomes = Vec::new();
        for n in 1..=3u32 {
            outcomes.extend(collect(&route, Message::new(n)));
        }
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].message().body_as::<u32>(), Some(&6));
    }

    #[test]
    fn test_aggregate_error_is_single_failure() {
        let calls = AtomicUsize::new(0);
        let route = Route::new(aggregate(move |_: &Message| {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<Option<Message>, _>("no correlation id")
        }));

        let out = collect(&route, Message::new("m"));
        assert_eq!(out.len(), 1);
        assert!(out[0].is_failure());
        assert_eq!(out[0].message().body_str(), Some("m"));
    }
}
