//! Recipient list.

use std::sync::Arc;
use weir_core::{Continuation, Message, Processor, Route, SharedStrategy, Validation};

/// Header carrying the index of the destination that produced a reply.
pub const POSITION: &str = "position";

/// Sends a copy of the message to every destination.
///
/// Each destination runs under the fan-out strategy and each of its outcomes
/// is delivered independently, tagged with the [`POSITION`] header. This is
/// not an aggregating step: one input yields one delivery per destination
/// reply, in no particular order.
#[derive(Clone)]
pub struct Multicast {
    strategy: SharedStrategy,
    destinations: Vec<Route>,
}

/// Build a recipient list over `destinations`, fanned out with `strategy`.
pub fn multicast<I>(strategy: SharedStrategy, destinations: I) -> Multicast
where
    I: IntoIterator<Item = Route>,
{
    Multicast {
        strategy,
        destinations: destinations.into_iter().collect(),
    }
}

impl Multicast {
    /// Number of destinations.
    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    /// Whether there are no destinations.
    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

impl Processor for Multicast {
    fn process(&self, message: Message, k: Continuation) {
        for (position, destination) in self.destinations.iter().enumerate() {
            let destination = destination.clone();
            let message = message.clone();
            let k = Arc::clone(&k);
            self.strategy.apply(Box::new(move || {
                destination.process(
                    message,
                    Arc::new(move |outcome: Validation| {
                        k(outcome.map(|m| m.add_header(POSITION, position)))
                    }),
                );
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{eip::mark_failed, testing::collect};
    use weir_core::Sequential;

    fn label(text: &'static str) -> Route {
        Route::new(move |m: Message, k: Continuation| {
            k(Validation::Success(m.set_body(text)))
        })
    }

    #[test]
    fn test_each_destination_delivers_tagged() {
        let route = Route::new(multicast(
            Sequential::shared(),
            vec![label("a"), label("b"), label("c")],
        ));

        let out = collect(&route, Message::new("in"));
        let tagged: Vec<_> = out
            .iter()
            .map(|v| {
                (
                    v.message().body_str().map(str::to_owned),
                    v.message().header_as::<usize>(POSITION).copied(),
                )
            })
            .collect();
        assert_eq!(
            tagged,
            vec![
                (Some("a".to_owned()), Some(0)),
                (Some("b".to_owned()), Some(1)),
                (Some("c".to_owned()), Some(2)),
            ]
        );
    }

    #[test]
    fn test_failures_are_delivered_independently() {
        let route = Route::new(multicast(
            Sequential::shared(),
            vec![label("ok"), Route::new(mark_failed("down"))],
        ));

        let out = collect(&route, Message::new("in"));
        assert_eq!(out.len(), 2);
        assert!(out[0].is_success());
        assert!(out[1].is_failure());
        assert_eq!(out[1].message().header_as::<usize>(POSITION), Some(&1));
    }

    #[test]
    fn test_no_destinations_delivers_nothing() {
        let route = Route::new(multicast(Sequential::shared(), Vec::new()));
        assert!(collect(&route, Message::new("in")).is_empty());
    }
}
