//! Strategy selection for route construction.

use crate::{
    eip::{Multicast, Scatter, multicast, scatter},
    processors::{FnProcessor, process_fn},
};
use std::fmt;
use weir_core::{BoxError, Message, Route, Sequential, SharedStrategy};

/// Strategies used when building routes, one per concern.
///
/// Both concerns default to [`Sequential`]. The config is an explicit value
/// passed to whatever builds routes; nothing reads it implicitly.
///
/// # Example
///
/// ```rust
/// use weir_core::{Route, Sequential};
/// use weir_std::config::RoutingConfig;
///
/// let config = RoutingConfig::new().multicast(Sequential::shared());
/// let fan_out = config.multicast_to([Route::identity(), Route::identity()]);
/// assert_eq!(fan_out.len(), 2);
/// ```
#[derive(Clone)]
pub struct RoutingConfig {
    dispatch: SharedStrategy,
    multicast: SharedStrategy,
}

impl RoutingConfig {
    /// A config using [`Sequential`] for every concern.
    pub fn new() -> Self {
        Self {
            dispatch: Sequential::shared(),
            multicast: Sequential::shared(),
        }
    }

    /// Set the strategy used for per-step dispatch.
    pub fn dispatch(mut self, strategy: SharedStrategy) -> Self {
        self.dispatch = strategy;
        self
    }

    /// Set the strategy used for multicast fan-out.
    pub fn multicast(mut self, strategy: SharedStrategy) -> Self {
        self.multicast = strategy;
        self
    }

    /// The per-step dispatch strategy.
    pub fn dispatch_strategy(&self) -> &SharedStrategy {
        &self.dispatch
    }

    /// The fan-out strategy.
    pub fn multicast_strategy(&self) -> &SharedStrategy {
        &self.multicast
    }

    /// A function processor dispatched under this config.
    pub fn process<F, E>(&self, f: F) -> FnProcessor<F>
    where
        F: Fn(Message) -> Result<Message, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        process_fn(f).dispatch_on(self.dispatch.clone())
    }

    /// A multicast fanned out under this config.
    pub fn multicast_to<I>(&self, destinations: I) -> Multicast
    where
        I: IntoIterator<Item = Route>,
    {
        multicast(self.multicast.clone(), destinations)
    }

    /// A scatter fanned out under this config.
    pub fn scatter<I>(&self, destinations: I) -> Scatter
    where
        I: IntoIterator<Item = Route>,
    {
        scatter(self.multicast.clone(), destinations)
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RoutingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingConfig").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ManualStrategy, RecordingSink, collect};
    use weir_core::{Processor, RoutingError};

    #[test]
    fn test_default_is_sequential() {
        let config = RoutingConfig::default();
        let route = Route::new(config.process(|m: Message| {
            Ok::<_, BoxError>(m.set_body("done"))
        }));
        assert_eq!(
            collect(&route, Message::new("x"))[0].message().body_str(),
            Some("done")
        );
    }

    #[test]
    fn test_dispatch_strategy_is_used() {
        let strategy = ManualStrategy::new();
        let config = RoutingConfig::new().dispatch(strategy.shared());
        let route = Route::new(config.process(|m: Message| {
            Err::<Message, _>(RoutingError::Failed(format!("{:?}", m.body_str())))
        }));
        let sink = RecordingSink::new();

        route.process(Message::new("x"), sink.continuation());
        assert_eq!(strategy.pending(), 1);
        strategy.run_all();
        assert_eq!(sink.failures(), 1);
    }

    #[test]
    fn test_multicast_strategy_is_used() {
        let strategy = ManualStrategy::new();
        let config = RoutingConfig::new().multicast(strategy.shared());
        let sink = RecordingSink::new();

        config
            .multicast_to([Route::identity(), Route::identity()])
            .process(Message::new("x"), sink.continuation());
        assert_eq!(strategy.pending(), 2);
        strategy.run_all();
        assert_eq!(sink.successes(), 2);
    }
}
