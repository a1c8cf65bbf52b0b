//! Binding routes to endpoints.

use crate::{
    adapter::RouteAdapter,
    endpoint::{ConsumerHandle, ContextLifecycle, EndpointRegistry},
    error_handler::ErrorHandler,
};
use std::{fmt, sync::Arc, time::Duration};
use tokio::runtime::Handle;
use weir_core::{EndpointError, Processor};
use weir_std::config::RoutingConfig;

/// Routes bound to endpoints, plus the strategies used to build them.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use weir::{Message, Route, RouteContext, testing::InMemoryRegistry};
///
/// let registry = Arc::new(InMemoryRegistry::new());
/// let mut context = RouteContext::new(registry.clone()).with_lifecycle(registry.clone());
///
/// context.from("direct:echo").route(Route::identity()).unwrap();
/// context.start().unwrap();
///
/// let exchange = registry.request("direct:echo", Message::new("ping")).unwrap();
/// assert_eq!(exchange.out_message().unwrap().body_str(), Some("ping"));
/// ```
pub struct RouteContext {
    registry: Arc<dyn EndpointRegistry>,
    lifecycle: Option<Arc<dyn ContextLifecycle>>,
    config: RoutingConfig,
    consumers: Vec<ConsumerHandle>,
}

impl RouteContext {
    /// A context creating consumers through `registry`.
    pub fn new(registry: Arc<dyn EndpointRegistry>) -> Self {
        Self {
            registry,
            lifecycle: None,
            config: RoutingConfig::default(),
            consumers: Vec::new(),
        }
    }

    /// Delegate `start`/`stop` to `lifecycle`.
    pub fn with_lifecycle(mut self, lifecycle: Arc<dyn ContextLifecycle>) -> Self {
        self.lifecycle = Some(lifecycle);
        self
    }

    /// Use `config` when building routes.
    pub fn with_config(mut self, config: RoutingConfig) -> Self {
        self.config = config;
        self
    }

    /// The strategies for building routes in this context.
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Start declaring a route consuming from `uri`.
    pub fn from(&mut self, uri: impl Into<String>) -> FromBuilder<'_> {
        FromBuilder {
            context: self,
            uri: uri.into(),
            errors: ErrorHandler::new(),
            timeout: None,
        }
    }

    /// Consumers registered so far, in declaration order.
    pub fn consumers(&self) -> &[ConsumerHandle] {
        &self.consumers
    }

    /// Start the attached lifecycle. Without one this does nothing.
    pub fn start(&self) -> Result<(), EndpointError> {
        tracing::debug!(consumers = self.consumers.len(), "starting route context");
        match &self.lifecycle {
            Some(lifecycle) => lifecycle.start(),
            None => Ok(()),
        }
    }

    /// Stop the attached lifecycle. Without one this does nothing.
    pub fn stop(&self) -> Result<(), EndpointError> {
        tracing::debug!("stopping route context");
        match &self.lifecycle {
            Some(lifecycle) => lifecycle.stop(),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for RouteContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteContext")
            .field("consumers", &self.consumers)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A route declaration in progress, created by [`RouteContext::from`].
pub struct FromBuilder<'a> {
    context: &'a mut RouteContext,
    uri: String,
    errors: ErrorHandler,
    timeout: Option<(Duration, Handle)>,
}

impl FromBuilder<'_> {
    /// Recover failures through `errors`.
    pub fn handle(mut self, errors: ErrorHandler) -> Self {
        self.errors = errors;
        self
    }

    /// Time out exchanges that produce no outcome within `after`.
    pub fn timeout(mut self, after: Duration, handle: Handle) -> Self {
        self.timeout = Some((after, handle));
        self
    }

    /// Bind `route` to the endpoint and register its consumer.
    pub fn route(self, route: impl Processor) -> Result<ConsumerHandle, EndpointError> {
        let mut adapter = RouteAdapter::new(route).error_handler(self.errors);
        if let Some((after, handle)) = self.timeout {
            adapter = adapter.timeout(after, handle);
        }

        let consumer = self
            .context
            .registry
            .create_consumer(&self.uri, Arc::new(adapter))?;
        tracing::debug!(uri = %self.uri, "route registered");
        self.context.consumers.push(consumer.clone());
        Ok(consumer)
    }
}
