//! Bridges endpoint exchanges to routes.
//!
//! The [`RouteAdapter`] is the terminal of every route: it turns an inbound
//! exchange into a [`Message`], runs the route and writes the first outcome
//! back to the exchange. Later outcomes are dropped, so a route that delivers
//! several times (a multicast, a splitter) still completes its exchange
//! exactly once.

use crate::{endpoint::ExchangeHandler, error_handler::ErrorHandler, exchange::ExchangeRef};
use std::{
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::{runtime::Handle, task::AbortHandle};
use weir_core::{
    Continuation, Exception, Message, Processor, Route, RoutingError, Validation, continuation,
    discard, once,
};

/// Runs a route for every exchange handed to it.
#[derive(Clone)]
pub struct RouteAdapter {
    route: Route,
    errors: ErrorHandler,
    timeout: Option<Timeout>,
}

#[derive(Clone)]
struct Timeout {
    after: Duration,
    handle: Handle,
}

impl RouteAdapter {
    /// Adapt `route` with no recovery routes and no timeout.
    pub fn new(route: impl Processor) -> Self {
        Self {
            route: Route::new(route),
            errors: ErrorHandler::new(),
            timeout: None,
        }
    }

    /// Recover failures through `errors`.
    pub fn error_handler(mut self, errors: ErrorHandler) -> Self {
        self.errors = errors;
        self
    }

    /// Fail in-out exchanges with [`RoutingError::Timeout`] when no outcome
    /// is written within `after`. The timer runs on `handle`.
    pub fn timeout(mut self, after: Duration, handle: Handle) -> Self {
        self.timeout = Some(Timeout { after, handle });
        self
    }

    fn handle_in_only(&self, exchange: &ExchangeRef) {
        tracing::debug!("routing in-only exchange");
        self.route.process(exchange.in_message().set_oneway(true), discard());
        exchange.complete(false);
    }

    fn handle_in_out(&self, exchange: ExchangeRef) {
        tracing::debug!("routing in-out exchange");
        let message = exchange.in_message();
        let completion = Arc::new(Completion {
            exchange,
            returned: AtomicBool::new(false),
            written: AtomicBool::new(false),
            timer: Mutex::new(None),
        });
        let k = recovering(self.errors.clone(), write_back(Arc::clone(&completion)));

        if let Some(timeout) = &self.timeout {
            let timer = arm_timer(
                timeout,
                message.clone(),
                Arc::clone(&completion),
                Arc::clone(&k),
            );
            *completion.timer.lock().unwrap_or_else(PoisonError::into_inner) = Some(timer);
        }

        self.route.process(message, k);
        completion.returned.store(true, Ordering::Release);
    }
}

impl ExchangeHandler for RouteAdapter {
    fn handle(&self, exchange: ExchangeRef) {
        if exchange.is_out_capable() {
            self.handle_in_out(exchange);
        } else {
            self.handle_in_only(&exchange);
        }
    }
}

/// Write-back state of one in-out exchange.
///
/// The armed timer task holds this state; writing an outcome aborts the task
/// so a completed exchange is released without waiting for the timer.
struct Completion {
    exchange: ExchangeRef,
    returned: AtomicBool,
    written: AtomicBool,
    timer: Mutex<Option<AbortHandle>>,
}

impl Completion {
    fn write(&self, outcome: Validation) {
        self.written.store(true, Ordering::Release);
        if let Some(timer) = self
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            timer.abort();
        }
        match outcome {
            Validation::Success(message) => self.exchange.set_out_message(message),
            Validation::Failure(message) => {
                let exception: Exception = match message.exception() {
                    Some(exception) => Arc::clone(exception),
                    None => Arc::new(RoutingError::Failed("route failed".to_owned())),
                };
                tracing::warn!(%exception, "route failed without recovery");
                self.exchange.set_exception(exception);
                self.exchange.set_out_message(message);
            }
        }
        self.exchange.complete(self.returned.load(Ordering::Acquire));
    }
}

fn write_back(completion: Arc<Completion>) -> Continuation {
    let writer = Arc::clone(&completion);
    let guarded = once(continuation(move |outcome| writer.write(outcome)));
    continuation(move |outcome| {
        if completion.written.load(Ordering::Acquire) {
            tracing::trace!("exchange already completed, dropping outcome");
        }
        guarded(outcome);
    })
}

/// Hands failures matching a recovery route over to it.
///
/// The recovery route's outcomes go straight to `next`; a failing recovery
/// is not recovered again.
fn recovering(errors: ErrorHandler, next: Continuation) -> Continuation {
    continuation(move |outcome| match outcome {
        Validation::Failure(message) => {
            let recovery = message
                .exception()
                .and_then(|exception| errors.recovery_for(exception))
                .cloned();
            match recovery {
                Some(route) => {
                    tracing::debug!(?message, "recovering failed exchange");
                    route.process(message.mark_exception_handled(), Arc::clone(&next));
                }
                None => next(Validation::Failure(message)),
            }
        }
        success => next(success),
    })
}

fn arm_timer(
    timeout: &Timeout,
    message: Message,
    completion: Arc<Completion>,
    k: Continuation,
) -> AbortHandle {
    let after = timeout.after;
    let task = timeout.handle.spawn(async move {
        tokio::time::sleep(after).await;
        if !completion.written.load(Ordering::Acquire) {
            tracing::debug!(?after, "exchange timed out");
            k(Validation::Failure(
                message.set_exception(RoutingError::Timeout(after)),
            ));
        }
    });
    task.abort_handle()
}
