//! Processors built from plain functions.

use crate::fault::{catch, failure};
use std::sync::Arc;
use weir_core::{
    BoxError, Continuation, Message, Processor, Responder, SharedStrategy, Validation,
};

/// Call `f` on `message` and deliver its outcome to `k`.
///
/// A returned message is delivered through [`Validation::from`], so a message
/// carrying an exception is a failure. An error or a panic is delivered as a
/// failure on the input message.
pub fn invoke<F, E>(message: Message, k: &Continuation, f: F)
where
    F: FnOnce(Message) -> Result<Message, E>,
    E: Into<BoxError>,
{
    let original = message.clone();
    match catch("process", move || f(message).map_err(Into::into)) {
        Ok(result) => k(Validation::from(result)),
        Err(exception) => k(failure(&original, exception)),
    }
}

/// A processor running a function `Message -> Result<Message, E>`.
///
/// By default the function runs on the caller. [`dispatch_on`](FnProcessor::dispatch_on)
/// hands each invocation to a strategy instead.
pub struct FnProcessor<F> {
    f: Arc<F>,
    strategy: Option<SharedStrategy>,
}

/// Lift `f` into a processor.
///
/// # Example
///
/// ```rust
/// use weir_core::{BoxError, Message, Route};
/// use weir_std::processors::process_fn;
///
/// let upper = Route::new(process_fn(|m: Message| {
///     let text = m.body_str().unwrap_or_default().to_uppercase();
///     Ok::<_, BoxError>(m.set_body(text))
/// }));
/// # let _ = upper;
/// ```
pub fn process_fn<F, E>(f: F) -> FnProcessor<F>
where
    F: Fn(Message) -> Result<Message, E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    FnProcessor {
        f: Arc::new(f),
        strategy: None,
    }
}

impl<F> FnProcessor<F> {
    /// Run each invocation under `strategy`.
    pub fn dispatch_on(mut self, strategy: SharedStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }
}

impl<F, E> Processor for FnProcessor<F>
where
    F: Fn(Message) -> Result<Message, E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    fn process(&self, message: Message, k: Continuation) {
        match &self.strategy {
            None => invoke(message, &k, |m| (self.f)(m)),
            Some(strategy) => {
                let f = Arc::clone(&self.f);
                strategy.apply(Box::new(move || invoke(message, &k, |m| f(m))));
            }
        }
    }
}

/// A processor built from a Kleisli function `Message -> Responder<Validation>`.
pub struct ResponderFn<F>(F);

/// Lift a function returning a [`Responder`] into a processor.
pub fn responder_fn<F>(f: F) -> ResponderFn<F>
where
    F: Fn(Message) -> Responder<Validation> + Send + Sync + 'static,
{
    ResponderFn(f)
}

impl<F> Processor for ResponderFn<F>
where
    F: Fn(Message) -> Responder<Validation> + Send + Sync + 'static,
{
    fn process(&self, message: Message, k: Continuation) {
        (self.0)(message).respond_with(k);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ManualStrategy, RecordingSink, collect};
    use weir_core::{Route, RoutingError, Sequential};

    fn append(
        suffix: &'static str,
    ) -> FnProcessor<impl Fn(Message) -> Result<Message, BoxError> + Send + Sync + 'static> {
        process_fn(move |m: Message| {
            let body = format!("{}{}", m.body_str().unwrap_or_default(), suffix);
            Ok::<_, BoxError>(m.set_body(body))
        })
    }

    #[test]
    fn test_function_result_is_delivered() {
        let route = Route::new(append("-1")) >> append("-2");
        let out = collect(&route, Message::new("a".to_string()));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].message().body_str(), Some("a-1-2"));
    }

    #[test]
    fn test_error_fails_original_message() {
        let route = Route::new(process_fn(|_: Message| {
            Err::<Message, _>(RoutingError::Failed("rejected".into()))
        }));
        let out = collect(&route, Message::new("in"));
        assert!(out[0].is_failure());
        assert_eq!(out[0].message().body_str(), Some("in"));
    }

    #[test]
    fn test_returned_exception_is_failure() {
        let route = Route::new(process_fn(|m: Message| {
            Ok::<_, BoxError>(m.set_exception("inner"))
        }));
        assert!(collect(&route, Message::new("in"))[0].is_failure());
    }

    #[test]
    fn test_dispatch_on_strategy() {
        let strategy = ManualStrategy::new();
        let route = Route::new(append("!").dispatch_on(strategy.shared()));
        let sink = RecordingSink::new();

        route.process(Message::new("x".to_string()), sink.continuation());
        assert_eq!(sink.count(), 0);

        strategy.run_all();
        assert_eq!(sink.bodies(), vec!["x!".to_owned()]);
    }

    #[test]
    fn test_responder_fn() {
        let route = Route::new(responder_fn(|m: Message| {
            Responder::spawn(Sequential, move || Validation::Success(m.set_body("spawned")))
        }));
        assert_eq!(
            collect(&route, Message::new("x"))[0].message().body_str(),
            Some("spawned")
        );
    }
}
