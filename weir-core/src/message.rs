//! The immutable message routed through Weir.

use crate::error::{BoxError, Exception};
use std::{any::Any, collections::HashMap, fmt, sync::Arc};

/// A type-erased body or header value.
pub type Value = Arc<dyn Any + Send + Sync>;

/// An immutable message.
///
/// Every "mutating" operation returns a new `Message` and leaves the receiver
/// untouched. Body and header values are reference counted, so copies share
/// their payloads.
///
/// A message whose [`exception`](Message::exception) is set is a failure,
/// whatever its body.
///
/// # Example
///
/// ```rust
/// use weir_core::Message;
///
/// let original = Message::new("a".to_string());
/// let changed = original.add_header("k", 1u32).set_body("b".to_string());
///
/// assert_eq!(original.body_str(), Some("a"));
/// assert_eq!(changed.body_str(), Some("b"));
/// assert_eq!(changed.header_as::<u32>("k"), Some(&1));
/// ```
#[derive(Clone)]
pub struct Message {
    body: Value,
    headers: HashMap<String, Value>,
    exception: Option<Exception>,
    exception_handled: bool,
    oneway: bool,
}

impl Message {
    /// Create a message with the given body and no headers.
    pub fn new<B: Any + Send + Sync>(body: B) -> Self {
        Self::from_value(Arc::new(body))
    }

    /// Create a message from an already shared body.
    pub fn from_value(body: Value) -> Self {
        Self {
            body,
            headers: HashMap::new(),
            exception: None,
            exception_handled: false,
            oneway: false,
        }
    }

    /// The raw body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// The body as `T`, if it has that type.
    pub fn body_as<T: Any>(&self) -> Option<&T> {
        self.body.downcast_ref::<T>()
    }

    /// The body as a string slice, for `String` and `&'static str` bodies.
    pub fn body_str(&self) -> Option<&str> {
        value_str(&self.body)
    }

    /// Header value by name.
    pub fn header(&self, name: &str) -> Option<&Value> {
        self.headers.get(name)
    }

    /// Header value by name, as `T`.
    pub fn header_as<T: Any>(&self, name: &str) -> Option<&T> {
        self.headers.get(name).and_then(|v| v.downcast_ref::<T>())
    }

    /// Whether the header is present.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    /// Iterator over header names.
    pub fn header_names(&self) -> impl Iterator<Item = &str> {
        self.headers.keys().map(String::as_str)
    }

    /// The exception, if this message represents a failure.
    pub fn exception(&self) -> Option<&Exception> {
        self.exception.as_ref()
    }

    /// Whether a recovery route has taken over a failure of this message.
    pub fn exception_handled(&self) -> bool {
        self.exception_handled
    }

    /// Whether no response is expected.
    pub fn is_oneway(&self) -> bool {
        self.oneway
    }

    /// Returns a copy with a new body.
    pub fn set_body<B: Any + Send + Sync>(&self, body: B) -> Self {
        self.set_body_value(Arc::new(body))
    }

    /// Returns a copy with a new, already shared, body.
    pub fn set_body_value(&self, body: Value) -> Self {
        Self {
            body,
            ..self.clone()
        }
    }

    /// Returns a copy with the header set. An existing value is replaced.
    pub fn add_header<V: Any + Send + Sync>(&self, name: impl Into<String>, value: V) -> Self {
        let mut next = self.clone();
        next.headers.insert(name.into(), Arc::new(value));
        next
    }

    /// Returns a copy with all given headers set, later entries winning.
    pub fn add_headers<I, K>(&self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut next = self.clone();
        next.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v)));
        next
    }

    /// Returns a copy without the header.
    pub fn remove_header(&self, name: &str) -> Self {
        let mut next = self.clone();
        next.headers.remove(name);
        next
    }

    /// Returns a copy carrying the given error.
    pub fn set_exception(&self, error: impl Into<BoxError>) -> Self {
        let error: BoxError = error.into();
        self.set_exception_shared(Arc::from(error))
    }

    /// Returns a copy carrying an already shared error.
    pub fn set_exception_shared(&self, exception: Exception) -> Self {
        Self {
            exception: Some(exception),
            ..self.clone()
        }
    }

    /// Returns a copy without an exception.
    pub fn clear_exception(&self) -> Self {
        Self {
            exception: None,
            ..self.clone()
        }
    }

    /// Returns a copy with the one-way flag set.
    pub fn set_oneway(&self, oneway: bool) -> Self {
        Self {
            oneway,
            ..self.clone()
        }
    }

    /// Returns a copy whose exception has been handed to a recovery route.
    ///
    /// The exception is cleared so the recovery route starts from a
    /// successful message.
    pub fn mark_exception_handled(&self) -> Self {
        Self {
            exception: None,
            exception_handled: true,
            ..self.clone()
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.header_names().collect();
        names.sort_unstable();
        f.debug_struct("Message")
            .field("body", &value_str(&self.body).unwrap_or("<opaque>"))
            .field("headers", &names)
            .field("exception", &self.exception.as_ref().map(|e| e.to_string()))
            .field("exception_handled", &self.exception_handled)
            .field("oneway", &self.oneway)
            .finish()
    }
}

fn value_str(value: &Value) -> Option<&str> {
    if let Some(s) = value.downcast_ref::<String>() {
        Some(s.as_str())
    } else {
        value.downcast_ref::<&'static str>().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RoutingError;

    #[test]
    fn test_operations_leave_original_untouched() {
        let original = Message::new("a".to_string()).add_header("h", 1i32);

        let _ = original.set_body("b".to_string());
        let _ = original.add_header("h", 2i32);
        let _ = original.remove_header("h");
        let _ = original.set_exception(RoutingError::Failed("x".into()));
        let _ = original.set_oneway(true);

        assert_eq!(original.body_str(), Some("a"));
        assert_eq!(original.header_as::<i32>("h"), Some(&1));
        assert!(original.exception().is_none());
        assert!(!original.is_oneway());
    }

    #[test]
    fn test_header_last_write_wins() {
        let m = Message::new(())
            .add_header("k", "first")
            .add_headers([("k", Arc::new("second") as Value), ("j", Arc::new(3u8) as Value)]);

        assert_eq!(m.header_as::<&str>("k"), Some(&"second"));
        assert_eq!(m.header_as::<u8>("j"), Some(&3));
        assert_eq!(m.header_names().count(), 2);
    }

    #[test]
    fn test_header_type_mismatch_reads_none() {
        let m = Message::new(()).add_header("n", 5u64);
        assert!(m.has_header("n"));
        assert_eq!(m.header_as::<i32>("n"), None);
    }

    #[test]
    fn test_exception_round_trip() {
        let failed = Message::new(1u8).set_exception("broken");
        assert_eq!(failed.exception().map(|e| e.to_string()), Some("broken".into()));

        let cleared = failed.clear_exception();
        assert!(cleared.exception().is_none());
        assert!(!cleared.exception_handled());
    }

    #[test]
    fn test_mark_exception_handled() {
        let handled = Message::new(1u8)
            .set_exception(RoutingError::Timeout(std::time::Duration::from_secs(1)))
            .mark_exception_handled();

        assert!(handled.exception().is_none());
        assert!(handled.exception_handled());
    }

    #[test]
    fn test_body_access() {
        let m = Message::new(42u32);
        assert_eq!(m.body_as::<u32>(), Some(&42));
        assert_eq!(m.body_str(), None);
        assert_eq!(Message::new("static").body_str(), Some("static"));
    }
}
