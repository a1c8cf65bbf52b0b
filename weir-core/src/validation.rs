//! Success/failure wrapper delivered to continuations.

use crate::message::Message;

/// The outcome of a routing step.
///
/// Built from a [`Message`] by inspecting its exception: no exception is a
/// `Success`, an exception is a `Failure`.
#[derive(Debug, Clone)]
pub enum Validation {
    /// The message was processed successfully.
    Success(Message),
    /// The message carries an exception.
    Failure(Message),
}

impl Validation {
    /// Whether this is a `Success`.
    pub fn is_success(&self) -> bool {
        matches!(self, Validation::Success(_))
    }

    /// Whether this is a `Failure`.
    pub fn is_failure(&self) -> bool {
        matches!(self, Validation::Failure(_))
    }

    /// The carried message.
    pub fn message(&self) -> &Message {
        match self {
            Validation::Success(m) | Validation::Failure(m) => m,
        }
    }

    /// Unwraps the carried message.
    pub fn into_message(self) -> Message {
        match self {
            Validation::Success(m) | Validation::Failure(m) => m,
        }
    }

    /// Applies `f` to the carried message, keeping the tag.
    pub fn map<F>(self, f: F) -> Self
    where
        F: FnOnce(Message) -> Message,
    {
        match self {
            Validation::Success(m) => Validation::Success(f(m)),
            Validation::Failure(m) => Validation::Failure(f(m)),
        }
    }
}

impl From<Message> for Validation {
    fn from(message: Message) -> Self {
        if message.exception().is_some() {
            Validation::Failure(message)
        } else {
            Validation::Success(message)
        }
    }
}
