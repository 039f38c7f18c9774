//! Message transport module

mod errors;
mod message;

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

pub use errors::{MessageError, TransportError};
pub use message::Message;

/// Delivers assembled messages
///
/// What delivery means (SMTP relay, a log line, an in-memory outbox) is up to the
/// implementation; callers only see whether the message was accepted.
#[async_trait]
pub trait MessageTransport: Clone + Send + Sync + 'static {
    /// Send a message
    ///
    /// # Arguments
    /// * `message` - The [`Message`] to deliver.
    ///
    /// # Returns
    /// A [`Result`] indicating whether the transport accepted the message.
    async fn send(&self, message: &Message) -> Result<(), TransportError>;
}

#[cfg(test)]
mock! {
    pub MessageTransport {}

    impl Clone for MessageTransport {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl MessageTransport for MessageTransport {
        async fn send(&self, message: &Message) -> Result<(), TransportError>;
    }
}
