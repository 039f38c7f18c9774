//! In-memory message transport

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;

use crate::domain::communication::mailer::{Message, MessageTransport, TransportError};

/// Transport keeping every message it is given
///
/// Clones share the same outbox.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTransport {
    outbox: Arc<Mutex<Vec<Message>>>,
}

impl InMemoryTransport {
    /// Create an empty transport
    pub fn new() -> Self {
        Self::default()
    }

    /// The messages sent so far, oldest first
    pub fn messages(&self) -> Vec<Message> {
        match self.outbox.lock() {
            Ok(outbox) => outbox.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl MessageTransport for InMemoryTransport {
    async fn send(&self, message: &Message) -> Result<(), TransportError> {
        self.outbox
            .lock()
            .map_err(|_| anyhow!("outbox lock poisoned"))?
            .push(message.clone());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::communication::email_addresses::{EmailAddress, NamedAddress};

    use super::*;

    #[tokio::test]
    async fn test_clones_share_outbox() -> TestResult {
        let transport = InMemoryTransport::new();
        let message = Message::new(
            vec![NamedAddress::from(EmailAddress::new("no-reply@example.com")?)],
            vec![NamedAddress::from(EmailAddress::new("u@example.com")?)],
            "Subject",
            "Text",
            None,
        )?;

        transport.clone().send(&message).await?;

        assert_eq!(transport.messages(), vec![message]);

        Ok(())
    }
}
