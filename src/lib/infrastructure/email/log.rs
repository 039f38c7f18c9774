//! Log-only message transport
//!
//! Messages are written to the log instead of being delivered. Used for dry runs.

use async_trait::async_trait;
use tracing::info;

use crate::domain::communication::mailer::{Message, MessageTransport, TransportError};

/// Transport that only logs messages
#[derive(Debug, Default, Clone)]
pub struct LogTransport;

#[async_trait]
impl MessageTransport for LogTransport {
    async fn send(&self, message: &Message) -> Result<(), TransportError> {
        let from = message
            .senders()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let to = message
            .recipients()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        info!(
            %from,
            %to,
            subject = %message.subject(),
            html = message.html_body().is_some(),
            "not sending email"
        );

        Ok(())
    }
}
