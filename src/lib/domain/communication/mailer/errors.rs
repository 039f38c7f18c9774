//! Mailer errors

use lettre::address::AddressError;
use thiserror::Error;

/// Errors raised by a [`MessageTransport`](super::MessageTransport)
#[derive(Debug, Error)]
pub enum TransportError {
    /// An address of the message is not accepted by the transport
    #[error("invalid email address: {0}")]
    InvalidEmail(#[from] AddressError),

    /// The message could not be encoded for delivery
    #[error("could not build the email: {0}")]
    InvalidMessage(#[from] lettre::error::Error),

    /// The server permanently refused the message
    #[error("the email was rejected: {0}")]
    Rejected(anyhow::Error),

    /// The message could not be delivered, possibly temporarily
    #[error("an error occurred while sending the email: {0}")]
    SendError(anyhow::Error),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

/// Errors that can occur when assembling a [`Message`](super::Message)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageError {
    /// The message has no sender
    #[error("message has no sender")]
    NoSender,

    /// The message has no recipient
    #[error("message has no recipient")]
    NoRecipient,
}
