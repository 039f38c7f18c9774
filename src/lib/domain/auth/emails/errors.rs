//! Error types for user emails

use css_inline::InlineError;
use thiserror::Error;

use crate::domain::communication::{
    mailer::{MessageError, TransportError},
    routing::UrlGenerationError,
    templates::TemplateError,
};

/// Errors that can occur when sending a confirmation or password resetting email
#[derive(Debug, Error)]
pub enum UserMailerError {
    /// The user has no confirmation token to put in the link
    #[error("user has no confirmation token")]
    MissingConfirmationToken,

    /// The link could not be generated
    #[error(transparent)]
    Url(#[from] UrlGenerationError),

    /// The template could not be rendered
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The CSS of the HTML body could not be inlined
    #[error("could not inline CSS: {0}")]
    CssInline(#[from] InlineError),

    /// The message could not be assembled
    #[error(transparent)]
    Message(#[from] MessageError),

    /// The transport did not accept the message
    #[error(transparent)]
    Transport(#[from] TransportError),
}
