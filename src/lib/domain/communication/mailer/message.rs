//! Email message

use crate::domain::communication::email_addresses::NamedAddress;

use super::MessageError;

/// Email message
///
/// Always has a text body, at least one sender and at least one recipient. The HTML body is
/// only present when it has content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    from: Vec<NamedAddress>,
    to: Vec<NamedAddress>,
    subject: String,
    text_body: String,
    html_body: Option<String>,
}

impl Message {
    /// Assemble a message
    ///
    /// An empty `html_body` is dropped.
    pub fn new(
        from: Vec<NamedAddress>,
        to: Vec<NamedAddress>,
        subject: impl Into<String>,
        text_body: impl Into<String>,
        html_body: Option<String>,
    ) -> Result<Self, MessageError> {
        if from.is_empty() {
            return Err(MessageError::NoSender);
        }

        if to.is_empty() {
            return Err(MessageError::NoRecipient);
        }

        Ok(Self {
            from,
            to,
            subject: subject.into(),
            text_body: text_body.into(),
            html_body: html_body.filter(|html| !html.is_empty()),
        })
    }

    /// The senders, in configuration order
    pub fn senders(&self) -> &[NamedAddress] {
        &self.from
    }

    /// The recipients
    pub fn recipients(&self) -> &[NamedAddress] {
        &self.to
    }

    /// The subject line
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The plain text body
    pub fn text_body(&self) -> &str {
        &self.text_body
    }

    /// The HTML body, if any
    pub fn html_body(&self) -> Option<&str> {
        self.html_body.as_deref()
    }
}
