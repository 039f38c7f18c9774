//! Mailer parameters

use serde::Deserialize;
use thiserror::Error;

use crate::domain::communication::email_addresses::{AddressSpec, AddressSpecError};

/// Errors that can occur when building [`MailerParameters`]
#[derive(Debug, Error)]
pub enum ParametersError {
    /// A template name is empty
    #[error("{0} template name is empty")]
    EmptyTemplateName(&'static str),

    /// A from address is invalid
    #[error(transparent)]
    InvalidAddress(#[from] AddressSpecError),

    /// The parameters file could not be read
    #[error("could not read parameters file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The parameters file is not valid
    #[error("invalid parameters file: {0}")]
    InvalidFile(#[from] serde_json::Error),
}

/// Sender of each kind of email
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FromEmail {
    /// Sender of confirmation emails
    pub confirmation: AddressSpec,

    /// Sender of password resetting emails
    pub resetting: AddressSpec,
}

/// Mailer parameters
///
/// Deserializes from
///
/// ```json
/// {
///     "confirmation": { "template": "emails/registration/confirmation.jinja" },
///     "resetting": { "template": "emails/resetting/reset.jinja" },
///     "from_email": {
///         "confirmation": "no-reply@example.com",
///         "resetting": { "no-reply@example.com": "Support" }
///     },
///     "inline_css": false
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ParametersFile")]
pub struct MailerParameters {
    confirmation_template: String,
    resetting_template: String,
    from_email: FromEmail,
    inline_css: bool,
}

impl MailerParameters {
    /// Create mailer parameters
    ///
    /// # Returns
    /// [`ParametersError::EmptyTemplateName`] if either template name is blank.
    pub fn new(
        confirmation_template: impl Into<String>,
        resetting_template: impl Into<String>,
        from_email: FromEmail,
    ) -> Result<Self, ParametersError> {
        let confirmation_template = confirmation_template.into();
        let resetting_template = resetting_template.into();

        if confirmation_template.trim().is_empty() {
            return Err(ParametersError::EmptyTemplateName("confirmation"));
        }

        if resetting_template.trim().is_empty() {
            return Err(ParametersError::EmptyTemplateName("resetting"));
        }

        Ok(Self {
            confirmation_template,
            resetting_template,
            from_email,
            inline_css: false,
        })
    }

    /// Inline `<style>` rules into HTML bodies before sending
    pub fn with_inline_css(mut self, inline_css: bool) -> Self {
        self.inline_css = inline_css;
        self
    }

    /// Parse parameters from their JSON representation
    pub fn from_json(json: &str) -> Result<Self, ParametersError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Template used for confirmation emails
    pub fn confirmation_template(&self) -> &str {
        &self.confirmation_template
    }

    /// Template used for password resetting emails
    pub fn resetting_template(&self) -> &str {
        &self.resetting_template
    }

    /// Senders of each kind of email
    pub fn from_email(&self) -> &FromEmail {
        &self.from_email
    }

    /// Whether CSS is inlined into HTML bodies
    pub fn inline_css(&self) -> bool {
        self.inline_css
    }
}

#[derive(Deserialize)]
struct ParametersFile {
    confirmation: TemplateSection,
    resetting: TemplateSection,
    from_email: FromEmail,
    #[serde(default)]
    inline_css: bool,
}

#[derive(Deserialize)]
struct TemplateSection {
    template: String,
}

impl TryFrom<ParametersFile> for MailerParameters {
    type Error = ParametersError;

    fn try_from(file: ParametersFile) -> Result<Self, Self::Error> {
        Ok(MailerParameters::new(
            file.confirmation.template,
            file.resetting.template,
            file.from_email,
        )?
        .with_inline_css(file.inline_css))
    }
}
