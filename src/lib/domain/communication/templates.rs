//! Email templates
//!
//! An email template is one template file defining named blocks: [`SUBJECT_BLOCK`] and
//! [`BODY_TEXT_BLOCK`] are mandatory, [`BODY_HTML_BLOCK`] is optional.

#[cfg(test)]
use mockall::mock;

use serde::Serialize;
use thiserror::Error;

use crate::domain::auth::users::User;

/// Block holding the subject line
pub const SUBJECT_BLOCK: &str = "subject";

/// Block holding the plain text body
pub const BODY_TEXT_BLOCK: &str = "body_text";

/// Block holding the HTML body
pub const BODY_HTML_BLOCK: &str = "body_html";

/// Values exposed to an email template
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderContext {
    /// The user the email is about
    pub user: User,

    /// Absolute URL the user follows to confirm the registration or reset the password
    #[serde(rename = "confirmationUrl")]
    pub confirmation_url: String,
}

/// Errors raised by a [`TemplateRenderer`]
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No template with that name
    #[error("template \"{0}\" not found")]
    TemplateNotFound(String),

    /// The template does not define the block
    #[error("block \"{block}\" not found in template \"{template}\"")]
    BlockNotFound {
        /// Template name
        template: String,

        /// Block name
        block: String,
    },

    /// The template failed to render
    #[error(transparent)]
    RenderError(#[from] anyhow::Error),
}

/// Renders named blocks of email templates
pub trait TemplateRenderer: Clone + Send + Sync + 'static {
    /// Render one block of a template
    ///
    /// # Returns
    /// - [`Ok`] with the rendered block.
    /// - [`Err`] with [`TemplateError::TemplateNotFound`] or [`TemplateError::BlockNotFound`]
    ///   if the template or block does not exist.
    fn render_block(
        &self,
        template: &str,
        block: &str,
        context: &RenderContext,
    ) -> Result<String, TemplateError>;

    /// Whether the template defines the block for this context
    fn has_block(
        &self,
        template: &str,
        block: &str,
        context: &RenderContext,
    ) -> Result<bool, TemplateError>;
}

#[cfg(test)]
mock! {
    pub TemplateRenderer {}

    impl Clone for TemplateRenderer {
        fn clone(&self) -> Self;
    }

    impl TemplateRenderer for TemplateRenderer {
        fn render_block(
            &self,
            template: &str,
            block: &str,
            context: &RenderContext,
        ) -> Result<String, TemplateError>;
        fn has_block(
            &self,
            template: &str,
            block: &str,
            context: &RenderContext,
        ) -> Result<bool, TemplateError>;
    }
}
