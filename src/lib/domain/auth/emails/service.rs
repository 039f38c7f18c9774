//! User mailer service

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use css_inline::CSSInliner;
use tracing::debug;

#[cfg(test)]
use mockall::mock;

use crate::domain::{
    auth::{
        emails::{MailerParameters, UserMailerError},
        users::User,
    },
    communication::{
        email_addresses::AddressSpec,
        mailer::{Message, MessageTransport},
        routing::{UrlGenerator, REGISTRATION_CONFIRM_ROUTE, RESETTING_RESET_ROUTE},
        templates::{
            RenderContext, TemplateRenderer, BODY_HTML_BLOCK, BODY_TEXT_BLOCK, SUBJECT_BLOCK,
        },
    },
};

/// Sends the emails of a user's lifecycle
#[async_trait]
pub trait UserMailer: Clone + Send + Sync + 'static {
    /// Sends the registration confirmation email to the user.
    ///
    /// # Arguments
    /// * `user` - The user who registered. Must have a confirmation token.
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] once the message was handed to the transport.
    async fn send_confirmation_email_message(&self, user: &User) -> Result<(), UserMailerError>;

    /// Sends the password resetting email to the user.
    ///
    /// # Arguments
    /// * `user` - The user who requested the reset. Must have a confirmation token.
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] once the message was handed to the transport.
    async fn send_resetting_email_message(&self, user: &User) -> Result<(), UserMailerError>;
}

#[cfg(test)]
mock! {
    pub UserMailer {}

    impl Clone for UserMailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl UserMailer for UserMailer {
        async fn send_confirmation_email_message(&self, user: &User) -> Result<(), UserMailerError>;
        async fn send_resetting_email_message(&self, user: &User) -> Result<(), UserMailerError>;
    }
}

/// User mailer implementation
#[derive(Debug, Clone)]
pub struct UserMailerImpl<R, U, T>
where
    R: TemplateRenderer,
    U: UrlGenerator,
    T: MessageTransport,
{
    templates: Arc<R>,
    urls: Arc<U>,
    transport: Arc<T>,
    parameters: MailerParameters,
}

impl<R, U, T> UserMailerImpl<R, U, T>
where
    R: TemplateRenderer,
    U: UrlGenerator,
    T: MessageTransport,
{
    /// Creates a new user mailer.
    pub fn new(
        templates: Arc<R>,
        urls: Arc<U>,
        transport: Arc<T>,
        parameters: MailerParameters,
    ) -> Self {
        Self {
            templates,
            urls,
            transport,
            parameters,
        }
    }

    fn render_context(&self, user: &User, route: &str) -> Result<RenderContext, UserMailerError> {
        let token = user
            .confirmation_token()
            .ok_or(UserMailerError::MissingConfirmationToken)?;

        let parameters = BTreeMap::from([("token".to_string(), token.to_string())]);
        let confirmation_url = self.urls.generate(route, &parameters)?;

        Ok(RenderContext {
            user: user.clone(),
            confirmation_url,
        })
    }

    async fn send_message(
        &self,
        template: &str,
        context: &RenderContext,
        from: &AddressSpec,
        to: &AddressSpec,
    ) -> Result<(), UserMailerError> {
        let subject = self
            .templates
            .render_block(template, SUBJECT_BLOCK, context)?;
        let text_body = self
            .templates
            .render_block(template, BODY_TEXT_BLOCK, context)?;

        let mut html_body = None;

        if self.templates.has_block(template, BODY_HTML_BLOCK, context)? {
            let html = self
                .templates
                .render_block(template, BODY_HTML_BLOCK, context)?;

            html_body = match (self.parameters.inline_css(), html.is_empty()) {
                (true, false) => Some(inline_css(&html)?),
                _ => Some(html),
            };
        }

        let message = Message::new(
            from.mailboxes(),
            to.mailboxes(),
            subject.trim(),
            text_body,
            html_body,
        )?;

        debug!(%template, to = %to, "sending email");

        self.transport.send(&message).await?;

        Ok(())
    }
}

/// Moves `<style>` rules into `style` attributes
///
/// Linked stylesheets are left alone; nothing is fetched over the network.
fn inline_css(html: &str) -> Result<String, UserMailerError> {
    let inliner = CSSInliner::options()
        .load_remote_stylesheets(false)
        .build();

    inliner.inline(html).map_err(|err| {
        debug!("InlineError -> UserMailerError: {:?}", err);

        UserMailerError::CssInline(err)
    })
}

#[async_trait]
impl<R, U, T> UserMailer for UserMailerImpl<R, U, T>
where
    R: TemplateRenderer,
    U: UrlGenerator,
    T: MessageTransport,
{
    async fn send_confirmation_email_message(&self, user: &User) -> Result<(), UserMailerError> {
        let context = self.render_context(user, REGISTRATION_CONFIRM_ROUTE)?;

        self.send_message(
            self.parameters.confirmation_template(),
            &context,
            &self.parameters.from_email().confirmation,
            &AddressSpec::Single(user.email.clone()),
        )
        .await
    }

    async fn send_resetting_email_message(&self, user: &User) -> Result<(), UserMailerError> {
        let context = self.render_context(user, RESETTING_RESET_ROUTE)?;

        self.send_message(
            self.parameters.resetting_template(),
            &context,
            &self.parameters.from_email().resetting,
            &AddressSpec::Single(user.email.clone()),
        )
        .await
    }
}
