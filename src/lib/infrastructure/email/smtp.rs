//! SMTP message transport implementation

use std::{fmt, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use clap::{ArgAction, Parser};
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};
use tracing::debug;

use crate::domain::communication::{
    email_addresses::NamedAddress,
    mailer::{Message, MessageTransport, TransportError},
};

/// SMTP configuration
#[derive(Clone, Default, Debug, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[clap(long = "smtp-host", env = "SMTP_HOST", default_value = "localhost")]
    pub host: String,

    /// The SMTP port
    #[clap(long = "smtp-port", env = "SMTP_PORT", default_value = "587")]
    pub port: u16,

    /// The SMTP username
    #[clap(long = "smtp-user", env = "SMTP_USER")]
    pub username: Option<String>,

    /// The SMTP password
    #[clap(long = "smtp-password", env = "SMTP_PASSWORD")]
    pub password: Option<String>,

    /// Verify the TLS certificate
    #[clap(long, env = "SMTP_VERIFY_TLS", default_value = "true", action = ArgAction::Set)]
    pub verify_tls: bool,

    /// Enable STARTTLS (TLS upgrade on connection) instead of implicit TLS
    #[clap(long, env = "SMTP_STARTTLS", default_value = "true", action = ArgAction::Set)]
    pub starttls: bool,
}

/// SMTP transport
#[derive(Clone)]
pub struct SMTPTransport {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SMTPTransport {
    /// Create a new SMTP transport
    pub fn new(config: &SMTPConfig) -> Result<Self> {
        Ok(Self {
            transport: Arc::new(Self::transport(config)?),
        })
    }

    fn transport(config: &SMTPConfig) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let tls = TlsParameters::builder(config.host.to_string())
            .dangerous_accept_invalid_certs(!config.verify_tls)
            .build()?;

        let mut relay = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
                .tls(Tls::Required(tls))
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?.tls(Tls::Wrapper(tls))
        };

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            relay = relay.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(relay.port(config.port).build())
    }
}

impl fmt::Debug for SMTPTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SMTPTransport")
            .field("transport", &"AsyncSmtpTransport")
            .finish()
    }
}

fn mailbox(address: &NamedAddress) -> Result<Mailbox, TransportError> {
    Ok(Mailbox::new(
        address.display_name().map(str::to_string),
        address.address.as_str().parse()?,
    ))
}

/// Convert a [`Message`] into a MIME message
///
/// A message with several senders gets the first one as its `Sender` header.
pub fn build_email(message: &Message) -> Result<lettre::Message, TransportError> {
    let mut builder = lettre::Message::builder().subject(message.subject());

    for sender in message.senders() {
        builder = builder.from(mailbox(sender)?);
    }

    if let [first, _, ..] = message.senders() {
        builder = builder.sender(mailbox(first)?);
    }

    for recipient in message.recipients() {
        builder = builder.to(mailbox(recipient)?);
    }

    let email = match message.html_body() {
        Some(html) => builder.multipart(MultiPart::alternative_plain_html(
            String::from(message.text_body()),
            String::from(html),
        ))?,
        None => builder
            .header(ContentType::TEXT_PLAIN)
            .body(String::from(message.text_body()))?,
    };

    Ok(email)
}

#[async_trait]
impl MessageTransport for SMTPTransport {
    async fn send(&self, message: &Message) -> Result<(), TransportError> {
        let email = build_email(message)?;

        match self.transport.send(email).await {
            Ok(_) => Ok(()),
            Err(e) => Err(send_error(e)),
        }
    }
}

fn send_error(err: lettre::transport::smtp::Error) -> TransportError {
    debug!("smtp::Error -> TransportError: {:?}", err);

    if err.is_permanent() {
        TransportError::Rejected(err.into())
    } else {
        TransportError::SendError(err.into())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::communication::email_addresses::EmailAddress;

    use super::*;

    fn named(address: &str, name: &str) -> NamedAddress {
        NamedAddress::new(EmailAddress::new(address).unwrap(), name)
    }

    fn formatted(email: &lettre::Message) -> TestResult<String> {
        Ok(String::from_utf8(email.formatted())?)
    }

    #[test]
    fn test_text_only_message_is_single_part() -> TestResult {
        let message = Message::new(
            vec![named("no-reply@example.com", "")],
            vec![named("u@example.com", "")],
            "Reset Password",
            "Hello",
            None,
        )?;

        let email = build_email(&message)?;
        let raw = formatted(&email)?;

        assert!(raw.contains("Subject: Reset Password"));
        assert!(raw.contains("Content-Type: text/plain"));
        assert!(!raw.contains("multipart/alternative"));
        assert_eq!(
            email.envelope().from().map(ToString::to_string),
            Some("no-reply@example.com".to_string())
        );

        Ok(())
    }

    #[test]
    fn test_html_message_is_multipart_alternative() -> TestResult {
        let message = Message::new(
            vec![named("no-reply@example.com", "Support")],
            vec![named("u@example.com", "")],
            "Welcome",
            "Hello",
            Some("<p>Hello</p>".to_string()),
        )?;

        let raw = formatted(&build_email(&message)?)?;

        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("Support"));
        assert!(raw.contains("<no-reply@example.com>"));

        Ok(())
    }

    #[test]
    fn test_every_recipient_is_in_envelope() -> TestResult {
        let message = Message::new(
            vec![
                named("no-reply@example.com", "Support"),
                named("team@example.com", "Team"),
            ],
            vec![named("a@example.com", "A"), named("b@example.com", "")],
            "Welcome",
            "Hello",
            None,
        )?;

        let email = build_email(&message)?;

        assert_eq!(email.envelope().to().len(), 2);
        assert_eq!(
            email.envelope().from().map(ToString::to_string),
            Some("no-reply@example.com".to_string())
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_server_is_send_error() -> TestResult {
        let transport = SMTPTransport::new(&SMTPConfig {
            host: "127.0.0.1".to_string(),
            port: 9,
            username: None,
            password: None,
            verify_tls: false,
            starttls: true,
        })?;

        let message = Message::new(
            vec![named("no-reply@example.com", "")],
            vec![named("u@example.com", "")],
            "Welcome",
            "Hello",
            None,
        )?;

        let result = transport.send(&message).await;

        assert!(matches!(result, Err(TransportError::SendError(_))));

        Ok(())
    }
}
