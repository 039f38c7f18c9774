#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Sends a single confirmation or password resetting email

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use user_mailer::{
    domain::{
        auth::{
            emails::{MailerParameters, UserMailer, UserMailerError, UserMailerImpl},
            users::User,
        },
        communication::email_addresses::EmailAddress,
    },
    infrastructure::{
        config::MailerConfig,
        email::{
            log::LogTransport,
            smtp::{SMTPConfig, SMTPTransport},
        },
        routing::{RouteTable, RoutesConfig},
        templates::{MiniJinjaRenderer, TemplatesConfig},
    },
};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct Args {
    /// The mailer parameters
    #[clap(flatten)]
    pub mailer: MailerConfig,

    /// The routes used to build links
    #[clap(flatten)]
    pub routes: RoutesConfig,

    /// The template location
    #[clap(flatten)]
    pub templates: TemplatesConfig,

    /// The SMTP connection details
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// Log the email instead of sending it
    #[clap(long, env = "MAILER_DRY_RUN")]
    pub dry_run: bool,

    /// The email to send
    #[clap(subcommand)]
    pub command: Command,
}

/// Emails that can be sent
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a registration confirmation email
    Confirmation(Recipient),

    /// Send a password resetting email
    Resetting(Recipient),
}

/// The user receiving the email
#[derive(Debug, clap::Args)]
pub struct Recipient {
    /// The user's email address
    #[clap(long)]
    pub email: EmailAddress,

    /// The confirmation token to put in the link
    #[clap(long)]
    pub token: String,

    /// The user's name, defaults to the email address
    #[clap(long)]
    pub username: Option<String>,
}

impl Recipient {
    fn user(&self) -> User {
        let username = self
            .username
            .clone()
            .unwrap_or_else(|| self.email.to_string());

        User::new(username, self.email.clone()).with_confirmation_token(self.token.clone())
    }
}

async fn send<M: UserMailer>(mailer: &M, command: &Command) -> Result<(), UserMailerError> {
    match command {
        Command::Confirmation(recipient) => {
            mailer
                .send_confirmation_email_message(&recipient.user())
                .await
        }
        Command::Resetting(recipient) => {
            mailer
                .send_resetting_email_message(&recipient.user())
                .await
        }
    }
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let parameters = MailerParameters::try_from(&args.mailer)?;
    let templates = Arc::new(MiniJinjaRenderer::from_config(&args.templates)?);
    let routes = Arc::new(RouteTable::from_config(&args.routes)?);

    if args.dry_run {
        let mailer = UserMailerImpl::new(templates, routes, Arc::new(LogTransport), parameters);

        send(&mailer, &args.command).await?;
    } else {
        let transport = Arc::new(SMTPTransport::new(&args.smtp)?);
        let mailer = UserMailerImpl::new(templates, routes, transport, parameters);

        send(&mailer, &args.command).await?;
    }

    info!("email handed to transport");

    Ok(())
}
