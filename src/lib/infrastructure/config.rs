//! Mailer configuration from the command line and environment

use std::{fs, path::PathBuf};

use clap::Parser;
use tracing::debug;

use crate::{
    domain::{
        auth::emails::{FromEmail, MailerParameters, ParametersError},
        communication::email_addresses::AddressSpec,
    },
    infrastructure::templates::{DEFAULT_CONFIRMATION_TEMPLATE, DEFAULT_RESETTING_TEMPLATE},
};

/// Mailer configuration
///
/// Address options take either a bare address or a JSON object of address to display name,
/// e.g. `{"no-reply@example.com": "Support"}`.
#[derive(Clone, Debug, Parser)]
pub struct MailerConfig {
    /// JSON file holding every mailer parameter; overrides the other options
    #[clap(long, env = "MAILER_PARAMETERS_FILE")]
    pub parameters_file: Option<PathBuf>,

    /// Template of registration confirmation emails
    #[clap(
        long,
        env = "MAILER_CONFIRMATION_TEMPLATE",
        default_value = DEFAULT_CONFIRMATION_TEMPLATE
    )]
    pub confirmation_template: String,

    /// Template of password resetting emails
    #[clap(
        long,
        env = "MAILER_RESETTING_TEMPLATE",
        default_value = DEFAULT_RESETTING_TEMPLATE
    )]
    pub resetting_template: String,

    /// Sender of registration confirmation emails
    #[clap(
        long,
        env = "MAILER_FROM_CONFIRMATION",
        default_value = "no-reply@localhost.localdomain"
    )]
    pub from_confirmation: AddressSpec,

    /// Sender of password resetting emails
    #[clap(
        long,
        env = "MAILER_FROM_RESETTING",
        default_value = "no-reply@localhost.localdomain"
    )]
    pub from_resetting: AddressSpec,

    /// Inline CSS into HTML bodies
    #[clap(long, env = "MAILER_INLINE_CSS")]
    pub inline_css: bool,
}

impl TryFrom<&MailerConfig> for MailerParameters {
    type Error = ParametersError;

    fn try_from(config: &MailerConfig) -> Result<Self, Self::Error> {
        if let Some(path) = &config.parameters_file {
            debug!(path = %path.display(), "loading mailer parameters");

            return MailerParameters::from_json(&fs::read_to_string(path)?);
        }

        Ok(MailerParameters::new(
            config.confirmation_template.clone(),
            config.resetting_template.clone(),
            FromEmail {
                confirmation: config.from_confirmation.clone(),
                resetting: config.from_resetting.clone(),
            },
        )?
        .with_inline_css(config.inline_css))
    }
}
