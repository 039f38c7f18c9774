//! Confirmation and password resetting emails

mod errors;
mod parameters;
mod service;

pub use errors::UserMailerError;
pub use parameters::{FromEmail, MailerParameters, ParametersError};
pub use service::{UserMailer, UserMailerImpl};
