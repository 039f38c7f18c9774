//! Email addresses, messages, templates and URLs

pub mod email_addresses;
pub mod mailer;
pub mod routing;
pub mod templates;
