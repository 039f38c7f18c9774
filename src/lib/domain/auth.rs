//! Users and the emails sent over their lifecycle

pub mod emails;
pub mod users;
