//! This module contains the user model.

mod user;

pub use user::User;
