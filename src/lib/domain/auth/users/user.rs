//! User model

use serde::Serialize;
use uuid::Uuid;

use crate::domain::communication::email_addresses::EmailAddress;

/// User model
///
/// Owned by the user management system; the mailer only reads it and exposes it to
/// templates as `user`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    /// User UUID
    pub id: Uuid,

    /// User name
    pub username: String,

    /// User email address
    pub email: EmailAddress,

    /// Token sent with confirmation and password resetting emails
    pub confirmation_token: Option<String>,
}

impl User {
    /// Create a user without a confirmation token
    pub fn new(username: impl Into<String>, email: EmailAddress) -> Self {
        Self {
            id: Uuid::now_v7(),
            username: username.into(),
            email,
            confirmation_token: None,
        }
    }

    /// Set the confirmation token
    pub fn with_confirmation_token(mut self, token: impl Into<String>) -> Self {
        self.confirmation_token = Some(token.into());
        self
    }

    /// The confirmation token, if it is set and not empty
    pub fn confirmation_token(&self) -> Option<&str> {
        self.confirmation_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_empty_confirmation_token_is_treated_as_missing() -> TestResult {
        let user = User::new("alice", EmailAddress::new("alice@example.com")?);

        assert_eq!(user.confirmation_token(), None);
        assert_eq!(user.clone().with_confirmation_token("").confirmation_token(), None);
        assert_eq!(
            user.with_confirmation_token("tok123").confirmation_token(),
            Some("tok123")
        );

        Ok(())
    }
}
