//! URL generation for links embedded in emails

use std::collections::BTreeMap;

#[cfg(test)]
use mockall::mock;

use thiserror::Error;

/// Route the user follows to confirm a registration
pub const REGISTRATION_CONFIRM_ROUTE: &str = "fos_user_registration_confirm";

/// Route the user follows to reset a password
pub const RESETTING_RESET_ROUTE: &str = "fos_user_resetting_reset";

/// Errors raised by a [`UrlGenerator`]
#[derive(Debug, Error)]
pub enum UrlGenerationError {
    /// No route with that name
    #[error("route \"{0}\" does not exist")]
    UnknownRoute(String),

    /// A placeholder of the route has no value
    #[error("route \"{route}\" requires the \"{parameter}\" parameter")]
    MissingParameter {
        /// Route name
        route: String,

        /// Parameter name
        parameter: String,
    },

    /// The generated URL is not valid
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Generates absolute URLs for named routes
pub trait UrlGenerator: Clone + Send + Sync + 'static {
    /// Generate the absolute URL of a route
    ///
    /// # Arguments
    /// * `route` - The route name.
    /// * `parameters` - Values for the route's placeholders.
    fn generate(
        &self,
        route: &str,
        parameters: &BTreeMap<String, String>,
    ) -> Result<String, UrlGenerationError>;
}

#[cfg(test)]
mock! {
    pub UrlGenerator {}

    impl Clone for UrlGenerator {
        fn clone(&self) -> Self;
    }

    impl UrlGenerator for UrlGenerator {
        fn generate(
            &self,
            route: &str,
            parameters: &BTreeMap<String, String>,
        ) -> Result<String, UrlGenerationError>;
    }
}

#[cfg(test)]
pub mod tests {
    pub use super::MockUrlGenerator;
}
