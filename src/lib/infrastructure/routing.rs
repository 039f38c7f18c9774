//! Route table URL generator

use std::collections::{BTreeMap, BTreeSet};

use clap::Parser;
use url::{ParseError, Url};

use crate::domain::communication::routing::{
    UrlGenerationError, UrlGenerator, REGISTRATION_CONFIRM_ROUTE, RESETTING_RESET_ROUTE,
};

/// Route configuration
#[derive(Clone, Debug, Parser)]
pub struct RoutesConfig {
    /// The public base URL of the application
    #[clap(long, env = "MAILER_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// Path of the registration confirmation page
    #[clap(
        long,
        env = "MAILER_REGISTRATION_CONFIRM_PATH",
        default_value = "/register/confirm/{token}"
    )]
    pub registration_confirm_path: String,

    /// Path of the password resetting page
    #[clap(
        long,
        env = "MAILER_RESETTING_RESET_PATH",
        default_value = "/resetting/reset/{token}"
    )]
    pub resetting_reset_path: String,
}

/// Generates URLs from path patterns such as `/register/confirm/{token}`
///
/// A `{name}` segment is replaced by the `name` parameter. Parameters that don't match a
/// placeholder are appended to the query string.
#[derive(Clone, Debug)]
pub struct RouteTable {
    base_url: Url,
    routes: BTreeMap<String, String>,
}

impl RouteTable {
    /// Create an empty route table
    pub fn new(base_url: &str) -> Result<Self, UrlGenerationError> {
        let base_url = Url::parse(base_url)?;

        if base_url.cannot_be_a_base() {
            return Err(ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }

        Ok(Self {
            base_url,
            routes: BTreeMap::new(),
        })
    }

    /// Create a route table with the confirmation and resetting routes
    pub fn from_config(config: &RoutesConfig) -> Result<Self, UrlGenerationError> {
        Ok(Self::new(&config.base_url)?
            .with_route(REGISTRATION_CONFIRM_ROUTE, &config.registration_confirm_path)
            .with_route(RESETTING_RESET_ROUTE, &config.resetting_reset_path))
    }

    /// Add or replace a route
    pub fn with_route(mut self, name: &str, pattern: &str) -> Self {
        self.routes.insert(name.to_string(), pattern.to_string());
        self
    }
}

impl UrlGenerator for RouteTable {
    fn generate(
        &self,
        route: &str,
        parameters: &BTreeMap<String, String>,
    ) -> Result<String, UrlGenerationError> {
        let pattern = self
            .routes
            .get(route)
            .ok_or_else(|| UrlGenerationError::UnknownRoute(route.to_string()))?;

        let mut url = self.base_url.clone();
        let mut used = BTreeSet::new();

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ParseError::RelativeUrlWithCannotBeABaseBase)?;

            segments.pop_if_empty();

            for segment in pattern.split('/').filter(|segment| !segment.is_empty()) {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => {
                        let value = parameters.get(name).ok_or_else(|| {
                            UrlGenerationError::MissingParameter {
                                route: route.to_string(),
                                parameter: name.to_string(),
                            }
                        })?;

                        used.insert(name);
                        segments.push(value);
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }

        let query = parameters
            .iter()
            .filter(|(name, _)| !used.contains(name.as_str()))
            .collect::<Vec<_>>();

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url.to_string())
    }
}
