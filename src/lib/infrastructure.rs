//! Concrete adapters for the domain's collaborator traits

pub mod config;
pub mod email;
pub mod routing;
pub mod templates;
