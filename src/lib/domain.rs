//! Domain types, services and the collaborator traits they depend on

pub mod auth;
pub mod communication;
