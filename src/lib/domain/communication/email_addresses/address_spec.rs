//! Address specifications
//!
//! Addresses are configured either as a bare address (`no-reply@example.com`) or as a map of
//! address to display name (`{"no-reply@example.com": "Support"}`). Both shapes are
//! normalized into an ordered list of [`NamedAddress`] before a message is built.

use std::{fmt, str::FromStr};

use serde::{
    de::{self, MapAccess, Visitor},
    Deserialize, Deserializer,
};
use thiserror::Error;

use super::{EmailAddress, EmailAddressError, NamedAddress};

/// Errors that can occur when building an address spec
#[derive(Debug, Error)]
pub enum AddressSpecError {
    /// An address in the spec is invalid
    #[error(transparent)]
    InvalidAddress(#[from] EmailAddressError),

    /// A named spec without any address
    #[error("address map is empty")]
    Empty,

    /// The spec is neither an address nor a JSON object
    #[error("invalid address map: {0}")]
    InvalidMap(#[from] serde_json::Error),
}

/// A sender or recipient specification
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressSpec {
    /// A single address without a display name
    Single(EmailAddress),

    /// One or more addresses with display names, in configuration order
    Named(Vec<NamedAddress>),
}

impl AddressSpec {
    /// Build a named spec, rejecting an empty list
    pub fn named(addresses: Vec<NamedAddress>) -> Result<Self, AddressSpecError> {
        if addresses.is_empty() {
            return Err(AddressSpecError::Empty);
        }

        Ok(Self::Named(addresses))
    }

    /// The spec as `(address, display name)` pairs
    pub fn mailboxes(&self) -> Vec<NamedAddress> {
        match self {
            Self::Single(address) => vec![NamedAddress::from(address.clone())],
            Self::Named(addresses) => addresses.clone(),
        }
    }
}

impl From<EmailAddress> for AddressSpec {
    fn from(address: EmailAddress) -> Self {
        Self::Single(address)
    }
}

impl FromStr for AddressSpec {
    type Err = AddressSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if trimmed.starts_with('{') {
            return Ok(serde_json::from_str(trimmed)?);
        }

        Ok(Self::Single(EmailAddress::new(trimmed)?))
    }
}

impl fmt::Display for AddressSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mailboxes = self
            .mailboxes()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();

        write!(f, "{}", mailboxes.join(", "))
    }
}

impl<'de> Deserialize<'de> for AddressSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AddressSpecVisitor)
    }
}

struct AddressSpecVisitor;

impl<'de> Visitor<'de> for AddressSpecVisitor {
    type Value = AddressSpec;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an email address or a map of email address to display name")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        EmailAddress::new(value)
            .map(AddressSpec::Single)
            .map_err(E::custom)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut addresses: Vec<NamedAddress> = Vec::new();

        while let Some((address, name)) = map.next_entry::<String, Option<String>>()? {
            let address = EmailAddress::new(&address).map_err(de::Error::custom)?;
            let name = name.unwrap_or_default();

            // a repeated key replaces the earlier display name
            match addresses.iter_mut().find(|named| named.address == address) {
                Some(existing) => existing.name = name,
                None => addresses.push(NamedAddress::new(address, name)),
            }
        }

        AddressSpec::named(addresses).map_err(de::Error::custom)
    }
}
