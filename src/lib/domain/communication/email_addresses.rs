//! Email addresses module.

mod address_spec;
mod email_address;

pub use address_spec::{AddressSpec, AddressSpecError};
pub use email_address::{EmailAddress, EmailAddressError, NamedAddress};
