#![doc = include_str!("../README.md")]

mod assertion;
mod error;
mod role;
mod selector;

pub use assertion::{ROLE_ATTRIBUTE_NAME, SamlAssertion, parse_roles};
pub use error::{RoleSelectionError, SamlError};
pub use role::RoleEntry;
pub use selector::{RolePrompt, select_role};
