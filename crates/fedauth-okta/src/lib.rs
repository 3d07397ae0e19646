#![doc = include_str!("../README.md")]

mod client;
mod client_settings;
mod embed_link;
mod error;
mod transport;

pub(crate) mod api; // keep internal to crate

/// Login state machine and multi-factor verification
pub mod login;

pub use client::OktaClient;
pub use client_settings::ClientSettings;
pub use embed_link::AppLink;
pub use error::OktaError;
pub use fedauth_saml::SamlAssertion;
/// Cancellation handle accepted by the push verification loop.
pub use tokio_util::sync::CancellationToken;
