mod authenticate;
mod credentials;
mod outcome;
mod passcode;
mod push;

pub use credentials::Credentials;
pub use outcome::AuthOutcome;
pub use push::{PushCancellation, PushVerification};

pub use crate::api::{Factor, FactorType};

/// Path of the factor verification endpoint, below `/api/v1`.
fn verify_path(factor_id: &str) -> String {
    format!("/authn/factors/{factor_id}/verify")
}
