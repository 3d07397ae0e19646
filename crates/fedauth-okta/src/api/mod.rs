mod request;
mod response;

pub(crate) use request::{AuthnApiRequest, VerifyFactorApiRequest};
pub(crate) use response::AuthnApiResponse;
pub use response::{Factor, FactorType};
