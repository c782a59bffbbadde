//! Credential issuance, refresh token rotation, and revocation.

pub mod error;
pub mod issuer;
pub mod reaper;
pub mod rotation;

pub use error::TokenError;
pub use issuer::CredentialIssuer;
pub use reaper::TokenReaper;
pub use rotation::RotationAuthority;
