//! Signed token creation and validation.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::{AccessClaims, InvitationClaims, RefreshClaims};
pub use decoder::JwtDecoder;
pub use encoder::{JwtEncoder, TokenPair};
