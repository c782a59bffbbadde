//! Internal refresh token failure classification.

use thiserror::Error;

use worklane_core::error::AppError;

/// Why a refresh token was rejected.
///
/// The distinction drives logging and replay handling only. At the API
/// boundary every variant collapses into the same generic unauthorized
/// error so callers cannot probe token state.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token string matches no stored record, or the rotation lost
    /// the conditional-revoke race.
    #[error("refresh token is not recognized")]
    InvalidRefreshToken,

    /// The backing record has passed its expiry instant.
    #[error("refresh token has expired")]
    RefreshTokenExpired,

    /// The record was already rotated away: a previously spent token was
    /// presented again.
    #[error("refresh token was already rotated")]
    RefreshTokenReplayed,

    /// The record was revoked outright (logout, revoke-all).
    #[error("refresh token was revoked")]
    RefreshTokenRevoked,

    /// The owning user no longer exists.
    #[error("token owner not found")]
    UserNotFound,
}

impl From<TokenError> for AppError {
    fn from(_: TokenError) -> Self {
        // One opaque message for every failure mode.
        AppError::unauthorized("Refresh token is invalid or expired")
    }
}
