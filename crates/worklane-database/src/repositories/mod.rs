//! Repository implementations for the Worklane auth tables.

pub mod device_session;
pub mod membership;
pub mod refresh_token;
pub mod user;
pub mod workspace;

pub use device_session::DeviceSessionRepository;
pub use membership::MembershipRepository;
pub use refresh_token::RefreshTokenRepository;
pub use user::UserRepository;
pub use workspace::WorkspaceRepository;
