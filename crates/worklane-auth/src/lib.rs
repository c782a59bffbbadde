//! # worklane-auth
//!
//! The session & authorization authority for the Worklane platform:
//! issues, rotates, and revokes login credentials, binds them to device
//! sessions, and computes per-workspace access-control decisions.
//!
//! ## Modules
//!
//! - `jwt` — signed token creation and validation, one key per token class
//! - `token` — credential issuance, refresh token rotation, revocation, reaping
//! - `session` — device session tracking and self-service revocation
//! - `permission` — role defaults plus per-member override resolution
//! - `guard` — request-time evaluation of declared access requirements
//! - `invitation` — self-contained signed workspace invitations
//! - `password` — Argon2id password hashing and policy enforcement
//! - `store` — storage traits with Postgres and in-memory backends

pub mod guard;
pub mod invitation;
pub mod jwt;
pub mod password;
pub mod permission;
pub mod session;
pub mod store;
pub mod token;

pub use guard::{AccessGuard, AccessRequirements};
pub use invitation::{InvitationInfo, InvitationService, NewInvitation, SignedInvitation};
pub use jwt::{JwtDecoder, JwtEncoder, TokenPair};
pub use password::{PasswordHasher, PasswordValidator};
pub use permission::{PermissionResolver, ResolvedPermissions, RolePolicies};
pub use session::{DeviceSessionTracker, SessionCleanup};
pub use token::{CredentialIssuer, RotationAuthority, TokenError, TokenReaper};
