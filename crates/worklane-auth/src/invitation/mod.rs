//! Self-contained signed workspace invitations.

pub mod service;

pub use service::{InvitationInfo, InvitationService, NewInvitation, SignedInvitation};
