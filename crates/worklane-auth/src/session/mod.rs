//! Device session tracking.

pub mod cleanup;
pub mod fingerprint;
pub mod tracker;

pub use cleanup::SessionCleanup;
pub use fingerprint::derive_fingerprint;
pub use tracker::DeviceSessionTracker;
