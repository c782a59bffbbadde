//! Workspace entity model.
//!
//! The authorization core only reads workspaces; creation and the full
//! business rules live in the workspace service that consumes this core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tenant workspace that memberships and permissions are scoped to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workspace {
    /// Unique workspace identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// The user who created the workspace (its first admin).
    pub created_by: Uuid,
    /// When the workspace was created.
    pub created_at: DateTime<Utc>,
}
