//! Workspace repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use worklane_core::error::{AppError, ErrorKind};
use worklane_core::result::AppResult;
use worklane_entity::workspace::Workspace;

/// Repository for workspace lookup operations.
#[derive(Debug, Clone)]
pub struct WorkspaceRepository {
    pool: PgPool,
}

impl WorkspaceRepository {
    /// Create a new workspace repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a workspace by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Workspace>> {
        sqlx::query_as::<_, Workspace>("SELECT * FROM workspaces WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find workspace", e)
            })
    }
}
