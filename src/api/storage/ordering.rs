//! Sort-order maintenance for scoped collections.
//!
//! Every ordered collection keeps a dense-enough integer `sort_order` per
//! scope: services share one global order space, icons are ordered within
//! their owning service, user links within their owning user. New rows are
//! appended by computing `max + 1` at write time on the caller's transaction;
//! bulk reorders apply all positions in a single transaction so readers never
//! observe a mix of old and new values.

use chrono::Utc;
use serde::Deserialize;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::StorageError;

/// One requested position change. Explicit `sort_order` values are
/// authoritative; when the input repeats a position, the later entry in the
/// list wins.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OrderUpdate {
    pub id: Uuid,
    pub sort_order: i64,
}

/// Collection scope an order value lives in.
#[derive(Debug, Clone, Copy)]
pub enum OrderScope {
    /// The global service catalog.
    Services,
    /// Icons of one service.
    Icons { service_id: Uuid },
    /// Links of one user.
    UserLinks { user_id: Uuid },
}

impl OrderScope {
    fn table(&self) -> &'static str {
        match self {
            OrderScope::Services => "services",
            OrderScope::Icons { .. } => "icons",
            OrderScope::UserLinks { .. } => "user_links",
        }
    }

    fn entity_type(&self) -> &'static str {
        match self {
            OrderScope::Services => "service",
            OrderScope::Icons { .. } => "icon",
            OrderScope::UserLinks { .. } => "user link",
        }
    }

    fn scope_predicate(&self) -> Option<(&'static str, Uuid)> {
        match self {
            OrderScope::Services => None,
            OrderScope::Icons { service_id } => Some(("service_id", *service_id)),
            OrderScope::UserLinks { user_id } => Some(("user_id", *user_id)),
        }
    }
}

/// Next free position within `scope`: `max + 1`, or 1 for an empty
/// collection. Runs on the caller's connection so creates read the maximum
/// inside their own insert transaction.
pub async fn next_sort_order(
    conn: &mut SqliteConnection,
    scope: &OrderScope,
) -> Result<i64, StorageError> {
    let max: i64 = match scope.scope_predicate() {
        Some((column, value)) => {
            let sql = format!(
                "SELECT COALESCE(MAX(sort_order), 0) FROM {} WHERE {} = ?",
                scope.table(),
                column
            );
            sqlx::query_scalar::<Sqlite, i64>(&sql)
                .bind(value)
                .fetch_one(conn)
                .await?
        }
        None => {
            let sql = format!("SELECT COALESCE(MAX(sort_order), 0) FROM {}", scope.table());
            sqlx::query_scalar::<Sqlite, i64>(&sql).fetch_one(conn).await?
        }
    };

    Ok(max + 1)
}

/// Apply all position updates in one transaction.
///
/// Each entry must match exactly one row inside `scope`; an unknown id, or an
/// id belonging to a different service/user, aborts the whole batch with
/// `NotFound` and nothing is committed. Partial application is never
/// observable.
pub async fn reorder(
    pool: &SqlitePool,
    scope: &OrderScope,
    entries: &[OrderUpdate],
) -> Result<(), StorageError> {
    if entries.is_empty() {
        return Err(StorageError::InvalidInput {
            field: "entries".to_string(),
            message: "reorder list must not be empty".to_string(),
        });
    }

    let now = Utc::now();
    let mut tx = pool.begin().await?;

    for entry in entries {
        let sql = match scope.scope_predicate() {
            Some((column, _)) => format!(
                "UPDATE {} SET sort_order = ?, updated_at = ? WHERE id = ? AND {} = ?",
                scope.table(),
                column
            ),
            None => format!(
                "UPDATE {} SET sort_order = ?, updated_at = ? WHERE id = ?",
                scope.table()
            ),
        };

        let mut query = sqlx::query(&sql)
            .bind(entry.sort_order)
            .bind(now)
            .bind(entry.id);
        if let Some((_, value)) = scope.scope_predicate() {
            query = query.bind(value);
        }

        let affected = query.execute(&mut *tx).await?.rows_affected();
        if affected == 0 {
            // Dropping the transaction rolls back everything applied so far.
            return Err(StorageError::NotFound {
                entity_type: scope.entity_type().to_string(),
                entity_id: entry.id.to_string(),
            });
        }
    }

    tx.commit().await?;
    Ok(())
}
