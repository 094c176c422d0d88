//! SQLite storage backend implementation.
//!
//! Uses sqlx for database operations and implements the three operation-group
//! traits behind `StorageBackend`. Uniqueness, referential-integrity and
//! ownership rules that the schema does not enforce declaratively live here.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use super::ordering::{self, OrderScope, OrderUpdate};
use super::traits::{IconStore, LinkStore, ServiceStore, ensure_owner};
use super::{MIGRATOR, StorageError};
use crate::models::{
    Icon, IconPatch, NewIcon, NewService, NewUserLink, Service, ServiceFilter, ServicePatch,
    UserLink, UserLinkPatch,
};

/// SQLite storage backend implementation.
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Create a backend over an existing pool. Migrations are assumed to have
    /// run already.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url`, creating the file if missing, and run
    /// pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StorageError::ConnectionError(e.to_string()))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionError(e.to_string()))?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| StorageError::ConnectionError(format!("Migration failed: {}", e)))?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn not_found(entity_type: &str, id: Uuid) -> StorageError {
    StorageError::NotFound {
        entity_type: entity_type.to_string(),
        entity_id: id.to_string(),
    }
}

fn invalid(field: &str, message: &str) -> StorageError {
    StorageError::InvalidInput {
        field: field.to_string(),
        message: message.to_string(),
    }
}

#[async_trait]
impl ServiceStore for SqliteStorage {
    async fn list_services(&self, filter: &ServiceFilter) -> Result<Vec<Service>, StorageError> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM services WHERE 1 = 1");

        if let Some(search) = &filter.search {
            builder.push(" AND name LIKE ");
            builder.push_bind(format!("%{}%", search));
        }
        if let Some(is_active) = filter.is_active {
            builder.push(" AND is_active = ");
            builder.push_bind(is_active);
        }
        if let Some(allow) = filter.allow_original_icon {
            builder.push(" AND allow_original_icon = ");
            builder.push_bind(allow);
        }
        builder.push(" ORDER BY sort_order ASC");

        let services = builder
            .build_query_as::<Service>()
            .fetch_all(&self.pool)
            .await?;

        Ok(services)
    }

    async fn get_service(&self, id: Uuid) -> Result<Option<Service>, StorageError> {
        let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(service)
    }

    async fn get_service_by_slug(&self, slug: &str) -> Result<Option<Service>, StorageError> {
        let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(service)
    }

    async fn create_service(&self, data: NewService) -> Result<Service, StorageError> {
        let mut tx = self.pool.begin().await?;

        let name_taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM services WHERE name = ?")
            .bind(&data.name)
            .fetch_one(&mut *tx)
            .await?;
        if name_taken > 0 {
            return Err(StorageError::Duplicate {
                entity_type: "service".to_string(),
                field: "name".to_string(),
                value: data.name,
            });
        }

        let slug_taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM services WHERE slug = ?")
            .bind(&data.slug)
            .fetch_one(&mut *tx)
            .await?;
        if slug_taken > 0 {
            return Err(StorageError::Duplicate {
                entity_type: "service".to_string(),
                field: "slug".to_string(),
                value: data.slug,
            });
        }

        let sort_order = ordering::next_sort_order(&mut tx, &OrderScope::Services).await?;
        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            name: data.name,
            slug: data.slug,
            description: data.description,
            base_url: data.base_url,
            allow_original_icon: data.allow_original_icon,
            is_active: data.is_active,
            sort_order,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO services
                (id, name, slug, description, base_url, allow_original_icon,
                 is_active, sort_order, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(service.id)
        .bind(&service.name)
        .bind(&service.slug)
        .bind(&service.description)
        .bind(&service.base_url)
        .bind(service.allow_original_icon)
        .bind(service.is_active)
        .bind(service.sort_order)
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(service)
    }

    async fn update_service(&self, id: Uuid, patch: ServicePatch) -> Result<Service, StorageError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found("service", id))?;

        if let Some(name) = &patch.name
            && name != &existing.name
        {
            let taken: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM services WHERE name = ? AND id != ?")
                    .bind(name)
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?;
            if taken > 0 {
                return Err(StorageError::Duplicate {
                    entity_type: "service".to_string(),
                    field: "name".to_string(),
                    value: name.clone(),
                });
            }
        }

        if let Some(slug) = &patch.slug
            && slug != &existing.slug
        {
            let taken: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM services WHERE slug = ? AND id != ?")
                    .bind(slug)
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?;
            if taken > 0 {
                return Err(StorageError::Duplicate {
                    entity_type: "service".to_string(),
                    field: "slug".to_string(),
                    value: slug.clone(),
                });
            }
        }

        let updated = Service {
            id: existing.id,
            name: patch.name.unwrap_or(existing.name),
            slug: patch.slug.unwrap_or(existing.slug),
            description: patch.description.or(existing.description),
            base_url: patch.base_url.or(existing.base_url),
            allow_original_icon: patch.allow_original_icon.unwrap_or(existing.allow_original_icon),
            is_active: patch.is_active.unwrap_or(existing.is_active),
            sort_order: existing.sort_order,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        sqlx::query(
            r#"
            UPDATE services
            SET name = ?, slug = ?, description = ?, base_url = ?,
                allow_original_icon = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&updated.name)
        .bind(&updated.slug)
        .bind(&updated.description)
        .bind(&updated.base_url)
        .bind(updated.allow_original_icon)
        .bind(updated.is_active)
        .bind(updated.updated_at)
        .bind(updated.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_service(&self, id: Uuid) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM services WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if exists == 0 {
            return Err(not_found("service", id));
        }

        let icon_refs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM icons WHERE service_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        let link_refs: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_links WHERE service_id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        let dependents = icon_refs + link_refs;
        if dependents > 0 {
            return Err(StorageError::InUse {
                entity_type: "service".to_string(),
                entity_id: id.to_string(),
                dependents,
            });
        }

        sqlx::query("DELETE FROM services WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn reorder_services(&self, entries: &[OrderUpdate]) -> Result<(), StorageError> {
        ordering::reorder(&self.pool, &OrderScope::Services, entries).await
    }
}

#[async_trait]
impl IconStore for SqliteStorage {
    async fn list_icons(
        &self,
        service_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<Icon>, StorageError> {
        let sql = if include_inactive {
            "SELECT * FROM icons WHERE service_id = ? ORDER BY sort_order ASC"
        } else {
            "SELECT * FROM icons WHERE service_id = ? AND is_active = 1 ORDER BY sort_order ASC"
        };

        let icons = sqlx::query_as::<_, Icon>(sql)
            .bind(service_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(icons)
    }

    async fn get_icon(&self, id: Uuid) -> Result<Option<Icon>, StorageError> {
        let icon = sqlx::query_as::<_, Icon>("SELECT * FROM icons WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(icon)
    }

    async fn create_icon(&self, data: NewIcon) -> Result<Icon, StorageError> {
        let mut tx = self.pool.begin().await?;

        let service_exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM services WHERE id = ?")
            .bind(data.service_id)
            .fetch_one(&mut *tx)
            .await?;
        if service_exists == 0 {
            return Err(invalid("service_id", "referenced service does not exist"));
        }

        let sort_order = ordering::next_sort_order(
            &mut tx,
            &OrderScope::Icons {
                service_id: data.service_id,
            },
        )
        .await?;
        let now = Utc::now();
        let icon = Icon {
            id: Uuid::new_v4(),
            service_id: data.service_id,
            name: data.name,
            file_path: data.file_path,
            style: data.style,
            color_scheme: data.color_scheme,
            description: data.description,
            is_active: data.is_active,
            sort_order,
            uploaded_by: data.uploaded_by,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO icons
                (id, service_id, name, file_path, style, color_scheme,
                 description, is_active, sort_order, uploaded_by, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(icon.id)
        .bind(icon.service_id)
        .bind(&icon.name)
        .bind(&icon.file_path)
        .bind(icon.style)
        .bind(icon.color_scheme)
        .bind(&icon.description)
        .bind(icon.is_active)
        .bind(icon.sort_order)
        .bind(icon.uploaded_by)
        .bind(icon.created_at)
        .bind(icon.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(icon)
    }

    async fn update_icon(&self, id: Uuid, patch: IconPatch) -> Result<Icon, StorageError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Icon>("SELECT * FROM icons WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found("icon", id))?;

        let updated = Icon {
            id: existing.id,
            service_id: existing.service_id,
            name: patch.name.unwrap_or(existing.name),
            file_path: patch.file_path.unwrap_or(existing.file_path),
            style: patch.style.unwrap_or(existing.style),
            color_scheme: patch.color_scheme.unwrap_or(existing.color_scheme),
            description: patch.description.or(existing.description),
            is_active: patch.is_active.unwrap_or(existing.is_active),
            sort_order: existing.sort_order,
            uploaded_by: existing.uploaded_by,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        sqlx::query(
            r#"
            UPDATE icons
            SET name = ?, file_path = ?, style = ?, color_scheme = ?,
                description = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&updated.name)
        .bind(&updated.file_path)
        .bind(updated.style)
        .bind(updated.color_scheme)
        .bind(&updated.description)
        .bind(updated.is_active)
        .bind(updated.updated_at)
        .bind(updated.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_icon(&self, id: Uuid) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM icons WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if exists == 0 {
            return Err(not_found("icon", id));
        }

        let dependents: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_links WHERE icon_id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if dependents > 0 {
            return Err(StorageError::InUse {
                entity_type: "icon".to_string(),
                entity_id: id.to_string(),
                dependents,
            });
        }

        sqlx::query("DELETE FROM icons WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn reorder_icons(
        &self,
        service_id: Uuid,
        entries: &[OrderUpdate],
    ) -> Result<(), StorageError> {
        ordering::reorder(&self.pool, &OrderScope::Icons { service_id }, entries).await
    }
}

#[async_trait]
impl LinkStore for SqliteStorage {
    async fn list_links(&self, user_id: Uuid) -> Result<Vec<UserLink>, StorageError> {
        let links = sqlx::query_as::<_, UserLink>(
            "SELECT * FROM user_links WHERE user_id = ? ORDER BY sort_order ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(links)
    }

    async fn get_link(&self, id: Uuid) -> Result<Option<UserLink>, StorageError> {
        let link = sqlx::query_as::<_, UserLink>("SELECT * FROM user_links WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(link)
    }

    async fn create_link(
        &self,
        user_id: Uuid,
        data: NewUserLink,
    ) -> Result<UserLink, StorageError> {
        let mut tx = self.pool.begin().await?;

        let service_exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM services WHERE id = ?")
            .bind(data.service_id)
            .fetch_one(&mut *tx)
            .await?;
        if service_exists == 0 {
            return Err(invalid("service_id", "referenced service does not exist"));
        }

        if let Some(icon_id) = data.icon_id {
            let icon = sqlx::query_as::<_, Icon>("SELECT * FROM icons WHERE id = ?")
                .bind(icon_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| invalid("icon_id", "referenced icon does not exist"))?;
            if icon.service_id != data.service_id {
                return Err(invalid(
                    "icon_id",
                    "icon does not belong to the selected service",
                ));
            }
        }

        let sort_order =
            ordering::next_sort_order(&mut tx, &OrderScope::UserLinks { user_id }).await?;
        let now = Utc::now();
        let link = UserLink {
            id: Uuid::new_v4(),
            user_id,
            service_id: data.service_id,
            icon_id: data.icon_id,
            url: data.url,
            title: data.title,
            description: data.description,
            sort_order,
            is_active: data.is_active,
            use_original_icon: data.use_original_icon,
            original_icon_url: data.original_icon_url,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO user_links
                (id, user_id, service_id, icon_id, url, title, description,
                 sort_order, is_active, use_original_icon, original_icon_url,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(link.id)
        .bind(link.user_id)
        .bind(link.service_id)
        .bind(link.icon_id)
        .bind(&link.url)
        .bind(&link.title)
        .bind(&link.description)
        .bind(link.sort_order)
        .bind(link.is_active)
        .bind(link.use_original_icon)
        .bind(&link.original_icon_url)
        .bind(link.created_at)
        .bind(link.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(link)
    }

    async fn update_link(
        &self,
        link_id: Uuid,
        user_id: Uuid,
        patch: UserLinkPatch,
    ) -> Result<UserLink, StorageError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, UserLink>("SELECT * FROM user_links WHERE id = ?")
            .bind(link_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found("user link", link_id))?;

        // Handlers have already checked ownership; re-verify on the loaded row.
        ensure_owner("user link", link_id, existing.user_id, user_id)?;

        let icon_id = match patch.icon_id {
            None => existing.icon_id,
            Some(None) => None,
            Some(Some(icon_id)) => {
                let icon = sqlx::query_as::<_, Icon>("SELECT * FROM icons WHERE id = ?")
                    .bind(icon_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or_else(|| invalid("icon_id", "referenced icon does not exist"))?;
                if icon.service_id != existing.service_id {
                    return Err(invalid(
                        "icon_id",
                        "icon does not belong to the selected service",
                    ));
                }
                Some(icon_id)
            }
        };

        let updated = UserLink {
            id: existing.id,
            user_id: existing.user_id,
            service_id: existing.service_id,
            icon_id,
            url: patch.url.unwrap_or(existing.url),
            title: patch.title.or(existing.title),
            description: patch.description.or(existing.description),
            sort_order: existing.sort_order,
            is_active: patch.is_active.unwrap_or(existing.is_active),
            use_original_icon: patch.use_original_icon.unwrap_or(existing.use_original_icon),
            original_icon_url: patch.original_icon_url.or(existing.original_icon_url),
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        sqlx::query(
            r#"
            UPDATE user_links
            SET icon_id = ?, url = ?, title = ?, description = ?,
                is_active = ?, use_original_icon = ?, original_icon_url = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(updated.icon_id)
        .bind(&updated.url)
        .bind(&updated.title)
        .bind(&updated.description)
        .bind(updated.is_active)
        .bind(updated.use_original_icon)
        .bind(&updated.original_icon_url)
        .bind(updated.updated_at)
        .bind(updated.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_link(&self, link_id: Uuid, user_id: Uuid) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, UserLink>("SELECT * FROM user_links WHERE id = ?")
            .bind(link_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found("user link", link_id))?;

        ensure_owner("user link", link_id, existing.user_id, user_id)?;

        sqlx::query("DELETE FROM user_links WHERE id = ?")
            .bind(link_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn reorder_links(
        &self,
        user_id: Uuid,
        entries: &[OrderUpdate],
    ) -> Result<(), StorageError> {
        ordering::reorder(&self.pool, &OrderScope::UserLinks { user_id }, entries).await
    }
}
