//! Operation-group traits for the persistence gateway.

use uuid::Uuid;

use super::StorageError;
use super::ordering::OrderUpdate;
use crate::models::{
    Icon, IconPatch, NewIcon, NewService, NewUserLink, Service, ServiceFilter, ServicePatch,
    UserLink, UserLinkPatch,
};

/// Ownership guard shared by the API boundary and the gateway.
///
/// Handlers call this before touching a row; the gateway calls it again on
/// the freshly loaded row so a bypassed handler check can never mutate a
/// foreign resource.
pub fn ensure_owner(
    entity_type: &str,
    entity_id: Uuid,
    owner_id: Uuid,
    principal_id: Uuid,
) -> Result<(), StorageError> {
    if owner_id == principal_id {
        Ok(())
    } else {
        Err(StorageError::NotOwner {
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
        })
    }
}

/// Catalog service operations.
#[async_trait::async_trait]
pub trait ServiceStore: Send + Sync {
    /// List services matching `filter`, ordered by `sort_order` ascending.
    async fn list_services(&self, filter: &ServiceFilter) -> Result<Vec<Service>, StorageError>;

    /// Get a service by id.
    async fn get_service(&self, id: Uuid) -> Result<Option<Service>, StorageError>;

    /// Get a service by its unique slug.
    async fn get_service_by_slug(&self, slug: &str) -> Result<Option<Service>, StorageError>;

    /// Create a service. Fails with `Duplicate` when the name or slug is
    /// already taken; the new row is appended to the end of the sort order.
    async fn create_service(&self, data: NewService) -> Result<Service, StorageError>;

    /// Apply a partial update. Fails with `NotFound` when the id does not
    /// resolve.
    async fn update_service(&self, id: Uuid, patch: ServicePatch) -> Result<Service, StorageError>;

    /// Delete a service. Fails with `InUse` while any icon or user link
    /// references it.
    async fn delete_service(&self, id: Uuid) -> Result<(), StorageError>;

    /// Atomically apply new sort positions to the global service collection.
    async fn reorder_services(&self, entries: &[OrderUpdate]) -> Result<(), StorageError>;
}

/// Icon library operations.
#[async_trait::async_trait]
pub trait IconStore: Send + Sync {
    /// List a service's icons ordered by `sort_order`. Non-admin callers must
    /// pass `include_inactive = false` so deactivated assets stay hidden.
    async fn list_icons(
        &self,
        service_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<Icon>, StorageError>;

    /// Get an icon by id.
    async fn get_icon(&self, id: Uuid) -> Result<Option<Icon>, StorageError>;

    /// Create an icon under its owning service.
    async fn create_icon(&self, data: NewIcon) -> Result<Icon, StorageError>;

    /// Apply a partial update. Fails with `NotFound` when the id does not
    /// resolve.
    async fn update_icon(&self, id: Uuid, patch: IconPatch) -> Result<Icon, StorageError>;

    /// Delete an icon. Fails with `InUse` while any user link references it.
    async fn delete_icon(&self, id: Uuid) -> Result<(), StorageError>;

    /// Atomically apply new sort positions within one service's icon list.
    async fn reorder_icons(
        &self,
        service_id: Uuid,
        entries: &[OrderUpdate],
    ) -> Result<(), StorageError>;
}

/// User link operations. Every mutation re-verifies ownership.
#[async_trait::async_trait]
pub trait LinkStore: Send + Sync {
    /// List a user's links ordered by `sort_order`.
    async fn list_links(&self, user_id: Uuid) -> Result<Vec<UserLink>, StorageError>;

    /// Get a link by id, regardless of owner.
    async fn get_link(&self, id: Uuid) -> Result<Option<UserLink>, StorageError>;

    /// Create a link owned by `user_id`.
    async fn create_link(&self, user_id: Uuid, data: NewUserLink)
    -> Result<UserLink, StorageError>;

    /// Apply a partial update to a link owned by `user_id`.
    async fn update_link(
        &self,
        link_id: Uuid,
        user_id: Uuid,
        patch: UserLinkPatch,
    ) -> Result<UserLink, StorageError>;

    /// Delete a link owned by `user_id`.
    async fn delete_link(&self, link_id: Uuid, user_id: Uuid) -> Result<(), StorageError>;

    /// Atomically apply new sort positions within one user's link list.
    async fn reorder_links(
        &self,
        user_id: Uuid,
        entries: &[OrderUpdate],
    ) -> Result<(), StorageError>;
}

/// Combined storage backend behind the API boundary.
pub trait StorageBackend: ServiceStore + IconStore + LinkStore {}

impl<T: ServiceStore + IconStore + LinkStore> StorageBackend for T {}
