//! Sort-order subsystem tests: append positions, scoped collections, atomic
//! bulk reorder.

use altee_api::models::{ColorScheme, IconStyle, NewIcon, NewService, NewUserLink, ServiceFilter};
use altee_api::storage::{
    IconStore, LinkStore, MIGRATOR, OrderUpdate, ServiceStore, SqliteStorage, StorageError,
};
use uuid::Uuid;

async fn create_storage() -> SqliteStorage {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    MIGRATOR.run(&pool).await.unwrap();
    SqliteStorage::new(pool)
}

fn new_service(name: &str, slug: &str) -> NewService {
    NewService {
        name: name.to_string(),
        slug: slug.to_string(),
        description: None,
        base_url: None,
        allow_original_icon: true,
        is_active: true,
    }
}

fn new_icon(service_id: Uuid, name: &str) -> NewIcon {
    NewIcon {
        service_id,
        name: name.to_string(),
        file_path: format!("icons/{}.png", name),
        style: IconStyle::Filled,
        color_scheme: ColorScheme::Original,
        description: None,
        is_active: true,
        uploaded_by: Uuid::new_v4(),
    }
}

fn new_link(service_id: Uuid) -> NewUserLink {
    NewUserLink {
        service_id,
        icon_id: None,
        url: "https://example.com/me".to_string(),
        title: None,
        description: None,
        is_active: true,
        use_original_icon: false,
        original_icon_url: None,
    }
}

#[tokio::test]
async fn test_services_get_sequential_sort_orders() {
    let storage = create_storage().await;

    let a = storage.create_service(new_service("A", "a")).await.unwrap();
    let b = storage.create_service(new_service("B", "b")).await.unwrap();
    let c = storage.create_service(new_service("C", "c")).await.unwrap();

    assert_eq!(a.sort_order, 1);
    assert_eq!(b.sort_order, 2);
    assert_eq!(c.sort_order, 3);
}

#[tokio::test]
async fn test_sort_order_continues_past_gaps() {
    let storage = create_storage().await;

    let a = storage.create_service(new_service("A", "a")).await.unwrap();
    storage.create_service(new_service("B", "b")).await.unwrap();

    // Deleting the first row leaves a gap; the next create still appends
    // after the current maximum.
    storage.delete_service(a.id).await.unwrap();
    let c = storage.create_service(new_service("C", "c")).await.unwrap();
    assert_eq!(c.sort_order, 3);
}

#[tokio::test]
async fn test_icon_sort_order_is_scoped_per_service() {
    let storage = create_storage().await;

    let first = storage.create_service(new_service("A", "a")).await.unwrap();
    let second = storage.create_service(new_service("B", "b")).await.unwrap();

    let icon_a = storage.create_icon(new_icon(first.id, "a1")).await.unwrap();
    let icon_b = storage.create_icon(new_icon(second.id, "b1")).await.unwrap();
    let icon_a2 = storage.create_icon(new_icon(first.id, "a2")).await.unwrap();

    assert_eq!(icon_a.sort_order, 1);
    assert_eq!(icon_b.sort_order, 1);
    assert_eq!(icon_a2.sort_order, 2);
}

#[tokio::test]
async fn test_link_sort_order_is_scoped_per_user() {
    let storage = create_storage().await;
    let service = storage.create_service(new_service("A", "a")).await.unwrap();

    let user_a = Uuid::new_v4();
    let user_b = Uuid::new_v4();

    let first = storage.create_link(user_a, new_link(service.id)).await.unwrap();
    let second = storage.create_link(user_b, new_link(service.id)).await.unwrap();
    let third = storage.create_link(user_a, new_link(service.id)).await.unwrap();

    assert_eq!(first.sort_order, 1);
    assert_eq!(second.sort_order, 1);
    assert_eq!(third.sort_order, 2);
}

#[tokio::test]
async fn test_reorder_applies_all_positions() {
    let storage = create_storage().await;

    let a = storage.create_service(new_service("A", "a")).await.unwrap();
    let b = storage.create_service(new_service("B", "b")).await.unwrap();
    let c = storage.create_service(new_service("C", "c")).await.unwrap();

    storage
        .reorder_services(&[
            OrderUpdate { id: a.id, sort_order: 3 },
            OrderUpdate { id: b.id, sort_order: 1 },
            OrderUpdate { id: c.id, sort_order: 2 },
        ])
        .await
        .unwrap();

    let services = storage
        .list_services(&ServiceFilter::default())
        .await
        .unwrap();
    let names: Vec<&str> = services.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["B", "C", "A"]);
}

#[tokio::test]
async fn test_reorder_rejects_empty_list() {
    let storage = create_storage().await;

    let result = storage.reorder_services(&[]).await;
    assert!(matches!(
        result,
        Err(StorageError::InvalidInput { .. })
    ));
}

#[tokio::test]
async fn test_reorder_with_unknown_id_rolls_back() {
    let storage = create_storage().await;

    let a = storage.create_service(new_service("A", "a")).await.unwrap();
    let b = storage.create_service(new_service("B", "b")).await.unwrap();

    let result = storage
        .reorder_services(&[
            OrderUpdate { id: a.id, sort_order: 9 },
            OrderUpdate {
                id: Uuid::new_v4(),
                sort_order: 1,
            },
        ])
        .await;
    assert!(matches!(result, Err(StorageError::NotFound { .. })));

    // Nothing from the failed batch is visible.
    let services = storage
        .list_services(&ServiceFilter::default())
        .await
        .unwrap();
    assert_eq!(services[0].id, a.id);
    assert_eq!(services[0].sort_order, 1);
    assert_eq!(services[1].id, b.id);
    assert_eq!(services[1].sort_order, 2);
}

#[tokio::test]
async fn test_reorder_cannot_cross_scopes() {
    let storage = create_storage().await;
    let service = storage.create_service(new_service("A", "a")).await.unwrap();

    let user_a = Uuid::new_v4();
    let user_b = Uuid::new_v4();
    let link_a = storage.create_link(user_a, new_link(service.id)).await.unwrap();
    storage.create_link(user_b, new_link(service.id)).await.unwrap();

    // User B cannot move user A's link even with a valid id.
    let result = storage
        .reorder_links(
            user_b,
            &[OrderUpdate {
                id: link_a.id,
                sort_order: 5,
            }],
        )
        .await;
    assert!(matches!(result, Err(StorageError::NotFound { .. })));

    let links = storage.list_links(user_a).await.unwrap();
    assert_eq!(links[0].sort_order, 1);
}

#[tokio::test]
async fn test_reorder_with_duplicate_positions_is_stable() {
    let storage = create_storage().await;

    let a = storage.create_service(new_service("A", "a")).await.unwrap();
    let b = storage.create_service(new_service("B", "b")).await.unwrap();

    storage
        .reorder_services(&[
            OrderUpdate { id: a.id, sort_order: 7 },
            OrderUpdate { id: b.id, sort_order: 7 },
        ])
        .await
        .unwrap();

    let services = storage
        .list_services(&ServiceFilter::default())
        .await
        .unwrap();
    assert_eq!(services.len(), 2);
    assert!(services.iter().all(|s| s.sort_order == 7));
}
