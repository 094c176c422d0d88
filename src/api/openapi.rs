//! OpenAPI specification definition.
//!
//! Aggregates all route handlers and schemas for OpenAPI documentation
//! generation.

use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Services
        crate::routes::services::list_services,
        crate::routes::services::create_service,
        crate::routes::services::update_service,
        crate::routes::services::delete_service,
        crate::routes::services::reorder_services,
        crate::routes::services::list_service_icons,
        // Icons
        crate::routes::icons::create_icon,
        crate::routes::icons::update_icon,
        crate::routes::icons::delete_icon,
        crate::routes::icons::reorder_icons,
        // Links
        crate::routes::links::list_links,
        crate::routes::links::create_link,
        crate::routes::links::update_link,
        crate::routes::links::delete_link,
        crate::routes::links::reorder_links,
        // OpenAPI
        crate::routes::openapi::serve_openapi_json,
    ),
    components(schemas(
        crate::models::Service,
        crate::models::Icon,
        crate::models::UserLink,
        crate::models::enums::IconStyle,
        crate::models::enums::ColorScheme,
        crate::models::enums::Role,
        crate::services::validation::ServicePayload,
        crate::services::validation::ServicePatchPayload,
        crate::services::validation::IconPayload,
        crate::services::validation::IconPatchPayload,
        crate::services::validation::LinkPayload,
        crate::services::validation::LinkPatchPayload,
        crate::services::validation::ReorderPayload,
        crate::services::validation::ReorderEntry,
        crate::services::validation::FieldError,
        crate::routes::icons::IconReorderRequest,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Services", description = "Service catalog management"),
        (name = "Icons", description = "Icon library management"),
        (name = "Links", description = "Per-user profile links"),
        (name = "OpenAPI", description = "OpenAPI specification"),
    ),
    info(
        title = "Altee Links API",
        description = "REST API for the Altee service catalog, icon library and user links",
        version = "1.0.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8081/api/v1", description = "Local development server")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        // Keep the served version in lockstep with Cargo.toml.
        openapi.info.version = env!("CARGO_PKG_VERSION").to_string();

        if openapi.components.is_none() {
            openapi.components = Some(utoipa::openapi::Components::new());
        }

        let components = openapi.components.as_mut().unwrap();
        use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
