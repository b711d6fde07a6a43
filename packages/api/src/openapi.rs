use utoipa::{
    Modify, OpenApi,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};

/// Registers the bearer scheme referenced by `security(("bearer_auth" = []))`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                Http::builder()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token from /auth/login or /auth/refresh"))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Storefront API",
        version = "1.0.0",
        description = "Catalog, review and order API.\n\n## Authentication\n\nReads are public. Writes and everything under `/orders` require `Authorization: Bearer <access token>`, obtained from `/auth/login`."
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and token issuing"),
        (name = "categories", description = "Hierarchical product categories"),
        (name = "brands", description = "Product brands"),
        (name = "products", description = "Products with rating summaries"),
        (name = "reviews", description = "Product reviews"),
        (name = "orders", description = "Orders of the authenticated user")
    ),
    paths(
        crate::routes::health::health,
        crate::routes::health::catalog_health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::refresh,
        crate::routes::auth::me,
        crate::routes::auth::delete_me,
        crate::routes::category::list_categories,
        crate::routes::category::get_category,
        crate::routes::category::list_subcategories,
        crate::routes::category::create_category,
        crate::routes::category::replace_category,
        crate::routes::category::update_category,
        crate::routes::category::delete_category,
        crate::routes::brand::list_brands,
        crate::routes::brand::get_brand,
        crate::routes::brand::create_brand,
        crate::routes::brand::replace_brand,
        crate::routes::brand::update_brand,
        crate::routes::brand::delete_brand,
        crate::routes::product::list_products,
        crate::routes::product::get_product,
        crate::routes::product::create_product,
        crate::routes::product::replace_product,
        crate::routes::product::update_product,
        crate::routes::product::delete_product,
        crate::routes::review::list_reviews,
        crate::routes::review::get_review,
        crate::routes::review::create_review,
        crate::routes::review::replace_review,
        crate::routes::review::update_review,
        crate::routes::review::delete_review,
        crate::routes::order::list_orders,
        crate::routes::order::get_order,
        crate::routes::order::create_order,
        crate::routes::order::replace_order,
        crate::routes::order::update_order,
        crate::routes::order::delete_order,
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in ["/categories", "/brands/{id}", "/products", "/reviews/{id}", "/orders", "/auth/login"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.schemas.contains_key("ProductResponse"));
    }
}
