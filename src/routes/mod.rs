pub mod health;
pub mod pricing_components;
pub mod products;
pub mod specialties;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        // Rate table
        .route(
            "/specialties",
            get(specialties::list_specialties).post(specialties::create_specialty),
        )
        .route(
            "/specialties/:specialty_id",
            get(specialties::get_specialty)
                .put(specialties::update_specialty)
                .delete(specialties::delete_specialty),
        )
        // Pricing rule set
        .route(
            "/pricing-components",
            get(pricing_components::list_components).post(pricing_components::create_component),
        )
        .route(
            "/pricing-components/total-rate",
            get(pricing_components::get_total_rate),
        )
        .route(
            "/pricing-components/:component_id",
            get(pricing_components::get_component)
                .put(pricing_components::update_component)
                .delete(pricing_components::delete_component),
        )
        // Products
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/quote", post(products::quote_product))
        .route("/products/recompute", post(products::recompute_products))
        .route(
            "/products/:product_id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/products/:product_id/quote", post(products::quote_selection))
}
