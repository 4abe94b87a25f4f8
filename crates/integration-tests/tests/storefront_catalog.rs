//! Storefront catalog flow against the mock backend, including fallback
//! behavior when the backend is unreachable.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use maison_integration_tests::{MockBackend, spawn_backend, storefront_config_for};
use maison_storefront::state::AppState;
use serde_json::{Value, json};
use tower::util::ServiceExt;
use uuid::Uuid;

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn app_for(backend: &MockBackend) -> axum::Router {
    maison_storefront::app(AppState::new(backend.storefront_config()))
}

/// An app whose backend URL points at a dead port.
fn unreachable_app() -> axum::Router {
    maison_storefront::app(AppState::new(storefront_config_for("http://127.0.0.1:9")))
}

#[tokio::test]
async fn gateway_serves_curated_fallback_when_backend_is_unreachable() {
    let app = unreachable_app();

    let (status, body) = get_json(app.clone(), "/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback");
    let names: Vec<&str> = body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Men"));
    assert!(names.contains(&"Women"));

    let (status, body) = get_json(app.clone(), "/brands").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback");

    let (status, body) = get_json(app, "/bestsellers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback");
    assert!(!body["products"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn live_categories_are_served_and_cached() {
    let backend = spawn_backend().await;
    backend.state.seed_row(
        "categories",
        json!({
            "id": Uuid::new_v4(),
            "name": "Women",
            "slug": "women",
            "parent_id": null,
            "is_active": true,
            "sort_order": 1,
        }),
    );
    backend.state.seed_row(
        "categories",
        json!({
            "id": Uuid::new_v4(),
            "name": "Men",
            "slug": "men",
            "parent_id": null,
            "is_active": true,
            "sort_order": 2,
        }),
    );

    let app = app_for(&backend);

    let (status, body) = get_json(app.clone(), "/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "live");
    assert_eq!(body["categories"].as_array().unwrap().len(), 2);

    // Second read is served from the 5-minute cache.
    let (_, body) = get_json(app, "/categories").await;
    assert_eq!(body["source"], "live");
    assert_eq!(backend.state.rest_hits("categories"), 1);
}

#[tokio::test]
async fn product_detail_builds_order_links_from_settings() {
    let backend = spawn_backend().await;
    let brand_id = Uuid::new_v4();
    backend.state.seed_row(
        "brands",
        json!({ "id": brand_id, "name": "Louis Vuitton", "is_active": true }),
    );
    backend.state.seed_row(
        "products",
        json!({
            "id": Uuid::new_v4(),
            "name": "Classic Leather Bag",
            "slug": "classic-leather-bag",
            "price": 2450,
            "status": "published",
            "is_active": true,
            "stock_quantity": 3,
            "brand_id": brand_id,
        }),
    );
    for (key, value) in [
        ("whatsapp_number", "97144447777"),
        ("instagram_url", "https://instagram.com/maisonatelier"),
    ] {
        backend.state.seed_row(
            "site_settings",
            json!({ "id": Uuid::new_v4(), "key": key, "value": value, "category": "social" }),
        );
    }

    let app = app_for(&backend);
    let (status, body) = get_json(app, "/products/classic-leather-bag").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "live");
    assert_eq!(body["brand"], "Louis Vuitton");
    assert_eq!(body["in_stock"], true);

    let whatsapp = body["order"]["whatsapp"].as_str().unwrap();
    assert!(whatsapp.starts_with("https://wa.me/97144447777?text="));
    assert!(whatsapp.contains("Classic%20Leather%20Bag"));
    assert_eq!(
        body["order"]["instagram"],
        "https://instagram.com/maisonatelier"
    );
}

#[tokio::test]
async fn unknown_product_serves_the_placeholder() {
    let backend = spawn_backend().await;
    let app = app_for(&backend);

    let (status, body) = get_json(app, "/products/no-such-slug").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["name"], "Classic Leather Bag");
    assert_eq!(body["slug"], "no-such-slug");
}

#[tokio::test]
async fn product_grid_filters_by_brand() {
    let backend = spawn_backend().await;
    let lv = Uuid::new_v4();
    let gucci = Uuid::new_v4();
    for (id, name) in [(lv, "Louis Vuitton"), (gucci, "Gucci")] {
        backend
            .state
            .seed_row("brands", json!({ "id": id, "name": name, "is_active": true }));
    }
    for (slug, brand) in [("lv-bag", lv), ("gucci-belt", gucci)] {
        backend.state.seed_row(
            "products",
            json!({
                "id": Uuid::new_v4(),
                "name": slug,
                "slug": slug,
                "price": 100,
                "is_active": true,
                "brand_id": brand,
            }),
        );
    }

    let app = app_for(&backend);
    let (status, body) = get_json(app, &format!("/products?brand={lv}")).await;

    assert_eq!(status, StatusCode::OK);
    let products = body["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["slug"], "lv-bag");
    assert_eq!(products[0]["brand"], "Louis Vuitton");
}

#[tokio::test]
async fn subcategories_resolve_through_the_parent_slug() {
    let backend = spawn_backend().await;
    let women = Uuid::new_v4();
    backend.state.seed_row(
        "categories",
        json!({
            "id": women,
            "name": "Women",
            "slug": "women",
            "parent_id": null,
            "is_active": true,
            "sort_order": 1,
        }),
    );
    backend.state.seed_row(
        "categories",
        json!({
            "id": Uuid::new_v4(),
            "name": "Handbags",
            "slug": "women-handbags",
            "parent_id": women,
            "is_active": true,
            "sort_order": 1,
        }),
    );

    let app = app_for(&backend);

    let (status, body) = get_json(app.clone(), "/categories/women/children").await;
    assert_eq!(status, StatusCode::OK);
    let children = body["categories"].as_array().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["name"], "Handbags");

    let (status, _) = get_json(app, "/categories/no-such/children").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn home_composes_site_gateway_and_bestsellers() {
    let backend = spawn_backend().await;
    backend.state.seed_row(
        "site_settings",
        json!({ "id": Uuid::new_v4(), "key": "site_name", "value": "DXB Maison", "category": "general" }),
    );

    let app = app_for(&backend);
    let (status, body) = get_json(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["site"]["name"], "DXB Maison");
    // Empty tables: the gateway and strip fall back to curated content.
    assert_eq!(body["categories"]["source"], "fallback");
    assert_eq!(body["bestsellers"]["source"], "fallback");
}

#[tokio::test]
async fn public_settings_endpoint_returns_the_map() {
    let backend = spawn_backend().await;
    backend.state.seed_row(
        "site_settings",
        json!({ "id": Uuid::new_v4(), "key": "site_name", "value": "Maison", "category": "general" }),
    );

    let app = app_for(&backend);
    let (status, body) = get_json(app, "/settings").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["site_name"], "Maison");
}

#[tokio::test]
async fn readiness_reflects_backend_health() {
    let backend = spawn_backend().await;
    let live = app_for(&backend);
    let (status, _) = get_json(live, "/health/ready").await;
    assert_eq!(status, StatusCode::OK);

    let dead = unreachable_app();
    let (status, _) = get_json(dead, "/health/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
