//! Admin CRUD round-trips against the mock backend.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use maison_admin::backend::{
    AdminClient, BrandPatch, NewBrand, NewProduct, NewSetting, ProductPatch,
};
use maison_admin::state::AppState;
use maison_core::{Price, ProductStatus};
use maison_integration_tests::{MockBackend, spawn_backend};
use serde_json::{Value, json};
use tower::util::ServiceExt;
use uuid::Uuid;

fn client_for(backend: &MockBackend) -> AdminClient {
    AdminClient::new(&backend.admin_config().backend)
}

#[tokio::test]
async fn brand_rename_round_trip_shows_new_name_exactly_once() {
    let backend = spawn_backend().await;
    let client = client_for(&backend);

    let brand = client
        .insert_brand(&NewBrand {
            name: "Hermes".to_string(),
            description: None,
            logo_url: None,
            is_active: true,
        })
        .await
        .unwrap();

    let patch = BrandPatch {
        name: Some("Hermès".to_string()),
        ..BrandPatch::default()
    };
    client.update_brand(brand.id, &patch).await.unwrap();

    let brands = client.list_brands().await.unwrap();
    let renamed: Vec<_> = brands.iter().filter(|b| b.name == "Hermès").collect();
    assert_eq!(renamed.len(), 1, "renamed brand must appear exactly once");
    assert!(brands.iter().all(|b| b.name != "Hermes"));
    assert_eq!(renamed[0].id, brand.id);
}

#[tokio::test]
async fn editing_a_draft_publishes_it() {
    let backend = spawn_backend().await;
    let client = client_for(&backend);

    let draft = client
        .insert_product(&NewProduct {
            name: "Blue Leather Bag".to_string(),
            slug: "blue-leather-bag-17000000000000".to_string(),
            description: Some("Pending details".to_string()),
            price: Price::ZERO,
            original_price: None,
            image_url: None,
            status: ProductStatus::Draft,
            is_active: false,
            is_featured: false,
            is_bestseller: false,
            stock_quantity: 0,
            brand_id: None,
            category_id: None,
        })
        .await
        .unwrap();
    assert!(draft.is_draft());

    let patch = ProductPatch {
        price: Some(Price::from_major(2450)),
        status: Some(ProductStatus::Published),
        is_active: Some(true),
        ..ProductPatch::default()
    };
    let published = client.update_product(draft.id, &patch).await.unwrap();

    assert!(!published.is_draft());
    assert_eq!(published.status, ProductStatus::Published);
    assert_eq!(published.price, Price::from_major(2450));

    client.delete_product(draft.id).await.unwrap();
    assert!(client.list_products().await.unwrap().is_empty());
}

#[tokio::test]
async fn settings_value_rewrite_round_trip() {
    let backend = spawn_backend().await;
    let client = client_for(&backend);

    client
        .insert_setting(&NewSetting {
            key: "whatsapp_number".to_string(),
            value: String::new(),
            category: "social".to_string(),
        })
        .await
        .unwrap();

    client
        .update_setting_value("whatsapp_number", "97144447777")
        .await
        .unwrap();

    let settings = client.list_settings().await.unwrap();
    let matching: Vec<_> = settings
        .iter()
        .filter(|s| s.key == "whatsapp_number")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].value, "97144447777");
}

async fn admin_json_request(
    app: axum::Router,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"));

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
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

fn admin_app(backend: &MockBackend) -> axum::Router {
    let admin_id = Uuid::new_v4();
    backend
        .state
        .register_token("admin-token", admin_id, "admin@example.com");
    backend.state.grant_admin(admin_id);
    maison_admin::app(AppState::new(backend.admin_config()))
}

#[tokio::test]
async fn product_create_requires_name_and_price() {
    let backend = spawn_backend().await;
    let app = admin_app(&backend);

    let (status, body) = admin_json_request(
        app.clone(),
        "POST",
        "/admin/products",
        "admin-token",
        Some(json!({ "name": "Silk Scarf" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Name and price are required");

    let (status, body) = admin_json_request(
        app,
        "POST",
        "/admin/products",
        "admin-token",
        Some(json!({ "name": "Silk Scarf", "price": 580 })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Silk Scarf");
    assert_eq!(body["slug"], "silk-scarf");
}

#[tokio::test]
async fn products_list_supports_search_and_drafts_filter() {
    let backend = spawn_backend().await;
    let client = client_for(&backend);
    let app = admin_app(&backend);

    for (name, slug, status, active, price) in [
        ("Classic Bag", "classic-bag", ProductStatus::Published, true, 2450),
        ("Draft Bag", "draft-bag-1", ProductStatus::Draft, false, 0),
        ("Silk Scarf", "silk-scarf", ProductStatus::Published, true, 580),
    ] {
        client
            .insert_product(&NewProduct {
                name: name.to_string(),
                slug: slug.to_string(),
                description: None,
                price: Price::from_major(price),
                original_price: None,
                image_url: None,
                status,
                is_active: active,
                is_featured: false,
                is_bestseller: false,
                stock_quantity: 1,
                brand_id: None,
                category_id: None,
            })
            .await
            .unwrap();
    }

    let (status, body) =
        admin_json_request(app.clone(), "GET", "/admin/products?q=bag", "admin-token", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"].as_array().unwrap().len(), 2);
    assert_eq!(body["draft_count"], 1);

    let (_, body) =
        admin_json_request(app, "GET", "/admin/products?drafts=true", "admin-token", None).await;
    let drafts = body["products"].as_array().unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0]["name"], "Draft Bag");
}

#[tokio::test]
async fn dashboard_reports_exact_counts() {
    let backend = spawn_backend().await;
    let client = client_for(&backend);
    let app = admin_app(&backend);

    client
        .insert_brand(&NewBrand {
            name: "Gucci".to_string(),
            description: None,
            logo_url: None,
            is_active: true,
        })
        .await
        .unwrap();

    for (slug, active) in [("a", true), ("b", false)] {
        client
            .insert_product(&NewProduct {
                name: slug.to_uppercase(),
                slug: slug.to_string(),
                description: None,
                price: Price::from_major(100),
                original_price: None,
                image_url: None,
                status: ProductStatus::Published,
                is_active: active,
                is_featured: false,
                is_bestseller: false,
                stock_quantity: 1,
                brand_id: None,
                category_id: None,
            })
            .await
            .unwrap();
    }

    let (status, body) =
        admin_json_request(app, "GET", "/admin/dashboard", "admin-token", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_products"], 2);
    assert_eq!(body["active_products"], 1);
    assert_eq!(body["total_brands"], 1);
    assert_eq!(body["total_categories"], 0);
}

#[tokio::test]
async fn single_image_upload_returns_a_public_url() {
    let backend = spawn_backend().await;
    let app = admin_app(&backend);

    const BOUNDARY: &str = "maison-image-boundary";
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"logo-lv.png\"\r\nContent-Type: image/png\r\n\r\nfakepngbytes\r\n--{BOUNDARY}--\r\n"
    );

    let request = Request::builder()
        .method("POST")
        .uri("/admin/uploads/image")
        .header(header::AUTHORIZATION, "Bearer admin-token")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    let url = value["url"].as_str().unwrap();
    assert!(url.contains("/storage/v1/object/public/product-images/products/"));
    assert!(url.ends_with(".png"));

    assert_eq!(backend.state.uploaded_keys().len(), 1);
}

#[tokio::test]
async fn admin_provisioning_is_idempotent() {
    let backend = spawn_backend().await;
    let config = backend.admin_config();
    let auth = maison_admin::backend::AuthClient::new(&config.backend);
    let client = client_for(&backend);

    // First pass creates the account and grants the role.
    assert!(auth.find_user_by_email("admin@example.com").await.unwrap().is_none());
    let user = auth
        .create_user("admin@example.com", "123456", "Site Administrator")
        .await
        .unwrap();
    assert!(client.ensure_admin_role(user.id).await.unwrap());

    // Second pass finds the account and leaves the role alone.
    let existing = auth
        .find_user_by_email("admin@example.com")
        .await
        .unwrap()
        .expect("account must exist");
    assert_eq!(existing.id, user.id);
    assert!(!client.ensure_admin_role(user.id).await.unwrap());

    assert_eq!(backend.state.rows("user_roles").len(), 1);
}

#[tokio::test]
async fn settings_bulk_save_via_route() {
    let backend = spawn_backend().await;
    let client = client_for(&backend);
    let app = admin_app(&backend);

    for key in ["site_name", "instagram_url"] {
        client
            .insert_setting(&NewSetting {
                key: key.to_string(),
                value: String::new(),
                category: "general".to_string(),
            })
            .await
            .unwrap();
    }

    let (status, _) = admin_json_request(
        app.clone(),
        "PUT",
        "/admin/settings",
        "admin-token",
        Some(json!([
            { "key": "site_name", "value": "Maison" },
            { "key": "instagram_url", "value": "https://instagram.com/maisonatelier" },
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = admin_json_request(app, "GET", "/admin/settings", "admin-token", None).await;
    let settings = body.as_array().unwrap();
    assert!(settings
        .iter()
        .any(|s| s["key"] == "site_name" && s["value"] == "Maison"));
}
