//! End-to-end tests for the bulk-upload pipeline against the mock backend.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, HashSet};

use maison_admin::backend::{AdminClient, StorageClient};
use maison_admin::services::upload::{
    BulkUploader, ImageFile, ItemStatus, MAX_FILES, UploadError, UploadEvent, UploadMode,
};
use maison_core::{BrandId, CategoryId, Product};
use maison_integration_tests::spawn_backend;
use tokio::sync::mpsc;

fn image(name: &str) -> ImageFile {
    ImageFile {
        file_name: name.to_string(),
        content_type: "image/jpeg".to_string(),
        bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
    }
}

fn uploader_for(backend: &maison_integration_tests::MockBackend) -> BulkUploader {
    let config = backend.admin_config();
    BulkUploader::new(
        AdminClient::new(&config.backend),
        StorageClient::new(&config.backend, config.storage_bucket.clone()),
    )
}

fn stored_products(backend: &maison_integration_tests::MockBackend) -> Vec<Product> {
    backend
        .state
        .rows("products")
        .into_iter()
        .map(|row| serde_json::from_value(row).unwrap())
        .collect()
}

#[tokio::test]
async fn seven_files_preset_mode_creates_seven_tagged_drafts() {
    let backend = spawn_backend().await;
    let uploader = uploader_for(&backend);

    let brand = BrandId::generate();
    let category = CategoryId::generate();
    let files: Vec<ImageFile> = (0..7).map(|i| image(&format!("bag_photo_{i}.jpg"))).collect();

    let report = uploader
        .run(
            files,
            UploadMode::Preset {
                brand_id: Some(brand),
                category_id: Some(category),
            },
        )
        .await
        .unwrap();

    assert_eq!(report.total, 7);
    assert_eq!(report.succeeded, 7);
    assert_eq!(report.failed, 0);

    // One status record per input file, each terminal.
    assert_eq!(report.items.len(), 7);
    for item in &report.items {
        assert_eq!(item.status, ItemStatus::Done);
        assert!(item.status.is_terminal());
        assert!(item.product_id.is_some());
        assert!(item.image_url.is_some());
    }

    // Seven draft rows, all carrying the preset and the draft shape.
    let products = stored_products(&backend);
    assert_eq!(products.len(), 7);
    let mut slugs = HashSet::new();
    for product in &products {
        assert_eq!(product.brand_id, Some(brand));
        assert_eq!(product.category_id, Some(category));
        assert!(product.price.is_zero());
        assert!(!product.is_active);
        assert!(product.is_draft());
        assert_eq!(product.stock_quantity, 0);
        assert_eq!(product.description.as_deref(), Some("Pending details"));
        assert!(slugs.insert(product.slug.clone()), "duplicate slug");
    }

    // Batch size 5: the second batch never overlaps the first, so no more
    // than five uploads are ever in flight.
    let max = backend.state.max_concurrent_uploads();
    assert!(max <= 5, "observed {max} concurrent uploads");
    assert!(max >= 2, "uploads did not overlap at all");

    assert_eq!(backend.state.uploaded_keys().len(), 7);
}

#[tokio::test]
async fn per_file_failures_are_isolated_and_leave_orphans() {
    let backend = spawn_backend().await;
    // The draft insert for this file will fail after its upload succeeds.
    backend.state.fail_insert_named("Poison");
    let uploader = uploader_for(&backend);

    let files = vec![image("first_bag.jpg"), image("poison.jpg"), image("last_bag.jpg")];
    let report = uploader.run(files, UploadMode::Manual).await.unwrap();

    assert_eq!(report.total, 3);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);

    let failed: Vec<_> = report
        .items
        .iter()
        .filter(|i| i.status == ItemStatus::Error)
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].file_name, "poison.jpg");
    assert_eq!(failed[0].error.as_deref(), Some("Upload failed"));

    // Two product rows, but three stored objects: the failed insert's
    // upload is orphaned.
    assert_eq!(stored_products(&backend).len(), 2);
    assert_eq!(backend.state.uploaded_keys().len(), 3);
}

#[tokio::test]
async fn storage_failure_marks_item_error_without_a_row() {
    let backend = spawn_backend().await;
    let uploader = uploader_for(&backend);

    let mut bad = image("broken.jpg");
    bad.content_type = "image/fail".to_string();

    let report = uploader
        .run(vec![image("good.jpg"), bad], UploadMode::Manual)
        .await
        .unwrap();

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(stored_products(&backend).len(), 1);
    assert_eq!(backend.state.uploaded_keys().len(), 1);
}

#[tokio::test]
async fn over_cap_run_is_rejected_before_any_upload() {
    let backend = spawn_backend().await;
    let uploader = uploader_for(&backend);

    let files: Vec<ImageFile> = (0..=MAX_FILES).map(|i| image(&format!("{i}.jpg"))).collect();
    let err = uploader.run(files, UploadMode::Manual).await.unwrap_err();

    assert!(matches!(err, UploadError::TooManyFiles { count } if count == MAX_FILES + 1));
    assert!(backend.state.uploaded_keys().is_empty());
    assert!(stored_products(&backend).is_empty());
}

#[tokio::test]
async fn bulk_endpoint_runs_the_wizard_and_pipeline() {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::util::ServiceExt;

    let backend = spawn_backend().await;
    let admin_id = uuid::Uuid::new_v4();
    backend
        .state
        .register_token("admin-token", admin_id, "admin@example.com");
    backend.state.grant_admin(admin_id);

    let brand = BrandId::generate();
    let app = maison_admin::app(maison_admin::state::AppState::new(backend.admin_config()));

    const BOUNDARY: &str = "maison-test-boundary";
    let mut body = String::new();
    body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"mode\"\r\n\r\npreset\r\n"
    ));
    body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"brand_id\"\r\n\r\n{brand}\r\n"
    ));
    body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"category_id\"\r\n\r\n__none__\r\n"
    ));
    for name in ["gold_watch.jpg", "silk-scarf.png"] {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\nContent-Type: image/jpeg\r\n\r\nfakeimagebytes\r\n"
        ));
    }
    // A non-image part: dropped by the selection filter, not an error.
    body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"notes.txt\"\r\nContent-Type: text/plain\r\n\r\njust text\r\n"
    ));
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    let request = Request::builder()
        .method("POST")
        .uri("/admin/products/bulk")
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
    let report: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(report["total"], 2);
    assert_eq!(report["succeeded"], 2);
    assert_eq!(report["failed"], 0);

    let products = stored_products(&backend);
    assert_eq!(products.len(), 2);
    let names: HashSet<String> = products.iter().map(|p| p.name.clone()).collect();
    assert!(names.contains("Gold Watch"));
    assert!(names.contains("Silk Scarf"));
    // The explicit "no category" sentinel stores as absence; the brand
    // preset is applied to both drafts.
    for product in &products {
        assert_eq!(product.brand_id, Some(brand));
        assert_eq!(product.category_id, None);
    }
}

#[tokio::test]
async fn observer_sees_ordered_status_transitions() {
    let backend = spawn_backend().await;
    let uploader = uploader_for(&backend);

    let (tx, mut rx) = mpsc::channel(64);
    let report = uploader
        .run_with_observer(vec![image("bag_one.jpg"), image("bag_two.jpg")], UploadMode::Manual, Some(tx))
        .await
        .unwrap();
    assert_eq!(report.succeeded, 2);

    let mut sequences: HashMap<String, Vec<&'static str>> = HashMap::new();
    while let Some(event) = rx.recv().await {
        let label = match &event {
            UploadEvent::Uploading { .. } => "uploading",
            UploadEvent::Uploaded { .. } => "uploaded",
            UploadEvent::Creating { .. } => "creating",
            UploadEvent::Done { .. } => "done",
            UploadEvent::Failed { .. } => "failed",
        };
        sequences.entry(event.temp_id().to_string()).or_default().push(label);
    }

    assert_eq!(sequences.len(), 2);
    for sequence in sequences.values() {
        assert_eq!(sequence, &["uploading", "uploaded", "creating", "done"]);
    }
}
