//! Image upload handlers: single form upload and the bulk wizard run.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use chrono::Utc;
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAdmin;
use crate::services::upload::{
    BulkUploader, ImageFile, PresetChoice, UploadKind, UploadReport, UploadWizard,
};
use crate::state::AppState;

async fn read_file_part(field: axum::extract::multipart::Field<'_>) -> Result<ImageFile> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?;

    Ok(ImageFile {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    })
}

async fn read_text_part(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))
}

/// Single image upload for the product/brand/category forms.
///
/// Stores the file and returns its public URL for the form to keep.
pub async fn image(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file = read_file_part(field).await?;
        if !file.is_image() {
            return Err(AppError::Validation("Only image files are accepted".into()));
        }

        let ext = file
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
            .unwrap_or("img");
        let key = format!("products/{}.{ext}", Utc::now().timestamp_millis());

        state
            .storage()
            .upload(&key, file.bytes, &file.content_type)
            .await?;

        return Ok(Json(json!({ "url": state.storage().public_url(&key) })));
    }

    Err(AppError::BadRequest("missing file field".into()))
}

/// Bulk upload: drive the wizard from multipart fields, then run the
/// pipeline to completion and return the per-file report.
///
/// Fields: `mode` (`manual` | `preset`), optional `brand_id` /
/// `category_id` (id, empty, or the `__none__` sentinel), and up to 100
/// `files` parts. Non-image parts are dropped by the wizard's filter; a
/// selection past the cap rejects the whole request before any upload.
pub async fn bulk(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadReport>)> {
    let mut mode: Option<String> = None;
    let mut brand_raw: Option<String> = None;
    let mut category_raw: Option<String> = None;
    let mut files: Vec<ImageFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("mode") => mode = Some(read_text_part(field).await?),
            Some("brand_id") => brand_raw = Some(read_text_part(field).await?),
            Some("category_id") => category_raw = Some(read_text_part(field).await?),
            Some("files") => files.push(read_file_part(field).await?),
            _ => {}
        }
    }

    let kind = match mode.as_deref() {
        Some("preset") => UploadKind::Preset,
        Some("manual") | None => UploadKind::Manual,
        Some(other) => {
            return Err(AppError::BadRequest(format!("unknown upload mode: {other}")));
        }
    };

    let mut wizard = UploadWizard::new();
    wizard.select_mode(kind);

    if kind == UploadKind::Preset {
        let brand = PresetChoice::parse(brand_raw.as_deref())
            .map_err(|raw| AppError::BadRequest(format!("invalid brand id: {raw}")))?;
        let category = PresetChoice::parse(category_raw.as_deref())
            .map_err(|raw| AppError::BadRequest(format!("invalid category id: {raw}")))?;

        wizard.set_preset(brand, category);
        wizard.proceed_to_upload()?;
    }

    wizard.add_files(files)?;
    let plan = wizard.begin()?;

    let uploader = BulkUploader::new(state.backend().clone(), state.storage().clone());
    let report = uploader.run(plan.files, plan.mode).await?;

    Ok((StatusCode::OK, Json(report)))
}
