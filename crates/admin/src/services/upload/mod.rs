//! Bulk image-upload pipeline.
//!
//! Takes up to [`MAX_FILES`] image files, uploads each to object storage,
//! and creates one draft product per successfully uploaded image. Files
//! are processed in fixed batches of [`BATCH_SIZE`]: batches run
//! sequentially, files within a batch fan out concurrently, so at most
//! five upload+insert chains are in flight at any instant.
//!
//! Per-file progress travels as [`UploadEvent`]s over an mpsc channel and
//! is folded into a status record per file. Upload and insert fail
//! independently; neither is retried, and a succeeded upload whose insert
//! fails leaves an orphaned object behind (no compensation path).

mod wizard;

pub use wizard::{
    NONE_VALUE, PresetChoice, UploadKind, UploadPlan, UploadWizard, WizardError, WizardStep,
};

use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::instrument;

use maison_core::{
    BrandId, CategoryId, Price, ProductId, ProductStatus, product_name_from_file, unique_slug,
};

use crate::backend::{AdminClient, NewProduct, StorageClient};

/// Hard cap on files per run.
pub const MAX_FILES: usize = 100;

/// Files processed concurrently within one batch.
pub const BATCH_SIZE: usize = 5;

/// Description stamped on every draft until an admin fills in details.
const DRAFT_DESCRIPTION: &str = "Pending details";

/// User-facing message for any per-file failure, at either stage.
const GENERIC_FAILURE: &str = "Upload failed";

/// An image file selected for upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Whether the MIME type marks this as an image.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// How draft products are tagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadMode {
    /// No tagging; details added per product later.
    Manual,
    /// Every draft carries the chosen brand/category.
    Preset {
        brand_id: Option<BrandId>,
        category_id: Option<CategoryId>,
    },
}

/// Per-file pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Uploading,
    Uploaded,
    Creating,
    Done,
    Error,
}

impl ItemStatus {
    /// Whether this is a terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

/// A progress event for one file, published over the pipeline channel.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    Uploading {
        temp_id: String,
    },
    Uploaded {
        temp_id: String,
        image_url: String,
    },
    Creating {
        temp_id: String,
    },
    Done {
        temp_id: String,
        product_id: ProductId,
    },
    Failed {
        temp_id: String,
        message: String,
    },
}

impl UploadEvent {
    /// The file this event belongs to.
    #[must_use]
    pub fn temp_id(&self) -> &str {
        match self {
            Self::Uploading { temp_id }
            | Self::Uploaded { temp_id, .. }
            | Self::Creating { temp_id }
            | Self::Done { temp_id, .. }
            | Self::Failed { temp_id, .. } => temp_id,
        }
    }
}

/// Status record for one file; exists only for the duration of a run.
#[derive(Debug, Clone, Serialize)]
pub struct UploadItem {
    pub temp_id: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadItem {
    fn new(temp_id: String, file_name: String) -> Self {
        Self {
            temp_id,
            file_name,
            image_url: None,
            product_id: None,
            status: ItemStatus::Uploading,
            error: None,
        }
    }
}

/// Fold one event into the status records.
pub fn apply_event(items: &mut [UploadItem], event: &UploadEvent) {
    let Some(item) = items.iter_mut().find(|i| i.temp_id == event.temp_id()) else {
        return;
    };

    match event {
        UploadEvent::Uploading { .. } => item.status = ItemStatus::Uploading,
        UploadEvent::Uploaded { image_url, .. } => {
            item.status = ItemStatus::Uploaded;
            item.image_url = Some(image_url.clone());
        }
        UploadEvent::Creating { .. } => item.status = ItemStatus::Creating,
        UploadEvent::Done { product_id, .. } => {
            item.status = ItemStatus::Done;
            item.product_id = Some(*product_id);
        }
        UploadEvent::Failed { message, .. } => {
            item.status = ItemStatus::Error;
            item.error = Some(message.clone());
        }
    }
}

/// Aggregate result of a run.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub items: Vec<UploadItem>,
}

impl UploadReport {
    fn from_items(items: Vec<UploadItem>) -> Self {
        let succeeded = items
            .iter()
            .filter(|i| i.status == ItemStatus::Done)
            .count();
        let failed = items.len() - succeeded;

        Self {
            total: items.len(),
            succeeded,
            failed,
            items,
        }
    }
}

/// Errors that abort a run before any upload starts.
#[derive(Debug, Error)]
pub enum UploadError {
    /// More files than [`MAX_FILES`]; nothing is uploaded.
    #[error("at most {max} images per run (got {count})", max = MAX_FILES)]
    TooManyFiles {
        /// Number of files submitted.
        count: usize,
    },
}

/// The batched upload-then-insert pipeline.
pub struct BulkUploader {
    backend: AdminClient,
    storage: StorageClient,
}

impl BulkUploader {
    /// Create a new uploader.
    #[must_use]
    pub const fn new(backend: AdminClient, storage: StorageClient) -> Self {
        Self { backend, storage }
    }

    /// Run the pipeline to completion.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::TooManyFiles` before any network call when
    /// the selection exceeds the cap. Per-file failures never abort the
    /// run; they end as `error` records in the report.
    pub async fn run(
        &self,
        files: Vec<ImageFile>,
        mode: UploadMode,
    ) -> Result<UploadReport, UploadError> {
        self.run_with_observer(files, mode, None).await
    }

    /// Run the pipeline, mirroring every event to an observer channel.
    ///
    /// # Errors
    ///
    /// Same as [`Self::run`].
    #[instrument(skip(self, files, mode, observer), fields(count = files.len()))]
    pub async fn run_with_observer(
        &self,
        files: Vec<ImageFile>,
        mode: UploadMode,
        observer: Option<mpsc::Sender<UploadEvent>>,
    ) -> Result<UploadReport, UploadError> {
        if files.len() > MAX_FILES {
            return Err(UploadError::TooManyFiles { count: files.len() });
        }

        let run_millis = Utc::now().timestamp_millis();
        let (tx, mut rx) = mpsc::channel::<UploadEvent>(MAX_FILES.max(16));

        let mut items: Vec<UploadItem> = files
            .iter()
            .enumerate()
            .map(|(index, file)| UploadItem::new(temp_id(run_millis, index), file.file_name.clone()))
            .collect();

        // Driver: sequential batches, concurrent fan-out within each batch.
        // The channel sender is dropped when all batches complete, which
        // ends the collector loop.
        let driver = async move {
            for (batch_index, batch) in files.chunks(BATCH_SIZE).enumerate() {
                let base = batch_index * BATCH_SIZE;
                join_all(batch.iter().enumerate().map(|(offset, file)| {
                    self.process_file(run_millis, base + offset, file, &mode, tx.clone())
                }))
                .await;
            }
            drop(tx);
        };

        // Collector: folds events into the status records; mirrors them to
        // the observer when one is attached.
        let collector = async {
            while let Some(event) = rx.recv().await {
                if let Some(observer) = observer.as_ref() {
                    let _ = observer.send(event.clone()).await;
                }
                apply_event(&mut items, &event);
            }
        };

        tokio::join!(driver, collector);

        let report = UploadReport::from_items(items);
        tracing::info!(
            total = report.total,
            succeeded = report.succeeded,
            failed = report.failed,
            "Bulk upload complete"
        );
        Ok(report)
    }

    /// Upload one file and create its draft product.
    ///
    /// Both stages fail independently; whichever fails first ends the file
    /// with a generic error record. A succeeded upload whose insert fails
    /// is left behind as an orphaned object.
    async fn process_file(
        &self,
        run_millis: i64,
        index: usize,
        file: &ImageFile,
        mode: &UploadMode,
        tx: mpsc::Sender<UploadEvent>,
    ) {
        let temp_id = temp_id(run_millis, index);
        send(&tx, UploadEvent::Uploading {
            temp_id: temp_id.clone(),
        })
        .await;

        let key = storage_key(run_millis, index, &file.file_name);

        if let Err(e) = self
            .storage
            .upload(&key, file.bytes.clone(), &file.content_type)
            .await
        {
            tracing::error!(file = %file.file_name, error = %e, "Storage upload failed");
            send(&tx, UploadEvent::Failed {
                temp_id,
                message: GENERIC_FAILURE.to_string(),
            })
            .await;
            return;
        }

        let image_url = self.storage.public_url(&key);
        send(&tx, UploadEvent::Uploaded {
            temp_id: temp_id.clone(),
            image_url: image_url.clone(),
        })
        .await;
        send(&tx, UploadEvent::Creating {
            temp_id: temp_id.clone(),
        })
        .await;

        let draft = draft_product(&file.file_name, &image_url, run_millis, index, mode);

        match self.backend.insert_product(&draft).await {
            Ok(product) => {
                send(&tx, UploadEvent::Done {
                    temp_id,
                    product_id: product.id,
                })
                .await;
            }
            Err(e) => {
                tracing::error!(file = %file.file_name, error = %e, "Draft insert failed");
                send(&tx, UploadEvent::Failed {
                    temp_id,
                    message: GENERIC_FAILURE.to_string(),
                })
                .await;
            }
        }
    }
}

async fn send(tx: &mpsc::Sender<UploadEvent>, event: UploadEvent) {
    // A closed channel means the collector is gone; nothing useful to do.
    let _ = tx.send(event).await;
}

/// Per-file identifier for one run.
fn temp_id(run_millis: i64, index: usize) -> String {
    format!("temp-{index}-{run_millis}")
}

/// Storage key: run timestamp + sequence index + original extension.
fn storage_key(run_millis: i64, index: usize, file_name: &str) -> String {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .unwrap_or("img");
    format!("products/{run_millis}-{index}.{ext}")
}

/// Build the draft product record for an uploaded image.
fn draft_product(
    file_name: &str,
    image_url: &str,
    run_millis: i64,
    index: usize,
    mode: &UploadMode,
) -> NewProduct {
    let name = product_name_from_file(file_name);
    let slug = unique_slug(&name, run_millis, index);

    let (brand_id, category_id) = match mode {
        UploadMode::Manual => (None, None),
        UploadMode::Preset {
            brand_id,
            category_id,
        } => (*brand_id, *category_id),
    };

    NewProduct {
        name,
        slug,
        description: Some(DRAFT_DESCRIPTION.to_string()),
        price: Price::ZERO,
        original_price: None,
        image_url: Some(image_url.to_string()),
        status: ProductStatus::Draft,
        is_active: false,
        is_featured: false,
        is_bestseller: false,
        stock_quantity: 0,
        brand_id,
        category_id,
    }
}
