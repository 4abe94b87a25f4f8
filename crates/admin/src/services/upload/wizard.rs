//! Bulk-upload wizard state machine.
//!
//! Steps: `mode → preset-select (preset mode only) → upload → progress`.
//! Backward navigation returns to the prior step without discarding
//! later-step data; only [`UploadWizard::reset`] clears everything.

use std::str::FromStr;

use super::{ImageFile, MAX_FILES, UploadMode};
use maison_core::{BrandId, CategoryId};
use thiserror::Error;

/// Sentinel the preset pickers send for an explicit "no brand/category".
pub const NONE_VALUE: &str = "__none__";

/// Wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Mode,
    PresetSelect,
    Upload,
    Progress,
}

/// The mode choice offered at the first step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Upload images first, tag each product individually later.
    Manual,
    /// Pick one brand/category first; every draft carries it.
    Preset,
}

/// A preset picker value: untouched, explicit none, or a chosen id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetChoice<T> {
    Unset,
    None,
    Chosen(T),
}

impl<T> Default for PresetChoice<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> PresetChoice<T> {
    /// Whether the picker was touched at all (explicit none counts).
    #[must_use]
    pub const fn is_set(&self) -> bool {
        !matches!(self, Self::Unset)
    }

    /// Collapse to the id to store; the none sentinel stores as absence.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Chosen(id) => Some(id),
            Self::Unset | Self::None => None,
        }
    }
}

impl<T: FromStr> PresetChoice<T> {
    /// Parse a picker value from a form field.
    ///
    /// Missing or empty means untouched; the [`NONE_VALUE`] sentinel means
    /// explicit none; anything else must parse as an id.
    ///
    /// # Errors
    ///
    /// Returns the unparseable raw value.
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        match raw {
            None | Some("") => Ok(Self::Unset),
            Some(NONE_VALUE) => Ok(Self::None),
            Some(value) => value
                .parse::<T>()
                .map(Self::Chosen)
                .map_err(|_| value.to_string()),
        }
    }
}

/// Everything the pipeline needs to start.
#[derive(Debug)]
pub struct UploadPlan {
    pub files: Vec<ImageFile>,
    pub mode: UploadMode,
}

/// Errors raised while driving the wizard.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    /// Step order violated.
    #[error("not available at this step")]
    WrongStep,

    /// Preset mode requires at least one picker to be set.
    #[error("choose a brand or category before continuing")]
    PresetRequired,

    /// An add would push the selection past the cap; nothing was added.
    #[error("you can upload a maximum of {} images at once", MAX_FILES)]
    TooManyFiles {
        /// Files already selected.
        selected: usize,
        /// Image files in the rejected add.
        attempted: usize,
    },

    /// Start requested with an empty selection.
    #[error("select at least one image")]
    NoFiles,
}

/// The bulk-upload wizard.
#[derive(Debug, Default)]
pub struct UploadWizard {
    step: Option<WizardStep>,
    kind: Option<UploadKind>,
    brand: PresetChoice<BrandId>,
    category: PresetChoice<CategoryId>,
    files: Vec<ImageFile>,
}

impl UploadWizard {
    /// A wizard at the mode-selection step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current step.
    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.step.unwrap_or(WizardStep::Mode)
    }

    /// Currently selected files.
    #[must_use]
    pub fn files(&self) -> &[ImageFile] {
        &self.files
    }

    /// Choose the upload type. Manual skips preset selection.
    pub fn select_mode(&mut self, kind: UploadKind) {
        self.kind = Some(kind);
        self.step = Some(match kind {
            UploadKind::Manual => WizardStep::Upload,
            UploadKind::Preset => WizardStep::PresetSelect,
        });
    }

    /// Record the preset picker values.
    pub fn set_preset(&mut self, brand: PresetChoice<BrandId>, category: PresetChoice<CategoryId>) {
        self.brand = brand;
        self.category = category;
    }

    /// Advance from preset selection to the upload step.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::PresetRequired` unless at least one picker
    /// was touched, `WizardError::WrongStep` off the preset step.
    pub fn proceed_to_upload(&mut self) -> Result<(), WizardError> {
        if self.step() != WizardStep::PresetSelect {
            return Err(WizardError::WrongStep);
        }
        if !self.brand.is_set() && !self.category.is_set() {
            return Err(WizardError::PresetRequired);
        }
        self.step = Some(WizardStep::Upload);
        Ok(())
    }

    /// Add files to the selection.
    ///
    /// Non-image files are dropped silently (mirroring the picker's
    /// `image/*` accept filter). If the remaining files would push the
    /// selection past [`MAX_FILES`], the entire add is rejected and the
    /// existing selection is left untouched.
    ///
    /// Returns the number of files added.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::TooManyFiles` when the cap would be exceeded.
    pub fn add_files(&mut self, candidates: Vec<ImageFile>) -> Result<usize, WizardError> {
        let mut images: Vec<ImageFile> = candidates.into_iter().filter(ImageFile::is_image).collect();

        if self.files.len() + images.len() > MAX_FILES {
            return Err(WizardError::TooManyFiles {
                selected: self.files.len(),
                attempted: images.len(),
            });
        }

        let added = images.len();
        self.files.append(&mut images);
        Ok(added)
    }

    /// Remove one file from the selection.
    pub fn remove_file(&mut self, index: usize) -> Option<ImageFile> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    /// Clear the selection, staying on the current step.
    pub fn clear_files(&mut self) {
        self.files.clear();
    }

    /// Go back one step. Later-step data (presets, files) is kept.
    pub fn back(&mut self) {
        self.step = Some(match self.step() {
            WizardStep::Mode | WizardStep::Progress => return,
            WizardStep::PresetSelect => WizardStep::Mode,
            WizardStep::Upload => match self.kind {
                Some(UploadKind::Preset) => WizardStep::PresetSelect,
                _ => WizardStep::Mode,
            },
        });
    }

    /// The effective tagging mode for the run.
    #[must_use]
    pub fn mode(&self) -> UploadMode {
        match self.kind {
            Some(UploadKind::Preset) => UploadMode::Preset {
                brand_id: self.brand.into_option(),
                category_id: self.category.into_option(),
            },
            _ => UploadMode::Manual,
        }
    }

    /// Hand the selection to the pipeline and advance to progress.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::NoFiles` for an empty selection,
    /// `WizardError::WrongStep` off the upload step.
    pub fn begin(&mut self) -> Result<UploadPlan, WizardError> {
        if self.step() != WizardStep::Upload {
            return Err(WizardError::WrongStep);
        }
        if self.files.is_empty() {
            return Err(WizardError::NoFiles);
        }

        self.step = Some(WizardStep::Progress);
        Ok(UploadPlan {
            files: std::mem::take(&mut self.files),
            mode: self.mode(),
        })
    }

    /// Full reset back to the mode step.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn image(name: &str) -> ImageFile {
        ImageFile {
            file_name: name.to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![0xFF, 0xD8],
        }
    }

    fn pdf(name: &str) -> ImageFile {
        ImageFile {
            file_name: name.to_string(),
            content_type: "application/pdf".to_string(),
            bytes: vec![0x25, 0x50],
        }
    }

    #[test]
    fn test_manual_mode_skips_preset_step() {
        let mut wizard = UploadWizard::new();
        assert_eq!(wizard.step(), WizardStep::Mode);

        wizard.select_mode(UploadKind::Manual);
        assert_eq!(wizard.step(), WizardStep::Upload);
        assert_eq!(wizard.mode(), UploadMode::Manual);
    }

    #[test]
    fn test_preset_mode_requires_a_choice() {
        let mut wizard = UploadWizard::new();
        wizard.select_mode(UploadKind::Preset);
        assert_eq!(wizard.step(), WizardStep::PresetSelect);

        assert_eq!(
            wizard.proceed_to_upload(),
            Err(WizardError::PresetRequired)
        );

        wizard.set_preset(PresetChoice::None, PresetChoice::Unset);
        wizard.proceed_to_upload().unwrap();
        assert_eq!(wizard.step(), WizardStep::Upload);
    }

    #[test]
    fn test_none_sentinel_stores_as_absence() {
        let brand = PresetChoice::<BrandId>::parse(Some(NONE_VALUE)).unwrap();
        assert!(brand.is_set());
        assert_eq!(brand.into_option(), None);
    }

    #[test]
    fn test_preset_choice_parsing() {
        assert_eq!(PresetChoice::<BrandId>::parse(None).unwrap(), PresetChoice::Unset);
        assert_eq!(
            PresetChoice::<BrandId>::parse(Some("")).unwrap(),
            PresetChoice::Unset
        );

        let id = BrandId::generate();
        let choice = PresetChoice::<BrandId>::parse(Some(&id.to_string())).unwrap();
        assert_eq!(choice, PresetChoice::Chosen(id));

        assert!(PresetChoice::<BrandId>::parse(Some("garbage")).is_err());
    }

    #[test]
    fn test_add_files_filters_non_images() {
        let mut wizard = UploadWizard::new();
        wizard.select_mode(UploadKind::Manual);

        let added = wizard
            .add_files(vec![image("a.jpg"), pdf("doc.pdf"), image("b.png")])
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(wizard.files().len(), 2);
    }

    #[test]
    fn test_add_past_cap_rejects_entirely() {
        let mut wizard = UploadWizard::new();
        wizard.select_mode(UploadKind::Manual);

        let first: Vec<ImageFile> = (0..98).map(|i| image(&format!("{i}.jpg"))).collect();
        wizard.add_files(first).unwrap();
        assert_eq!(wizard.files().len(), 98);

        // 98 + 3 > 100: nothing added, selection unchanged.
        let err = wizard
            .add_files(vec![image("x.jpg"), image("y.jpg"), image("z.jpg")])
            .unwrap_err();
        assert_eq!(
            err,
            WizardError::TooManyFiles {
                selected: 98,
                attempted: 3
            }
        );
        assert_eq!(wizard.files().len(), 98);

        // An add that exactly reaches the cap is fine.
        wizard.add_files(vec![image("x.jpg"), image("y.jpg")]).unwrap();
        assert_eq!(wizard.files().len(), 100);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut wizard = UploadWizard::new();
        wizard.select_mode(UploadKind::Manual);
        wizard.add_files(vec![image("a.jpg"), image("b.jpg")]).unwrap();

        let removed = wizard.remove_file(0).unwrap();
        assert_eq!(removed.file_name, "a.jpg");
        assert!(wizard.remove_file(5).is_none());

        wizard.clear_files();
        assert!(wizard.files().is_empty());
    }

    #[test]
    fn test_back_navigation_keeps_data() {
        let mut wizard = UploadWizard::new();
        wizard.select_mode(UploadKind::Preset);
        let brand = BrandId::generate();
        wizard.set_preset(PresetChoice::Chosen(brand), PresetChoice::Unset);
        wizard.proceed_to_upload().unwrap();
        wizard.add_files(vec![image("a.jpg")]).unwrap();

        wizard.back();
        assert_eq!(wizard.step(), WizardStep::PresetSelect);
        wizard.back();
        assert_eq!(wizard.step(), WizardStep::Mode);

        // Selection and presets survive backward navigation.
        assert_eq!(wizard.files().len(), 1);
        assert_eq!(
            wizard.mode(),
            UploadMode::Preset {
                brand_id: Some(brand),
                category_id: None
            }
        );
    }

    #[test]
    fn test_begin_requires_files_and_step() {
        let mut wizard = UploadWizard::new();
        assert_eq!(wizard.begin().unwrap_err(), WizardError::WrongStep);

        wizard.select_mode(UploadKind::Manual);
        assert_eq!(wizard.begin().unwrap_err(), WizardError::NoFiles);

        wizard.add_files(vec![image("a.jpg")]).unwrap();
        let plan = wizard.begin().unwrap();
        assert_eq!(plan.files.len(), 1);
        assert_eq!(plan.mode, UploadMode::Manual);
        assert_eq!(wizard.step(), WizardStep::Progress);
    }

    #[test]
    fn test_reset() {
        let mut wizard = UploadWizard::new();
        wizard.select_mode(UploadKind::Preset);
        wizard.set_preset(PresetChoice::Chosen(BrandId::generate()), PresetChoice::Unset);
        wizard.reset();

        assert_eq!(wizard.step(), WizardStep::Mode);
        assert_eq!(wizard.mode(), UploadMode::Manual);
        assert!(wizard.files().is_empty());
    }
}
