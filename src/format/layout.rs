//! Directory layout of saved datasets.
//!
//! ```text
//! <save_dir>/
//!   bounding/{img,label}/
//!   poly/{img,label}/
//! ```

use std::path::{Path, PathBuf};

use crate::format::error::FormatError;
use crate::model::LabelType;

const IMAGE_SUBDIR: &str = "img";
const LABEL_SUBDIR: &str = "label";

/// Resolves output paths under a save directory, keyed by label type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelLayout {
    root: PathBuf,
}

impl LabelLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<bounding|poly>/img`
    pub fn image_dir(&self, label_type: LabelType) -> PathBuf {
        self.root.join(label_type.folder()).join(IMAGE_SUBDIR)
    }

    /// `<root>/<bounding|poly>/label`
    pub fn label_dir(&self, label_type: LabelType) -> PathBuf {
        self.root.join(label_type.folder()).join(LABEL_SUBDIR)
    }

    /// Label file for an image: `label/<stem>.txt`.
    pub fn label_path(&self, label_type: LabelType, image_name: &str) -> PathBuf {
        let stem = Path::new(image_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(image_name);
        self.label_dir(label_type).join(format!("{}.txt", stem))
    }

    /// Destination of the image copy: `img/<image_name>`.
    pub fn image_copy_path(&self, label_type: LabelType, image_name: &str) -> PathBuf {
        self.image_dir(label_type).join(image_name)
    }

    /// Create the `img/` and `label/` directories for a label type if absent.
    pub fn ensure_dirs(&self, label_type: LabelType) -> Result<(), FormatError> {
        std::fs::create_dir_all(self.image_dir(label_type))?;
        std::fs::create_dir_all(self.label_dir(label_type))?;
        Ok(())
    }
}
