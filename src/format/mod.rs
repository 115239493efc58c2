//! Label file import/export.
//!
//! Shapes are stored one line each in a per-image text file with coordinates
//! normalized by the image size. The [`LabelLine`] trait is the seam between
//! shape types and the on-disk line format; [`LabelLayout`] decides where
//! files live under the save directory.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use detlab::format::{LabelLayout, write_label_file};
//! use detlab::model::LabelType;
//!
//! let layout = LabelLayout::new(save_dir);
//! layout.ensure_dirs(LabelType::Box)?;
//! let path = layout.label_path(LabelType::Box, "frame_0001.png");
//! let report = write_label_file(&path, &boxes, width, height)?;
//! ```

mod error;
mod label;
mod layout;
mod traits;

#[cfg(test)]
mod tests;

pub use error::FormatError;
pub use label::{decode_labels, encode_labels, read_label_file, write_label_file};
pub use layout::LabelLayout;
pub use traits::{LabelLine, WriteReport};
