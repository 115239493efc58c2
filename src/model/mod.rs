//! Data models for the detlab editor.

mod category;
mod label_type;
mod shape;

pub use category::{Category, ClassCatalog, class_color};
pub use label_type::LabelType;
pub use shape::{BoundingBox, Point, Polygon, ResizeHandle};
