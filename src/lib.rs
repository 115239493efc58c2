//! detlab - detection label editor
//!
//! Core of an interactive editor for object-detection labels. Boxes and
//! polygons are painted with a brush, edited by dragging, and stored as
//! normalized text label files next to a copy of each image.
//!
//! The crate is headless: [`session::Session`] takes canvas events and
//! actions, and [`render::render_frame`] describes a frame as draw calls on
//! any [`render::Surface`].

pub mod config;
pub mod constants;
pub mod dataset;
pub mod editor;
pub mod format;
pub mod keybindings;
pub mod mask;
pub mod model;
pub mod render;
pub mod session;
pub mod view;

#[cfg(test)]
mod test_image;

pub use config::AppConfig;
pub use editor::{CanvasEvent, Editor};
pub use session::{Action, Session, SessionError};
