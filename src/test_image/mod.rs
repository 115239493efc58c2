//! Test image and scratch directory generation.
//!
//! Tests write real image files so the loader, the label writer and the image
//! copy all go through the filesystem exactly as in a session.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

/// Create an empty scratch directory unique to this test process.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("detlab-{}-{}", name, std::process::id()));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).expect("failed to clear scratch dir");
    }
    std::fs::create_dir_all(&dir).expect("failed to create scratch dir");
    dir
}

/// Generate a gradient test pattern of the given size.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        Rgb([r, g, 128])
    })
}

/// Write a PNG test image into `dir` and return its path.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    gradient(width, height)
        .save(&path)
        .expect("failed to write test image");
    path
}

/// Write a class catalog file into `dir` and return its path.
pub fn write_catalog(dir: &Path) -> PathBuf {
    let path = dir.join("classes.txt");
    std::fs::write(&path, "# id,name\n0,normal\n1,scratch\n2,dent\n")
        .expect("failed to write catalog");
    path
}
