//! Image folders and display images.

use std::path::{Path, PathBuf};

use image::RgbImage;
use image::imageops::{self, FilterType};

use crate::constants::IMAGE_EXTENSIONS;
use crate::session::SessionError;

/// Check if a path has a supported image extension (case-insensitive).
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// The sorted list of images in one folder.
#[derive(Debug, Clone)]
pub struct ImageFolder {
    folder: PathBuf,
    images: Vec<PathBuf>,
}

impl ImageFolder {
    /// Discover image files in a folder, non-recursively, sorted by name.
    pub fn scan(folder: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let folder = folder.into();
        if !folder.is_dir() {
            return Err(SessionError::FolderNotFound(folder));
        }

        let mut images: Vec<PathBuf> = std::fs::read_dir(&folder)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_image_file(path))
            .collect();

        if images.is_empty() {
            return Err(SessionError::EmptyFolder(folder));
        }

        images.sort();
        log::info!("Found {} images in {:?}", images.len(), folder);

        Ok(Self { folder, images })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn path(&self, index: usize) -> Option<&Path> {
        self.images.get(index).map(PathBuf::as_path)
    }
}

/// An image decoded and fitted to the canvas for display.
///
/// Shapes are stored in this image's pixel space. Because labels are
/// normalized, they stay valid for the unscaled original too.
#[derive(Debug, Clone)]
pub struct DisplayImage {
    pub path: PathBuf,
    pub name: String,
    pub pixels: RgbImage,
}

impl DisplayImage {
    /// Decode an image file and shrink it to fit the canvas if needed.
    pub fn load(path: &Path, canvas_width: u32, canvas_height: u32) -> Result<Self, SessionError> {
        let decoded = image::open(path).map_err(|e| SessionError::image(path, e))?;
        let rgb = decoded.to_rgb8();
        let (orig_w, orig_h) = rgb.dimensions();

        let (w, h) = fit_to_canvas(orig_w, orig_h, canvas_width, canvas_height);
        let pixels = if (w, h) == (orig_w, orig_h) {
            rgb
        } else {
            log::debug!("Downscaling {}x{} -> {}x{}", orig_w, orig_h, w, h);
            imageops::resize(&rgb, w, h, FilterType::Triangle)
        };

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        log::info!("Loaded image {} ({}x{})", name, w, h);
        Ok(Self {
            path: path.to_path_buf(),
            name,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Display size of an image on a canvas: unchanged if it fits, otherwise
/// shrunk along the limiting axis with the aspect ratio kept.
pub fn fit_to_canvas(width: u32, height: u32, canvas_width: u32, canvas_height: u32) -> (u32, u32) {
    if width <= canvas_width && height <= canvas_height {
        return (width, height);
    }

    let image_aspect = width as f64 / height as f64;
    let canvas_aspect = canvas_width as f64 / canvas_height as f64;

    let (w, h) = if image_aspect > canvas_aspect {
        (canvas_width, (canvas_width as f64 / image_aspect) as u32)
    } else {
        ((canvas_height as f64 * image_aspect) as u32, canvas_height)
    };
    (w.max(1), h.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_image::{scratch_dir, write_png};

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("a.png")));
        assert!(is_image_file(Path::new("dir/B.JPG")));
        assert!(is_image_file(Path::new("c.Jpeg")));
        assert!(is_image_file(Path::new("d.bmp")));
        assert!(!is_image_file(Path::new("e.gif")));
        assert!(!is_image_file(Path::new("labels.txt")));
        assert!(!is_image_file(Path::new("png")));
    }

    #[test]
    fn test_fit_to_canvas() {
        assert_eq!(fit_to_canvas(200, 100, 800, 600), (200, 100));
        assert_eq!(fit_to_canvas(800, 600, 800, 600), (800, 600));
        // Wider than the canvas
        assert_eq!(fit_to_canvas(1600, 400, 800, 600), (800, 200));
        // Taller than the canvas
        assert_eq!(fit_to_canvas(600, 1200, 800, 600), (300, 600));
        assert_eq!(fit_to_canvas(10_000, 1, 800, 600), (800, 1));
    }

    #[test]
    fn test_scan_sorted_and_filtered() {
        let dir = scratch_dir("scan");
        write_png(&dir, "b.png", 4, 4);
        write_png(&dir, "a.png", 4, 4);
        std::fs::write(dir.join("notes.txt"), "x").unwrap();
        std::fs::create_dir(dir.join("sub.png")).unwrap();

        let folder = ImageFolder::scan(&dir).unwrap();
        assert_eq!(folder.len(), 2);
        assert_eq!(folder.path(0), Some(dir.join("a.png").as_path()));
        assert_eq!(folder.path(1), Some(dir.join("b.png").as_path()));
        assert_eq!(folder.path(2), None);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_scan_errors() {
        let dir = scratch_dir("scan-empty");
        assert!(matches!(
            ImageFolder::scan(&dir),
            Err(SessionError::EmptyFolder(_))
        ));
        assert!(matches!(
            ImageFolder::scan(dir.join("missing")),
            Err(SessionError::FolderNotFound(_))
        ));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_downscales_large_image() {
        let dir = scratch_dir("display");
        let path = write_png(&dir, "big.png", 400, 100);

        let image = DisplayImage::load(&path, 200, 200).unwrap();
        assert_eq!((image.width(), image.height()), (200, 50));
        assert_eq!(image.name, "big.png");

        let image = DisplayImage::load(&path, 800, 600).unwrap();
        assert_eq!((image.width(), image.height()), (400, 100));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_corrupt_image_fails() {
        let dir = scratch_dir("corrupt");
        let path = dir.join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();

        assert!(matches!(
            DisplayImage::load(&path, 800, 600),
            Err(SessionError::Image { .. })
        ));
        std::fs::remove_dir_all(&dir).ok();
    }
}
