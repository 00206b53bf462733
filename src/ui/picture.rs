use image::{ImageError, ImageFormat, ImageReader, Rgba, RgbaImage};
use iced::widget::image::Handle;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Side length of the blank placeholder shown when nothing is selected
const PLACEHOLDER_SIZE: u32 = 500;

#[derive(Debug, Error)]
pub enum PictureError {
    #[error("cannot load {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot write {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// A decoded image ready for display
#[derive(Debug, Clone)]
pub struct Picture {
    /// Source file; None for the placeholder
    source: Option<PathBuf>,
    pixels: RgbaImage,
    handle: Handle,
}

impl Picture {
    /// Decode an image file. The format is detected from the file
    /// contents, so a misnamed file still loads.
    pub fn open(path: &Path) -> Result<Self, PictureError> {
        let decode_error = |source: ImageError| PictureError::Decode {
            path: path.to_path_buf(),
            source,
        };

        let pixels = ImageReader::open(path)
            .and_then(ImageReader::with_guessed_format)
            .map_err(|e| decode_error(ImageError::IoError(e)))?
            .decode()
            .map_err(decode_error)?
            .to_rgba8();

        Ok(Self::from_pixels(Some(path.to_path_buf()), pixels))
    }

    /// Blank image used when no row is selected
    pub fn placeholder() -> Self {
        let pixels = RgbaImage::from_pixel(
            PLACEHOLDER_SIZE,
            PLACEHOLDER_SIZE,
            Rgba([255, 255, 255, 255]),
        );
        Self::from_pixels(None, pixels)
    }

    fn from_pixels(source: Option<PathBuf>, pixels: RgbaImage) -> Self {
        let handle = Handle::from_rgba(pixels.width(), pixels.height(), pixels.as_raw().clone());
        Self {
            source,
            pixels,
            handle,
        }
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Suggested file name when printing: the source name with a png extension
    pub fn print_file_name(&self) -> String {
        self.source
            .as_deref()
            .and_then(Path::file_stem)
            .map(|stem| format!("{}.png", stem.to_string_lossy()))
            .unwrap_or_else(|| "print.png".to_string())
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// "Print" the image by rendering it to a PNG file
    pub fn print_to(&self, path: &Path) -> Result<(), PictureError> {
        self.pixels
            .save_with_format(path, ImageFormat::Png)
            .map_err(|source| PictureError::Save {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_placeholder_is_blank() {
        let picture = Picture::placeholder();
        assert_eq!(picture.source(), None);
        assert_eq!(picture.print_file_name(), "print.png");
        assert_eq!(picture.dimensions(), (500, 500));
    }

    #[test]
    fn test_open_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let picture = Picture::open(&path).unwrap();
        assert_eq!(picture.dimensions(), (3, 2));
        assert_eq!(picture.source(), Some(path.as_path()));
    }

    #[test]
    fn test_png_with_jpg_extension_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("real.png");
        RgbaImage::from_pixel(2, 2, Rgba([200, 0, 0, 255]))
            .save(&png)
            .unwrap();
        let misnamed = dir.path().join("real.jpg");
        fs::rename(&png, &misnamed).unwrap();

        let picture = Picture::open(&misnamed).unwrap();
        assert_eq!(picture.dimensions(), (2, 2));
        assert_eq!(picture.print_file_name(), "real.png");
    }

    #[test]
    fn test_garbage_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        fs::write(&path, b"definitely not a jpeg").unwrap();

        assert!(matches!(Picture::open(&path), Err(PictureError::Decode { .. })));
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Picture::open(&dir.path().join("gone.png")),
            Err(PictureError::Decode { .. })
        ));
    }

    #[test]
    fn test_print_to_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("printed.png");

        Picture::placeholder().print_to(&out).unwrap();

        let reread = image::open(&out).unwrap();
        assert_eq!(reread.width(), 500);
    }
}
