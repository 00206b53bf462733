/// Listing generator
///
/// Scans one directory for image files and writes the initial untagged
/// listing the tagger opens.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::state::data::Record;
use crate::state::table::{self, Delimiter, Layout, TableError};

/// Recognized image extensions, in the order rows are emitted
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// Default name of the generated listing
pub const LISTING_FILENAME: &str = "image_list.txt";

/// Prediction written for every generated row
pub const PLACEHOLDER_PREDICTION: &str = "P";

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("cannot read image directory {}: {source}", path.display())]
    Dir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("directory scan failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Write(#[from] TableError),
}

/// Find the images directly inside `dir`.
///
/// Files are grouped by extension in `IMAGE_EXTENSIONS` order and sorted
/// by name within each group. Hidden files and subdirectories are skipped.
pub fn scan_images(dir: &Path) -> Result<Vec<PathBuf>, ListingError> {
    let meta = fs::metadata(dir).map_err(|source| ListingError::Dir {
        path: dir.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(ListingError::Dir {
            path: dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Other, "not a directory"),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() > 0 => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        files.push(entry.into_path());
    }

    let mut images = Vec::new();
    for ext in IMAGE_EXTENSIONS {
        images.extend(
            files
                .iter()
                .filter(|path| path.extension().is_some_and(|e| e == ext))
                .cloned(),
        );
    }

    debug!("Found {} images in {}", images.len(), dir.display());
    Ok(images)
}

/// Synthetic score label for a row
pub fn score_label(index: usize) -> String {
    format!("example_{:03}", index)
}

/// One untagged record per image, in the given order.
///
/// Paths that are not valid UTF-8 cannot be written to the listing and
/// are skipped; row labels stay consecutive.
pub fn build_records(images: &[PathBuf]) -> Vec<Record> {
    images
        .iter()
        .filter_map(|path| match path.to_str() {
            Some(name) => Some(name),
            None => {
                warn!("Skipping non UTF-8 file name: {}", path.display());
                None
            }
        })
        .enumerate()
        .map(|(i, name)| Record::new(name, PLACEHOLDER_PREDICTION, score_label(i)))
        .collect()
}

/// Scan `dir` and write a 3-column TSV listing to `output`.
/// Returns the number of rows written.
pub fn generate(dir: &Path, output: &Path) -> Result<usize, ListingError> {
    let images = scan_images(dir)?;
    let records = build_records(&images);

    table::write_records(output, &records, Delimiter::Tab, Layout::Untagged)?;
    info!("Wrote {} rows to {}", records.len(), output.display());

    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::table::RecordTable;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_score_label_is_zero_padded() {
        assert_eq!(score_label(0), "example_000");
        assert_eq!(score_label(42), "example_042");
        assert_eq!(score_label(1234), "example_1234");
    }

    #[test]
    fn test_scan_groups_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.jpg", "a.jpg", "c.png", "d.gif", "e.jpeg", "f.bmp"] {
            touch(dir.path(), name);
        }

        let names: Vec<String> = scan_images(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, ["c.png", "a.jpg", "b.jpg", "e.jpeg", "f.bmp", "d.gif"]);
    }

    #[test]
    fn test_scan_skips_other_entries() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "upper.JPG");
        touch(dir.path(), ".hidden.png");
        touch(dir.path(), "keep.png");
        fs::create_dir(dir.path().join("nested.png")).unwrap();
        touch(&dir.path().join("nested.png"), "inner.png");

        let images = scan_images(dir.path()).unwrap();
        assert_eq!(images, vec![dir.path().join("keep.png")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.jpg");
        std::os::unix::fs::symlink(dir.path().join("gone.txt"), dir.path().join("notes.txt")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.png"), dir.path().join("b.png")).unwrap();

        let images = scan_images(dir.path()).unwrap();
        assert_eq!(images, vec![dir.path().join("a.jpg")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let images = vec![
            PathBuf::from("imgs/a.jpg"),
            PathBuf::from(OsStr::from_bytes(b"imgs/bad\xff.jpg")),
            PathBuf::from("imgs/c.jpg"),
        ];

        let records = build_records(&images);
        assert_eq!(
            records,
            vec![
                Record::new("imgs/a.jpg", "P", "example_000"),
                Record::new("imgs/c.jpg", "P", "example_001"),
            ]
        );
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_images(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, ListingError::Dir { .. }));
    }

    #[test]
    fn test_generate_writes_one_row_per_image() {
        let dir = tempfile::tempdir().unwrap();
        let imgs = dir.path().join("imgs");
        fs::create_dir(&imgs).unwrap();
        touch(&imgs, "a.jpg");
        touch(&imgs, "b.png");
        touch(&imgs, "c.jpg");

        let output = dir.path().join(LISTING_FILENAME);
        fs::write(&output, "stale contents\n").unwrap();

        assert_eq!(generate(&imgs, &output).unwrap(), 3);

        let expected = format!(
            "{b}\tP\texample_000\n{a}\tP\texample_001\n{c}\tP\texample_002\n",
            a = imgs.join("a.jpg").display(),
            b = imgs.join("b.png").display(),
            c = imgs.join("c.jpg").display(),
        );
        assert_eq!(fs::read_to_string(&output).unwrap(), expected);
    }

    #[test]
    fn test_generated_listing_loads_untagged() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "x.jpg");
        let output = dir.path().join(LISTING_FILENAME);
        generate(dir.path(), &output).unwrap();

        let table = RecordTable::load(&output).unwrap();
        let record = table.get(0).unwrap();
        assert_eq!(record.prediction, "P");
        assert_eq!(record.tag, None);
        assert_eq!(record.score, "example_000");
    }

    #[test]
    fn test_empty_directory_writes_empty_listing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.txt");
        let imgs = dir.path().join("imgs");
        fs::create_dir(&imgs).unwrap();

        assert_eq!(generate(&imgs, &output).unwrap(), 0);
        assert_eq!(fs::read_to_string(&output).unwrap(), "");
    }
}
