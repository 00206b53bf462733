//! Image Tagger
//!
//! Tag images listed in a headerless TSV/CSV file with a pass/fail main
//! tag and an optional free-text sub tag. The record table and the
//! tagging workflow live here so both binaries and the tests share them:
//!
//! - `image-tagger`: the desktop application (src/main.rs)
//! - `make-image-list`: writes the initial listing for a directory of images

pub mod listing;
pub mod logging;
pub mod state;
pub mod ui;
