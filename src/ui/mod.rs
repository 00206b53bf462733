/// User interface building blocks
///
/// - Menu commands and keyboard shortcuts (menu.rs)
/// - Decoded images and the blank placeholder (picture.rs)
/// - Zoom / fit-to-window state of the image view (viewport.rs)

pub mod menu;
pub mod picture;
pub mod viewport;
