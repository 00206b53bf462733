/// Zoom and fit state of the image view
///
/// Keeps the scale factor and decides which view actions are currently
/// available; the view code reads it to size the image widget.

/// Factor applied by one zoom-in step
pub const ZOOM_IN_FACTOR: f32 = 1.25;
/// Factor applied by one zoom-out step
pub const ZOOM_OUT_FACTOR: f32 = 0.8;
/// Zoom-in is disabled once the scale reaches this
pub const MAX_SCALE: f32 = 3.0;
/// Zoom-out is disabled once the scale drops to this
pub const MIN_SCALE: f32 = 0.333;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Zoom level (1.0 = 100%)
    pub scale: f32,
    /// Scale the image to the available space instead of using `scale`
    pub fit_to_window: bool,
    /// Whether a real image (not the placeholder) is displayed
    pub has_image: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            fit_to_window: false,
            has_image: false,
        }
    }
}

impl Viewport {
    pub fn new(fit_to_window: bool) -> Self {
        Self {
            fit_to_window,
            ..Self::default()
        }
    }

    /// A new image was displayed
    pub fn image_shown(&mut self) {
        self.scale = 1.0;
        self.has_image = true;
    }

    /// The view was reset to the placeholder
    pub fn cleared(&mut self) {
        self.scale = 1.0;
        self.has_image = false;
    }

    pub fn zoom_in(&mut self) {
        if self.can_zoom_in() {
            self.scale *= ZOOM_IN_FACTOR;
        }
    }

    pub fn zoom_out(&mut self) {
        if self.can_zoom_out() {
            self.scale *= ZOOM_OUT_FACTOR;
        }
    }

    pub fn normal_size(&mut self) {
        if self.can_resize() {
            self.scale = 1.0;
        }
    }

    pub fn toggle_fit_to_window(&mut self) {
        if !self.has_image {
            return;
        }
        self.fit_to_window = !self.fit_to_window;
        if !self.fit_to_window {
            self.scale = 1.0;
        }
    }

    /// Zoom and normal size only apply to an unfitted real image
    fn can_resize(&self) -> bool {
        self.has_image && !self.fit_to_window
    }

    pub fn can_zoom_in(&self) -> bool {
        self.can_resize() && self.scale < MAX_SCALE
    }

    pub fn can_zoom_out(&self) -> bool {
        self.can_resize() && self.scale > MIN_SCALE
    }

    pub fn can_normal_size(&self) -> bool {
        self.can_resize()
    }

    pub fn can_fit(&self) -> bool {
        self.has_image
    }

    pub fn can_print(&self) -> bool {
        self.has_image
    }

    /// Display size of an image with the given pixel dimensions
    pub fn scaled_size(&self, width: u32, height: u32) -> (f32, f32) {
        (width as f32 * self.scale, height as f32 * self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn showing() -> Viewport {
        let mut viewport = Viewport::default();
        viewport.image_shown();
        viewport
    }

    #[test]
    fn test_nothing_enabled_without_image() {
        let viewport = Viewport::default();
        assert!(!viewport.can_zoom_in());
        assert!(!viewport.can_zoom_out());
        assert!(!viewport.can_fit());
        assert!(!viewport.can_print());
    }

    #[test]
    fn test_zoom_in_stops_at_max() {
        let mut viewport = showing();
        let mut steps = 0;
        while viewport.can_zoom_in() {
            viewport.zoom_in();
            steps += 1;
        }
        // 1.25^5 = 3.05
        assert_eq!(steps, 5);
        assert!(viewport.scale >= MAX_SCALE);

        let before = viewport.scale;
        viewport.zoom_in();
        assert_eq!(viewport.scale, before);
        assert!(viewport.can_zoom_out());
    }

    #[test]
    fn test_zoom_out_stops_at_min() {
        let mut viewport = showing();
        while viewport.can_zoom_out() {
            viewport.zoom_out();
        }
        assert!(viewport.scale <= MIN_SCALE);
        assert!(viewport.scale > 0.2);
    }

    #[test]
    fn test_fit_disables_zoom_and_unfit_restores_normal_size() {
        let mut viewport = showing();
        viewport.zoom_in();
        viewport.toggle_fit_to_window();

        assert!(viewport.fit_to_window);
        assert!(!viewport.can_zoom_in());
        assert!(!viewport.can_normal_size());

        viewport.toggle_fit_to_window();
        assert_eq!(viewport.scale, 1.0);
        assert!(viewport.can_zoom_in());
    }

    #[test]
    fn test_new_image_resets_scale() {
        let mut viewport = showing();
        viewport.zoom_out();
        viewport.image_shown();
        assert_eq!(viewport.scale, 1.0);
    }

    #[test]
    fn test_scaled_size() {
        let mut viewport = showing();
        viewport.zoom_in();
        assert_eq!(viewport.scaled_size(400, 200), (500.0, 250.0));
    }
}
