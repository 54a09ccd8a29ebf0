//! Viewport size tracking and the resize handler.
//!
//! [`Viewport`] is the single owner of the window dimensions. Everything that
//! depends on them (camera aspect, renderer output size, pointer coordinate
//! normalisation) reads from here, and only [`Viewport::on_resize`] writes.

use crate::camera::PerspectiveCamera;

/// Something that renders into a buffer sized to the viewport.
pub trait OutputSurface {
    /// Resize the output buffer. Only called with non-zero dimensions.
    fn set_size(&mut self, width: u32, height: u32);
}

/// Current viewport dimensions in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// Create a viewport from the initial window size.
    ///
    /// Zero dimensions are bumped to 1 so the aspect ratio is always defined.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// React to a new window size.
    ///
    /// In order: store the size, recompute the camera aspect and projection,
    /// resize the renderer output. A zero-area size (minimised window) is
    /// ignored and the previous size kept. Returns `true` if the update was
    /// applied.
    pub fn on_resize(
        &mut self,
        width: u32,
        height: u32,
        camera: &mut PerspectiveCamera,
        output: &mut impl OutputSurface,
    ) -> bool {
        if width == 0 || height == 0 {
            tracing::debug!(width, height, "ignoring zero-area resize");
            return false;
        }

        self.width = width;
        self.height = height;

        camera.set_aspect(self.aspect());
        camera.update_projection_matrix();

        output.set_size(width, height);

        tracing::debug!(width, height, aspect = self.aspect(), "viewport resized");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeOutput {
        size: Option<(u32, u32)>,
        calls: usize,
    }

    impl OutputSurface for FakeOutput {
        fn set_size(&mut self, width: u32, height: u32) {
            self.size = Some((width, height));
            self.calls += 1;
        }
    }

    #[test]
    fn resize_sets_exact_aspect_and_output_size() {
        let mut viewport = Viewport::new(800, 600);
        let mut camera = PerspectiveCamera::new(45.0, viewport.aspect(), 0.1, 100.0);
        let mut output = FakeOutput::default();

        for (w, h) in [(1920, 1080), (333, 777), (1, 4096)] {
            assert!(viewport.on_resize(w, h, &mut camera, &mut output));
            assert_eq!(camera.aspect(), w as f32 / h as f32);
            assert!(!camera.needs_projection_update());
            assert_eq!(output.size, Some((w, h)));
            assert_eq!((viewport.width(), viewport.height()), (w, h));
        }
    }

    #[test]
    fn resize_twice_with_same_size_is_idempotent() {
        let mut viewport = Viewport::new(800, 600);
        let mut camera = PerspectiveCamera::default();
        let mut output = FakeOutput::default();

        viewport.on_resize(1280, 720, &mut camera, &mut output);
        let once = (camera.aspect(), camera.projection_matrix(), output.size, viewport);

        viewport.on_resize(1280, 720, &mut camera, &mut output);
        let twice = (camera.aspect(), camera.projection_matrix(), output.size, viewport);

        assert_eq!(once, twice);
    }

    #[test]
    fn zero_area_resize_is_skipped() {
        let mut viewport = Viewport::new(800, 600);
        let mut camera = PerspectiveCamera::new(45.0, viewport.aspect(), 0.1, 100.0);
        let mut output = FakeOutput::default();

        assert!(!viewport.on_resize(1024, 0, &mut camera, &mut output));
        assert!(!viewport.on_resize(0, 0, &mut camera, &mut output));

        assert_eq!((viewport.width(), viewport.height()), (800, 600));
        assert_eq!(camera.aspect(), 800.0 / 600.0);
        assert_eq!(output.calls, 0);
    }

    #[test]
    fn new_never_has_zero_dimensions() {
        let viewport = Viewport::new(0, 0);
        assert_eq!((viewport.width(), viewport.height()), (1, 1));
        assert_eq!(viewport.aspect(), 1.0);
    }
}
