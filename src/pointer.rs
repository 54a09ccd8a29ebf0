//! Drag-to-recolor: while the primary button is held, pointer position picks
//! the sphere's color.
//!
//! Horizontal position drives red, vertical position drives green, and blue
//! stays fixed. Each move retargets a single color tween, so fast drags glide
//! instead of queueing up transitions.

use glam::Vec2;

use crate::animation::{Animator, Property, Value};
use crate::color::{Color, Rgb8};
use crate::viewport::Viewport;

/// Blue channel used for every drag color.
pub const DEFAULT_BLUE: u8 = 150;

/// Pointer press state and the last color it produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerDragState {
    pub is_down: bool,
    /// Only `Some` while dragging, after at least one move.
    pub last_color: Option<Rgb8>,
}

/// Map a pointer position to a drag color.
///
/// Coordinates outside the viewport (possible mid-drag when the window keeps
/// capturing the pointer) are clamped to the nearest edge.
pub fn color_for_pointer(position: Vec2, viewport: &Viewport, blue: u8) -> Rgb8 {
    let channel = |coord: f32, extent: u32| {
        let normalized = coord / extent as f32;
        (normalized * 255.0).round().clamp(0.0, 255.0) as u8
    };
    Rgb8::new(
        channel(position.x, viewport.width()),
        channel(position.y, viewport.height()),
        blue,
    )
}

/// Turns press/release/move events into color retarget requests.
#[derive(Clone, Debug)]
pub struct PointerColorDriver {
    state: PointerDragState,
    blue: u8,
    /// Tween duration in seconds; `None` uses the animator's default.
    duration: Option<f32>,
}

impl Default for PointerColorDriver {
    fn default() -> Self {
        Self::new(DEFAULT_BLUE, None)
    }
}

impl PointerColorDriver {
    pub fn new(blue: u8, duration: Option<f32>) -> Self {
        Self {
            state: PointerDragState::default(),
            blue,
            duration,
        }
    }

    pub fn state(&self) -> PointerDragState {
        self.state
    }

    pub fn press(&mut self) {
        self.state = PointerDragState {
            is_down: true,
            last_color: None,
        };
    }

    pub fn release(&mut self) {
        self.state = PointerDragState::default();
    }

    /// Handle a pointer move. While pressed, retargets the sphere color and
    /// returns the new target; otherwise does nothing.
    pub fn moved(
        &mut self,
        position: Vec2,
        viewport: &Viewport,
        animator: &mut impl Animator,
    ) -> Option<Rgb8> {
        if !self.state.is_down {
            return None;
        }

        let rgb = color_for_pointer(position, viewport, self.blue);
        self.state.last_color = Some(rgb);
        tracing::trace!(%rgb, x = position.x, y = position.y, "retargeting sphere color");

        animator.animate_to(
            Property::SphereColor,
            Value::Color(Color::from_srgb8(rgb)),
            self.duration,
        );
        Some(rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{PropertyTarget, TweenDefaults, TweenEngine};
    use crate::scene::Scene;

    /// Applies every request immediately to a scene.
    struct ImmediateAnimator {
        scene: Scene,
        requests: Vec<(Property, Value, Option<f32>)>,
    }

    impl ImmediateAnimator {
        fn new() -> Self {
            Self {
                scene: Scene::default(),
                requests: Vec::new(),
            }
        }
    }

    impl Animator for ImmediateAnimator {
        fn animate_to(&mut self, property: Property, to: Value, duration: Option<f32>) {
            self.requests.push((property, to, duration));
            self.scene.set(property, to);
        }
    }

    #[test]
    fn center_of_800_by_600_maps_to_128_128_150() {
        let viewport = Viewport::new(800, 600);
        let mut driver = PointerColorDriver::default();
        let mut animator = ImmediateAnimator::new();

        driver.press();
        let rgb = driver.moved(Vec2::new(400.0, 300.0), &viewport, &mut animator);

        assert_eq!(rgb, Some(Rgb8::new(128, 128, 150)));
        assert_eq!(driver.state().last_color, Some(Rgb8::new(128, 128, 150)));
        assert_eq!(
            animator.scene.sphere.material.color,
            Color::from_srgb8(Rgb8::new(128, 128, 150))
        );
    }

    #[test]
    fn moves_before_press_or_after_release_request_nothing() {
        let viewport = Viewport::new(800, 600);
        let mut driver = PointerColorDriver::default();
        let mut animator = ImmediateAnimator::new();

        assert_eq!(driver.moved(Vec2::new(10.0, 10.0), &viewport, &mut animator), None);

        driver.press();
        driver.moved(Vec2::new(20.0, 20.0), &viewport, &mut animator);
        driver.release();
        assert_eq!(driver.moved(Vec2::new(30.0, 30.0), &viewport, &mut animator), None);

        assert_eq!(animator.requests.len(), 1);
        assert_eq!(driver.state(), PointerDragState::default());
    }

    #[test]
    fn press_alone_records_no_color() {
        let mut driver = PointerColorDriver::default();
        driver.press();
        assert!(driver.state().is_down);
        assert_eq!(driver.state().last_color, None);
    }

    #[test]
    fn corners_map_to_channel_extremes() {
        let viewport = Viewport::new(1000, 500);
        assert_eq!(color_for_pointer(Vec2::ZERO, &viewport, 150), Rgb8::new(0, 0, 150));
        assert_eq!(
            color_for_pointer(Vec2::new(1000.0, 500.0), &viewport, 150),
            Rgb8::new(255, 255, 150)
        );
    }

    #[test]
    fn out_of_viewport_positions_are_clamped() {
        let viewport = Viewport::new(800, 600);
        assert_eq!(
            color_for_pointer(Vec2::new(-50.0, 900.0), &viewport, 150),
            Rgb8::new(0, 255, 150)
        );
    }

    #[test]
    fn each_move_retargets_the_same_color_tween() {
        let viewport = Viewport::new(800, 600);
        let mut driver = PointerColorDriver::default();
        let mut engine = TweenEngine::new(TweenDefaults::default());

        driver.press();
        driver.moved(Vec2::new(100.0, 100.0), &viewport, &mut engine);
        driver.moved(Vec2::new(700.0, 480.0), &viewport, &mut engine);

        assert_eq!(engine.active_count(), 1);
        assert!(engine.is_animating(Property::SphereColor));

        let mut scene = Scene::default();
        engine.tick(1.0, &mut scene);
        assert_eq!(
            scene.sphere.material.color.to_srgb8(),
            Rgb8::new(223, 204, 150)
        );
    }

    #[test]
    fn configured_duration_is_passed_through() {
        let viewport = Viewport::new(800, 600);
        let mut driver = PointerColorDriver::new(DEFAULT_BLUE, Some(2.0));
        let mut animator = ImmediateAnimator::new();

        driver.press();
        driver.moved(Vec2::new(1.0, 1.0), &viewport, &mut animator);

        assert_eq!(animator.requests[0].2, Some(2.0));
    }
}
