use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use winit::event::MouseButton;

use crate::camera::PerspectiveCamera;
use crate::input::Input;
use crate::viewport::Viewport;

/// Keeps the polar angle off the poles, where `look_at` degenerates.
const POLE_EPSILON: f32 = 1e-6;

/// Radius/azimuth/polar coordinates of the camera relative to its target.
///
/// `theta` is measured around +Y starting from +Z, `phi` down from +Y.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Spherical {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

/// An orbit camera controller with damping and auto-rotation.
///
/// The controller owns the camera it drives. Input handlers only accumulate
/// pending rotation, dolly and pan; [`OrbitControls::update`] applies them
/// once per frame. With damping enabled a fraction of the pending motion is
/// applied each frame and the rest decays, so a drag keeps gliding after the
/// pointer stops.
///
/// # Example
/// ```ignore
/// let mut controls = OrbitControls::new(camera);
/// controls.enable_damping = true;
/// controls.auto_rotate = true;
///
/// // Each frame, before drawing:
/// controls.apply_input(&input, &viewport);
/// controls.update(dt);
/// renderer.render(&scene, controls.camera());
/// ```
#[derive(Clone, Debug)]
pub struct OrbitControls {
    camera: PerspectiveCamera,
    /// Point the camera orbits around.
    pub target: Vec3,

    pub enable_damping: bool,
    /// Fraction of pending motion applied per update when damping.
    pub damping_factor: f32,

    pub enable_rotate: bool,
    pub rotate_speed: f32,
    pub enable_zoom: bool,
    pub zoom_speed: f32,
    pub enable_pan: bool,
    pub pan_speed: f32,

    pub auto_rotate: bool,
    /// 1.0 is one full orbit per minute.
    pub auto_rotate_speed: f32,

    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    spherical_delta: Spherical,
    scale: f32,
    pan_offset: Vec3,
    dragging: bool,
}

impl OrbitControls {
    /// Wrap a camera, orbiting around the point it currently looks at.
    pub fn new(camera: PerspectiveCamera) -> Self {
        let target = camera.target;
        Self {
            camera,
            target,
            enable_damping: false,
            damping_factor: 0.05,
            enable_rotate: true,
            rotate_speed: 1.0,
            enable_zoom: true,
            zoom_speed: 1.0,
            enable_pan: true,
            pan_speed: 1.0,
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            spherical_delta: Spherical::default(),
            scale: 1.0,
            pan_offset: Vec3::ZERO,
            dragging: false,
        }
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera
    }

    /// Current distance from camera to target.
    pub fn distance(&self) -> f32 {
        (self.camera.position - self.target).length()
    }

    /// Current azimuth of the camera around the target, in radians.
    pub fn azimuth(&self) -> f32 {
        Spherical::from_offset(self.camera.position - self.target).theta
    }

    /// Current polar angle of the camera (0 = straight above), in radians.
    pub fn polar_angle(&self) -> f32 {
        Spherical::from_offset(self.camera.position - self.target).phi
    }

    /// Whether a rotate drag is in progress. Auto-rotation pauses while true.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging && self.enable_rotate;
    }

    /// Accumulate this frame's mouse input.
    ///
    /// Left drag rotates, right drag pans, the wheel dollies. Disabled
    /// interactions are ignored.
    pub fn apply_input(&mut self, input: &Input, viewport: &Viewport) {
        self.set_dragging(input.mouse_down(MouseButton::Left));

        let delta = input.mouse_delta();
        if self.dragging {
            self.on_rotate_drag(delta, viewport.height());
        } else if input.mouse_down(MouseButton::Right) {
            self.on_pan_drag(delta, viewport.height());
        }

        let scroll = input.scroll_delta();
        if scroll.y != 0.0 {
            self.on_scroll(scroll.y);
        }
    }

    /// Rotate by a pointer drag of `delta` pixels. A drag across the full
    /// viewport height is one full turn.
    pub fn on_rotate_drag(&mut self, delta: Vec2, viewport_height: u32) {
        if !self.enable_rotate || viewport_height == 0 {
            return;
        }
        let height = viewport_height as f32;
        self.rotate_left(TAU * delta.x / height * self.rotate_speed);
        self.rotate_up(TAU * delta.y / height * self.rotate_speed);
    }

    /// Dolly by `lines` wheel steps; positive moves the camera closer.
    pub fn on_scroll(&mut self, lines: f32) {
        if !self.enable_zoom || lines == 0.0 {
            return;
        }
        let step = 0.95f32.powf(self.zoom_speed).powf(lines.abs());
        if lines > 0.0 {
            self.scale *= step;
        } else {
            self.scale /= step;
        }
    }

    /// Pan the target in screen space by a pointer drag of `delta` pixels.
    pub fn on_pan_drag(&mut self, delta: Vec2, viewport_height: u32) {
        if !self.enable_pan || viewport_height == 0 {
            return;
        }
        // Scale so the point under the cursor at target depth follows it.
        let half_fov = (self.camera.fov() * 0.5).to_radians();
        let target_distance = self.distance() * half_fov.tan();
        let height = viewport_height as f32;
        let units_per_pixel = 2.0 * target_distance / height * self.pan_speed;

        let forward = self.camera.forward();
        let right = forward.cross(self.camera.up).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();

        self.pan_offset += -right * delta.x * units_per_pixel + up * delta.y * units_per_pixel;
    }

    fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    /// Advance the controller by `dt` seconds and move the camera.
    pub fn update(&mut self, dt: f32) {
        let mut spherical = Spherical::from_offset(self.camera.position - self.target);

        if self.auto_rotate && !self.dragging {
            self.rotate_left(TAU / 60.0 * self.auto_rotate_speed * dt);
        }

        if self.enable_damping {
            spherical.theta += self.spherical_delta.theta * self.damping_factor;
            spherical.phi += self.spherical_delta.phi * self.damping_factor;
        } else {
            spherical.theta += self.spherical_delta.theta;
            spherical.phi += self.spherical_delta.phi;
        }

        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(POLE_EPSILON, PI - POLE_EPSILON);
        spherical.radius =
            (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        if self.enable_damping {
            self.target += self.pan_offset * self.damping_factor;
        } else {
            self.target += self.pan_offset;
        }

        self.camera.position = self.target + spherical.to_offset();
        self.camera.target = self.target;

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.spherical_delta.theta *= decay;
            self.spherical_delta.phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.spherical_delta = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> OrbitControls {
        let camera = PerspectiveCamera::default()
            .at(Vec3::new(0.0, 0.0, 20.0))
            .looking_at(Vec3::ZERO);
        OrbitControls::new(camera)
    }

    #[test]
    fn spherical_round_trips_offset() {
        let offset = Vec3::new(3.0, -4.0, 12.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert!((back - offset).length() < 1e-4);
    }

    #[test]
    fn auto_rotate_turns_at_speed_per_minute() {
        let mut controls = controls();
        controls.auto_rotate = true;
        controls.auto_rotate_speed = 5.0;

        controls.update(1.0);

        // 5 orbits per minute is 30 degrees per second, clockwise from above.
        let expected = Vec3::new(-10.0, 0.0, 20.0 * (PI / 6.0).cos());
        assert!((controls.camera().position - expected).length() < 1e-3);
        assert!((controls.distance() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn auto_rotate_pauses_while_dragging() {
        let mut controls = controls();
        controls.auto_rotate = true;
        controls.set_dragging(true);

        controls.update(1.0);

        assert!((controls.camera().position - Vec3::new(0.0, 0.0, 20.0)).length() < 1e-4);
    }

    #[test]
    fn damping_spreads_a_drag_over_several_frames() {
        let mut controls = controls();
        controls.enable_damping = true;
        controls.damping_factor = 0.25;

        controls.on_rotate_drag(Vec2::new(-60.0, 0.0), 600);
        let full_turn = TAU * 60.0 / 600.0;

        controls.update(1.0 / 60.0);
        let first = controls.azimuth();
        assert!((first - full_turn * 0.25).abs() < 1e-4);

        for _ in 0..200 {
            controls.update(1.0 / 60.0);
        }
        assert!((controls.azimuth() - full_turn).abs() < 1e-3);
    }

    #[test]
    fn without_damping_a_drag_applies_at_once() {
        let mut controls = controls();
        controls.on_rotate_drag(Vec2::new(-60.0, 0.0), 600);
        controls.update(1.0 / 60.0);
        let after_one = controls.azimuth();

        controls.update(1.0 / 60.0);
        assert!((after_one - TAU * 0.1).abs() < 1e-4);
        assert!((controls.azimuth() - after_one).abs() < 1e-5);
    }

    #[test]
    fn disabled_zoom_and_pan_leave_distance_and_target() {
        let mut controls = controls();
        controls.enable_zoom = false;
        controls.enable_pan = false;

        controls.on_scroll(3.0);
        controls.on_pan_drag(Vec2::new(100.0, 50.0), 600);
        controls.update(1.0 / 60.0);

        assert!((controls.distance() - 20.0).abs() < 1e-4);
        assert_eq!(controls.target, Vec3::ZERO);
    }

    #[test]
    fn scroll_up_dollies_in_when_enabled() {
        let mut controls = controls();
        controls.on_scroll(1.0);
        controls.update(1.0 / 60.0);
        assert!((controls.distance() - 19.0).abs() < 1e-3);
    }

    #[test]
    fn pan_moves_target_when_enabled() {
        let mut controls = controls();
        controls.on_pan_drag(Vec2::new(-100.0, 0.0), 600);
        controls.update(1.0 / 60.0);
        assert!(controls.target.x > 0.0);
        assert!(((controls.camera().position - controls.target).length() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn polar_angle_stays_off_the_poles() {
        let mut controls = controls();
        controls.on_rotate_drag(Vec2::new(0.0, 10_000.0), 600);
        controls.update(1.0 / 60.0);

        let phi = controls.polar_angle();
        assert!(phi < 1e-3);
        assert!(controls.camera().position.is_finite());
    }
}
