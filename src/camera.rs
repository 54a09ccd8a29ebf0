use glam::{Mat4, Vec3};

/// A perspective camera with a cached projection matrix.
///
/// Changing any projection parameter (aspect, fov, clip planes) only marks the
/// projection as stale; call [`update_projection_matrix`] to recompute it.
/// The view is defined by `position` looking at `target`.
///
/// [`update_projection_matrix`]: PerspectiveCamera::update_projection_matrix
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
    projection: Mat4,
    projection_dirty: bool,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(45.0, 1.0, 0.1, 100.0)
    }
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: fov_degrees,
            aspect,
            near,
            far,
            projection: Mat4::IDENTITY,
            projection_dirty: true,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn set_fov(&mut self, fov_degrees: f32) {
        self.fov = fov_degrees;
        self.projection_dirty = true;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.projection_dirty = true;
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
        self.projection_dirty = true;
    }

    /// True when a projection parameter changed since the last recompute.
    pub fn needs_projection_update(&self) -> bool {
        self.projection_dirty
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
        self.projection_dirty = false;
    }

    /// The last computed projection matrix (wgpu clip space, depth 0..1).
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    /// Unit vector from the camera towards its target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_change_marks_projection_dirty_until_updated() {
        let mut camera = PerspectiveCamera::default();
        assert!(!camera.needs_projection_update());

        camera.set_aspect(2.0);
        assert!(camera.needs_projection_update());
        let stale = camera.projection_matrix();

        camera.update_projection_matrix();
        assert!(!camera.needs_projection_update());
        assert_ne!(stale, camera.projection_matrix());
    }

    #[test]
    fn projection_matches_glam_perspective() {
        let camera = PerspectiveCamera::new(45.0, 800.0 / 600.0, 0.1, 100.0);
        let expected = Mat4::perspective_rh(45f32.to_radians(), 800.0 / 600.0, 0.1, 100.0);
        assert_eq!(camera.projection_matrix(), expected);
    }

    #[test]
    fn forward_points_at_target() {
        let camera = PerspectiveCamera::default()
            .at(Vec3::new(0.0, 0.0, 20.0))
            .looking_at(Vec3::ZERO);
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-6);
    }
}
