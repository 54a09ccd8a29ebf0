//! Window settings and the TOML-loadable scene configuration.
//!
//! Every section uses `#[serde(default)]`, so a file that only overrides
//! `[controls]` (or nothing at all) still yields a complete configuration:
//!
//! ```toml
//! [controls]
//! auto_rotate_speed = 2.0
//!
//! [sphere]
//! color = "#ff3366"
//! ```

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::animation::{Easing, TweenDefaults};
use crate::camera::PerspectiveCamera;
use crate::color::Color;
use crate::error::{Error, Result};
use crate::mesh::Transform;
use crate::orbit_controls::OrbitControls;
use crate::scene::{NavBar, PointLight, Scene, Sphere, StandardMaterial, Title};

/// Window creation settings.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Orbit Sphere".to_string(),
            width: 800,
            height: 600,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Everything tweakable about the demo.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub sphere: SphereConfig,
    pub light: LightConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub timeline: TimelineConfig,
    pub pointer: PointerConfig,
    pub overlay: OverlayConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        let app = AppConfig::default();
        Self {
            title: app.title,
            width: app.width,
            height: app.height,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub color: Color,
    pub roughness: f32,
}

impl Default for SphereConfig {
    fn default() -> Self {
        let sphere = Scene::default().sphere;
        Self {
            radius: sphere.radius,
            width_segments: sphere.width_segments,
            height_segments: sphere.height_segments,
            color: sphere.material.color,
            roughness: sphere.material.roughness,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub color: Color,
    pub intensity: f32,
    /// 0 disables the range cutoff.
    pub distance: f32,
    pub decay: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        let light = Scene::default().light;
        Self {
            position: light.position.to_array(),
            color: light.color,
            intensity: light.intensity,
            distance: light.distance,
            decay: light.decay,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 45.0,
            near: 0.1,
            far: 100.0,
            position: [0.0, 0.0, 20.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_rotate: bool,
    pub rotate_speed: f32,
    pub enable_zoom: bool,
    pub zoom_speed: f32,
    pub enable_pan: bool,
    pub pan_speed: f32,
    pub auto_rotate: bool,
    /// 1.0 is one orbit per minute.
    pub auto_rotate_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            enable_rotate: true,
            rotate_speed: 1.0,
            enable_zoom: false,
            zoom_speed: 1.0,
            enable_pan: false,
            pan_speed: 1.0,
            auto_rotate: true,
            auto_rotate_speed: 5.0,
        }
    }
}

/// Step defaults for the entrance timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Seconds per step.
    pub duration: f32,
    pub easing: Easing,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            duration: 1.0,
            easing: Easing::EaseOut,
        }
    }
}

/// Drag-to-recolor settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Fixed blue channel of every drag color.
    pub blue: u8,
    /// Color tween duration in seconds.
    pub duration: f32,
    pub easing: Easing,
}

impl Default for PointerConfig {
    fn default() -> Self {
        let tween = TweenDefaults::default();
        Self {
            blue: crate::pointer::DEFAULT_BLUE,
            duration: tween.duration,
            easing: tween.easing,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub show_nav: bool,
    pub nav_height: f32,
    pub nav_color: Color,
    pub nav_opacity: f32,
    pub show_title: bool,
    pub title: String,
    pub title_size: f32,
    pub title_color: Color,
    /// TTF/OTF file for the title. System fonts are searched when unset.
    pub font: Option<PathBuf>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            show_nav: true,
            nav_height: 64.0,
            nav_color: Color::rgb(0.02, 0.02, 0.03),
            nav_opacity: 0.6,
            show_title: true,
            title: "Give it a spin".to_string(),
            title_size: 48.0,
            title_color: Color::WHITE,
            font: None,
        }
    }
}

impl SceneConfig {
    /// Load a configuration from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let config = Self::load(path)?;
                tracing::info!(path = %path.display(), "loaded configuration");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn app_config(&self) -> AppConfig {
        AppConfig::new()
            .title(self.window.title.clone())
            .size(self.window.width, self.window.height)
    }

    /// The initial stage. Overlay elements that are switched off are absent.
    pub fn scene(&self) -> Scene {
        let overlay = &self.overlay;
        Scene {
            background: Color::BLACK,
            sphere: Sphere {
                radius: self.sphere.radius,
                width_segments: self.sphere.width_segments,
                height_segments: self.sphere.height_segments,
                transform: Transform::default(),
                material: StandardMaterial {
                    color: self.sphere.color,
                    roughness: self.sphere.roughness,
                },
            },
            light: PointLight {
                position: Vec3::from_array(self.light.position),
                color: self.light.color,
                intensity: self.light.intensity,
                distance: self.light.distance,
                decay: self.light.decay,
            },
            nav: overlay.show_nav.then(|| NavBar {
                height: overlay.nav_height,
                offset: 0.0,
                color: overlay.nav_color.with_alpha(overlay.nav_opacity),
            }),
            title: overlay.show_title.then(|| Title {
                text: overlay.title.clone(),
                size: overlay.title_size,
                color: overlay.title_color,
                opacity: 1.0,
            }),
        }
    }

    /// The camera, wrapped in orbit controls, for a viewport of `aspect`.
    pub fn controls(&self, aspect: f32) -> OrbitControls {
        let camera = PerspectiveCamera::new(self.camera.fov, aspect, self.camera.near, self.camera.far)
            .at(Vec3::from_array(self.camera.position))
            .looking_at(Vec3::from_array(self.camera.target));

        let c = &self.controls;
        let mut controls = OrbitControls::new(camera);
        controls.enable_damping = c.enable_damping;
        controls.damping_factor = c.damping_factor;
        controls.enable_rotate = c.enable_rotate;
        controls.rotate_speed = c.rotate_speed;
        controls.enable_zoom = c.enable_zoom;
        controls.zoom_speed = c.zoom_speed;
        controls.enable_pan = c.enable_pan;
        controls.pan_speed = c.pan_speed;
        controls.auto_rotate = c.auto_rotate;
        controls.auto_rotate_speed = c.auto_rotate_speed;
        controls
    }

    pub fn timeline_defaults(&self) -> TweenDefaults {
        TweenDefaults {
            duration: self.timeline.duration,
            easing: self.timeline.easing,
        }
    }

    /// Defaults for `animate_to` tweens started by pointer drags.
    pub fn pointer_tween(&self) -> TweenDefaults {
        TweenDefaults {
            duration: self.pointer.duration,
            easing: self.pointer.easing,
        }
    }
}
