//! # orbit-sphere
//!
//! A lit sphere in a window that you can spin, with a short intro animation.
//!
//! On startup the sphere scales in, the nav bar slides down from the top edge
//! and the title fades in, one after another. The camera orbits the sphere on
//! its own (with damping, so drags glide to a stop). Dragging with a button
//! held recolors the sphere: horizontal position sets red, vertical position
//! sets green.
//!
//! ```no_run
//! use orbit_sphere::SceneConfig;
//!
//! let mut config = SceneConfig::default();
//! config.controls.auto_rotate_speed = 2.0;
//! orbit_sphere::run(config).unwrap();
//! ```
//!
//! The pieces are usable on their own: [`OrbitControls`], [`Timeline`] and
//! [`TweenEngine`] do not touch the GPU.

pub mod animation;
mod app;
mod camera;
mod color;
mod config;
mod error;
mod font;
mod gpu;
mod input;
mod mesh;
mod mesh_pass;
mod orbit_controls;
mod overlay;
mod pointer;
mod render_loop;
mod renderer;
mod scene;
mod viewport;

pub use animation::{
    Animator, Easing, Position, Property, PropertyTarget, Timeline, TweenDefaults, TweenEngine,
    Value,
};
pub use app::{entrance_timeline, run};
pub use camera::PerspectiveCamera;
pub use color::{Color, Rgb8};
pub use config::{
    AppConfig, CameraConfig, ControlsConfig, LightConfig, OverlayConfig, PointerConfig,
    SceneConfig, SphereConfig, TimelineConfig, WindowConfig,
};
pub use error::{Error, Result};
pub use font::{FontAtlas, GlyphInfo, GlyphSet, load_font_data, pack_glyphs};
pub use gpu::GpuContext;
pub use input::{Input, PointerEvent};
pub use mesh::{Geometry, Mesh, Transform, Vertex3d};
pub use mesh_pass::{DrawCall, MeshPass};
pub use orbit_controls::OrbitControls;
pub use overlay::{OverlayBatch, OverlayPass, Vertex2d};
pub use pointer::{PointerColorDriver, PointerDragState, color_for_pointer};
pub use render_loop::{FrameSteps, LoopHandle, RenderLoop};
pub use renderer::Renderer;
pub use scene::{NavBar, PointLight, Scene, Sphere, StandardMaterial, Title};
pub use viewport::{OutputSurface, Viewport};

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3};
