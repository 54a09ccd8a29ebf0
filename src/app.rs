//! Window and event loop wiring.
//!
//! [`run`] opens the window, builds the stage once the event loop is live,
//! plays the entrance timeline and then drives frames from
//! `RedrawRequested` until the window closes.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec3;
use winit::application::ApplicationHandler;
use winit::event::{MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::animation::{Property, Timeline, TweenDefaults, TweenEngine, Value};
use crate::config::SceneConfig;
use crate::error::{Error, Result};
use crate::font::{self, GlyphSet};
use crate::input::{Input, PointerEvent};
use crate::orbit_controls::OrbitControls;
use crate::pointer::PointerColorDriver;
use crate::render_loop::{FrameSteps, RenderLoop};
use crate::renderer::Renderer;
use crate::scene::Scene;
use crate::viewport::Viewport;

/// Longest step fed to animations, so a stalled frame does not skip them ahead.
const MAX_FRAME_DT: f32 = 0.1;

/// The intro sequence: sphere scales in, then the nav bar slides down, then
/// the title fades in. One step after another, each `defaults.duration` long.
pub fn entrance_timeline(defaults: TweenDefaults) -> Timeline {
    let mut timeline = Timeline::new(defaults);
    timeline
        .from_to(
            Property::SphereScale,
            Value::Vec3(Vec3::ZERO),
            Value::Vec3(Vec3::ONE),
        )
        .from_to(Property::NavOffset, Value::Scalar(-1.0), Value::Scalar(0.0))
        .from_to(Property::TitleOpacity, Value::Scalar(0.0), Value::Scalar(1.0));
    timeline
}

/// Rasterize the title font, or explain why the title cannot be shown.
fn load_title_glyphs(font_path: Option<&Path>, size: f32) -> Result<GlyphSet> {
    let (path, data) = font::load_font_data(font_path)?
        .ok_or_else(|| Error::Font("no system font found".to_string()))?;
    let glyphs = GlyphSet::from_font_bytes(&data, size)?;
    tracing::info!(path = %path.display(), size, "title font loaded");
    Ok(glyphs)
}

/// Everything that lives while the window is open.
struct Stage {
    window: Arc<Window>,
    renderer: Renderer,
    scene: Scene,
    controls: OrbitControls,
    viewport: Viewport,
    input: Input,
    tweens: TweenEngine,
    timeline: Timeline,
    pointer: PointerColorDriver,
    last_frame: Instant,
}

impl Stage {
    fn new(event_loop: &ActiveEventLoop, config: &SceneConfig) -> Result<Self> {
        let app_config = config.app_config();
        let window_attrs = WindowAttributes::default()
            .with_title(&app_config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                app_config.width,
                app_config.height,
            ));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let mut scene = config.scene();
        let title_size = scene.title.as_ref().map(|title| title.size);
        let glyphs = match title_size {
            Some(size) => match load_title_glyphs(config.overlay.font.as_deref(), size) {
                Ok(glyphs) => Some(glyphs),
                Err(err) => {
                    tracing::warn!(%err, "title disabled");
                    scene.title = None;
                    None
                }
            },
            None => None,
        };

        let size = window.inner_size();
        let viewport = Viewport::new(size.width, size.height);
        let controls = config.controls(viewport.aspect());
        let renderer = Renderer::new(window.clone(), &scene, glyphs)?;

        let mut timeline = entrance_timeline(config.timeline_defaults());
        timeline.start(&mut scene);

        tracing::info!(
            width = viewport.width(),
            height = viewport.height(),
            "stage ready"
        );

        Ok(Self {
            window,
            renderer,
            scene,
            controls,
            viewport,
            input: Input::new(),
            tweens: TweenEngine::new(config.pointer_tween()),
            timeline,
            pointer: PointerColorDriver::new(config.pointer.blue, None),
            last_frame: Instant::now(),
        })
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Pressed(MouseButton::Left) => {
                tracing::debug!("drag started");
                self.pointer.press();
            }
            PointerEvent::Released(MouseButton::Left) => {
                tracing::debug!(last_color = ?self.pointer.state().last_color, "drag ended");
                self.pointer.release();
            }
            PointerEvent::Pressed(_) | PointerEvent::Released(_) => {}
            PointerEvent::Moved(position) => {
                self.pointer
                    .moved(position, &self.viewport, &mut self.tweens);
            }
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        let applied = self.viewport.on_resize(
            width,
            height,
            self.controls.camera_mut(),
            &mut self.renderer,
        );
        if applied {
            tracing::info!(width, height, "window resized");
        }
    }

    /// Seconds since the previous frame, capped at [`MAX_FRAME_DT`].
    fn frame_dt(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        dt.min(MAX_FRAME_DT)
    }
}

impl FrameSteps for Stage {
    fn advance(&mut self, dt: f32) {
        self.tweens.tick(dt, &mut self.scene);
        self.timeline.tick(dt, &mut self.scene);

        self.controls.apply_input(&self.input, &self.viewport);
        self.controls.update(dt);
        self.input.begin_frame();
    }

    fn render(&mut self) -> Result<()> {
        self.renderer
            .render(&self.scene, self.controls.camera(), &self.viewport)
    }

    fn request_next_frame(&self) {
        self.window.request_redraw();
    }
}

enum AppState {
    Pending { config: SceneConfig },
    Running { stage: Box<Stage>, render_loop: RenderLoop },
    Closed,
}

struct OrbitApp {
    state: AppState,
    /// First fatal error, reported once the event loop returns.
    error: Option<Error>,
}

impl OrbitApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Error) {
        tracing::error!(%err, "shutting down");
        if let AppState::Running { stage, render_loop } = &mut self.state {
            render_loop.stop();
            stage.tweens.kill_all();
        }
        self.state = AppState::Closed;
        self.error.get_or_insert(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for OrbitApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let AppState::Pending { config } = &self.state else {
            return;
        };

        match Stage::new(event_loop, config) {
            Ok(stage) => {
                let render_loop = RenderLoop::new();
                render_loop.start();
                stage.window.request_redraw();
                self.state = AppState::Running {
                    stage: Box::new(stage),
                    render_loop,
                };
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let AppState::Running { stage, render_loop } = &mut self.state else {
            return;
        };

        if let Some(pointer_event) = stage.input.handle_event(&event) {
            stage.handle_pointer(pointer_event);
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!(frames = render_loop.frames(), "window closed");
                render_loop.stop();
                stage.tweens.kill_all();
                self.state = AppState::Closed;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                stage.resize(size.width, size.height);
                stage.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let dt = stage.frame_dt();
                if let Err(err) = render_loop.frame(stage.as_mut(), dt) {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }
}

/// Open the window and run until it is closed.
///
/// # Example
/// ```no_run
/// let config = orbit_sphere::SceneConfig::default();
/// orbit_sphere::run(config).unwrap();
/// ```
pub fn run(config: SceneConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    // Frames are driven by request_redraw, so the loop can sleep between events.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = OrbitApp {
        state: AppState::Pending { config },
        error: None,
    };
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Easing, PropertyTarget};

    #[test]
    fn entrance_runs_scale_then_nav_then_title() {
        let timeline = entrance_timeline(TweenDefaults {
            duration: 1.0,
            easing: Easing::EaseOut,
        });
        assert_eq!(timeline.step_starts(), vec![0.0, 1.0, 2.0]);
        assert_eq!(timeline.duration(), 3.0);
    }

    #[test]
    fn entrance_hides_everything_at_start_and_shows_it_at_the_end() {
        let mut scene = Scene::default();
        let mut timeline = entrance_timeline(TweenDefaults {
            duration: 1.0,
            easing: Easing::EaseOut,
        });

        timeline.start(&mut scene);
        assert_eq!(scene.sphere.transform.scale, Vec3::ZERO);
        assert_eq!(scene.get(Property::NavOffset), Some(Value::Scalar(-1.0)));
        assert_eq!(scene.get(Property::TitleOpacity), Some(Value::Scalar(0.0)));

        for _ in 0..4 {
            timeline.tick(1.0, &mut scene);
        }
        assert!(timeline.is_finished());
        assert_eq!(scene.sphere.transform.scale, Vec3::ONE);
        assert_eq!(scene.get(Property::NavOffset), Some(Value::Scalar(0.0)));
        assert_eq!(scene.get(Property::TitleOpacity), Some(Value::Scalar(1.0)));
    }

    #[test]
    fn explicit_missing_font_disables_the_title() {
        let result = load_title_glyphs(Some(Path::new("/no/such/font.ttf")), 48.0);
        assert!(matches!(result, Err(Error::Font(_))));
    }
}
