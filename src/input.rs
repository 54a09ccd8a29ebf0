use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Pointer events the app reacts to, already stripped of winit details.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Pressed(MouseButton),
    Released(MouseButton),
    Moved(Vec2),
}

/// Tracks mouse state between frames.
///
/// Per-frame accumulators (`mouse_delta`, `scroll_delta`) are reset by
/// [`Input::begin_frame`] once the frame has consumed them.
#[derive(Debug, Default)]
pub struct Input {
    buttons_down: HashSet<MouseButton>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
    mouse_position: Vec2,
    has_position: bool,
    mouse_delta: Vec2,
    scroll_delta: Vec2,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call once the frame has consumed this frame's input.
    pub fn begin_frame(&mut self) {
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }

    /// Process a window event and return the pointer event it represents, if any.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => {
                    if self.buttons_down.insert(*button) {
                        self.buttons_pressed.insert(*button);
                    }
                    Some(PointerEvent::Pressed(*button))
                }
                ElementState::Released => {
                    self.buttons_down.remove(button);
                    self.buttons_released.insert(*button);
                    Some(PointerEvent::Released(*button))
                }
            },
            WindowEvent::CursorMoved { position, .. } => {
                let new_pos = Vec2::new(position.x as f32, position.y as f32);
                // The first reported position is a jump from nowhere, not a drag.
                if self.has_position {
                    self.mouse_delta += new_pos - self.mouse_position;
                }
                self.mouse_position = new_pos;
                self.has_position = true;
                Some(PointerEvent::Moved(new_pos))
            }
            WindowEvent::CursorLeft { .. } => {
                self.has_position = false;
                None
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(x, y) => Vec2::new(*x, *y),
                    MouseScrollDelta::PixelDelta(pos) => {
                        Vec2::new(pos.x as f32, pos.y as f32) / 120.0
                    }
                };
                None
            }
            WindowEvent::Focused(false) => {
                // Releases that happen while unfocused never reach us.
                let held = if self.buttons_down.contains(&MouseButton::Left) {
                    Some(MouseButton::Left)
                } else {
                    self.buttons_down.iter().next().copied()
                };
                self.buttons_released.extend(self.buttons_down.drain());
                held.map(PointerEvent::Released)
            }
            _ => None,
        }
    }

    /// Returns true if the mouse button is currently held down.
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Returns true if the mouse button was pressed this frame.
    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    /// Returns true if the mouse button was released this frame.
    pub fn mouse_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Current mouse position in window coordinates.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Mouse movement delta this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Scroll wheel delta this frame (in "lines").
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalPosition;
    use winit::event::DeviceId;

    use super::*;

    fn device() -> DeviceId {
        // SAFETY: only compared, never handed back to the platform.
        unsafe { DeviceId::dummy() }
    }

    fn moved(x: f64, y: f64) -> WindowEvent {
        WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(x, y),
        }
    }

    fn button(state: ElementState) -> WindowEvent {
        WindowEvent::MouseInput {
            device_id: device(),
            state,
            button: MouseButton::Left,
        }
    }

    #[test]
    fn first_position_is_not_a_drag() {
        let mut input = Input::new();
        assert_eq!(
            input.handle_event(&moved(100.0, 50.0)),
            Some(PointerEvent::Moved(Vec2::new(100.0, 50.0)))
        );
        assert_eq!(input.mouse_delta(), Vec2::ZERO);

        input.handle_event(&moved(110.0, 45.0));
        assert_eq!(input.mouse_delta(), Vec2::new(10.0, -5.0));

        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
        assert_eq!(input.mouse_position(), Vec2::new(110.0, 45.0));
    }

    #[test]
    fn press_and_release_track_held_buttons() {
        let mut input = Input::new();
        assert_eq!(
            input.handle_event(&button(ElementState::Pressed)),
            Some(PointerEvent::Pressed(MouseButton::Left))
        );
        assert!(input.mouse_down(MouseButton::Left));
        assert!(input.mouse_pressed(MouseButton::Left));

        input.begin_frame();
        assert!(!input.mouse_pressed(MouseButton::Left));

        assert_eq!(
            input.handle_event(&button(ElementState::Released)),
            Some(PointerEvent::Released(MouseButton::Left))
        );
        assert!(!input.mouse_down(MouseButton::Left));
        assert!(input.mouse_released(MouseButton::Left));
    }

    #[test]
    fn losing_focus_releases_held_buttons() {
        let mut input = Input::new();
        input.handle_event(&button(ElementState::Pressed));

        assert_eq!(
            input.handle_event(&WindowEvent::Focused(false)),
            Some(PointerEvent::Released(MouseButton::Left))
        );
        assert!(!input.mouse_down(MouseButton::Left));
        assert_eq!(input.handle_event(&WindowEvent::Focused(false)), None);
    }

    #[test]
    fn leaving_the_window_resets_the_delta_origin() {
        let mut input = Input::new();
        input.handle_event(&moved(10.0, 10.0));
        input.handle_event(&WindowEvent::CursorLeft { device_id: device() });
        input.handle_event(&moved(500.0, 500.0));
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn wheel_lines_accumulate() {
        let mut input = Input::new();
        let wheel = WindowEvent::MouseWheel {
            device_id: device(),
            delta: MouseScrollDelta::LineDelta(0.0, 1.0),
            phase: winit::event::TouchPhase::Moved,
        };
        assert_eq!(input.handle_event(&wheel), None);
        input.handle_event(&wheel);
        assert_eq!(input.scroll_delta(), Vec2::new(0.0, 2.0));
    }
}
