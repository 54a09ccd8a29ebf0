//! A cancellable per-frame driver.
//!
//! The windowing layer owns the real frame clock (`RedrawRequested` followed
//! by `request_redraw`). [`RenderLoop`] only decides what happens inside one
//! frame: advance, draw, then ask for the next frame, and nothing at all once
//! the loop has been stopped.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::Result;

/// Shared start/stop switch for a [`RenderLoop`].
///
/// Clones refer to the same switch, so whoever holds one can stop the loop.
#[derive(Clone, Debug, Default)]
pub struct LoopHandle {
    running: Rc<Cell<bool>>,
}

impl LoopHandle {
    pub fn start(&self) {
        self.running.set(true);
    }

    pub fn stop(&self) {
        self.running.set(false);
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}

/// The three things a frame does, in the order it does them.
pub trait FrameSteps {
    /// Advance animations and controls by `dt` seconds.
    fn advance(&mut self, dt: f32);
    /// Draw the current state.
    fn render(&mut self) -> Result<()>;
    /// Schedule the next frame.
    fn request_next_frame(&self);
}

#[derive(Debug, Default)]
pub struct RenderLoop {
    handle: LoopHandle,
    frames: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn start(&self) {
        tracing::debug!("render loop started");
        self.handle.start();
    }

    pub fn stop(&self) {
        if self.handle.is_running() {
            tracing::debug!(frames = self.frames, "render loop stopped");
        }
        self.handle.stop();
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    /// Frames run since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame. Does nothing after [`stop`](Self::stop).
    ///
    /// A render error stops the loop and is handed back to the caller; no
    /// further frame is requested.
    pub fn frame(&mut self, steps: &mut impl FrameSteps, dt: f32) -> Result<()> {
        if !self.is_running() {
            return Ok(());
        }

        steps.advance(dt);
        if let Err(err) = steps.render() {
            self.stop();
            return Err(err);
        }
        self.frames += 1;

        // Checked again: advance or render may have stopped the loop through a handle.
        if self.is_running() {
            steps.request_next_frame();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::Error;

    #[derive(Debug, PartialEq, Eq)]
    enum Call {
        Advance,
        Render,
        Request,
    }

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<Call>>,
        fail_render: bool,
        stop_on_advance: Option<LoopHandle>,
    }

    impl FrameSteps for Recorder {
        fn advance(&mut self, _dt: f32) {
            self.calls.borrow_mut().push(Call::Advance);
            if let Some(handle) = &self.stop_on_advance {
                handle.stop();
            }
        }

        fn render(&mut self) -> Result<()> {
            self.calls.borrow_mut().push(Call::Render);
            if self.fail_render {
                return Err(Error::Surface(wgpu::SurfaceError::OutOfMemory));
            }
            Ok(())
        }

        fn request_next_frame(&self) {
            self.calls.borrow_mut().push(Call::Request);
        }
    }

    #[test]
    fn update_and_render_alternate_every_frame() {
        let mut render_loop = RenderLoop::new();
        let mut steps = Recorder::default();
        render_loop.start();

        for _ in 0..3 {
            render_loop.frame(&mut steps, 1.0 / 60.0).unwrap();
        }

        let calls = steps.calls.into_inner();
        assert_eq!(calls.len(), 9);
        for frame in calls.chunks(3) {
            assert_eq!(frame, [Call::Advance, Call::Render, Call::Request]);
        }
        assert_eq!(render_loop.frames(), 3);
    }

    #[test]
    fn nothing_runs_before_start_or_after_stop() {
        let mut render_loop = RenderLoop::new();
        let mut steps = Recorder::default();

        render_loop.frame(&mut steps, 0.016).unwrap();
        assert!(steps.calls.borrow().is_empty());

        render_loop.start();
        render_loop.frame(&mut steps, 0.016).unwrap();
        render_loop.handle().stop();
        render_loop.frame(&mut steps, 0.016).unwrap();
        render_loop.frame(&mut steps, 0.016).unwrap();

        assert_eq!(steps.calls.borrow().len(), 3);
        assert_eq!(render_loop.frames(), 1);
    }

    #[test]
    fn stopping_mid_frame_skips_the_next_request() {
        let mut render_loop = RenderLoop::new();
        render_loop.start();
        let mut steps = Recorder {
            stop_on_advance: Some(render_loop.handle()),
            ..Recorder::default()
        };

        render_loop.frame(&mut steps, 0.016).unwrap();

        assert_eq!(steps.calls.into_inner(), vec![Call::Advance, Call::Render]);
        assert!(!render_loop.is_running());
    }

    #[test]
    fn render_error_stops_the_loop() {
        let mut render_loop = RenderLoop::new();
        render_loop.start();
        let mut steps = Recorder {
            fail_render: true,
            ..Recorder::default()
        };

        assert!(render_loop.frame(&mut steps, 0.016).is_err());
        assert!(!render_loop.is_running());
        assert_eq!(steps.calls.into_inner(), vec![Call::Advance, Call::Render]);
    }
}
