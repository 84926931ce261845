//! Render loop lifecycle
//!
//! `DisplayController::run` drives frames on the calling thread until the
//! mode channel's running flag drops or the backend reports a close.
//! `DisplayController::start` does the same on a dedicated thread and
//! hands back a `HudHandle` for the caller to steer and stop it.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use arclight_core::config::WindowConfig;
use arclight_core::scheduler::FrameScheduler;
use arclight_core::{Mode, ModeSnapshot, ModeStateChannel};
use log::{debug, error, info, warn};

use crate::backend::{BackendEvent, DisplayBackend, DisplayError};
use crate::controller::DisplayController;
use crate::overlay::OverlayData;

/// Name of the render thread spawned by `start`
pub const RENDER_THREAD_NAME: &str = "arclight-render";

/// Counters from one run of the render loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Frames presented
    pub frames: u64,
    /// Frames the scheduler had to drop to catch up
    pub missed: u32,
    /// Mode changes observed
    pub mode_changes: u32,
}

impl DisplayController {
    /// Run the render loop on this thread
    ///
    /// Returns when `channel.request_stop()` is called, the backend reports
    /// a close, or presenting a frame fails. The backend is released
    /// exactly once on every exit path.
    pub fn run<B: DisplayBackend>(
        &mut self,
        mut backend: B,
        channel: &ModeStateChannel,
    ) -> Result<FrameStats, DisplayError> {
        let result = self.frame_loop(&mut backend, channel);
        backend.release();

        match &result {
            Ok(stats) => info!(
                "Render loop stopped after {} frames ({} missed)",
                stats.frames, stats.missed
            ),
            Err(e) => error!("Render loop failed: {}", e),
        }
        result
    }

    fn frame_loop<B: DisplayBackend>(
        &mut self,
        backend: &mut B,
        channel: &ModeStateChannel,
    ) -> Result<FrameStats, DisplayError> {
        if backend.size() != self.size() {
            return Err(DisplayError::SizeMismatch {
                expected: self.size(),
                actual: backend.size(),
            });
        }

        let fps = self.window().fps;
        let rows = self.overlay().telemetry_rows();
        let mut frame = self.new_frame();
        let mut rng = rand::thread_rng();
        let mut scheduler = FrameScheduler::new(fps);
        let mut stats = FrameStats::default();

        let epoch = Instant::now();
        scheduler.reset(Duration::ZERO);
        channel.mark_ready();
        info!("Render loop started at {} fps", fps);

        while channel.is_running() {
            for event in backend.poll_events() {
                if event == BackendEvent::Close {
                    info!("Window closed");
                    channel.request_stop();
                }
            }
            if !channel.is_running() {
                break;
            }

            if let Some(mode) = channel.take_change() {
                debug!("Mode change observed: {}", mode.name());
                stats.mode_changes += 1;
            }
            self.update_colors(&channel.snapshot());

            let data = OverlayData::capture(epoch.elapsed().as_secs_f32(), rows, &mut rng);
            self.draw_frame(&mut frame, &data);
            backend.present(&frame)?;
            stats.frames += 1;

            let wait = scheduler.next_wait(epoch.elapsed());
            if !wait.is_zero() {
                thread::sleep(wait);
            }
        }

        stats.missed = scheduler.missed_frames();
        if stats.missed > 0 {
            warn!("{} frames missed their deadline", stats.missed);
        }
        Ok(stats)
    }

    /// Run the render loop on a dedicated thread
    ///
    /// `make_backend` runs on the new thread, so backends that must live on
    /// the thread that drives them are fine. If it fails, the error is
    /// returned from `HudHandle::stop` or `HudHandle::join` and the channel
    /// is stopped.
    pub fn start<B, F>(mut self, channel: Arc<ModeStateChannel>, make_backend: F) -> Result<HudHandle, DisplayError>
    where
        B: DisplayBackend,
        F: FnOnce(&WindowConfig) -> Result<B, DisplayError> + Send + 'static,
    {
        let thread_channel = Arc::clone(&channel);

        let thread = thread::Builder::new()
            .name(RENDER_THREAD_NAME.into())
            .spawn(move || {
                let backend = match make_backend(self.window()) {
                    Ok(backend) => backend,
                    Err(e) => {
                        error!("Display backend unavailable: {}", e);
                        thread_channel.request_stop();
                        return Err(e);
                    }
                };
                self.run(backend, &thread_channel)
            })
            .map_err(|e| {
                error!("Failed to spawn render thread: {}", e);
                DisplayError::ThreadSpawn
            })?;

        Ok(HudHandle {
            channel,
            thread: Some(thread),
        })
    }
}

/// Handle to a render loop running on its own thread
///
/// Dropping the handle stops the loop and waits for it.
pub struct HudHandle {
    channel: Arc<ModeStateChannel>,
    thread: Option<JoinHandle<Result<FrameStats, DisplayError>>>,
}

impl HudHandle {
    /// The shared mode channel
    pub fn channel(&self) -> &Arc<ModeStateChannel> {
        &self.channel
    }

    /// Set the displayed mode; takes effect on the next frame
    pub fn set_mode(&self, mode: Mode, text: &str) {
        self.channel.set_mode(mode, text);
    }

    /// Latest mode and status text written
    pub fn snapshot(&self) -> ModeSnapshot {
        self.channel.snapshot()
    }

    /// Wait until the loop is presenting frames
    ///
    /// Returns `false` on timeout or if the thread already exited.
    pub fn wait_ready(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.channel.is_ready() {
                return true;
            }
            if self.is_finished() || Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    /// Whether the render thread has exited
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Stop the loop and wait for it to release the backend
    pub fn stop(mut self) -> Result<FrameStats, DisplayError> {
        self.channel.request_stop();
        self.wait()
    }

    /// Wait for the loop to end on its own (window closed)
    pub fn join(mut self) -> Result<FrameStats, DisplayError> {
        self.wait()
    }

    fn wait(&mut self) -> Result<FrameStats, DisplayError> {
        match self.thread.take() {
            Some(thread) => thread
                .join()
                .unwrap_or(Err(DisplayError::RenderThreadPanicked)),
            None => Ok(FrameStats::default()),
        }
    }
}

impl Drop for HudHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.channel.request_stop();
            let _ = self.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{HeadlessBackend, HeadlessProbe};
    use crate::canvas::{rgb888, Canvas};
    use crate::controller::test_config;
    use arclight_core::config::{HudConfig, Tint};
    use embedded_graphics::prelude::*;

    /// Backend whose `present` fails after a number of frames
    struct FailingBackend {
        size: Size,
        ok_frames: u64,
        probe: HeadlessProbe,
        inner: HeadlessBackend,
    }

    impl DisplayBackend for FailingBackend {
        fn size(&self) -> Size {
            self.size
        }

        fn present(&mut self, frame: &Canvas) -> Result<(), DisplayError> {
            if self.probe.frames() >= self.ok_frames {
                return Err(DisplayError::PresentFailed);
            }
            self.inner.present(frame)
        }

        fn poll_events(&mut self) -> Vec<BackendEvent> {
            Vec::new()
        }

        fn release(self) {
            self.inner.release();
        }
    }

    fn headless(config: &HudConfig) -> HeadlessBackend {
        HeadlessBackend::new(Size::new(config.window.width, config.window.height))
    }

    #[test]
    fn test_run_until_close() {
        let config = test_config();
        let mut controller = DisplayController::new(&config).unwrap();
        let backend = headless(&config).with_frame_limit(3);
        let probe = backend.probe();
        let channel = ModeStateChannel::new();

        let stats = controller.run(backend, &channel).unwrap();
        assert_eq!(stats.frames, 3);
        assert_eq!(probe.frames(), 3);
        assert_eq!(probe.releases(), 1);
        assert!(channel.is_ready());
        assert!(!channel.is_running());
    }

    #[test]
    fn test_stopped_channel_presents_nothing() {
        let config = test_config();
        let mut controller = DisplayController::new(&config).unwrap();
        let backend = headless(&config);
        let probe = backend.probe();
        let channel = ModeStateChannel::new();
        channel.request_stop();

        let stats = controller.run(backend, &channel).unwrap();
        assert_eq!(stats.frames, 0);
        assert_eq!(probe.releases(), 1);
    }

    #[test]
    fn test_size_mismatch_releases_backend() {
        let config = test_config();
        let mut controller = DisplayController::new(&config).unwrap();
        let backend = HeadlessBackend::new(Size::new(10, 10));
        let probe = backend.probe();

        let err = controller.run(backend, &ModeStateChannel::new()).unwrap_err();
        assert!(matches!(err, DisplayError::SizeMismatch { .. }));
        assert_eq!(probe.frames(), 0);
        assert_eq!(probe.releases(), 1);
    }

    #[test]
    fn test_present_failure_is_fatal() {
        let config = test_config();
        let mut controller = DisplayController::new(&config).unwrap();
        let inner = headless(&config);
        let probe = inner.probe();
        let backend = FailingBackend {
            size: inner.size(),
            ok_frames: 2,
            probe: probe.clone(),
            inner,
        };

        let err = controller.run(backend, &ModeStateChannel::new()).unwrap_err();
        assert_eq!(err, DisplayError::PresentFailed);
        assert_eq!(probe.frames(), 2);
        assert_eq!(probe.releases(), 1);
    }

    #[test]
    fn test_mode_changes_reach_the_frame() {
        let config = test_config();
        let palette = config.palette;
        let mut controller = DisplayController::new(&config).unwrap();

        // Speaking with the default text
        let channel = ModeStateChannel::new();
        channel.set_mode(Mode::Speaking, "");
        let backend = headless(&config).with_frame_limit(2).recording();
        let probe = backend.probe();
        let stats = controller.run(backend, &channel).unwrap();

        let red = rgb888(palette.speaking);
        assert_eq!(stats.mode_changes, 1);
        assert_eq!(controller.status_text(), "PROCESSING / SPEAKING");
        assert_eq!(controller.accent(), red);
        for ring in controller.rings() {
            let expected = match ring.tint() {
                Tint::Dynamic => red,
                Tint::Fixed => rgb888(palette.structural),
            };
            assert_eq!(ring.color(), expected);
        }
        let frame = probe.state().last_frame.unwrap();
        let c = controller.center();
        assert_eq!(frame.pixel(c.x, c.y - 15).map(|p| p.rgb()), Some(red));

        // Back to idle with a custom status
        let channel = ModeStateChannel::new();
        channel.set_mode(Mode::Idle, "Awaiting Input");
        let backend = headless(&config).with_frame_limit(1);
        controller.run(backend, &channel).unwrap();

        let cyan = rgb888(palette.idle);
        assert_eq!(controller.status_text(), "AWAITING INPUT");
        assert_eq!(controller.accent(), cyan);
        assert!(controller
            .rings()
            .iter()
            .filter(|r| r.is_dynamic())
            .all(|r| r.color() == cyan));
    }

    #[test]
    fn test_start_and_stop() {
        let config = test_config();
        let controller = DisplayController::new(&config).unwrap();
        let channel = Arc::new(ModeStateChannel::new());

        // Cost of one frame on this machine
        let frame_cost = {
            let mut scratch = controller.clone();
            let mut frame = scratch.new_frame();
            let data = OverlayData::default();
            let begin = Instant::now();
            scratch.draw_frame(&mut frame, &data);
            begin.elapsed()
        };
        let interval = FrameScheduler::new(config.window.fps).interval();
        let backend = headless(&config);
        let probe = backend.probe();

        let handle = controller
            .start(Arc::clone(&channel), move |_| Ok(backend))
            .unwrap();
        assert!(handle.wait_ready(Duration::from_secs(5)));

        handle.set_mode(Mode::Listening, "foo");
        assert_eq!(handle.snapshot().status_text(), "FOO");
        thread::sleep(Duration::from_millis(30));

        let requested = Instant::now();
        let stats = handle.stop().unwrap();
        // The pending sleep plus the frame in flight, with scheduling slack
        let bound = interval + frame_cost * 2 + Duration::from_millis(20);
        let latency = requested.elapsed();
        assert!(latency < bound, "stop took {:?}, bound {:?}", latency, bound);
        assert!(stats.frames > 0);
        assert_eq!(probe.releases(), 1);
        assert!(!channel.is_running());
    }

    #[test]
    fn test_drop_stops_loop() {
        let config = test_config();
        let controller = DisplayController::new(&config).unwrap();
        let channel = Arc::new(ModeStateChannel::new());
        let backend = headless(&config);
        let probe = backend.probe();

        let handle = controller
            .start(Arc::clone(&channel), move |_| Ok(backend))
            .unwrap();
        assert!(handle.wait_ready(Duration::from_secs(5)));
        drop(handle);

        assert!(!channel.is_running());
        assert_eq!(probe.releases(), 1);
    }

    #[test]
    fn test_backend_failure_surfaces_on_join() {
        let controller = DisplayController::new(&test_config()).unwrap();
        let channel = Arc::new(ModeStateChannel::new());

        let handle = controller
            .start(Arc::clone(&channel), |_| {
                Err::<HeadlessBackend, _>(DisplayError::WindowUnavailable)
            })
            .unwrap();
        assert!(!handle.wait_ready(Duration::from_secs(5)));
        assert_eq!(handle.join().unwrap_err(), DisplayError::WindowUnavailable);
        assert!(!channel.is_running());
    }
}
