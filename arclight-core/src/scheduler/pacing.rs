//! Deadline-based frame pacing
//!
//! Timestamps are `Duration`s since an arbitrary epoch (normally the loop
//! start), which keeps the scheduler free of any clock and lets tests feed
//! it exact times.

use core::time::Duration;

/// Default target frame rate
pub const DEFAULT_FPS: u32 = 60;

/// Fixed-rate frame scheduler
///
/// Deadlines advance by exactly one interval per frame, so rounding in the
/// sleep does not accumulate into drift. A loop that falls a whole interval
/// behind resynchronises instead of bursting frames to catch up.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Duration,
    /// End of the current frame
    deadline: Option<Duration>,
    /// Frames that overran by at least one interval
    missed: u32,
}

impl FrameScheduler {
    /// Create a scheduler for `fps` frames per second (zero is treated as 1)
    pub fn new(fps: u32) -> Self {
        let fps = fps.max(1) as u64;
        Self::from_interval(Duration::from_nanos(1_000_000_000 / fps))
    }

    /// Create a scheduler with an explicit frame interval
    pub fn from_interval(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
            missed: 0,
        }
    }

    /// Frame interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Frames that overran by a full interval or more
    pub fn missed_frames(&self) -> u32 {
        self.missed
    }

    /// Anchor the first frame at `now`
    pub fn reset(&mut self, now: Duration) {
        self.deadline = Some(now + self.interval);
        self.missed = 0;
    }

    /// Time to sleep before starting the next frame
    ///
    /// Call once per frame after the frame's work. Without a prior
    /// [`reset`](Self::reset), the first frame is taken to start at `now`.
    pub fn next_wait(&mut self, now: Duration) -> Duration {
        let deadline = *self.deadline.get_or_insert(now + self.interval);

        if now < deadline {
            self.deadline = Some(deadline + self.interval);
            return deadline - now;
        }

        let late = now - deadline;
        if late < self.interval {
            // Slightly late: start the next frame immediately, keep the phase
            self.deadline = Some(deadline + self.interval);
        } else {
            self.missed = self.missed.saturating_add(1);
            self.deadline = Some(now + self.interval);
        }
        Duration::ZERO
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}
