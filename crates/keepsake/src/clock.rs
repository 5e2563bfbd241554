//! Frame clocks that produce the [`FrameTime`] each tick consumes.

use keepsake_core::clock::FrameTime;
use keepsake_core::error::SceneResult;
use web_time::Instant;

/// Source of per-tick timing.
pub trait Clock {
    fn tick(&mut self) -> SceneResult<FrameTime>;
}

/// Fixed-step clock for headless runs and tests. Fully deterministic.
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step: f32,
    frame: u64,
}

impl FixedStepClock {
    pub fn new(step: f32) -> Self {
        Self { step, frame: 0 }
    }

    pub fn from_fps(fps: f32) -> Self {
        Self::new(1.0 / fps)
    }

    /// Number of ticks produced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Clock for FixedStepClock {
    fn tick(&mut self) -> SceneResult<FrameTime> {
        // The first tick has zero delta, like a renderer's first frame.
        let delta = if self.frame == 0 { 0.0 } else { self.step };
        let elapsed = self.frame as f32 * self.step;
        self.frame += 1;
        FrameTime::new(elapsed, delta)
    }
}

/// Wall-clock timing via `web_time`, usable on native and WASM.
#[derive(Debug, Clone)]
pub struct WallClock {
    start: Instant,
    last: Option<Instant>,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last: None,
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn tick(&mut self) -> SceneResult<FrameTime> {
        let now = Instant::now();
        let delta = self.last.map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last = Some(now);
        FrameTime::new(now.duration_since(self.start).as_secs_f32(), delta)
    }
}
