//! Frames-per-second counter.

/// Length of one measurement window.
const WINDOW_MS: f64 = 1000.0;

/// Counts frames over one-second windows.
#[derive(Debug, Clone, Default)]
pub struct FrameCounter {
    frames: u32,
    window_ms: f64,
    fps: f64,
    total_frames: u64,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame that took `delta_ms`.
    pub fn tick(&mut self, delta_ms: f64) {
        self.frames += 1;
        self.total_frames += 1;
        self.window_ms += delta_ms.max(0.0);

        if self.window_ms >= WINDOW_MS {
            self.fps = f64::from(self.frames) * 1000.0 / self.window_ms;
            self.frames = 0;
            self.window_ms = 0.0;
        }
    }

    /// FPS measured over the last complete window.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}
