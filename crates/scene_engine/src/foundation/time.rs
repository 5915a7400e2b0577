//! Time management utilities

use std::time::{Duration, Instant};

/// Frames-per-second accounting for the render loop
///
/// Counts ticks and publishes the count once per elapsed window (one second
/// by default), the same way a browser overlay refreshes an FPS label.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window: Duration,
    window_start: Instant,
    frames: u32,
    fps: u32,
    total_frames: u64,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    /// Create a counter with a one second publishing window
    pub fn new() -> Self {
        Self::with_window(Duration::from_secs(1))
    }

    /// Create a counter with a custom publishing window
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            window_start: Instant::now(),
            frames: 0,
            fps: 0,
            total_frames: 0,
        }
    }

    /// Record one frame at the current instant
    ///
    /// Returns the freshly published value when a window closed on this frame.
    pub fn frame(&mut self) -> Option<u32> {
        self.frame_at(Instant::now())
    }

    /// Record one frame at `now`
    pub fn frame_at(&mut self, now: Instant) -> Option<u32> {
        self.frames += 1;
        self.total_frames += 1;

        if now.saturating_duration_since(self.window_start) < self.window {
            return None;
        }

        self.fps = self.frames;
        self.frames = 0;
        self.window_start = now;
        log::debug!("FPS : {}", self.fps);
        Some(self.fps)
    }

    /// Last published frames-per-window value
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Total frames recorded since creation
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publishes_once_per_window() {
        let start = Instant::now();
        let mut counter = FpsCounter::with_window(Duration::from_millis(100));
        counter.window_start = start;

        for i in 1..=5 {
            assert_eq!(counter.frame_at(start + Duration::from_millis(i * 10)), None);
        }
        assert_eq!(counter.frame_at(start + Duration::from_millis(100)), Some(6));
        assert_eq!(counter.fps(), 6);
        assert_eq!(counter.total_frames(), 6);

        // New window starts from zero
        assert_eq!(counter.frame_at(start + Duration::from_millis(150)), None);
        assert_eq!(counter.fps(), 6);
    }
}
