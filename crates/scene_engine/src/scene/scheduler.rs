//! Host frame scheduling
//!
//! The scene never decides when to draw. A host scheduler (a display refresh
//! callback, a fixed-rate timer, a test harness) hands out frames, each with
//! the viewport size current at that moment, until it chooses to stop.

use std::thread;
use std::time::{Duration, Instant};

use crate::render::Viewport;

/// Source of frame signals for [`SceneManager::run`](super::SceneManager::run)
pub trait FrameScheduler {
    /// Block until the next frame is due; `None` stops the loop
    fn next_frame(&mut self) -> Option<Viewport>;
}

/// Fixed number of frames at an optional fixed rate
#[derive(Debug, Clone)]
pub struct FixedFrameScheduler {
    remaining: u64,
    viewport: Viewport,
    interval: Option<Duration>,
    last_frame: Option<Instant>,
}

impl FixedFrameScheduler {
    /// Hand out `frames` frames as fast as they are consumed
    pub fn new(frames: u64, viewport: Viewport) -> Self {
        Self {
            remaining: frames,
            viewport,
            interval: None,
            last_frame: None,
        }
    }

    /// Pace frames to the given rate
    pub fn with_rate(mut self, frames_per_second: u32) -> Self {
        self.interval = Some(Duration::from_secs(1) / frames_per_second.max(1));
        self
    }

    /// Report a new viewport size from the next frame on
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl FrameScheduler for FixedFrameScheduler {
    fn next_frame(&mut self) -> Option<Viewport> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        if let (Some(interval), Some(last)) = (self.interval, self.last_frame) {
            let elapsed = last.elapsed();
            if elapsed < interval {
                thread::sleep(interval - elapsed);
            }
        }
        self.last_frame = Some(Instant::now());
        Some(self.viewport)
    }
}
