//! Countdowns and the on-screen timer format.

/// A one-shot countdown (timed doors).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Countdown {
    remaining: f32,
    running: bool,
}

/// Result of advancing a countdown by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountdownTick {
    Idle,
    Running(f32),
    /// Reached zero this frame; the countdown is stopped.
    Expired,
}

impl Countdown {
    /// (Re)start from `seconds`.
    pub fn start(&mut self, seconds: f32) {
        self.remaining = seconds;
        self.running = true;
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick(&mut self, delta: f32) -> CountdownTick {
        if !self.running {
            return CountdownTick::Idle;
        }
        if self.remaining > 0.0 {
            self.remaining -= delta;
        }
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.running = false;
            return CountdownTick::Expired;
        }
        CountdownTick::Running(self.remaining)
    }
}

/// Format seconds as `mm:ss:ffff` (hundredths, zero-padded to four digits).
pub fn format_countdown(seconds: f32) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u32;
    let secs = (seconds % 60.0).floor() as u32;
    let hundredths = ((seconds * 100.0) % 100.0).floor() as u32;
    format!("{minutes:02}:{secs:02}:{hundredths:04}")
}
