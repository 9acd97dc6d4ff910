use std::time::{Duration, Instant};

/// Longest step handed to the simulation, so a stalled window doesn't
/// teleport the player.
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(100);

pub struct FrameClock {
    last_tick: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick);
        self.last_tick = now;
        clamp_frame_time(dt).as_secs_f32()
    }
}

#[inline]
fn clamp_frame_time(dt: Duration) -> Duration {
    dt.min(MAX_FRAME_TIME)
}
