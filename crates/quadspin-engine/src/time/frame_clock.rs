use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is clamped to avoid pathological values when the application is paused
/// by the debugger, minimized, or stalls. Animation code integrates `dt`
/// directly, so an unclamped multi-second stall would show up as a jump.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps (100 µs to 250 ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            dt_min,
            dt_max,
        }
    }

    /// Resets the clock baseline.
    ///
    /// Called once the application has finished loading so the first frame
    /// does not absorb shader and pipeline creation time.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        FrameTime {
            dt: dt.as_secs_f32(),
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_at(start: Instant) -> FrameClock {
        let mut c = FrameClock::new();
        c.last = start;
        c
    }

    #[test]
    fn dt_measures_time_between_ticks() {
        let start = Instant::now();
        let mut c = clock_at(start);
        let ft = c.tick_at(start + Duration::from_millis(16));
        assert!((ft.dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn dt_is_clamped_below() {
        let start = Instant::now();
        let mut c = clock_at(start);
        let ft = c.tick_at(start);
        assert!((ft.dt - 0.0001).abs() < 1e-7);
    }

    #[test]
    fn dt_is_clamped_above() {
        let start = Instant::now();
        let mut c = clock_at(start);
        let ft = c.tick_at(start + Duration::from_secs(5));
        assert!((ft.dt - 0.25).abs() < 1e-6);
    }

    #[test]
    fn each_tick_measures_from_the_previous_one() {
        let start = Instant::now();
        let mut c = clock_at(start);
        let a = c.tick_at(start + Duration::from_millis(10));
        let b = c.tick_at(start + Duration::from_millis(30));
        assert!((a.dt - 0.010).abs() < 1e-6);
        assert!((b.dt - 0.020).abs() < 1e-6);
    }

    #[test]
    fn custom_clamps_are_respected() {
        let start = Instant::now();
        let mut c = FrameClock::with_clamps(Duration::ZERO, Duration::from_secs(2));
        c.last = start;
        let ft = c.tick_at(start + Duration::from_secs(1));
        assert!((ft.dt - 1.0).abs() < 1e-6);
    }
}
