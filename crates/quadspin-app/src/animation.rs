//! Per-tick animation state for the spinning quad.

/// Lower bound of the scale oscillation.
pub const SCALE_MIN: f32 = 0.5;
/// Upper bound of the scale oscillation.
pub const SCALE_MAX: f32 = 1.5;

/// Which way the scale factor is currently moving.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ScaleDirection {
    Up,
    Down,
}

/// Rotation angle plus a triangle-wave scale factor.
///
/// Both advance at one unit per second. The rotation accumulates without
/// wrapping; the scale turns around once it reaches or crosses a bound. The
/// step that crosses a bound is kept as-is (no clamping), so a large `dt`
/// briefly overshoots `[SCALE_MIN, SCALE_MAX]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AnimationState {
    /// Radians around +Y.
    pub rotation: f32,
    pub scale: f32,
    pub direction: ScaleDirection,
}

impl AnimationState {
    pub const fn new(rotation: f32, scale: f32, direction: ScaleDirection) -> Self {
        Self { rotation, scale, direction }
    }

    /// Advances the animation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.rotation += dt;

        match self.direction {
            ScaleDirection::Up => {
                self.scale += dt;
                if self.scale >= SCALE_MAX {
                    self.direction = ScaleDirection::Down;
                }
            }
            ScaleDirection::Down => {
                self.scale -= dt;
                if self.scale <= SCALE_MIN {
                    self.direction = ScaleDirection::Up;
                }
            }
        }
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new(0.5, 1.0, ScaleDirection::Up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── rotation ──────────────────────────────────────────────────────────

    #[test]
    fn rotation_accumulates_every_dt() {
        let mut a = AnimationState::default();
        let steps = [0.016, 0.020, 0.0, 0.5, 0.033];
        let mut prev = a.rotation;
        for dt in steps {
            a.update(dt);
            assert!(a.rotation >= prev);
            prev = a.rotation;
        }
        let expected = 0.5 + steps.iter().sum::<f32>();
        assert!((a.rotation - expected).abs() < 1e-5);
    }

    #[test]
    fn rotation_is_not_wrapped() {
        let mut a = AnimationState::default();
        for _ in 0..10 {
            a.update(1.0);
        }
        assert!((a.rotation - 10.5).abs() < 1e-5);
    }

    // ── scale ─────────────────────────────────────────────────────────────

    #[test]
    fn one_second_step_overshoots_then_flips() {
        let mut a = AnimationState::default();
        a.update(1.0);
        assert_eq!(a.rotation, 1.5);
        assert_eq!(a.scale, 2.0);
        assert_eq!(a.direction, ScaleDirection::Down);
    }

    #[test]
    fn flips_down_exactly_at_upper_bound() {
        let mut a = AnimationState::default();
        a.update(0.25);
        assert_eq!(a.direction, ScaleDirection::Up);
        a.update(0.25);
        assert_eq!(a.scale, 1.5);
        assert_eq!(a.direction, ScaleDirection::Down);
    }

    #[test]
    fn flips_up_exactly_at_lower_bound() {
        let mut a = AnimationState::new(0.0, 1.0, ScaleDirection::Down);
        a.update(0.5);
        assert_eq!(a.scale, 0.5);
        assert_eq!(a.direction, ScaleDirection::Up);
        a.update(0.25);
        assert_eq!(a.scale, 0.75);
    }

    #[test]
    fn small_steps_stay_near_bounds() {
        let dt = 0.01;
        let mut a = AnimationState::default();
        for _ in 0..2_000 {
            a.update(dt);
            assert!(a.scale >= SCALE_MIN - dt - 1e-4, "scale {} below range", a.scale);
            assert!(a.scale <= SCALE_MAX + dt + 1e-4, "scale {} above range", a.scale);
        }
    }

    #[test]
    fn direction_changes_only_at_bounds() {
        let dt = 0.01;
        let mut a = AnimationState::default();
        for _ in 0..2_000 {
            let before = a.direction;
            a.update(dt);
            if a.direction != before {
                match a.direction {
                    ScaleDirection::Down => assert!(a.scale >= SCALE_MAX),
                    ScaleDirection::Up => assert!(a.scale <= SCALE_MIN),
                }
            }
        }
    }

    #[test]
    fn full_cycle_takes_two_seconds() {
        // One unit of range at one unit per second: 1s up, 1s down.
        let dt = 0.001;
        let mut a = AnimationState::new(0.0, SCALE_MIN, ScaleDirection::Up);
        let mut flips = 0;
        let mut steps = 0;
        while flips < 2 {
            let before = a.direction;
            a.update(dt);
            steps += 1;
            if a.direction != before {
                flips += 1;
            }
        }
        let elapsed = steps as f32 * dt;
        assert!((elapsed - 2.0).abs() < 0.01, "cycle took {elapsed}s");
    }
}
