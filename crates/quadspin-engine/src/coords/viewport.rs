/// Viewport size in physical pixels.
///
/// Renderers use this both for `set_viewport` and for the projection aspect
/// ratio, so it is refreshed on every resize.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Builds a viewport from an integer drawable size.
    #[inline]
    pub fn from_physical(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width divided by height.
    ///
    /// A degenerate viewport (minimized window, zero height) reports `1.0` so a
    /// projection built from it stays finite.
    #[inline]
    pub fn aspect_ratio(self) -> f32 {
        if self.is_valid() {
            self.width / self.height
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── validity ──────────────────────────────────────────────────────────

    #[test]
    fn positive_size_is_valid() {
        assert!(Viewport::new(1280.0, 768.0).is_valid());
    }

    #[test]
    fn zero_dimension_is_invalid() {
        assert!(!Viewport::new(0.0, 768.0).is_valid());
        assert!(!Viewport::new(1280.0, 0.0).is_valid());
    }

    #[test]
    fn non_finite_is_invalid() {
        assert!(!Viewport::new(f32::INFINITY, 10.0).is_valid());
        assert!(!Viewport::new(10.0, f32::NAN).is_valid());
    }

    // ── aspect ratio ──────────────────────────────────────────────────────

    #[test]
    fn aspect_ratio_is_width_over_height() {
        let v = Viewport::from_physical(1280, 768);
        assert!((v.aspect_ratio() - 1280.0 / 768.0).abs() < 1e-6);
    }

    #[test]
    fn zero_width_does_not_divide_by_zero() {
        let a = Viewport::from_physical(0, 768).aspect_ratio();
        assert!(a.is_finite());
        assert_eq!(a, 1.0);
    }

    #[test]
    fn zero_height_does_not_divide_by_zero() {
        let a = Viewport::from_physical(1280, 0).aspect_ratio();
        assert!(a.is_finite());
        assert_eq!(a, 1.0);
    }
}
