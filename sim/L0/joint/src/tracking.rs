//! Incremental joint angle tracking.
//!
//! The absolute angle between two attach frames is only known modulo a full
//! turn. Hinge-like joints need a continuous angle that can pass ±π and keep
//! counting, so each step integrates the small rotation between the new
//! measurement and the previously tracked angle.

/// Continuous angle accumulated from per-step sine/cosine measurements.
///
/// # Example
///
/// ```
/// use sim_joint::AngleTracker;
///
/// let mut tracker = AngleTracker::new();
/// // Quarter turns measured modulo 2π still add up past π.
/// for step in 1..=6 {
///     let a = f64::from(step) * std::f64::consts::FRAC_PI_2;
///     tracker.update(a.sin(), a.cos());
/// }
/// assert!((tracker.angle() - 3.0 * std::f64::consts::PI).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleTracker {
    angle: f64,
    sin: f64,
    cos: f64,
}

impl Default for AngleTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AngleTracker {
    /// Tracker at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            angle: 0.0,
            sin: 0.0,
            cos: 1.0,
        }
    }

    /// Current accumulated angle in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Feed the sine and cosine of the current measured angle.
    ///
    /// The inputs need not be normalized. Steps are assumed to rotate less
    /// than half a turn.
    pub fn update(&mut self, sin_angle: f64, cos_angle: f64) -> f64 {
        let sin_da = sin_angle * self.cos - cos_angle * self.sin;
        let cos_da = cos_angle * self.cos + sin_angle * self.sin;
        self.set_angle(self.angle + sin_da.atan2(cos_da));
        self.angle
    }

    /// Overwrite the tracked angle, e.g. after clamping it to a limit.
    pub fn set_angle(&mut self, angle: f64) {
        self.angle = angle;
        (self.sin, self.cos) = angle.sin_cos();
    }

    /// Return to zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
