// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timing curves and animated scalar values.
//!
//! A [`TimingFunction`] is a CSS-style cubic Bézier with fixed end points at
//! `(0, 0)` and `(1, 1)`. An [`AnimatedValue`] interpolates between two values
//! over a time window using such a curve. Time is expressed in milliseconds on
//! a caller-provided clock; the tree never reads a system clock.

/// CSS-style cubic Bézier timing curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimingFunction {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl TimingFunction {
    /// Identity curve.
    pub const LINEAR: Self = Self::cubic_bezier(0.0, 0.0, 1.0, 1.0);
    /// Material "standard" curve.
    pub const STANDARD: Self = Self::cubic_bezier(0.4, 0.0, 0.2, 1.0);
    /// Deceleration curve (fast start, slow end).
    pub const DECELERATE: Self = Self::cubic_bezier(0.0, 0.0, 0.2, 1.0);
    /// Acceleration curve (slow start, fast end).
    pub const ACCELERATE: Self = Self::cubic_bezier(0.4, 0.0, 1.0, 1.0);

    /// Create a curve from its two control points.
    ///
    /// `x1` and `x2` are clamped to `0.0..=1.0` so the curve stays a function of time.
    pub const fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    /// Control points as `(x1, y1, x2, y2)`.
    pub const fn control_points(&self) -> (f64, f64, f64, f64) {
        (self.x1, self.y1, self.x2, self.y2)
    }

    /// Map linear progress `x` in `0.0..=1.0` to eased progress.
    pub fn apply(&self, x: f64) -> f64 {
        if !x.is_finite() || x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        // x(t) is monotonic for x1, x2 in [0, 1]; bisect for t.
        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        let mut t = x;
        for _ in 0..32 {
            let bx = bezier(t, self.x1, self.x2);
            if (bx - x).abs() < 1e-7 {
                break;
            }
            if bx < x {
                lo = t;
            } else {
                hi = t;
            }
            t = 0.5 * (lo + hi);
        }
        bezier(t, self.y1, self.y2)
    }
}

impl Default for TimingFunction {
    fn default() -> Self {
        Self::LINEAR
    }
}

/// One coordinate of a cubic Bézier with end points 0 and 1.
fn bezier(t: f64, p1: f64, p2: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

/// Duration and curve for a property change.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transition {
    /// Duration in milliseconds. Zero applies the target immediately.
    pub duration_ms: u64,
    /// Easing curve.
    pub timing: TimingFunction,
}

impl Transition {
    /// A transition that applies immediately.
    pub const NONE: Self = Self {
        duration_ms: 0,
        timing: TimingFunction::LINEAR,
    };

    /// Create a transition.
    pub const fn new(duration_ms: u64, timing: TimingFunction) -> Self {
        Self {
            duration_ms,
            timing,
        }
    }
}

/// A scalar animated between two values over a time window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimatedValue {
    from: f64,
    to: f64,
    start_ms: u64,
    transition: Transition,
}

impl AnimatedValue {
    /// A value at rest.
    pub const fn fixed(value: f64) -> Self {
        Self {
            from: value,
            to: value,
            start_ms: 0,
            transition: Transition::NONE,
        }
    }

    /// Retarget towards `to`, starting from the value sampled at `now_ms`.
    pub fn retarget(&mut self, to: f64, transition: Transition, now_ms: u64) {
        self.from = self.sample(now_ms);
        self.to = to;
        self.start_ms = now_ms;
        self.transition = transition;
    }

    /// Target value.
    pub const fn target(&self) -> f64 {
        self.to
    }

    /// Value at `now_ms`.
    pub fn sample(&self, now_ms: u64) -> f64 {
        let duration = self.transition.duration_ms;
        if duration == 0 || now_ms >= self.start_ms.saturating_add(duration) {
            return self.to;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms);
        #[allow(
            clippy::cast_precision_loss,
            reason = "Animation windows are far below 2^52 ms."
        )]
        let x = elapsed as f64 / duration as f64;
        let eased = self.transition.timing.apply(x);
        self.from + (self.to - self.from) * eased
    }

    /// Whether the value is still changing at `now_ms`.
    pub fn is_running(&self, now_ms: u64) -> bool {
        self.from != self.to && now_ms < self.start_ms.saturating_add(self.transition.duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_is_identity() {
        for x in [0.0, 0.1, 0.25, 0.5, 0.9, 1.0] {
            assert!((TimingFunction::LINEAR.apply(x) - x).abs() < 1e-6);
        }
    }

    #[test]
    fn curve_end_points_are_fixed() {
        for f in [
            TimingFunction::STANDARD,
            TimingFunction::DECELERATE,
            TimingFunction::ACCELERATE,
        ] {
            assert_eq!(f.apply(0.0), 0.0);
            assert_eq!(f.apply(1.0), 1.0);
            assert_eq!(f.apply(-3.0), 0.0);
            assert_eq!(f.apply(f64::NAN), 0.0);
        }
    }

    #[test]
    fn decelerate_runs_ahead_of_linear() {
        let f = TimingFunction::DECELERATE;
        assert!(f.apply(0.25) > 0.25);
        assert!(f.apply(0.5) > 0.5);
        let g = TimingFunction::ACCELERATE;
        assert!(g.apply(0.5) < 0.5);
    }

    #[test]
    fn animated_value_interpolates_and_settles() {
        let mut v = AnimatedValue::fixed(0.0);
        v.retarget(1.0, Transition::new(100, TimingFunction::LINEAR), 1_000);
        assert_eq!(v.sample(1_000), 0.0);
        assert!((v.sample(1_050) - 0.5).abs() < 1e-6);
        assert_eq!(v.sample(1_100), 1.0);
        assert!(v.is_running(1_099));
        assert!(!v.is_running(1_100));
    }

    #[test]
    fn retarget_mid_flight_starts_from_current_value() {
        let mut v = AnimatedValue::fixed(0.0);
        v.retarget(1.0, Transition::new(100, TimingFunction::LINEAR), 0);
        v.retarget(0.0, Transition::new(50, TimingFunction::LINEAR), 50);
        assert!((v.sample(50) - 0.5).abs() < 1e-6);
        assert!((v.sample(75) - 0.25).abs() < 1e-6);
        assert_eq!(v.sample(100), 0.0);
    }

    #[test]
    fn zero_duration_applies_immediately() {
        let mut v = AnimatedValue::fixed(1.0);
        v.retarget(0.0, Transition::NONE, 10);
        assert_eq!(v.sample(10), 0.0);
        assert!(!v.is_running(10));
    }
}
