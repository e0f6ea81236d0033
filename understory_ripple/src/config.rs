// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ripple configuration: optional inputs, field-by-field merge, and resolution.
//!
//! ## Layers
//!
//! Hosts are attached with a set of default [`RippleOptions`]; each spawn may
//! carry its own overrides. [`RippleOptions::merged_over`] combines the two,
//! with spawn-time fields winning field by field (including the nested
//! [`AnimationOptions`]). [`RippleOptions::resolve`] then fills the remaining
//! gaps with defaults and clamps invalid values into a [`RippleConfig`].
//!
//! ## Invalid input
//!
//! A ripple is cosmetic, so bad input never fails:
//! - negative durations clamp to `0`;
//! - non-finite durations fall back to the default;
//! - a non-finite or non-positive radius falls back to the computed radius.
//!
//! ```
//! use understory_ripple::config::{AnimationOptions, RippleOptions};
//!
//! let host = RippleOptions::new().with_color("rgba(255, 0, 0, 0.2)").with_persistent(true);
//! let spawn = RippleOptions::new()
//!     .with_persistent(false)
//!     .with_animation(AnimationOptions::new().with_enter_duration_ms(-5.0));
//!
//! let config = spawn.merged_over(&host).resolve();
//! assert_eq!(config.color, "rgba(255, 0, 0, 0.2)");
//! assert!(!config.persistent);
//! assert_eq!(config.animation.enter_duration_ms, 0);
//! assert_eq!(config.animation.exit_duration_ms, 150);
//! ```

use alloc::string::String;
use core::fmt;

/// Default fill: a low-opacity neutral.
pub const DEFAULT_COLOR: &str = "rgba(0, 0, 0, 0.3)";
/// Default enter duration in milliseconds.
pub const DEFAULT_ENTER_DURATION_MS: u64 = 225;
/// Default exit duration in milliseconds.
pub const DEFAULT_EXIT_DURATION_MS: u64 = 150;

/// CSS-style cubic Bézier timing curve.
///
/// Hosts receive it with every visual transition; `Display` renders the CSS
/// `cubic-bezier(..)` form.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Easing {
    /// First control point, x.
    pub x1: f64,
    /// First control point, y.
    pub y1: f64,
    /// Second control point, x.
    pub x2: f64,
    /// Second control point, y.
    pub y2: f64,
}

impl Easing {
    /// Deceleration curve; the default for both enter and exit.
    pub const DECELERATE: Self = Self::cubic_bezier(0.0, 0.0, 0.2, 1.0);
    /// Material "standard" curve.
    pub const STANDARD: Self = Self::cubic_bezier(0.4, 0.0, 0.2, 1.0);
    /// Acceleration curve.
    pub const ACCELERATE: Self = Self::cubic_bezier(0.4, 0.0, 1.0, 1.0);
    /// No easing.
    pub const LINEAR: Self = Self::cubic_bezier(0.0, 0.0, 1.0, 1.0);

    /// Create a curve from its control points.
    pub const fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Control points as `(x1, y1, x2, y2)`.
    pub const fn control_points(&self) -> (f64, f64, f64, f64) {
        (self.x1, self.y1, self.x2, self.y2)
    }
}

impl Default for Easing {
    fn default() -> Self {
        Self::DECELERATE
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cubic-bezier({}, {}, {}, {})",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}

/// Optional animation inputs.
///
/// Durations are plain numbers of milliseconds, as a host framework would pass
/// them; they are validated by [`RippleOptions::resolve`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct AnimationOptions {
    /// Enter (fade-in) duration.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub enter_duration_ms: Option<f64>,
    /// Exit (fade-out) duration.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub exit_duration_ms: Option<f64>,
    /// Enter easing.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub enter_easing: Option<Easing>,
    /// Exit easing.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub exit_easing: Option<Easing>,
}

impl AnimationOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the enter duration.
    pub fn with_enter_duration_ms(mut self, ms: f64) -> Self {
        self.enter_duration_ms = Some(ms);
        self
    }

    /// Set the exit duration.
    pub fn with_exit_duration_ms(mut self, ms: f64) -> Self {
        self.exit_duration_ms = Some(ms);
        self
    }

    /// Set the enter easing.
    pub fn with_enter_easing(mut self, easing: Easing) -> Self {
        self.enter_easing = Some(easing);
        self
    }

    /// Set the exit easing.
    pub fn with_exit_easing(mut self, easing: Easing) -> Self {
        self.exit_easing = Some(easing);
        self
    }

    /// Combine with `base`; fields set on `self` win.
    pub fn merged_over(&self, base: &Self) -> Self {
        Self {
            enter_duration_ms: self.enter_duration_ms.or(base.enter_duration_ms),
            exit_duration_ms: self.exit_duration_ms.or(base.exit_duration_ms),
            enter_easing: self.enter_easing.or(base.enter_easing),
            exit_easing: self.exit_easing.or(base.exit_easing),
        }
    }

    /// Apply defaults and clamp.
    pub fn resolve(&self) -> AnimationConfig {
        AnimationConfig {
            enter_duration_ms: resolve_duration(
                self.enter_duration_ms,
                DEFAULT_ENTER_DURATION_MS,
                "enter_duration_ms",
            ),
            exit_duration_ms: resolve_duration(
                self.exit_duration_ms,
                DEFAULT_EXIT_DURATION_MS,
                "exit_duration_ms",
            ),
            enter_easing: self.enter_easing.unwrap_or_default(),
            exit_easing: self.exit_easing.unwrap_or_default(),
        }
    }
}

/// Optional ripple inputs, used both for host defaults and per-spawn overrides.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct RippleOptions {
    /// Fill color, as a CSS color string.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub color: Option<String>,
    /// Anchor the ripple at the host center instead of the pointer.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub centered: Option<bool>,
    /// Fixed radius instead of the furthest-corner distance.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub radius: Option<f64>,
    /// Stay visible after the enter transition until explicitly faded out.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub persistent: Option<bool>,
    /// Fade out on pointer release even if the enter transition is still running.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub terminate_on_pointer_up: Option<bool>,
    /// Animation inputs.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub animation: Option<AnimationOptions>,
}

impl RippleOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set whether the ripple is centered.
    pub fn with_centered(mut self, centered: bool) -> Self {
        self.centered = Some(centered);
        self
    }

    /// Set a fixed radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Set persistence.
    pub fn with_persistent(mut self, persistent: bool) -> Self {
        self.persistent = Some(persistent);
        self
    }

    /// Set whether pointer release terminates a fading-in ripple.
    pub fn with_terminate_on_pointer_up(mut self, terminate: bool) -> Self {
        self.terminate_on_pointer_up = Some(terminate);
        self
    }

    /// Set animation inputs.
    pub fn with_animation(mut self, animation: AnimationOptions) -> Self {
        self.animation = Some(animation);
        self
    }

    /// Combine with `base`; fields set on `self` win, animation fields merge individually.
    pub fn merged_over(&self, base: &Self) -> Self {
        let animation = match (&self.animation, &base.animation) {
            (Some(a), Some(b)) => Some(a.merged_over(b)),
            (a, b) => a.clone().or_else(|| b.clone()),
        };
        Self {
            color: self.color.clone().or_else(|| base.color.clone()),
            centered: self.centered.or(base.centered),
            radius: self.radius.or(base.radius),
            persistent: self.persistent.or(base.persistent),
            terminate_on_pointer_up: self.terminate_on_pointer_up.or(base.terminate_on_pointer_up),
            animation,
        }
    }

    /// Apply defaults and clamp.
    pub fn resolve(&self) -> RippleConfig {
        let radius = match self.radius {
            Some(r) if r.is_finite() && r > 0.0 => Some(r),
            Some(r) => {
                tracing::warn!(radius = r, "invalid ripple radius; using computed radius");
                None
            }
            None => None,
        };
        RippleConfig {
            color: self
                .color
                .clone()
                .unwrap_or_else(|| String::from(DEFAULT_COLOR)),
            centered: self.centered.unwrap_or(false),
            radius,
            persistent: self.persistent.unwrap_or(false),
            terminate_on_pointer_up: self.terminate_on_pointer_up.unwrap_or(false),
            animation: self.animation.clone().unwrap_or_default().resolve(),
        }
    }
}

/// Resolved animation settings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnimationConfig {
    /// Enter duration in milliseconds.
    pub enter_duration_ms: u64,
    /// Exit duration in milliseconds.
    pub exit_duration_ms: u64,
    /// Enter easing.
    pub enter_easing: Easing,
    /// Exit easing.
    pub exit_easing: Easing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationOptions::default().resolve()
    }
}

/// Resolved ripple settings, snapshotted into each instance at spawn.
#[derive(Clone, Debug, PartialEq)]
pub struct RippleConfig {
    /// Fill color.
    pub color: String,
    /// Anchor at the host center.
    pub centered: bool,
    /// Fixed radius; `None` means the furthest-corner distance.
    pub radius: Option<f64>,
    /// Stay visible until explicitly faded out.
    pub persistent: bool,
    /// Pointer release also terminates a fading-in ripple.
    pub terminate_on_pointer_up: bool,
    /// Animation settings.
    pub animation: AnimationConfig,
}

impl Default for RippleConfig {
    fn default() -> Self {
        RippleOptions::default().resolve()
    }
}

fn resolve_duration(value: Option<f64>, default: u64, field: &'static str) -> u64 {
    match value {
        None => default,
        Some(ms) if !ms.is_finite() => {
            tracing::warn!(field, "non-finite ripple duration; using default");
            default
        }
        Some(ms) if ms < 0.0 => {
            tracing::warn!(field, ms, "negative ripple duration; clamping to zero");
            0
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Value is finite and non-negative; fractional milliseconds truncate."
        )]
        Some(ms) => ms as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = RippleConfig::default();
        assert_eq!(c.color, DEFAULT_COLOR);
        assert!(!c.centered);
        assert_eq!(c.radius, None);
        assert!(!c.persistent);
        assert!(!c.terminate_on_pointer_up);
        assert_eq!(c.animation.enter_duration_ms, 225);
        assert_eq!(c.animation.exit_duration_ms, 150);
        assert_eq!(c.animation.enter_easing, Easing::DECELERATE);
        assert_eq!(c.animation.exit_easing, Easing::DECELERATE);
    }

    #[test]
    fn spawn_fields_override_host_fields_individually() {
        let host = RippleOptions::new()
            .with_color("blue")
            .with_centered(true)
            .with_animation(AnimationOptions::new().with_exit_duration_ms(400.0));
        let spawn = RippleOptions::new()
            .with_centered(false)
            .with_animation(AnimationOptions::new().with_enter_duration_ms(50.0));
        let c = spawn.merged_over(&host).resolve();
        assert_eq!(c.color, "blue");
        assert!(!c.centered);
        assert_eq!(c.animation.enter_duration_ms, 50);
        assert_eq!(c.animation.exit_duration_ms, 400);
    }

    #[test]
    fn animation_from_either_side_survives_merge() {
        let host = RippleOptions::new()
            .with_animation(AnimationOptions::new().with_exit_easing(Easing::LINEAR));
        let c = RippleOptions::new().merged_over(&host).resolve();
        assert_eq!(c.animation.exit_easing, Easing::LINEAR);

        let spawn = RippleOptions::new()
            .with_animation(AnimationOptions::new().with_enter_easing(Easing::STANDARD));
        let c = spawn.merged_over(&RippleOptions::new()).resolve();
        assert_eq!(c.animation.enter_easing, Easing::STANDARD);
    }

    #[test]
    fn invalid_values_degrade_instead_of_failing() {
        let opts = RippleOptions::new()
            .with_radius(f64::NAN)
            .with_animation(
                AnimationOptions::new()
                    .with_enter_duration_ms(-10.0)
                    .with_exit_duration_ms(f64::INFINITY),
            );
        let c = opts.resolve();
        assert_eq!(c.radius, None);
        assert_eq!(c.animation.enter_duration_ms, 0);
        assert_eq!(c.animation.exit_duration_ms, DEFAULT_EXIT_DURATION_MS);

        assert_eq!(RippleOptions::new().with_radius(-3.0).resolve().radius, None);
        assert_eq!(RippleOptions::new().with_radius(0.0).resolve().radius, None);
        assert_eq!(
            RippleOptions::new().with_radius(12.5).resolve().radius,
            Some(12.5)
        );
    }

    #[test]
    fn fractional_durations_truncate() {
        let c = AnimationOptions::new().with_enter_duration_ms(99.9).resolve();
        assert_eq!(c.enter_duration_ms, 99);
    }

    #[test]
    fn easing_renders_as_css() {
        use alloc::string::ToString;
        assert_eq!(
            Easing::STANDARD.to_string(),
            "cubic-bezier(0.4, 0, 0.2, 1)"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serialized_options_omit_unset_fields() {
        let opts = RippleOptions::new()
            .with_centered(true)
            .with_animation(AnimationOptions::new().with_exit_duration_ms(80.0));
        let json = serde_json::to_string(&opts).unwrap();
        assert_eq!(json, r#"{"centered":true,"animation":{"exitDurationMs":80.0}}"#);
        let back: RippleOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, opts);
        assert_eq!(serde_json::to_string(&RippleOptions::new()).unwrap(), "{}");
    }
}
