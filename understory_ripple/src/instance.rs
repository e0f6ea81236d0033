// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single ripple and its state machine.
//!
//! An instance owns nothing on the host except its visual handle. Transitions
//! are methods that return whether they took effect, so callers (the registry and
//! the renderer) can schedule follow-up work only for real transitions.

use kurbo::{Point, Rect};

use crate::config::RippleConfig;
use crate::geometry;
use crate::surface::{HostSurface, RippleVisual, SurfaceError, VisualProperty, VisualTransition};
use crate::types::{RippleId, RippleState};

/// One active ripple.
#[derive(Clone, Debug)]
pub struct RippleInstance<V> {
    id: RippleId,
    visual: V,
    config: RippleConfig,
    state: RippleState,
    origin: Point,
    radius: f64,
    spawned_ms: u64,
}

impl<V: Copy + Eq + core::fmt::Debug> RippleInstance<V> {
    /// Place, attach, and start the enter transition of a new ripple.
    ///
    /// The visual starts transparent at zero scale and grows to full opacity and
    /// scale over the configured enter duration.
    pub(crate) fn spawn<S: HostSurface<Visual = V>>(
        id: RippleId,
        surface: &mut S,
        host: Rect,
        pointer: Point,
        config: RippleConfig,
        now_ms: u64,
    ) -> Result<Self, SurfaceError> {
        let placement = geometry::place(pointer, host, &config);
        let visual = surface.attach_visual(&RippleVisual {
            center: placement.origin,
            radius: placement.radius,
            color: config.color.clone(),
            opacity: 0.0,
            scale: 0.0,
        })?;
        let enter = VisualTransition {
            start_ms: now_ms,
            duration_ms: config.animation.enter_duration_ms,
            easing: config.animation.enter_easing,
        };
        let started = surface
            .animate_visual(visual, VisualProperty::Scale(1.0), enter)
            .and_then(|()| surface.animate_visual(visual, VisualProperty::Opacity(1.0), enter));
        if let Err(err) = started {
            let _ = surface.detach_visual(visual);
            return Err(err);
        }
        Ok(Self {
            id,
            visual,
            config,
            state: RippleState::FadingIn,
            origin: placement.origin,
            radius: placement.radius,
            spawned_ms: now_ms,
        })
    }

    /// Ripple id.
    pub fn id(&self) -> RippleId {
        self.id
    }

    /// Host visual handle.
    pub fn visual(&self) -> V {
        self.visual
    }

    /// Configuration snapshot taken at spawn.
    pub fn config(&self) -> &RippleConfig {
        &self.config
    }

    /// Current state.
    pub fn state(&self) -> RippleState {
        self.state
    }

    /// Center in host-local coordinates.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Full-scale radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Engine clock at spawn.
    pub fn spawned_ms(&self) -> u64 {
        self.spawned_ms
    }

    /// Whether the configuration marked this ripple persistent.
    pub fn is_persistent(&self) -> bool {
        self.config.persistent
    }

    /// `FadingIn → Visible`. Returns false from any other state.
    pub(crate) fn mark_visible(&mut self) -> bool {
        if self.state != RippleState::FadingIn {
            return false;
        }
        self.state = RippleState::Visible;
        true
    }

    /// Start the exit transition.
    ///
    /// Idempotent: returns false (and touches nothing) when the ripple is already
    /// fading out or removed, so at most one exit animation ever runs.
    pub(crate) fn fade_out<S: HostSurface<Visual = V>>(
        &mut self,
        surface: &mut S,
        now_ms: u64,
    ) -> bool {
        if !self.state.can_fade_out() {
            return false;
        }
        self.state = RippleState::FadingOut;
        let exit = VisualTransition {
            start_ms: now_ms,
            duration_ms: self.config.animation.exit_duration_ms,
            easing: self.config.animation.exit_easing,
        };
        if let Err(err) = surface.animate_visual(self.visual, VisualProperty::Opacity(0.0), exit)
        {
            // Removal is still scheduled; the visual is gone or will be detached then.
            tracing::debug!(ripple = self.id.get(), %err, "exit transition not started");
        }
        true
    }

    /// Detach the visual and enter the terminal state. Returns false if already removed.
    pub(crate) fn remove<S: HostSurface<Visual = V>>(&mut self, surface: &mut S) -> bool {
        if self.state == RippleState::Removed {
            return false;
        }
        self.state = RippleState::Removed;
        if let Err(err) = surface.detach_visual(self.visual) {
            tracing::debug!(ripple = self.id.get(), %err, "visual already gone");
        }
        true
    }
}
