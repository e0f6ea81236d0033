// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host surface boundary.
//!
//! ## Overview
//!
//! [`HostSurface`] is everything the engine needs from the element it decorates:
//! its bounds, a way to attach/animate/detach circular visuals, and listener
//! subscriptions. Hosts decide how a [`RippleVisual`] is realised; a DOM-like host
//! may use an absolutely positioned rounded block scaled by a transform, while a
//! vector host may animate a circle's radius. The engine only ever talks to this
//! trait.
//!
//! Every method may fail with [`SurfaceError`]. The engine never surfaces these
//! errors to its caller: a detached host simply yields no visual effect.

use alloc::string::String;
use core::fmt::Debug;

use kurbo::{Point, Rect};

use crate::config::Easing;
use crate::types::{EventFamilies, ListenerScope};

/// Failure of a host surface capability.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    /// The host is no longer part of the render tree.
    #[error("host surface is detached")]
    Detached,
    /// The visual handle does not belong to this host (or was already detached).
    #[error("visual is not attached to this host")]
    UnknownVisual,
}

/// Description of a ripple visual at attach time, in host-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct RippleVisual {
    /// Circle center.
    pub center: Point,
    /// Full-scale radius.
    pub radius: f64,
    /// Fill color, as a CSS color string.
    pub color: String,
    /// Initial opacity.
    pub opacity: f64,
    /// Initial scale around the center.
    pub scale: f64,
}

impl RippleVisual {
    /// Bounding square at full scale.
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, (2.0 * self.radius, 2.0 * self.radius))
    }
}

/// An animatable visual property and its target value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum VisualProperty {
    /// Opacity in `0.0..=1.0`.
    Opacity(f64),
    /// Scale around the visual center; `1.0` is full radius.
    Scale(f64),
}

/// Timing of a property change.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VisualTransition {
    /// Engine clock when the transition starts.
    pub start_ms: u64,
    /// Duration in milliseconds.
    pub duration_ms: u64,
    /// Easing curve.
    pub easing: Easing,
}

/// Capabilities the engine requires from a host element.
pub trait HostSurface {
    /// Handle of an attached visual.
    type Visual: Copy + Eq + Debug;

    /// Current bounding box, in the coordinate space of incoming pointer events.
    fn bounds(&self) -> Result<Rect, SurfaceError>;

    /// Attach a new visual as a child of the host.
    fn attach_visual(&mut self, visual: &RippleVisual) -> Result<Self::Visual, SurfaceError>;

    /// Start a transition of one property of an attached visual.
    fn animate_visual(
        &mut self,
        visual: Self::Visual,
        property: VisualProperty,
        transition: VisualTransition,
    ) -> Result<(), SurfaceError>;

    /// Detach a visual from the host.
    fn detach_visual(&mut self, visual: Self::Visual) -> Result<(), SurfaceError>;

    /// Start delivering the given event families from `scope`.
    fn subscribe(&mut self, scope: ListenerScope, events: EventFamilies)
    -> Result<(), SurfaceError>;

    /// Stop delivering the given event families from `scope`.
    fn unsubscribe(
        &mut self,
        scope: ListenerScope,
        events: EventFamilies,
    ) -> Result<(), SurfaceError>;
}
