// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: ripple handles and states, pointer events, listener families.
//!
//! ## Overview
//!
//! These types describe what flows into the engine (pointer events with
//! timestamps) and what observers can read back out of it (ripple ids,
//! states, and the journal of state changes).
//! They are referenced by the [`renderer`](crate::renderer) and the
//! [`coordinator`](crate::coordinator).

use kurbo::Point;

/// Opaque handle of one ripple.
///
/// Ids are allocated from a monotonically increasing counter and never reused
/// by the renderer that issued them, so a stale id never aliases a newer ripple.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct RippleId(u64);

impl RippleId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value, for logging and debugging.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Lifecycle state of a ripple.
///
/// States only move forward: `FadingIn → Visible → FadingOut → Removed`.
/// `FadingIn` and `Visible` may skip directly to `FadingOut`; nothing skips
/// the exit wait before `Removed`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum RippleState {
    /// Enter transition running.
    FadingIn,
    /// Enter transition complete; persistent ripples rest here.
    Visible,
    /// Exit transition running; removal is scheduled.
    FadingOut,
    /// Visual detached and instance evicted. Terminal.
    Removed,
}

impl RippleState {
    /// Whether an exit animation may still be started from this state.
    pub const fn can_fade_out(self) -> bool {
        matches!(self, Self::FadingIn | Self::Visible)
    }
}

/// A recorded state transition.
///
/// Drained with [`RippleRenderer::take_state_changes`](crate::renderer::RippleRenderer::take_state_changes).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StateChange {
    /// Ripple that changed.
    pub id: RippleId,
    /// State entered.
    pub state: RippleState,
    /// Engine clock when the state was entered.
    pub at_ms: u64,
}

/// Kind of pointer event forwarded by the host framework.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    /// Mouse button pressed on the host.
    MouseDown,
    /// Touch began on the host.
    TouchStart,
    /// Mouse button released anywhere.
    MouseUp,
    /// Pointer left the surface.
    MouseLeave,
    /// Pointer interaction cancelled by the platform.
    PointerCancel,
    /// Touch ended anywhere.
    TouchEnd,
    /// Touch cancelled by the platform.
    TouchCancel,
}

impl EventKind {
    /// The single family bit for this kind.
    pub const fn family(self) -> EventFamilies {
        match self {
            Self::MouseDown => EventFamilies::MOUSE_DOWN,
            Self::TouchStart => EventFamilies::TOUCH_START,
            Self::MouseUp => EventFamilies::MOUSE_UP,
            Self::MouseLeave => EventFamilies::MOUSE_LEAVE,
            Self::PointerCancel => EventFamilies::POINTER_CANCEL,
            Self::TouchEnd => EventFamilies::TOUCH_END,
            Self::TouchCancel => EventFamilies::TOUCH_CANCEL,
        }
    }

    /// Whether this kind starts a press.
    pub const fn is_down(self) -> bool {
        self.family().intersects(EventFamilies::POINTER_DOWN)
    }

    /// Whether this kind originates from a touch screen.
    pub const fn is_touch(self) -> bool {
        matches!(self, Self::TouchStart | Self::TouchEnd | Self::TouchCancel)
    }
}

bitflags::bitflags! {
    /// Sets of event kinds, used for listener subscriptions.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EventFamilies: u8 {
        /// `mousedown`.
        const MOUSE_DOWN     = 0b0000_0001;
        /// `touchstart`.
        const TOUCH_START    = 0b0000_0010;
        /// `mouseup`.
        const MOUSE_UP       = 0b0000_0100;
        /// `mouseleave`.
        const MOUSE_LEAVE    = 0b0000_1000;
        /// `pointercancel`.
        const POINTER_CANCEL = 0b0001_0000;
        /// `touchend`.
        const TOUCH_END      = 0b0010_0000;
        /// `touchcancel`.
        const TOUCH_CANCEL   = 0b0100_0000;

        /// Everything that starts a press.
        const POINTER_DOWN = Self::MOUSE_DOWN.bits() | Self::TOUCH_START.bits();
        /// Everything that ends or abandons a press.
        const POINTER_UP = Self::MOUSE_UP.bits()
            | Self::MOUSE_LEAVE.bits()
            | Self::POINTER_CANCEL.bits()
            | Self::TOUCH_END.bits()
            | Self::TOUCH_CANCEL.bits();
    }
}

/// Where a listener is installed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ListenerScope {
    /// On the host element only.
    Host,
    /// On the whole application surface (window), so releases outside the host are seen.
    Global,
}

/// A pointer event in the surface coordinate space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Event kind.
    pub kind: EventKind,
    /// Pointer position; for touch events, the first touch point.
    pub position: Point,
    /// Timestamp in milliseconds on the embedder's clock.
    pub timestamp_ms: u64,
}

impl PointerEvent {
    /// Create an event.
    pub fn new(kind: EventKind, position: impl Into<Point>, timestamp_ms: u64) -> Self {
        Self {
            kind,
            position: position.into(),
            timestamp_ms,
        }
    }

    /// Create a release-family event; position is irrelevant for releases.
    pub fn release(kind: EventKind, timestamp_ms: u64) -> Self {
        Self::new(kind, Point::ZERO, timestamp_ms)
    }
}
