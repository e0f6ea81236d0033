// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer event coordination.
//!
//! ## Overview
//!
//! Normalises mouse and touch presses into spawn requests and decides which
//! ripples a release terminates. It owns no ripples; the
//! [`renderer`](crate::renderer) asks it for decisions.
//!
//! ## Filtering presses
//!
//! - Touch screens fire a compatibility `mousedown` shortly after `touchstart`.
//!   Any mouse press within [`TOUCH_MOUSE_SUPPRESSION_MS`] of the last touch start
//!   is ignored.
//! - Compound event sequences can deliver several presses at once. A press within
//!   [`SPAWN_THROTTLE_MS`] of the last accepted spawn is throttled.
//!
//! ## Listener scopes
//!
//! Presses are only interesting on the host, but a press that starts on the host
//! and is released elsewhere must still end its ripple, so release families are
//! subscribed on the global surface.
//!
//! ```
//! use understory_ripple::coordinator::{DownDecision, PointerCoordinator};
//! use understory_ripple::types::EventKind;
//!
//! let mut c = PointerCoordinator::new();
//! assert_eq!(c.pointer_down(EventKind::TouchStart, 1_000), DownDecision::Spawn);
//! // The compatibility mouse event that follows the touch.
//! assert_eq!(c.pointer_down(EventKind::MouseDown, 1_300), DownDecision::SyntheticMouse);
//! ```

use crate::instance::RippleInstance;
use crate::surface::HostSurface;
use crate::types::{EventFamilies, EventKind, ListenerScope, RippleState};

/// Mouse presses this soon after a touch start are treated as synthetic.
pub const TOUCH_MOUSE_SUPPRESSION_MS: u64 = 800;
/// Presses this soon after an accepted spawn are dropped.
pub const SPAWN_THROTTLE_MS: u64 = 100;

/// Outcome of a press.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DownDecision {
    /// Spawn a ripple.
    Spawn,
    /// Compatibility mouse event following a touch; ignored.
    SyntheticMouse,
    /// Too close to the previous spawn; ignored.
    Throttled,
}

/// Press/release bookkeeping for one host.
#[derive(Clone, Debug, Default)]
pub struct PointerCoordinator {
    last_touch_start_ms: Option<u64>,
    last_spawn_ms: Option<u64>,
    pointer_down: bool,
    subscribed: bool,
}

impl PointerCoordinator {
    /// Create a coordinator with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a press is currently held.
    pub fn is_pointer_down(&self) -> bool {
        self.pointer_down
    }

    /// Whether listeners are currently installed.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Install press listeners on the host and release listeners globally.
    pub fn subscribe<S: HostSurface>(&mut self, surface: &mut S) {
        if self.subscribed {
            return;
        }
        let host = surface.subscribe(ListenerScope::Host, EventFamilies::POINTER_DOWN);
        let global = surface.subscribe(ListenerScope::Global, EventFamilies::POINTER_UP);
        if let Err(err) = host.and(global) {
            tracing::debug!(%err, "ripple listeners not installed");
        }
        self.subscribed = true;
    }

    /// Remove every listener installed by [`subscribe`](Self::subscribe).
    pub fn unsubscribe<S: HostSurface>(&mut self, surface: &mut S) {
        if !self.subscribed {
            return;
        }
        let host = surface.unsubscribe(ListenerScope::Host, EventFamilies::POINTER_DOWN);
        let global = surface.unsubscribe(ListenerScope::Global, EventFamilies::POINTER_UP);
        if let Err(err) = host.and(global) {
            tracing::debug!(%err, "ripple listeners already gone");
        }
        self.subscribed = false;
        self.pointer_down = false;
    }

    /// Remember a touch start for synthetic mouse suppression.
    ///
    /// Called for every touch start, including ones that spawn nothing.
    pub fn note_touch_start(&mut self, now_ms: u64) {
        self.last_touch_start_ms = Some(now_ms);
    }

    /// Classify a press at `now_ms`.
    ///
    /// A [`DownDecision::Spawn`] opens the throttle window only once the caller
    /// confirms it with [`commit_spawn`](Self::commit_spawn). Release-family
    /// kinds are never spawn requests and are reported as throttled.
    pub fn pointer_down(&mut self, kind: EventKind, now_ms: u64) -> DownDecision {
        if !kind.is_down() {
            return DownDecision::Throttled;
        }
        if kind.is_touch() {
            self.note_touch_start(now_ms);
        } else if self
            .last_touch_start_ms
            .is_some_and(|t| now_ms.saturating_sub(t) < TOUCH_MOUSE_SUPPRESSION_MS)
        {
            return DownDecision::SyntheticMouse;
        }
        self.pointer_down = true;
        if self
            .last_spawn_ms
            .is_some_and(|t| now_ms.saturating_sub(t) < SPAWN_THROTTLE_MS)
        {
            return DownDecision::Throttled;
        }
        DownDecision::Spawn
    }

    /// Record a ripple actually spawned at `now_ms`; later presses are throttled against it.
    pub fn commit_spawn(&mut self, now_ms: u64) {
        self.last_spawn_ms = Some(now_ms);
    }

    /// Record a release.
    pub fn pointer_up(&mut self) {
        self.pointer_down = false;
    }

    /// Whether a release should start the exit of `ripple`.
    ///
    /// Visible ripples always end on release; ripples still fading in end only
    /// when configured with `terminate_on_pointer_up`.
    pub fn releases<V>(ripple: &RippleInstance<V>) -> bool
    where
        V: Copy + Eq + core::fmt::Debug,
    {
        match ripple.state() {
            RippleState::Visible => true,
            RippleState::FadingIn => ripple.config().terminate_on_pointer_up,
            RippleState::FadingOut | RippleState::Removed => false,
        }
    }
}
