// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ripple renderer: host binding, state machine driver, teardown.
//!
//! ## Overview
//!
//! [`RippleRenderer`] binds to one [`HostSurface`] at a time. While bound it
//! turns forwarded pointer events into ripples, drives each ripple through
//! `FadingIn → Visible → FadingOut → Removed` with per-ripple timers, and
//! exposes programmatic controls (`launch`, `fade_out_all`, ...).
//!
//! ## Time
//!
//! The renderer has no clock of its own. Every [`PointerEvent`] carries a
//! timestamp, and the embedder calls [`RippleRenderer::advance`] (typically once
//! per frame) to fire due timers. Handling an event first fires every timer due
//! at or before its timestamp, so effects are applied in time order. The clock
//! never moves backwards; stale timestamps are treated as "now".
//!
//! ## Lifecycle
//!
//! - Enter timer (`enter_duration_ms` after spawn): `FadingIn → Visible`, and a
//!   non-persistent ripple immediately starts fading out.
//! - Exit timer (`exit_duration_ms` after the fade starts): the visual is
//!   detached and the ripple evicted.
//! - A release fades out visible ripples, and fading-in ripples configured with
//!   `terminate_on_pointer_up`.
//! - [`RippleRenderer::detach_host`] cancels every pending timer, removes every
//!   visual, then unsubscribes every listener, in that order.
//!
//! Operations on an unbound renderer are silent no-ops.
//!
//! ```
//! use kurbo::Rect;
//! use understory_ripple::config::RippleOptions;
//! use understory_ripple::renderer::RippleRenderer;
//! use understory_ripple::surface::{
//!     HostSurface, RippleVisual, SurfaceError, VisualProperty, VisualTransition,
//! };
//! use understory_ripple::types::{EventFamilies, EventKind, ListenerScope, PointerEvent, RippleState};
//!
//! /// A host that only counts attached visuals.
//! struct Counter { live: u32, next: u32 }
//!
//! impl HostSurface for Counter {
//!     type Visual = u32;
//!     fn bounds(&self) -> Result<Rect, SurfaceError> { Ok(Rect::new(0.0, 0.0, 100.0, 100.0)) }
//!     fn attach_visual(&mut self, _: &RippleVisual) -> Result<u32, SurfaceError> {
//!         self.live += 1;
//!         self.next += 1;
//!         Ok(self.next)
//!     }
//!     fn animate_visual(&mut self, _: u32, _: VisualProperty, _: VisualTransition) -> Result<(), SurfaceError> { Ok(()) }
//!     fn detach_visual(&mut self, _: u32) -> Result<(), SurfaceError> { self.live -= 1; Ok(()) }
//!     fn subscribe(&mut self, _: ListenerScope, _: EventFamilies) -> Result<(), SurfaceError> { Ok(()) }
//!     fn unsubscribe(&mut self, _: ListenerScope, _: EventFamilies) -> Result<(), SurfaceError> { Ok(()) }
//! }
//!
//! let mut renderer = RippleRenderer::new();
//! renderer.attach_host(Counter { live: 0, next: 0 }, RippleOptions::new());
//!
//! renderer.handle_event(&PointerEvent::new(EventKind::MouseDown, (10.0, 10.0), 0));
//! let id = renderer.ripples().next().unwrap().id();
//! assert_eq!(renderer.state(id), Some(RippleState::FadingIn));
//!
//! renderer.advance(225);
//! assert_eq!(renderer.state(id), Some(RippleState::FadingOut));
//!
//! renderer.advance(375);
//! assert_eq!(renderer.state(id), None);
//! assert_eq!(renderer.surface().unwrap().live, 0);
//! ```

use alloc::vec::Vec;

use kurbo::Point;

use crate::config::RippleOptions;
use crate::coordinator::{DownDecision, PointerCoordinator};
use crate::instance::RippleInstance;
use crate::registry::RippleRegistry;
use crate::surface::HostSurface;
use crate::timer::{Timer, TimerKind, TimerQueue};
use crate::types::{EventKind, PointerEvent, RippleId, RippleState, StateChange};

/// Everything tied to one mounted host.
struct HostBinding<S: HostSurface> {
    surface: S,
    defaults: RippleOptions,
    coordinator: PointerCoordinator,
    registry: RippleRegistry<S::Visual>,
    timers: TimerQueue,
}

impl<S: HostSurface> HostBinding<S> {
    /// Schedule removal after the exit duration and drop any pending enter timer.
    fn schedule_exit(&mut self, id: RippleId, now_ms: u64, changes: &mut Vec<StateChange>) {
        let Some(instance) = self.registry.get(id) else {
            return;
        };
        let exit = instance.config().animation.exit_duration_ms;
        self.timers.cancel(id, TimerKind::EnterComplete);
        self.timers
            .schedule(now_ms.saturating_add(exit), id, TimerKind::ExitComplete);
        record(changes, id, RippleState::FadingOut, now_ms);
    }

    fn schedule_exits(&mut self, ids: &[RippleId], now_ms: u64, changes: &mut Vec<StateChange>) {
        for id in ids {
            self.schedule_exit(*id, now_ms, changes);
        }
    }

    fn fire(&mut self, timer: Timer, changes: &mut Vec<StateChange>) {
        let at = timer.deadline_ms;
        match timer.kind {
            TimerKind::EnterComplete => {
                let Some(instance) = self.registry.get_mut(timer.ripple) else {
                    return;
                };
                if !instance.mark_visible() {
                    return;
                }
                record(changes, timer.ripple, RippleState::Visible, at);
                if !instance.is_persistent() && instance.fade_out(&mut self.surface, at) {
                    self.schedule_exit(timer.ripple, at, changes);
                }
            }
            TimerKind::ExitComplete => {
                if self
                    .registry
                    .remove_by_id(&mut self.surface, timer.ripple)
                    .is_some()
                {
                    record(changes, timer.ripple, RippleState::Removed, at);
                }
            }
        }
    }
}

fn record(changes: &mut Vec<StateChange>, id: RippleId, state: RippleState, at_ms: u64) {
    tracing::trace!(ripple = id.get(), ?state, at_ms, "ripple state");
    changes.push(StateChange { id, state, at_ms });
}

/// Drives ripples for one host at a time.
pub struct RippleRenderer<S: HostSurface> {
    binding: Option<HostBinding<S>>,
    disabled: bool,
    now_ms: u64,
    next_id: u64,
    changes: Vec<StateChange>,
}

impl<S: HostSurface> core::fmt::Debug for RippleRenderer<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RippleRenderer")
            .field("attached", &self.binding.is_some())
            .field("ripples", &self.len())
            .field("pending_timers", &self.pending_timers())
            .field("disabled", &self.disabled)
            .field("now_ms", &self.now_ms)
            .finish_non_exhaustive()
    }
}

impl<S: HostSurface> Default for RippleRenderer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: HostSurface> RippleRenderer<S> {
    /// Create an unbound, enabled renderer with its clock at zero.
    pub fn new() -> Self {
        Self {
            binding: None,
            disabled: false,
            now_ms: 0,
            next_id: 0,
            changes: Vec::new(),
        }
    }

    // --- host binding ---

    /// Bind to `surface` with host-level default options and install listeners.
    ///
    /// An existing binding is torn down first; its surface is returned.
    pub fn attach_host(&mut self, surface: S, host_defaults: RippleOptions) -> Option<S> {
        let previous = self.detach_host();
        let mut binding = HostBinding {
            surface,
            defaults: host_defaults,
            coordinator: PointerCoordinator::new(),
            registry: RippleRegistry::new(),
            timers: TimerQueue::new(),
        };
        binding.coordinator.subscribe(&mut binding.surface);
        tracing::debug!("ripple host attached");
        self.binding = Some(binding);
        previous
    }

    /// Tear down the current binding and hand the surface back.
    ///
    /// Cancels all pending timers, force-removes every ripple regardless of
    /// state, then unsubscribes all listeners. Returns `None` when unbound.
    pub fn detach_host(&mut self) -> Option<S> {
        let mut binding = self.binding.take()?;
        let cancelled = binding.timers.cancel_all();
        let removed = binding.registry.remove_where(&mut binding.surface, |_| true);
        for instance in &removed {
            record(&mut self.changes, instance.id(), RippleState::Removed, self.now_ms);
        }
        binding.coordinator.unsubscribe(&mut binding.surface);
        tracing::debug!(cancelled, removed = removed.len(), "ripple host detached");
        Some(binding.surface)
    }

    /// Whether a host is bound.
    pub fn is_attached(&self) -> bool {
        self.binding.is_some()
    }

    /// The bound surface.
    pub fn surface(&self) -> Option<&S> {
        self.binding.as_ref().map(|b| &b.surface)
    }

    /// The bound surface, mutably (for host-side updates such as layout).
    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.binding.as_mut().map(|b| &mut b.surface)
    }

    /// Host-level defaults of the current binding.
    pub fn host_defaults(&self) -> Option<&RippleOptions> {
        self.binding.as_ref().map(|b| &b.defaults)
    }

    /// Replace the host-level defaults; affects ripples spawned afterwards.
    pub fn set_host_defaults(&mut self, defaults: RippleOptions) {
        if let Some(binding) = self.binding.as_mut() {
            binding.defaults = defaults;
        }
    }

    /// Suppress (or re-enable) spawning from pointer presses.
    ///
    /// [`launch`](Self::launch) and existing ripples are unaffected.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Whether pointer spawning is suppressed.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    // --- time and events ---

    /// Engine clock.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Move the clock to `now_ms` and fire every timer due by then, in order.
    pub fn advance(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
        let now = self.now_ms;
        let Some(binding) = self.binding.as_mut() else {
            return;
        };
        while let Some(timer) = binding.timers.pop_due(now) {
            tracing::trace!(ripple = timer.ripple.get(), kind = ?timer.kind, "ripple timer");
            binding.fire(timer, &mut self.changes);
        }
    }

    /// Handle one forwarded pointer event.
    pub fn handle_event(&mut self, event: &PointerEvent) {
        self.advance(event.timestamp_ms);
        if self.binding.is_none() {
            tracing::debug!(kind = ?event.kind, "no ripple host; event dropped");
            return;
        }
        if event.kind.is_down() {
            self.pointer_down(event.kind, event.position);
        } else {
            self.pointer_up();
        }
    }

    fn pointer_down(&mut self, kind: EventKind, position: Point) {
        let now = self.now_ms;
        let Some(binding) = self.binding.as_mut() else {
            return;
        };
        if self.disabled {
            if kind.is_touch() {
                binding.coordinator.note_touch_start(now);
            }
            tracing::debug!(?kind, "ripples disabled; press ignored");
            return;
        }
        match binding.coordinator.pointer_down(kind, now) {
            DownDecision::Spawn => {
                if self.spawn(position, None).is_some()
                    && let Some(binding) = self.binding.as_mut()
                {
                    binding.coordinator.commit_spawn(now);
                }
            }
            DownDecision::SyntheticMouse => {
                tracing::debug!("synthetic mouse press after touch ignored");
            }
            DownDecision::Throttled => {
                tracing::debug!(?kind, "press throttled");
            }
        }
    }

    fn pointer_up(&mut self) {
        let now = self.now_ms;
        let Some(binding) = self.binding.as_mut() else {
            return;
        };
        binding.coordinator.pointer_up();
        let started =
            binding
                .registry
                .fade_out_where(&mut binding.surface, now, PointerCoordinator::releases);
        binding.schedule_exits(&started, now, &mut self.changes);
    }

    /// Whether a press is currently held on the bound host.
    pub fn is_pointer_down(&self) -> bool {
        self.binding
            .as_ref()
            .is_some_and(|b| b.coordinator.is_pointer_down())
    }

    // --- programmatic control ---

    /// Spawn a ripple at `position` (surface coordinates), bypassing pointer filtering.
    ///
    /// `overrides` merge over the host defaults. Works while disabled. Returns
    /// `None` when no host is bound or the host is detached.
    pub fn launch(
        &mut self,
        position: impl Into<Point>,
        overrides: &RippleOptions,
    ) -> Option<RippleId> {
        self.spawn(position.into(), Some(overrides))
    }

    /// Spawn a ripple at the host center.
    pub fn launch_centered(&mut self, overrides: &RippleOptions) -> Option<RippleId> {
        let overrides = overrides.clone().with_centered(true);
        self.spawn(Point::ZERO, Some(&overrides))
    }

    /// Start the exit of one ripple. Returns false if it is unknown or already fading out.
    pub fn fade_out(&mut self, id: RippleId) -> bool {
        let now = self.now_ms;
        let Some(binding) = self.binding.as_mut() else {
            return false;
        };
        let Some(instance) = binding.registry.get_mut(id) else {
            return false;
        };
        if !instance.fade_out(&mut binding.surface, now) {
            return false;
        }
        binding.schedule_exit(id, now, &mut self.changes);
        true
    }

    /// Fade out every live ripple, persistent ones included.
    pub fn fade_out_all(&mut self) {
        let now = self.now_ms;
        let Some(binding) = self.binding.as_mut() else {
            return;
        };
        let started = binding.registry.fade_out_all(&mut binding.surface, now);
        binding.schedule_exits(&started, now, &mut self.changes);
    }

    /// Fade out every live ripple that is not persistent.
    pub fn fade_out_all_non_persistent(&mut self) {
        let now = self.now_ms;
        let Some(binding) = self.binding.as_mut() else {
            return;
        };
        let started = binding
            .registry
            .fade_out_all_non_persistent(&mut binding.surface, now);
        binding.schedule_exits(&started, now, &mut self.changes);
    }

    fn spawn(&mut self, pointer: Point, overrides: Option<&RippleOptions>) -> Option<RippleId> {
        let now = self.now_ms;
        let Some(binding) = self.binding.as_mut() else {
            tracing::debug!("no ripple host; launch ignored");
            return None;
        };
        let host = match binding.surface.bounds() {
            Ok(rect) => rect,
            Err(err) => {
                tracing::debug!(%err, "ripple host unavailable");
                return None;
            }
        };
        if !pointer.is_finite() || !host.is_finite() {
            tracing::debug!("non-finite ripple geometry; spawn skipped");
            return None;
        }
        let config = match overrides {
            Some(o) => o.merged_over(&binding.defaults).resolve(),
            None => binding.defaults.resolve(),
        };
        let id = RippleId::new(self.next_id);
        let instance =
            match RippleInstance::spawn(id, &mut binding.surface, host, pointer, config, now) {
                Ok(instance) => instance,
                Err(err) => {
                    tracing::debug!(%err, "ripple visual not attached");
                    return None;
                }
            };
        self.next_id += 1;
        tracing::debug!(
            ripple = id.get(),
            x = instance.origin().x,
            y = instance.origin().y,
            radius = instance.radius(),
            "ripple spawned"
        );
        let enter = instance.config().animation.enter_duration_ms;
        binding.registry.add(instance);
        binding
            .timers
            .schedule(now.saturating_add(enter), id, TimerKind::EnterComplete);
        record(&mut self.changes, id, RippleState::FadingIn, now);
        Some(id)
    }

    // --- reads ---

    /// State of a live ripple; `None` once removed.
    pub fn state(&self, id: RippleId) -> Option<RippleState> {
        self.ripple(id).map(RippleInstance::state)
    }

    /// A live ripple.
    pub fn ripple(&self, id: RippleId) -> Option<&RippleInstance<S::Visual>> {
        self.binding.as_ref()?.registry.get(id)
    }

    /// Live ripples in spawn order.
    pub fn ripples(&self) -> impl Iterator<Item = &RippleInstance<S::Visual>> + '_ {
        self.binding.iter().flat_map(|b| b.registry.iter())
    }

    /// Number of live ripples.
    pub fn len(&self) -> usize {
        self.binding.as_ref().map_or(0, |b| b.registry.len())
    }

    /// Returns true if no ripple is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of timers that could still fire.
    pub fn pending_timers(&self) -> usize {
        self.binding.as_ref().map_or(0, |b| b.timers.len())
    }

    /// Earliest pending timer deadline, for scheduling the next [`advance`](Self::advance).
    pub fn next_deadline(&self) -> Option<u64> {
        self.binding.as_ref()?.timers.next_deadline()
    }

    /// Drain the journal of state changes since the last call.
    pub fn take_state_changes(&mut self) -> Vec<StateChange> {
        core::mem::take(&mut self.changes)
    }
}
