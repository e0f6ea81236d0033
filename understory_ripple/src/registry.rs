// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The set of live ripples of one host.
//!
//! Instances are kept in insertion order so bulk operations visit them
//! deterministically. Removal always goes through the instance's own
//! [`remove`](crate::instance::RippleInstance) transition, so an evicted
//! instance has its visual detached and its state set to
//! [`Removed`](crate::types::RippleState::Removed).

use alloc::vec::Vec;

use crate::instance::RippleInstance;
use crate::surface::HostSurface;
use crate::types::RippleId;

/// Live ripples of one host, in insertion order.
#[derive(Clone, Debug)]
pub struct RippleRegistry<V> {
    entries: Vec<RippleInstance<V>>,
}

impl<V> Default for RippleRegistry<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V: Copy + Eq + core::fmt::Debug> RippleRegistry<V> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live ripples.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no ripple is live.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate live ripples in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &RippleInstance<V>> + '_ {
        self.entries.iter()
    }

    /// Look up a ripple.
    pub fn get(&self, id: RippleId) -> Option<&RippleInstance<V>> {
        self.entries.iter().find(|r| r.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: RippleId) -> Option<&mut RippleInstance<V>> {
        self.entries.iter_mut().find(|r| r.id() == id)
    }

    /// Register a freshly spawned ripple.
    pub(crate) fn add(&mut self, instance: RippleInstance<V>) {
        debug_assert!(
            self.get(instance.id()).is_none(),
            "ripple ids are never reused"
        );
        self.entries.push(instance);
    }

    /// Detach and evict one ripple. Returns the removed instance, or `None` if unknown.
    pub(crate) fn remove_by_id<S: HostSurface<Visual = V>>(
        &mut self,
        surface: &mut S,
        id: RippleId,
    ) -> Option<RippleInstance<V>> {
        let idx = self.entries.iter().position(|r| r.id() == id)?;
        let mut instance = self.entries.remove(idx);
        instance.remove(surface);
        Some(instance)
    }

    /// Detach and evict every ripple matching `pred`, in insertion order.
    pub(crate) fn remove_where<S, F>(&mut self, surface: &mut S, mut pred: F) -> Vec<RippleInstance<V>>
    where
        S: HostSurface<Visual = V>,
        F: FnMut(&RippleInstance<V>) -> bool,
    {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.entries.len());
        for mut instance in self.entries.drain(..) {
            if pred(&instance) {
                instance.remove(surface);
                removed.push(instance);
            } else {
                kept.push(instance);
            }
        }
        self.entries = kept;
        removed
    }

    /// Start the exit transition of every ripple matching `pred`.
    ///
    /// Returns the ids whose exit actually started; ripples already fading out are skipped.
    pub(crate) fn fade_out_where<S, F>(
        &mut self,
        surface: &mut S,
        now_ms: u64,
        mut pred: F,
    ) -> Vec<RippleId>
    where
        S: HostSurface<Visual = V>,
        F: FnMut(&RippleInstance<V>) -> bool,
    {
        let mut started = Vec::new();
        for instance in &mut self.entries {
            if pred(instance) && instance.fade_out(surface, now_ms) {
                started.push(instance.id());
            }
        }
        started
    }

    /// Fade out every live ripple, persistent ones included.
    pub(crate) fn fade_out_all<S: HostSurface<Visual = V>>(
        &mut self,
        surface: &mut S,
        now_ms: u64,
    ) -> Vec<RippleId> {
        self.fade_out_where(surface, now_ms, |_| true)
    }

    /// Fade out every live ripple that is not persistent.
    pub(crate) fn fade_out_all_non_persistent<S: HostSurface<Visual = V>>(
        &mut self,
        surface: &mut S,
        now_ms: u64,
    ) -> Vec<RippleId> {
        self.fade_out_where(surface, now_ms, |r| !r.is_persistent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RippleOptions;
    use crate::surface::HostSurface as _;
    use crate::test_support::RecordingSurface;
    use crate::types::RippleState;
    use alloc::vec;
    use kurbo::{Point, Rect};

    fn fill(surface: &mut RecordingSurface, persistent: &[bool]) -> RippleRegistry<u32> {
        let host = surface.bounds().unwrap();
        let mut reg = RippleRegistry::new();
        for (i, p) in persistent.iter().enumerate() {
            let inst = RippleInstance::spawn(
                RippleId::new(i as u64),
                surface,
                host,
                Point::new(5.0, 5.0),
                RippleOptions::new().with_persistent(*p).resolve(),
                0,
            )
            .unwrap();
            reg.add(inst);
        }
        reg
    }

    #[test]
    fn non_persistent_bulk_fade_skips_persistent() {
        let mut surface = RecordingSurface::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut reg = fill(&mut surface, &[false, true, false]);
        let started = reg.fade_out_all_non_persistent(&mut surface, 5);
        assert_eq!(started, vec![RippleId::new(0), RippleId::new(2)]);
        assert_eq!(
            reg.get(RippleId::new(1)).map(|r| r.state()),
            Some(RippleState::FadingIn)
        );
    }

    #[test]
    fn fade_out_all_includes_persistent_and_is_idempotent() {
        let mut surface = RecordingSurface::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut reg = fill(&mut surface, &[true, false]);
        assert_eq!(reg.fade_out_all(&mut surface, 1).len(), 2);
        assert!(reg.fade_out_all(&mut surface, 2).is_empty());
        for r in reg.iter() {
            assert_eq!(surface.exit_animations(r.visual()), 1);
        }
    }

    #[test]
    fn remove_by_id_detaches_and_evicts() {
        let mut surface = RecordingSurface::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut reg = fill(&mut surface, &[false, false]);
        let removed = reg.remove_by_id(&mut surface, RippleId::new(0)).unwrap();
        assert_eq!(removed.state(), RippleState::Removed);
        assert_eq!(reg.len(), 1);
        assert_eq!(surface.attached_count(), 1);
        assert!(reg.remove_by_id(&mut surface, RippleId::new(0)).is_none());
    }

    #[test]
    fn remove_where_keeps_order_of_survivors() {
        let mut surface = RecordingSurface::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut reg = fill(&mut surface, &[false, true, false, true]);
        let removed = reg.remove_where(&mut surface, |r| r.is_persistent());
        assert_eq!(removed.len(), 2);
        let left: Vec<_> = reg.iter().map(|r| r.id()).collect();
        assert_eq!(left, vec![RippleId::new(0), RippleId::new(2)]);
        assert_eq!(surface.attached_count(), 2);
    }
}
