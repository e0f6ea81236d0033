// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A recording host surface for unit tests.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::surface::{HostSurface, RippleVisual, SurfaceError, VisualProperty, VisualTransition};
use crate::types::{EventFamilies, ListenerScope};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Op {
    Attach(u32),
    Animate(u32, VisualProperty, VisualTransition),
    Detach(u32),
    Subscribe(ListenerScope, EventFamilies),
    Unsubscribe(ListenerScope, EventFamilies),
}

/// Records every call; `bounds == None` models a host removed from the tree.
#[derive(Debug)]
pub(crate) struct RecordingSurface {
    pub(crate) bounds: Option<Rect>,
    pub(crate) ops: Vec<Op>,
    attached: Vec<(u32, RippleVisual)>,
    next: u32,
    host_listeners: EventFamilies,
    global_listeners: EventFamilies,
}

impl RecordingSurface {
    pub(crate) fn new(bounds: Rect) -> Self {
        Self {
            bounds: Some(bounds),
            ops: Vec::new(),
            attached: Vec::new(),
            next: 1,
            host_listeners: EventFamilies::empty(),
            global_listeners: EventFamilies::empty(),
        }
    }

    pub(crate) fn detach_host(&mut self) {
        self.bounds = None;
    }

    pub(crate) fn attached_count(&self) -> usize {
        self.attached.len()
    }

    pub(crate) fn attached(&self, visual: u32) -> Option<&RippleVisual> {
        self.attached
            .iter()
            .find(|(v, _)| *v == visual)
            .map(|(_, d)| d)
    }

    pub(crate) fn animations(&self, visual: u32) -> Vec<(VisualProperty, VisualTransition)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Animate(v, p, t) if *v == visual => Some((*p, *t)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn exit_animations(&self, visual: u32) -> usize {
        self.animations(visual)
            .iter()
            .filter(|(p, _)| *p == VisualProperty::Opacity(0.0))
            .count()
    }

    pub(crate) fn listeners(&self, scope: ListenerScope) -> EventFamilies {
        match scope {
            ListenerScope::Host => self.host_listeners,
            ListenerScope::Global => self.global_listeners,
        }
    }

    fn listeners_mut(&mut self, scope: ListenerScope) -> &mut EventFamilies {
        match scope {
            ListenerScope::Host => &mut self.host_listeners,
            ListenerScope::Global => &mut self.global_listeners,
        }
    }
}

impl HostSurface for RecordingSurface {
    type Visual = u32;

    fn bounds(&self) -> Result<Rect, SurfaceError> {
        self.bounds.ok_or(SurfaceError::Detached)
    }

    fn attach_visual(&mut self, visual: &RippleVisual) -> Result<u32, SurfaceError> {
        if self.bounds.is_none() {
            return Err(SurfaceError::Detached);
        }
        let id = self.next;
        self.next += 1;
        self.attached.push((id, visual.clone()));
        self.ops.push(Op::Attach(id));
        Ok(id)
    }

    fn animate_visual(
        &mut self,
        visual: u32,
        property: VisualProperty,
        transition: VisualTransition,
    ) -> Result<(), SurfaceError> {
        if self.attached(visual).is_none() {
            return Err(SurfaceError::UnknownVisual);
        }
        self.ops.push(Op::Animate(visual, property, transition));
        Ok(())
    }

    fn detach_visual(&mut self, visual: u32) -> Result<(), SurfaceError> {
        let before = self.attached.len();
        self.attached.retain(|(v, _)| *v != visual);
        if self.attached.len() == before {
            return Err(SurfaceError::UnknownVisual);
        }
        self.ops.push(Op::Detach(visual));
        Ok(())
    }

    fn subscribe(&mut self, scope: ListenerScope, events: EventFamilies) -> Result<(), SurfaceError> {
        self.listeners_mut(scope).insert(events);
        self.ops.push(Op::Subscribe(scope, events));
        Ok(())
    }

    fn unsubscribe(
        &mut self,
        scope: ListenerScope,
        events: EventFamilies,
    ) -> Result<(), SurfaceError> {
        self.listeners_mut(scope).remove(events);
        self.ops.push(Op::Unsubscribe(scope, events));
        Ok(())
    }
}
