// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host surface over an Understory Render Tree.
//!
//! ## Feature
//!
//! Enable with `render_tree_adapter`.
//!
//! ## Notes
//!
//! The host is an existing node of the tree. Each ripple visual becomes a child
//! node, positioned relative to the top-left of the host shape, and visual
//! transitions map onto the node's animated opacity and scale. Pointer
//! coordinates are expected in the tree's world space.
//!
//! Two primitives are offered. [`PrimitiveKind::Block`] realises the ripple as a
//! fully rounded square, the way a box-model host would; [`PrimitiveKind::Vector`]
//! uses a true circle.

use kurbo::{Affine, Circle, Rect, RoundedRect};
use understory_render_tree::{
    NodeFlags, NodeId, Shape, TimingFunction, Transition, Tree, VisualNode,
};

use crate::config::Easing;
use crate::surface::{HostSurface, RippleVisual, SurfaceError, VisualProperty, VisualTransition};
use crate::types::{EventFamilies, ListenerScope};

/// Shape used for ripple nodes.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum PrimitiveKind {
    /// A square with corner radius equal to half its side.
    #[default]
    Block,
    /// A circle.
    Vector,
}

/// A [`HostSurface`] that decorates one node of a render [`Tree`].
#[derive(Debug)]
pub struct RenderTreeHost {
    tree: Tree,
    host: NodeId,
    primitive: PrimitiveKind,
    host_listeners: EventFamilies,
    global_listeners: EventFamilies,
}

impl RenderTreeHost {
    /// Wrap `tree`, decorating `host` with visuals of the given primitive.
    pub fn new(tree: Tree, host: NodeId, primitive: PrimitiveKind) -> Self {
        Self {
            tree,
            host,
            primitive,
            host_listeners: EventFamilies::empty(),
            global_listeners: EventFamilies::empty(),
        }
    }

    /// The underlying tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The underlying tree, mutably (layout changes, host removal, commits).
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// The decorated node.
    pub fn host(&self) -> NodeId {
        self.host
    }

    /// Event families currently subscribed in `scope`.
    pub fn listeners(&self, scope: ListenerScope) -> EventFamilies {
        match scope {
            ListenerScope::Host => self.host_listeners,
            ListenerScope::Global => self.global_listeners,
        }
    }

    /// Give the tree back.
    pub fn into_tree(self) -> Tree {
        self.tree
    }

    fn shape_for(&self, visual: &RippleVisual) -> Shape {
        match self.primitive {
            PrimitiveKind::Block => {
                Shape::RoundedRect(RoundedRect::from_rect(visual.bounds(), visual.radius))
            }
            PrimitiveKind::Vector => Shape::Circle(Circle::new(visual.center, visual.radius)),
        }
    }

    fn owned(&self, visual: NodeId) -> Result<(), SurfaceError> {
        if !self.tree.is_alive(self.host) {
            return Err(SurfaceError::Detached);
        }
        if self.tree.parent(visual) != Some(self.host) {
            return Err(SurfaceError::UnknownVisual);
        }
        Ok(())
    }

    fn listeners_mut(&mut self, scope: ListenerScope) -> &mut EventFamilies {
        match scope {
            ListenerScope::Host => &mut self.host_listeners,
            ListenerScope::Global => &mut self.global_listeners,
        }
    }
}

fn timing(easing: Easing) -> TimingFunction {
    TimingFunction::cubic_bezier(easing.x1, easing.y1, easing.x2, easing.y2)
}

impl HostSurface for RenderTreeHost {
    type Visual = NodeId;

    fn bounds(&self) -> Result<Rect, SurfaceError> {
        self.tree
            .current_world_bounds(self.host)
            .ok_or(SurfaceError::Detached)
    }

    fn attach_visual(&mut self, visual: &RippleVisual) -> Result<NodeId, SurfaceError> {
        let host_shape = self
            .tree
            .local(self.host)
            .ok_or(SurfaceError::Detached)?
            .shape
            .bounds();
        let node = VisualNode {
            shape: self.shape_for(visual),
            local_transform: Affine::translate(host_shape.origin().to_vec2()),
            fill: Some(visual.color.clone()),
            opacity: visual.opacity,
            scale: visual.scale,
            z_index: 0,
            flags: NodeFlags::VISIBLE,
        };
        Ok(self.tree.insert(Some(self.host), node))
    }

    fn animate_visual(
        &mut self,
        visual: NodeId,
        property: VisualProperty,
        transition: VisualTransition,
    ) -> Result<(), SurfaceError> {
        self.owned(visual)?;
        let t = Transition::new(transition.duration_ms, timing(transition.easing));
        let animated = match property {
            VisualProperty::Opacity(o) => self.tree.animate_opacity(visual, o, t, transition.start_ms),
            VisualProperty::Scale(s) => self.tree.animate_scale(visual, s, t, transition.start_ms),
        };
        if animated {
            Ok(())
        } else {
            Err(SurfaceError::UnknownVisual)
        }
    }

    fn detach_visual(&mut self, visual: NodeId) -> Result<(), SurfaceError> {
        self.owned(visual)?;
        self.tree.remove(visual);
        Ok(())
    }

    fn subscribe(&mut self, scope: ListenerScope, events: EventFamilies) -> Result<(), SurfaceError> {
        if !self.tree.is_alive(self.host) {
            return Err(SurfaceError::Detached);
        }
        self.listeners_mut(scope).insert(events);
        Ok(())
    }

    fn unsubscribe(
        &mut self,
        scope: ListenerScope,
        events: EventFamilies,
    ) -> Result<(), SurfaceError> {
        self.listeners_mut(scope).remove(events);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RippleOptions;
    use crate::renderer::RippleRenderer;
    use crate::types::{EventKind, PointerEvent, RippleState};
    use kurbo::{Point, Vec2};

    fn host_tree() -> (Tree, NodeId) {
        let mut tree = Tree::new();
        let root = tree.insert(
            None,
            VisualNode {
                shape: Shape::Rect(Rect::new(0.0, 0.0, 400.0, 300.0)),
                ..Default::default()
            },
        );
        let button = tree.insert(
            Some(root),
            VisualNode {
                shape: Shape::Rect(Rect::new(0.0, 0.0, 100.0, 100.0)),
                local_transform: Affine::translate(Vec2::new(50.0, 20.0)),
                ..Default::default()
            },
        );
        (tree, button)
    }

    fn renderer(primitive: PrimitiveKind) -> RippleRenderer<RenderTreeHost> {
        let (tree, button) = host_tree();
        let mut r = RippleRenderer::new();
        r.attach_host(RenderTreeHost::new(tree, button, primitive), RippleOptions::new());
        r
    }

    #[test]
    fn bounds_follow_host_transform() {
        let (tree, button) = host_tree();
        let mut host = RenderTreeHost::new(tree, button, PrimitiveKind::Block);
        assert_eq!(host.bounds(), Ok(Rect::new(50.0, 20.0, 150.0, 120.0)));
        host.tree_mut()
            .set_local_transform(button, Affine::translate(Vec2::new(0.0, 100.0)));
        assert_eq!(host.bounds(), Ok(Rect::new(0.0, 100.0, 100.0, 200.0)));
    }

    #[test]
    fn press_spawns_child_node_under_host() {
        let mut r = renderer(PrimitiveKind::Vector);
        r.handle_event(&PointerEvent::new(EventKind::MouseDown, (50.0, 20.0), 0));
        let ripple = r.ripples().next().unwrap();
        assert_eq!(ripple.origin(), Point::ZERO);
        let node = ripple.visual();
        let host = r.surface().unwrap();
        assert_eq!(host.tree().parent(node), Some(host.host()));
        assert_eq!(host.listeners(ListenerScope::Host), EventFamilies::POINTER_DOWN);

        let local = host.tree().local(node).unwrap();
        assert_eq!(local.fill.as_deref(), Some("rgba(0, 0, 0, 0.3)"));
        match local.shape {
            Shape::Circle(c) => {
                assert_eq!(c.center, Point::ZERO);
                assert!((c.radius - 141.421_356).abs() < 1e-5);
            }
            other => panic!("expected circle, got {other:?}"),
        }
        assert_eq!(
            host.tree().current_world_bounds(node).map(|b| b.center()),
            Some(Point::new(50.0, 20.0))
        );
    }

    #[test]
    fn block_primitive_is_fully_rounded() {
        let mut r = renderer(PrimitiveKind::Block);
        let id = r
            .launch_centered(&RippleOptions::new().with_radius(10.0))
            .unwrap();
        let node = r.ripple(id).unwrap().visual();
        let shape = r.surface().unwrap().tree().local(node).unwrap().shape;
        match shape {
            Shape::RoundedRect(rr) => {
                assert_eq!(rr.rect(), Rect::new(40.0, 40.0, 60.0, 60.0));
                assert_eq!(rr.radii().top_left, 10.0);
            }
            other => panic!("expected rounded rect, got {other:?}"),
        }
    }

    #[test]
    fn transitions_drive_node_appearance() {
        let mut r = renderer(PrimitiveKind::Vector);
        let id = r.launch((60.0, 30.0), &RippleOptions::new()).unwrap();
        let node = r.ripple(id).unwrap().visual();
        {
            let tree = r.surface().unwrap().tree();
            assert_eq!(tree.sample(node, 0).unwrap().opacity, 0.0);
            let end = tree.sample(node, 225).unwrap();
            assert_eq!((end.opacity, end.scale), (1.0, 1.0));
        }
        r.advance(225);
        assert_eq!(r.state(id), Some(RippleState::FadingOut));
        let tree = r.surface().unwrap().tree();
        assert_eq!(tree.sample(node, 375).unwrap().opacity, 0.0);

        r.advance(375);
        assert!(!r.surface().unwrap().tree().is_alive(node));
    }

    #[test]
    fn removed_host_is_reported_detached() {
        let mut r = renderer(PrimitiveKind::Block);
        let host = r.surface().unwrap().host();
        r.surface_mut().unwrap().tree_mut().remove(host);
        r.handle_event(&PointerEvent::new(EventKind::TouchStart, (60.0, 30.0), 0));
        assert!(r.is_empty());
        let surface = r.detach_host().unwrap();
        assert_eq!(surface.listeners(ListenerScope::Global), EventFamilies::empty());
    }

    #[test]
    fn foreign_nodes_are_rejected() {
        let (tree, button) = host_tree();
        let mut host = RenderTreeHost::new(tree, button, PrimitiveKind::Vector);
        let stranger = host.tree_mut().insert(None, VisualNode::default());
        assert_eq!(host.detach_visual(stranger), Err(SurfaceError::UnknownVisual));
        assert!(host.tree().is_alive(stranger));
    }

    #[test]
    fn detach_host_removes_every_ripple_node() {
        let mut r = renderer(PrimitiveKind::Vector);
        r.launch((60.0, 30.0), &RippleOptions::new());
        r.launch((70.0, 40.0), &RippleOptions::new().with_persistent(true));
        let surface = r.detach_host().unwrap();
        assert!(surface.tree().children(surface.host()).is_empty());
    }
}
