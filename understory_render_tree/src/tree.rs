// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, animation, damage.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Affine, Rect};

use crate::damage::Damage;
use crate::timing::{AnimatedValue, Transition};
use crate::types::{NodeFlags, NodeId, VisualNode};

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Retained tree of visual nodes.
pub struct Tree {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    epoch: u64,
    removed: Vec<Rect>, // world bounds of nodes removed since the last commit
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tree")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &self.len())
            .field("free_list", &self.free_list.len())
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

/// Appearance of a node sampled at a point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Appearance {
    /// Current opacity.
    pub opacity: f64,
    /// Current scale around the shape center.
    pub scale: f64,
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: VisualNode,
    opacity: AnimatedValue,
    scale: AnimatedValue,
    world_transform: Affine,
    world_bounds: Rect,
    dirty: bool,
}

impl Node {
    fn new(generation: u32, local: VisualNode) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            opacity: AnimatedValue::fixed(local.opacity),
            scale: AnimatedValue::fixed(local.scale),
            local,
            world_transform: Affine::IDENTITY,
            world_bounds: Rect::ZERO,
            dirty: true,
        }
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            epoch: 0,
            removed: Vec::new(),
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Returns true if the tree has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a new node as the last child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` inserts the node as a root.
    pub fn insert(&mut self, parent: Option<NodeId>, local: VisualNode) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            if let Some(parent_node) = self.node_opt_mut(p) {
                parent_node.children.push(id);
            }
            if let Some(node) = self.node_opt_mut(id) {
                node.parent = Some(p);
            }
        }
        id
    }

    /// Remove a node (and its subtree) from the tree. Stale ids are ignored.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        let (parent, children) = match self.node_opt(id) {
            Some(n) => (n.parent, n.children.clone()),
            None => return,
        };
        if let Some(p) = parent
            && let Some(parent_node) = self.node_opt_mut(p)
        {
            parent_node.children.retain(|c| *c != id);
        }
        for child in children {
            self.remove(child);
        }
        if let Some(node) = self.nodes[id.idx()].take()
            && node.local.flags.contains(NodeFlags::VISIBLE)
            && node.world_bounds.area() > 0.0
        {
            self.removed.push(node.world_bounds);
        }
        self.free_list.push(id.idx());
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is live if its slot exists and its generation matches
    /// the generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Parent of a live node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Children of a live node in insertion order; empty for stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Local data of a live node.
    pub fn local(&self, id: NodeId) -> Option<&VisualNode> {
        self.node_opt(id).map(|n| &n.local)
    }

    /// World-space bounds computed by the last [`commit`](Self::commit).
    pub fn world_bounds(&self, id: NodeId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.world_bounds)
    }

    /// World-space bounds from the current local data, without waiting for a commit.
    pub fn current_world_bounds(&self, id: NodeId) -> Option<Rect> {
        let node = self.node_opt(id)?;
        let mut tf = node.local.local_transform;
        let mut parent = node.parent;
        while let Some(p) = parent {
            let Some(pn) = self.node_opt(p) else {
                break;
            };
            tf = pn.local.local_transform * tf;
            parent = pn.parent;
        }
        Some(tf.transform_rect_bbox(node.local.shape.bounds()))
    }

    /// Update the local transform.
    pub fn set_local_transform(&mut self, id: NodeId, tf: Affine) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.local_transform = tf;
            n.dirty = true;
        }
    }

    /// Update the fill.
    pub fn set_fill(&mut self, id: NodeId, fill: Option<String>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.fill = fill;
            n.dirty = true;
        }
    }

    /// Animate opacity towards `target`, starting from its value at `now_ms`.
    ///
    /// Returns false for stale ids.
    pub fn animate_opacity(
        &mut self,
        id: NodeId,
        target: f64,
        transition: Transition,
        now_ms: u64,
    ) -> bool {
        let Some(n) = self.node_opt_mut(id) else {
            return false;
        };
        n.opacity.retarget(target.clamp(0.0, 1.0), transition, now_ms);
        n.dirty = true;
        true
    }

    /// Animate scale (around the shape center) towards `target`, starting from its value at `now_ms`.
    ///
    /// Returns false for stale ids.
    pub fn animate_scale(
        &mut self,
        id: NodeId,
        target: f64,
        transition: Transition,
        now_ms: u64,
    ) -> bool {
        let Some(n) = self.node_opt_mut(id) else {
            return false;
        };
        n.scale.retarget(target.max(0.0), transition, now_ms);
        n.dirty = true;
        true
    }

    /// Sample the animated appearance of a node.
    pub fn sample(&self, id: NodeId, now_ms: u64) -> Option<Appearance> {
        let n = self.node_opt(id)?;
        Some(Appearance {
            opacity: n.opacity.sample(now_ms),
            scale: n.scale.sample(now_ms),
        })
    }

    /// Whether any animated property of the node is still running at `now_ms`.
    pub fn is_animating(&self, id: NodeId, now_ms: u64) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.opacity.is_running(now_ms) || n.scale.is_running(now_ms))
    }

    /// Paint order of the children of `id`: ascending z, insertion order for ties.
    pub fn paint_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self.children(id).to_vec();
        // Stable sort keeps insertion order among equal z.
        out.sort_by_key(|c| self.node_opt(*c).map(|n| n.local.z_index).unwrap_or(0));
        out
    }

    /// Recompute world transforms and bounds; return damage since the previous commit.
    pub fn commit(&mut self) -> Damage {
        self.epoch = self.epoch.wrapping_add(1);
        let mut damage = Damage {
            dirty_rects: core::mem::take(&mut self.removed),
        };
        let roots: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n {
                Some(n) if n.parent.is_none() =>
                {
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "NodeId uses 32-bit indices by design."
                    )]
                    Some(NodeId::new(i as u32, n.generation))
                }
                _ => None,
            })
            .collect();

        for root in roots {
            self.update_world_recursive(root, Affine::IDENTITY, false, &mut damage);
        }
        damage
    }

    // --- internals ---

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.generation()).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.generation() {
            return None;
        }
        Some(n)
    }

    fn update_world_recursive(
        &mut self,
        id: NodeId,
        parent_tf: Affine,
        parent_moved: bool,
        damage: &mut Damage,
    ) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        let old_bounds = node.world_bounds;
        node.world_transform = parent_tf * node.local.local_transform;
        let new_bounds = node
            .world_transform
            .transform_rect_bbox(node.local.shape.bounds());
        node.world_bounds = new_bounds;
        let touched = node.dirty || parent_moved || old_bounds != new_bounds;
        node.dirty = false;
        let visible = node.local.flags.contains(NodeFlags::VISIBLE);
        let world_tf = node.world_transform;
        let children = node.children.clone();

        if touched && visible {
            if old_bounds != new_bounds && old_bounds.area() > 0.0 {
                damage.dirty_rects.push(old_bounds);
            }
            if new_bounds.area() > 0.0 {
                damage.dirty_rects.push(new_bounds);
            }
        }

        let moved = parent_moved || old_bounds != new_bounds;
        for child in children {
            self.update_world_recursive(child, world_tf, moved, damage);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::TimingFunction;
    use crate::types::Shape;
    use kurbo::{Circle, Point, Vec2};

    fn rect_node(r: Rect) -> VisualNode {
        VisualNode {
            shape: Shape::Rect(r),
            ..Default::default()
        }
    }

    #[test]
    fn insert_links_parent_and_children() {
        let mut tree = Tree::new();
        let root = tree.insert(None, rect_node(Rect::new(0.0, 0.0, 100.0, 100.0)));
        let a = tree.insert(Some(root), rect_node(Rect::new(0.0, 0.0, 10.0, 10.0)));
        let b = tree.insert(Some(root), rect_node(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut tree = Tree::new();
        let root = tree.insert(None, rect_node(Rect::new(0.0, 0.0, 1.0, 1.0)));
        let a = tree.insert(Some(root), rect_node(Rect::new(0.0, 0.0, 1.0, 1.0)));
        assert!(tree.is_alive(a));

        tree.remove(a);
        assert!(!tree.is_alive(a));
        assert!(tree.children(root).is_empty());

        // Reuse slot; old id must remain stale.
        let b = tree.insert(Some(root), rect_node(Rect::new(0.0, 0.0, 1.0, 1.0)));
        assert!(tree.is_alive(b));
        assert!(!tree.is_alive(a));
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
    }

    #[test]
    fn remove_drops_subtree() {
        let mut tree = Tree::new();
        let root = tree.insert(None, rect_node(Rect::new(0.0, 0.0, 10.0, 10.0)));
        let mid = tree.insert(Some(root), rect_node(Rect::new(0.0, 0.0, 5.0, 5.0)));
        let leaf = tree.insert(Some(mid), rect_node(Rect::new(0.0, 0.0, 1.0, 1.0)));
        tree.remove(mid);
        assert!(!tree.is_alive(leaf));
        assert_eq!(tree.len(), 1);
        // Removing again is a no-op.
        tree.remove(mid);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn commit_computes_world_bounds_through_parents() {
        let mut tree = Tree::new();
        let root = tree.insert(
            None,
            VisualNode {
                shape: Shape::Rect(Rect::new(0.0, 0.0, 200.0, 200.0)),
                local_transform: Affine::translate(Vec2::new(50.0, 20.0)),
                ..Default::default()
            },
        );
        let disc = tree.insert(
            Some(root),
            VisualNode {
                shape: Shape::Circle(Circle::new(Point::new(10.0, 10.0), 5.0)),
                ..Default::default()
            },
        );
        let damage = tree.commit();
        assert!(!damage.is_empty());
        assert_eq!(
            tree.world_bounds(disc),
            Some(Rect::new(55.0, 25.0, 65.0, 35.0))
        );
    }

    #[test]
    fn current_world_bounds_tracks_uncommitted_moves() {
        let mut tree = Tree::new();
        let root = tree.insert(None, rect_node(Rect::new(0.0, 0.0, 100.0, 50.0)));
        let child = tree.insert(Some(root), rect_node(Rect::new(10.0, 10.0, 30.0, 20.0)));
        tree.set_local_transform(root, Affine::translate(Vec2::new(5.0, 5.0)));
        assert_eq!(tree.world_bounds(child), Some(Rect::ZERO));
        assert_eq!(
            tree.current_world_bounds(child),
            Some(Rect::new(15.0, 15.0, 35.0, 25.0))
        );
        let _ = tree.commit();
        assert_eq!(tree.world_bounds(child), tree.current_world_bounds(child));
    }

    #[test]
    fn commit_reports_removed_bounds_then_settles() {
        let mut tree = Tree::new();
        let root = tree.insert(None, rect_node(Rect::new(0.0, 0.0, 100.0, 100.0)));
        let child = tree.insert(Some(root), rect_node(Rect::new(10.0, 10.0, 20.0, 20.0)));
        let _ = tree.commit();
        assert!(tree.commit().is_empty(), "no changes, no damage");

        tree.remove(child);
        let damage = tree.commit();
        assert_eq!(
            damage.union_rect(),
            Some(Rect::new(10.0, 10.0, 20.0, 20.0))
        );
    }

    #[test]
    fn animation_samples_over_time() {
        let mut tree = Tree::new();
        let n = tree.insert(
            None,
            VisualNode {
                opacity: 0.0,
                scale: 0.0,
                ..Default::default()
            },
        );
        let tr = Transition::new(200, TimingFunction::LINEAR);
        assert!(tree.animate_opacity(n, 1.0, tr, 0));
        assert!(tree.animate_scale(n, 1.0, tr, 0));
        let mid = tree.sample(n, 100).unwrap();
        assert!((mid.opacity - 0.5).abs() < 1e-6);
        assert!((mid.scale - 0.5).abs() < 1e-6);
        assert!(tree.is_animating(n, 100));
        assert_eq!(
            tree.sample(n, 200),
            Some(Appearance {
                opacity: 1.0,
                scale: 1.0
            })
        );
        assert!(!tree.is_animating(n, 200));
    }

    #[test]
    fn stale_ids_are_ignored_by_mutators() {
        let mut tree = Tree::new();
        let n = tree.insert(None, VisualNode::default());
        tree.remove(n);
        assert!(!tree.animate_opacity(n, 0.0, Transition::NONE, 0));
        assert!(!tree.animate_scale(n, 0.0, Transition::NONE, 0));
        assert!(tree.sample(n, 0).is_none());
        tree.set_fill(n, Some("red".into()));
        assert!(tree.local(n).is_none());
    }

    #[test]
    fn paint_order_sorts_by_z_then_insertion() {
        let mut tree = Tree::new();
        let root = tree.insert(None, VisualNode::default());
        let a = tree.insert(
            Some(root),
            VisualNode {
                z_index: 2,
                ..Default::default()
            },
        );
        let b = tree.insert(Some(root), VisualNode::default());
        let c = tree.insert(Some(root), VisualNode::default());
        assert_eq!(tree.paint_order(root), [b, c, a]);
    }
}
