// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the render tree: node identifiers, flags, shapes, and local node data.

use alloc::string::String;

use kurbo::{Affine, Circle, Rect, RoundedRect, Shape as _};

/// Identifier for a node in the tree.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`Tree::is_alive`](crate::Tree::is_alive) to check whether a `NodeId` still refers to a live node.
/// Stale `NodeId`s never alias a different live node because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Node flags controlling painting and input.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible (participates in painting and damage).
        const VISIBLE  = 0b0000_0001;
        /// Node receives pointer input. Decorations such as ripples clear this.
        const POINTER_EVENTS = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::POINTER_EVENTS
    }
}

/// Paintable geometry of a node, in local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle (typical for containers).
    Rect(Rect),
    /// Rounded rectangle; a square with half-side corner radii renders as a disc.
    RoundedRect(RoundedRect),
    /// Vector circle.
    Circle(Circle),
}

impl Shape {
    /// Conservative local bounds of the shape.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Rect(r) => *r,
            Self::RoundedRect(rr) => rr.rect(),
            Self::Circle(c) => c.bounding_box(),
        }
    }

    /// Center of the shape bounds; scale animations pivot around it.
    pub fn center(&self) -> kurbo::Point {
        self.bounds().center()
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self::Rect(Rect::ZERO)
    }
}

/// Local data for a node.
#[derive(Clone, Debug)]
pub struct VisualNode {
    /// Geometry in local coordinates.
    pub shape: Shape,
    /// Local transform relative to parent space.
    pub local_transform: Affine,
    /// Optional fill, as a CSS color string.
    pub fill: Option<String>,
    /// Initial opacity in `0.0..=1.0`.
    pub opacity: f64,
    /// Initial scale around the shape center.
    pub scale: f64,
    /// Z-order within the parent. Higher is drawn on top.
    pub z_index: i32,
    /// Painting and input flags.
    pub flags: NodeFlags,
}

impl Default for VisualNode {
    fn default() -> Self {
        Self {
            shape: Shape::default(),
            local_transform: Affine::IDENTITY,
            fill: None,
            opacity: 1.0,
            scale: 1.0,
            z_index: 0,
            flags: NodeFlags::default(),
        }
    }
}
