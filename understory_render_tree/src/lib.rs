// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_render_tree --heading-base-level=0

//! Understory Render Tree: a Kurbo-native retained tree of paintable nodes.
//!
//! ## Where this fits: three-tree model
//!
//! - Widget tree: interaction/state.
//! - Box tree: geometry/spatial indexing.
//! - Render tree: paintable nodes and their animated appearance (this crate).
//!
//! Each node carries a [`Shape`], a local transform, an optional fill, and two
//! animated scalars (opacity and scale around the shape center).
//! Animations are sampled against a caller-provided millisecond clock, so the
//! tree stays deterministic and `no_std`.
//!
//! ## API overview
//!
//! - [`Tree`]: container managing nodes, animation state, and damage.
//! - [`VisualNode`]: per-node local data (shape, transform, fill, initial opacity/scale, z, flags).
//! - [`NodeId`]: generational handle of a node.
//! - [`TimingFunction`] and [`Transition`]: CSS-style cubic Bézier easing over a duration.
//!
//! Key operations:
//! - [`Tree::insert`] / [`Tree::remove`]
//! - [`Tree::animate_opacity`] / [`Tree::animate_scale`] and [`Tree::sample`]
//! - [`Tree::commit`] → [`Damage`]
//!
//! ### Minimal usage
//!
//! ```
//! use understory_render_tree::{Shape, TimingFunction, Transition, Tree, VisualNode};
//! use kurbo::{Circle, Point, Rect};
//!
//! let mut tree = Tree::new();
//! let host = tree.insert(
//!     None,
//!     VisualNode { shape: Shape::Rect(Rect::new(0.0, 0.0, 100.0, 40.0)), ..Default::default() },
//! );
//! let dot = tree.insert(
//!     Some(host),
//!     VisualNode {
//!         shape: Shape::Circle(Circle::new(Point::new(20.0, 20.0), 30.0)),
//!         opacity: 0.0,
//!         ..Default::default()
//!     },
//! );
//!
//! // Fade in over 100 ms starting at t = 0.
//! tree.animate_opacity(dot, 1.0, Transition::new(100, TimingFunction::LINEAR), 0);
//! let half = tree.sample(dot, 50).unwrap();
//! assert!((half.opacity - 0.5).abs() < 1e-6);
//!
//! let damage = tree.commit();
//! assert!(damage.union_rect().is_some());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod damage;
mod timing;
mod tree;
mod types;

pub use damage::Damage;
pub use timing::{AnimatedValue, TimingFunction, Transition};
pub use tree::{Appearance, Tree};
pub use types::{NodeFlags, NodeId, Shape, VisualNode};
