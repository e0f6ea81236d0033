// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage summary returned by [`Tree::commit`](crate::Tree::commit).

use alloc::vec::Vec;
use kurbo::Rect;

/// Coarse damage: world-space rectangles that need repainting.
#[derive(Clone, Debug, Default)]
pub struct Damage {
    /// Rectangles touched since the previous commit (added, removed, moved, or restyled nodes).
    pub dirty_rects: Vec<Rect>,
}

impl Damage {
    /// Union of all dirty rectangles, if any.
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.dirty_rects.iter();
        let first = *it.next()?;
        Some(it.fold(first, |acc, r| acc.union(*r)))
    }

    /// Returns true if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.dirty_rects.is_empty()
    }
}
