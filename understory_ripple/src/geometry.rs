// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ripple placement: origin and radius.
//!
//! All functions are pure. Inputs are in the surface coordinate space; outputs
//! are in host-local space (origin at the top-left corner of the host bounds).
//!
//! The radius contract is coverage: without an explicit radius, a ripple at
//! full scale reaches the host corner furthest from its origin, so it covers
//! the whole host whatever the pointer position.

use kurbo::{Point, Rect, Vec2};

use crate::config::RippleConfig;

/// Where a ripple sits inside its host.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// Center in host-local coordinates.
    pub origin: Point,
    /// Full-scale radius.
    pub radius: f64,
}

impl Placement {
    /// Bounding square of the full-scale ripple, in host-local coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.origin, (2.0 * self.radius, 2.0 * self.radius))
    }
}

/// Ripple center in host-local space.
///
/// With `centered`, the host center regardless of `pointer`; otherwise `pointer`
/// translated by the host origin.
pub fn compute_origin(pointer: Point, host: Rect, config: &RippleConfig) -> Point {
    let host = host.abs();
    if config.centered {
        Point::new(host.width() / 2.0, host.height() / 2.0)
    } else {
        pointer - host.origin().to_vec2()
    }
}

/// Ripple radius for a host-local `origin`.
///
/// The configured radius verbatim when present, otherwise the distance to the
/// furthest host corner.
pub fn compute_radius(origin: Point, host: Rect, config: &RippleConfig) -> f64 {
    match config.radius {
        Some(r) => r,
        None => distance_to_furthest_corner(origin, host),
    }
}

/// Euclidean distance from a host-local point to the furthest corner of `host`.
pub fn distance_to_furthest_corner(origin: Point, host: Rect) -> f64 {
    let host = host.abs();
    let dx = origin.x.abs().max((host.width() - origin.x).abs());
    let dy = origin.y.abs().max((host.height() - origin.y).abs());
    Vec2::new(dx, dy).hypot()
}

/// Origin and radius together.
pub fn place(pointer: Point, host: Rect, config: &RippleConfig) -> Placement {
    let origin = compute_origin(pointer, host, config);
    Placement {
        origin,
        radius: compute_radius(origin, host, config),
    }
}
