// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_ripple --heading-base-level=0

//! Understory Ripple: a deterministic, `no_std` ripple feedback engine for UI hosts.
//!
//! ## Overview
//!
//! A ripple is the circular visual that grows from a pointer press on an
//! interactive element and fades away afterwards. This crate owns the policy:
//! where a ripple starts, how big it gets, when it fades, and how overlapping
//! mouse and touch input is reconciled. The host toolkit owns the pixels, behind
//! the [`HostSurface`](crate::surface::HostSurface) trait.
//!
//! ## Pieces
//!
//! - [`RippleRenderer`](crate::renderer::RippleRenderer): binds to a host, handles
//!   forwarded [`PointerEvent`](crate::types::PointerEvent)s, drives timers, and
//!   exposes programmatic controls.
//! - [`PointerCoordinator`](crate::coordinator::PointerCoordinator): touch/mouse
//!   deduplication, spawn throttling, release eligibility.
//! - [`RippleInstance`](crate::instance::RippleInstance): one ripple and its
//!   `FadingIn → Visible → FadingOut → Removed` state machine.
//! - [`RippleRegistry`](crate::registry::RippleRegistry): the live ripples of a
//!   host, with bulk fade and removal.
//! - [`geometry`](crate::geometry): origin and radius computation.
//! - [`config`](crate::config): option layering (built-in defaults, host
//!   defaults, per-launch overrides) and resolved configuration.
//! - [`TimerQueue`](crate::timer::TimerQueue): cancellable deadlines keyed by ripple.
//!
//! ## Time
//!
//! The engine never reads a clock. Events carry millisecond timestamps and the
//! embedder calls [`RippleRenderer::advance`](crate::renderer::RippleRenderer::advance)
//! to fire due timers, which makes every lifecycle reproducible in tests.
//!
//! ## Adapters
//!
//! With the `render_tree_adapter` feature,
//! `adapters::render_tree::RenderTreeHost` implements the host surface over an
//! `understory_render_tree::Tree`, mapping visuals to child nodes and transitions
//! to animated node properties.
//!
//! ## Example
//!
//! ```
//! use kurbo::Rect;
//! use understory_ripple::config::{AnimationOptions, RippleOptions};
//! use understory_ripple::renderer::RippleRenderer;
//! use understory_ripple::surface::{
//!     HostSurface, RippleVisual, SurfaceError, VisualProperty, VisualTransition,
//! };
//! use understory_ripple::types::{EventFamilies, ListenerScope, RippleState};
//!
//! #[derive(Default)]
//! struct Button { visuals: Vec<u32> }
//!
//! impl HostSurface for Button {
//!     type Visual = u32;
//!     fn bounds(&self) -> Result<Rect, SurfaceError> { Ok(Rect::new(0.0, 0.0, 120.0, 40.0)) }
//!     fn attach_visual(&mut self, _: &RippleVisual) -> Result<u32, SurfaceError> {
//!         let v = self.visuals.last().map_or(0, |v| v + 1);
//!         self.visuals.push(v);
//!         Ok(v)
//!     }
//!     fn animate_visual(&mut self, _: u32, _: VisualProperty, _: VisualTransition) -> Result<(), SurfaceError> { Ok(()) }
//!     fn detach_visual(&mut self, v: u32) -> Result<(), SurfaceError> {
//!         self.visuals.retain(|x| *x != v);
//!         Ok(())
//!     }
//!     fn subscribe(&mut self, _: ListenerScope, _: EventFamilies) -> Result<(), SurfaceError> { Ok(()) }
//!     fn unsubscribe(&mut self, _: ListenerScope, _: EventFamilies) -> Result<(), SurfaceError> { Ok(()) }
//! }
//!
//! let mut renderer = RippleRenderer::new();
//! renderer.attach_host(Button::default(), RippleOptions::new().with_color("#6200ee"));
//!
//! // A persistent ripple stays until it is explicitly faded.
//! let id = renderer
//!     .launch_centered(
//!         &RippleOptions::new()
//!             .with_persistent(true)
//!             .with_animation(AnimationOptions::new().with_exit_duration_ms(100.0)),
//!     )
//!     .unwrap();
//! renderer.advance(1_000);
//! assert_eq!(renderer.state(id), Some(RippleState::Visible));
//!
//! renderer.fade_out_all();
//! renderer.advance(1_100);
//! assert!(renderer.is_empty());
//! assert!(renderer.surface().unwrap().visuals.is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod config;
pub mod coordinator;
pub mod geometry;
pub mod instance;
pub mod registry;
pub mod renderer;
pub mod surface;
pub mod timer;
pub mod types;

#[cfg(test)]
mod test_support;
