// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ripple lifecycle on a render tree.
//!
//! This example mounts the ripple engine on a button node, presses it, and
//! steps a 60 Hz frame clock until the ripple is gone, printing state changes
//! and the damage each frame produces.
//!
//! Run:
//! - `RUST_LOG=understory_ripple=debug cargo run -p understory_demos --example ripple_lifecycle`

use kurbo::{Affine, Rect, Vec2};
use tracing_subscriber::EnvFilter;
use understory_render_tree::{Shape, Tree, VisualNode};
use understory_ripple::adapters::render_tree::{PrimitiveKind, RenderTreeHost};
use understory_ripple::config::RippleOptions;
use understory_ripple::renderer::RippleRenderer;
use understory_ripple::types::{EventKind, PointerEvent, RippleState};

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();

    let mut tree = Tree::new();
    let window = tree.insert(
        None,
        VisualNode {
            shape: Shape::Rect(Rect::new(0.0, 0.0, 640.0, 480.0)),
            ..Default::default()
        },
    );
    let button = tree.insert(
        Some(window),
        VisualNode {
            shape: Shape::Rect(Rect::new(0.0, 0.0, 160.0, 48.0)),
            local_transform: Affine::translate(Vec2::new(240.0, 216.0)),
            ..Default::default()
        },
    );
    let _ = tree.commit();

    let mut ripples = RippleRenderer::new();
    ripples.attach_host(
        RenderTreeHost::new(tree, button, PrimitiveKind::Vector),
        RippleOptions::new().with_color("rgba(98, 0, 238, 0.24)"),
    );

    ripples.handle_event(&PointerEvent::new(EventKind::MouseDown, (260.0, 230.0), 0));
    let id = ripples.ripples().next().map(|r| r.id()).expect("press spawns a ripple");
    println!("== Pressed ==\n  ripple {:?} radius {:.2}", id, ripples.ripple(id).unwrap().radius());

    let mut frame = 0_u64;
    while !ripples.is_empty() {
        frame += 1;
        let now = frame * 16;
        ripples.advance(now);
        for change in ripples.take_state_changes() {
            println!("  t={:>4}ms {:?} -> {:?}", change.at_ms, change.id, change.state);
        }
        let host = ripples.surface_mut().unwrap();
        let damage = host.tree_mut().commit();
        if let Some(area) = damage.union_rect() {
            println!("  frame {frame:>2}: damage {area:?}");
        }
    }

    // Enter (225 ms) then exit (150 ms), observed on 16 ms frame boundaries.
    assert_eq!(ripples.state(id), None);
    assert_eq!(frame, 24);
    let host = ripples.detach_host().unwrap();
    assert!(host.tree().children(button).is_empty());
    println!("== Done ==\n  {:?}", RippleState::Removed);
}
