// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch and mouse reconciliation.
//!
//! A tap on a touch screen delivers `touchstart`, `touchend`, and then a
//! compatibility `mousedown`. This example shows that only one ripple is
//! spawned, that a held ripple ends on release, and that rapid presses are
//! throttled.
//!
//! Run:
//! - `cargo run -p understory_demos --example ripple_touch_input`

use kurbo::Rect;
use understory_render_tree::{Shape, Tree, VisualNode};
use understory_ripple::adapters::render_tree::{PrimitiveKind, RenderTreeHost};
use understory_ripple::config::RippleOptions;
use understory_ripple::renderer::RippleRenderer;
use understory_ripple::types::{EventKind, PointerEvent, RippleState};

fn main() {
    let mut tree = Tree::new();
    let chip = tree.insert(
        None,
        VisualNode {
            shape: Shape::Rect(Rect::new(0.0, 0.0, 96.0, 32.0)),
            ..Default::default()
        },
    );
    let mut ripples = RippleRenderer::new();
    ripples.attach_host(
        RenderTreeHost::new(tree, chip, PrimitiveKind::Block),
        RippleOptions::new().with_persistent(true),
    );

    // Tap: touch, release, compatibility mouse press 300 ms later.
    ripples.handle_event(&PointerEvent::new(EventKind::TouchStart, (12.0, 16.0), 0));
    ripples.handle_event(&PointerEvent::release(EventKind::TouchEnd, 90));
    ripples.handle_event(&PointerEvent::new(EventKind::MouseDown, (12.0, 16.0), 300));
    let spawned: Vec<_> = ripples
        .take_state_changes()
        .into_iter()
        .filter(|c| c.state == RippleState::FadingIn)
        .collect();
    println!("== Tap ==\n  spawned {}", spawned.len());
    assert_eq!(spawned.len(), 1);

    // A persistent ripple stays until the next release.
    let id = spawned[0].id;
    ripples.advance(1_000);
    assert_eq!(ripples.state(id), Some(RippleState::Visible));
    ripples.handle_event(&PointerEvent::new(EventKind::MouseDown, (40.0, 10.0), 1_000));
    ripples.handle_event(&PointerEvent::release(EventKind::MouseUp, 1_050));
    assert_eq!(ripples.state(id), Some(RippleState::FadingOut));

    // Two presses 10 ms apart produce one ripple.
    ripples.advance(5_000);
    let before = ripples.len();
    ripples.handle_event(&PointerEvent::new(EventKind::MouseDown, (5.0, 5.0), 5_000));
    ripples.handle_event(&PointerEvent::new(EventKind::MouseDown, (5.0, 5.0), 5_010));
    println!("== Double press ==\n  ripples {} -> {}", before, ripples.len());
    assert_eq!(ripples.len(), before + 1);
}
