// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host defaults from JSON.
//!
//! Ripple options deserialize from camelCase JSON so a theme file can carry
//! them. Per-launch overrides then layer on top of the host defaults, and
//! invalid values are clamped when the options resolve.
//!
//! Run:
//! - `cargo run -p understory_demos --example ripple_config_json`

use kurbo::{Point, Rect};
use understory_render_tree::{Shape, Tree, VisualNode};
use understory_ripple::adapters::render_tree::{PrimitiveKind, RenderTreeHost};
use understory_ripple::config::{Easing, RippleOptions};
use understory_ripple::renderer::RippleRenderer;

const THEME: &str = r#"{
    "color": "rgba(255, 255, 255, 0.35)",
    "terminateOnPointerUp": true,
    "animation": {
        "enterDurationMs": 300,
        "exitDurationMs": -20,
        "exitEasing": { "x1": 0.4, "y1": 0.0, "x2": 1.0, "y2": 1.0 }
    }
}"#;

fn main() {
    let defaults: RippleOptions = serde_json::from_str(THEME).expect("theme parses");
    let resolved = defaults.resolve();
    println!("== Theme ==\n  {resolved:?}");
    assert_eq!(resolved.animation.enter_duration_ms, 300);
    assert_eq!(resolved.animation.exit_duration_ms, 0);
    assert_eq!(resolved.animation.exit_easing, Easing::ACCELERATE);
    assert_eq!(resolved.animation.enter_easing, Easing::DECELERATE);

    let mut tree = Tree::new();
    let card = tree.insert(
        None,
        VisualNode {
            shape: Shape::Rect(Rect::new(0.0, 0.0, 300.0, 200.0)),
            ..Default::default()
        },
    );
    let mut ripples = RippleRenderer::new();
    ripples.attach_host(RenderTreeHost::new(tree, card, PrimitiveKind::Vector), defaults);

    let overrides: RippleOptions =
        serde_json::from_str(r#"{ "centered": true, "radius": 40 }"#).expect("overrides parse");
    let id = ripples.launch((10.0, 10.0), &overrides).unwrap();
    let ripple = ripples.ripple(id).unwrap();
    println!(
        "== Launch ==\n  origin {:?} radius {} color {}",
        ripple.origin(),
        ripple.radius(),
        ripple.config().color
    );
    assert_eq!(ripple.origin(), Point::new(150.0, 100.0));
    assert_eq!(ripple.radius(), 40.0);
    assert!(ripple.config().terminate_on_pointer_up);

    let json = serde_json::to_string(&overrides).expect("options serialize");
    println!("== Round trip ==\n  {json}");
    assert_eq!(json, r#"{"centered":true,"radius":40.0}"#);
}
