// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use understory_render_tree::{Shape, Tree, VisualNode};
use understory_ripple::adapters::render_tree::{PrimitiveKind, RenderTreeHost};
use understory_ripple::config::RippleOptions;
use understory_ripple::geometry;
use understory_ripple::renderer::RippleRenderer;
use understory_ripple::types::{EventKind, PointerEvent};

fn host() -> RippleRenderer<RenderTreeHost> {
    let mut tree = Tree::new();
    let node = tree.insert(
        None,
        VisualNode {
            shape: Shape::Rect(Rect::new(0.0, 0.0, 320.0, 64.0)),
            ..Default::default()
        },
    );
    let mut r = RippleRenderer::new();
    r.attach_host(
        RenderTreeHost::new(tree, node, PrimitiveKind::Vector),
        RippleOptions::new(),
    );
    r
}

fn bench_geometry(c: &mut Criterion) {
    let config = RippleOptions::new().resolve();
    let host = Rect::new(10.0, 10.0, 330.0, 74.0);
    c.bench_function("geometry/place", |b| {
        b.iter(|| geometry::place(black_box(Point::new(42.0, 30.0)), black_box(host), &config));
    });
}

fn bench_press_release(c: &mut Criterion) {
    let mut group = c.benchmark_group("renderer");
    for &n in &[16_u64, 256] {
        group.throughput(Throughput::Elements(n));
        group.bench_function(format!("press_release_{n}"), |b| {
            b.iter_batched(
                host,
                |mut r| {
                    for i in 0..n {
                        let t = i * 120;
                        r.handle_event(&PointerEvent::new(EventKind::MouseDown, (5.0, 5.0), t));
                        r.handle_event(&PointerEvent::release(EventKind::MouseUp, t + 60));
                    }
                    r.advance(n * 120 + 1_000);
                    black_box(r.len())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_bulk_fade(c: &mut Criterion) {
    c.bench_function("renderer/fade_out_all_1k", |b| {
        b.iter_batched(
            || {
                let mut r = host();
                let persistent = RippleOptions::new().with_persistent(true);
                for i in 0..1_000_u32 {
                    r.launch((f64::from(i % 320), 10.0), &persistent);
                }
                r.advance(1_000);
                r
            },
            |mut r| {
                r.fade_out_all();
                r.advance(2_000);
                black_box(r.is_empty())
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, bench_geometry, bench_press_release, bench_bulk_fade);
criterion_main!(benches);
