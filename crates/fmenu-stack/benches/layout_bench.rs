//! Benchmarks for the stack layout pass and the interactive drag path.
//!
//! Run with: cargo bench -p fmenu-stack --bench layout_bench
//!
//! The layout pass runs once per gesture sample while a drag is live, so a
//! full measure-and-place over a realistic stack must stay well under a
//! frame.

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fmenu_core::{PanDirections, PanPhase, Point, Size};
use fmenu_panel::{ActionRow, PanelSpecification, RowEntry};
use fmenu_stack::{LayoutConstraints, NavigationStack, Presentation};
use std::hint::black_box;

const DEPTHS: [usize; 3] = [1, 2, 4];

fn make_rows(n: usize) -> Vec<RowEntry> {
    (0..n)
        .map(|i| {
            if i % 4 == 3 {
                return RowEntry::Separator;
            }
            RowEntry::from(
                ActionRow::new(format!("item-{i}"))
                    .id(i as i64)
                    .on_select(|_| {}),
            )
        })
        .collect()
}

/// Stack of `depth` panels, eight rows each, laid out once so widths are
/// settled.
fn make_stack(depth: usize) -> NavigationStack {
    let mut stack = NavigationStack::default();
    for _ in 0..depth {
        stack.push(PanelSpecification::list(make_rows(8)), None, None, false);
    }
    let _ = stack.update(constraints(), Presentation::Inline);
    stack
}

fn constraints() -> LayoutConstraints {
    LayoutConstraints::new(Size::new(400.0, 1000.0))
}

// ===========================================================================
// The settled layout pass at representative depths
// ===========================================================================

fn bench_update_settled(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/settled");

    for depth in DEPTHS {
        group.throughput(Throughput::Elements(depth as u64));
        let mut stack = make_stack(depth);
        group.bench_with_input(
            BenchmarkId::new("update", format!("{depth}deep")),
            &(),
            |b, _| b.iter(|| black_box(stack.update(constraints(), Presentation::Inline))),
        );
    }

    group.finish();
}

// ===========================================================================
// One gesture sample plus the layout it forces
// ===========================================================================

fn bench_drag_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/drag_sample");

    group.bench_function("pan_changed_then_update", |b| {
        b.iter_batched_ref(
            || {
                let mut stack = make_stack(2);
                stack.handle_pan(PanPhase::Began {
                    directions: PanDirections::RIGHT,
                });
                stack
            },
            |stack| {
                stack.handle_pan(PanPhase::Changed {
                    translation: Point::new(90.0, 0.0),
                });
                black_box(stack.update(constraints(), Presentation::Inline))
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_update_settled, bench_drag_sample);
criterion_main!(benches);
