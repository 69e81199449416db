//! Benchmarks for row-list diffing and in-place list patching.
//!
//! Run with: cargo bench -p fmenu-panel --bench diff_bench
//!
//! Menu reconfiguration runs while a panel is on screen, so both the diff
//! and the patch that applies it must stay well under a frame.

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fmenu_panel::diff::diff_rows;
use fmenu_panel::list::ListPanelNode;
use fmenu_panel::row::{ActionRow, RowEntry};
use std::hint::black_box;

const SIZES: [usize; 3] = [8, 16, 32];

/// Build `n` menu rows with stable identities; every fourth slot is a
/// separator. Indices listed in `retitled` get a different title so the
/// diff sees a content change on an otherwise matched row.
fn make_rows(n: usize, retitled: &[usize]) -> Vec<RowEntry> {
    (0..n)
        .map(|i| {
            if i % 4 == 3 {
                return RowEntry::Separator;
            }
            let version = u32::from(retitled.contains(&i));
            RowEntry::from(
                ActionRow::new(format!("item-{i}-v{version}"))
                    .id(i as i64)
                    .on_select(|_| {}),
            )
        })
        .collect()
}

/// Same identities with the first quarter dropped and a fresh quarter
/// appended, the shape of a menu refining itself after a state change.
fn churned_rows(n: usize) -> Vec<RowEntry> {
    let mut rows = make_rows(n, &[]).split_off(n / 4);
    for i in 0..n / 4 {
        rows.push(RowEntry::from(
            ActionRow::new(format!("fresh-{i}"))
                .id(1_000 + i as i64)
                .on_select(|_| {}),
        ));
    }
    rows
}

// ===========================================================================
// diff_rows over representative reconfiguration shapes
// ===========================================================================

fn bench_diff_identical(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff/identical");

    for n in SIZES {
        group.throughput(Throughput::Elements(n as u64));
        let old = make_rows(n, &[]);
        let new = make_rows(n, &[]);
        group.bench_with_input(
            BenchmarkId::new("diff_rows", format!("{n}rows")),
            &(),
            |b, _| b.iter(|| black_box(diff_rows(&old, &new))),
        );
    }

    group.finish();
}

fn bench_diff_value_change(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff/value_change");

    for n in SIZES {
        group.throughput(Throughput::Elements(n as u64));
        let old = make_rows(n, &[]);
        let new = make_rows(n, &[n / 2]);
        group.bench_with_input(
            BenchmarkId::new("diff_rows", format!("{n}rows")),
            &(),
            |b, _| b.iter(|| black_box(diff_rows(&old, &new))),
        );
    }

    group.finish();
}

fn bench_diff_rotate(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff/rotate");

    for n in SIZES {
        group.throughput(Throughput::Elements(n as u64));
        let old = make_rows(n, &[]);
        let mut new = make_rows(n, &[]);
        new.rotate_left(1);
        group.bench_with_input(
            BenchmarkId::new("diff_rows", format!("{n}rows")),
            &(),
            |b, _| b.iter(|| black_box(diff_rows(&old, &new))),
        );
    }

    group.finish();
}

fn bench_diff_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff/churn_quarter");

    for n in SIZES {
        group.throughput(Throughput::Elements(n as u64));
        let old = make_rows(n, &[]);
        let new = churned_rows(n);
        group.bench_with_input(
            BenchmarkId::new("diff_rows", format!("{n}rows")),
            &(),
            |b, _| b.iter(|| black_box(diff_rows(&old, &new))),
        );
    }

    group.finish();
}

fn bench_diff_disjoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff/disjoint");

    for n in SIZES {
        group.throughput(Throughput::Elements(n as u64));
        let old = make_rows(n, &[]);
        let new: Vec<RowEntry> = (0..n)
            .map(|i| {
                RowEntry::from(
                    ActionRow::new(format!("other-{i}"))
                        .id(5_000 + i as i64)
                        .on_select(|_| {}),
                )
            })
            .collect();
        group.bench_with_input(
            BenchmarkId::new("diff_rows", format!("{n}rows")),
            &(),
            |b, _| b.iter(|| black_box(diff_rows(&old, &new))),
        );
    }

    group.finish();
}

fn bench_diff_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff/apply");

    for n in SIZES {
        let old = make_rows(n, &[]);
        let mut new = make_rows(n, &[n / 2]);
        new.rotate_left(1);
        let diff = diff_rows(&old, &new);
        group.bench_with_input(
            BenchmarkId::new("apply_to", format!("{n}rows")),
            &diff,
            |b, diff| b.iter(|| black_box(diff.apply_to(&old))),
        );
    }

    group.finish();
}

// ===========================================================================
// Live list patching (node reuse + highlight remap on top of the diff)
// ===========================================================================

fn bench_list_set_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("list/set_rows");

    for n in SIZES {
        group.throughput(Throughput::Elements(n as u64));
        let old = make_rows(n, &[]);
        let mut patched = make_rows(n, &[n / 2]);
        patched.rotate_left(1);

        group.bench_with_input(
            BenchmarkId::new("patch", format!("{n}rows")),
            &(),
            |b, _| {
                b.iter_batched(
                    || ListPanelNode::new(old.clone()),
                    |mut node| black_box(node.set_rows(patched.clone())),
                    BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().without_plots();
    targets =
        bench_diff_identical,
        bench_diff_value_change,
        bench_diff_rotate,
        bench_diff_churn,
        bench_diff_disjoint,
        bench_diff_apply,
        bench_list_set_rows,
}

criterion_main!(benches);
