// Benchmark for the day-board layout passes
// Measures overlap packing and hierarchical allocation throughput

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use time_schedule::models::entry::Entry;
use time_schedule::models::settings::ScheduleSettings;
use time_schedule::schedule::allocator::{layout_entries, Band};
use time_schedule::schedule::packer::{pack_columns, PackItem};
use time_schedule::schedule::TimeGrid;

fn synthetic_items(count: usize) -> Vec<PackItem> {
    // Deterministic pseudo-random spread: dense enough to force clusters
    (0..count)
        .map(|i| {
            let start = 420 + ((i * 97) % 960) as i32;
            let duration = 15 + ((i * 31) % 150) as i32;
            PackItem::new(i as i64, start, start + duration)
        })
        .collect()
}

fn synthetic_tree(roots: usize, depth: usize) -> Vec<Entry> {
    let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    let grid = TimeGrid::new(&ScheduleSettings::default(), 1080.0);
    let mut entries = Vec::new();
    let mut next_id: i64 = 1;

    for r in 0..roots {
        let start = 420 + (r as i32 * 45) % 900;
        let mut parent_id = None;
        for level in 0..=depth {
            let span = 240 - level as i32 * 30;
            let s = start + level as i32 * 10;
            let mut entry = Entry::new(
                format!("entry-{}", next_id),
                date,
                grid.minutes_to_time(s),
                grid.minutes_to_time(s + span.max(10)),
            )
            .unwrap();
            entry.id = Some(next_id);
            entry.parent_id = parent_id;
            entry.depth = level as i64;
            parent_id = entry.id;
            entries.push(entry);
            next_id += 1;
        }
    }

    entries
}

fn bench_pack_columns(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack_columns");

    for count in [10, 100, 500].iter() {
        let items = synthetic_items(*count);
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| pack_columns(black_box(&items)));
        });
    }

    group.finish();
}

fn bench_layout_entries(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_entries");
    let grid = TimeGrid::new(&ScheduleSettings::default(), 1080.0);

    for (roots, depth) in [(20, 1), (20, 4), (50, 8)].iter() {
        let entries = synthetic_tree(*roots, *depth);
        group.bench_with_input(
            BenchmarkId::new("tree", format!("{}x{}", roots, depth)),
            &entries,
            |b, entries| {
                b.iter(|| layout_entries(black_box(entries), &grid, Band::FULL_ROW));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_pack_columns, bench_layout_entries);
criterion_main!(benches);
