use chainmap::{ChainMap, EntryHandle};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn map_of(n: u64) -> ChainMap<u64, u64> {
    (0..n).map(|i| (i.wrapping_mul(0x9e37_79b9_7f4a_7c15), i)).collect()
}

fn bench_entries_walk(c: &mut Criterion) {
    let m = map_of(10_000);
    c.bench_function("entries_walk_10k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for h in m.entries() {
                sum = sum.wrapping_add(*h.value(&m).unwrap());
            }
            black_box(sum)
        })
    });
}

fn bench_handle_set_value(c: &mut Criterion) {
    let mut m = map_of(10_000);
    let handles: Vec<EntryHandle> = m.entries().collect();
    let mut it = handles.iter().cycle();
    c.bench_function("handle_set_value", |b| {
        b.iter(|| {
            let h = it.next().unwrap();
            black_box(h.set_value(&mut m, 1).unwrap());
        })
    });
}

fn bench_sorted_copy(c: &mut Criterion) {
    let m = map_of(10_000);
    c.bench_function("sorted_entry_copy_10k", |b| {
        b.iter(|| {
            let mut list: Vec<EntryHandle> = m.entries().collect();
            list.sort_unstable_by_key(|h| *h.key(&m).unwrap());
            black_box(list)
        })
    });
}

fn bench_cursor_walk(c: &mut Criterion) {
    let m = map_of(10_000);
    c.bench_function("entry_cursor_walk_10k", |b| {
        b.iter(|| {
            let mut cursor = m.entry_cursor();
            let mut n = 0usize;
            while let Some(step) = cursor.next(&m) {
                black_box(step.unwrap());
                n += 1;
            }
            black_box(n)
        })
    });
}

criterion_group!(
    benches,
    bench_entries_walk,
    bench_handle_set_value,
    bench_sorted_copy,
    bench_cursor_walk
);
criterion_main!(benches);
