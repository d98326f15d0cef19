use chained_hashtable::HashTable;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("hash_table_insert_10k", |b| {
        let keys: Vec<_> = lcg(1).take(10_000).map(key).collect();
        b.iter_batched(
            HashTable::<u64>::new,
            |mut t| {
                for (i, k) in keys.iter().enumerate() {
                    t.insert(k, i as u64).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("hash_table_get_hit", |b| {
        let mut t = HashTable::new();
        let keys: Vec<_> = lcg(7).take(20_000).map(key).collect();
        for (i, k) in keys.iter().enumerate() {
            t.insert(k, i as u64).unwrap();
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(t.get(k).unwrap());
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("hash_table_get_miss", |b| {
        let mut t = HashTable::new();
        for (i, x) in lcg(11).take(10_000).enumerate() {
            t.insert(&key(x), i as u64).unwrap();
        }
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            // generate keys unlikely in table
            let k = key(miss.next().unwrap());
            black_box(t.get(&k));
        })
    });
}

fn bench_insert_remove_churn(c: &mut Criterion) {
    c.bench_function("hash_table_grow_then_drain_4k", |b| {
        let keys: Vec<_> = lcg(3).take(4_096).map(key).collect();
        b.iter_batched(
            HashTable::<u64>::new,
            |mut t| {
                for (i, k) in keys.iter().enumerate() {
                    t.insert(k, i as u64).unwrap();
                }
                for k in &keys {
                    black_box(t.remove(k).unwrap());
                }
                t
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_iterate(c: &mut Criterion) {
    c.bench_function("hash_table_iterate_10k", |b| {
        let mut t = HashTable::new();
        for (i, x) in lcg(5).take(10_000).enumerate() {
            t.insert(&key(x), i as u64).unwrap();
        }
        b.iter(|| black_box(t.iter().map(|(_, v)| *v).sum::<u64>()))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert, bench_get_hit, bench_get_miss, bench_insert_remove_churn, bench_iterate
}
criterion_main!(benches);
