//! Benchmarks for the formatting parser, the status cache and page rendering.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use motd_embed::{parse, render_embed, CacheConfig, Description, ExpiringCache, StatusSnapshot};
use std::thread;

/// A busy but realistic two-line MOTD.
const MOTD: &str = "§6§lHypixel Network §r§7[1.8-1.21]\n§e§lNEW: §bSkyBlock §k!!§r §aUpdate 0.20";

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    for repeat in [1usize, 8, 64] {
        let input = MOTD.repeat(repeat);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", repeat), &input, |b, input| {
            b.iter(|| black_box(parse(black_box(input))));
        });
    }

    let plain = "A Minecraft Server".repeat(16);
    group.bench_function("parse_plain", |b| {
        b.iter(|| black_box(parse(black_box(&plain))));
    });

    group.finish();
}

fn snapshot() -> StatusSnapshot {
    StatusSnapshot {
        online: true,
        description: Description::from(MOTD),
        players_online: 31_204,
        players_max: 200_000,
        version_name: "Requires MC 1.8 / 1.21".to_string(),
        icon: None,
    }
}

fn bench_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache");

    let cache = ExpiringCache::new(CacheConfig::new().max_capacity(10_000).build());
    for i in 0..10_000 {
        cache.set(format!("server{}.example.com:25565", i), snapshot());
    }

    group.bench_function("get_hit", |b| {
        let mut i = 0;
        b.iter(|| {
            let key = format!("server{}.example.com:25565", i % 10_000);
            black_box(cache.get(&key));
            i += 1;
        });
    });

    group.bench_function("get_miss", |b| {
        let mut i = 0;
        b.iter(|| {
            let key = format!("missing{}.example.com:25565", i);
            black_box(cache.get(&key));
            i += 1;
        });
    });

    // Every insert of a fresh key at capacity evicts the least recently used one.
    group.bench_function("set_evicting", |b| {
        let cache = ExpiringCache::new(CacheConfig::new().max_capacity(1_000).build());
        let mut i = 0;
        b.iter(|| {
            cache.set(format!("new{}.example.com:25565", i), snapshot());
            i += 1;
        });
    });

    group.finish();
}

fn bench_cache_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_concurrent");

    for num_threads in [2, 4, 8] {
        let cache = ExpiringCache::new(CacheConfig::new().max_capacity(1_000).build());
        for i in 0..1_000 {
            cache.set(format!("server{}:25565", i), i);
        }

        group.throughput(Throughput::Elements(1000));
        group.bench_with_input(
            BenchmarkId::new("mixed_ops", num_threads),
            &num_threads,
            |b, &num_threads| {
                b.iter(|| {
                    let handles: Vec<_> = (0..num_threads)
                        .map(|t| {
                            let cache = cache.clone();
                            thread::spawn(move || {
                                for i in 0..1000 / num_threads {
                                    let key = format!("server{}:25565", (t * 97 + i) % 1_500);
                                    if i % 4 == 0 {
                                        cache.set(key, i);
                                    } else {
                                        black_box(cache.get(&key));
                                    }
                                }
                            })
                        })
                        .collect();

                    for handle in handles {
                        let _ = handle.join();
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let snapshot = snapshot();
    c.bench_function("render_embed", |b| {
        b.iter(|| {
            black_box(render_embed(
                black_box("mc.hypixel.net"),
                &snapshot,
                "/static",
            ))
        });
    });
}

criterion_group!(
    benches,
    bench_parser,
    bench_cache,
    bench_cache_concurrent,
    bench_render
);
criterion_main!(benches);
