use corelib::{HashRing, RingBuilder, SipPartitioner};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn ring(servers: usize, vnodes: usize) -> HashRing {
    let mut ring = HashRing::new(vnodes).unwrap();
    for i in 0..servers {
        ring.add_server(format!("10.0.{}.{}:6379", i / 256, i % 256));
    }
    ring
}

fn bench_get_server(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_server");
    for servers in [10, 100, 1_000] {
        let ring = ring(servers, 160);
        group.bench_with_input(BenchmarkId::from_parameter(servers), &ring, |b, ring| {
            let mut i = 0u64;
            b.iter(|| {
                i = i.wrapping_add(1);
                black_box(ring.get_server(i.to_le_bytes()))
            })
        });
    }
    group.finish();
}

fn bench_partitioners(c: &mut Criterion) {
    let xxh3 = ring(100, 160);
    let sip = RingBuilder::new()
        .with_virtual_nodes(160)
        .with_partitioner(SipPartitioner)
        .build()
        .unwrap();

    c.bench_function("position/xxh3", |b| {
        b.iter(|| xxh3.position(black_box("user:1234567")))
    });
    c.bench_function("position/sip", |b| {
        b.iter(|| sip.position(black_box("user:1234567")))
    });
}

fn bench_add_remove(c: &mut Criterion) {
    let base = ring(100, 160);
    c.bench_function("add_remove_server", |b| {
        b.iter_batched(
            || base.clone(),
            |mut ring| {
                ring.add_server("10.1.0.1:6379");
                ring.remove_server("10.1.0.1:6379");
                ring
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_get_server, bench_partitioners, bench_add_remove);
criterion_main!(benches);
