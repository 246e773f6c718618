use aazip::sort::{suffix_array, Params};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn construct(c: &mut Criterion) {
    let mut group = c.benchmark_group("suffix_sort");
    let mut rng = StdRng::seed_from_u64(7);

    for size in [1usize << 14, 1 << 16, 1 << 18] {
        let mut text = vec![0u8; size];
        rng.fill(&mut text[..]);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| suffix_array(text, &Params::default()));
        });
    }
    group.finish();
}

criterion_group!(benches, construct);
criterion_main!(benches);
