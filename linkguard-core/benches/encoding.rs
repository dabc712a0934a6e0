use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use linkguard_core::{crc, inject::inject_random, BitString, ChecksumCodec, CrcScheme};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn payload(bytes: usize) -> BitString {
    BitString::from_bytes(&vec![0x5Au8; bytes])
}

fn bench_checksum(c: &mut Criterion) {
    let mut group = c.benchmark_group("checksum");
    let codec = ChecksumCodec::default();

    for size in [8, 64, 512, 4096] {
        let data = payload(size);
        let codeword = codec.generate(&data).unwrap();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("generate", size), &data, |b, data| {
            b.iter(|| codec.generate(black_box(data)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("verify", size), &codeword, |b, cw| {
            b.iter(|| codec.verify(black_box(cw)));
        });
    }

    group.finish();
}

fn bench_crc(c: &mut Criterion) {
    let mut group = c.benchmark_group("crc");

    for scheme in [CrcScheme::Crc8, CrcScheme::Crc32] {
        let p = scheme.polynomial();
        for size in [8, 64, 512, 4096] {
            let data = payload(size);
            let codeword = crc::generate(&data, &p);

            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("generate/{}", scheme), size),
                &data,
                |b, data| b.iter(|| crc::generate(black_box(data), &p)),
            );
            group.bench_with_input(
                BenchmarkId::new(format!("verify/{}", scheme), size),
                &codeword,
                |b, cw| b.iter(|| crc::verify(black_box(cw), &p)),
            );
        }
    }

    group.finish();
}

fn bench_inject(c: &mut Criterion) {
    let data = payload(4096);
    let mut rng = StdRng::seed_from_u64(0);
    c.bench_function("inject_random/4096", |b| {
        b.iter(|| inject_random(black_box(&data), 8, &mut rng))
    });
}

criterion_group!(benches, bench_checksum, bench_crc, bench_inject);
criterion_main!(benches);
