use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use keycell::Invoker;

fn benchmark_seal_open(c: &mut Criterion) {
    let mut group = c.benchmark_group("encrypt_decrypt");

    let mut invoker = Invoker::new();
    let key = [0x5au8; 32];
    let iv = [0x1bu8; 12];

    let sizes = [("100B", 100), ("1KB", 1024), ("10KB", 10 * 1024)];

    for (name, size) in sizes {
        let plaintext = vec![0u8; size];

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            criterion::BenchmarkId::from_parameter(name),
            &size,
            |b, &_size| {
                b.iter(|| {
                    let sealed = invoker
                        .encrypt(black_box(&key), black_box(&iv), black_box(&plaintext))
                        .unwrap();
                    let opened = invoker
                        .decrypt(black_box(&key), black_box(&iv), black_box(&sealed))
                        .unwrap();
                    black_box(opened);
                });
            },
        );
    }
    group.finish();
}

fn benchmark_mac(c: &mut Criterion) {
    let mut group = c.benchmark_group("mac_compute");

    let mut invoker = Invoker::new();
    let key = [0x77u8; 32];

    for (name, size) in [("1KB", 1024), ("10KB", 10 * 1024)] {
        let message = vec![0u8; size];

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            criterion::BenchmarkId::from_parameter(name),
            &size,
            |b, &_size| {
                b.iter(|| {
                    let mac = invoker
                        .mac_compute(black_box(&key), black_box(&message))
                        .unwrap();
                    black_box(mac);
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, benchmark_seal_open, benchmark_mac);
criterion_main!(benches);
