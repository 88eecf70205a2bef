use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fragcode_core::{
    record::{decode_record, encode_record},
    scanner::scan_records,
    FragmentEncoder,
};

fn bench_encode_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_record");

    for size in [64usize, 256, 1024, 4096] {
        let encoder = FragmentEncoder::from_message(&vec![0x42u8; size * 8], size).unwrap();
        let fragment = encoder.encode(9);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &fragment, |b, f| {
            b.iter(|| encode_record(encoder.params(), black_box(f)).unwrap());
        });
    }

    group.finish();
}

fn bench_decode_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_record");

    for size in [64usize, 256, 1024, 4096] {
        let encoder = FragmentEncoder::from_message(&vec![0x42u8; size * 8], size).unwrap();
        let encoded = encode_record(encoder.params(), &encoder.encode(9)).unwrap();

        group.throughput(Throughput::Bytes(encoded.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &encoded, |b, data| {
            b.iter(|| decode_record(black_box(data)).unwrap());
        });
    }

    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    let message: Vec<u8> = (0..64 * 1024).map(|i| (i * 31) as u8).collect();
    let encoder = FragmentEncoder::from_message(&message, 128).unwrap();
    let mut stream = Vec::new();
    for fragment in encoder.stream(0).take(1000) {
        stream.extend_from_slice(&encode_record(encoder.params(), &fragment).unwrap());
    }

    // Add some corruption
    for i in (0..stream.len()).step_by(10000) {
        if i + 100 < stream.len() {
            stream[i..i + 100].fill(0xFF);
        }
    }

    group.throughput(Throughput::Bytes(stream.len() as u64));
    group.bench_function("damaged_stream", |b| {
        b.iter(|| scan_records(black_box(&stream)))
    });

    group.finish();
}

criterion_group!(benches, bench_encode_record, bench_decode_record, bench_scan);
criterion_main!(benches);
