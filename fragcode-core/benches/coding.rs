use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use fragcode_core::{matrix::parity_row, FragmentDecoder, FragmentEncoder, SubmitOutcome};

fn bench_parity_row(c: &mut Criterion) {
    let mut group = c.benchmark_group("parity_row");

    for m in [16usize, 128, 1024, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(m), &m, |b, &m| {
            b.iter(|| parity_row(black_box(m as u32 + 7), m).unwrap());
        });
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_redundancy");

    for m in [16usize, 128, 1024] {
        let message = vec![0x42u8; m * 64];
        let encoder = FragmentEncoder::from_message(&message, 64).unwrap();

        group.throughput(Throughput::Bytes(64));
        group.bench_with_input(BenchmarkId::from_parameter(m), &m, |b, &m| {
            b.iter(|| encoder.encode(black_box(m as u32 + 1)));
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_with_loss");

    for m in [16usize, 128, 512] {
        let message: Vec<u8> = (0..m * 64).map(|i| i as u8).collect();
        let encoder = FragmentEncoder::from_message(&message, 64).unwrap();

        // Every fourth systematic fragment lost, redundancy fills the gaps
        let received: Vec<_> = encoder
            .stream(0)
            .take(3 * m)
            .filter(|f| f.index as usize >= m || f.index % 4 != 0)
            .collect();

        group.throughput(Throughput::Bytes(message.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(m), &received, |b, received| {
            b.iter_batched(
                || FragmentDecoder::new(encoder.params()).unwrap(),
                |mut decoder| {
                    for fragment in received {
                        if decoder.submit_fragment(fragment).unwrap() == SubmitOutcome::Complete {
                            break;
                        }
                    }
                    decoder
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parity_row, bench_encode, bench_decode);
criterion_main!(benches);
