//! Benchmarks for sample conversion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pcmflow::sample::{convert_bytes, convert_slice, encode_samples, SampleEncoding, I24};

/// One second of 48kHz stereo as a repeating ramp.
fn generate_i16(count: usize) -> Vec<i16> {
    (0..count).map(|i| (i as i32 * 37 % 65536 - 32768) as i16).collect()
}

fn bench_convert_slice(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_slice");
    let src = generate_i16(96_000);

    group.bench_function("i16_to_f32", |b| {
        b.iter(|| black_box(convert_slice::<i16, f32>(black_box(&src)).unwrap()))
    });
    group.bench_function("i16_to_i24", |b| {
        b.iter(|| black_box(convert_slice::<i16, I24>(black_box(&src)).unwrap()))
    });

    let floats = convert_slice::<i16, f32>(&src).unwrap();
    group.bench_function("f32_to_i16", |b| {
        b.iter(|| black_box(convert_slice::<f32, i16>(black_box(&floats)).unwrap()))
    });

    group.finish();
}

fn bench_convert_bytes(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_bytes");
    let pcm = encode_samples(&generate_i16(96_000)).unwrap();

    for to in [SampleEncoding::U8, SampleEncoding::I24, SampleEncoding::F32, SampleEncoding::F64] {
        group.bench_with_input(BenchmarkId::new("from_i16", to), &to, |b, &to| {
            b.iter(|| black_box(convert_bytes(black_box(&pcm), SampleEncoding::I16, to).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_convert_slice, bench_convert_bytes);
criterion_main!(benches);
