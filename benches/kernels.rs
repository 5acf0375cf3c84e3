//! Kernel benchmarks, one group per kernel with every available backend.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use jpegxs_rs::{Backend, Kernels, QuantType, VerticalPosition};

const LENGTHS: [usize; 2] = [256, 1920];
const GROUP_SIZE: usize = 4;

fn line(len: usize) -> Vec<i32> {
    (0..len).map(|i| ((i * 73 + 17) % 512) as i32 - 256).collect()
}

fn band16(len: usize) -> Vec<i16> {
    (0..len).map(|i| ((i * 41 + 5) % 256) as i16 - 128).collect()
}

fn words(len: usize) -> Vec<u16> {
    (0..len)
        .map(|i| (i.wrapping_mul(2654435761) % 65536) as u16)
        .collect()
}

fn gclis(len: usize) -> Vec<u8> {
    (0..len.div_ceil(GROUP_SIZE))
        .map(|g| (g * 7 % 16) as u8)
        .collect()
}

fn backends() -> Vec<(Backend, Kernels)> {
    Backend::available()
        .into_iter()
        .filter_map(|b| Kernels::with_backend(b).ok().map(|k| (b, k)))
        .collect()
}

fn bench_dwt(c: &mut Criterion) {
    let mut group = c.benchmark_group("dwt_horizontal");
    for len in LENGTHS {
        let input = line(len);
        let mut lf = vec![0; len.div_ceil(2)];
        let mut hf = vec![0; len / 2];
        group.throughput(Throughput::Elements(len as u64));
        for (backend, kernels) in backends() {
            group.bench_with_input(BenchmarkId::new(backend.name(), len), &input, |b, input| {
                b.iter(|| kernels.dwt_horizontal_line(black_box(input), &mut lf, &mut hf))
            });
        }
    }
    group.finish();
}

fn bench_idwt_horizontal(c: &mut Criterion) {
    let mut group = c.benchmark_group("idwt_horizontal");
    for len in LENGTHS {
        let lf16 = band16(len.div_ceil(2));
        let lf32 = line(len.div_ceil(2));
        let hf = band16(len / 2);
        let mut out = vec![0; len];
        group.throughput(Throughput::Elements(len as u64));
        for (backend, kernels) in backends() {
            group.bench_function(BenchmarkId::new(format!("lf16/{backend}"), len), |b| {
                b.iter(|| kernels.idwt_horizontal_line_lf16(black_box(&lf16), &hf, &mut out, 1))
            });
            group.bench_function(BenchmarkId::new(format!("lf32/{backend}"), len), |b| {
                b.iter(|| kernels.idwt_horizontal_line_lf32(black_box(&lf32), &hf, &mut out, 1))
            });
        }
    }
    group.finish();
}

fn bench_idwt_vertical(c: &mut Criterion) {
    let mut group = c.benchmark_group("idwt_vertical");
    for len in LENGTHS {
        let lf = line(len);
        let hf0 = line(len);
        let hf1: Vec<i32> = hf0.iter().rev().copied().collect();
        let mut rows = [line(len), vec![0; len], vec![0; len], vec![0; len]];
        let mut out0 = vec![0; len];
        group.throughput(Throughput::Elements(len as u64));
        for (backend, kernels) in backends() {
            group.bench_function(BenchmarkId::new(format!("interior/{backend}"), len), |b| {
                b.iter(|| {
                    let [r0, r1, r2, r3] = &mut rows;
                    let mut out = [&mut r0[..], &mut r1[..], &mut r2[..], &mut r3[..]];
                    kernels.idwt_vertical_line(
                        black_box(&lf),
                        &hf0,
                        &hf1,
                        &mut out,
                        VerticalPosition::Interior,
                    )
                })
            });
            group.bench_function(BenchmarkId::new(format!("recalc/{backend}"), len), |b| {
                b.iter(|| kernels.idwt_vertical_line_recalc(black_box(&lf), &hf0, &hf1, &mut out0, 2))
            });
        }
    }
    group.finish();
}

fn bench_quantization(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantization");
    for len in LENGTHS {
        let source = words(len);
        let table = gclis(len);
        let mut coeffs = source.clone();
        group.throughput(Throughput::Elements(len as u64));
        for (backend, kernels) in backends() {
            for quant_type in [QuantType::Deadzone, QuantType::Uniform] {
                let name = format!("quant/{quant_type:?}/{backend}");
                group.bench_function(BenchmarkId::new(name, len), |b| {
                    b.iter(|| {
                        coeffs.copy_from_slice(&source);
                        kernels.quantize(black_box(&mut coeffs), &table, GROUP_SIZE, 3, quant_type)
                    })
                });
                let name = format!("dequant/{quant_type:?}/{backend}");
                group.bench_function(BenchmarkId::new(name, len), |b| {
                    b.iter(|| {
                        coeffs.copy_from_slice(&source);
                        kernels.dequantize(black_box(&mut coeffs), &table, GROUP_SIZE, 3, quant_type)
                    })
                });
            }
        }
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_dwt,
    bench_idwt_horizontal,
    bench_idwt_vertical,
    bench_quantization
);
criterion_main!(benches);
