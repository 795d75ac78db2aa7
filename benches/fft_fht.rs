use criterion::{criterion_group, criterion_main, Criterion};

use spectral_core::buffer::VecBuffer;
use spectral_core::progress::NullProgress;
use spectral_core::sample_array::SampleArray;
use spectral_core::{fft_direct, fht_direct, TransformConfig};

const N: usize = 1 << 16;

fn fft_round() {
    let config = TransformConfig::default();
    let re: Vec<f64> = (0..N).map(|i| (i as f64 * 0.001).sin()).collect();
    let im = vec![0.0f64; N];
    let mut samples = SampleArray::new_complex(
        Box::new(VecBuffer::new(re)),
        Box::new(VecBuffer::new(im)),
        N as u64,
    )
    .unwrap();
    fft_direct(&config, &mut samples, &NullProgress).unwrap();
}

fn fht_round() {
    let config = TransformConfig::default();
    let data: Vec<f64> = (0..N).map(|i| (i as f64 * 0.001).cos()).collect();
    let mut samples = SampleArray::new_real(Box::new(VecBuffer::new(data)), N as u64).unwrap();
    fht_direct(&config, &mut samples, &NullProgress).unwrap();
}

fn my_benchmark(c: &mut Criterion) {
    let _ = env_logger::try_init();
    c.bench_function("fft_direct_65536", |b| b.iter(|| fft_round()));
    c.bench_function("fht_direct_65536", |b| b.iter(|| fht_round()));
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = my_benchmark
}
criterion_main!(benches);
