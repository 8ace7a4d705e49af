use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::{DVec2, IVec2};
use strata_math::Rect2i;
use strata_noise::*;

fn mountain_noise(sample_rate: u32) -> SubSampledNoise<Noise3dTo2dAdapter<BrownianNoise<PerlinNoise>>> {
    let fbm = BrownianNoise::new(PerlinNoise::new(WorldSeed::new(2)), 8).unwrap();
    SubSampledNoise::new(Noise3dTo2dAdapter::new(fbm), DVec2::splat(0.001), sample_rate).unwrap()
}

fn bench_point_evaluation(c: &mut Criterion) {
    let noise = mountain_noise(1);
    let region = Rect2i::from_min_and_size(IVec2::ZERO, IVec2::splat(32));
    c.bench_function("brownian8_per_point_32x32", |bencher| {
        bencher.iter(|| {
            let mut acc = 0.0;
            for p in region.iter() {
                acc += noise.sample(p.x as f64, p.y as f64);
            }
            black_box(acc)
        })
    });
}

fn bench_region_rate_1(c: &mut Criterion) {
    let noise = mountain_noise(1);
    let region = Rect2i::from_min_and_size(IVec2::ZERO, IVec2::splat(32));
    c.bench_function("brownian8_region_rate1_32x32", |bencher| {
        bencher.iter(|| black_box(noise.noise_region(black_box(&region))))
    });
}

fn bench_region_rate_4(c: &mut Criterion) {
    let noise = mountain_noise(4);
    let region = Rect2i::from_min_and_size(IVec2::ZERO, IVec2::splat(32));
    c.bench_function("brownian8_region_rate4_32x32", |bencher| {
        bencher.iter(|| black_box(noise.noise_region(black_box(&region))))
    });
}

fn bench_white_noise(c: &mut Criterion) {
    let noise = WhiteNoise::new(WorldSeed::new(9));
    c.bench_function("white_noise_cell_2d", |bencher| {
        bencher.iter(|| black_box(noise.cell_2d(black_box(123), black_box(-456))))
    });
}

criterion_group!(
    benches,
    bench_point_evaluation,
    bench_region_rate_1,
    bench_region_rate_4,
    bench_white_noise
);
criterion_main!(benches);
