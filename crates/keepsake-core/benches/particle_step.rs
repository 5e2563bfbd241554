use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use keepsake_core::clock::FrameTime;
use keepsake_core::particles::{FallingSway, FieldShape, ParticleField, RisingTumble, Twinkle};

fn bench_particle_step(c: &mut Criterion) {
    let mut stars = ParticleField::new(Twinkle::starfield(), FieldShape::new(600, 40.0, 70.0), 42).unwrap();
    let mut petals = ParticleField::new(FallingSway::default(), FieldShape::new(50, 5.0, 15.0), 42).unwrap();
    let mut hearts = ParticleField::new(RisingTumble::default(), FieldShape::new(50, 8.0, 20.0), 42).unwrap();

    let mut group = c.benchmark_group("particle_step");
    let mut elapsed = 0.0f32;
    group.bench_function("starfield_600", |b| {
        b.iter(|| {
            elapsed += 1.0 / 60.0;
            let frame = FrameTime::new(elapsed, 1.0 / 60.0).unwrap();
            black_box(stars.step(frame).len())
        })
    });
    group.bench_function("petals_and_hearts_100", |b| {
        b.iter(|| {
            elapsed += 1.0 / 60.0;
            let frame = FrameTime::new(elapsed, 1.0 / 60.0).unwrap();
            black_box(petals.step(frame).len() + hearts.step(frame).len())
        })
    });
    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    c.bench_function("generate_starfield_600", |b| {
        b.iter(|| ParticleField::new(Twinkle::starfield(), black_box(FieldShape::new(600, 40.0, 70.0)), 7).unwrap())
    });
}

criterion_group!(benches, bench_particle_step, bench_generate);
criterion_main!(benches);
