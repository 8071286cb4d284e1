//! Criterion benches for 2D vertex extraction.
//! Sizes: m in {3, 10, 20, 50, 100} half-spaces, plus redundant rows.
//! Results: by default under target/criterion.

use affplot::geom::rand::PolygonSampler;
use affplot::geom::{extreme_points, GeomCfg, Polytope};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use nalgebra::DVector;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn polygon(m: usize, seed: u64) -> Polytope {
    let sampler = PolygonSampler {
        gap_jitter: 0.2,
        radius_jitter: 0.1,
        ..PolygonSampler::with_sides(m)
    };
    sampler.draw(seed, m as u64).expect("polygon")
}

/// Random half-planes at distance 0.5..1.5 from the origin; bounded with high probability.
fn random_halfspaces(m: usize, seed: u64) -> Polytope {
    let mut rng = StdRng::seed_from_u64(seed);
    let hs: Vec<(DVector<f64>, f64)> = (0..m)
        .map(|_| {
            let theta: f64 = rng.gen::<f64>() * std::f64::consts::TAU;
            let c = rng.gen_range(0.5..1.5);
            (DVector::from_vec(vec![theta.cos(), theta.sin()]), c)
        })
        .collect();
    Polytope::from_halfspaces(2, &hs)
}

fn bench_extract(c: &mut Criterion) {
    let cfg = GeomCfg::default();
    let mut group = c.benchmark_group("extract");
    for &m in &[3usize, 10, 20, 50, 100] {
        group.bench_with_input(BenchmarkId::new("tight", m), &m, |b, &m| {
            b.iter_batched(
                || polygon(m, 42),
                |p| {
                    let _v = extreme_points(&p, &cfg);
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("random_halfspaces", m), &m, |b, &m| {
            b.iter_batched(
                || random_halfspaces(m.max(4), 43),
                |p| {
                    let _v = extreme_points(&p, &cfg);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
