use codspeed_criterion_compat::{black_box, criterion_group, criterion_main, Criterion};
use viscapadd::curve::SpeedCurve;

fn build_pan_curve() -> SpeedCurve {
    SpeedCurve::new(
        vec![0.0, 0.05, 0.3, 0.7, 0.9, 1.0],
        vec![0.0, 0.0, 2.0, 8.0, 15.0, 20.0],
    )
    .expect("valid curve")
}

pub fn bench_curve_sweep(c: &mut Criterion) {
    let curve = build_pan_curve();

    // Simulate full stick travel in both directions
    c.bench_function("curve_apply_sweep", |b| {
        b.iter(|| {
            let mut total = 0i32;
            for t in 0..=2000u32 {
                let v = (t as f32) * 0.001 - 1.0;
                total += curve.apply(black_box(v));
            }
            black_box(total);
        })
    });
}

criterion_group!(benches, bench_curve_sweep);
criterion_main!(benches);
