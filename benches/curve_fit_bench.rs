use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use curvefit::{fit, CurveBuilder, Point};

fn sine_wave(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let t = i as f64 * 0.05;
            Point::new(t, t.sin() * 10.0)
        })
        .collect()
}

fn benchmark_batch_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_fit");
    for &size in &[50usize, 200, 1000, 5000] {
        let points = sine_wave(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("fit", size), &points, |b, points| {
            b.iter(|| black_box(fit(points, 0.2).unwrap()));
        });
    }
    group.finish();
}

fn benchmark_incremental_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_builder");
    for &size in &[50usize, 200, 1000, 5000] {
        let points = sine_wave(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("add_point", size), &points, |b, points| {
            b.iter(|| {
                let mut builder = CurveBuilder::new(0.5, 0.2).unwrap();
                for &p in points {
                    black_box(builder.add_point(p));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_batch_fit, benchmark_incremental_builder);
criterion_main!(benches);
