//! Benchmarks pour la reprojection WKT → GeoJSON

use bhunaksha_extract::geometry::{CoordinateReprojector, DEFAULT_SOURCE_EPSG, DEFAULT_TARGET_EPSG};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Polygone régulier de `n` sommets autour d'un point de Pune (UTM 43N)
fn plot_polygon(n: usize) -> String {
    let (cx, cy, r) = (379320.82, 2048144.62, 25.0);
    let mut coords: Vec<String> = (0..n)
        .map(|i| {
            let a = i as f64 / n as f64 * std::f64::consts::TAU;
            format!("{:.2} {:.2}", cx + r * a.cos(), cy + r * a.sin())
        })
        .collect();
    coords.push(coords[0].clone());
    format!("POLYGON (({}))", coords.join(", "))
}

fn bench_reproject_plot(c: &mut Criterion) {
    let reprojector = CoordinateReprojector::new(DEFAULT_SOURCE_EPSG, DEFAULT_TARGET_EPSG).unwrap();

    let mut group = c.benchmark_group("reproject_plot");
    for vertices in [8, 64, 512] {
        let wkt = plot_polygon(vertices);
        group.throughput(Throughput::Elements(vertices as u64));
        group.bench_with_input(BenchmarkId::from_parameter(vertices), &wkt, |b, wkt| {
            b.iter(|| {
                let geom = reprojector.reproject_wkt(black_box(wkt)).unwrap();
                black_box(geom)
            })
        });
    }
    group.finish();
}

fn bench_web_mercator(c: &mut Criterion) {
    let reprojector = CoordinateReprojector::new(DEFAULT_SOURCE_EPSG, 3857).unwrap();
    let wkt = plot_polygon(64);

    c.bench_function("reproject_web_mercator_64", |b| {
        b.iter(|| black_box(reprojector.reproject_wkt(black_box(&wkt)).unwrap()))
    });
}

criterion_group!(benches, bench_reproject_plot, bench_web_mercator);
criterion_main!(benches);
