use criterion::{criterion_group, criterion_main, Criterion};
use gezgin_client::app::map::MapUpdate;
use gezgin_client::services::geocoding::{normalize_place, NominatimPlace};
use std::hint::black_box;

/// A closed ring of `n` points on a circle around (lon, lat).
fn circle_ring(lon: f64, lat: f64, radius: f64, n: usize) -> Vec<Vec<f64>> {
    let mut ring: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            let theta = i as f64 / n as f64 * std::f64::consts::TAU;
            vec![lon + radius * theta.cos(), lat + radius * theta.sin()]
        })
        .collect();
    ring.push(ring[0].clone());
    ring
}

fn place(geojson: serde_json::Value) -> NominatimPlace {
    serde_json::from_value(serde_json::json!({
        "lat": "41.0091982",
        "lon": "28.9662187",
        "geojson": geojson
    }))
    .expect("Failed to build fixture")
}

fn benchmark_normalize(c: &mut Criterion) {
    // Detailed city boundaries from Nominatim routinely run to tens of thousands of points
    let polygon = place(serde_json::json!({
        "type": "Polygon",
        "coordinates": [circle_ring(28.97, 41.01, 0.5, 50_000)]
    }));

    // Coastal provinces come back as hundreds of island polygons
    let islands: Vec<_> = (0..500)
        .map(|i| vec![circle_ring(28.0 + i as f64 * 0.01, 41.0, 0.004, 200)])
        .collect();
    let multi = place(serde_json::json!({
        "type": "MultiPolygon",
        "coordinates": islands
    }));

    let mut group = c.benchmark_group("boundary_normalization");

    group.bench_function("large_polygon", |b| {
        b.iter(|| normalize_place(black_box(polygon.clone())))
    });

    group.bench_function("many_island_multipolygon", |b| {
        b.iter(|| normalize_place(black_box(multi.clone())))
    });

    let resolved = normalize_place(polygon.clone()).expect("fixture should normalize");
    group.bench_function("map_update_fit", |b| {
        b.iter(|| MapUpdate::for_result(black_box(&resolved)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_normalize);
criterion_main!(benches);
