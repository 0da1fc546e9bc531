use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use site_helpers::request;

fn split_routes_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_routes");

    let paths = [
        ("short", "/"),
        ("medium", "/path/to/resource"),
        ("long", "/very/long/path/to/some/resource/with/many/segments/and/a/query?param1=value1&param2=value2&param3=value3"),
        ("slashes", "//a///b////c/////"),
    ];

    for (name, path) in paths.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(name), path, |b, path| {
            b.iter(|| {
                let _ = request::split_routes(black_box(path));
            });
        });
    }

    group.finish();
}

fn routes_with_query_benchmark(c: &mut Criterion) {
    let path = "/user/profile/edit?id=123&tab=security&lang=zh";

    c.bench_function("routes_with_query", |b| {
        b.iter(|| {
            let _ = request::routes(black_box(path));
        });
    });

    c.bench_function("last_route_with_query", |b| {
        b.iter(|| {
            let _ = request::last_route(black_box(path));
        });
    });
}

fn query_params_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_params");

    let paths = [
        ("none", "/search"),
        ("single", "/search?q=rust"),
        ("encoded", "/search?q=%E4%BD%A0%E5%A5%BD+world&page=2&page=3"),
    ];

    for (name, path) in paths.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(name), path, |b, path| {
            b.iter(|| {
                let _ = request::query_params(black_box(path));
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    split_routes_benchmark,
    routes_with_query_benchmark,
    query_params_benchmark
);
criterion_main!(benches);
