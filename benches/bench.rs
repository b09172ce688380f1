// Criterion benchmarks for Entity Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use entity_match::core::parse_response;
use serde_json::json;

fn create_body(queries: usize, results_per_query: usize) -> Vec<u8> {
    let responses: serde_json::Map<String, serde_json::Value> = (0..queries)
        .map(|q| {
            let results: Vec<_> = (0..results_per_query)
                .map(|r| {
                    json!({
                        "id": format!("NK-{}-{}", q, r),
                        "schema": "Person",
                        "properties": {
                            "name": [format!("Person {}", r), format!("Персона {}", r)],
                            "country": ["ru"],
                            "birthDate": ["1951"]
                        },
                        "match": r == 0,
                        "score": 1.0 / (r as f64 + 1.0),
                        "features": {"name_literal_match": 0.5, "dob_year_disjoint": 0.0}
                    })
                })
                .collect();
            (format!("q{}", q), json!({"results": results}))
        })
        .collect();

    serde_json::to_vec(&json!({"responses": responses})).unwrap()
}

fn bench_parse_response(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_response");

    for &(queries, results) in &[(1, 5), (10, 10), (50, 20)] {
        let body = create_body(queries, results);
        let names: Vec<String> = (0..queries).map(|q| format!("q{}", q)).collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", queries, results)),
            &body,
            |b, body| {
                b.iter(|| {
                    parse_response(black_box(body), names.iter().map(String::as_str)).unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_parse_response);
criterion_main!(benches);
