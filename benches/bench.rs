// Criterion benchmarks for Maitri AI scheme matching

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use maitri_ai::core::{SchemeCatalog, SchemeMatcher};
use maitri_ai::models::{Constraint, SchemeRecord, UserProfile};
use std::collections::BTreeMap;
use std::sync::Arc;

fn create_scheme(id: usize) -> SchemeRecord {
    let mut criteria = BTreeMap::new();
    criteria.insert(format!("flag_{}", id % 7), Constraint::Flag(id % 2 == 0));
    criteria.insert(
        "income_level".to_string(),
        Constraint::OneOf(vec!["bpl".into(), "low".into()]),
    );

    SchemeRecord {
        id: format!("scheme_{}", id),
        title: format!("Scheme {}", id),
        description: String::new(),
        eligibility: None,
        eligibility_criteria: criteria,
        documents: if id % 3 == 0 {
            vec!["Aadhaar Card".to_string()]
        } else {
            vec!["Address Proof".to_string()]
        },
        steps: vec![],
        benefits: String::new(),
    }
}

fn create_profile() -> UserProfile {
    UserProfile::new()
        .with("has_aadhaar", true)
        .with("income_level", "bpl")
        .with("flag_0", true)
        .with("flag_3", false)
}

fn bench_builtin_catalog(c: &mut Criterion) {
    let matcher = SchemeMatcher::with_defaults(Arc::new(SchemeCatalog::builtin().unwrap()));
    let profile = create_profile();

    c.bench_function("match_builtin_catalog", |b| {
        b.iter(|| matcher.match_profile(black_box(&profile)).matches.len());
    });
}

fn bench_matching(c: &mut Criterion) {
    let profile = create_profile();
    // Forces the fallback pass on every call
    let fallback_profile = UserProfile::new().with("has_aadhaar", true).with("income_level", "high");

    let mut group = c.benchmark_group("matching");

    for scheme_count in [10, 100, 1000].iter() {
        let catalog = SchemeCatalog::new((0..*scheme_count).map(create_scheme).collect()).unwrap();
        let matcher = SchemeMatcher::with_defaults(Arc::new(catalog));

        group.bench_with_input(
            BenchmarkId::new("strict", scheme_count),
            scheme_count,
            |b, _| b.iter(|| matcher.match_profile(black_box(&profile)).matches.len()),
        );

        group.bench_with_input(
            BenchmarkId::new("fallback", scheme_count),
            scheme_count,
            |b, _| b.iter(|| matcher.match_profile(black_box(&fallback_profile)).matches.len()),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_builtin_catalog, bench_matching);

criterion_main!(benches);
