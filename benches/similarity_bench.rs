use criterion::{black_box, criterion_group, criterion_main, Criterion};
use monolint::content::makefile::parse_makefile;
use monolint::content::selector::Query;
use monolint::content::similarity::{text_similarity, value_similarity};
use serde_json::json;

fn tsconfig_pair() -> (String, String) {
    let a = r#"{
  "compilerOptions": {
    "target": "es2019",
    "module": "commonjs",
    "strict": true,
    "esModuleInterop": true,
    "outDir": "dist",
    "sourceMap": true
  },
  "include": ["src/**/*"],
  "exclude": ["node_modules", "dist"]
}"#;
    let b = a.replace("es2019", "es2020").replace("\"sourceMap\": true", "\"sourceMap\": false");
    (a.to_string(), b)
}

fn makefile_snippet() -> &'static str {
    "build:\n\tnpx tsc\n\nlint:\n\tnpx eslint . --ext .ts\n\ntest: unit-tests integration-tests\n\nunit-tests:\n\tnpx jest --testPathPattern=unit\n\nintegration-tests:\n\tnpx jest --testPathPattern=integration\n\ndeploy: build\n\tnpx sls deploy\n"
}

fn bench_text_similarity(c: &mut Criterion) {
    let (a, b) = tsconfig_pair();
    c.bench_function("text_similarity_tsconfig", |bench| {
        bench.iter(|| black_box(text_similarity(black_box(&a), black_box(&b))))
    });
}

fn bench_selector_similarity(c: &mut Criterion) {
    let reference = json!({
        "scripts": {"build": "tsc", "lint": "eslint .", "test": "jest", "deploy": "sls deploy"},
        "devDependencies": {"typescript": "^4.5.0", "jest": "^27.0.0", "eslint": "^8.0.0"}
    });
    let other = json!({
        "scripts": {"build": "tsc -p .", "lint": "eslint .", "test": "jest --ci"},
        "devDependencies": {"typescript": "^4.6.0", "jest": "^27.0.0"}
    });
    let query: Query = "scripts".parse().unwrap();
    c.bench_function("value_similarity_scripts", |bench| {
        bench.iter(|| {
            black_box(value_similarity(
                query.select(black_box(&reference)),
                query.select(black_box(&other)),
                true,
            ))
        })
    });
}

fn bench_makefile_parse(c: &mut Criterion) {
    let source = makefile_snippet();
    c.bench_function("makefile_parse", |bench| {
        bench.iter(|| black_box(parse_makefile(black_box(source))))
    });
}

criterion_group!(
    benches,
    bench_text_similarity,
    bench_selector_similarity,
    bench_makefile_parse
);
criterion_main!(benches);
