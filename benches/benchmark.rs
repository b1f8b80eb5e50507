use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use placement_similarity::{FileModelStore, ModelBundle, ModelStore, SimilarityScorer, Vectorizer};

const SKILLS: [&str; 24] = [
    "rust", "python", "java", "kotlin", "typescript", "react", "postgres", "kafka",
    "kubernetes", "docker", "terraform", "aws", "gcp", "azure", "spark", "pandas",
    "pytorch", "graphql", "grpc", "redis", "linux", "jenkins", "ansible", "grafana",
];

// 疑似的なレジュメを生成
fn synthetic_corpus(docs: usize) -> Vec<String> {
    (0..docs)
        .map(|i| {
            let skills: Vec<&str> = (0..12).map(|j| SKILLS[(i * 7 + j * 5) % SKILLS.len()]).collect();
            format!(
                "Candidate {i} engineer with {} years experience. Skills: {}. Projects using {} and {}.",
                i % 15,
                skills.join(", "),
                skills[0],
                skills[3]
            )
        })
        .collect()
}

fn fit_and_predict_benchmark(c: &mut Criterion) {
    let corpus = synthetic_corpus(200);

    c.bench_function("fit_200_docs", |b| {
        b.iter(|| Vectorizer::default().fit(black_box(&corpus)).unwrap())
    });
    c.bench_function("fit_200_docs_500_features", |b| {
        let vectorizer = Vectorizer::default().with_max_features(500);
        b.iter(|| vectorizer.fit(black_box(&corpus)).unwrap())
    });

    let dir = tempfile::tempdir().expect("temp dir");
    let store = Arc::new(FileModelStore::new(dir.path().join("model.bin")));
    let (model, matrix) = Vectorizer::default().fit(&corpus).unwrap();
    let bundle = ModelBundle::new(model, matrix);
    store.save(&bundle).unwrap();
    let scorer = SimilarityScorer::new(store);
    let query = "Senior Rust engineer, Kubernetes and Kafka, some Terraform on AWS";

    c.bench_function("score_loaded_bundle", |b| {
        b.iter(|| scorer.score_bundle(black_box(&bundle), black_box(query)).unwrap())
    });
    c.bench_function("predict_with_reload", |b| {
        b.iter(|| scorer.predict(black_box(query)))
    });
}

criterion_group!(benches, fit_and_predict_benchmark);
criterion_main!(benches);
