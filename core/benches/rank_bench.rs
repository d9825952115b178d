use criterion::{criterion_group, criterion_main, Criterion};
use search_core::{build_index, rank, Document, StopWords};

fn corpus() -> Vec<Document> {
    let words = ["apple", "ball", "carrot", "dog", "engine", "forest", "garden", "harbor"];
    (0..500)
        .map(|i| {
            let body: Vec<&str> = (0..200).map(|j| words[(i * 7 + j * 3) % words.len()]).collect();
            Document::parse(format!("doc{i}.txt"), &format!("Document {i}\n{}", body.join(" ")))
        })
        .collect()
}

fn bench_rank(c: &mut Criterion) {
    let idx = build_index(corpus(), StopWords::english());
    let n = idx.num_documents();
    c.bench_function("rank_three_terms", |b| b.iter(|| rank(&idx, "apple carrot engine", n).unwrap()));
}

criterion_group!(benches, bench_rank);
criterion_main!(benches);
