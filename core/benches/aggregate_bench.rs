use criterion::{criterion_group, criterion_main, Criterion};
use docsim_core::{EmbeddingTable, TokenIndex};
use ndarray::Array2;

fn bench_to_vectors(c: &mut Criterion) {
    let (rows, dim) = (20_000usize, 50usize);
    let matrix = Array2::from_shape_fn((rows, dim), |(r, d)| ((r * 31 + d * 7) % 97) as f32 / 97.0 - 0.5);
    let table = EmbeddingTable::from_matrix(matrix).expect("non-empty matrix");

    let docs = 256;
    let titles: Vec<Vec<TokenIndex>> = (0..docs)
        .map(|i| (0..50).map(|j| if j < 12 { ((i * 13 + j * 101) % rows) as TokenIndex } else { 0 }).collect())
        .collect();
    let abstracts: Vec<Vec<TokenIndex>> = (0..docs)
        .map(|i| (0..500).map(|j| if j < 180 { ((i * 17 + j * 53) % rows) as TokenIndex } else { 0 }).collect())
        .collect();

    c.bench_function("to_vectors_256_docs", |b| b.iter(|| table.to_vectors(&titles, &abstracts)));
}

criterion_group!(benches, bench_to_vectors);
criterion_main!(benches);
