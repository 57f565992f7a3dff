use docsim_core::embedding::dimensionality_from_path;
use docsim_core::{DocsimError, EmbeddingSumModel, EmbeddingTable, PairBatch, SimilarityModel, TokenIndex, Vocabulary};
use std::collections::HashMap;
use std::fs;
use tempfile::tempdir;

fn cat_dog() -> Vocabulary {
    let mut m = HashMap::new();
    m.insert("cat".to_string(), 1);
    m.insert("dog".to_string(), 2);
    Vocabulary::from_map(m).unwrap()
}

fn load_cat_dog(dir: &std::path::Path, body: &str) -> EmbeddingTable {
    let path = dir.join("toy.2d.txt");
    fs::write(&path, body).unwrap();
    EmbeddingTable::load(&path, &cat_dog()).unwrap()
}

fn score(model: &EmbeddingSumModel, a: (&[TokenIndex], &[TokenIndex]), b: (&[TokenIndex], &[TokenIndex])) -> f32 {
    let (ta, aa, tb, ab) = (vec![a.0.to_vec()], vec![a.1.to_vec()], vec![b.0.to_vec()], vec![b.1.to_vec()]);
    let batch = PairBatch::new(&ta, &aa, &tb, &ab).unwrap();
    model.predict(&batch).unwrap().score[0]
}

#[test]
fn orthogonal_documents_score_zero() {
    let dir = tempdir().unwrap();
    let table = load_cat_dog(dir.path(), "cat 1.0 0.0\ndog 0.0 1.0\n");
    assert_eq!(table.matrix().dim(), (3, 2));

    let titles: Vec<Vec<TokenIndex>> = vec![vec![1], vec![2]];
    let abstracts: Vec<Vec<TokenIndex>> = vec![vec![0], vec![0]];
    let m = table.to_vectors(&titles, &abstracts).unwrap();
    assert_eq!(m.row(0).to_vec(), vec![1.0, 0.0]);
    assert_eq!(m.row(1).to_vec(), vec![0.0, 1.0]);

    let model = EmbeddingSumModel::new(table);
    assert_eq!(score(&model, (&[1], &[0]), (&[2], &[0])), 0.0);
}

#[test]
fn identical_titles_score_one() {
    let dir = tempdir().unwrap();
    let model = EmbeddingSumModel::new(load_cat_dog(dir.path(), "cat 1.0 0.0\ndog 0.0 1.0\n"));
    assert!((score(&model, (&[1], &[0]), (&[1], &[0])) - 1.0).abs() < 1e-6);
}

#[test]
fn sum_is_pre_normalization_total_and_vector_is_unit() {
    let dir = tempdir().unwrap();
    let table = load_cat_dog(dir.path(), "cat 0.3 -1.2\ndog 2.5 0.4\n");
    let sum = table.sum_rows(&[1, 2]).unwrap();
    assert!((sum[0] - 2.8).abs() < 1e-6);
    assert!((sum[1] + 0.8).abs() < 1e-6);

    let v = table.index_set_to_vector(&[1], &[2]).unwrap();
    let norm = v.dot(&v).sqrt();
    assert!((norm - 1.0).abs() < 1e-6);
}

#[test]
fn padding_and_order_do_not_change_vector() {
    let dir = tempdir().unwrap();
    let table = load_cat_dog(dir.path(), "cat 0.3 -1.2\ndog 2.5 0.4\n");
    let base = table.index_set_to_vector(&[1, 2], &[2]).unwrap();
    let padded = table.index_set_to_vector(&[1, 2, 0, 0, -1], &[2, 0]).unwrap();
    let permuted = table.index_set_to_vector(&[2, 1], &[0, 2]).unwrap();
    for other in [padded, permuted] {
        for (x, y) in base.iter().zip(other.iter()) {
            assert!((x - y).abs() < 1e-6);
        }
    }
}

#[test]
fn self_similarity_is_one_for_any_nonempty_document() {
    let dir = tempdir().unwrap();
    let model = EmbeddingSumModel::new(load_cat_dog(dir.path(), "cat 0.3 -1.2\ndog 2.5 0.4\n"));
    let docs: [(&[TokenIndex], &[TokenIndex]); 3] = [(&[1], &[]), (&[0, 2], &[1, 1]), (&[], &[2, 0])];
    for doc in docs {
        assert!((score(&model, doc, doc) - 1.0).abs() < 1e-5);
    }
}

#[test]
fn all_padding_document_scores_nan() {
    let dir = tempdir().unwrap();
    let model = EmbeddingSumModel::new(load_cat_dog(dir.path(), "cat 1.0 0.0\n"));
    // dog has no vector, so this document sums to zero
    assert!(score(&model, (&[2], &[0]), (&[1], &[0])).is_nan());
}

#[test]
fn unknown_path_format_fails_before_reading() {
    let dir = tempdir().unwrap();
    // the file does not exist; a config error proves nothing was opened
    let err = EmbeddingTable::load(dir.path().join("embeddings.bin"), &cat_dog()).unwrap_err();
    assert!(matches!(err, DocsimError::Config(_)));
    assert!(dimensionality_from_path(std::path::Path::new("embeddings.bin")).is_err());
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = EmbeddingTable::load(dir.path().join("glove.6B.50d.txt"), &cat_dog()).unwrap_err();
    assert!(matches!(err, DocsimError::Io(_)));
}
