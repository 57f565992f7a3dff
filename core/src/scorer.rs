use crate::embedding::EmbeddingTable;
use crate::error::{DocsimError, Result};
use crate::TokenIndex;
use ndarray::Axis;

/// Index arrays for N document pairs, already padded by the caller.
#[derive(Debug, Clone, Copy)]
pub struct PairBatch<'a> {
    pub title_a: &'a [Vec<TokenIndex>],
    pub abstract_a: &'a [Vec<TokenIndex>],
    pub title_b: &'a [Vec<TokenIndex>],
    pub abstract_b: &'a [Vec<TokenIndex>],
}

impl<'a> PairBatch<'a> {
    pub fn new(
        title_a: &'a [Vec<TokenIndex>],
        abstract_a: &'a [Vec<TokenIndex>],
        title_b: &'a [Vec<TokenIndex>],
        abstract_b: &'a [Vec<TokenIndex>],
    ) -> Result<Self> {
        let n = title_a.len();
        if [abstract_a.len(), title_b.len(), abstract_b.len()].iter().any(|&len| len != n) {
            return Err(DocsimError::BatchMismatch(format!(
                "title_a={} abstract_a={} title_b={} abstract_b={}",
                n,
                abstract_a.len(),
                title_b.len(),
                abstract_b.len()
            )));
        }
        Ok(Self { title_a, abstract_a, title_b, abstract_b })
    }

    pub fn len(&self) -> usize { self.title_a.len() }
    pub fn is_empty(&self) -> bool { self.title_a.is_empty() }
}

/// Output of a pair model. Richer models fill `auxiliary`; the embedding-sum
/// model leaves it all zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub score: Vec<f32>,
    pub auxiliary: Vec<f32>,
}

impl Prediction {
    /// `(score, auxiliary, score)`, the triple every pair model returns.
    pub fn into_triple(self) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
        let dup = self.score.clone();
        (self.score, self.auxiliary, dup)
    }
}

pub trait SimilarityModel {
    fn predict(&self, batch: &PairBatch<'_>) -> Result<Prediction>;
}

/// Scores pairs by the cosine of their summed word vectors.
#[derive(Debug, Clone)]
pub struct EmbeddingSumModel {
    table: EmbeddingTable,
}

impl EmbeddingSumModel {
    pub fn new(table: EmbeddingTable) -> Self { Self { table } }
    pub fn table(&self) -> &EmbeddingTable { &self.table }
}

impl SimilarityModel for EmbeddingSumModel {
    fn predict(&self, batch: &PairBatch<'_>) -> Result<Prediction> {
        let a = self.table.to_vectors(batch.title_a, batch.abstract_a)?;
        let b = self.table.to_vectors(batch.title_b, batch.abstract_b)?;
        // rows are unit length, so the row-wise dot product is the cosine
        let score = (&a * &b).sum_axis(Axis(1)).to_vec();
        let auxiliary = vec![0.0; score.len()];
        tracing::debug!(pairs = score.len(), "scored batch");
        Ok(Prediction { score, auxiliary })
    }
}
