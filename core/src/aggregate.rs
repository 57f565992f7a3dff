//! Document vectors: the L2-normalized sum of the embedding rows of every
//! non-padding index in a document's title and abstract.
//!
//! A document whose indices are all padding sums to the zero vector, and the
//! normalization divides zero by zero. The resulting NaN components are kept
//! (and logged) rather than turned into an error, so a single empty document
//! does not abort a whole batch; its score comes out as NaN.

use crate::embedding::EmbeddingTable;
use crate::error::{DocsimError, Result};
use crate::TokenIndex;
use ndarray::{Array1, Array2};

/// Non-padding indices of title then abstract, in that order.
pub fn combine_indices(title: &[TokenIndex], abstract_: &[TokenIndex]) -> Vec<usize> {
    title
        .iter()
        .chain(abstract_.iter())
        .filter(|&&i| i > 0)
        .map(|&i| i as usize)
        .collect()
}

impl EmbeddingTable {
    /// Element-wise sum of the rows at `indices`; zero for an empty slice.
    pub fn sum_rows(&self, indices: &[usize]) -> Result<Array1<f32>> {
        let mut sum = Array1::<f32>::zeros(self.dim());
        let matrix = self.matrix();
        for &i in indices {
            if i >= self.rows() {
                return Err(DocsimError::IndexOutOfRange { index: i as i64, rows: self.rows() });
            }
            sum += &matrix.row(i);
        }
        Ok(sum)
    }

    /// Unit-length vector for one document.
    pub fn index_set_to_vector(&self, title: &[TokenIndex], abstract_: &[TokenIndex]) -> Result<Array1<f32>> {
        let sum = self.sum_rows(&combine_indices(title, abstract_))?;
        let norm = sum.dot(&sum).sqrt();
        Ok(sum / norm)
    }

    /// One row per document; `titles[i]` pairs with `abstracts[i]`.
    pub fn to_vectors<T, A>(&self, titles: &[T], abstracts: &[A]) -> Result<Array2<f32>>
    where
        T: AsRef<[TokenIndex]>,
        A: AsRef<[TokenIndex]>,
    {
        if titles.len() != abstracts.len() {
            return Err(DocsimError::BatchMismatch(format!(
                "{} titles vs {} abstracts",
                titles.len(),
                abstracts.len()
            )));
        }
        let mut out = Array2::<f32>::zeros((titles.len(), self.dim()));
        for (doc, (title, abstract_)) in titles.iter().zip(abstracts).enumerate() {
            let v = self.index_set_to_vector(title.as_ref(), abstract_.as_ref())?;
            if v.iter().any(|x| !x.is_finite()) {
                tracing::warn!(doc, "document has no embedded tokens; its vector is NaN");
            }
            out.row_mut(doc).assign(&v);
        }
        Ok(out)
    }
}
