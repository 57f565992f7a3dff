use crate::error::{DocsimError, Result};
use crate::tokenizer::clean_text;
use crate::vocab::Vocabulary;
use crate::VocabId;
use ndarray::{Array2, ArrayView1, ArrayView2};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Pretrained word vectors laid out by vocabulary id.
///
/// Row `v` holds the vector for id `v`; ids the embedding file never mentions
/// (including the padding row 0) stay all-zero.
#[derive(Debug, Clone)]
pub struct EmbeddingTable {
    matrix: Array2<f32>,
    covered: usize,
}

/// Dimensionality encoded in a file name such as `glove.6B.50d.txt`.
///
/// The last dot-segment of the file stem (`50d`) minus its final character
/// must parse as a positive integer.
pub fn dimensionality_from_path(path: &Path) -> Result<usize> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| DocsimError::Config(format!("no file name in {}", path.display())))?;
    let segment = stem.rsplit('.').next().unwrap_or(stem);
    let mut chars = segment.chars();
    chars.next_back();
    let dim: usize = chars
        .as_str()
        .parse()
        .map_err(|_| DocsimError::Config(format!("cannot read dimensionality from {:?} in {}", segment, path.display())))?;
    if dim == 0 {
        return Err(DocsimError::Config(format!("zero dimensionality in {}", path.display())));
    }
    Ok(dim)
}

impl EmbeddingTable {
    /// Read a whitespace-delimited vector file for the words in `vocab`.
    pub fn load<P: AsRef<Path>>(path: P, vocab: &Vocabulary) -> Result<Self> {
        let path = path.as_ref();
        let dim = dimensionality_from_path(path)?;
        let file = File::open(path)?;
        let table = Self::from_reader(BufReader::new(file), dim, vocab)?;
        tracing::info!(
            path = %path.display(),
            dim,
            rows = table.rows(),
            covered = table.covered,
            vocab_size = vocab.len(),
            "loaded embedding table"
        );
        Ok(table)
    }

    /// Parse lines of `word c1 c2 ... c_dim` from any reader.
    pub fn from_reader<R: BufRead>(reader: R, dim: usize, vocab: &Vocabulary) -> Result<Self> {
        let max_id = vocab
            .max_id()
            .ok_or_else(|| DocsimError::Config("vocabulary is empty".into()))?;
        let mut matrix = Array2::<f32>::zeros((max_id as usize + 1, dim));
        let mut seen = vec![false; max_id as usize + 1];

        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            let mut fields = line.split_whitespace();
            let Some(raw_word) = fields.next() else { continue };
            let Some(id) = vocab.get(&clean_text(raw_word)) else { continue };

            let mut row = matrix.row_mut(id as usize);
            let mut count = 0usize;
            for field in fields {
                if count == dim {
                    count += 1;
                    break;
                }
                row[count] = field.parse::<f32>().map_err(|_| DocsimError::Parse {
                    line: lineno + 1,
                    reason: format!("component {field:?} is not a number"),
                })?;
                count += 1;
            }
            if count != dim {
                let found = if count > dim { "more" } else { "fewer" };
                return Err(DocsimError::Parse {
                    line: lineno + 1,
                    reason: format!("expected {dim} components for {raw_word:?}, found {found}"),
                });
            }
            seen[id as usize] = true;
        }

        let covered = seen.iter().filter(|s| **s).count();
        Ok(Self { matrix, covered })
    }

    /// Build directly from a matrix, e.g. for synthetic tables.
    pub fn from_matrix(matrix: Array2<f32>) -> Result<Self> {
        if matrix.nrows() == 0 || matrix.ncols() == 0 {
            return Err(DocsimError::Config(format!("degenerate matrix shape {:?}", matrix.dim())));
        }
        let covered = matrix
            .outer_iter()
            .skip(1)
            .filter(|r| r.iter().any(|x| *x != 0.0))
            .count();
        Ok(Self { matrix, covered })
    }

    pub fn dim(&self) -> usize { self.matrix.ncols() }
    pub fn rows(&self) -> usize { self.matrix.nrows() }
    /// Number of vocabulary ids that received a vector.
    pub fn coverage(&self) -> usize { self.covered }
    pub fn matrix(&self) -> ArrayView2<'_, f32> { self.matrix.view() }

    pub fn row(&self, id: VocabId) -> Option<ArrayView1<'_, f32>> {
        let id = id as usize;
        (id < self.rows()).then(|| self.matrix.row(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Cursor;

    fn vocab(words: &[(&str, VocabId)]) -> Vocabulary {
        let m: HashMap<String, VocabId> = words.iter().map(|(w, i)| (w.to_string(), *i)).collect();
        Vocabulary::from_map(m).unwrap()
    }

    #[test]
    fn dimensionality_from_glove_names() {
        assert_eq!(dimensionality_from_path(Path::new("glove.6B.50d.txt")).unwrap(), 50);
        assert_eq!(dimensionality_from_path(Path::new("/data/v1.2/glove.840B.300d.txt")).unwrap(), 300);
        assert_eq!(dimensionality_from_path(Path::new("glove.twitter.27B.25d.txt")).unwrap(), 25);
    }

    #[test]
    fn dimensionality_rejects_unknown_format() {
        for p in ["embeddings.bin", "vectors.100d", "glove.6B.d.txt", "glove.0d.txt", ""] {
            assert!(matches!(dimensionality_from_path(Path::new(p)), Err(DocsimError::Config(_))), "{p}");
        }
    }

    #[test]
    fn shape_follows_max_vocab_id() {
        let v = vocab(&[("a", 1), ("b", 7)]);
        let t = EmbeddingTable::from_reader(Cursor::new("a 1 2 3\n"), 3, &v).unwrap();
        assert_eq!(t.matrix().dim(), (8, 3));
        assert_eq!(t.coverage(), 1);
        assert!(t.row(7).unwrap().iter().all(|x| *x == 0.0));
    }

    #[test]
    fn cleans_words_and_skips_unknown() {
        let v = vocab(&[("cat", 1)]);
        let data = "CAT 0.5 -1.5\nzebra not numbers at all\n\n";
        let t = EmbeddingTable::from_reader(Cursor::new(data), 2, &v).unwrap();
        assert_eq!(t.row(1).unwrap().to_vec(), vec![0.5, -1.5]);
    }

    #[test]
    fn later_lines_overwrite() {
        let v = vocab(&[("cat", 1)]);
        let t = EmbeddingTable::from_reader(Cursor::new("cat 1 1\ncat 2 2\n"), 2, &v).unwrap();
        assert_eq!(t.row(1).unwrap().to_vec(), vec![2.0, 2.0]);
    }

    #[test]
    fn wrong_component_count_is_parse_error() {
        let v = vocab(&[("cat", 1)]);
        let short = EmbeddingTable::from_reader(Cursor::new("x 1\ncat 1.0\n"), 2, &v).unwrap_err();
        assert!(matches!(short, DocsimError::Parse { line: 2, .. }));
        let long = EmbeddingTable::from_reader(Cursor::new("cat 1 2 3\n"), 2, &v).unwrap_err();
        assert!(matches!(long, DocsimError::Parse { line: 1, .. }));
    }

    #[test]
    fn non_numeric_component_is_parse_error() {
        let v = vocab(&[("cat", 1)]);
        let err = EmbeddingTable::from_reader(Cursor::new("cat 1.0 abc\n"), 2, &v).unwrap_err();
        assert!(err.to_string().contains("\"abc\""));
    }

    #[test]
    fn empty_vocabulary_is_config_error() {
        let err = EmbeddingTable::from_reader(Cursor::new("cat 1 2\n"), 2, &Vocabulary::default()).unwrap_err();
        assert!(matches!(err, DocsimError::Config(_)));
    }
}
