use crate::error::{DocsimError, Result};
use crate::tokenizer::tokenize;
use crate::{TokenIndex, VocabId, PADDING};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping from cleaned token to a positive id. Id 0 stays free for padding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    word_to_index: HashMap<String, VocabId>,
}

impl Vocabulary {
    /// Wrap a mapping produced elsewhere. Ids are kept as given.
    pub fn from_map(word_to_index: HashMap<String, VocabId>) -> Result<Self> {
        if let Some((word, _)) = word_to_index.iter().find(|(_, &id)| id == 0) {
            return Err(DocsimError::Vocabulary(format!("word {word:?} uses reserved id 0")));
        }
        Ok(Self { word_to_index })
    }

    pub fn get(&self, word: &str) -> Option<VocabId> { self.word_to_index.get(word).copied() }
    pub fn len(&self) -> usize { self.word_to_index.len() }
    pub fn is_empty(&self) -> bool { self.word_to_index.is_empty() }
    pub fn max_id(&self) -> Option<VocabId> { self.word_to_index.values().copied().max() }
    pub fn iter(&self) -> impl Iterator<Item = (&str, VocabId)> {
        self.word_to_index.iter().map(|(w, &id)| (w.as_str(), id))
    }

    /// Token indices of `text`, truncated and right-padded to exactly `max_len`.
    /// Tokens missing from the vocabulary are dropped before truncation.
    pub fn encode(&self, text: &str, max_len: usize) -> Vec<TokenIndex> {
        let mut out: Vec<TokenIndex> = tokenize(text)
            .iter()
            .filter_map(|t| self.get(t))
            .map(TokenIndex::from)
            .take(max_len)
            .collect();
        out.resize(max_len, PADDING);
        out
    }
}

/// Counts tokens over a corpus, then freezes them into a [`Vocabulary`].
#[derive(Debug, Default)]
pub struct VocabularyBuilder {
    counts: HashMap<String, u64>,
}

impl VocabularyBuilder {
    pub fn new() -> Self { Self::default() }

    pub fn add_text(&mut self, text: &str) {
        for token in tokenize(text) {
            *self.counts.entry(token).or_insert(0) += 1;
        }
    }

    pub fn num_tokens(&self) -> usize { self.counts.len() }

    /// Assign ids from 1, most frequent first, ties broken alphabetically.
    pub fn build(self, min_count: u64) -> Vocabulary {
        let mut kept: Vec<(String, u64)> = self.counts.into_iter().filter(|(_, c)| *c >= min_count).collect();
        kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let word_to_index = kept
            .into_iter()
            .enumerate()
            .map(|(i, (word, _))| (word, i as VocabId + 1))
            .collect();
        Vocabulary { word_to_index }
    }
}
