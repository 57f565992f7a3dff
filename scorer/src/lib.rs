use anyhow::{Context, Result};
use clap::Parser;
use docsim_core::persist::{load_vocabulary, VocabPaths};
use docsim_core::{EmbeddingSumModel, EmbeddingTable, PairBatch, SimilarityModel, TokenIndex, Vocabulary};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "scorer")]
#[command(about = "Score document pairs by the cosine of their summed word vectors")]
pub struct Args {
    /// Vocabulary directory written by `indexer build`
    #[arg(long)]
    pub vocab: PathBuf,
    /// Embedding text file; its name must encode the dimensionality, e.g. glove.6B.50d.txt
    #[arg(long, env = "DOCSIM_EMBEDDINGS")]
    pub embeddings: PathBuf,
    /// JSONL file of {"id", "a": {"title", "abstract"}, "b": {...}} records
    #[arg(long)]
    pub pairs: PathBuf,
    /// Output JSONL path; stdout when omitted
    #[arg(long)]
    pub output: Option<PathBuf>,
    #[arg(long, default_value_t = 50)]
    pub max_title_len: usize,
    #[arg(long, default_value_t = 500)]
    pub max_abstract_len: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct EncodeConfig {
    pub max_title_len: usize,
    pub max_abstract_len: usize,
}

impl Default for EncodeConfig {
    fn default() -> Self { Self { max_title_len: 50, max_abstract_len: 500 } }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairRecord {
    pub id: serde_json::Value,
    pub a: Document,
    pub b: Document,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredPair {
    pub id: serde_json::Value,
    /// NaN (serialized as null) when either document has no embedded tokens.
    pub score: f32,
}

/// Encode every pair with `vocab` and score the whole set as one batch.
pub fn score_pairs<M: SimilarityModel>(model: &M, vocab: &Vocabulary, pairs: Vec<PairRecord>, cfg: EncodeConfig) -> Result<Vec<ScoredPair>> {
    let n = pairs.len();
    let mut title_a: Vec<Vec<TokenIndex>> = Vec::with_capacity(n);
    let mut abstract_a: Vec<Vec<TokenIndex>> = Vec::with_capacity(n);
    let mut title_b: Vec<Vec<TokenIndex>> = Vec::with_capacity(n);
    let mut abstract_b: Vec<Vec<TokenIndex>> = Vec::with_capacity(n);
    for p in &pairs {
        title_a.push(vocab.encode(&p.a.title, cfg.max_title_len));
        abstract_a.push(vocab.encode(&p.a.abstract_text, cfg.max_abstract_len));
        title_b.push(vocab.encode(&p.b.title, cfg.max_title_len));
        abstract_b.push(vocab.encode(&p.b.abstract_text, cfg.max_abstract_len));
    }

    let batch = PairBatch::new(&title_a, &abstract_a, &title_b, &abstract_b)?;
    let (score, _, _) = model.predict(&batch)?.into_triple();
    Ok(pairs.into_iter().zip(score).map(|(p, score)| ScoredPair { id: p.id, score }).collect())
}

pub fn read_pairs<R: BufRead>(reader: R) -> Result<Vec<PairRecord>> {
    let mut pairs = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let rec: PairRecord = serde_json::from_str(&line).with_context(|| format!("pairs line {}", lineno + 1))?;
        pairs.push(rec);
    }
    Ok(pairs)
}

pub fn write_scores<W: Write>(mut out: W, scores: &[ScoredPair]) -> Result<()> {
    for s in scores {
        serde_json::to_writer(&mut out, s)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Load vocabulary and embeddings, score the pairs file, write results.
pub fn run(args: &Args) -> Result<usize> {
    let vocab = load_vocabulary(&VocabPaths::new(&args.vocab))
        .with_context(|| format!("loading vocabulary from {}", args.vocab.display()))?;
    let table = EmbeddingTable::load(&args.embeddings, &vocab)
        .with_context(|| format!("loading embeddings from {}", args.embeddings.display()))?;
    let model = EmbeddingSumModel::new(table);

    let pairs = read_pairs(BufReader::new(File::open(&args.pairs)?))?;
    let cfg = EncodeConfig { max_title_len: args.max_title_len, max_abstract_len: args.max_abstract_len };
    let scores = score_pairs(&model, &vocab, pairs, cfg)?;
    let nan = scores.iter().filter(|s| s.score.is_nan()).count();
    if nan > 0 {
        tracing::warn!(nan, "some pairs have an empty document and scored NaN");
    }

    match &args.output {
        Some(path) => write_scores(BufWriter::new(File::create(path)?), &scores)?,
        None => write_scores(io::stdout().lock(), &scores)?,
    }
    tracing::info!(pairs = scores.len(), "scoring complete");
    Ok(scores.len())
}
