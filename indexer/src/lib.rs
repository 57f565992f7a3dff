use anyhow::Result;
use docsim_core::persist::{save_meta, save_vocabulary, MetaFile, VocabPaths};
use docsim_core::VocabularyBuilder;
use serde::Deserialize;
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct InputDoc {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
}

/// Walk `input` (a file or a directory of .json/.jsonl files), count tokens in
/// every title and abstract, and write the vocabulary plus metadata to `output`.
pub fn build_vocabulary(input: &Path, output: &Path, min_count: u64) -> Result<MetaFile> {
    let mut builder = VocabularyBuilder::new();
    let mut num_docs = 0usize;

    for file in corpus_files(input) {
        let before = num_docs;
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut builder, &mut num_docs)?;
        } else {
            read_json(&file, &mut builder, &mut num_docs)?;
        }
        tracing::debug!(file = %file.display(), docs = num_docs - before, "read corpus file");
    }

    let counted = builder.num_tokens();
    let vocab = builder.build(min_count);
    tracing::info!(num_docs, counted, kept = vocab.len(), min_count, "built vocabulary");

    let paths = VocabPaths::new(output);
    save_vocabulary(&paths, &vocab)?;
    let meta = MetaFile {
        num_words: vocab.len(),
        num_docs,
        min_count,
        created_at: time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339).unwrap_or_else(|_| "".into()),
        version: 1,
    };
    save_meta(&paths, &meta)?;
    Ok(meta)
}

fn corpus_files(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        tracing::warn!(input = %input.display(), "input path does not exist");
    }
    files
}

fn read_jsonl(file: &Path, builder: &mut VocabularyBuilder, num_docs: &mut usize) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)?;
        ingest_doc(&doc, builder, num_docs);
    }
    Ok(())
}

fn read_json(file: &Path, builder: &mut VocabularyBuilder, num_docs: &mut usize) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                let doc: InputDoc = serde_json::from_value(v)?;
                ingest_doc(&doc, builder, num_docs);
            }
        }
        serde_json::Value::Object(_) => {
            let doc: InputDoc = serde_json::from_value(json)?;
            ingest_doc(&doc, builder, num_docs);
        }
        _ => {}
    }
    Ok(())
}

fn ingest_doc(doc: &InputDoc, builder: &mut VocabularyBuilder, num_docs: &mut usize) {
    builder.add_text(&doc.title);
    builder.add_text(&doc.abstract_text);
    *num_docs += 1;
}
