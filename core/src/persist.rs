use crate::error::Result;
use crate::vocab::Vocabulary;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_words: usize,
    pub num_docs: usize,
    pub min_count: u64,
    pub created_at: String,
    pub version: u32,
}

pub struct VocabPaths {
    pub root: PathBuf,
}

impl VocabPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn vocabulary(&self) -> PathBuf { self.root.join("vocabulary.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

pub fn save_vocabulary(paths: &VocabPaths, vocab: &Vocabulary) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.vocabulary())?;
    let bytes = bincode::serialize(vocab)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_vocabulary(paths: &VocabPaths) -> Result<Vocabulary> {
    let mut f = File::open(paths.vocabulary())?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let vocab: Vocabulary = bincode::deserialize(&buf)?;
    // snapshots written by other tools still have to respect the padding id
    Vocabulary::from_map(vocab.iter().map(|(w, id)| (w.to_owned(), id)).collect())
}

pub fn save_meta(paths: &VocabPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &VocabPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}
