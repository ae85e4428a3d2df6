use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};
use sigma_taste_analysis::{comparison::Comparison, load, store::TasteStore, video::Video};

/// JSON sink: a file when a path is given, stdout otherwise.
pub struct Output {
    writer: Box<dyn Write>,
    label: String,
}

impl Output {
    pub fn open(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                Ok(Self {
                    writer: Box::new(BufWriter::new(file)),
                    label: path.display().to_string(),
                })
            }
            None => Ok(Self {
                writer: Box::new(io::stdout().lock()),
                label: "stdout".to_owned(),
            }),
        }
    }

    pub fn save_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        Self::open(path)?.write_json(value)
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        serde_json::to_writer_pretty(&mut self.writer, value)
            .with_context(|| format!("Failed to write JSON to {}", self.label))?;
        writeln!(self.writer).with_context(|| format!("Failed to write to {}", self.label))?;
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush output to {}", self.label))?;
        tracing::debug!(output = %self.label, "wrote JSON");
        Ok(())
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(io::BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

pub fn read_videos_file(path: &Path) -> anyhow::Result<Vec<Video>> {
    load::load_videos(path)
        .with_context(|| format!("Failed to load videos file: {}", path.display()))
}

pub fn read_comparisons_file(path: &Path) -> anyhow::Result<Vec<Comparison>> {
    load::load_comparisons(path)
        .with_context(|| format!("Failed to load comparisons file: {}", path.display()))
}

pub fn read_store_file(path: &Path) -> anyhow::Result<TasteStore> {
    load::load_store(path)
        .with_context(|| format!("Failed to load dataset file: {}", path.display()))
}

/// Input files shared by every dataset command.
#[derive(Debug, Clone, clap::Args)]
pub struct DatasetArg {
    /// Videos JSON file (`{"videos": [...]}` or a bare array)
    #[arg(long)]
    pub videos: PathBuf,
    /// Comparisons JSON file (`{"comparisons": [...]}` or a bare array)
    #[arg(long)]
    pub comparisons: PathBuf,
}

impl DatasetArg {
    pub fn load(&self) -> anyhow::Result<(Vec<Video>, Vec<Comparison>)> {
        let videos = read_videos_file(&self.videos)?;
        let comparisons = read_comparisons_file(&self.comparisons)?;
        eprintln!(
            "Loaded {} videos and {} comparisons",
            videos.len(),
            comparisons.len()
        );
        Ok((videos, comparisons))
    }
}
