//! Persistence of the annotated document.
//!
//! The engine calls [`DocumentSink::persist`] exactly once per run, on
//! whichever terminal path it reaches.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::document::Document;

/// Errors that can occur while writing the result document
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("failed serialize result: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed write result to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for the final document
pub trait DocumentSink {
    fn persist(&mut self, doc: &Document) -> Result<(), PersistError>;
}

/// Writes pretty-printed JSON to a file, truncating it, and syncs before close
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl DocumentSink for JsonFileSink {
    fn persist(&mut self, doc: &Document) -> Result<(), PersistError> {
        info!("scenario flush from memory to {}", self.path.display());
        let json = serde_json::to_vec_pretty(doc)?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        file.write_all(&json).map_err(|e| self.io_error(e))?;
        file.sync_all().map_err(|e| self.io_error(e))?;

        info!("save to {} bytes {}", self.path.display(), json.len());
        Ok(())
    }
}

/// Keeps every persisted snapshot in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub snapshots: Vec<Document>,
}

impl DocumentSink for MemorySink {
    fn persist(&mut self, doc: &Document) -> Result<(), PersistError> {
        self.snapshots.push(doc.clone());
        Ok(())
    }
}
