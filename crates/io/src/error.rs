use std::path::PathBuf;

use thiserror::Error;
use xlsel_engine::EngineError;

/// Failures while locating, reading, or writing table files.
#[derive(Error, Debug)]
pub enum IoError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("no .csv, .xlsx or .xls files in {}", .0.display())]
    NoInputFiles(PathBuf),

    #[error("no input paths given")]
    NoPaths,

    #[error("unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("cannot decode {} with any of: {}", .path.display(), .tried.join(", "))]
    Undecodable { path: PathBuf, tried: Vec<String> },

    #[error("unknown text encoding '{0}'")]
    UnknownEncoding(String),

    #[error("failed to read {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    #[error("{} has no sheets", .0.display())]
    NoSheets(PathBuf),

    #[error("failed to write {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },

    #[error("{0}")]
    Engine(#[from] EngineError),
}

impl IoError {
    pub(crate) fn read(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::Read { path: path.to_path_buf(), reason: reason.to_string() }
    }

    pub(crate) fn write(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::Write { path: path.to_path_buf(), reason: reason.to_string() }
    }
}
