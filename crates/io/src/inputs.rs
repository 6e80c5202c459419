// Turn operator-supplied paths into a checked list of table files.

use std::path::{Path, PathBuf};

use crate::error::IoError;

/// Supported table file kinds, detected by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Xlsx,
    Xls,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            _ => None,
        }
    }

    pub fn is_spreadsheet(&self) -> bool {
        matches!(self, Self::Xlsx | Self::Xls)
    }
}

/// Directory globs, in the order files are listed.
const PATTERNS: [&str; 3] = ["*.csv", "*.xlsx", "*.xls"];

/// Strip one pair of surrounding quotes and whitespace (drag-and-drop paths).
pub fn clean_path(raw: &str) -> String {
    raw.trim().trim_matches(|c| c == '"' || c == '\'').trim().to_string()
}

/// Split a line of paths on `separator` (whitespace when `None`).
pub fn split_path_list(input: &str, separator: Option<char>) -> Vec<String> {
    let parts: Vec<&str> = match separator {
        Some(sep) => input.split(sep).collect(),
        None => input.split_whitespace().collect(),
    };
    parts
        .into_iter()
        .map(clean_path)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Every path must exist and carry a supported extension.
pub fn resolve_files(paths: &[String], sort: bool) -> Result<Vec<PathBuf>, IoError> {
    if paths.is_empty() {
        return Err(IoError::NoPaths);
    }

    let mut files = Vec::with_capacity(paths.len());
    for raw in paths {
        let path = PathBuf::from(raw);
        if !path.exists() {
            return Err(IoError::NotFound(path));
        }
        if FileKind::from_path(&path).is_none() {
            return Err(IoError::UnsupportedFormat(path));
        }
        files.push(path);
    }

    if sort {
        sort_paths(&mut files);
    }
    Ok(files)
}

/// All `.csv`, `.xlsx`, `.xls` files directly inside `dir`.
pub fn resolve_directory(dir: &Path, sort: bool) -> Result<Vec<PathBuf>, IoError> {
    if !dir.is_dir() {
        return Err(IoError::NotADirectory(dir.to_path_buf()));
    }

    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let mut files = Vec::new();
    for pattern in PATTERNS {
        let full = format!("{}/{}", escaped, pattern);
        let entries = glob::glob(&full).map_err(|e| IoError::read(dir, e))?;
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => log::warn!("skipping unreadable entry: {}", e),
            }
        }
    }

    if files.is_empty() {
        return Err(IoError::NoInputFiles(dir.to_path_buf()));
    }
    log::debug!("found {} files in {}", files.len(), dir.display());

    if sort {
        sort_paths(&mut files);
    }
    Ok(files)
}

/// Lenient variant: split into (existing, missing) without failing.
pub fn partition_existing(paths: &[String]) -> (Vec<PathBuf>, Vec<PathBuf>) {
    paths
        .iter()
        .map(PathBuf::from)
        .partition(|p| p.exists())
}

/// Case-sensitive lexical order of the path strings.
pub fn sort_paths(files: &mut [PathBuf]) {
    files.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
}
