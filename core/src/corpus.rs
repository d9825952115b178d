use crate::document::Document;
use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Load every `.txt` file directly inside `dir`, sorted by file name. Each
/// document is keyed by its path.
pub fn load_corpus<P: AsRef<Path>>(dir: P) -> Result<Vec<Document>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        let e = io::Error::new(io::ErrorKind::NotFound, "corpus directory does not exist");
        return Err(Error::io(dir, e));
    }
    let mut docs = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            Error::io(path, e.into())
        })?;
        let p = entry.path();
        if !entry.file_type().is_file() || p.extension().and_then(|s| s.to_str()) != Some("txt") {
            continue;
        }
        let text = fs::read_to_string(p).map_err(|e| Error::io(p, e))?;
        docs.push(Document::parse(p.to_string_lossy(), &text));
    }
    tracing::info!(dir = %dir.display(), num_docs = docs.len(), "loaded corpus");
    Ok(docs)
}
