//! Bio fragment parsing and JSONL persistence
//!
//! Unstructured bios arrive as per-user directories of `.txt` fragments
//! (`<dir>/<user_id>/<source>.txt`). Fragments merge into one bio string
//! per user, separated by blank lines, with source tags kept in merge
//! order. PDF text extraction happens upstream of this step; this reader
//! only consumes text files.

use std::io::BufRead;
use std::io::Write;
use std::path::Path;

use tracing::warn;

use crate::models::BioDocument;
use crate::Result;

/// Parse every user directory under `root` into merged bio documents.
///
/// Directories are visited in name order and fragments within a directory
/// in file-name order, so re-runs over the same tree are deterministic.
/// Hidden files and non-`.txt` files are skipped. Users whose directory
/// yields no usable fragment produce no document.
pub fn parse_bio_fragments<P: AsRef<Path>>(root: P) -> Result<Vec<BioDocument>> {
    let root = root.as_ref();
    if !root.exists() {
        warn!("Unstructured data directory not found: {}", root.display());
        return Ok(Vec::new());
    }

    let mut user_dirs: Vec<_> = std::fs::read_dir(root)?
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.path().is_dir())
        .collect();
    user_dirs.sort_by_key(std::fs::DirEntry::file_name);

    let mut documents = Vec::new();

    for user_dir in user_dirs {
        let user_id = user_dir.file_name().to_string_lossy().to_string();

        let mut fragments: Vec<_> = std::fs::read_dir(user_dir.path())?
            .filter_map(std::result::Result::ok)
            .filter(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                !name.starts_with('.') && name.ends_with(".txt") && entry.path().is_file()
            })
            .collect();
        fragments.sort_by_key(std::fs::DirEntry::file_name);

        let mut bio = String::new();
        let mut sources = Vec::new();

        for fragment in fragments {
            let content = match std::fs::read_to_string(fragment.path()) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping unreadable fragment {:?}: {}", fragment.path(), e);
                    continue;
                }
            };

            if content.trim().is_empty() {
                continue;
            }

            let source = fragment
                .path()
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_default();

            bio.push_str(&content);
            bio.push_str("\n\n");
            sources.push(source);
        }

        if sources.is_empty() {
            continue;
        }

        documents.push(BioDocument {
            user_id,
            bio: bio.trim().to_string(),
            sources,
        });
    }

    Ok(documents)
}

/// Write bio documents as line-delimited JSON.
pub fn write_bio_documents_jsonl<P: AsRef<Path>>(
    documents: &[BioDocument],
    path: P,
) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(path)?;
    for document in documents {
        let line = serde_json::to_string(document)?;
        writeln!(file, "{line}")?;
    }

    Ok(())
}

/// Read bio documents from line-delimited JSON.
pub fn read_bio_documents_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<BioDocument>> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);

    let mut documents = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        documents.push(serde_json::from_str(&line)?);
    }

    Ok(documents)
}
