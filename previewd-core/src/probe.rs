//! Low-level filesystem probing
//!
//! The only place in the core that touches raw I/O. Every function here is
//! infallible from the caller's perspective: permission and IO errors read
//! as "does not exist" or an empty listing, so an unreadable subtree can
//! never abort a scan.

use std::path::Path;

/// One immediate child of a probed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedEntry {
    pub name: String,
    pub is_dir: bool,
}

/// True iff the path exists (file or directory)
pub async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// False if the path does not exist or is not a directory
pub async fn is_directory(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

/// True iff the path exists and is a regular file
pub async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

/// List the immediate children of a directory, sorted by name.
///
/// A failed `read_dir` returns an empty vec; an entry whose file type cannot
/// be determined is skipped with a debug log.
pub async fn list_entries(path: &Path) -> Vec<ProbedEntry> {
    let mut read_dir = match tokio::fs::read_dir(path).await {
        Ok(rd) => rd,
        Err(e) => {
            tracing::debug!("Unreadable directory {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let mut entries = Vec::new();
    loop {
        match read_dir.next_entry().await {
            Ok(Some(entry)) => {
                let name = entry.file_name().to_string_lossy().into_owned();
                match entry.file_type().await {
                    Ok(ft) => entries.push(ProbedEntry {
                        name,
                        is_dir: ft.is_dir(),
                    }),
                    Err(e) => {
                        tracing::debug!("Skipping unreadable entry {}: {}", name, e);
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!("Aborting listing of {}: {}", path.display(), e);
                break;
            }
        }
    }

    // Enumeration order is platform dependent; sort for determinism
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}
