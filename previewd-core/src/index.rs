//! Entry-point resolution for project directories

use crate::probe;
use std::path::Path;

/// Candidate index file names, checked in priority order
pub const INDEX_CANDIDATES: [&str; 4] = ["index.html", "index.htm", "main.html", "app.html"];

/// Pick the canonical entry file of a directory.
///
/// Two-tier policy: the first name from [`INDEX_CANDIDATES`] that exists as a
/// direct child wins; failing that, the first `.html` file in listing order.
/// Returns `None` when the directory holds no HTML at all. This decides which
/// page a visitor lands on for every project, so the order is load-bearing.
pub async fn resolve_index(dir: &Path) -> Option<String> {
    for candidate in INDEX_CANDIDATES {
        if probe::is_file(&dir.join(candidate)).await {
            return Some(candidate.to_string());
        }
    }

    probe::list_entries(dir)
        .await
        .into_iter()
        .find(|e| !e.is_dir && e.name.ends_with(".html"))
        .map(|e| e.name)
}
