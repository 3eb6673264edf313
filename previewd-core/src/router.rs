//! Route resolution
//!
//! Maps an inbound request path to exactly one [`RouteDecision`]. The
//! decision order is fixed and first match wins: root listing, project
//! redirect/listing, files-root lookup, then delegation to static serving.
//! Project redirection sits ahead of generic static serving so that visiting
//! a bare project folder always lands on its entry point.

use crate::config::PreviewConfig;
use crate::index;
use crate::probe::{self, ProbedEntry};
use crate::scanner::{ContentScanner, Inventory};
use std::path::PathBuf;

/// Listing payload handed to the renderer
#[derive(Debug, Clone)]
pub enum Listing {
    /// Full inventory for the root page
    Inventory(Inventory),
    /// Flat listing of one directory's immediate children
    Directory {
        label: String,
        entries: Vec<ProbedEntry>,
    },
}

/// Outcome of resolving one request path
#[derive(Debug, Clone)]
pub enum RouteDecision {
    /// 302 to the given path
    Redirect { target: String },
    /// Render a listing page
    Listing(Listing),
    /// Serve the file at this resolved path
    File { path: PathBuf },
    /// Not ours; let the static file server try
    Unhandled,
}

/// Resolves request paths against the configured roots
pub struct RouteResolver {
    config: PreviewConfig,
    scanner: ContentScanner,
}

impl RouteResolver {
    /// Create a resolver over the given configuration
    pub fn new(config: PreviewConfig) -> Self {
        let scanner = ContentScanner::new(config.clone());
        Self { config, scanner }
    }

    /// Decide how to answer `request_path`.
    ///
    /// Redirect and file decisions probe the filesystem at decision time,
    /// independently of any earlier listing scan. Under concurrent mutation
    /// the two can disagree; for a local dev tool that staleness is benign.
    pub async fn resolve(&self, request_path: &str) -> RouteDecision {
        let Some(segments) = split_segments(request_path) else {
            // Traversal or malformed path; never reaches the filesystem
            tracing::debug!("Rejecting path {}", request_path);
            return RouteDecision::Unhandled;
        };

        if segments.is_empty() {
            return RouteDecision::Listing(Listing::Inventory(self.scanner.scan().await));
        }

        if segments.len() == 2 && segments[0] == self.config.projects_root {
            return self.resolve_project(segments[1]).await;
        }

        if segments.len() >= 2 && segments[0] == self.config.files_root {
            return self.resolve_file(&segments[1..]).await;
        }

        RouteDecision::Unhandled
    }

    /// Step 2: bare project path, `/<projectsRoot>/<name>`
    async fn resolve_project(&self, name: &str) -> RouteDecision {
        let dir = self.config.projects_dir().join(name);
        if !probe::is_directory(&dir).await {
            return RouteDecision::Unhandled;
        }

        match index::resolve_index(&dir).await {
            Some(entry) => RouteDecision::Redirect {
                target: format!("/{}/{}/{}", self.config.projects_root, name, entry),
            },
            None => RouteDecision::Listing(Listing::Directory {
                label: name.to_string(),
                entries: probe::list_entries(&dir).await,
            }),
        }
    }

    /// Step 3: lookup under the files root
    async fn resolve_file(&self, rest: &[&str]) -> RouteDecision {
        let mut path = self.config.files_dir();
        for segment in rest.iter().copied() {
            path.push(segment);
        }

        if !probe::is_file(&path).await {
            return RouteDecision::Unhandled;
        }

        // Resolve to an absolute path for the static server
        let path = tokio::fs::canonicalize(&path).await.unwrap_or(path);
        RouteDecision::File { path }
    }
}

/// Split a request path into segments, rejecting anything that could climb
/// above the server root
fn split_segments(path: &str) -> Option<Vec<&str>> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" => continue,
            "." | ".." => return None,
            s => segments.push(s),
        }
    }
    Some(segments)
}
