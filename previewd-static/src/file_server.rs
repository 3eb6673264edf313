//! File server implementation

use crate::mime;
use previewd_core::error::Result;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Static file server rooted at one directory
pub struct FileServer {
    root: PathBuf,
}

/// Response from the file server
#[derive(Debug)]
pub struct ServedFile {
    pub content: Vec<u8>,
    pub mime_type: String,
    pub path: PathBuf,
    pub last_modified: Option<String>,
    pub etag: Option<String>,
}

impl FileServer {
    /// Create a file server for a directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Serve a request path relative to the root.
    ///
    /// Returns `Ok(None)` for anything that is not a servable file: missing
    /// paths, directories, or paths that try to climb out of the root.
    pub async fn serve(&self, path: &str) -> Result<Option<ServedFile>> {
        // Prevent path traversal
        if path.split('/').any(|s| s == "..") {
            return Ok(None);
        }

        let file_path = self.root.join(path.trim_start_matches('/'));
        tracing::debug!("Serving request: {} -> {:?}", path, file_path);

        self.serve_path(&file_path).await
    }

    /// Serve a pre-resolved filesystem path with the same response shape
    pub async fn serve_path(&self, file_path: &Path) -> Result<Option<ServedFile>> {
        let metadata = match tokio::fs::metadata(file_path).await {
            Ok(m) => m,
            Err(_) => return Ok(None),
        };

        if !metadata.is_file() {
            return Ok(None);
        }

        let last_modified = metadata.modified().ok().map(httpdate::fmt_http_date);

        let mtime_secs = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let etag = format!("\"{:x}-{:x}\"", metadata.len(), mtime_secs);

        let content = tokio::fs::read(file_path).await?;

        let mime_type = mime::guess_mime_type(file_path).to_string();

        Ok(Some(ServedFile {
            content,
            mime_type,
            path: file_path.to_path_buf(),
            last_modified,
            etag: Some(etag),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serve_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page.html"), "<h1>hi</h1>").unwrap();

        let server = FileServer::new(dir.path());
        let served = server.serve("/page.html").await.unwrap().unwrap();

        assert_eq!(served.content, b"<h1>hi</h1>");
        assert_eq!(served.mime_type, "text/html");
        assert!(served.etag.is_some());
        assert!(served.last_modified.is_some());
    }

    #[tokio::test]
    async fn test_unknown_extension_served_as_octet_stream() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.blob"), [0u8, 1, 2]).unwrap();

        let server = FileServer::new(dir.path());
        let served = server.serve("/data.blob").await.unwrap().unwrap();
        assert_eq!(served.mime_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn test_serve_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let server = FileServer::new(dir.path());
        assert!(server.serve("/missing.html").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_serve_directory_is_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let server = FileServer::new(dir.path());
        assert!(server.serve("/sub").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("www");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(dir.path().join("secret.txt"), "top secret").unwrap();

        let server = FileServer::new(&sub);
        assert!(server.serve("/../secret.txt").await.unwrap().is_none());
    }
}
