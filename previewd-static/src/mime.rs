//! MIME type handling

use std::path::Path;

/// Get the MIME type for a path, from its extension
pub fn guess_mime_type<P: AsRef<Path>>(path: P) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
}
