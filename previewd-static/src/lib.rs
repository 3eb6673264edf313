//! Previewd Static File Server Module
//!
//! Byte transmission for files the routing core resolves or delegates:
//! - MIME type detection
//! - Last-Modified / ETag caching headers
//! - Path traversal protection

mod file_server;
mod mime;

pub use file_server::{FileServer, ServedFile};
pub use mime::guess_mime_type;
