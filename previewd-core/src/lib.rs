//! Previewd Core Library
//!
//! This crate provides the discovery and routing engine for the previewd
//! development server: filesystem probing, entry-point resolution, content
//! scanning, and route decisions, plus configuration and error handling.

pub mod config;
pub mod error;
pub mod index;
pub mod probe;
pub mod router;
pub mod scanner;

pub use config::PreviewConfig;
pub use error::{Error, Result};
pub use router::{Listing, RouteDecision, RouteResolver};
pub use scanner::{ContentScanner, Entity, EntityKind, Inventory, Project};

/// Previewd version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
