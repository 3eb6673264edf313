//! Content discovery
//!
//! Walks the configured roots and classifies what it finds into an
//! [`Inventory`]. Every scan reads the filesystem fresh; nothing is cached
//! between requests, so the disk is always the source of truth.

use crate::config::PreviewConfig;
use crate::index;
use crate::probe;

/// Classification of a servable unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// An HTML file under the files root, servable directly
    StandaloneFile,
    /// A subdirectory under the projects root with at least one top-level HTML file
    Project,
    /// Anything else under the files root (non-HTML file or directory)
    OtherFile,
}

/// A servable unit discovered by a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    /// POSIX-style path relative to the working directory; never contains `..`
    pub relative_path: String,
    pub kind: EntityKind,
}

/// A project directory and its resolved entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    /// POSIX-style path relative to the working directory; never contains `..`
    pub relative_path: String,
    /// Resolved index file name, if the project has one
    pub entry_file: Option<String>,
}

/// The classified result of one scan, discarded after the response
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub projects: Vec<Project>,
    pub standalone_files: Vec<Entity>,
    pub other_files: Vec<Entity>,
}

/// Scans the configured roots into an [`Inventory`]
pub struct ContentScanner {
    config: PreviewConfig,
}

impl ContentScanner {
    /// Create a scanner over the given configuration
    pub fn new(config: PreviewConfig) -> Self {
        Self { config }
    }

    /// Scan both roots. Missing roots contribute nothing; unreadable
    /// subdirectories are skipped, never fatal.
    pub async fn scan(&self) -> Inventory {
        let mut inventory = Inventory::default();
        self.scan_projects(&mut inventory).await;
        self.scan_files(&mut inventory).await;
        tracing::debug!(
            "Scan found {} project(s), {} standalone file(s), {} other",
            inventory.projects.len(),
            inventory.standalone_files.len(),
            inventory.other_files.len()
        );
        inventory
    }

    async fn scan_projects(&self, inventory: &mut Inventory) {
        let projects_dir = self.config.projects_dir();
        for entry in probe::list_entries(&projects_dir).await {
            if !entry.is_dir {
                continue;
            }

            let dir = projects_dir.join(&entry.name);
            // Qualification is a direct listing only: deeply nested HTML does
            // not make a project
            let has_html = probe::list_entries(&dir)
                .await
                .iter()
                .any(|e| !e.is_dir && e.name.ends_with(".html"));
            if !has_html {
                tracing::debug!("Skipping {} (no top-level HTML)", dir.display());
                continue;
            }

            let entry_file = index::resolve_index(&dir).await;
            inventory.projects.push(Project {
                relative_path: format!("{}/{}", self.config.projects_root, entry.name),
                name: entry.name,
                entry_file,
            });
        }
    }

    async fn scan_files(&self, inventory: &mut Inventory) {
        let files_dir = self.config.files_dir();
        for entry in probe::list_entries(&files_dir).await {
            let relative_path = format!("{}/{}", self.config.files_root, entry.name);
            if !entry.is_dir && entry.name.ends_with(".html") {
                inventory.standalone_files.push(Entity {
                    name: entry.name,
                    relative_path,
                    kind: EntityKind::StandaloneFile,
                });
            } else {
                // Directories under the files root are listed by name, not recursed
                inventory.other_files.push(Entity {
                    name: entry.name,
                    relative_path,
                    kind: EntityKind::OtherFile,
                });
            }
        }
    }
}
