//! Configuration for the previewd server
//!
//! Configuration is an explicit value handed to the scanner and resolver at
//! construction time. There are no process-wide globals; tests can build a
//! config pointing at any directory.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Runtime configuration for a previewd instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Bind address
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory of project subfolders, relative to the working directory
    #[serde(default = "default_projects_root")]
    pub projects_root: String,

    /// Directory of standalone files, relative to the working directory
    #[serde(default = "default_files_root")]
    pub files_root: String,

    /// Working directory all roots resolve against
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_projects_root() -> String {
    "packages".to_string()
}

fn default_files_root() -> String {
    "files".to_string()
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            projects_root: default_projects_root(),
            files_root: default_files_root(),
            working_dir: default_working_dir(),
        }
    }
}

impl PreviewConfig {
    /// Default configuration with the port taken from the PORT environment
    /// variable when set (and parseable)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(port) = std::env::var("PORT") {
            match port.parse() {
                Ok(p) => config.port = p,
                Err(_) => tracing::warn!("Ignoring unparseable PORT value: {}", port),
            }
        }
        config
    }

    /// Absolute-or-relative path of the projects root
    pub fn projects_dir(&self) -> PathBuf {
        self.working_dir.join(&self.projects_root)
    }

    /// Absolute-or-relative path of the files root
    pub fn files_dir(&self) -> PathBuf {
        self.working_dir.join(&self.files_root)
    }

    /// Socket address string for binding
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// Configuration loader for various formats
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<PreviewConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext {
            "json" => Self::from_json(&content),
            "toml" => Self::from_toml(&content),
            _ => Err(Error::Config(format!("Unknown config format: {}", ext))),
        }
    }

    /// Parse JSON configuration
    pub fn from_json(content: &str) -> Result<PreviewConfig> {
        serde_json::from_str(content).map_err(|e| Error::Config(format!("Invalid JSON: {}", e)))
    }

    /// Parse TOML configuration
    pub fn from_toml(content: &str) -> Result<PreviewConfig> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }
}
