use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Input
    pub spec_file: PathBuf,
    pub base_dir: Option<PathBuf>,

    // Output
    pub output_file: Option<PathBuf>,

    // Policy
    pub strict_warnings: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // JSON array of license specifications
            spec_file: std::env::var("LICENSE_SPEC_FILE")
                .map(PathBuf::from)
                .context("LICENSE_SPEC_FILE not set")?,
            base_dir: std::env::var("LICENSE_BASE_DIR").ok().map(PathBuf::from),

            output_file: std::env::var("LICENSE_OUTPUT_FILE").ok().map(PathBuf::from),

            // Treat collisions and competing defaults as errors
            strict_warnings: std::env::var("LICENSE_STRICT")
                .ok()
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        })
    }

    /// Directory relative license and label paths are resolved against.
    ///
    /// Falls back to the directory holding `spec_file`.
    pub fn base_dir(&self) -> PathBuf {
        match &self.base_dir {
            Some(dir) => dir.clone(),
            None => self
                .spec_file
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
