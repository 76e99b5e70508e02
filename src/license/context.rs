use std::path::{Path, PathBuf};

/// Settings shared by every specification in one resolution.
#[derive(Debug, Clone, Default)]
pub struct Context {
    base_dir: Option<PathBuf>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative file references against `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}
