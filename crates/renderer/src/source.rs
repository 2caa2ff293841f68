use std::fs;
use std::path::{Path, PathBuf};

/// Supplies shader text by logical name.
///
/// Providers never fail: an unreadable source comes back empty and the
/// compiler reports it as a failed stage.
pub trait ShaderSourceProvider {
    fn load(&self, name: &str) -> String;
}

/// Reads shader files relative to a root directory.
#[derive(Clone, Debug)]
pub struct FileShaderSource {
    root: PathBuf,
}

impl FileShaderSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ShaderSourceProvider for FileShaderSource {
    fn load(&self, name: &str) -> String {
        let path = self.root.join(name);
        match fs::read_to_string(&path) {
            Ok(text) => {
                tracing::debug!(path = %path.display(), bytes = text.len(), "loaded shader source");
                text
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "unable to read shader source; stage will be compiled empty"
                );
                String::new()
            }
        }
    }
}
