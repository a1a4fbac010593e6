use ignore::WalkBuilder;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// A discovered application source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Absolute path to the file
    pub path: PathBuf,
}

impl SourceFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load and return owned contents
    pub fn read_contents(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).into_diagnostic()
    }
}

/// Finds the original `.ts` sources the usage scanner inspects.
pub struct FileFinder;

impl FileFinder {
    pub fn new() -> Self {
        Self
    }

    /// Find all TypeScript source files under the given directory.
    ///
    /// Declaration files and generated files are excluded later by the
    /// scanner's own suffix rules; this only filters by extension.
    pub fn find_source_files(&self, root: &Path) -> Result<Vec<SourceFile>> {
        debug!("Scanning for sources in: {}", root.display());

        if !root.exists() {
            trace!("Directory does not exist: {}", root.display());
            return Ok(Vec::new());
        }

        let walker = WalkBuilder::new(root)
            .hidden(true)           // Skip hidden files
            .git_ignore(true)       // Respect .gitignore
            .git_global(true)       // Respect global gitignore
            .git_exclude(true)      // Respect .git/info/exclude
            .ignore(true)           // Respect .ignore files
            .parents(true)          // Check parent directories for ignore files
            .follow_links(false)    // Don't follow symlinks
            .build();

        let files: Vec<SourceFile> = walker
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let path = entry.path();
                let is_ts = path.extension().and_then(|e| e.to_str()) == Some("ts");
                if !is_ts {
                    return None;
                }
                trace!("Found source: {}", path.display());
                Some(SourceFile::new(path.to_path_buf()))
            })
            .collect();

        debug!("Found {} source files", files.len());
        Ok(files)
    }
}

impl Default for FileFinder {
    fn default() -> Self {
        Self::new()
    }
}
