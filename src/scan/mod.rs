//! Source usage scanning.
//!
//! Ahead-of-time compilation references every recognized provider from the
//! generated aggregator factory whether the application uses it or not, so
//! compiled output cannot tell us about real provider usage. This pass scans
//! the application's original sources for named imports of the recognized
//! provider classes and injects those files into the dependency map as
//! importers, which is what later blocks the provider cascade from purging a
//! provider that is genuinely used.

use miette::{IntoDiagnostic, Result};
use rayon::prelude::*;
use regex::Regex;
use std::path::Path;
use tracing::debug;

use crate::config::Config;
use crate::discovery::{FileFinder, SourceFile};
use crate::graph::DependencyGraph;
use crate::paths::to_unix_path;

/// Scans original `.ts` sources for provider imports from the framework
/// package and records them in the dependency graph.
pub struct SourceUsageScanner<'a> {
    config: &'a Config,
    import_re: Regex,
}

impl<'a> SourceUsageScanner<'a> {
    pub fn new(config: &'a Config) -> Self {
        let package = regex::escape(&config.framework_package);
        let import_re = Regex::new(&format!(
            r#"import\s*\{{([^}}]*)\}}\s*from\s*['"]{package}['"]"#
        ))
        .expect("pattern is built from escaped input");
        Self { config, import_re }
    }

    /// Whether a file participates in the usage scan: an original `.ts`
    /// source under the source directory, excluding declaration files,
    /// generated factories and module-definition files.
    pub fn is_scannable(&self, path: &str) -> bool {
        let path = to_unix_path(path);
        let src_dir = to_unix_path(&self.config.src_dir.to_string_lossy());
        let factory_ts = format!("{}ts", self.config.factory_suffix);

        path.ends_with(".ts")
            && path.starts_with(&src_dir)
            && !path.ends_with(".d.ts")
            && !path.ends_with(&factory_ts)
            && !path.ends_with(&self.config.module_suffix)
    }

    /// Scan one file's contents and record importer edges for every
    /// recognized provider class it imports. Returns the number of edges
    /// recorded.
    ///
    /// A recognized provider missing from the graph means the upstream
    /// import-analysis pass did not honor its contract; that propagates as
    /// an error rather than being papered over.
    pub fn scan_file(
        &self,
        path: &str,
        contents: &str,
        graph: &mut DependencyGraph,
    ) -> Result<usize> {
        if !self.is_scannable(path) {
            return Ok(0);
        }

        let mut recorded = 0;
        for caps in self.import_re.captures_iter(contents) {
            for name in imported_names(&caps[1]) {
                let Some(provider) = self
                    .config
                    .providers
                    .iter()
                    .find(|p| p.class_name == name)
                else {
                    continue;
                };
                let module_path = self.config.provider_module_path(provider);
                debug!("scan: {path} imports {name}, marking {module_path} used");
                graph
                    .record_importer(&module_path, &to_unix_path(path))
                    .into_diagnostic()?;
                recorded += 1;
            }
        }
        Ok(recorded)
    }

    /// Discover and scan every source file under the configured source
    /// directory. File reads happen in parallel; graph mutation is
    /// sequential.
    pub fn scan_sources(&self, graph: &mut DependencyGraph) -> Result<usize> {
        let finder = FileFinder::new();
        let files = finder.find_source_files(Path::new(&self.config.src_dir))?;
        self.scan_files(&files, graph)
    }

    /// Scan an already-discovered file list.
    pub fn scan_files(&self, files: &[SourceFile], graph: &mut DependencyGraph) -> Result<usize> {
        let contents: Vec<(String, Result<String>)> = files
            .par_iter()
            .filter(|file| self.is_scannable(&file.path.to_string_lossy()))
            .map(|file| {
                (
                    to_unix_path(&file.path.to_string_lossy()),
                    file.read_contents(),
                )
            })
            .collect();

        let mut recorded = 0;
        for (path, result) in contents {
            let text = result?;
            recorded += self.scan_file(&path, &text, graph)?;
        }
        Ok(recorded)
    }
}

/// Split the named-import list of an import statement into the exported
/// names, dropping local aliases (`X as Y` counts as `X`).
fn imported_names(import_list: &str) -> Vec<String> {
    import_list
        .split(',')
        .map(|part| {
            part.split_whitespace()
                .next()
                .unwrap_or("")
                .trim()
                .to_string()
        })
        .filter(|name| !name.is_empty())
        .collect()
}
