use miette::{IntoDiagnostic, Result, WrapErr};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::paths::to_unix_path;

/// Contract breaches in the dependency map handed to us by the build.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A module the upstream import-analysis pass is required to register
    /// (e.g. a recognized provider path) is not a key in the map.
    #[error("module not present in dependency map: {0}")]
    MissingModule(String),
}

/// Reversed-adjacency dependency map: module path -> set of modules that
/// import it.
///
/// Keys and importers are normalized path strings. The map is pruned
/// destructively: importer entries are only ever removed, never re-added,
/// so every cascade reaches a fixed point.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    modules: HashMap<String, HashSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from an already-collected map.
    pub fn from_map(map: HashMap<String, HashSet<String>>) -> Self {
        let modules = map
            .into_iter()
            .map(|(module, importers)| {
                (
                    to_unix_path(&module),
                    importers.iter().map(|i| to_unix_path(i)).collect(),
                )
            })
            .collect();
        Self { modules }
    }

    /// Load the dependency map emitted by the build's import-analysis pass.
    ///
    /// Format: a JSON object mapping each module path to the array of module
    /// paths that import it.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read dependency map: {}", path.display()))?;
        Self::from_json(&contents)
    }

    /// Parse a dependency map from its JSON text form.
    pub fn from_json(contents: &str) -> Result<Self> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(contents)
            .into_diagnostic()
            .wrap_err("Failed to parse dependency map JSON")?;

        let mut modules = HashMap::with_capacity(raw.len());
        for (module, importers) in raw {
            modules.insert(
                to_unix_path(&module),
                importers.iter().map(|i| to_unix_path(i)).collect(),
            );
        }
        Ok(Self { modules })
    }

    /// Register a module key with no known importers.
    pub fn insert_module(&mut self, module: &str) {
        self.modules.entry(to_unix_path(module)).or_default();
    }

    /// Record `importer` as an importer of `module`.
    ///
    /// The module must already be a key in the map; the import-analysis pass
    /// registers every recognized import target before augmentation runs, so
    /// a miss here is a collaborator contract breach.
    pub fn record_importer(&mut self, module: &str, importer: &str) -> Result<(), GraphError> {
        match self.modules.get_mut(module) {
            Some(importers) => {
                importers.insert(to_unix_path(importer));
                Ok(())
            }
            None => Err(GraphError::MissingModule(module.to_string())),
        }
    }

    /// Remove `importer` from `module`'s importer set. Returns whether the
    /// edge existed.
    pub fn remove_importer(&mut self, module: &str, importer: &str) -> bool {
        self.modules
            .get_mut(module)
            .map(|importers| importers.remove(importer))
            .unwrap_or(false)
    }

    /// The current importer set of a module, if it is a key.
    pub fn importers(&self, module: &str) -> Option<&HashSet<String>> {
        self.modules.get(module)
    }

    pub fn contains(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    /// Snapshot of all module keys. Used by the cascade passes, which mutate
    /// importer sets while iterating.
    pub fn module_paths(&self) -> Vec<String> {
        self.modules.keys().cloned().collect()
    }

    /// Iterate over (module, importer set) entries.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &HashSet<String>)> {
        self.modules.iter()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Restrict the graph to the application's own source tree and the
    /// framework components directory, and sever the framework public entry
    /// point from every surviving importer set.
    ///
    /// The entry point imports everything by construction, so keeping those
    /// edges would make every component look alive.
    pub fn retain_scope(&mut self, config: &Config) {
        let components_dir = config.components_dir();
        let src_dir = to_unix_path(&config.src_dir.to_string_lossy());
        let module_file = config.module_file_path();
        let entry_point = config.framework_entry_point_path();

        let before = self.modules.len();
        self.modules.retain(|module, _| {
            module.contains(&components_dir) || module.contains(&src_dir) || *module == module_file
        });
        for importers in self.modules.values_mut() {
            importers.remove(&entry_point);
        }
        debug!(
            "retain_scope: {} of {} modules in scope",
            self.modules.len(),
            before
        );
    }
}
