use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::graph::DependencyGraph;

/// Final kept/purged split of a pruned dependency graph.
#[derive(Debug, Clone, Default)]
pub struct TreeShakeResults {
    /// Modules that survived: non-empty importer set or required
    pub kept: HashMap<String, HashSet<String>>,

    /// Modules with no remaining importers, safe to redact
    pub purged: HashMap<String, HashSet<String>>,
}

impl TreeShakeResults {
    /// Purged module paths in deterministic order.
    pub fn purged_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.purged.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Kept module paths in deterministic order.
    pub fn kept_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.kept.keys().cloned().collect();
        paths.sort();
        paths
    }
}

/// Classify every module of the final graph state. Read-only: a module is
/// kept when any importer survives or it belongs to the required set,
/// purged otherwise. Every graph key lands in exactly one of the two maps.
pub fn partition(graph: &DependencyGraph, required: &HashSet<String>) -> TreeShakeResults {
    let mut results = TreeShakeResults::default();

    for (module, importers) in graph.entries() {
        if !importers.is_empty() || required.contains(module) {
            debug!("partition: {module} is kept");
            results.kept.insert(module.clone(), importers.clone());
        } else {
            debug!("partition: {module} is purged");
            results.purged.insert(module.clone(), importers.clone());
        }
    }

    results
}
