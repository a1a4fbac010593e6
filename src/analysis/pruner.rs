use std::collections::HashSet;
use tracing::debug;

use crate::graph::DependencyGraph;
use crate::paths::is_factory_path;

/// Cascades a root module's removal through the dependency graph.
///
/// Each round severs the current root from every importer set it appears in.
/// A module that loses an edge becomes a root for the next round unless one
/// of its remaining importers is a generated-factory module: factories are
/// emitted regardless of real usage, so their presence means we cannot prove
/// the module safe to drop and the branch stops there.
pub struct ImportTreePruner {
    factory_suffix: String,
}

impl ImportTreePruner {
    pub fn new(factory_suffix: &str) -> Self {
        Self {
            factory_suffix: factory_suffix.to_string(),
        }
    }

    /// Sever `root` everywhere and cascade, honoring the generated-factory
    /// protection rule. Terminates because edges are only ever removed.
    pub fn prune(&self, graph: &mut DependencyGraph, root: &str) {
        self.cascade(graph, root, true);
    }

    /// Same cascade without the factory protection. Used by the provider
    /// pass, where edges represent factory indirection rather than direct
    /// imports, so a surviving factory importer carries no signal.
    pub fn prune_unchecked(&self, graph: &mut DependencyGraph, root: &str) {
        self.cascade(graph, root, false);
    }

    fn cascade(&self, graph: &mut DependencyGraph, root: &str, protect_factories: bool) {
        let mut queue = vec![root.to_string()];
        // Visited guard against pathological cycles; acyclic inputs behave
        // identically without it since removed edges never come back.
        let mut visited: HashSet<String> = HashSet::new();

        while let Some(current) = queue.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }

            for module in graph.module_paths() {
                if !graph.remove_importer(&module, &current) {
                    continue;
                }

                if protect_factories {
                    let factory_importee = graph
                        .importers(&module)
                        .map(|importers| {
                            importers
                                .iter()
                                .any(|i| is_factory_path(i, &self.factory_suffix))
                        })
                        .unwrap_or(false);
                    if factory_importee {
                        debug!("prune: {module} still held by a generated factory, not cascading");
                        continue;
                    }
                }

                debug!("prune: {module} lost importer {current}, queuing");
                queue.push(module);
            }
        }
    }
}
