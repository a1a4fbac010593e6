mod partition;
mod providers;
mod pruner;

pub use partition::{partition, TreeShakeResults};
pub use providers::ProviderCascade;
pub use pruner::ImportTreePruner;

use tracing::debug;

use crate::config::Config;
use crate::graph::DependencyGraph;

/// End-to-end unused-module computation.
///
/// Scopes the graph, severs the aggregator entry module and cascades, folds
/// in the provider pass, then partitions the final state. The graph is
/// consumed destructively and should be discarded afterwards.
pub fn compute_unused_modules(graph: &mut DependencyGraph, config: &Config) -> TreeShakeResults {
    graph.retain_scope(config);

    let root = config.module_file_path();
    debug!("compute_unused_modules: seeding cascade at {root}");
    let pruner = ImportTreePruner::new(&config.factory_suffix);
    pruner.prune(graph, &root);

    ProviderCascade::new(config).resolve(graph);

    partition(graph, &config.required_modules())
}
