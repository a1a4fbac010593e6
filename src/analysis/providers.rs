use tracing::debug;

use crate::config::Config;
use crate::graph::DependencyGraph;
use super::pruner::ImportTreePruner;

/// Second cascade pass over the fixed table of lazily-resolved providers.
///
/// A provider only ever appears used in compiled output because the generated
/// aggregator factory references every provider unconditionally. Real usage
/// is visible here as a surviving source-file importer edge injected by the
/// usage scanner, so a provider whose importer set still contains the
/// aggregator factory can be purged exactly when that factory edge is the
/// only thing keeping it alive.
pub struct ProviderCascade<'a> {
    config: &'a Config,
    pruner: ImportTreePruner,
}

impl<'a> ProviderCascade<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            pruner: ImportTreePruner::new(&config.factory_suffix),
        }
    }

    /// Run the provider pass after the initial single-root cascade.
    ///
    /// Providers are visited in table order, then each provider's companion
    /// component, then the companion-less entry components. Every decision is
    /// re-derived from current graph state at visit time.
    pub fn resolve(&self, graph: &mut DependencyGraph) {
        for provider in &self.config.providers {
            let provider_path = self.config.provider_module_path(provider);
            debug!("providers: attempting to purge {}", provider.class_name);
            self.process_provider(graph, &provider_path);
        }

        // A provider that went fully unreferenced licenses removal of its
        // paired overlay component as a unit, even though no direct edge to
        // the component was severed above.
        for provider in &self.config.providers {
            let Some(component_path) = self.config.provider_component_factory_path(provider)
            else {
                continue;
            };
            let provider_path = self.config.provider_module_path(provider);
            if graph
                .importers(&provider_path)
                .map(|importers| importers.is_empty())
                .unwrap_or(false)
            {
                debug!(
                    "providers: {} unreferenced, purging companion component",
                    provider.class_name
                );
                self.process_provider(graph, &component_path);
            }
        }

        // Entry components with no paired provider go through the same
        // factory-edge check.
        for component_path in self.config.entry_component_factory_paths() {
            debug!("providers: attempting to purge entry component {component_path}");
            self.process_provider(graph, &component_path);
        }
    }

    /// Presence-check, then removal, then cascade. The ordering is load
    /// bearing: the factory edge must be observed before it is severed, and
    /// the emptiness check used for companions happens on whatever state the
    /// cascade leaves behind.
    fn process_provider(&self, graph: &mut DependencyGraph, provider_path: &str) {
        let factory_path = self.config.app_module_factory_path();

        let held_by_factory = graph
            .importers(provider_path)
            .map(|importers| importers.contains(&factory_path))
            .unwrap_or(false);
        if !held_by_factory {
            return;
        }

        debug!("providers: purging {provider_path}");
        graph.remove_importer(provider_path, &factory_path);
        self.pruner.prune_unchecked(graph, provider_path);
    }
}
