//! treeshaker - dead module elimination for AOT-compiled component framework builds
//!
//! Ahead-of-time compilation generates aggregator modules that statically
//! reference every optional component and service, so the compiled output
//! alone cannot tell which of them an application really uses. This library
//! reconstructs true reachability from the original import graph and then
//! surgically redacts the provably-unused references from the generated
//! aggregator files.
//!
//! # Pipeline
//!
//! 1. **Graph loading** - consume the reversed dependency map produced by
//!    the build's import-analysis pass
//! 2. **Usage scanning** - inject real provider usage found in original
//!    sources into the map
//! 3. **Pruning** - cascade the aggregator entry module's removal through
//!    the graph
//! 4. **Provider cascade** - fold lazily-resolved providers and their
//!    companion components into the same cascade
//! 5. **Partitioning** - split the final state into kept and purged modules
//! 6. **Patching** - comment out the dead references in the aggregator files

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod graph;
pub mod patch;
pub mod paths;
pub mod report;
pub mod scan;

pub use analysis::{compute_unused_modules, ImportTreePruner, ProviderCascade, TreeShakeResults};
pub use config::{Config, ProviderEntry};
pub use discovery::FileFinder;
pub use graph::{DependencyGraph, GraphError};
pub use report::{ReportFormat, Reporter};
pub use scan::SourceUsageScanner;
