// Configuration loader - some accessors reserved for future use
#![allow(dead_code)]

use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::paths::{change_extension, to_factory_path, to_unix_path};

/// Configuration for a tree shake pass.
///
/// All the well-known paths and class names the cascade and the patcher key
/// off live here, so the engine itself stays free of framework vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application source directory (original `.ts` sources)
    pub src_dir: PathBuf,

    /// Installed framework directory (compiled library output)
    pub framework_dir: PathBuf,

    /// Package specifier the application uses in import statements
    pub framework_package: String,

    /// Framework public entry point, relative to `framework_dir`
    pub framework_index: String,

    /// Application entry point, relative to `src_dir`
    pub app_entry_point: String,

    /// Root application module, relative to `src_dir`
    pub app_module: String,

    /// Naming convention for generated-factory modules
    pub factory_suffix: String,

    /// Suffix of module-definition source files, excluded from usage scans
    pub module_suffix: String,

    /// Recognized lazily-resolved providers and their companion components
    pub providers: Vec<ProviderEntry>,

    /// Entry components processed through the provider cascade but with no
    /// companion (e.g. the select popover overlay)
    pub entry_component_factories: Vec<String>,
}

/// One framework indirection point: a provider class reachable through the
/// generated aggregator factory, paired with the component factory its
/// removal licenses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEntry {
    /// Class name as written in application import statements
    pub class_name: String,

    /// Provider module path, relative to `framework_dir`
    pub module: String,

    /// Companion component factory path, relative to `framework_dir`
    #[serde(default)]
    pub component_factory: Option<String>,
}

impl ProviderEntry {
    fn new(class_name: &str, module: &str, component_factory: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            module: module.to_string(),
            component_factory: Some(component_factory.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from("src"),
            framework_dir: PathBuf::from("node_modules/ionic-angular"),
            framework_package: "ionic-angular".to_string(),
            framework_index: "index.js".to_string(),
            app_entry_point: "app/main.ts".to_string(),
            app_module: "app/app.module.ts".to_string(),
            factory_suffix: ".ngfactory.".to_string(),
            module_suffix: ".module.ts".to_string(),
            providers: vec![
                ProviderEntry::new(
                    "ActionSheetController",
                    "components/action-sheet/action-sheet-controller.js",
                    "components/action-sheet/action-sheet-component.ngfactory.js",
                ),
                ProviderEntry::new(
                    "AlertController",
                    "components/alert/alert-controller.js",
                    "components/alert/alert-component.ngfactory.js",
                ),
                ProviderEntry::new(
                    "LoadingController",
                    "components/loading/loading-controller.js",
                    "components/loading/loading-component.ngfactory.js",
                ),
                ProviderEntry::new(
                    "ModalController",
                    "components/modal/modal-controller.js",
                    "components/modal/modal-component.ngfactory.js",
                ),
                ProviderEntry::new(
                    "PickerController",
                    "components/picker/picker-controller.js",
                    "components/picker/picker-component.ngfactory.js",
                ),
                ProviderEntry::new(
                    "PopoverController",
                    "components/popover/popover-controller.js",
                    "components/popover/popover-component.ngfactory.js",
                ),
                ProviderEntry::new(
                    "ToastController",
                    "components/toast/toast-controller.js",
                    "components/toast/toast-component.ngfactory.js",
                ),
            ],
            entry_component_factories: vec![
                "components/select/select-popover-component.ngfactory.js".to_string(),
            ],
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".treeshaker.yml",
            ".treeshaker.yaml",
            ".treeshaker.toml",
            "treeshaker.yml",
            "treeshaker.yaml",
            "treeshaker.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        // No config file found, use defaults
        Ok(Self::default())
    }

    /// Anchor relative `src_dir`/`framework_dir` at the project root.
    pub fn resolve_relative_to(&mut self, root: &Path) {
        if self.src_dir.is_relative() {
            self.src_dir = root.join(&self.src_dir);
        }
        if self.framework_dir.is_relative() {
            self.framework_dir = root.join(&self.framework_dir);
        }
    }

    fn join_framework(&self, rel: &str) -> String {
        to_unix_path(&self.framework_dir.join(rel).to_string_lossy())
    }

    fn join_src(&self, rel: &str) -> String {
        to_unix_path(&self.src_dir.join(rel).to_string_lossy())
    }

    /// Framework public entry point (the library aggregator/index file).
    pub fn framework_entry_point_path(&self) -> String {
        self.join_framework(&self.framework_index)
    }

    /// The aggregator entry module whose removal seeds the cascade: the
    /// `module.js` sibling of the framework entry point.
    pub fn module_file_path(&self) -> String {
        let entry = self.framework_entry_point_path();
        match Path::new(&entry).parent() {
            Some(dir) => to_unix_path(&dir.join("module.js").to_string_lossy()),
            None => "module.js".to_string(),
        }
    }

    /// Directory holding the framework's component modules.
    pub fn components_dir(&self) -> String {
        self.join_framework("components")
    }

    pub fn app_entry_point_ts(&self) -> String {
        change_extension(&self.join_src(&self.app_entry_point), ".ts")
    }

    pub fn app_entry_point_js(&self) -> String {
        change_extension(&self.join_src(&self.app_entry_point), ".js")
    }

    pub fn app_module_js(&self) -> String {
        change_extension(&self.join_src(&self.app_module), ".js")
    }

    /// Generated-factory counterpart of the root application module. Provider
    /// purgeability is keyed off this module being the sole importer.
    pub fn app_module_factory_path(&self) -> String {
        to_factory_path(&self.app_module_js(), &self.factory_suffix)
    }

    /// Absolute module path of a recognized provider.
    pub fn provider_module_path(&self, provider: &ProviderEntry) -> String {
        self.join_framework(&provider.module)
    }

    /// Absolute companion component factory path of a provider, if any.
    pub fn provider_component_factory_path(&self, provider: &ProviderEntry) -> Option<String> {
        provider
            .component_factory
            .as_deref()
            .map(|rel| self.join_framework(rel))
    }

    /// Absolute paths of companion-less entry component factories.
    pub fn entry_component_factory_paths(&self) -> Vec<String> {
        self.entry_component_factories
            .iter()
            .map(|rel| self.join_framework(rel))
            .collect()
    }

    /// Modules that are load-bearing regardless of in-graph reachability and
    /// must never be classified as purged.
    pub fn required_modules(&self) -> HashSet<String> {
        [
            self.app_entry_point_js(),
            self.app_entry_point_ts(),
            self.app_module_js(),
            self.app_module_factory_path(),
            self.module_file_path(),
        ]
        .into_iter()
        .collect()
    }
}
