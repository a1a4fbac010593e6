//! Integration tests for the surgical text patcher against realistic
//! aggregator file contents.

use treeshaker::patch::{
    purge_factory_usage, purge_from_aggregator_list, purge_imports_exports, purge_provider_usage,
};

const INDEX_PATH: &str = "/fw/index.js";
const FACTORY_PATH: &str = "/app/src/app/app.module.ngfactory.js";
const FRAMEWORK_DIR: &str = "/node_modules/ionic-angular";
const TOAST_CONTROLLER: &str =
    "/node_modules/ionic-angular/components/toast/toast-controller.js";
const TOAST_COMPONENT: &str =
    "/node_modules/ionic-angular/components/toast/toast-component.ngfactory.js";

fn index_content() -> String {
    concat!(
        "export { App } from './components/app/app';\n",
        "import { ActionSheet } from './components/action-sheet/action-sheet';\n",
        "export { ActionSheet } from './components/action-sheet/action-sheet';\n",
        "import { Badge } from './components/badge/badge';\n",
        "export { Badge } from './components/badge/badge';\n",
        "import { Toast } from './components/toast/toast';\n",
        "export { Toast } from './components/toast/toast';\n",
    )
    .to_string()
}

fn factory_content() -> String {
    concat!(
        "import * as import30 from '../../../node_modules/ionic-angular/components/toast/toast-component.ngfactory';\n",
        "import * as import9 from 'ionic-angular/components/toast/toast-controller';\n",
        "class AppModuleInjector {\n",
        "  constructor() {\n",
        "    this.factories = new ComponentFactoryResolver([\n",
        "      import30.ToastCmpNgFactory,\n",
        "      import14.HomePageNgFactory,\n",
        "    ]);\n",
        "  }\n",
        "  get _ToastController_42() {\n",
        "    if ((this.__ToastController_42 == null)) {\n",
        "      (this.__ToastController_42 = new import9.ToastController(this._App_10, this._Config_4));\n",
        "    }\n",
        "    return this.__ToastController_42;\n",
        "  }\n",
        "  getInternal(token, notFoundResult) {\n",
        "    if ((token === import9.ToastController)) { return this._ToastController_42; }\n",
        "    return notFoundResult;\n",
        "  }\n",
        "}\n",
    )
    .to_string()
}

#[test]
fn test_index_redaction_targets_only_named_modules() {
    let content = index_content();
    let out = purge_imports_exports(
        INDEX_PATH,
        &content,
        &[
            "/fw/components/badge/badge.js".to_string(),
            "/fw/components/toast/toast.js".to_string(),
        ],
    );

    assert!(out.contains("/*import { Badge } from './components/badge/badge';*/"));
    assert!(out.contains("/*export { Badge } from './components/badge/badge';*/"));
    assert!(out.contains("/*import { Toast } from './components/toast/toast';*/"));
    assert!(out.contains("/*export { Toast } from './components/toast/toast';*/"));

    // Unrelated statements are untouched.
    assert!(out.contains("export { App } from './components/app/app';\n"));
    assert!(out.contains("import { ActionSheet } from './components/action-sheet/action-sheet';\n"));
    assert!(!out.contains("/*export { App }"));
}

#[test]
fn test_index_redaction_is_idempotent() {
    let content = index_content();
    let targets = vec!["/fw/components/badge/badge.js".to_string()];
    let once = purge_imports_exports(INDEX_PATH, &content, &targets);
    let twice = purge_imports_exports(INDEX_PATH, &once, &targets);
    assert_ne!(once, content);
    assert_eq!(once, twice);
}

#[test]
fn test_factory_usage_redaction_on_generated_content() {
    let content = factory_content();
    let out = purge_factory_usage(FACTORY_PATH, &content, TOAST_COMPONENT);

    assert!(out.contains(
        "/*import * as import30 from '../../../node_modules/ionic-angular/components/toast/toast-component.ngfactory';*/"
    ));
    assert!(out.contains("/*import30.ToastCmpNgFactory,*/"));
    // The other factory argument survives.
    assert!(out.contains("      import14.HomePageNgFactory,\n"));
}

#[test]
fn test_factory_usage_redaction_absent_import_returns_content_unchanged() {
    let content = factory_content();
    let out = purge_factory_usage(
        FACTORY_PATH,
        &content,
        "/node_modules/ionic-angular/components/modal/modal-component.ngfactory.js",
    );
    assert_eq!(out, content);
}

#[test]
fn test_provider_usage_redaction_on_generated_content() {
    let content = factory_content();
    let out = purge_provider_usage(FACTORY_PATH, &content, TOAST_CONTROLLER, FRAMEWORK_DIR);

    assert!(out
        .contains("/*import * as import9 from 'ionic-angular/components/toast/toast-controller';*/"));
    assert!(out.contains("/*get _ToastController_42()"));
    assert!(out.contains("/*if ((token === import9.ToastController))"));
    // The class frame around the redactions is intact.
    assert!(out.contains("class AppModuleInjector {"));
    assert!(out.contains("return notFoundResult;"));
}

#[test]
fn test_provider_usage_requires_both_getter_and_conditional() {
    // Strip the conditional dispatch block; the getter alone must not be
    // enough to commit any change.
    let content = factory_content().replace(
        "    if ((token === import9.ToastController)) { return this._ToastController_42; }\n",
        "",
    );
    let out = purge_provider_usage(FACTORY_PATH, &content, TOAST_CONTROLLER, FRAMEWORK_DIR);
    assert_eq!(out, content);
}

#[test]
fn test_provider_usage_redaction_is_idempotent() {
    let content = factory_content();
    let once = purge_provider_usage(FACTORY_PATH, &content, TOAST_CONTROLLER, FRAMEWORK_DIR);
    let twice = purge_provider_usage(FACTORY_PATH, &once, TOAST_CONTROLLER, FRAMEWORK_DIR);
    assert_ne!(once, content);
    assert_eq!(once, twice);
}

#[test]
fn test_aggregator_list_redaction_on_registration_block() {
    let content = concat!(
        "IonicModule.forRoot = function (appRoot, config) {\n",
        "  return {\n",
        "    providers: [\n",
        "      ActionSheetController,\n",
        "      AlertController,\n",
        "      ToastController,\n",
        "    ],\n",
        "  };\n",
        "};\n",
    );
    let out = purge_from_aggregator_list(content, "AlertController");
    assert!(out.contains("/*AlertController,*/"));
    assert!(out.contains("ActionSheetController,\n"));
    assert!(out.contains("ToastController,\n"));
}

#[test]
fn test_aggregator_list_redaction_is_idempotent() {
    let content = "providers: [AlertController, ToastController,]";
    let once = purge_from_aggregator_list(content, "ToastController");
    let twice = purge_from_aggregator_list(&once, "ToastController");
    assert_eq!(once, twice);
}

#[test]
fn test_all_redactions_preserve_original_bytes() {
    // Stripping the added comment delimiters must reproduce the input
    // exactly: the patcher redacts, it never removes.
    let content = factory_content();
    let out = purge_provider_usage(FACTORY_PATH, &content, TOAST_CONTROLLER, FRAMEWORK_DIR);
    let out = purge_factory_usage(FACTORY_PATH, &out, TOAST_COMPONENT);
    assert_eq!(out.replace("/*", "").replace("*/", ""), content);
}
