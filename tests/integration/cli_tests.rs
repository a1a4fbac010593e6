//! End-to-end tests for the treeshaker binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Lay out a minimal project: application sources, an installed framework
/// with one used and one unused component, and a dependency map.
fn setup_project() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_path_buf();

    fs::create_dir_all(root.join("src/app")).unwrap();
    fs::create_dir_all(root.join("src/pages")).unwrap();
    fs::create_dir_all(root.join("fw/components/badge")).unwrap();
    fs::create_dir_all(root.join("fw/components/icon")).unwrap();

    fs::write(root.join("src/app/main.ts"), "export function main() {}\n").unwrap();
    fs::write(
        root.join("src/pages/home.ts"),
        "import { Icon } from 'ionic-angular';\nexport class HomePage {}\n",
    )
    .unwrap();

    fs::write(
        root.join("fw/index.js"),
        concat!(
            "import { Badge } from './components/badge/badge';\n",
            "export { Badge } from './components/badge/badge';\n",
            "import { Icon } from './components/icon/icon';\n",
            "export { Icon } from './components/icon/icon';\n",
        ),
    )
    .unwrap();
    fs::write(root.join("fw/module.js"), "export var module = {};\n").unwrap();

    let config = concat!(
        "src_dir: src\n",
        "framework_dir: fw\n",
        "framework_package: ionic-angular\n",
    );
    fs::write(root.join(".treeshaker.yml"), config).unwrap();

    // Badge is referenced only by the aggregator module file; Icon has a
    // real importer in the application.
    let mut deps = std::collections::BTreeMap::new();
    deps.insert(
        unix(&root.join("fw/components/badge/badge.js")),
        vec![unix(&root.join("fw/module.js"))],
    );
    deps.insert(
        unix(&root.join("fw/components/icon/icon.js")),
        vec![unix(&root.join("src/pages/home.js"))],
    );
    deps.insert(
        unix(&root.join("src/pages/home.js")),
        vec![unix(&root.join("src/app/app.module.js"))],
    );
    fs::write(
        root.join("deps.json"),
        serde_json::to_string_pretty(&deps).unwrap(),
    )
    .unwrap();

    (dir, root)
}

fn unix(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn treeshaker() -> Command {
    Command::cargo_bin("treeshaker").unwrap()
}

#[test]
fn test_dry_run_reports_but_does_not_write() {
    let (_dir, root) = setup_project();
    let index_before = fs::read_to_string(root.join("fw/index.js")).unwrap();

    treeshaker()
        .arg(&root)
        .arg("--graph")
        .arg(root.join("deps.json"))
        .arg("--dry-run")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("badge"))
        .stdout(predicate::str::contains("Would patch"));

    let index_after = fs::read_to_string(root.join("fw/index.js")).unwrap();
    assert_eq!(index_before, index_after);
}

#[test]
fn test_run_patches_index_file() {
    let (_dir, root) = setup_project();

    treeshaker()
        .arg(&root)
        .arg("--graph")
        .arg(root.join("deps.json"))
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Patched"));

    let index = fs::read_to_string(root.join("fw/index.js")).unwrap();
    assert!(index.contains("/*import { Badge } from './components/badge/badge';*/"));
    assert!(index.contains("/*export { Badge } from './components/badge/badge';*/"));
    // Icon is genuinely used and stays live.
    assert!(index.contains("\nimport { Icon } from './components/icon/icon';"));
    assert!(!index.contains("/*import { Icon }"));
}

#[test]
fn test_rerun_is_a_no_op_on_already_patched_files() {
    let (_dir, root) = setup_project();

    treeshaker()
        .arg(&root)
        .arg("--graph")
        .arg(root.join("deps.json"))
        .arg("--quiet")
        .assert()
        .success();

    let patched = fs::read_to_string(root.join("fw/index.js")).unwrap();

    treeshaker()
        .arg(&root)
        .arg("--graph")
        .arg(root.join("deps.json"))
        .arg("--quiet")
        .assert()
        .success();

    let repatched = fs::read_to_string(root.join("fw/index.js")).unwrap();
    assert_eq!(patched, repatched);
}

#[test]
fn test_json_report_output() {
    let (_dir, root) = setup_project();
    let report_path = root.join("report.json");

    treeshaker()
        .arg(&root)
        .arg("--graph")
        .arg(root.join("deps.json"))
        .arg("--dry-run")
        .arg("--quiet")
        .arg("--format")
        .arg("json")
        .arg("--output")
        .arg(&report_path)
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    let purged: Vec<String> = report["purged"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert!(purged.iter().any(|p| p.ends_with("badge.js")));
    assert!(!purged.iter().any(|p| p.ends_with("icon.js")));
}

#[test]
fn test_missing_dependency_map_fails() {
    let (_dir, root) = setup_project();

    treeshaker()
        .arg(&root)
        .arg("--graph")
        .arg(root.join("nope.json"))
        .arg("--quiet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("dependency map"));
}
