//! Path derivation helpers for module identifiers.
//!
//! Module identifiers are filesystem paths treated as opaque strings, but the
//! patcher has to reconstruct the exact relative import path a source file
//! would have written, so everything here normalizes to forward slashes.

use std::path::{Component, Path, PathBuf};

/// Replace the extension of a path. An empty `ext` strips the extension.
///
/// Only the final extension is touched: inner dotted segments of names like
/// `app.module.ts` stay intact.
pub fn change_extension(path: &str, ext: &str) -> String {
    let stem = to_unix_path(&Path::new(path).with_extension("").to_string_lossy());
    let ext = ext.trim_start_matches('.');
    if ext.is_empty() {
        stem
    } else {
        format!("{stem}.{ext}")
    }
}

/// Normalize a path string to forward slashes regardless of host convention.
pub fn to_unix_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Derive the generated-factory sibling of a module path.
///
/// `/app/app.module.js` with suffix `.ngfactory.` becomes
/// `/app/app.module.ngfactory.js`. Only a script extension counts as an
/// extension here; anything else (like the `.module` in `app.module`) is
/// part of the name, and the suffix is appended.
pub fn to_factory_path(module_path: &str, factory_suffix: &str) -> String {
    let infix = factory_suffix.trim_end_matches('.');
    match module_path.rsplit_once('.') {
        Some((stem, ext)) if matches!(ext, "js" | "ts") => format!("{stem}{infix}.{ext}"),
        _ => format!("{module_path}{infix}"),
    }
}

/// Check whether a module path is a generated-factory module.
pub fn is_factory_path(module_path: &str, factory_suffix: &str) -> bool {
    module_path.contains(factory_suffix)
}

/// Compute a lexical relative path from `from_dir` to `to`.
///
/// Both inputs must be absolute or both relative; no filesystem access is
/// performed. Returns `None` when the paths have no common prefix form
/// (e.g. differing roots).
pub fn relative_from(from_dir: &str, to: &str) -> Option<String> {
    let from = PathBuf::from(to_unix_path(from_dir));
    let to = PathBuf::from(to_unix_path(to));

    let from_parts: Vec<Component> = from.components().collect();
    let to_parts: Vec<Component> = to.components().collect();

    if from.is_absolute() != to.is_absolute() {
        return None;
    }

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from_parts.len() {
        parts.push("..".to_string());
    }
    for comp in &to_parts[common..] {
        parts.push(comp.as_os_str().to_string_lossy().into_owned());
    }

    if parts.is_empty() {
        parts.push(".".to_string());
    }

    Some(parts.join("/"))
}
