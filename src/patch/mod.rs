//! Surgical text patching of aggregator files.
//!
//! Every operation here is a pure function from file contents to file
//! contents. Matched statements are wrapped in block comments instead of
//! being deleted, so downstream tooling keyed on original positions keeps
//! working. A match that is already sitting behind a `/*` opener is treated
//! as dead and skipped, which makes every operation idempotent.

use regex::{Captures, Regex};
use std::path::Path;
use tracing::debug;

use crate::paths::{change_extension, relative_from, to_unix_path};

/// Comment out every named import and re-export of the given target modules
/// from an index/aggregator file. A file may defensively reference the same
/// path more than once; matching repeats until no live occurrence remains.
pub fn purge_imports_exports(index_path: &str, content: &str, targets: &[String]) -> String {
    let mut content = content.to_string();
    for target in targets {
        let Some(import_path) = dot_relative_import_path(index_path, target) else {
            continue;
        };
        debug!("purge_imports_exports: redacting references to {import_path}");
        content = redact_all(&import_pattern(&import_path), content);
        content = redact_all(&export_pattern(&import_path), content);
    }
    content
}

/// Comment out a wildcard import of a component factory from the generated
/// root factory file, along with the one constructor-argument usage of its
/// bound alias. Absence of the import is a valid outcome and leaves the
/// content unmodified.
pub fn purge_factory_usage(
    factory_path: &str,
    content: &str,
    component_factory_target: &str,
) -> String {
    let Some(import_path) = bare_relative_path(parent_dir(factory_path), component_factory_target)
    else {
        return content.to_string();
    };
    let import_re = wildcard_import_pattern(&import_path);

    let Some(caps) = find_live(&import_re, content) else {
        return content.to_string();
    };
    let alias = caps[1].trim().to_string();
    debug!("purge_factory_usage: redacting {import_path} (alias {alias})");

    let whole = caps.get(0).expect("match group 0 always present");
    let mut out = redact_span(content, whole.start(), whole.end());

    if let Some(updated) = redact_first(&constructor_usage_pattern(&alias), &out) {
        out = updated;
    }
    out
}

/// Comment out a provider's wildcard import, its lazily-evaluated getter
/// block and its token-dispatch conditional in the generated root factory
/// file.
///
/// All three pieces stand or fall together: if either the getter or the
/// conditional cannot be found, nothing is modified, because a half-applied
/// redaction would desynchronize later cascade decisions keyed off whether
/// the usage still looks intact.
pub fn purge_provider_usage(
    factory_path: &str,
    content: &str,
    provider_target: &str,
    framework_dir: &str,
) -> String {
    // Generated factories import providers relative to the directory that
    // contains the framework package ('ionic-angular/components/...'), not
    // relative to the package itself.
    let Some(import_path) = bare_relative_path(parent_dir(framework_dir), provider_target) else {
        return content.to_string();
    };
    let import_re = wildcard_import_pattern(&import_path);

    let Some(caps) = find_live(&import_re, content) else {
        return content.to_string();
    };
    let alias = caps[1].trim().to_string();

    let getter_re = getter_pattern(&alias);
    let conditional_re = conditional_dispatch_pattern(&alias);
    if find_live(&getter_re, content).is_none() || find_live(&conditional_re, content).is_none() {
        debug!(
            "purge_provider_usage: incomplete usage of {alias} in {factory_path}, leaving intact"
        );
        return content.to_string();
    }

    debug!("purge_provider_usage: redacting {alias} from {factory_path}");
    let whole = caps.get(0).expect("match group 0 always present");
    let mut out = redact_span(content, whole.start(), whole.end());
    if let Some(updated) = redact_first(&getter_re, &out) {
        out = updated;
    }
    if let Some(updated) = redact_first(&conditional_re, &out) {
        out = updated;
    }
    out
}

/// Comment out a bare `ClassName,` token in an aggregator declaration or
/// provider list.
pub fn purge_from_aggregator_list(content: &str, class_name: &str) -> String {
    redact_all(&aggregator_list_pattern(class_name), content.to_string())
}

// --- pattern builders -----------------------------------------------------

/// Named import statement whose source path equals the given relative path.
pub fn import_pattern(relative_import_path: &str) -> Regex {
    let cleansed = regex::escape(relative_import_path);
    Regex::new(&format!(
        r#"(?m)^import.*?\{{(.+)\}}.*?from.*?['"`]{cleansed}['"`];"#
    ))
    .expect("pattern is built from escaped input")
}

/// Named re-export statement with the same source path.
pub fn export_pattern(relative_export_path: &str) -> Regex {
    let cleansed = regex::escape(relative_export_path);
    Regex::new(&format!(
        r#"(?m)^export.*?\{{(.+)\}}.*?from.*?'{cleansed}';"#
    ))
    .expect("pattern is built from escaped input")
}

/// Wildcard-style import binding a local alias; group 1 captures the alias.
pub fn wildcard_import_pattern(relative_import_path: &str) -> Regex {
    let cleansed = regex::escape(relative_import_path);
    Regex::new(&format!(r#"import.*?as(.*?)from '{cleansed}';"#))
        .expect("pattern is built from escaped input")
}

/// One constructor-argument usage of the alias bound by a wildcard import.
pub fn constructor_usage_pattern(alias: &str) -> Regex {
    let cleansed = regex::escape(alias);
    Regex::new(&format!(r#"{cleansed}\..*?,"#)).expect("pattern is built from escaped input")
}

/// Lazily-evaluated getter-accessor block referencing the alias.
pub fn getter_pattern(alias: &str) -> Regex {
    let cleansed = regex::escape(alias);
    Regex::new(&format!(
        r#"get _.*?_\d*\(\) \{{[\s\S][^}}]*?{cleansed}[\s\S]*?\}}[\s\S]*?\}}"#
    ))
    .expect("pattern is built from escaped input")
}

/// Token-dispatch conditional (`if ((token === Alias.X)) {{ ... }}`).
pub fn conditional_dispatch_pattern(alias: &str) -> Regex {
    let cleansed = regex::escape(alias);
    Regex::new(&format!(
        r#"if \(\(token === {cleansed}\.([\S]*?)\)\) \{{([\S\s]*?)\}}"#
    ))
    .expect("pattern is built from escaped input")
}

/// Bare `ClassName,` token in a declarations/providers list.
pub fn aggregator_list_pattern(class_name: &str) -> Regex {
    let cleansed = regex::escape(class_name);
    Regex::new(&format!("{cleansed},")).expect("pattern is built from escaped input")
}

// --- redaction core -------------------------------------------------------

/// A match already wrapped by a previous run sits directly behind a block
/// comment opener; such matches are dead text, not candidates.
fn is_live(content: &str, start: usize) -> bool {
    !content[..start].ends_with("/*")
}

fn find_live<'t>(re: &Regex, content: &'t str) -> Option<Captures<'t>> {
    let mut at = 0;
    while let Some(caps) = re.captures_at(content, at) {
        let whole = caps.get(0).expect("match group 0 always present");
        if is_live(content, whole.start()) {
            return Some(caps);
        }
        at = whole.end();
    }
    None
}

/// Wrap `content[start..end]` in block-comment delimiters.
fn redact_span(content: &str, start: usize, end: usize) -> String {
    let mut out = String::with_capacity(content.len() + 4);
    out.push_str(&content[..start]);
    out.push_str("/*");
    out.push_str(&content[start..end]);
    out.push_str("*/");
    out.push_str(&content[end..]);
    out
}

fn redact_first(re: &Regex, content: &str) -> Option<String> {
    find_live(re, content).map(|caps| {
        let whole = caps.get(0).expect("match group 0 always present");
        redact_span(content, whole.start(), whole.end())
    })
}

fn redact_all(re: &Regex, mut content: String) -> String {
    while let Some(updated) = redact_first(re, &content) {
        content = updated;
    }
    content
}

// --- path plumbing --------------------------------------------------------

fn parent_dir(path: &str) -> &str {
    Path::new(path)
        .parent()
        .and_then(|p| p.to_str())
        .unwrap_or("")
}

/// `./`-prefixed relative path from the editing file to the target, the way
/// index files write their imports.
fn dot_relative_import_path(editing_file: &str, target: &str) -> Option<String> {
    let rel = bare_relative_path(parent_dir(editing_file), target)?;
    Some(format!("./{rel}"))
}

/// Relative path from a directory to the extension-stripped target,
/// forward-slash normalized, no `./` prefix.
fn bare_relative_path(from_dir: &str, target: &str) -> Option<String> {
    let extensionless = change_extension(target, "");
    relative_from(&to_unix_path(from_dir), &extensionless)
}
