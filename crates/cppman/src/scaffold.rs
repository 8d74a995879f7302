// File: crates/cppman/src/scaffold.rs
//
// Copies a template tree into a new project directory and substitutes
// placeholder tokens inside the copied files.

use crate::error::ScaffoldError;
use crate::project::ProjectPlan;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name replaced by the project name while copying.
pub const PROJECT_DIRECTORY_PLACEHOLDER: &str = "!PROJECT!";

/// Environment variable overriding the templates root.
pub const TEMPLATES_ENV: &str = "CPPMAN_TEMPLATES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldConfig {
    /// Contains one directory per language code, each holding templates.
    pub templates_root: PathBuf,
    /// Parent directory of newly created projects.
    pub output_root: PathBuf,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self::new("templates", ".")
    }
}

impl ScaffoldConfig {
    pub fn new(templates_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            templates_root: templates_root.into(),
            output_root: output_root.into(),
        }
    }

    /// Defaults, with `CPPMAN_TEMPLATES` taking precedence for the templates root.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(root) = std::env::var_os(TEMPLATES_ENV).filter(|v| !v.is_empty()) {
            cfg.templates_root = PathBuf::from(root);
        }
        cfg
    }
}

/// Create `<output_root>/<name>` from the plan's template and fill in wildcards.
pub fn create_project(plan: &ProjectPlan, cfg: &ScaffoldConfig) -> Result<PathBuf, ScaffoldError> {
    let project_dir = cfg.output_root.join(&plan.name);

    copy_template(&plan.template, &project_dir, &plan.name)?;
    replace_wildcards(&project_dir, &plan.wildcards())?;

    Ok(project_dir)
}

#[derive(Debug)]
enum CopyStep {
    Directory(PathBuf),
    File { from: PathBuf, to: PathBuf },
}

/// Recursively copy `from` into `to`, creating `to` if needed.
///
/// Directories named `!PROJECT!` are renamed to `project_name`. Existing
/// files are never overwritten: every target is checked before anything is
/// written, so a conflict leaves the destination untouched.
pub fn copy_template(from: &Path, to: &Path, project_name: &str) -> Result<(), ScaffoldError> {
    let mut steps = vec![CopyStep::Directory(to.to_path_buf())];
    plan_copy(from, to, project_name, &mut steps)?;

    let mut targets = HashSet::new();
    for step in &steps {
        if let CopyStep::File { to: target, .. } = step {
            if target.exists() || !targets.insert(target.as_path()) {
                return Err(ScaffoldError::DestinationExists(target.clone()));
            }
        }
    }

    for step in &steps {
        match step {
            CopyStep::Directory(dir) => {
                if !dir.is_dir() {
                    fs::create_dir_all(dir).map_err(|e| ScaffoldError::io(dir, e))?;
                }
            }
            CopyStep::File { from, to } => {
                log::debug!("copy {} -> {}", from.display(), to.display());
                fs::copy(from, to).map_err(|e| ScaffoldError::io(from, e))?;
            }
        }
    }
    Ok(())
}

// Steps come out parent-first, so every directory precedes its contents.
fn plan_copy(
    from: &Path,
    to: &Path,
    project_name: &str,
    steps: &mut Vec<CopyStep>,
) -> Result<(), ScaffoldError> {
    for entry in sorted_entries(from)? {
        let Some(file_name) = entry.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };

        if !entry.is_dir() {
            let target = to.join(&file_name);
            steps.push(CopyStep::File {
                from: entry,
                to: target,
            });
            continue;
        }

        let directory_name = if file_name == PROJECT_DIRECTORY_PLACEHOLDER {
            project_name
        } else {
            file_name.as_str()
        };

        let target = to.join(directory_name);
        steps.push(CopyStep::Directory(target.clone()));
        plan_copy(&entry, &target, project_name, steps)?;
    }
    Ok(())
}

/// Replace every occurrence of each wildcard in every file under `root`.
///
/// Files that are not valid UTF-8 are left untouched.
pub fn replace_wildcards(root: &Path, wildcards: &[(&str, &str)]) -> Result<(), ScaffoldError> {
    for entry in sorted_entries(root)? {
        if entry.is_dir() {
            replace_wildcards(&entry, wildcards)?;
            continue;
        }

        let bytes = fs::read(&entry).map_err(|e| ScaffoldError::io(&entry, e))?;
        let Ok(content) = String::from_utf8(bytes) else {
            log::debug!("skipping non-text file {}", entry.display());
            continue;
        };

        let replaced = substitute(&content, wildcards);
        if replaced != content {
            fs::write(&entry, replaced).map_err(|e| ScaffoldError::io(&entry, e))?;
        }
    }
    Ok(())
}

/// Apply each `(token, replacement)` pair in order.
pub fn substitute(content: &str, wildcards: &[(&str, &str)]) -> String {
    let mut out = content.to_string();
    for (token, replacement) in wildcards {
        if !token.is_empty() && out.contains(token) {
            out = out.replace(token, replacement);
        }
    }
    out
}

// Directory listing in a stable order so copies and logs are deterministic.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, ScaffoldError> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ScaffoldError::io(dir, e))? {
        let entry = entry.map_err(|e| ScaffoldError::io(dir, e))?;
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}
