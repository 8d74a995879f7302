// File: crates/cppman/src/project.rs
//
// Resolves a parsed request into a concrete project plan:
// language code, language standard and template directory.

use crate::args::Args;
use crate::error::ScaffoldError;
use crate::scaffold::ScaffoldConfig;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_TEMPLATE: &str = "console";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Cxx,
    C,
}

impl Language {
    /// Accepted spellings on the command line, matched case-insensitively.
    pub fn from_input(input: &str) -> Option<Self> {
        match input.to_ascii_lowercase().as_str() {
            "c++" => Some(Language::Cxx),
            "c" => Some(Language::C),
            _ => None,
        }
    }

    /// Directory name under the templates root and value of `!LANGUAGE!`.
    pub fn code(self) -> &'static str {
        match self {
            Language::Cxx => "CXX",
            Language::C => "C",
        }
    }

    /// Supported standards, newest first.
    pub fn standards(self) -> &'static [&'static str] {
        match self {
            Language::Cxx => &["23", "20", "17", "14", "11"],
            Language::C => &["23", "17", "11", "99"],
        }
    }

    pub fn latest_standard(self) -> &'static str {
        self.standards()[0]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPlan {
    pub name: String,
    pub language: Language,
    pub standard: &'static str,
    pub template: PathBuf,
}

impl ProjectPlan {
    pub fn resolve(args: &Args, cfg: &ScaffoldConfig) -> Result<Self, ScaffoldError> {
        let name = resolve_name(&args.name)?;
        let language = resolve_language(args.language.as_deref())?;
        let standard = resolve_standard(language, args.standard.as_deref())?;
        let template = resolve_template(cfg, language, args.template.as_deref())?;

        Ok(Self {
            name,
            language,
            standard,
            template,
        })
    }

    /// Placeholder tokens and their replacements, applied to every copied file.
    pub fn wildcards(&self) -> [(&'static str, &str); 3] {
        [
            ("!PROJECT!", self.name.as_str()),
            ("!LANGUAGE!", self.language.code()),
            ("!STANDARD!", self.standard),
        ]
    }
}

/// The project name becomes a directory under the output root, so it must be
/// exactly one plain path component.
pub fn resolve_name(name: &str) -> Result<String, ScaffoldError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == OsStr::new(name) => Ok(name.to_string()),
        _ => Err(ScaffoldError::InvalidName(name.to_string())),
    }
}

pub fn resolve_language(requested: Option<&str>) -> Result<Language, ScaffoldError> {
    match requested {
        None => Ok(Language::default()),
        Some(input) => Language::from_input(input)
            .ok_or_else(|| ScaffoldError::UnknownLanguage(input.to_string())),
    }
}

pub fn resolve_standard(
    language: Language,
    requested: Option<&str>,
) -> Result<&'static str, ScaffoldError> {
    match requested {
        None => Ok(language.latest_standard()),
        Some(input) => language
            .standards()
            .iter()
            .copied()
            .find(|s| *s == input)
            .ok_or_else(|| ScaffoldError::UnsupportedStandard {
                standard: input.to_string(),
                language: language.code().to_string(),
            }),
    }
}

pub fn resolve_template(
    cfg: &ScaffoldConfig,
    language: Language,
    requested: Option<&str>,
) -> Result<PathBuf, ScaffoldError> {
    let template = cfg
        .templates_root
        .join(language.code())
        .join(requested.unwrap_or(DEFAULT_TEMPLATE));

    if !template.is_dir() {
        return Err(ScaffoldError::MissingTemplate(template));
    }
    Ok(template)
}
