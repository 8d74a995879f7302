// File: crates/cppman/src/args.rs
//
// Command-line argument definitions for the `cppman` executable.
//
// This file defines the public CLI contract only.
// It does NOT contain scaffolding logic.

use cppman_args::{Kind, Level, Parser, Registry};

pub const HELP: [&str; 2] = ["--help", "-H"];
pub const NAME: [&str; 2] = ["--name", "-N"];
pub const TEMPLATE: [&str; 2] = ["--template", "-T"];
pub const LANGUAGE: [&str; 2] = ["--language", "-L"];
pub const STANDARD: [&str; 2] = ["--standard", "-S"];

/// Every argument `cppman` recognizes.
pub fn registry() -> Registry {
    let mut registry = Registry::new();

    registry.register_flag(HELP[0], HELP[1]);
    registry.register_argument(NAME[0], NAME[1], Kind::String, Level::Required);
    registry.register_argument(TEMPLATE[0], TEMPLATE[1], Kind::String, Level::Optional);
    registry.register_argument(LANGUAGE[0], LANGUAGE[1], Kind::String, Level::Optional);
    registry.register_argument(STANDARD[0], STANDARD[1], Kind::String, Level::Optional);

    registry
}

/// Validated project request extracted from a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub name: String,
    pub template: Option<String>,
    pub language: Option<String>,
    pub standard: Option<String>,
}

impl Args {
    /// `None` when help was requested or the project name is missing;
    /// the caller prints usage in that case.
    pub fn from_parser(parser: &Parser<'_>) -> Option<Self> {
        if parser.contains(HELP) {
            return None;
        }

        let string_of = |keys: [&str; 2]| {
            parser
                .get_argument(keys)
                .and_then(|arg| arg.as_str())
                .map(str::to_string)
        };

        Some(Self {
            name: string_of(NAME)?,
            template: string_of(TEMPLATE),
            language: string_of(LANGUAGE),
            standard: string_of(STANDARD),
        })
    }
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage:\n\n  \
         {program} --name <name> --template <template> --language <language> --standard <standard>\n\n    \
         Parameters:\n\n      \
         --name[-N] required, the project's name\n      \
         --template[-T] optional, the template used for creating the project. defaults to console.\n      \
         --language[-L] optional, the language used in the project. defaults to c++.\n      \
         --standard[-S] optional, the standard used in the project. defaults to latest.\n"
    )
}
