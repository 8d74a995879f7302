// File: crates/conformance/src/lib.rs
//
// Conformance harness for cppman argument parsing.
//
// Purpose:
// - Build a registry and token list from a JSON fixture
// - Parse deterministically and capture a trace (mapping + diagnostic lines)
// - Compare the trace against a golden expectation

use cppman_args::{Definition, ParseTrace, Parser, ParserConfig, Registry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConformanceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("golden mismatch: {0}")]
    GoldenMismatch(String),

    #[error("fixture invalid: {0}")]
    FixtureInvalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub name: String,

    /// Definitions registered in order; duplicates are kept.
    pub registry: Vec<Definition>,

    /// Raw process arguments without the program name.
    #[serde(default)]
    pub tokens: Vec<String>,

    /// Golden trace path, relative to the fixture file.
    pub expect_trace: String,
}

impl Fixture {
    pub fn base_dir(&self, fixture_file: &Path) -> PathBuf {
        fixture_file
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn expect_trace_path(&self, fixture_file: &Path) -> PathBuf {
        self.base_dir(fixture_file).join(&self.expect_trace)
    }

    pub fn build_registry(&self) -> Registry {
        self.registry.iter().cloned().collect()
    }

    pub fn validate(&self) -> Result<(), ConformanceError> {
        if self.expect_trace.trim().is_empty() {
            return Err(ConformanceError::FixtureInvalid(format!(
                "fixture '{}' must specify expect_trace",
                self.name
            )));
        }
        if let Some(def) = self
            .registry
            .iter()
            .find(|d| d.name().is_empty() && d.alias().is_empty())
        {
            return Err(ConformanceError::FixtureInvalid(format!(
                "fixture '{}' registers a definition with neither name nor alias: {def:?}",
                self.name
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    pub bless: bool,
}

pub struct Runner {
    cfg: RunnerConfig,
}

impl Runner {
    pub fn new(cfg: RunnerConfig) -> Self {
        Self { cfg }
    }

    pub fn load_fixture(path: impl AsRef<Path>) -> Result<Fixture, ConformanceError> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn run_fixture(&self, fixture: &Fixture) -> ParseTrace {
        let registry = fixture.build_registry();
        let mut parser = Parser::with_config(&registry, ParserConfig::quiet());
        parser.parse(&fixture.tokens);
        parser.trace()
    }

    pub fn assert_matches(
        &self,
        fixture_file: impl AsRef<Path>,
        fixture: &Fixture,
        produced: &ParseTrace,
    ) -> Result<(), ConformanceError> {
        let fixture_file = fixture_file.as_ref();
        let golden_path = fixture.expect_trace_path(fixture_file);

        if self.cfg.bless {
            fs::create_dir_all(golden_path.parent().unwrap_or_else(|| Path::new(".")))?;
            let s = produced.to_json_pretty()?;
            fs::write(&golden_path, s.as_bytes())?;
            return Ok(());
        }

        let golden_bytes = fs::read(&golden_path)?;
        let golden: ParseTrace = serde_json::from_slice(&golden_bytes)?;

        if &golden != produced {
            let golden_s = golden.to_json_pretty()?;
            let produced_s = produced.to_json_pretty()?;
            return Err(ConformanceError::GoldenMismatch(format!(
                "fixture '{}' produced trace does not match golden.\nfixture_file: {}\ntokens: {:?}\nexpected: {}\n\n--- golden ---\n{}\n\n--- produced ---\n{}\n",
                fixture.name,
                fixture_file.display(),
                fixture.tokens,
                golden_path.display(),
                golden_s,
                produced_s,
            )));
        }

        Ok(())
    }

    pub fn run_and_check(&self, fixture_file: impl AsRef<Path>) -> Result<(), ConformanceError> {
        let fixture_file = fixture_file.as_ref();
        let fixture = Self::load_fixture(fixture_file)?;
        fixture.validate()?;
        let produced = self.run_fixture(&fixture);
        self.assert_matches(fixture_file, &fixture, &produced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fixture_defaults_apply() {
        let fixture: Fixture = serde_json::from_str(
            r#"{
                "name": "defaults",
                "registry": [{ "name": "--help" }],
                "expect_trace": "golden/defaults.json"
            }"#,
        )
        .unwrap();

        assert!(fixture.tokens.is_empty());
        let registry = fixture.build_registry();
        let help = registry.find_registered_argument("--help").unwrap();
        assert_eq!(help.alias(), "");
        assert!(help.kind().is_flag());
        assert!(help.is_optional());
    }

    #[test]
    fn anonymous_definition_is_rejected() {
        let fixture: Fixture = serde_json::from_str(
            r#"{
                "name": "anonymous",
                "registry": [{ "kind": "integer" }],
                "expect_trace": "golden/anonymous.json"
            }"#,
        )
        .unwrap();

        assert!(matches!(
            fixture.validate(),
            Err(ConformanceError::FixtureInvalid(_))
        ));
    }

    #[test]
    fn run_fixture_is_repeatable() {
        let fixture: Fixture = serde_json::from_str(
            r#"{
                "name": "repeat",
                "registry": [
                    { "name": "--name", "alias": "-N", "kind": "string", "level": "required" }
                ],
                "tokens": ["-N", "demo", "--other"],
                "expect_trace": "golden/repeat.json"
            }"#,
        )
        .unwrap();

        let runner = Runner::new(RunnerConfig::default());
        let first = runner.run_fixture(&fixture);
        assert_eq!(runner.run_fixture(&fixture), first);
        assert_eq!(
            first.diagnostics,
            vec![r#"IGNORING UNRECOGNIZED ARGUMENT: "--other""#.to_string()]
        );
    }
}
