// File: crates/args/src/parser.rs
//
// Single-pass, stack-based argument parser.
//
// Tokens are pushed onto a working stack as they are recognized and values
// attach to the most recently pushed instance. The stack is then drained
// last-to-first into the parsed mapping. Dependencies are checked against
// the instances still pending on the stack at the moment an instance is
// popped, so a dependency is only satisfied by an argument that appears
// earlier on the command line.
//
// Nothing here aborts: every problem becomes a `Diagnostic`.

use crate::{Argument, Diagnostic, ParseTrace, Registry, TraceArgument};
use indexmap::IndexMap;

/// Committed arguments keyed by name (or alias when the name is empty).
pub type ParsedArguments = IndexMap<String, Argument>;

/// Prefix that marks a token as an argument name or alias.
pub const MARKER: char = '-';

/// One or more lookup keys, tried in order.
///
/// Accepts `"--name"`, `["--name", "-N"]` or a `&[&str]`.
pub trait ArgumentKeys<'a> {
    type Iter: Iterator<Item = &'a str>;
    fn keys(self) -> Self::Iter;
}

impl<'a> ArgumentKeys<'a> for &'a str {
    type Iter = std::iter::Once<&'a str>;

    fn keys(self) -> Self::Iter {
        std::iter::once(self)
    }
}

impl<'a> ArgumentKeys<'a> for &'a [&'a str] {
    type Iter = std::iter::Copied<std::slice::Iter<'a, &'a str>>;

    fn keys(self) -> Self::Iter {
        self.iter().copied()
    }
}

impl<'a, const N: usize> ArgumentKeys<'a> for [&'a str; N] {
    type Iter = std::array::IntoIter<&'a str, N>;

    fn keys(self) -> Self::Iter {
        self.into_iter()
    }
}

#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Write each diagnostic line to stderr as it is produced.
    pub echo_diagnostics: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            echo_diagnostics: true,
        }
    }
}

impl ParserConfig {
    /// Collect diagnostics without writing them anywhere.
    pub fn quiet() -> Self {
        Self {
            echo_diagnostics: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Parser<'r> {
    registry: &'r Registry,
    cfg: ParserConfig,
    arguments: ParsedArguments,
    diagnostics: Vec<Diagnostic>,
}

impl<'r> Parser<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_config(registry, ParserConfig::default())
    }

    pub fn with_config(registry: &'r Registry, cfg: ParserConfig) -> Self {
        Self {
            registry,
            cfg,
            arguments: ParsedArguments::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn get_arguments(&self) -> &ParsedArguments {
        &self.arguments
    }

    /// Diagnostics produced by the most recent `parse`, in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// First committed argument matching any of `keys`.
    pub fn get_argument<'a, K: ArgumentKeys<'a>>(&self, keys: K) -> Option<&Argument> {
        keys.keys()
            .filter(|k| !k.is_empty())
            .find_map(|k| self.arguments.get(k))
    }

    pub fn contains<'a, K: ArgumentKeys<'a>>(&self, keys: K) -> bool {
        self.get_argument(keys).is_some()
    }

    /// Parse `tokens` (process arguments without the program name).
    ///
    /// Replaces the mapping and diagnostics of any previous call.
    pub fn parse<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.arguments.clear();
        self.diagnostics.clear();

        let mut stack = self.tokenize(tokens);

        while let Some(argument) = stack.pop() {
            if argument.definition().has_dependencies() {
                self.check_dependencies(&argument, &stack);
            }

            log::debug!("commit {} (value={:?})", argument.key(), argument.value());
            self.arguments.insert(argument.key().to_string(), argument);
        }

        self.check_required_arguments();
        self.check_missing_values();
    }

    /// Serializable snapshot of the current mapping and diagnostics.
    pub fn trace(&self) -> ParseTrace {
        ParseTrace {
            arguments: self
                .arguments
                .iter()
                .map(|(key, arg)| {
                    (
                        key.clone(),
                        TraceArgument {
                            kind: arg.kind(),
                            value: arg.value().cloned(),
                        },
                    )
                })
                .collect(),
            diagnostics: self.diagnostics.iter().map(|d| d.to_string()).collect(),
        }
    }

    fn tokenize<I, S>(&mut self, tokens: I) -> Vec<Argument>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let registry = self.registry;
        let mut stack: Vec<Argument> = Vec::new();

        for token in tokens {
            let token = token.as_ref();

            if token.starts_with(MARKER) {
                match registry.find_registered_argument(token) {
                    Some(def) => {
                        log::debug!("push {} ({})", def.key(), def.kind().as_str());
                        stack.push(Argument::from(def.clone()));
                    }
                    None => self.report(Diagnostic::UnrecognizedArgument(token.to_string())),
                }
                continue;
            }

            match stack.last_mut() {
                Some(top) if !top.kind().is_flag() && !top.has_value() => {
                    if let Some(value) = top.kind().parse_value(token) {
                        log::trace!("attach {:?} to {}", value, top.key());
                        top.set_value(value);
                    }
                }
                _ => self.report(Diagnostic::ExtraneousValue(token.to_string())),
            }
        }

        stack
    }

    fn check_dependencies(&mut self, argument: &Argument, pending: &[Argument]) {
        for dependency in argument.definition().dependencies() {
            let present = pending.iter().any(|other| {
                other.definition().answers_to(&dependency.name)
                    || other.definition().answers_to(&dependency.alias)
            });

            if !present {
                self.report(Diagnostic::MissingDependency {
                    dependency: dependency.display_name().to_string(),
                    required_by: argument.key().to_string(),
                });
            }
        }
    }

    // Reports every missing required argument.
    fn check_required_arguments(&mut self) {
        let registry = self.registry;
        for def in registry.required_arguments() {
            if !self.contains([def.name(), def.alias()]) {
                self.report(Diagnostic::MissingRequired(def.key().to_string()));
            }
        }
    }

    // Reports only the first argument without a value, in mapping order.
    fn check_missing_values(&mut self) {
        let missing = self
            .arguments
            .values()
            .find(|arg| !arg.has_value())
            .map(|arg| arg.key().to_string());

        if let Some(key) = missing {
            self.report(Diagnostic::MissingValue(key));
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        if self.cfg.echo_diagnostics {
            eprintln!("{diagnostic}");
        }
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Kind, Level, Value};
    use pretty_assertions::assert_eq;

    fn name_and_flag() -> Registry {
        let mut r = Registry::new();
        r.register_argument("--name", "-N", Kind::String, Level::Required);
        r.register_flag("--flag", "-F");
        r
    }

    fn parse<'r>(registry: &'r Registry, tokens: &[&str]) -> Parser<'r> {
        let mut p = Parser::with_config(registry, ParserConfig::quiet());
        p.parse(tokens);
        p
    }

    #[test]
    fn string_value_attaches_without_diagnostics() {
        let r = name_and_flag();
        let p = parse(&r, &["--name", "x"]);

        assert!(p.diagnostics().is_empty());
        assert_eq!(p.get_arguments().len(), 1);
        let name = p.get_argument("--name").unwrap();
        assert_eq!(name.value(), Some(&Value::String("x".into())));
    }

    #[test]
    fn alias_resolves_to_canonical_key() {
        let r = name_and_flag();
        let p = parse(&r, &["-N", "demo", "-F"]);

        assert!(p.diagnostics().is_empty());
        assert!(p.contains("--name"));
        assert!(p.contains("--flag"));
        assert!(!p.contains("-N"));
        assert!(p.contains(["-N", "--name"]));
        assert_eq!(p.get_argument(["--name", "-N"]).unwrap().as_str(), Some("demo"));
    }

    #[test]
    fn unrecognized_argument_is_dropped() {
        let r = name_and_flag();
        let p = parse(&r, &["--unknown"]);

        assert!(p.get_arguments().is_empty());
        assert_eq!(
            p.diagnostics(),
            &[
                Diagnostic::UnrecognizedArgument("--unknown".into()),
                Diagnostic::MissingRequired("--name".into()),
            ]
        );
    }

    #[test]
    fn extraneous_values_are_dropped() {
        let r = name_and_flag();
        let p = parse(&r, &["stray", "--flag", "x", "--name", "a", "b"]);

        assert_eq!(
            p.diagnostics(),
            &[
                Diagnostic::ExtraneousValue("stray".into()),
                Diagnostic::ExtraneousValue("x".into()),
                Diagnostic::ExtraneousValue("b".into()),
            ]
        );
        assert_eq!(p.get_argument("--name").unwrap().as_str(), Some("a"));
        assert_eq!(p.get_argument("--flag").unwrap().value(), None);
    }

    #[test]
    fn missing_dependency_still_commits_both() {
        let mut r = Registry::new();
        r.register_argument("--a", "", Kind::Integer, Level::Optional)
            .depends_on("--b", "");
        r.register_argument("--c", "", Kind::Integer, Level::Optional);
        r.register_argument("--b", "", Kind::Integer, Level::Optional);

        let p = parse(&r, &["--a", "1", "--c", "2"]);

        assert_eq!(
            p.diagnostics(),
            &[Diagnostic::MissingDependency {
                dependency: "--b".into(),
                required_by: "--a".into(),
            }]
        );
        assert_eq!(p.get_argument("--a").unwrap().as_int(), Some(1));
        assert_eq!(p.get_argument("--c").unwrap().as_int(), Some(2));
    }

    #[test]
    fn dependency_only_sees_earlier_arguments() {
        let mut r = Registry::new();
        r.register_flag("--a", "-A").depends_on("--b", "-B");
        r.register_flag("--b", "-B");

        let p = parse(&r, &["--b", "--a"]);
        assert!(p.diagnostics().is_empty());

        let p = parse(&r, &["-B", "-A"]);
        assert!(p.diagnostics().is_empty());

        let p = parse(&r, &["--a", "--b"]);
        assert_eq!(
            p.diagnostics(),
            &[Diagnostic::MissingDependency {
                dependency: "--b".into(),
                required_by: "--a".into(),
            }]
        );
    }

    #[test]
    fn alias_only_dependency_matches_named_token() {
        let mut r = Registry::new();
        r.register_flag("--a", "").depends_on("", "-B");
        r.register_flag("--b", "-B");

        let p = parse(&r, &["--b", "--a"]);
        assert!(p.diagnostics().is_empty());

        let p = parse(&r, &["--a"]);
        assert_eq!(
            p.diagnostics(),
            &[Diagnostic::MissingDependency {
                dependency: "-B".into(),
                required_by: "--a".into(),
            }]
        );
    }

    #[test]
    fn missing_value_is_reported() {
        let mut r = Registry::new();
        r.register_argument("--count", "", Kind::Integer, Level::Optional);

        let p = parse(&r, &["--count"]);
        assert_eq!(p.diagnostics(), &[Diagnostic::MissingValue("--count".into())]);
        assert!(!p.get_argument("--count").unwrap().has_value());
    }

    #[test]
    fn missing_value_reports_first_offender_only() {
        let mut r = Registry::new();
        r.register_argument("--x", "", Kind::Integer, Level::Optional);
        r.register_argument("--y", "", Kind::Decimal, Level::Optional);

        let p = parse(&r, &["--x", "--y"]);
        // the stack drains last-to-first, so --y is committed first
        assert_eq!(p.diagnostics(), &[Diagnostic::MissingValue("--y".into())]);
        assert_eq!(p.get_arguments().keys().collect::<Vec<_>>(), vec!["--y", "--x"]);
    }

    #[test]
    fn every_missing_required_argument_is_reported() {
        let mut r = Registry::new();
        r.register_argument("--name", "-N", Kind::String, Level::Required);
        r.register_argument("", "-o", Kind::String, Level::Required);
        r.register_flag("--verbose", "-v");

        let p = parse(&r, &["-v"]);
        assert_eq!(
            p.diagnostics(),
            &[
                Diagnostic::MissingRequired("--name".into()),
                Diagnostic::MissingRequired("-o".into()),
            ]
        );
    }

    #[test]
    fn alias_only_definition_is_keyed_by_alias() {
        let mut r = Registry::new();
        r.register_argument("", "-o", Kind::String, Level::Required);

        let p = parse(&r, &["-o", "out.txt"]);
        assert!(p.diagnostics().is_empty());
        assert_eq!(p.get_argument("-o").unwrap().as_str(), Some("out.txt"));
    }

    #[test]
    fn earliest_duplicate_wins() {
        let r = name_and_flag();
        let p = parse(&r, &["--name", "first", "-N", "second"]);

        assert_eq!(p.get_arguments().len(), 1);
        assert_eq!(p.get_argument("--name").unwrap().as_str(), Some("first"));
    }

    #[test]
    fn typed_values_are_parsed_permissively() {
        let mut r = Registry::new();
        r.register_argument("--jobs", "-j", Kind::Integer, Level::Optional);
        r.register_argument("--ratio", "", Kind::Decimal, Level::Optional);
        r.register_argument("--color", "", Kind::Boolean, Level::Optional);

        let p = parse(&r, &["-j", "eight", "--ratio", "0.75", "--color", "true"]);
        assert!(p.diagnostics().is_empty());
        assert_eq!(p.get_argument("--jobs").unwrap().as_int(), Some(0));
        assert_eq!(p.get_argument("--ratio").unwrap().as_decimal(), Some(0.75));
        assert_eq!(p.get_argument("--color").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn negative_number_is_treated_as_marker() {
        let mut r = Registry::new();
        r.register_argument("--offset", "", Kind::Integer, Level::Optional);

        let p = parse(&r, &["--offset", "-5"]);
        assert_eq!(
            p.diagnostics(),
            &[
                Diagnostic::UnrecognizedArgument("-5".into()),
                Diagnostic::MissingValue("--offset".into()),
            ]
        );
    }

    #[test]
    fn reparsing_is_idempotent() {
        let mut r = name_and_flag();
        r.register_argument("--n", "", Kind::Integer, Level::Optional)
            .depends_on("--flag", "-F");
        let tokens = ["--n", "3", "--bogus", "-F", "extra", "--name"];

        let mut p = Parser::with_config(&r, ParserConfig::quiet());
        p.parse(tokens);
        let first = p.trace();
        p.parse(tokens);
        assert_eq!(p.trace(), first);

        let fresh = parse(&r, &tokens);
        assert_eq!(fresh.trace(), first);
        assert_eq!(fresh.diagnostics(), p.diagnostics());
    }

    #[test]
    fn parser_stays_bound_to_its_registry() {
        let r = name_and_flag();
        let p = parse(&r, &["--flag"]);
        assert!(std::ptr::eq(p.registry(), &r));
        assert!(p.registry().contains("--name"));
    }

    #[test]
    fn empty_input_reports_required_only() {
        let r = name_and_flag();
        let p = parse(&r, &[]);
        assert!(p.get_arguments().is_empty());
        assert_eq!(p.diagnostics(), &[Diagnostic::MissingRequired("--name".into())]);
    }

    #[test]
    fn trace_lists_arguments_and_diagnostic_lines() {
        let r = name_and_flag();
        let p = parse(&r, &["--flag", "--what"]);
        let trace = p.trace();

        assert_eq!(trace.arguments.len(), 1);
        assert_eq!(trace.arguments["--flag"].kind, Kind::Flag);
        assert_eq!(trace.arguments["--flag"].value, None);
        assert_eq!(
            trace.diagnostics,
            vec![
                r#"IGNORING UNRECOGNIZED ARGUMENT: "--what""#.to_string(),
                r#"MISSING REQUIRED ARGUMENT "--name""#.to_string(),
            ]
        );
    }
}
