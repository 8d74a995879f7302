// File: crates/args/src/argument.rs
//
// Argument definitions (what the registry knows) and argument instances
// (what a parse produced). An instance is a copy of its definition plus,
// for non-flag kinds, the value attached from the following token.

use crate::{Kind, Level, Value};
use serde::{Deserialize, Serialize};

/// A co-requirement declared on a definition.
///
/// Satisfied when an argument matching either `name` or `alias` is present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    #[serde(default)]
    pub alias: String,
}

impl Dependency {
    /// The text used when reporting this dependency as missing.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.alias
        } else {
            &self.name
        }
    }
}

/// A registered description of one recognized command-line argument.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default)]
    name: String,
    #[serde(default)]
    alias: String,
    #[serde(default)]
    kind: Kind,
    #[serde(default)]
    level: Level,
    #[serde(default)]
    dependencies: Vec<Dependency>,
}

impl Definition {
    pub fn new(
        name: impl Into<String>,
        alias: impl Into<String>,
        kind: Kind,
        level: Level,
    ) -> Self {
        let def = Self {
            name: name.into(),
            alias: alias.into(),
            kind,
            level,
            dependencies: Vec::new(),
        };
        debug_assert!(
            !(def.name.is_empty() && def.alias.is_empty()),
            "argument definition needs a name or an alias"
        );
        def
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn alias(&self) -> &str {
        &self.alias
    }
    pub fn kind(&self) -> Kind {
        self.kind
    }
    pub fn level(&self) -> Level {
        self.level
    }
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn is_required(&self) -> bool {
        self.level == Level::Required
    }
    pub fn is_optional(&self) -> bool {
        self.level == Level::Optional
    }
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }

    /// Mapping key: the name, or the alias when the name is empty.
    pub fn key(&self) -> &str {
        if self.name.is_empty() {
            &self.alias
        } else {
            &self.name
        }
    }

    /// True if `text` is this definition's non-empty name or alias.
    pub fn answers_to(&self, text: &str) -> bool {
        !text.is_empty() && (self.name == text || self.alias == text)
    }

    /// Declare that `name` (or `alias`) must also be present whenever this
    /// argument is. May be chained any number of times.
    pub fn depends_on(&mut self, name: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        self.dependencies.push(Dependency {
            name: name.into(),
            alias: alias.into(),
        });
        self
    }
}

/// A definition produced during parsing, with its attached value (if any).
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    definition: Definition,
    value: Option<Value>,
}

impl Argument {
    pub fn definition(&self) -> &Definition {
        &self.definition
    }
    pub fn name(&self) -> &str {
        self.definition.name()
    }
    pub fn alias(&self) -> &str {
        self.definition.alias()
    }
    pub fn kind(&self) -> Kind {
        self.definition.kind()
    }
    pub fn key(&self) -> &str {
        self.definition.key()
    }
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Flags are always satisfied; other kinds need a value of their own kind.
    pub fn has_value(&self) -> bool {
        match self.kind() {
            Kind::Flag => true,
            kind => self.value.as_ref().is_some_and(|v| v.kind() == kind),
        }
    }

    /// Attach a value. Ignored for flags and for values of a different kind.
    pub fn set_value(&mut self, value: Value) {
        if value.kind() == self.kind() {
            self.value = Some(value);
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_ref().and_then(Value::as_bool)
    }
    pub fn as_int(&self) -> Option<i64> {
        self.value.as_ref().and_then(Value::as_int)
    }
    pub fn as_decimal(&self) -> Option<f64> {
        self.value.as_ref().and_then(Value::as_decimal)
    }
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(Value::as_str)
    }
}

impl From<Definition> for Argument {
    fn from(definition: Definition) -> Self {
        Self {
            definition,
            value: None,
        }
    }
}
