// File: crates/args/src/registry.rs
//
// Ordered, append-only table of argument definitions.
//
// Built once by the caller before parsing; the parser only reads it.
// Registration performs no uniqueness check: lookups return the first
// definition in registration order that matches.

use crate::{Definition, Kind, Level};

#[derive(Debug, Clone, Default)]
pub struct Registry {
    arguments: Vec<Definition>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registered_arguments(&self) -> &[Definition] {
        &self.arguments
    }

    pub fn required_arguments(&self) -> impl Iterator<Item = &Definition> {
        self.arguments.iter().filter(|d| d.is_required())
    }

    /// Append a definition and return it for dependency annotation.
    pub fn register(&mut self, definition: Definition) -> &mut Definition {
        if let Some(existing) = [definition.name(), definition.alias()]
            .into_iter()
            .find(|text| !text.is_empty() && self.contains(text))
        {
            log::debug!(
                "registering {:?} again; lookups of {:?} keep resolving to the earlier definition",
                definition.key(),
                existing
            );
        }

        let index = self.arguments.len();
        self.arguments.push(definition);
        &mut self.arguments[index]
    }

    pub fn register_argument(
        &mut self,
        name: impl Into<String>,
        alias: impl Into<String>,
        kind: Kind,
        level: Level,
    ) -> &mut Definition {
        self.register(Definition::new(name, alias, kind, level))
    }

    /// Shorthand for an optional flag.
    pub fn register_flag(
        &mut self,
        name: impl Into<String>,
        alias: impl Into<String>,
    ) -> &mut Definition {
        self.register_argument(name, alias, Kind::Flag, Level::Optional)
    }

    pub fn find_registered_argument_by_name(&self, name: &str) -> Option<&Definition> {
        self.arguments.iter().find(|d| d.name() == name)
    }

    pub fn find_registered_argument_by_alias(&self, alias: &str) -> Option<&Definition> {
        self.arguments.iter().find(|d| d.alias() == alias)
    }

    /// Name lookup first, alias lookup as the fallback.
    pub fn find_registered_argument(&self, text: &str) -> Option<&Definition> {
        self.find_registered_argument_by_name(text)
            .or_else(|| self.find_registered_argument_by_alias(text))
    }

    pub fn contains(&self, text: &str) -> bool {
        self.find_registered_argument(text).is_some()
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }
}

impl FromIterator<Definition> for Registry {
    fn from_iter<I: IntoIterator<Item = Definition>>(iter: I) -> Self {
        let mut registry = Registry::new();
        for def in iter {
            registry.register(def);
        }
        registry
    }
}
