//! Argument kinds and the name → constructor registry.
//!
//! A kind knows how to recognise one piece of a command line. The set of
//! kinds is closed ([`Kind`]), and commands refer to kinds by name through a
//! [`KindRegistry`], so a misspelled kind name is caught when the command
//! table is built rather than when a player types the command.

mod keyword;
mod nothing;
mod number;
mod symbols;
mod text;
mod word;

pub use keyword::Keyword;
pub use nothing::Nothing;
pub use number::Number;
pub use symbols::Symbols;
pub use text::Text;
pub use word::Word;

use crate::error::{ArgumentError, DefinitionError};
use crate::namespace::Namespace;
use crate::value::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

/// How an argument consumes whitespace around it.
///
/// It also fixes the order in which a branch matches its arguments: every
/// strict argument first, then the delimited ones, then the rest. An argument
/// only sees the input between the matches of its neighbours, so a `=`
/// matched first stops a word or a text in front of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSpace {
    /// Exact match, located before anything else
    Strict,
    /// Up to the next whitespace
    Delimited,
    /// Everything up to the next matched argument or the end of the input
    Greedy,
}

/// A successful match of one argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgMatch {
    pub begin: usize,
    pub end: usize,
    pub raw: String,
    pub value: Value,
}

impl ArgMatch {
    pub fn new(input: &str, begin: usize, end: usize, value: Value) -> Self {
        Self {
            begin,
            end,
            raw: input[begin..end].to_string(),
            value,
        }
    }
}

/// Behaviour shared by every argument kind.
pub trait ArgumentKind {
    /// Registry name of the kind.
    fn name(&self) -> &'static str;

    fn space(&self) -> ArgSpace;

    /// Whether a match stores a value in the namespace.
    fn in_namespace(&self) -> bool {
        true
    }

    /// Tries to match `input[begin..end]`. `begin` is already past any
    /// leading whitespace and `end` before any trailing whitespace.
    fn parse(&self, input: &str, begin: usize, end: usize) -> Result<ArgMatch, ArgumentError>;

    /// Stores a matched value under `dest`.
    fn bind(&self, dest: &str, value: Value, namespace: &mut Namespace) {
        if self.in_namespace() {
            namespace.insert(dest, value);
        }
    }

    /// Usage fragment for this kind, `dest` being the namespace key.
    fn format(&self, dest: &str) -> String;
}

/// The closed set of built-in argument kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    Nothing(Nothing),
    Text(Text),
    Word(Word),
    Number(Number),
    Keyword(Keyword),
    Symbols(Symbols),
}

impl Kind {
    fn as_dyn(&self) -> &dyn ArgumentKind {
        match self {
            Kind::Nothing(kind) => kind,
            Kind::Text(kind) => kind,
            Kind::Word(kind) => kind,
            Kind::Number(kind) => kind,
            Kind::Keyword(kind) => kind,
            Kind::Symbols(kind) => kind,
        }
    }
}

impl ArgumentKind for Kind {
    fn name(&self) -> &'static str {
        self.as_dyn().name()
    }

    fn space(&self) -> ArgSpace {
        self.as_dyn().space()
    }

    fn in_namespace(&self) -> bool {
        self.as_dyn().in_namespace()
    }

    fn parse(&self, input: &str, begin: usize, end: usize) -> Result<ArgMatch, ArgumentError> {
        self.as_dyn().parse(input, begin, end)
    }

    fn bind(&self, dest: &str, value: Value, namespace: &mut Namespace) {
        self.as_dyn().bind(dest, value, namespace)
    }

    fn format(&self, dest: &str) -> String {
        self.as_dyn().format(dest)
    }
}

/// Builds a kind from its optional parameter (the keyword, the symbols...).
pub type KindConstructor = fn(Option<&str>) -> Result<Kind, DefinitionError>;

/// Maps kind names to constructors.
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    constructors: HashMap<&'static str, KindConstructor>,
}

static BUILTIN: LazyLock<KindRegistry> = LazyLock::new(KindRegistry::with_builtins);

impl KindRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in kind.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("nothing", |_| Ok(Kind::Nothing(Nothing)));
        registry.register("text", |_| Ok(Kind::Text(Text)));
        registry.register("word", |_| Ok(Kind::Word(Word)));
        registry.register("number", |_| Ok(Kind::Number(Number)));
        registry.register("keyword", |param| {
            Keyword::new(param.unwrap_or_default()).map(Kind::Keyword)
        });
        registry.register("symbols", |param| {
            Symbols::new(param.unwrap_or_default()).map(Kind::Symbols)
        });
        registry
    }

    /// Shared registry of built-in kinds, built on first use.
    pub fn builtin() -> &'static KindRegistry {
        &BUILTIN
    }

    /// Registers (or replaces) a constructor under `name`.
    pub fn register(&mut self, name: &'static str, constructor: KindConstructor) {
        self.constructors.insert(name, constructor);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Instantiates the kind registered under `name`.
    pub fn create(&self, name: &str, param: Option<&str>) -> Result<Kind, DefinitionError> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| DefinitionError::UnknownKind(name.to_string()))?;
        constructor(param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_knows_every_kind() {
        let registry = KindRegistry::builtin();
        for name in ["nothing", "text", "word", "number", "keyword", "symbols"] {
            assert!(registry.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_unknown_kind_is_a_definition_error() {
        let error = KindRegistry::builtin().create("colour", None).unwrap_err();
        assert_eq!(error, DefinitionError::UnknownKind("colour".to_string()));
    }

    #[test]
    fn test_parameterised_kinds_require_a_parameter() {
        let registry = KindRegistry::builtin();
        assert_eq!(
            registry.create("keyword", None).unwrap_err(),
            DefinitionError::MissingParameter { kind: "keyword" }
        );
        assert!(registry.create("symbols", Some("=")).is_ok());
    }

    #[test]
    fn test_kind_delegates_to_its_variant() {
        let kind = KindRegistry::builtin().create("nothing", None).unwrap();
        assert_eq!(kind.name(), "nothing");
        assert_eq!(kind.space(), ArgSpace::Strict);
        assert!(!kind.in_namespace());
    }
}
