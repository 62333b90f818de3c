//! Argument definitions.

use crate::error::{ArgumentError, DefinitionError};
use crate::kinds::{ArgMatch, ArgumentKind, Kind, KindRegistry};
use crate::value::Value;

/// One typed argument inside a [`Branch`](crate::Branch).
///
/// Built with a small consuming builder:
///
/// ```
/// use command_args::{Argument, Value};
///
/// let count = Argument::named("number", None)
///     .unwrap()
///     .dest("count")
///     .default(Value::Number(1));
/// assert!(count.is_optional());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    kind: Kind,
    dest: String,
    optional: bool,
    default: Option<Value>,
}

impl Argument {
    pub fn new(kind: Kind) -> Self {
        Self {
            dest: kind.name().to_string(),
            kind,
            optional: false,
            default: None,
        }
    }

    /// Creates an argument of a built-in kind, by name.
    pub fn named(kind: &str, param: Option<&str>) -> Result<Self, DefinitionError> {
        Self::from_registry(KindRegistry::builtin(), kind, param)
    }

    pub fn from_registry(
        registry: &KindRegistry,
        kind: &str,
        param: Option<&str>,
    ) -> Result<Self, DefinitionError> {
        registry.create(kind, param).map(Self::new)
    }

    /// Sets the namespace key (defaults to the kind name).
    pub fn dest(mut self, dest: impl Into<String>) -> Self {
        self.dest = dest.into();
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Sets the value bound when the argument is absent. Implies [`optional`](Self::optional).
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.optional = true;
        self.default = Some(value.into());
        self
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn dest_name(&self) -> &str {
        &self.dest
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn in_namespace(&self) -> bool {
        self.kind.in_namespace()
    }

    pub(crate) fn validate(&self) -> Result<(), DefinitionError> {
        if self.in_namespace() && self.dest.trim().is_empty() {
            return Err(DefinitionError::EmptyDestination {
                kind: self.kind.name(),
            });
        }
        Ok(())
    }

    pub(crate) fn parse(
        &self,
        input: &str,
        begin: usize,
        end: usize,
    ) -> Result<ArgMatch, ArgumentError> {
        self.kind.parse(input, begin, end)
    }

    /// Usage fragment, bracketed when optional. Empty for kinds that print
    /// nothing.
    pub fn format(&self) -> String {
        let text = self.kind.format(&self.dest);
        if self.optional && !text.is_empty() {
            format!("[{text}]")
        } else {
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dest_defaults_to_kind_name() {
        let argument = Argument::named("text", None).unwrap();
        assert_eq!(argument.dest_name(), "text");
        assert!(!argument.is_optional());
        assert!(argument.default_value().is_none());
    }

    #[test]
    fn test_default_none_is_distinct_from_no_default() {
        let argument = Argument::named("word", None).unwrap().default(Value::None);
        assert_eq!(argument.default_value(), Some(&Value::None));

        let argument = Argument::named("word", None).unwrap().optional();
        assert_eq!(argument.default_value(), None);
    }

    #[test]
    fn test_format() {
        let argument = Argument::named("word", None).unwrap().dest("target").optional();
        assert_eq!(argument.format(), "[<target>]");

        let argument = Argument::named("keyword", Some("in")).unwrap();
        assert_eq!(argument.format(), "in");
    }

    #[test]
    fn test_empty_dest_is_rejected() {
        let argument = Argument::named("word", None).unwrap().dest("");
        assert_eq!(
            argument.validate(),
            Err(DefinitionError::EmptyDestination { kind: "word" })
        );

        let argument = Argument::named("nothing", None).unwrap().dest("");
        assert!(argument.validate().is_ok());
    }
}
