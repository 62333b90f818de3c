use super::{ArgMatch, ArgSpace, ArgumentKind};
use crate::error::{ArgumentError, DefinitionError};
use crate::namespace::Namespace;
use crate::value::Value;

/// Literal delimiter characters such as `=` or `->`.
///
/// The symbols are searched for anywhere in the span handed to the kind, so
/// they split the line before the arguments around them are matched. A match
/// stores no value of its own but can set fixed entries ("dests") in the
/// namespace:
///
/// ```
/// use command_args::kinds::Symbols;
/// use command_args::{Argument, Branch, Kind};
///
/// let arrow = Symbols::new("->").unwrap().with_dest("direction", "out");
/// let branch = Branch::new("pipe")
///     .unwrap()
///     .with(Argument::named("word", None).unwrap().dest("from"))
///     .unwrap()
///     .with(Argument::new(Kind::Symbols(arrow)))
///     .unwrap()
///     .with(Argument::named("word", None).unwrap().dest("to"))
///     .unwrap();
///
/// let namespace = branch.parse("a->b", 0, 4).unwrap();
/// assert_eq!(namespace.text("direction"), Some("out"));
/// assert_eq!(namespace.text("to"), Some("b"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbols {
    symbols: String,
    dests: Vec<(String, Value)>,
}

impl Symbols {
    pub fn new(symbols: &str) -> Result<Self, DefinitionError> {
        if symbols.is_empty() {
            return Err(DefinitionError::MissingParameter { kind: "symbols" });
        }

        Ok(Self {
            symbols: symbols.to_string(),
            dests: Vec::new(),
        })
    }

    /// Adds an entry written to the namespace whenever the symbols match.
    pub fn with_dest(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.dests.push((key.into(), value.into()));
        self
    }

    pub fn symbols(&self) -> &str {
        &self.symbols
    }

    pub fn dests(&self) -> &[(String, Value)] {
        &self.dests
    }
}

impl ArgumentKind for Symbols {
    fn name(&self) -> &'static str {
        "symbols"
    }

    fn space(&self) -> ArgSpace {
        ArgSpace::Strict
    }

    fn in_namespace(&self) -> bool {
        false
    }

    fn parse(&self, input: &str, begin: usize, end: usize) -> Result<ArgMatch, ArgumentError> {
        let Some(offset) = input[begin..end].find(&self.symbols) else {
            return Err(ArgumentError::new(
                format!("You forgot to specify {}.", self.symbols),
                begin,
            ));
        };

        let start = begin + offset;
        Ok(ArgMatch::new(
            input,
            start,
            start + self.symbols.len(),
            Value::None,
        ))
    }

    fn bind(&self, _dest: &str, _value: Value, namespace: &mut Namespace) {
        for (key, value) in &self.dests {
            namespace.insert(key.clone(), value.clone());
        }
    }

    fn format(&self, _dest: &str) -> String {
        self.symbols.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_match_at_cursor() {
        let symbols = Symbols::new("=").unwrap();
        let matched = symbols.parse("name=Bob", 4, 8).unwrap();
        assert_eq!((matched.begin, matched.end), (4, 5));
    }

    #[test]
    fn test_symbols_are_found_inside_the_span() {
        let symbols = Symbols::new("=").unwrap();
        let matched = symbols.parse("n=go north", 0, 10).unwrap();
        assert_eq!((matched.begin, matched.end), (1, 2));

        let matched = symbols.parse("n = go", 0, 6).unwrap();
        assert_eq!(matched.raw, "=");
        assert_eq!(matched.begin, 2);
    }

    #[test]
    fn test_missing_symbols() {
        let symbols = Symbols::new("->").unwrap();
        let error = symbols.parse("a b", 2, 3).unwrap_err();
        assert_eq!(error.message(), "You forgot to specify ->.");
        assert_eq!(error.position(), 2);
    }

    #[test]
    fn test_dests_are_written_on_bind() {
        let symbols = Symbols::new("+=").unwrap().with_dest("mode", "append");
        let mut namespace = Namespace::new();
        symbols.bind("symbols", Value::None, &mut namespace);
        assert_eq!(namespace.text("mode"), Some("append"));
        assert_eq!(namespace.len(), 1);
    }
}
