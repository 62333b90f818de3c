use super::{ArgMatch, ArgSpace, ArgumentKind};
use crate::error::{ArgumentError, DefinitionError};
use crate::helpers::word_end;
use crate::value::Value;

/// A fixed word, matched case-insensitively. The stored value is the keyword
/// as declared, whatever case the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    keyword: String,
}

impl Keyword {
    pub fn new(keyword: &str) -> Result<Self, DefinitionError> {
        let keyword = keyword.trim();
        if keyword.is_empty() || keyword.contains(char::is_whitespace) {
            return Err(DefinitionError::MissingParameter { kind: "keyword" });
        }

        Ok(Self {
            keyword: keyword.to_string(),
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}

impl ArgumentKind for Keyword {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn space(&self) -> ArgSpace {
        ArgSpace::Delimited
    }

    fn parse(&self, input: &str, begin: usize, end: usize) -> Result<ArgMatch, ArgumentError> {
        let stop = word_end(input, begin, end);
        if !input[begin..stop].eq_ignore_ascii_case(&self.keyword) {
            return Err(ArgumentError::new(
                format!("You should specify '{}'.", self.keyword),
                begin,
            ));
        }

        Ok(ArgMatch::new(input, begin, stop, Value::Text(self.keyword.clone())))
    }

    fn format(&self, _dest: &str) -> String {
        self.keyword.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_is_case_insensitive() {
        let keyword = Keyword::new("from").unwrap();
        let matched = keyword.parse("FROM chest", 0, 10).unwrap();
        assert_eq!(matched.value, Value::from("from"));
        assert_eq!(matched.raw, "FROM");
    }

    #[test]
    fn test_keyword_prefix_does_not_match() {
        let keyword = Keyword::new("in").unwrap();
        let error = keyword.parse("inside", 0, 6).unwrap_err();
        assert_eq!(error.message(), "You should specify 'in'.");
    }

    #[test]
    fn test_blank_keyword_is_rejected() {
        assert!(Keyword::new("  ").is_err());
        assert!(Keyword::new("two words").is_err());
    }
}
