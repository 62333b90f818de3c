use super::{ArgMatch, ArgSpace, ArgumentKind};
use crate::error::ArgumentError;
use crate::helpers::word_end;
use crate::value::Value;

/// A single whitespace-delimited word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Word;

impl ArgumentKind for Word {
    fn name(&self) -> &'static str {
        "word"
    }

    fn space(&self) -> ArgSpace {
        ArgSpace::Delimited
    }

    fn parse(&self, input: &str, begin: usize, end: usize) -> Result<ArgMatch, ArgumentError> {
        let stop = word_end(input, begin, end);
        if stop == begin {
            return Err(ArgumentError::new("You have to specify a word.", begin));
        }

        let word = input[begin..stop].to_string();
        Ok(ArgMatch::new(input, begin, stop, Value::Text(word)))
    }

    fn format(&self, dest: &str) -> String {
        format!("<{dest}>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_stops_at_whitespace() {
        let matched = Word.parse("north gate", 0, 10).unwrap();
        assert_eq!(matched.value, Value::from("north"));
        assert_eq!(matched.end, 5);
    }

    #[test]
    fn test_missing_word() {
        assert!(Word.parse("", 0, 0).is_err());
    }
}
