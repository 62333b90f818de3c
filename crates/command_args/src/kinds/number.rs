use super::{ArgMatch, ArgSpace, ArgumentKind};
use crate::error::ArgumentError;
use crate::helpers::word_end;
use crate::value::Value;

/// A signed integer word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Number;

impl ArgumentKind for Number {
    fn name(&self) -> &'static str {
        "number"
    }

    fn space(&self) -> ArgSpace {
        ArgSpace::Delimited
    }

    fn parse(&self, input: &str, begin: usize, end: usize) -> Result<ArgMatch, ArgumentError> {
        let stop = word_end(input, begin, end);
        if stop == begin {
            return Err(ArgumentError::new("You have to specify a number.", begin));
        }

        let word = &input[begin..stop];
        let number = word
            .parse::<i64>()
            .map_err(|_| ArgumentError::new(format!("'{word}' is not a valid number."), begin))?;
        Ok(ArgMatch::new(input, begin, stop, Value::Number(number)))
    }

    fn format(&self, dest: &str) -> String {
        format!("<{dest}>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_numbers() {
        assert_eq!(Number.parse("5 apples", 0, 8).unwrap().value, Value::Number(5));
        assert_eq!(Number.parse("-12", 0, 3).unwrap().value, Value::Number(-12));
    }

    #[test]
    fn test_not_a_number() {
        let error = Number.parse("get apple", 4, 9).unwrap_err();
        assert_eq!(error.message(), "'apple' is not a valid number.");
        assert_eq!(error.position(), 4);
    }
}
