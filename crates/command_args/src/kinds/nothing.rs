use super::{ArgMatch, ArgSpace, ArgumentKind};
use crate::error::ArgumentError;
use crate::helpers::skip_whitespace;
use crate::value::Value;

/// Accepts only a blank span. Used by commands that take no argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Nothing;

impl ArgumentKind for Nothing {
    fn name(&self) -> &'static str {
        "nothing"
    }

    fn space(&self) -> ArgSpace {
        ArgSpace::Strict
    }

    fn in_namespace(&self) -> bool {
        false
    }

    fn parse(&self, input: &str, begin: usize, end: usize) -> Result<ArgMatch, ArgumentError> {
        let first = skip_whitespace(input, begin, end);
        if first < end {
            return Err(ArgumentError::new("You should not specify anything.", first));
        }

        Ok(ArgMatch::new(input, begin, end, Value::None))
    }

    fn format(&self, _dest: &str) -> String {
        String::new()
    }
}
