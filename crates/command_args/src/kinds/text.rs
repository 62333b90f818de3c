use super::{ArgMatch, ArgSpace, ArgumentKind};
use crate::error::ArgumentError;
use crate::helpers::trim_end;
use crate::value::Value;

/// Free text running to the end of the input, trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Text;

impl ArgumentKind for Text {
    fn name(&self) -> &'static str {
        "text"
    }

    fn space(&self) -> ArgSpace {
        ArgSpace::Greedy
    }

    fn parse(&self, input: &str, begin: usize, end: usize) -> Result<ArgMatch, ArgumentError> {
        let stop = trim_end(input, begin, end);
        if stop == begin {
            return Err(ArgumentError::new("You have to specify some text.", begin));
        }

        let text = input[begin..stop].to_string();
        Ok(ArgMatch::new(input, begin, stop, Value::Text(text)))
    }

    fn format(&self, dest: &str) -> String {
        format!("<{dest}>")
    }
}
