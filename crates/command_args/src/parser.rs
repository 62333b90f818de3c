//! The command argument parser.

use crate::argument::Argument;
use crate::branch::{Branch, SYNTAX_ERROR};
use crate::error::{ArgumentError, DefinitionError};
use crate::group::Group;
use crate::helpers::clamp_span;
use crate::namespace::Namespace;
use tracing::trace;

/// Handler name used by arguments added outside of an explicit branch.
pub const DEFAULT_HANDLER: &str = "run";

/// Parses the argument part of a command line against a list of branches.
///
/// Branches are tried in declaration order and the first full match wins.
/// When none matches, the error of the branch that got the furthest into the
/// input is reported (the earliest branch wins a tie).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    branches: Vec<Branch>,
}

impl CommandArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a branch and returns it for further configuration.
    pub fn add_branch(&mut self, branch: Branch) -> &mut Branch {
        self.branches.push(branch);
        let last = self.branches.len() - 1;
        &mut self.branches[last]
    }

    /// Appends an argument to the last declared branch, creating the default
    /// `run` branch first if there is none.
    pub fn add_argument(&mut self, argument: Argument) -> Result<(), DefinitionError> {
        if self.branches.is_empty() {
            self.branches.push(Branch::new(DEFAULT_HANDLER)?);
        }
        let last = self.branches.len() - 1;
        self.branches[last].push(argument)
    }

    /// Appends a group of alternatives to the last declared branch, creating
    /// the default `run` branch first if there is none.
    pub fn add_group(&mut self, group: Group) -> Result<(), DefinitionError> {
        if self.branches.is_empty() {
            self.branches.push(Branch::new(DEFAULT_HANDLER)?);
        }
        let last = self.branches.len() - 1;
        self.branches[last].push_group(group)
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Parses the whole of `input`.
    pub fn parse(&self, input: &str) -> Result<Namespace, ArgumentError> {
        self.parse_span(input, 0, input.len())
    }

    /// Parses `input[begin..end]`, the argument part of a command line.
    ///
    /// # Arguments
    ///
    /// * `input` - The whole line as typed, command name included
    /// * `begin` - Byte offset where the arguments start
    /// * `end` - Byte offset where they stop
    ///
    /// The span is clamped to `input`: `end` is capped at its length,
    /// `begin` at `end`, and both move back to a `char` boundary.
    ///
    /// # Returns
    ///
    /// The namespace of the first branch that matches, tagged with that
    /// branch's handler. Otherwise the error that got furthest into the
    /// line; its position is an offset into `input`, not into the span.
    ///
    /// # Example
    ///
    /// ```
    /// use command_args::{Argument, CommandArgs};
    ///
    /// let mut args = CommandArgs::new();
    /// args.add_argument(Argument::named("number", None).unwrap().dest("count"))
    ///     .unwrap();
    ///
    /// let line = "drop 3";
    /// let namespace = args.parse_span(line, 5, line.len()).unwrap();
    /// assert_eq!(namespace.number("count"), Some(3));
    ///
    /// let error = args.parse_span("drop x", 5, 6).unwrap_err();
    /// assert_eq!(error.position(), 5);
    /// ```
    pub fn parse_span(
        &self,
        input: &str,
        begin: usize,
        end: usize,
    ) -> Result<Namespace, ArgumentError> {
        let (begin, end) = clamp_span(input, begin, end);
        if self.branches.is_empty() {
            return Branch::implicit().parse(input, begin, end);
        }

        let mut deepest = None;
        for branch in &self.branches {
            match branch.parse(input, begin, end) {
                Ok(namespace) => {
                    trace!("Matched branch '{}' for {:?}", branch.handler(), input);
                    return Ok(namespace);
                }
                Err(error) => ArgumentError::keep_deepest(&mut deepest, error),
            }
        }

        Err(deepest.unwrap_or_else(|| ArgumentError::new(SYNTAX_ERROR, begin)))
    }

    /// Usage text, one line per branch.
    pub fn format(&self) -> String {
        self.branches
            .iter()
            .map(Branch::format)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_no_branch_accepts_only_blank_input() {
        let args = CommandArgs::new();
        let namespace = args.parse("  ").unwrap();
        assert_eq!(namespace.handler(), Some(DEFAULT_HANDLER));
        assert!(namespace.is_empty());

        let error = args.parse("  hi").unwrap_err();
        assert_eq!(error.position(), 2);
    }

    #[test]
    fn test_add_argument_creates_run_branch() {
        let mut args = CommandArgs::new();
        args.add_argument(Argument::named("text", None).unwrap()).unwrap();
        assert_eq!(args.branches().len(), 1);
        assert_eq!(args.branches()[0].handler(), DEFAULT_HANDLER);
    }

    #[test]
    fn test_deepest_error_is_reported() {
        let mut args = CommandArgs::new();
        args.add_branch(
            Branch::new("give")
                .unwrap()
                .with(Argument::named("keyword", Some("give")).unwrap())
                .unwrap(),
        );
        args.add_branch(
            Branch::new("put")
                .unwrap()
                .with(Argument::named("word", None).unwrap().dest("object"))
                .unwrap()
                .with(Argument::named("keyword", Some("in")).unwrap())
                .unwrap(),
        );

        let error = args.parse("apple on table").unwrap_err();
        assert_eq!(error.message(), "You should specify 'in'.");
        assert_eq!(error.position(), 6);
    }

    #[test]
    fn test_format_lists_every_branch() {
        let mut args = CommandArgs::new();
        args.add_branch(Branch::new("list").unwrap().optional());
        args.add_branch(
            Branch::new("show")
                .unwrap()
                .with(
                    Argument::named("word", None)
                        .unwrap()
                        .dest("name")
                        .default(Value::None),
                )
                .unwrap(),
        );
        assert_eq!(args.format(), "\n[<name>]");
    }

    #[test]
    fn test_span_past_the_line_is_clamped() {
        let mut args = CommandArgs::new();
        args.add_argument(Argument::named("word", None).unwrap().dest("target"))
            .unwrap();

        let namespace = args.parse_span("look box", 5, 64).unwrap();
        assert_eq!(namespace.text("target"), Some("box"));

        let error = args.parse_span("look", 9, 64).unwrap_err();
        assert_eq!(error.position(), 4);
    }

    #[test]
    fn test_add_group_creates_run_branch() {
        use crate::group::GroupRole;

        let mut args = CommandArgs::new();
        args.add_group(
            Group::new(GroupRole::OneOf)
                .alternative(vec![Argument::named("keyword", Some("on")).unwrap()])
                .unwrap()
                .alternative(vec![Argument::named("keyword", Some("off")).unwrap()])
                .unwrap(),
        )
        .unwrap();

        assert_eq!(args.format(), "(on) | (off)");
        assert_eq!(args.parse("OFF").unwrap().text("keyword"), Some("off"));
        assert_eq!(args.parse("dim").unwrap_err().position(), 0);
    }
}
