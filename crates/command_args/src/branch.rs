//! Branches: one accepted syntax of a command.

use crate::argument::Argument;
use crate::error::{ArgumentError, DefinitionError};
use crate::group::Group;
use crate::helpers::{clamp_span, skip_whitespace, trim_end};
use crate::kinds::{ArgMatch, ArgSpace, ArgumentKind};
use crate::namespace::Namespace;
use crate::value::Value;

/// Message reported when part of the input is matched by no argument.
pub const SYNTAX_ERROR: &str = "Invalid syntax.";

/// One element of a branch: a single argument or a group of alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Argument(Argument),
    Group(Group),
}

impl Element {
    fn format(&self) -> String {
        match self {
            Element::Argument(argument) => argument.format(),
            Element::Group(group) => group.format(),
        }
    }
}

/// An ordered sequence of arguments bound to a handler name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    handler: String,
    elements: Vec<Element>,
    optional: bool,
}

/// Where one argument stands while a sequence is being matched.
enum Slot {
    Pending,
    Matched(ArgMatch),
    Default(Value),
    Failed(ArgumentError),
}

impl Slot {
    fn matched(&self) -> Option<&ArgMatch> {
        match self {
            Slot::Matched(matched) => Some(matched),
            _ => None,
        }
    }
}

impl Branch {
    pub fn new(handler: impl Into<String>) -> Result<Self, DefinitionError> {
        let handler = handler.into();
        if handler.trim().is_empty() {
            return Err(DefinitionError::EmptyHandler);
        }

        Ok(Self {
            handler,
            elements: Vec::new(),
            optional: false,
        })
    }

    /// The empty branch standing in for a parser with no branch at all.
    pub(crate) fn implicit() -> Self {
        Self {
            handler: crate::parser::DEFAULT_HANDLER.to_string(),
            elements: Vec::new(),
            optional: false,
        }
    }

    /// Marks the whole branch as matching blank input.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Appends an argument, builder style.
    pub fn with(mut self, argument: Argument) -> Result<Self, DefinitionError> {
        self.push(argument)?;
        Ok(self)
    }

    pub fn push(&mut self, argument: Argument) -> Result<(), DefinitionError> {
        argument.validate()?;
        self.elements.push(Element::Argument(argument));
        Ok(())
    }

    /// Appends a group of alternatives, builder style.
    pub fn with_group(mut self, group: Group) -> Result<Self, DefinitionError> {
        self.push_group(group)?;
        Ok(self)
    }

    pub fn push_group(&mut self, group: Group) -> Result<(), DefinitionError> {
        if group.alternatives().is_empty() {
            return Err(DefinitionError::EmptyGroup);
        }
        self.elements.push(Element::Group(group));
        Ok(())
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Arguments declared directly on the branch, outside of any group.
    pub fn arguments(&self) -> impl Iterator<Item = &Argument> {
        self.elements.iter().filter_map(|element| match element {
            Element::Argument(argument) => Some(argument),
            Element::Group(_) => None,
        })
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Matches `input[begin..end]` against this branch.
    ///
    /// Each flat argument sequence the branch allows is tried in turn (there
    /// is exactly one when the branch has no group). The first sequence that
    /// matches wins; otherwise the error that got furthest into the input is
    /// returned. The span is clamped to the input first.
    ///
    /// The returned namespace is bound to this branch's handler.
    pub fn parse(&self, input: &str, begin: usize, end: usize) -> Result<Namespace, ArgumentError> {
        let (begin, end) = clamp_span(input, begin, end);
        if self.optional && input[begin..end].trim().is_empty() {
            return Ok(self.defaults().bind(&self.handler));
        }

        let mut deepest = None;
        for sequence in self.sequences() {
            match match_sequence(&sequence, input, begin, end) {
                Ok(namespace) => return Ok(namespace.bind(&self.handler)),
                Err(error) => ArgumentError::keep_deepest(&mut deepest, error),
            }
        }

        Err(deepest.unwrap_or_else(|| ArgumentError::new(SYNTAX_ERROR, begin)))
    }

    /// Every flat argument sequence allowed by the groups of this branch.
    fn sequences(&self) -> Vec<Vec<&Argument>> {
        let mut sequences = vec![Vec::new()];
        for element in &self.elements {
            match element {
                Element::Argument(argument) => {
                    for sequence in &mut sequences {
                        sequence.push(argument);
                    }
                }
                Element::Group(group) => sequences = group.expand(sequences),
            }
        }
        sequences
    }

    fn defaults(&self) -> Namespace {
        let mut namespace = Namespace::new();
        for argument in self.arguments().filter(|a| a.in_namespace()) {
            if let Some(default) = argument.default_value() {
                namespace.insert(argument.dest_name(), default.clone());
            }
        }
        namespace
    }

    /// Usage line for this branch.
    pub fn format(&self) -> String {
        let line = self
            .elements
            .iter()
            .map(Element::format)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if self.optional && !line.is_empty() {
            format!("[{line}]")
        } else {
            line
        }
    }
}

/// Matches one flat argument sequence against `input[begin..end]`.
///
/// Arguments are matched by space: strict ones first, then delimited ones,
/// then the rest. Each argument is offered the input between the closest
/// matches on its left and on its right, without surrounding whitespace.
/// The first failure of a mandatory argument is the result; otherwise any
/// non-whitespace input left outside every match is a syntax error.
fn match_sequence(
    arguments: &[&Argument],
    input: &str,
    begin: usize,
    end: usize,
) -> Result<Namespace, ArgumentError> {
    let mut slots: Vec<Slot> = arguments.iter().map(|_| Slot::Pending).collect();

    for phase in [Some(ArgSpace::Strict), Some(ArgSpace::Delimited), None] {
        for (index, argument) in arguments.iter().enumerate() {
            if !matches!(slots[index], Slot::Pending) {
                continue;
            }
            if phase.is_some_and(|space| argument.kind().space() != space) {
                continue;
            }

            let (start, stop) = available_span(&slots, index, input, begin, end);
            slots[index] = match argument.parse(input, start, stop) {
                Ok(matched) => Slot::Matched(matched),
                Err(error) => match argument.default_value() {
                    Some(default) => Slot::Default(default.clone()),
                    None => Slot::Failed(error),
                },
            };
        }
    }

    for (argument, slot) in arguments.iter().zip(&slots) {
        if let Slot::Failed(error) = slot {
            if !argument.is_optional() {
                return Err(error.clone());
            }
        }
    }

    if let Some(position) = first_unmatched(&slots, input, begin, end) {
        return Err(ArgumentError::new(SYNTAX_ERROR, position));
    }

    let mut namespace = Namespace::new();
    for (argument, slot) in arguments.iter().zip(slots) {
        match slot {
            Slot::Matched(matched) => {
                argument
                    .kind()
                    .bind(argument.dest_name(), matched.value, &mut namespace);
            }
            Slot::Default(value) if argument.in_namespace() => {
                namespace.insert(argument.dest_name(), value);
            }
            _ => {}
        }
    }

    Ok(namespace)
}

/// The part of `input[begin..end]` left to the argument at `index`.
fn available_span(
    slots: &[Slot],
    index: usize,
    input: &str,
    begin: usize,
    end: usize,
) -> (usize, usize) {
    let left = slots[..index]
        .iter()
        .rev()
        .find_map(Slot::matched)
        .map_or(begin, |matched| matched.end);
    let right = slots[index + 1..]
        .iter()
        .find_map(Slot::matched)
        .map_or(end, |matched| matched.begin);

    let start = skip_whitespace(input, left, end);
    let stop = trim_end(input, start, right.max(start));
    (start, stop)
}

/// First non-whitespace position covered by no match.
fn first_unmatched(slots: &[Slot], input: &str, begin: usize, end: usize) -> Option<usize> {
    let mut cursor = begin;
    for matched in slots.iter().filter_map(Slot::matched) {
        let gap = skip_whitespace(input, cursor, matched.begin.max(cursor));
        if gap < matched.begin {
            return Some(gap);
        }
        cursor = cursor.max(matched.end);
    }

    let rest = skip_whitespace(input, cursor, end);
    (rest < end).then_some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupRole;
    use crate::kinds::{Kind, Symbols};

    fn word(dest: &str) -> Argument {
        Argument::named("word", None).unwrap().dest(dest)
    }

    #[test]
    fn test_empty_handler_is_rejected() {
        assert_eq!(Branch::new(" "), Err(DefinitionError::EmptyHandler));
    }

    #[test]
    fn test_leftover_input_is_a_syntax_error() {
        let branch = Branch::new("look").unwrap().with(word("target")).unwrap();
        let error = branch.parse("box  extra", 0, 10).unwrap_err();
        assert_eq!(error.message(), SYNTAX_ERROR);
        assert_eq!(error.position(), 5);
    }

    #[test]
    fn test_optional_failure_keeps_the_cursor() {
        let branch = Branch::new("get")
            .unwrap()
            .with(Argument::named("number", None).unwrap().default(1i64))
            .unwrap()
            .with(word("object"))
            .unwrap();

        let namespace = branch.parse("apple", 0, 5).unwrap();
        assert_eq!(namespace.number("number"), Some(1));
        assert_eq!(namespace.text("object"), Some("apple"));

        let namespace = branch.parse("3 apple", 0, 7).unwrap();
        assert_eq!(namespace.number("number"), Some(3));
    }

    #[test]
    fn test_optional_branch_matches_blank_input() {
        let branch = Branch::new("look")
            .unwrap()
            .optional()
            .with(word("target").default(Value::from("here")))
            .unwrap();

        let namespace = branch.parse("   ", 0, 3).unwrap();
        assert_eq!(namespace.text("target"), Some("here"));
        assert_eq!(namespace.handler(), Some("look"));
    }

    #[test]
    fn test_format_skips_silent_kinds() {
        let branch = Branch::new("set")
            .unwrap()
            .with(word("key"))
            .unwrap()
            .with(Argument::named("symbols", Some("=")).unwrap())
            .unwrap()
            .with(Argument::named("text", None).unwrap().dest("value"))
            .unwrap();
        assert_eq!(branch.format(), "<key> = <value>");
    }

    fn alias_branch() -> Branch {
        Branch::new("alias")
            .unwrap()
            .with(word("name"))
            .unwrap()
            .with(Argument::named("symbols", Some("=")).unwrap())
            .unwrap()
            .with(Argument::named("text", None).unwrap().dest("command"))
            .unwrap()
    }

    #[test]
    fn test_symbols_split_words_without_spaces() {
        let branch = alias_branch();

        let namespace = branch.parse("n=go north", 0, 10).unwrap();
        assert_eq!(namespace.text("name"), Some("n"));
        assert_eq!(namespace.text("command"), Some("go north"));

        let namespace = branch.parse("n = go north", 0, 12).unwrap();
        assert_eq!(namespace.text("name"), Some("n"));
        assert_eq!(namespace.text("command"), Some("go north"));
    }

    #[test]
    fn test_text_stops_at_later_symbols() {
        let branch = Branch::new("set")
            .unwrap()
            .with(Argument::named("text", None).unwrap().dest("key"))
            .unwrap()
            .with(Argument::named("symbols", Some("->")).unwrap())
            .unwrap()
            .with(word("target"))
            .unwrap();

        let namespace = branch.parse("old lamp -> box", 0, 15).unwrap();
        assert_eq!(namespace.text("key"), Some("old lamp"));
        assert_eq!(namespace.text("target"), Some("box"));
    }

    #[test]
    fn test_unmatched_input_between_arguments() {
        let branch = alias_branch();
        let error = branch.parse("n x = go", 0, 8).unwrap_err();
        assert_eq!(error.message(), SYNTAX_ERROR);
        assert_eq!(error.position(), 2);
    }

    #[test]
    fn test_symbols_dests_reach_the_namespace() {
        let arrow = Symbols::new("+=").unwrap().with_dest("append", true);
        let branch = Branch::new("set")
            .unwrap()
            .with(word("key"))
            .unwrap()
            .with(Argument::new(Kind::Symbols(arrow)))
            .unwrap()
            .with(word("value"))
            .unwrap();

        let namespace = branch.parse("hp+=5", 0, 5).unwrap();
        assert_eq!(namespace.get("append"), Some(&Value::Bool(true)));
        assert_eq!(namespace.text("value"), Some("5"));
    }

    #[test]
    fn test_one_of_group() {
        let direction = Group::new(GroupRole::OneOf)
            .alternative(vec![Argument::named("keyword", Some("up")).unwrap()])
            .unwrap()
            .alternative(vec![word("exit")])
            .unwrap();
        let branch = Branch::new("go").unwrap().with_group(direction).unwrap();

        let namespace = branch.parse("up", 0, 2).unwrap();
        assert_eq!(namespace.text("keyword"), Some("up"));
        assert!(!namespace.contains("exit"));

        let namespace = branch.parse("north", 0, 5).unwrap();
        assert_eq!(namespace.text("exit"), Some("north"));

        let error = branch.parse("north east", 0, 10).unwrap_err();
        assert_eq!(error.message(), SYNTAX_ERROR);
        assert_eq!(error.position(), 6);
    }

    #[test]
    fn test_any_of_group_accepts_every_order() {
        let manner = Group::new(GroupRole::AnyOf)
            .alternative(vec![Argument::named("keyword", Some("quietly")).unwrap().dest("quiet")])
            .unwrap()
            .alternative(vec![Argument::named("keyword", Some("slowly")).unwrap().dest("slow")])
            .unwrap();
        let branch = Branch::new("walk").unwrap().with_group(manner).unwrap();
        assert_eq!(branch.format(), "(quietly) + (slowly)");

        assert!(branch.parse("", 0, 0).unwrap().is_empty());

        let namespace = branch.parse("slowly", 0, 6).unwrap();
        assert_eq!(namespace.text("slow"), Some("slowly"));
        assert!(!namespace.contains("quiet"));

        let namespace = branch.parse("slowly quietly", 0, 14).unwrap();
        assert_eq!(namespace.len(), 2);
        assert!(branch.parse("quietly slowly", 0, 14).is_ok());

        assert!(branch.parse("quietly quietly", 0, 15).is_err());
    }

    #[test]
    fn test_empty_group_is_rejected() {
        let error = Branch::new("go")
            .unwrap()
            .with_group(Group::new(GroupRole::OneOf))
            .unwrap_err();
        assert_eq!(error, DefinitionError::EmptyGroup);
    }

    #[test]
    fn test_out_of_range_span_is_clamped() {
        let branch = Branch::new("look").unwrap().with(word("target")).unwrap();

        let namespace = branch.parse("box", 0, 99).unwrap();
        assert_eq!(namespace.text("target"), Some("box"));

        let error = branch.parse("box", 3, 1).unwrap_err();
        assert_eq!(error.message(), "You have to specify a word.");
        assert_eq!(error.position(), 1);

        // byte 1 falls inside 'é'
        let namespace = branch.parse("épée", 1, 6).unwrap();
        assert_eq!(namespace.text("target"), Some("épée"));
    }
}
