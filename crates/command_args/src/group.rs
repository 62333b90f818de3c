//! Argument groups: alternatives inside a branch.
//!
//! A group holds several alternative argument sequences. With the `|` role
//! exactly one of them must appear; with the `+` role any number of them may
//! appear, each at most once and in any order. A branch containing groups is
//! expanded into every flat argument sequence it allows, and the sequences
//! are tried one after the other.

use crate::argument::Argument;
use crate::error::DefinitionError;
use std::fmt;
use std::str::FromStr;

/// How the alternatives of a [`Group`] combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRole {
    /// `|`: exactly one alternative
    OneOf,
    /// `+`: any subset of the alternatives, in any order
    AnyOf,
}

impl GroupRole {
    pub fn symbol(&self) -> &'static str {
        match self {
            GroupRole::OneOf => "|",
            GroupRole::AnyOf => "+",
        }
    }
}

impl fmt::Display for GroupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for GroupRole {
    type Err = DefinitionError;

    fn from_str(role: &str) -> Result<Self, Self::Err> {
        match role {
            "|" => Ok(GroupRole::OneOf),
            "+" => Ok(GroupRole::AnyOf),
            other => Err(DefinitionError::UnknownGroupRole(other.to_string())),
        }
    }
}

/// A set of alternative argument sequences.
///
/// ```
/// use command_args::{Argument, Branch, Group, GroupRole};
///
/// let target = Group::new(GroupRole::OneOf)
///     .alternative(vec![Argument::named("keyword", Some("all")).unwrap()])
///     .unwrap()
///     .alternative(vec![Argument::named("word", None).unwrap().dest("item")])
///     .unwrap();
///
/// let branch = Branch::new("drop").unwrap().with_group(target).unwrap();
/// assert_eq!(branch.format(), "(all) | (<item>)");
/// assert_eq!(branch.parse("lamp", 0, 4).unwrap().text("item"), Some("lamp"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    role: GroupRole,
    alternatives: Vec<Vec<Argument>>,
}

impl Group {
    pub fn new(role: GroupRole) -> Self {
        Self {
            role,
            alternatives: Vec::new(),
        }
    }

    /// Appends an alternative, builder style.
    pub fn alternative(mut self, arguments: Vec<Argument>) -> Result<Self, DefinitionError> {
        for argument in &arguments {
            argument.validate()?;
        }
        self.alternatives.push(arguments);
        Ok(self)
    }

    pub fn role(&self) -> GroupRole {
        self.role
    }

    pub fn alternatives(&self) -> &[Vec<Argument>] {
        &self.alternatives
    }

    /// Extends every sequence of `prefixes` with each combination this group
    /// allows.
    pub(crate) fn expand<'a>(&'a self, prefixes: Vec<Vec<&'a Argument>>) -> Vec<Vec<&'a Argument>> {
        let choices: Vec<Vec<usize>> = match self.role {
            GroupRole::OneOf => (0..self.alternatives.len()).map(|i| vec![i]).collect(),
            GroupRole::AnyOf => arrangements(self.alternatives.len()),
        };

        let mut expanded = Vec::with_capacity(prefixes.len() * choices.len());
        for prefix in &prefixes {
            for choice in &choices {
                let mut sequence = prefix.clone();
                for &index in choice {
                    sequence.extend(self.alternatives[index].iter());
                }
                expanded.push(sequence);
            }
        }
        expanded
    }

    /// Usage fragment: `(a) | (b)` or `(a) + (b)`, or the lone alternative.
    pub fn format(&self) -> String {
        let parts: Vec<String> = self
            .alternatives
            .iter()
            .map(|arguments| {
                arguments
                    .iter()
                    .map(Argument::format)
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();

        if parts.len() == 1 {
            return parts.into_iter().next().unwrap_or_default();
        }
        let separator = format!(") {} (", self.role);
        format!("({})", parts.join(&separator))
    }
}

/// Every ordered selection of distinct indices below `count`, shortest first.
fn arrangements(count: usize) -> Vec<Vec<usize>> {
    let mut all = vec![Vec::new()];
    let mut frontier: Vec<Vec<usize>> = vec![Vec::new()];
    for _ in 0..count {
        let mut next = Vec::new();
        for prefix in &frontier {
            for index in (0..count).filter(|index| !prefix.contains(index)) {
                let mut arrangement = prefix.clone();
                arrangement.push(index);
                next.push(arrangement);
            }
        }
        all.extend(next.iter().cloned());
        frontier = next;
    }
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword(word: &str) -> Argument {
        Argument::named("keyword", Some(word)).unwrap()
    }

    #[test]
    fn test_role_symbols() {
        assert_eq!("|".parse::<GroupRole>().unwrap(), GroupRole::OneOf);
        assert_eq!("+".parse::<GroupRole>().unwrap(), GroupRole::AnyOf);
        assert_eq!(
            "&".parse::<GroupRole>().unwrap_err(),
            DefinitionError::UnknownGroupRole("&".to_string())
        );
    }

    #[test]
    fn test_arrangements() {
        assert_eq!(arrangements(0), vec![Vec::<usize>::new()]);
        assert_eq!(
            arrangements(2),
            vec![vec![], vec![0], vec![1], vec![0, 1], vec![1, 0]]
        );
        // 1 + 3 + 6 + 6
        assert_eq!(arrangements(3).len(), 16);
    }

    #[test]
    fn test_one_of_expands_to_each_alternative() {
        let group = Group::new(GroupRole::OneOf)
            .alternative(vec![keyword("up")])
            .unwrap()
            .alternative(vec![keyword("down")])
            .unwrap();
        let expanded = group.expand(vec![Vec::new()]);
        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[1][0].format(), "down");
    }

    #[test]
    fn test_format() {
        let group = Group::new(GroupRole::AnyOf)
            .alternative(vec![keyword("quietly")])
            .unwrap()
            .alternative(vec![keyword("slowly")])
            .unwrap();
        assert_eq!(group.format(), "(quietly) + (slowly)");

        let single = Group::new(GroupRole::OneOf)
            .alternative(vec![keyword("up")])
            .unwrap();
        assert_eq!(single.format(), "up");
    }
}
