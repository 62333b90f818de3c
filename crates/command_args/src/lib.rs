//! # Command Args
//!
//! Parser for the argument part of player commands. A command declares one
//! or more [`Branch`]es, each an ordered list of typed [`Argument`]s bound to
//! a handler name. Parsing a line yields either a [`Namespace`] of values
//! tagged with the handler of the matching branch, or an [`ArgumentError`]
//! carrying a message for the player and the position where parsing failed.
//!
//! ## Argument kinds
//!
//! | name      | space     | stores a value | parameter   |
//! |-----------|-----------|----------------|-------------|
//! | `nothing` | strict    | no             |             |
//! | `text`    | greedy    | yes            |             |
//! | `word`    | delimited | yes            |             |
//! | `number`  | delimited | yes            |             |
//! | `keyword` | delimited | yes            | the keyword |
//! | `symbols` | strict    | no             | the symbols |
//!
//! Kinds are looked up by name in a [`KindRegistry`]. An unknown name is a
//! [`DefinitionError`], raised while commands are being declared.
//!
//! Within a branch, strict arguments are located first, then delimited ones,
//! then greedy ones, each bounded by the matches around it. That is what lets
//! `n=go north` split on the `=` although no space surrounds it. A branch can
//! also hold a [`Group`] of alternatives: `|` takes exactly one of them, `+`
//! any of them in any order.
//!
//! ## Example
//!
//! ```
//! use command_args::{Argument, Branch, CommandArgs, Value};
//!
//! let mut args = CommandArgs::new();
//! args.add_branch(
//!     Branch::new("put")
//!         .unwrap()
//!         .with(Argument::named("word", None).unwrap().dest("object"))
//!         .unwrap()
//!         .with(Argument::named("keyword", Some("in")).unwrap())
//!         .unwrap()
//!         .with(Argument::named("word", None).unwrap().dest("container"))
//!         .unwrap(),
//! );
//!
//! let namespace = args.parse("apple IN basket").unwrap();
//! assert_eq!(namespace.handler(), Some("put"));
//! assert_eq!(namespace.get("container"), Some(&Value::from("basket")));
//! ```

pub mod argument;
pub mod branch;
pub mod error;
pub mod group;
pub mod helpers;
pub mod kinds;
pub mod namespace;
pub mod parser;
pub mod value;

pub use argument::Argument;
pub use branch::{Branch, Element, SYNTAX_ERROR};
pub use error::{ArgumentError, DefinitionError};
pub use group::{Group, GroupRole};
pub use kinds::{ArgMatch, ArgSpace, ArgumentKind, Kind, KindConstructor, KindRegistry};
pub use namespace::Namespace;
pub use parser::{CommandArgs, DEFAULT_HANDLER};
pub use value::Value;
