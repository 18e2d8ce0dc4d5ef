//! Typed commands and parsing of textual command streams.
//!
//! A command line is an operation token followed by a key, separated by
//! whitespace or a colon: `INC 10`, `bus:-4`, `remove 7`.

use alloc::boxed::Box;
use alloc::string::ToString;
use core::fmt;
use core::fmt::Display;
use core::str::FromStr;

use crate::error::Error;
use crate::error::Result;

/// A table operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Add a key (`INC`).
    Insert,
    /// Search for a key (`BUS`).
    Lookup,
    /// Remove a key (`REM`).
    Remove,
}

impl FromStr for Op {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let op = if s.eq_ignore_ascii_case("INC") || s.eq_ignore_ascii_case("insert") {
            Op::Insert
        } else if s.eq_ignore_ascii_case("BUS") || s.eq_ignore_ascii_case("lookup") {
            Op::Lookup
        } else if s.eq_ignore_ascii_case("REM") || s.eq_ignore_ascii_case("remove") {
            Op::Remove
        } else {
            return Err(Error::UnknownOp(s.to_string()));
        };
        Ok(op)
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Op::Insert => "INC",
            Op::Lookup => "BUS",
            Op::Remove => "REM",
        })
    }
}

/// One `(operation, key)` pair fed to
/// [`HashTable::apply`](crate::HashTable::apply).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Command {
    /// What to do.
    pub op: Op,
    /// Key to do it with.
    pub key: i64,
}

impl Command {
    /// Shorthand for an insert command.
    pub fn insert(key: i64) -> Self {
        Self {
            op: Op::Insert,
            key,
        }
    }

    /// Shorthand for a lookup command.
    pub fn lookup(key: i64) -> Self {
        Self {
            op: Op::Lookup,
            key,
        }
    }

    /// Shorthand for a remove command.
    pub fn remove(key: i64) -> Self {
        Self {
            op: Op::Remove,
            key,
        }
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut tokens = s
            .split(|c: char| c == ':' || c.is_whitespace())
            .filter(|token| !token.is_empty());

        let op = tokens
            .next()
            .ok_or_else(|| Error::UnknownOp(s.to_string()))?
            .parse::<Op>()?;
        let text = tokens.next().ok_or(Error::MissingKey)?;
        let key = text.parse::<i64>().map_err(|source| Error::InvalidKey {
            text: text.to_string(),
            source,
        })?;
        if let Some(rest) = tokens.next() {
            return Err(Error::TrailingInput(rest.to_string()));
        }

        Ok(Self { op, key })
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.key)
    }
}

/// Parses a command stream, one command per line.
///
/// Blank lines and lines starting with `#` are skipped. Failures carry the
/// 1-based line number.
///
/// # Examples
///
/// ```rust
/// use tab_hash::command::Command;
/// use tab_hash::command::parse_commands;
///
/// let commands = parse_commands("INC 10\n# comment\n\nBUS:10\n")
///     .collect::<Result<Vec<_>, _>>()
///     .unwrap();
/// assert_eq!(commands, vec![Command::insert(10), Command::lookup(10)]);
/// ```
pub fn parse_commands(input: &str) -> impl Iterator<Item = Result<Command>> + '_ {
    input
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| {
            text.parse::<Command>().map_err(|source| Error::Line {
                line,
                source: Box::new(source),
            })
        })
}
