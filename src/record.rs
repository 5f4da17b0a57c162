use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::{
    piece::{ParseRankError, Rank},
    position::{ParsePositionError, Position},
    side::{ParseSideError, Side},
};

/// One line of the move log.
///
/// A promotion line always directly follows the move line that put the pawn
/// on the far row, and does not pass the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogEntry {
    Move {
        side: Side,
        rank: Rank,
        origin: Position,
        destination: Position,
    },
    Promote(Rank),
}
impl LogEntry {
    pub fn is_move(self) -> bool {
        matches!(self, LogEntry::Move { .. })
    }
}
impl Display for LogEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LogEntry::Move {
                side,
                rank,
                origin,
                destination,
            } => write!(f, "{side} {rank} {origin} moves to {destination}")?,
            LogEntry::Promote(rank) => write!(f, "Promote to {rank}")?,
        }
        Ok(())
    }
}
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseLogEntryError {
    Empty,
    UnexpectedToken { expected: &'static str, found: String },
    MissingToken(&'static str),
    Unexpected(String),
    Side(ParseSideError),
    Rank(ParseRankError),
    Position(ParsePositionError),
}
impl From<ParseSideError> for ParseLogEntryError {
    fn from(value: ParseSideError) -> Self {
        ParseLogEntryError::Side(value)
    }
}
impl From<ParseRankError> for ParseLogEntryError {
    fn from(value: ParseRankError) -> Self {
        ParseLogEntryError::Rank(value)
    }
}
impl From<ParsePositionError> for ParseLogEntryError {
    fn from(value: ParsePositionError) -> Self {
        ParseLogEntryError::Position(value)
    }
}
impl Display for ParseLogEntryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseLogEntryError::Empty => write!(f, "empty log line")?,
            ParseLogEntryError::UnexpectedToken { expected, found } => {
                write!(f, "found `{found}`, `{expected}` was expected instead")?;
            }
            ParseLogEntryError::MissingToken(expected) => {
                write!(f, "line ended where `{expected}` was expected")?;
            }
            ParseLogEntryError::Unexpected(token) => write!(f, "unexpected `{token}`")?,
            ParseLogEntryError::Side(err) => write!(f, "{err}")?,
            ParseLogEntryError::Rank(err) => write!(f, "{err}")?,
            ParseLogEntryError::Position(err) => write!(f, "{err}")?,
        }
        Ok(())
    }
}
impl Error for ParseLogEntryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseLogEntryError::Side(err) => Some(err),
            ParseLogEntryError::Rank(err) => Some(err),
            ParseLogEntryError::Position(err) => Some(err),
            _ => None,
        }
    }
}
fn expect<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    expected: &'static str,
) -> Result<(), ParseLogEntryError> {
    match tokens.next() {
        Some(token) if token.eq_ignore_ascii_case(expected) => Ok(()),
        Some(token) => Err(ParseLogEntryError::UnexpectedToken {
            expected,
            found: token.to_owned(),
        }),
        None => Err(ParseLogEntryError::MissingToken(expected)),
    }
}
fn next<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    expected: &'static str,
) -> Result<&'a str, ParseLogEntryError> {
    tokens.next().ok_or(ParseLogEntryError::MissingToken(expected))
}
impl FromStr for LogEntry {
    type Err = ParseLogEntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let first = tokens.next().ok_or(ParseLogEntryError::Empty)?;
        let entry = if first.eq_ignore_ascii_case("Promote") {
            expect(&mut tokens, "to")?;
            LogEntry::Promote(next(&mut tokens, "rank")?.parse()?)
        } else {
            let side = first.parse()?;
            let rank = next(&mut tokens, "rank")?.parse()?;
            let origin = next(&mut tokens, "origin")?.parse()?;
            expect(&mut tokens, "moves")?;
            expect(&mut tokens, "to")?;
            let destination = next(&mut tokens, "destination")?.parse()?;
            LogEntry::Move {
                side,
                rank,
                origin,
                destination,
            }
        };
        if let Some(token) = tokens.next() {
            return Err(ParseLogEntryError::Unexpected(token.to_owned()));
        }
        Ok(entry)
    }
}
