use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    ops::Not,
    str::FromStr,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParseSideError;
impl Display for ParseSideError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "provided string was not `WHITE` or `BLACK`")?;
        Ok(())
    }
}
impl Error for ParseSideError {}

/// Allegiance of a piece. Has nothing to do with how it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    Black = 0,
    White = 1,
}
impl Side {
    pub const BOTH: [Self; 2] = [Side::Black, Side::White];

    pub fn index(self) -> usize {
        u8::from(self) as usize
    }
    /// Row step a pawn of this side advances by.
    pub fn forward(self) -> i8 {
        match self {
            Side::White => -1,
            Side::Black => 1,
        }
    }
    pub fn pawn_home_row(self) -> u8 {
        match self {
            Side::White => 6,
            Side::Black => 1,
        }
    }
    pub fn back_row(self) -> u8 {
        match self {
            Side::White => 7,
            Side::Black => 0,
        }
    }
    /// The row this side's pawns promote on, the opponent's back row.
    pub fn promotion_row(self) -> u8 {
        (!self).back_row()
    }
}
impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "WHITE")?,
            Side::Black => write!(f, "BLACK")?,
        }
        Ok(())
    }
}
impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("white") {
            Ok(Side::White)
        } else if s.eq_ignore_ascii_case("black") {
            Ok(Side::Black)
        } else {
            Err(ParseSideError)
        }
    }
}
impl From<Side> for u8 {
    fn from(value: Side) -> Self {
        match value {
            Side::White => 1,
            Side::Black => 0,
        }
    }
}
impl Not for Side {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}
