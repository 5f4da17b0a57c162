use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    num::ParseIntError,
    ops::{Mul, Neg, Sub},
    str::FromStr,
};

use crate::error::InvalidCoordinate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsePositionError {
    InvalidFile(char),
    InvalidRank(char),
    NotEnoughCharacter(usize),
    Unexpected(char),
    MissingComma,
    ParseIntError(ParseIntError),
    InvalidCoordinate(InvalidCoordinate),
}
impl From<ParseIntError> for ParsePositionError {
    fn from(value: ParseIntError) -> Self {
        ParsePositionError::ParseIntError(value)
    }
}
impl From<InvalidCoordinate> for ParsePositionError {
    fn from(value: InvalidCoordinate) -> Self {
        ParsePositionError::InvalidCoordinate(value)
    }
}
impl Display for ParsePositionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParsePositionError::InvalidFile(file) => write!(
                f,
                "found `{file}`, characters from `a` to `h` were expected instead"
            )?,
            ParsePositionError::InvalidRank(rank) => write!(
                f,
                "found `{rank}`, characters from `1` to `8` were expected instead"
            )?,
            ParsePositionError::NotEnoughCharacter(len) => write!(
                f,
                "provided string have length of {len} characters, 2 were expected"
            )?,
            ParsePositionError::Unexpected(c) => write!(f, "unexpected `{c}`")?,
            ParsePositionError::MissingComma => {
                write!(f, "expected `(row,col)` with a comma between the numbers")?;
            }
            ParsePositionError::ParseIntError(err) => write!(f, "{err}")?,
            ParsePositionError::InvalidCoordinate(err) => write!(f, "{err}")?,
        }
        Ok(())
    }
}
impl Error for ParsePositionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParsePositionError::ParseIntError(err) => Some(err),
            ParsePositionError::InvalidCoordinate(err) => Some(err),
            _ => None,
        }
    }
}

/// A square on the board. Row 0 is BLACK's back row, row 7 is WHITE's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    row: u8,
    col: u8,
}
fn check(value: i32) -> Option<u8> {
    u8::try_from(value).ok().filter(|value| *value < 8)
}
impl Position {
    pub fn new(row: i32, col: i32) -> Result<Self, InvalidCoordinate> {
        match (check(row), check(col)) {
            (Some(row), Some(col)) => Ok(Position { row, col }),
            _ => Err(InvalidCoordinate { row, col }),
        }
    }
    pub fn new_checked(row: u8, col: u8) -> Option<Self> {
        if row >= 8 || col >= 8 {
            None
        } else {
            Some(Position { row, col })
        }
    }
    pub fn row(self) -> u8 {
        self.row
    }
    pub fn col(self) -> u8 {
        self.col
    }
    pub fn set_row(&mut self, row: i32) -> Result<(), InvalidCoordinate> {
        self.row = check(row).ok_or(InvalidCoordinate {
            row,
            col: self.col.into(),
        })?;
        Ok(())
    }
    pub fn set_col(&mut self, col: i32) -> Result<(), InvalidCoordinate> {
        self.col = check(col).ok_or(InvalidCoordinate {
            row: self.row.into(),
            col,
        })?;
        Ok(())
    }
    /// All 64 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..8).flat_map(|row| (0..8).map(move |col| Position { row, col }))
    }
    pub fn move_by(self, movement: Vector) -> Option<Self> {
        Self::new_checked(
            self.row.checked_add_signed(movement.row)?,
            self.col.checked_add_signed(movement.col)?,
        )
    }
    pub fn line_exclusive(self, direction: Vector) -> impl Iterator<Item = Self> {
        debug_assert_ne!(direction, Vector::ZERO);
        (1..).map_while(move |distance| self.move_by(direction * distance))
    }
    /// Squares strictly between `self` and `end` walking by `direction`.
    pub fn line_exclusive_exclusive(self, end: Self, direction: Vector) -> impl Iterator<Item = Self> {
        self.line_exclusive(direction)
            .take_while(move |position| *position != end)
    }
    /// Unit step from `self` towards `other`, each component being -1, 0 or 1.
    pub fn direction_to(self, other: Self) -> Vector {
        (other - self).as_unit()
    }
    pub fn from_chars(file: char, rank: char) -> Result<Self, ParsePositionError> {
        let col = match file {
            'a'..='h' => file as u8 - b'a',
            _ => return Err(ParsePositionError::InvalidFile(file)),
        };
        let row = match rank {
            '1'..='8' => 7 - (rank as u8 - b'1'),
            _ => return Err(ParsePositionError::InvalidRank(rank)),
        };
        Ok(Position { row, col })
    }
    pub fn algebraic(self) -> String {
        let file = (self.col + b'a') as char;
        let rank = 8 - self.row;
        format!("{file}{rank}")
    }
    /// Whether this square is a light square, used only for drawing.
    pub fn is_light(self) -> bool {
        (self.row + self.col) % 2 == 0
    }
}
impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)?;
        Ok(())
    }
}
impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(inner) = s.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
            let (row, col) = inner.split_once(',').ok_or(ParsePositionError::MissingComma)?;
            return Ok(Position::new(row.trim().parse()?, col.trim().parse()?)?);
        }
        let mut chars = s.chars();
        let Some(file) = chars.next() else {
            return Err(ParsePositionError::NotEnoughCharacter(0));
        };
        let Some(rank) = chars.next() else {
            return Err(ParsePositionError::NotEnoughCharacter(1));
        };
        if let Some(c) = chars.next() {
            return Err(ParsePositionError::Unexpected(c));
        }
        Position::from_chars(file, rank)
    }
}
impl Sub<Self> for Position {
    type Output = Vector;

    fn sub(self, rhs: Self) -> Self::Output {
        Vector {
            row: self.row.cast_signed() - rhs.row.cast_signed(),
            col: self.col.cast_signed() - rhs.col.cast_signed(),
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vector {
    pub row: i8,
    pub col: i8,
}
impl Vector {
    pub const ZERO: Self = Vector { row: 0, col: 0 };

    // north, east, south, west
    pub const ROOK_DIRECTIONS: [Self; 4] = [
        Vector { row: -1, col: 0 },
        Vector { row: 0, col: 1 },
        Vector { row: 1, col: 0 },
        Vector { row: 0, col: -1 },
    ];
    // north-west, north-east, south-east, south-west
    pub const BISHOP_DIRECTIONS: [Self; 4] = [
        Vector { row: -1, col: -1 },
        Vector { row: -1, col: 1 },
        Vector { row: 1, col: 1 },
        Vector { row: 1, col: -1 },
    ];
    pub const QUEEN_DIRECTIONS: [Self; 8] = [
        Vector { row: -1, col: -1 },
        Vector { row: -1, col: 1 },
        Vector { row: 1, col: 1 },
        Vector { row: 1, col: -1 },
        Vector { row: -1, col: 0 },
        Vector { row: 0, col: 1 },
        Vector { row: 1, col: 0 },
        Vector { row: 0, col: -1 },
    ];
    pub const KNIGHT_MOVES: [Self; 8] = [
        Vector { row: -1, col: -2 },
        Vector { row: -2, col: -1 },
        Vector { row: -2, col: 1 },
        Vector { row: -1, col: 2 },
        Vector { row: 1, col: 2 },
        Vector { row: 2, col: 1 },
        Vector { row: 2, col: -1 },
        Vector { row: 1, col: -2 },
    ];
    pub const KING_MOVES: [Self; 8] = [
        Vector { row: -1, col: -1 },
        Vector { row: -1, col: 0 },
        Vector { row: -1, col: 1 },
        Vector { row: 0, col: 1 },
        Vector { row: 1, col: 1 },
        Vector { row: 1, col: 0 },
        Vector { row: 1, col: -1 },
        Vector { row: 0, col: -1 },
    ];

    pub fn as_unit(self) -> Self {
        Vector {
            row: self.row.signum(),
            col: self.col.signum(),
        }
    }
}
impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Self::Output {
        Vector {
            row: -self.row,
            col: -self.col,
        }
    }
}
impl Mul<i8> for Vector {
    type Output = Vector;

    fn mul(self, rhs: i8) -> Self::Output {
        Vector {
            row: self.row * rhs,
            col: self.col * rhs,
        }
    }
}
#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use crate::{
        error::InvalidCoordinate,
        position::{Position, Vector},
    };

    #[test]
    fn every_square_on_the_board_is_valid() {
        for row in 0..8 {
            for col in 0..8 {
                let position = Position::new(row, col).unwrap();
                assert_eq!(i32::from(position.row()), row);
                assert_eq!(i32::from(position.col()), col);
            }
        }
        assert_eq!(Position::all().count(), 64);
    }
    #[test]
    fn setters_revalidate() {
        let mut position = Position::new(3, 3).unwrap();
        assert_eq!(
            position.set_row(8),
            Err(InvalidCoordinate { row: 8, col: 3 })
        );
        assert_eq!(position, Position::new(3, 3).unwrap());
        position.set_col(0).unwrap();
        assert_eq!(position, Position::new(3, 0).unwrap());
    }
    #[test]
    fn algebraic_and_log_forms() {
        let e2: Position = "e2".parse().unwrap();
        assert_eq!(e2, Position::new(6, 4).unwrap());
        assert_eq!(e2.algebraic(), "e2");
        assert_eq!(e2.to_string(), "(6,4)");
        assert_eq!("(6,4)".parse(), Ok(e2));
        assert_eq!("(6, 4)".parse(), Ok(e2));
        assert!("(6,9)".parse::<Position>().is_err());
        assert!("i1".parse::<Position>().is_err());
    }
    #[test]
    fn adjacent_exclusive_exclusive_line_is_empty() {
        let e4: Position = "e4".parse().unwrap();
        let e5: Position = "e5".parse().unwrap();
        assert_eq!(
            e4.line_exclusive_exclusive(e5, e4.direction_to(e5)).next(),
            None
        );
    }
    #[test]
    fn diagonal_line_between() {
        let a1: Position = "a1".parse().unwrap();
        let d4: Position = "d4".parse().unwrap();
        let between: Vec<_> = a1
            .line_exclusive_exclusive(d4, a1.direction_to(d4))
            .map(Position::algebraic)
            .collect();
        assert_eq!(between, ["b2", "c3"]);
        assert_eq!(a1.direction_to(d4), Vector { row: -1, col: 1 });
    }

    proptest! {
        #[test]
        fn out_of_range_is_rejected(row in any::<i32>(), col in any::<i32>()) {
            let valid = (0..8).contains(&row) && (0..8).contains(&col);
            match Position::new(row, col) {
                Ok(_) => prop_assert!(valid),
                Err(err) => {
                    prop_assert!(!valid);
                    prop_assert_eq!(err, InvalidCoordinate { row, col });
                }
            }
        }
    }
}
