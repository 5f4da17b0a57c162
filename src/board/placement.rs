use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::{
    board::Board,
    piece::{PieceState, Rank},
    position::Position,
    side::Side,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsePlacementError {
    NotEnoughSquaresOnRow(u8),
    ExceedingSquaresOnRow(u8),
    WrongRowCount(usize),
    UnexpectedChar(char),
}
impl Display for ParsePlacementError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParsePlacementError::NotEnoughSquaresOnRow(row) => {
                write!(f, "row {row} describes fewer than 8 squares")?;
            }
            ParsePlacementError::ExceedingSquaresOnRow(row) => {
                write!(f, "row {row} describes more than 8 squares")?;
            }
            ParsePlacementError::WrongRowCount(count) => {
                write!(f, "found {count} rows, 8 were expected")?;
            }
            ParsePlacementError::UnexpectedChar(c) => write!(f, "unexpected `{c}`")?,
        }
        Ok(())
    }
}
impl Error for ParsePlacementError {}

fn letter(piece: &PieceState) -> char {
    let letter = match piece.rank() {
        Rank::Pawn => 'p',
        Rank::Knight => 'n',
        Rank::Bishop => 'b',
        Rank::Rook => 'r',
        Rank::Queen => 'q',
        Rank::King => 'k',
    };
    match piece.side() {
        Side::White => letter.to_ascii_uppercase(),
        Side::Black => letter,
    }
}
impl Board {
    /// The piece-placement field of a FEN record, row 0 first.
    pub fn placement(&self) -> String {
        let mut placement = String::new();
        for row in 0..8 {
            if row != 0 {
                placement.push('/');
            }
            let mut empty = 0;
            for col in 0..8 {
                match Position::new_checked(row, col).and_then(|position| self.piece_at(position)) {
                    Some(piece) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(letter(piece));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
        }
        placement
    }
}
impl FromStr for Board {
    type Err = ParsePlacementError;

    /// Reads a FEN piece-placement field. Candidates come out fresh and
    /// nothing is selected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<_> = s.split('/').collect();
        if rows.len() != 8 {
            return Err(ParsePlacementError::WrongRowCount(rows.len()));
        }
        let mut board = Board::new();
        for (row, text) in (0..).zip(rows) {
            let mut col: u8 = 0;
            for c in text.chars() {
                if let Some(skip) = c.to_digit(10).filter(|skip| (1..=8).contains(skip)) {
                    col += u8::try_from(skip).map_err(|_| ParsePlacementError::UnexpectedChar(c))?;
                } else {
                    let rank =
                        Rank::from_letter(c).map_err(|_| ParsePlacementError::UnexpectedChar(c))?;
                    let side = if c.is_ascii_uppercase() {
                        Side::White
                    } else {
                        Side::Black
                    };
                    let position = Position::new_checked(row, col)
                        .ok_or(ParsePlacementError::ExceedingSquaresOnRow(row))?;
                    board.set_piece(PieceState::new(side, rank, position));
                    col += 1;
                }
                if col > 8 {
                    return Err(ParsePlacementError::ExceedingSquaresOnRow(row));
                }
            }
            if col < 8 {
                return Err(ParsePlacementError::NotEnoughSquaresOnRow(row));
            }
        }
        board.regenerate_all();
        Ok(board)
    }
}
#[cfg(test)]
mod test {
    use crate::board::{Board, ParsePlacementError};

    const OPENING: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    #[test]
    fn opening_placement() {
        assert_eq!(Board::starting_position().placement(), OPENING);
        assert_eq!(OPENING.parse::<Board>().unwrap(), Board::starting_position());
    }
    #[test]
    fn malformed_placements() {
        assert_eq!(
            "8/8/8".parse::<Board>(),
            Err(ParsePlacementError::WrongRowCount(3))
        );
        assert_eq!(
            "7/8/8/8/8/8/8/8".parse::<Board>(),
            Err(ParsePlacementError::NotEnoughSquaresOnRow(0))
        );
        assert_eq!(
            "8/8/ppppppppp/8/8/8/8/8".parse::<Board>(),
            Err(ParsePlacementError::ExceedingSquaresOnRow(2))
        );
        assert_eq!(
            "8/8/8/8/8/8/8/7x".parse::<Board>(),
            Err(ParsePlacementError::UnexpectedChar('x'))
        );
    }
}
