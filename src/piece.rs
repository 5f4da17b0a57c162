use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::{position::Position, side::Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}
impl Rank {
    pub const PROMOTION_CHOICES: [Self; 4] = [Rank::Queen, Rank::Rook, Rank::Bishop, Rank::Knight];
    pub const STARTING_CONFIGURATION: [Self; 8] = [
        Rank::Rook,
        Rank::Knight,
        Rank::Bishop,
        Rank::Queen,
        Rank::King,
        Rank::Bishop,
        Rank::Knight,
        Rank::Rook,
    ];
    pub fn is_promotion_choice(self) -> bool {
        Rank::PROMOTION_CHOICES.contains(&self)
    }
    /// Whether this rank attacks along rays that another piece can block.
    pub fn is_sliding(self) -> bool {
        matches!(self, Rank::Rook | Rank::Bishop | Rank::Queen)
    }
    pub fn from_letter(c: char) -> Result<Self, ParseRankError> {
        let rank = match c {
            'p' | 'P' => Rank::Pawn,
            'n' | 'N' => Rank::Knight,
            'b' | 'B' => Rank::Bishop,
            'r' | 'R' => Rank::Rook,
            'q' | 'Q' => Rank::Queen,
            'k' | 'K' => Rank::King,
            c => return Err(ParseRankError::UnknownLetter(c)),
        };
        Ok(rank)
    }
}
impl Display for Rank {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Pawn => write!(f, "PAWN")?,
            Rank::Rook => write!(f, "ROOK")?,
            Rank::Knight => write!(f, "KNIGHT")?,
            Rank::Bishop => write!(f, "BISHOP")?,
            Rank::Queen => write!(f, "QUEEN")?,
            Rank::King => write!(f, "KING")?,
        }
        Ok(())
    }
}
impl FromStr for Rank {
    type Err = ParseRankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Rank::Pawn,
            Rank::Rook,
            Rank::Knight,
            Rank::Bishop,
            Rank::Queen,
            Rank::King,
        ]
        .into_iter()
        .find(|rank| s.eq_ignore_ascii_case(&rank.to_string()))
        .ok_or_else(|| ParseRankError::UnknownName(s.to_owned()))
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParseRankError {
    UnknownName(String),
    UnknownLetter(char),
}
impl Display for ParseRankError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseRankError::UnknownName(name) => write!(
                f,
                "found `{name}`, expected one of `PAWN`, `ROOK`, `KNIGHT`, `BISHOP`, `QUEEN`, or `KING`"
            )?,
            ParseRankError::UnknownLetter(c) => write!(
                f,
                "found `{c}`, expected one of `p`, `n`, `b`, `r`, `q`, `k`, or uppercase forms of these letters"
            )?,
        }
        Ok(())
    }
}
impl Error for ParseRankError {}

/// A piece placed on the board.
///
/// `candidates` caches the pseudo-legal destinations from the last
/// generation pass and goes stale on any board mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PieceState {
    side: Side,
    rank: Rank,
    position: Position,
    candidates: Vec<Position>,
}
impl PieceState {
    pub fn new(side: Side, rank: Rank, position: Position) -> Self {
        PieceState {
            side,
            rank,
            position,
            candidates: Vec::new(),
        }
    }
    pub fn side(&self) -> Side {
        self.side
    }
    pub fn rank(&self) -> Rank {
        self.rank
    }
    pub fn position(&self) -> Position {
        self.position
    }
    pub fn candidates(&self) -> &[Position] {
        &self.candidates
    }
    pub fn has_candidate(&self, position: Position) -> bool {
        self.candidates.contains(&position)
    }
    /// Legacy piece identity: same side on the same square, rank ignored.
    pub fn is_same_piece(&self, other: &Self) -> bool {
        self.side == other.side && self.position == other.position
    }
    pub(crate) fn set_rank(&mut self, rank: Rank) {
        self.rank = rank;
    }
    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }
    pub(crate) fn set_candidates(&mut self, candidates: Vec<Position>) {
        self.candidates = candidates;
    }
    pub fn figurine(&self) -> char {
        match (self.side, self.rank) {
            (Side::White, Rank::Pawn) => '♙',
            (Side::White, Rank::Knight) => '♘',
            (Side::White, Rank::Bishop) => '♗',
            (Side::White, Rank::Rook) => '♖',
            (Side::White, Rank::Queen) => '♕',
            (Side::White, Rank::King) => '♔',
            (Side::Black, Rank::Pawn) => '♟',
            (Side::Black, Rank::Knight) => '♞',
            (Side::Black, Rank::Bishop) => '♝',
            (Side::Black, Rank::Rook) => '♜',
            (Side::Black, Rank::Queen) => '♛',
            (Side::Black, Rank::King) => '♚',
        }
    }
}
impl Display for PieceState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.side, self.rank, self.position)?;
        Ok(())
    }
}
