use crate::{
    board::Board,
    piece::{PieceState, Rank},
    position::{Position, Vector},
    side::Side,
};

impl Board {
    fn occupant_side(&self, position: Position) -> Option<Side> {
        self[position].as_ref().map(PieceState::side)
    }
    fn step_candidates<'a>(
        &'a self,
        piece: &'a PieceState,
        moves: &'a [Vector],
    ) -> impl Iterator<Item = Position> + 'a {
        moves
            .iter()
            .filter_map(move |movement| piece.position().move_by(*movement))
            .filter(move |destination| self.occupant_side(*destination) != Some(piece.side()))
    }
    fn directional_candidates(
        &self,
        piece: &PieceState,
        direction: Vector,
    ) -> impl Iterator<Item = Position> {
        let side = piece.side();
        let mut resume = true;
        piece
            .position()
            .line_exclusive(direction)
            .map_while(move |destination| {
                if !resume {
                    return None;
                }
                match self.occupant_side(destination) {
                    Some(occupant) => {
                        resume = false;
                        (occupant != side).then_some(destination)
                    }
                    None => Some(destination),
                }
            })
    }
    fn all_directional_candidates<'a>(
        &'a self,
        piece: &'a PieceState,
        directions: &'a [Vector],
    ) -> impl Iterator<Item = Position> + 'a {
        directions
            .iter()
            .flat_map(move |direction| self.directional_candidates(piece, *direction))
    }
    fn pawn_candidates(&self, piece: &PieceState) -> impl Iterator<Item = Position> {
        let side = piece.side();
        let forward_jumps = if piece.position().row() == side.pawn_home_row() {
            2
        } else {
            1
        };
        piece
            .position()
            .line_exclusive(Vector {
                row: side.forward(),
                col: 0,
            })
            .take(forward_jumps)
            .take_while(move |destination| self[*destination].is_none())
            .chain(
                // no en passant: a diagonal needs an actual enemy on it
                [1, -1]
                    .into_iter()
                    .filter_map(move |col| {
                        piece.position().move_by(Vector {
                            row: side.forward(),
                            col,
                        })
                    })
                    .filter(move |destination| self.occupant_side(*destination) == Some(!side)),
            )
    }
    /// Pseudo-legal destinations of the piece on `position`, computed from the
    /// current board. Empty for an empty square.
    pub fn candidates(&self, position: Position) -> Vec<Position> {
        let Some(piece) = self.piece_at(position) else {
            return Vec::new();
        };
        match piece.rank() {
            Rank::Pawn => self.pawn_candidates(piece).collect(),
            Rank::Rook => self
                .all_directional_candidates(piece, &Vector::ROOK_DIRECTIONS)
                .collect(),
            Rank::Bishop => self
                .all_directional_candidates(piece, &Vector::BISHOP_DIRECTIONS)
                .collect(),
            Rank::Queen => self
                .all_directional_candidates(piece, &Vector::QUEEN_DIRECTIONS)
                .collect(),
            Rank::Knight => self.step_candidates(piece, &Vector::KNIGHT_MOVES).collect(),
            Rank::King => self.step_candidates(piece, &Vector::KING_MOVES).collect(),
        }
    }
    /// Refreshes the cached candidate list of the piece on `position`.
    pub fn generate_candidates(&mut self, position: Position) {
        let candidates = self.candidates(position);
        if let Some(piece) = self.cell_mut(position) {
            piece.set_candidates(candidates);
        }
    }
    /// Refreshes every cached candidate list, row by row.
    pub fn regenerate_all(&mut self) {
        for position in Position::all() {
            if self[position].is_some() {
                self.generate_candidates(position);
            }
        }
    }
}
#[cfg(test)]
mod test {
    use crate::{
        board::Board,
        piece::{PieceState, Rank},
        position::Position,
        side::Side,
    };

    fn at(square: &str) -> Position {
        square.parse().unwrap()
    }
    fn squares(positions: &[Position]) -> Vec<String> {
        let mut squares: Vec<_> = positions.iter().map(|position| position.algebraic()).collect();
        squares.sort();
        squares
    }

    #[test]
    fn lone_rook_in_the_corner() {
        let mut board = Board::new();
        let corner = Position::new(0, 0).unwrap();
        board.set_piece(PieceState::new(Side::Black, Rank::Rook, corner));
        assert_eq!(board.candidates(corner).len(), 14);

        board.set_piece(PieceState::new(Side::Black, Rank::Pawn, Position::new(0, 3).unwrap()));
        assert_eq!(board.candidates(corner).len(), 9);

        board.set_piece(PieceState::new(Side::White, Rank::Pawn, Position::new(4, 0).unwrap()));
        assert_eq!(board.candidates(corner).len(), 6);
    }
    #[test]
    fn opening_candidates() {
        let board = Board::starting_position();
        assert_eq!(squares(board.piece_at(at("e2")).unwrap().candidates()), ["e3", "e4"]);
        assert_eq!(squares(board.piece_at(at("g8")).unwrap().candidates()), ["f6", "h6"]);
        assert!(board.piece_at(at("a1")).unwrap().candidates().is_empty());
        assert!(board.piece_at(at("d1")).unwrap().candidates().is_empty());
        assert!(board.piece_at(at("e8")).unwrap().candidates().is_empty());
    }
    #[test]
    fn pawn_double_push_needs_both_squares_empty() {
        let mut board = Board::starting_position();
        board.set_piece(PieceState::new(Side::Black, Rank::Knight, at("e4")));
        assert_eq!(squares(&board.candidates(at("e2"))), ["e3"]);
        board.set_piece(PieceState::new(Side::Black, Rank::Knight, at("d3")));
        assert!(board.candidates(at("d2")).is_empty());
        assert_eq!(squares(&board.candidates(at("c2"))), ["c3", "c4", "d3"]);
    }
    #[test]
    fn pawn_away_from_home_moves_one() {
        let mut board = Board::new();
        board.set_piece(PieceState::new(Side::Black, Rank::Pawn, at("c5")));
        assert_eq!(squares(&board.candidates(at("c5"))), ["c4"]);
    }
    #[test]
    fn pawn_never_captures_empty_or_own() {
        let mut board = Board::new();
        board.set_piece(PieceState::new(Side::White, Rank::Pawn, at("d4")));
        board.set_piece(PieceState::new(Side::White, Rank::Pawn, at("e5")));
        board.set_piece(PieceState::new(Side::Black, Rank::Pawn, at("c5")));
        assert_eq!(squares(&board.candidates(at("d4"))), ["c5", "d5"]);
    }
    #[test]
    fn knight_in_the_corner() {
        let mut board = Board::new();
        board.set_piece(PieceState::new(Side::White, Rank::Knight, at("h1")));
        board.set_piece(PieceState::new(Side::White, Rank::Pawn, at("g3")));
        board.set_piece(PieceState::new(Side::Black, Rank::Pawn, at("f2")));
        assert_eq!(squares(&board.candidates(at("h1"))), ["f2"]);
    }
    #[test]
    fn queen_combines_rook_and_bishop() {
        let mut board = Board::new();
        board.set_piece(PieceState::new(Side::White, Rank::Queen, at("d4")));
        assert_eq!(board.candidates(at("d4")).len(), 27);
        board.set_piece(PieceState::new(Side::White, Rank::Bishop, at("d4")));
        assert_eq!(board.candidates(at("d4")).len(), 13);
    }
    #[test]
    fn king_steps_around() {
        let mut board = Board::new();
        board.set_piece(PieceState::new(Side::Black, Rank::King, at("a8")));
        board.set_piece(PieceState::new(Side::White, Rank::Rook, at("b8")));
        board.set_piece(PieceState::new(Side::Black, Rank::Rook, at("a7")));
        assert_eq!(squares(&board.candidates(at("a8"))), ["b7", "b8"]);
    }
    #[test]
    fn regenerate_all_fills_every_cache() {
        let mut board = Board::starting_position();
        board.set_selected(Some(at("e2")));
        board.move_piece(at("e4"));
        assert!(board.piece_at(at("d1")).unwrap().candidates().is_empty());
        board.regenerate_all();
        assert_eq!(
            squares(board.piece_at(at("d1")).unwrap().candidates()),
            ["e2", "f3", "g4", "h5"]
        );
        for piece in board.pieces() {
            assert_eq!(piece.candidates(), board.candidates(piece.position()));
        }
    }
}
