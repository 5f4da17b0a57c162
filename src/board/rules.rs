use crate::{
    board::Board,
    piece::{PieceState, Rank},
    position::Position,
    side::Side,
};

impl Board {
    /// Pieces of `by` whose candidates include `target`, in board order.
    pub fn attackers(&self, target: Position, by: Side) -> impl Iterator<Item = &PieceState> {
        self.pieces_of(by)
            .filter(move |piece| self.candidates(piece.position()).contains(&target))
    }
    /// Whether `side`'s king is attacked by any opposing piece.
    ///
    /// Candidates are recomputed here, so this holds even while the cached
    /// lists are stale.
    pub fn is_checked(&self, side: Side) -> bool {
        self.king_position(side)
            .is_some_and(|king| self.attackers(king, !side).next().is_some())
    }
    /// Tries moving the piece on `origin` to `destination` and reports whether
    /// its own king would be safe afterwards. The board is restored exactly,
    /// cached candidates included.
    pub fn simulate_move(&mut self, origin: Position, destination: Position) -> bool {
        let Some(mut piece) = self.cell_mut(origin).take() else {
            return false;
        };
        let side = piece.side();
        let king = self.kings[side.index()];
        if piece.rank() == Rank::King {
            self.kings[side.index()] = Some(destination);
        }
        piece.set_position(destination);
        let captured = self.cell_mut(destination).replace(piece);

        let checked = self.is_checked(side);

        let moved = std::mem::replace(self.cell_mut(destination), captured);
        if let Some(mut piece) = moved {
            piece.set_position(origin);
            *self.cell_mut(origin) = Some(piece);
        }
        self.kings[side.index()] = king;
        !checked
    }
    /// Candidates of the piece on `position` that keep its king safe.
    pub fn legal_moves(&mut self, position: Position) -> Vec<Position> {
        self.candidates(position)
            .into_iter()
            .filter(|destination| self.simulate_move(position, *destination))
            .collect()
    }
    pub fn has_legal_move(&mut self, side: Side) -> bool {
        let origins: Vec<_> = self.pieces_of(side).map(PieceState::position).collect();
        origins
            .into_iter()
            .any(|origin| !self.legal_moves(origin).is_empty())
    }
    /// Whether `side` is checked with no way out. An unchecked side is never
    /// mated, even with no move available.
    ///
    /// Looks for a king escape first, then a capture of the first attacker,
    /// then a block on the attacker's ray. Every response is verified by
    /// simulation, so a double check only ever yields to a king move.
    pub fn is_checkmate(&mut self, side: Side) -> bool {
        let Some(king) = self.king_position(side) else {
            return false;
        };
        if !self.is_checked(side) {
            return false;
        }
        if self
            .candidates(king)
            .into_iter()
            .any(|escape| self.simulate_move(king, escape))
        {
            return false;
        }
        let Some((attacker, attacker_rank)) = self
            .attackers(king, !side)
            .next()
            .map(|piece| (piece.position(), piece.rank()))
        else {
            return false;
        };
        let defenders: Vec<_> = self.pieces_of(side).map(PieceState::position).collect();
        for defender in &defenders {
            if self.candidates(*defender).contains(&attacker)
                && self.simulate_move(*defender, attacker)
            {
                return false;
            }
        }
        if attacker_rank.is_sliding() {
            let path: Vec<_> = attacker
                .line_exclusive_exclusive(king, attacker.direction_to(king))
                .collect();
            for defender in &defenders {
                let candidates = self.candidates(*defender);
                for square in &path {
                    if candidates.contains(square) && self.simulate_move(*defender, *square) {
                        return false;
                    }
                }
            }
        }
        true
    }
}
