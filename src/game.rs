use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use log::{debug, info, warn};

use crate::{
    board::Board,
    piece::{PieceState, Rank},
    position::Position,
    record::LogEntry,
    side::Side,
};

/// Picks the rank a pawn reaching the far row turns into.
pub trait PromotionChooser {
    fn choose(&mut self, side: Side) -> Rank;
}
impl<F> PromotionChooser for F
where
    F: FnMut(Side) -> Rank,
{
    fn choose(&mut self, side: Side) -> Rank {
        self(side)
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Players {
    pub white: String,
    pub black: String,
}
impl Players {
    pub fn new(white: impl Into<String>, black: impl Into<String>) -> Self {
        Players {
            white: white.into(),
            black: black.into(),
        }
    }
    pub fn name(&self, side: Side) -> &str {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Selected(Position),
    GameOver { winner: Side },
}
/// What the side now to move faces after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Continue,
    Check,
    Checkmate { winner: Side },
}
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Ignored,
    Selected(Position),
    Deselected,
    Moved {
        entry: LogEntry,
        captured: Option<PieceState>,
        promotion: Option<Rank>,
        status: Status,
    },
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayError {
    EmptyOrigin { line: usize, origin: Position },
    NoPromotionTarget { line: usize, rank: Rank },
}
impl Display for ReplayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::EmptyOrigin { line, origin } => {
                write!(f, "line {line} moves from the empty square {origin}")?;
            }
            ReplayError::NoPromotionTarget { line, rank } => {
                write!(f, "line {line} promotes to {rank} with no pawn to promote")?;
            }
        }
        Ok(())
    }
}
impl Error for ReplayError {}

/// The turn controller: owns the board and drives it one square
/// interaction at a time.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    active_side: Side,
    log: Vec<LogEntry>,
    players: Players,
    winner: Option<Side>,
}
impl Game {
    pub fn new(players: Players) -> Self {
        Game {
            board: Board::starting_position(),
            active_side: Side::White,
            log: Vec::new(),
            players,
            winner: None,
        }
    }
    /// Starts from an arbitrary position with an empty log.
    pub fn from_position(players: Players, mut board: Board, active_side: Side) -> Self {
        board.set_selected(None);
        board.regenerate_all();
        let mut game = Game {
            board,
            active_side,
            log: Vec::new(),
            players,
            winner: None,
        };
        game.detect_checkmate();
        game
    }
    /// Rebuilds a game from its move log by playing every line from the
    /// opening position.
    ///
    /// Lines are trusted to be legal. A log ending in checkmate yields a
    /// finished game.
    pub fn replay(
        players: Players,
        entries: impl IntoIterator<Item = LogEntry>,
    ) -> Result<Self, ReplayError> {
        let mut game = Game::new(players);
        for (line, entry) in entries.into_iter().enumerate() {
            match entry {
                LogEntry::Move {
                    origin,
                    destination,
                    ..
                } => {
                    game.board.set_selected(Some(origin));
                    if game.board.selected().is_none() {
                        return Err(ReplayError::EmptyOrigin { line, origin });
                    }
                    game.board.move_piece(destination);
                    game.active_side = !game.active_side;
                }
                LogEntry::Promote(rank) => {
                    if game.board.promote(rank).is_none() {
                        return Err(ReplayError::NoPromotionTarget { line, rank });
                    }
                }
            }
            debug!("replayed `{entry}`");
            game.log.push(entry);
        }
        game.board.set_selected(None);
        game.board.regenerate_all();
        game.detect_checkmate();
        info!(
            "replayed {} log lines for {} vs {}",
            game.log.len(),
            game.players.white,
            game.players.black,
        );
        Ok(game)
    }
    fn detect_checkmate(&mut self) {
        if self.board.is_checkmate(self.active_side) {
            self.winner = Some(!self.active_side);
        }
    }
    /// Back to the opening position with an empty log, WHITE to move.
    pub fn restart(&mut self) {
        self.board.reset();
        self.active_side = Side::White;
        self.log.clear();
        self.winner = None;
        info!("restarted {} vs {}", self.players.white, self.players.black);
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn active_side(&self) -> Side {
        self.active_side
    }
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }
    pub fn players(&self) -> &Players {
        &self.players
    }
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }
    pub fn phase(&self) -> Phase {
        match (self.winner, self.board.selected_position()) {
            (Some(winner), _) => Phase::GameOver { winner },
            (None, Some(position)) => Phase::Selected(position),
            (None, None) => Phase::Idle,
        }
    }
    pub fn turn_label(&self) -> String {
        format!(
            "{}: {}'s turn",
            self.players.name(self.active_side),
            self.active_side,
        )
    }
    /// Legal destinations of the selected piece, for highlighting.
    pub fn highlights(&mut self) -> Vec<Position> {
        match self.board.selected_position() {
            Some(position) => self.board.legal_moves(position),
            None => Vec::new(),
        }
    }
    /// Handles a click on `position`.
    ///
    /// A legal destination of the selected piece is played first. Otherwise
    /// clicking one of the active side's pieces selects it, or deselects it
    /// when it is already selected. Anything else is ignored.
    pub fn handle_interaction(
        &mut self,
        position: Position,
        chooser: impl PromotionChooser,
    ) -> Transition {
        if self.winner.is_some() {
            return Transition::Ignored;
        }
        let selected = self.board.selected().cloned();
        if let Some(piece) = &selected
            && piece.has_candidate(position)
            && self.board.simulate_move(piece.position(), position)
        {
            return self.play(piece, position, chooser);
        }
        let Some(clicked) = self.board.piece_at(position) else {
            return Transition::Ignored;
        };
        if clicked.side() != self.active_side {
            return Transition::Ignored;
        }
        if selected.is_some_and(|piece| piece.is_same_piece(clicked)) {
            self.board.set_selected(None);
            Transition::Deselected
        } else {
            self.board.set_selected(Some(position));
            Transition::Selected(position)
        }
    }
    fn play(
        &mut self,
        piece: &PieceState,
        destination: Position,
        mut chooser: impl PromotionChooser,
    ) -> Transition {
        let side = piece.side();
        let entry = LogEntry::Move {
            side,
            rank: piece.rank(),
            origin: piece.position(),
            destination,
        };
        self.log.push(entry);
        let captured = self.board.move_piece(destination);
        let promotion = (piece.rank() == Rank::Pawn && destination.row() == side.promotion_row())
            .then(|| {
                let mut rank = chooser.choose(side);
                if !rank.is_promotion_choice() {
                    warn!("{rank} is not a promotion choice, promoting to {}", Rank::Queen);
                    rank = Rank::Queen;
                }
                self.board.promote(rank);
                self.log.push(LogEntry::Promote(rank));
                rank
            });
        self.board.regenerate_all();
        self.board.set_selected(None);
        self.active_side = !side;

        let status = if self.board.is_checkmate(self.active_side) {
            self.winner = Some(side);
            info!(
                "{side} ({}) checkmates {}",
                self.players.name(side),
                self.players.name(!side),
            );
            Status::Checkmate { winner: side }
        } else if self.board.is_checked(self.active_side) {
            Status::Check
        } else {
            Status::Continue
        };
        Transition::Moved {
            entry,
            captured,
            promotion,
            status,
        }
    }
}
#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng, rngs::SmallRng};

    use crate::{
        board::Board,
        game::{Game, Phase, Players, ReplayError, Status, Transition},
        piece::{PieceState, Rank},
        position::Position,
        record::LogEntry,
        side::Side,
    };

    fn at(square: &str) -> Position {
        square.parse().unwrap()
    }
    fn players() -> Players {
        Players::new("alice", "bob")
    }
    fn queen(_: Side) -> Rank {
        Rank::Queen
    }
    fn click(game: &mut Game, square: &str) -> Transition {
        game.handle_interaction(at(square), queen)
    }
    fn play(game: &mut Game, origin: &str, destination: &str) -> Transition {
        assert_eq!(click(game, origin), Transition::Selected(at(origin)));
        click(game, destination)
    }

    #[test]
    fn fresh_game() {
        let game = Game::new(players());
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.active_side(), Side::White);
        assert_eq!(game.turn_label(), "alice: WHITE's turn");
        assert!(game.log().is_empty());
        assert_eq!(game.board(), &Board::starting_position());
    }
    #[test]
    fn inactive_side_cannot_act() {
        let mut game = Game::new(players());
        let before = game.board().clone();
        assert_eq!(click(&mut game, "e7"), Transition::Ignored);
        assert_eq!(click(&mut game, "e5"), Transition::Ignored);
        assert_eq!(game.board(), &before);
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.active_side(), Side::White);
    }
    #[test]
    fn select_deselect_and_reselect() {
        let mut game = Game::new(players());
        assert_eq!(click(&mut game, "e2"), Transition::Selected(at("e2")));
        assert_eq!(game.phase(), Phase::Selected(at("e2")));
        let mut highlights = game.highlights();
        highlights.sort();
        assert_eq!(highlights, [at("e4"), at("e3")]);

        assert_eq!(click(&mut game, "e2"), Transition::Deselected);
        assert_eq!(game.phase(), Phase::Idle);
        assert!(game.highlights().is_empty());

        click(&mut game, "e2");
        assert_eq!(click(&mut game, "g1"), Transition::Selected(at("g1")));
        assert_eq!(click(&mut game, "g3"), Transition::Ignored);
        assert_eq!(click(&mut game, "d7"), Transition::Ignored);
        assert_eq!(game.phase(), Phase::Selected(at("g1")));
        assert!(game.log().is_empty());
    }
    #[test]
    fn a_move_passes_the_turn_and_is_logged() {
        let mut game = Game::new(players());
        let transition = play(&mut game, "e2", "e4");
        let Transition::Moved {
            entry,
            captured,
            promotion,
            status,
        } = transition
        else {
            panic!("expected a move, got {transition:?}");
        };
        assert_eq!(entry.to_string(), "WHITE PAWN (6,4) moves to (4,4)");
        assert_eq!(captured, None);
        assert_eq!(promotion, None);
        assert_eq!(status, Status::Continue);
        assert_eq!(game.log(), [entry]);
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.active_side(), Side::Black);
        assert_eq!(game.turn_label(), "bob: BLACK's turn");
        assert_eq!(click(&mut game, "d2"), Transition::Ignored);
    }
    #[test]
    fn pinned_piece_stays_selected() {
        let board = "4k3/4r3/8/8/8/8/4N3/4K3".parse().unwrap();
        let mut game = Game::from_position(players(), board, Side::White);
        click(&mut game, "e2");
        assert!(game.highlights().is_empty());
        assert_eq!(click(&mut game, "c3"), Transition::Ignored);
        assert_eq!(game.phase(), Phase::Selected(at("e2")));
    }
    #[test]
    fn check_is_reported_but_not_logged() {
        let board = "4k3/8/8/8/8/8/8/R3K3".parse().unwrap();
        let mut game = Game::from_position(players(), board, Side::White);
        let Transition::Moved { status, .. } = play(&mut game, "a1", "a8") else {
            panic!("expected a move");
        };
        assert_eq!(status, Status::Check);
        assert_eq!(game.log().len(), 1);
        assert_eq!(game.phase(), Phase::Idle);
    }
    #[test]
    fn scholars_mate_ends_the_game() {
        let mut game = Game::new(players());
        let moves = [
            ("e2", "e4"),
            ("e7", "e5"),
            ("f1", "c4"),
            ("b8", "c6"),
            ("d1", "h5"),
            ("g8", "f6"),
        ];
        for (origin, destination) in moves {
            assert!(matches!(
                play(&mut game, origin, destination),
                Transition::Moved {
                    status: Status::Continue,
                    ..
                }
            ));
        }
        let Transition::Moved {
            captured, status, ..
        } = play(&mut game, "h5", "f7")
        else {
            panic!("expected a move");
        };
        assert_eq!(captured.map(|piece| piece.rank()), Some(Rank::Pawn));
        assert_eq!(
            status,
            Status::Checkmate {
                winner: Side::White
            }
        );
        assert_eq!(
            game.phase(),
            Phase::GameOver {
                winner: Side::White
            }
        );
        assert_eq!(click(&mut game, "e8"), Transition::Ignored);
        assert_eq!(game.log().len(), 7);

        game.restart();
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.active_side(), Side::White);
        assert!(game.log().is_empty());
        assert_eq!(game.board(), &Board::starting_position());
    }
    #[test]
    fn promotion_asks_and_logs() {
        let board: Board = "7k/P7/8/8/8/8/8/K7".parse().unwrap();
        let mut game = Game::from_position(players(), board.clone(), Side::White);
        click(&mut game, "a7");
        let transition = game.handle_interaction(at("a8"), |side: Side| {
            assert_eq!(side, Side::White);
            Rank::Knight
        });
        assert!(matches!(
            transition,
            Transition::Moved {
                promotion: Some(Rank::Knight),
                status: Status::Continue,
                ..
            }
        ));
        let lines: Vec<_> = game.log().iter().map(ToString::to_string).collect();
        assert_eq!(lines, ["WHITE PAWN (1,0) moves to (0,0)", "Promote to KNIGHT"]);
        assert_eq!(game.board().piece_at(at("a8")).unwrap().rank(), Rank::Knight);
        assert_eq!(game.active_side(), Side::Black);

        // a king is no promotion choice
        let mut game = Game::from_position(players(), board, Side::White);
        click(&mut game, "a7");
        let transition = game.handle_interaction(at("a8"), |_: Side| Rank::King);
        assert!(matches!(
            transition,
            Transition::Moved {
                promotion: Some(Rank::Queen),
                status: Status::Check,
                ..
            }
        ));
        assert_eq!(game.log()[1], LogEntry::Promote(Rank::Queen));
    }
    #[test]
    fn replaying_a_finished_game() {
        let lines = [
            "WHITE PAWN (6,5) moves to (5,5)",
            "BLACK PAWN (1,4) moves to (3,4)",
            "WHITE PAWN (6,6) moves to (4,6)",
            "BLACK QUEEN (0,3) moves to (4,7)",
        ];
        let entries = lines.map(|line| line.parse::<LogEntry>().unwrap());
        let game = Game::replay(players(), entries).unwrap();
        assert_eq!(game.log(), entries);
        assert_eq!(game.active_side(), Side::White);
        assert_eq!(
            game.phase(),
            Phase::GameOver {
                winner: Side::Black
            }
        );
    }
    #[test]
    fn replay_errors() {
        let entry: LogEntry = "WHITE PAWN (5,4) moves to (4,4)".parse().unwrap();
        assert_eq!(
            Game::replay(players(), [entry]).unwrap_err(),
            ReplayError::EmptyOrigin {
                line: 0,
                origin: at("e3")
            }
        );
        assert_eq!(
            Game::replay(players(), [LogEntry::Promote(Rank::Rook)]).unwrap_err(),
            ReplayError::NoPromotionTarget {
                line: 0,
                rank: Rank::Rook
            }
        );
    }

    fn random_game(seed: u64, plies: usize) -> Game {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut game = Game::new(players());
        for _ in 0..plies {
            if game.winner().is_some() {
                break;
            }
            let origins: Vec<_> = game
                .board()
                .pieces_of(game.active_side())
                .map(PieceState::position)
                .collect();
            let mut moves = Vec::new();
            for origin in origins {
                game.handle_interaction(origin, queen);
                moves.extend(game.highlights().into_iter().map(|destination| (origin, destination)));
                game.handle_interaction(origin, queen);
            }
            if moves.is_empty() {
                break;
            }
            let (origin, destination) = moves[rng.random_range(0..moves.len())];
            let rank = Rank::PROMOTION_CHOICES[rng.random_range(0..4)];
            game.handle_interaction(origin, queen);
            let transition = game.handle_interaction(destination, |_: Side| rank);
            assert!(matches!(transition, Transition::Moved { .. }));
        }
        game
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]
        #[test]
        fn replay_matches_live_play(seed in any::<u64>(), plies in 0..120usize) {
            let live = random_game(seed, plies);
            let lines: Vec<_> = live.log().iter().map(ToString::to_string).collect();
            let entries = lines.iter().map(|line| line.parse::<LogEntry>().unwrap());
            let replayed = Game::replay(players(), entries).unwrap();
            prop_assert_eq!(replayed.board(), live.board());
            prop_assert_eq!(replayed.active_side(), live.active_side());
            prop_assert_eq!(replayed.winner(), live.winner());
            prop_assert_eq!(replayed.log(), live.log());
        }
    }
}
