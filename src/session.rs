use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    io,
};

use log::info;

use crate::{
    game::{Game, Players, PromotionChooser, ReplayError, Status, Transition},
    position::Position,
    record::{LogEntry, ParseLogEntryError},
    store::GameStore,
};

#[derive(Debug)]
pub enum SessionError {
    Io(io::Error),
    Log {
        line: usize,
        error: ParseLogEntryError,
    },
    Replay(ReplayError),
}
impl From<io::Error> for SessionError {
    fn from(value: io::Error) -> Self {
        SessionError::Io(value)
    }
}
impl From<ReplayError> for SessionError {
    fn from(value: ReplayError) -> Self {
        SessionError::Replay(value)
    }
}
impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Io(err) => write!(f, "storage error: {err}")?,
            SessionError::Log { line, error } => write!(f, "saved log line {line}: {error}")?,
            SessionError::Replay(err) => write!(f, "saved log cannot be replayed: {err}")?,
        }
        Ok(())
    }
}
impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SessionError::Io(err) => Some(err),
            SessionError::Log { error, .. } => Some(error),
            SessionError::Replay(err) => Some(err),
        }
    }
}
/// Runs a [`Game`] against a [`GameStore`]: loads unfinished games, saves
/// on request and files away finished ones.
#[derive(Debug)]
pub struct Session<S> {
    store: S,
    game: Game,
}
fn load<S: GameStore>(store: &S, players: Players) -> Result<Game, SessionError> {
    let Some(lines) = store.load_unfinished(&players)? else {
        info!("new game for {} vs {}", players.white, players.black);
        return Ok(Game::new(players));
    };
    let entries = lines
        .iter()
        .enumerate()
        .map(|(line, text)| {
            text.parse::<LogEntry>()
                .map_err(|error| SessionError::Log { line, error })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Game::replay(players, entries)?)
}
impl<S: GameStore> Session<S> {
    /// Resumes the pair's unfinished game, or starts a fresh one.
    pub fn start(store: S, players: Players) -> Result<Self, SessionError> {
        let game = load(&store, players)?;
        Ok(Session { store, game })
    }
    /// Leaves the current game as it is, without saving, and switches to
    /// another pair.
    pub fn switch(&mut self, players: Players) -> Result<(), SessionError> {
        self.game = load(&self.store, players)?;
        Ok(())
    }
    pub fn game(&self) -> &Game {
        &self.game
    }
    pub fn store(&self) -> &S {
        &self.store
    }
    pub fn highlights(&mut self) -> Vec<Position> {
        self.game.highlights()
    }
    /// Forwards the interaction, and files the log away as finished on
    /// checkmate.
    pub fn handle(
        &mut self,
        position: Position,
        chooser: impl PromotionChooser,
    ) -> Result<Transition, SessionError> {
        let transition = self.game.handle_interaction(position, chooser);
        if let Transition::Moved {
            status: Status::Checkmate { .. },
            ..
        } = transition
        {
            let lines = self.lines();
            let players = self.game.players();
            self.store.save_finished(players, &lines)?;
            self.store.discard_unfinished(players)?;
        }
        Ok(transition)
    }
    pub fn save(&mut self) -> Result<(), SessionError> {
        let lines = self.lines();
        self.store.save_unfinished(self.game.players(), &lines)?;
        Ok(())
    }
    pub fn restart(&mut self) {
        self.game.restart();
    }
    fn lines(&self) -> Vec<String> {
        self.game.log().iter().map(ToString::to_string).collect()
    }
}
