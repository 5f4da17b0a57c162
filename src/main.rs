#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use std::{
    env,
    error::Error,
    fmt::{self, Display, Formatter},
    io::{self, BufRead, Write, stderr, stdin, stdout},
    num::ParseIntError,
    path::PathBuf,
    process::ExitCode,
    str::FromStr,
};

use log::{LevelFilter, Log, Metadata, Record};
use turnchess::{
    LogEntry, Players, Position, Rank, Side, Status, Transition,
    board_display::BoardDisplay,
    fuzz::fuzz,
    position::ParsePositionError,
    session::Session,
    store::FileStore,
};

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }
    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }
    fn flush(&self) {}
}
static LOGGER: StderrLogger = StderrLogger;

fn init_logger() {
    let level = env::var("TURNCHESS_LOG")
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Warn);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Input {
    Help,
    Flip,
    Restart,
    Save,
    Log,
    Quit,
    New(Players),
    Fuzz(usize),
    Square(Position),
}
impl Display for Input {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Input::Help => write!(f, "help")?,
            Input::Flip => write!(f, "flip")?,
            Input::Restart => write!(f, "restart")?,
            Input::Save => write!(f, "save")?,
            Input::Log => write!(f, "log")?,
            Input::Quit => write!(f, "quit")?,
            Input::New(players) => write!(f, "new {} {}", players.white, players.black)?,
            Input::Fuzz(games) => write!(f, "fuzz {games}")?,
            Input::Square(position) => write!(f, "{}", position.algebraic())?,
        }
        Ok(())
    }
}
impl FromStr for Input {
    type Err = ParseInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "help" => Ok(Input::Help),
            "flip" => Ok(Input::Flip),
            "restart" => Ok(Input::Restart),
            "save" => Ok(Input::Save),
            "log" => Ok(Input::Log),
            "quit" | "exit" => Ok(Input::Quit),
            s => match s.split_once(char::is_whitespace) {
                Some(("new", names)) => {
                    let mut names = names.split_whitespace();
                    match (names.next(), names.next(), names.next()) {
                        (Some(white), Some(black), None) => {
                            Ok(Input::New(Players::new(white, black)))
                        }
                        _ => Err(ParseInputError::Players),
                    }
                }
                Some(("fuzz", games)) => Ok(Input::Fuzz(games.trim().parse()?)),
                _ => Ok(Input::Square(s.parse()?)),
            },
        }
    }
}
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseInputError {
    Players,
    Int(ParseIntError),
    Position(ParsePositionError),
}
impl From<ParseIntError> for ParseInputError {
    fn from(value: ParseIntError) -> Self {
        ParseInputError::Int(value)
    }
}
impl From<ParsePositionError> for ParseInputError {
    fn from(value: ParsePositionError) -> Self {
        ParseInputError::Position(value)
    }
}
impl Display for ParseInputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseInputError::Players => write!(f, "expected `new <white> <black>`")?,
            ParseInputError::Int(err) => write!(f, "{err}")?,
            ParseInputError::Position(err) => write!(f, "{err}")?,
        }
        Ok(())
    }
}
impl Error for ParseInputError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseInputError::Players => None,
            ParseInputError::Int(err) => Some(err),
            ParseInputError::Position(err) => Some(err),
        }
    }
}
/// Asks until a promotion choice is given. End of input picks a queen.
fn prompt_promotion(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    output: &mut impl Write,
    side: Side,
) -> Rank {
    loop {
        if write!(output, "{side} promotes to (q, r, b, n)> ")
            .and_then(|()| output.flush())
            .is_err()
        {
            return Rank::Queen;
        }
        let Some(Ok(text)) = lines.next() else {
            return Rank::Queen;
        };
        let text = text.trim();
        let rank = match text.chars().collect::<Vec<_>>()[..] {
            [letter] => Rank::from_letter(letter).ok(),
            _ => text.parse().ok(),
        };
        if let Some(rank) = rank.filter(|rank| rank.is_promotion_choice()) {
            return rank;
        }
    }
}
#[allow(
    clippy::too_many_lines,
    reason = "further decomposition could potentially hurt readability"
)]
fn repl(data_dir: PathBuf) -> Result<(), Box<dyn Error>> {
    let input = stdin().lock();
    let mut output = stdout().lock();
    let mut error = stderr().lock();

    let mut lines = input.lines();

    let store = FileStore::new(data_dir)?;
    let mut session = Session::start(store, Players::new("player1", "player2"))?;
    let mut highlighted = Vec::new();
    let mut notices = vec!["type `help` for instructions".to_owned()];
    let mut view = Side::White;
    let mut update = true;
    loop {
        if update {
            let game = session.game();
            let mut info = vec![game.turn_label()];
            if let Some(winner) = game.winner() {
                info.push(format!("{winner} wins!"));
            }
            info.append(&mut notices);
            info.extend(game.log().iter().rev().take(4).map(ToString::to_string));
            writeln!(
                output,
                "{}",
                BoardDisplay {
                    board: game.board(),
                    view,
                    highlighted: &highlighted,
                    info: &info.join("\n"),
                },
            )?;
        }
        update = true;
        write!(output, "> ")?;
        output.flush()?;
        let Some(text) = lines.next() else {
            return Ok(());
        };
        let input = match text?.trim().parse() {
            Ok(input) => input,
            Err(err) => {
                writeln!(error, "Error: {err}")?;
                writeln!(error, "for available command, enter `help`")?;
                update = false;
                continue;
            }
        };
        match input {
            Input::Help => {
                writeln!(output, "e2 (or (6,4))        - select, deselect, or move to a square")?;
                writeln!(output, "new <white> <black>  - resume or start the pair's game")?;
                writeln!(output, "save                 - save the game for later")?;
                writeln!(output, "restart              - start over from the opening")?;
                writeln!(output, "log                  - print the move log")?;
                writeln!(output, "flip                 - flip the board")?;
                writeln!(output, "fuzz <games>         - check legal moves against an oracle")?;
                writeln!(output, "quit                 - quit without saving")?;
                update = false;
            }
            Input::Flip => view = !view,
            Input::Restart => {
                session.restart();
                highlighted.clear();
            }
            Input::Save => {
                session.save()?;
                notices.push("game saved".to_owned());
            }
            Input::Log => {
                for entry in session.game().log() {
                    writeln!(output, "{entry}")?;
                }
                update = false;
            }
            Input::Quit => return Ok(()),
            Input::New(players) => {
                if let Err(err) = session.switch(players) {
                    writeln!(error, "Error: {err}")?;
                }
                highlighted.clear();
            }
            Input::Fuzz(games) => {
                match fuzz(games, rand::random()) {
                    Ok(report) => writeln!(
                        output,
                        "{} games, {} plies, {} checkmates, {} stalemates: no mismatch",
                        report.games, report.plies, report.checkmates, report.stalemates,
                    )?,
                    Err(mismatch) => writeln!(error, "Error: {mismatch}")?,
                }
                update = false;
            }
            Input::Square(position) => {
                let transition = session.handle(position, |side: Side| {
                    prompt_promotion(&mut lines, &mut output, side)
                })?;
                match transition {
                    Transition::Ignored => {
                        writeln!(error, "Error: nothing to do on {}", position.algebraic())?;
                        update = false;
                    }
                    Transition::Selected(_) => highlighted = session.highlights(),
                    Transition::Deselected => highlighted.clear(),
                    Transition::Moved { entry, status, .. } => {
                        highlighted.clear();
                        if let LogEntry::Move {
                            origin,
                            destination,
                            ..
                        } = entry
                        {
                            highlighted.extend([origin, destination]);
                        }
                        match status {
                            Status::Continue => {}
                            Status::Check => notices.push("Checked!".to_owned()),
                            Status::Checkmate { .. } => {
                                notices.push("type `restart` or `new <white> <black>`".to_owned());
                            }
                        }
                    }
                }
            }
        }
    }
}
fn main() -> ExitCode {
    init_logger();
    let data_dir = env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("./data"), PathBuf::from);
    match repl(data_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
