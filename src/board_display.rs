use std::fmt::{self, Display, Formatter};

use crate::{board::Board, piece::PieceState, position::Position, side::Side};

const LIGHT: &str = "\x1b[30;107m";
const DARK: &str = "\x1b[30;47m";
const HIGHLIGHTED: &str = "\x1b[30;103m";
const SELECTED: &str = "\x1b[30;102m";
const RESET: &str = "\x1b[0m";

/// ANSI rendering of a board with a side panel of `info` lines.
pub struct BoardDisplay<'a> {
    pub board: &'a Board,
    pub view: Side,
    pub highlighted: &'a [Position],
    pub info: &'a str,
}
impl Display for BoardDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut lines = self.info.lines().fuse();
        for row in 0..8 {
            let row = match self.view {
                Side::White => row,
                Side::Black => 7 - row,
            };
            for col in 0..8 {
                let col = match self.view {
                    Side::White => col,
                    Side::Black => 7 - col,
                };
                let Some(position) = Position::new_checked(row, col) else {
                    continue;
                };
                let color = if self.board.selected_position() == Some(position) {
                    SELECTED
                } else if self.highlighted.contains(&position) {
                    HIGHLIGHTED
                } else if position.is_light() {
                    LIGHT
                } else {
                    DARK
                };
                let figurine = self
                    .board
                    .piece_at(position)
                    .map_or(' ', PieceState::figurine);
                write!(f, "{color}{figurine} {RESET}")?;
            }
            write!(f, "{}", 8 - row)?;
            if let Some(line) = lines.next() {
                write!(f, " {line}")?;
            }
            writeln!(f)?;
        }
        match self.view {
            Side::White => write!(f, "a b c d e f g h")?,
            Side::Black => write!(f, "h g f e d c b a")?,
        }
        if let Some(line) = lines.next() {
            write!(f, "   {line}")?;
        }
        writeln!(f)?;
        for line in lines {
            writeln!(f, "                  {line}")?;
        }
        Ok(())
    }
}
