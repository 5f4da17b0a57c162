use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidCoordinate {
    pub row: i32,
    pub col: i32,
}

impl Display for InvalidCoordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{}) is off the board, row and column must be between 0 and 7",
            self.row, self.col
        )?;
        Ok(())
    }
}
impl Error for InvalidCoordinate {}
