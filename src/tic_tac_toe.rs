use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

pub(crate) const SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// A single square; `None` means nobody has played there yet.
pub(crate) type Cell = Option<Mark>;

/// A (row, column) coordinate, both in `0..3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Position {
    row: usize,
    col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Result<Self, GameError> {
        if row >= SIZE || col >= SIZE {
            return Err(GameError::OutOfBounds { row, col });
        }
        Ok(Self { row, col })
    }

    /// Every position on the board in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..SIZE).flat_map(|row| (0..SIZE).map(move |col| Position { row, col }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub(crate) struct Board {
    cells: [[Cell; SIZE]; SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.row][pos.col]
    }

    // Place a mark. Turn order is the runner's business, not ours.
    pub fn set(&mut self, pos: Position, mark: Mark) -> Result<(), GameError> {
        match self.cells[pos.row][pos.col] {
            None => {
                self.cells[pos.row][pos.col] = Some(mark);
                Ok(())
            }
            Some(_) => Err(GameError::IllegalMove { position: pos }),
        }
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        Position::all().filter(move |&pos| self.is_empty(pos))
    }

    pub fn rows(&self) -> [[Cell; SIZE]; SIZE] {
        self.cells
    }

    pub fn columns(&self) -> [[Cell; SIZE]; SIZE] {
        let c = &self.cells;
        [0, 1, 2].map(|col| [c[0][col], c[1][col], c[2][col]])
    }

    /// Top-left to bottom-right, then top-right to bottom-left.
    pub fn diagonals(&self) -> [[Cell; SIZE]; 2] {
        let c = &self.cells;
        [[c[0][0], c[1][1], c[2][2]], [c[0][2], c[1][1], c[2][0]]]
    }

    // Check if there's a winner
    pub fn winner(&self) -> Option<Mark> {
        self.rows()
            .into_iter()
            .chain(self.columns())
            .chain(self.diagonals())
            .find_map(|line| match line {
                [Some(a), Some(b), Some(c)] if a == b && b == c => Some(a),
                _ => None,
            })
    }

    pub fn is_won(&self) -> bool {
        self.winner().is_some()
    }

    pub fn is_tied(&self) -> bool {
        if self.is_won() {
            return false;
        }
        self.cells.iter().flatten().all(Option::is_some)
    }

    pub fn is_over(&self) -> bool {
        self.is_won() || self.is_tied()
    }
}

/// Parses nine cells of `X`, `O` and `.` (or `_`) in row-major order.
/// Slashes and whitespace between cells are ignored, so `"XO./.X./..O"`
/// and `"XO. .X. ..O"` both work.
impl FromStr for Board {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<char> = s
            .chars()
            .filter(|c| *c != '/' && !c.is_whitespace())
            .collect();
        if symbols.len() != SIZE * SIZE {
            return Err(GameError::InvalidBoardLength {
                expected: SIZE * SIZE,
                got: symbols.len(),
            });
        }

        let mut board = Board::new();
        for (idx, symbol) in symbols.into_iter().enumerate() {
            board.cells[idx / SIZE][idx % SIZE] = match symbol {
                'X' | 'x' => Some(Mark::X),
                'O' | 'o' => Some(Mark::O),
                '.' | '_' => None,
                character => {
                    return Err(GameError::InvalidCellCharacter {
                        character,
                        position: idx,
                    })
                }
            };
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                let symbol = match cell {
                    None => ".",
                    Some(Mark::X) => "X",
                    Some(Mark::O) => "O",
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn pos(row: usize, col: usize) -> Position {
    Position::new(row, col).unwrap()
}
