use std::io::{BufRead, Write};

use anyhow::{bail, Result};
use log::{debug, trace};
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::error::GameError;
use crate::game_tree::GameTreeNode;
use crate::tic_tac_toe::{Board, Mark, Position, SIZE};

pub(crate) const COMPUTER_NAME: &str = "Tandy 400";

/// Anything that can pick a square for `mark` on `board`. Players never write
/// to the board themselves; the runner applies whatever they return.
pub(crate) trait Player {
    fn name(&self) -> &str;

    fn choose_move(&mut self, board: &Board, mark: Mark) -> Result<Position>;
}

/// Parses `"row,col"`, e.g. `"1,2"`. Whitespace around either number is fine.
pub(crate) fn parse_position(input: &str) -> Result<Position, GameError> {
    let invalid = || GameError::InvalidInput {
        input: input.trim().to_string(),
    };

    let mut parts = input.trim().split(',');
    let (Some(row), Some(col), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    let row: usize = row.trim().parse().map_err(|_| invalid())?;
    let col: usize = col.trim().parse().map_err(|_| invalid())?;
    Position::new(row, col).map_err(|_| invalid())
}

pub(crate) struct HumanPlayer<R, W> {
    name: String,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(name: impl Into<String>, input: R, output: W) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }
}

impl<R: BufRead, W: Write> Player for HumanPlayer<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, board: &Board, _mark: Mark) -> Result<Position> {
        write!(self.output, "{}", board)?;
        loop {
            writeln!(self.output, "{}: please select your space", self.name)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                bail!("input closed while waiting for {}'s move", self.name);
            }
            match parse_position(&line) {
                Ok(pos) => return Ok(pos),
                Err(err) => {
                    debug!("{}", err);
                    writeln!(self.output, "Invalid coordinate!")?;
                }
            }
        }
    }
}

/// Samples squares uniformly until it lands on an empty one.
pub(crate) fn random_move<R: Rng + ?Sized>(
    board: &Board,
    rng: &mut R,
) -> Result<Position, GameError> {
    if board.empty_positions().next().is_none() {
        return Err(GameError::NoLegalMoves);
    }
    loop {
        let pos = Position::new(rng.gen_range(0..SIZE), rng.gen_range(0..SIZE))?;
        if board.is_empty(pos) {
            return Ok(pos);
        }
        trace!("sampled occupied square {}", pos);
    }
}

/// The first square, in row-major order, that wins on the spot for `mark`.
pub(crate) fn winning_move(board: &Board, mark: Mark) -> Option<Position> {
    board.empty_positions().find(|&pos| {
        let mut board = board.clone();
        board.set(pos, mark).is_ok() && board.winner() == Some(mark)
    })
}

/// Picks the move whose subtree is best for `mark`.
///
/// Children are scanned in row-major order. The first child is the initial
/// pick; a later child replaces it if the pick is a forced loss and the child
/// is not, or if the child is a forced win. Nothing else displaces the pick,
/// so among several forced wins the last one scanned is kept.
pub(crate) fn best_move(board: &Board, mark: Mark) -> Result<Position, GameError> {
    let root = GameTreeNode::new(board.clone(), mark);

    // (node, is_losing_for(mark))
    let mut best: Option<(GameTreeNode, bool)> = None;
    for child in root.children() {
        match best.as_ref().map(|(_, losing)| *losing) {
            None => {
                let losing = child.is_losing_for(mark);
                best = Some((child, losing));
            }
            Some(best_losing) => {
                if best_losing && !child.is_losing_for(mark) {
                    debug!("{:?} escapes a forced loss for {}", child.prev_move(), mark);
                    best = Some((child, false));
                } else if child.is_winning_for(mark) {
                    debug!("{:?} is a forced win for {}", child.prev_move(), mark);
                    // a winning node is never losing
                    best = Some((child, false));
                }
            }
        }
    }

    let pos = best
        .and_then(|(node, _)| node.prev_move())
        .ok_or(GameError::NoLegalMoves)?;
    debug!("{} plays {}", mark, pos);
    Ok(pos)
}

pub(crate) struct RandomPlayer<R> {
    name: String,
    rng: R,
}

impl<R: Rng> RandomPlayer<R> {
    pub fn with_rng(name: impl Into<String>, rng: R) -> Self {
        Self {
            name: name.into(),
            rng,
        }
    }
}

impl<R: Rng> Player for RandomPlayer<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, board: &Board, _mark: Mark) -> Result<Position> {
        Ok(random_move(board, &mut self.rng)?)
    }
}

/// Takes an immediate win when there is one, otherwise plays at random.
pub(crate) struct ComputerPlayer<R = ThreadRng> {
    name: String,
    rng: R,
}

impl ComputerPlayer {
    pub fn new() -> Self {
        Self::with_rng(COMPUTER_NAME, rand::thread_rng())
    }
}

impl<R: Rng> ComputerPlayer<R> {
    pub fn with_rng(name: impl Into<String>, rng: R) -> Self {
        Self {
            name: name.into(),
            rng,
        }
    }
}

impl<R: Rng> Player for ComputerPlayer<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, board: &Board, mark: Mark) -> Result<Position> {
        if let Some(pos) = winning_move(board, mark) {
            debug!("{} wins at {}", mark, pos);
            return Ok(pos);
        }
        Ok(random_move(board, &mut self.rng)?)
    }
}

/// Never loses: searches the whole game tree before every move.
pub(crate) struct PerfectPlayer {
    name: String,
}

impl PerfectPlayer {
    pub fn new() -> Self {
        Self::named(COMPUTER_NAME)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Player for PerfectPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, board: &Board, mark: Mark) -> Result<Position> {
        Ok(best_move(board, mark)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::tic_tac_toe::pos;

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("1,2"), Ok(pos(1, 2)));
        assert_eq!(parse_position(" 0 , 2 \n"), Ok(pos(0, 2)));
        for bad in ["", "1", "1,2,0", "3,0", "0,3", "-1,0", "a,b", "1 2"] {
            assert!(
                matches!(parse_position(bad), Err(GameError::InvalidInput { .. })),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn test_human_reprompts_until_valid() {
        let input = Cursor::new("5,5\nabc\n1, 2\n");
        let mut output = Vec::new();
        let mut human = HumanPlayer::new("Ryan", input, &mut output);

        let chosen = human.choose_move(&Board::new(), Mark::X).unwrap();
        assert_eq!(chosen, pos(1, 2));

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.starts_with(". . . \n"));
        assert_eq!(shown.matches("Ryan: please select your space").count(), 3);
        assert_eq!(shown.matches("Invalid coordinate!").count(), 2);
    }

    #[test]
    fn test_human_errors_on_closed_input() {
        let mut human = HumanPlayer::new("Ryan", Cursor::new("9,9\n"), Vec::new());
        assert!(human.choose_move(&Board::new(), Mark::X).is_err());
    }

    #[test]
    fn test_random_finds_the_only_empty_square() {
        let board: Board = "XOX/OXO/OX.".parse().unwrap();
        let mut player = RandomPlayer::with_rng("rand", StdRng::seed_from_u64(7));
        for _ in 0..1000 {
            assert_eq!(player.choose_move(&board, Mark::O).unwrap(), pos(2, 2));
        }
    }

    #[test]
    fn test_random_on_full_board() {
        let board: Board = "XOX/XOO/OXX".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_move(&board, &mut rng), Err(GameError::NoLegalMoves));
    }

    #[test]
    fn test_computer_takes_the_win() {
        let board: Board = "XX./OO./...".parse().unwrap();
        let mut computer = ComputerPlayer::with_rng("c", StdRng::seed_from_u64(3));
        assert_eq!(computer.choose_move(&board, Mark::X).unwrap(), pos(0, 2));
        assert_eq!(computer.choose_move(&board, Mark::O).unwrap(), pos(1, 2));
    }

    #[test]
    fn test_computer_falls_back_to_random() {
        let board: Board = "X../.O./...".parse().unwrap();
        assert_eq!(winning_move(&board, Mark::X), None);
        let mut computer = ComputerPlayer::with_rng("c", StdRng::seed_from_u64(11));
        for _ in 0..50 {
            let chosen = computer.choose_move(&board, Mark::X).unwrap();
            assert!(board.is_empty(chosen));
        }
    }

    #[test]
    fn test_perfect_completes_the_row() {
        let board: Board = "XX./OO./...".parse().unwrap();
        let chosen = best_move(&board, Mark::X).unwrap();
        assert_eq!(chosen, pos(0, 2));

        let mut after = board.clone();
        after.set(chosen, Mark::X).unwrap();
        assert_eq!(after.winner(), Some(Mark::X));
    }

    #[test]
    fn test_perfect_blocks() {
        let board: Board = "XO./.X./..O".parse().unwrap();
        assert_eq!(best_move(&board, Mark::O).unwrap(), pos(0, 2));
    }

    #[test]
    fn test_perfect_escapes_a_lost_first_choice() {
        // O threatens the diagonal at (2,2), the last empty square.
        let board: Board = "OX./XO./...".parse().unwrap();
        assert_eq!(best_move(&board, Mark::X).unwrap(), pos(2, 2));
    }

    #[test]
    fn test_perfect_prefers_the_last_forced_win() {
        // (0,2) blocks and forks, (2,1) wins outright. Both are forced wins,
        // and the later one replaces the earlier.
        let board: Board = "OO./X../X.X".parse().unwrap();
        assert_eq!(best_move(&board, Mark::X).unwrap(), pos(2, 1));
    }

    #[test]
    fn test_perfect_keeps_first_choice_when_everything_loses() {
        // O answers any X move with a fork at (1,1), so all children lose.
        let board: Board = "OO./X../...".parse().unwrap();
        assert_eq!(best_move(&board, Mark::X).unwrap(), pos(0, 2));
    }

    #[test]
    fn test_perfect_on_full_board() {
        let board: Board = "XOX/XOO/OXX".parse().unwrap();
        assert_eq!(best_move(&board, Mark::X), Err(GameError::NoLegalMoves));
    }

    #[test]
    fn test_perfect_only_picks_empty_squares() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let mut board = Board::new();
            let mut mark = Mark::X;
            // Random opening, then check the search from every later position.
            while !board.is_over() {
                let pos = if board.empty_positions().count() > 6 {
                    random_move(&board, &mut rng).unwrap()
                } else {
                    let pos = best_move(&board, mark).unwrap();
                    assert!(board.is_empty(pos));
                    pos
                };
                board.set(pos, mark).unwrap();
                mark = mark.opponent();
            }
        }
    }
}
