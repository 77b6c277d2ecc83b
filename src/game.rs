use anyhow::Result;
use log::{info, warn};

use crate::error::GameError;
use crate::player::Player;
use crate::tic_tac_toe::{Board, Mark};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GameOutcome {
    Win(Mark),
    Tie,
}

/// Owns the live board and asks each player in turn for a move.
pub(crate) struct TicTacToe {
    board: Board,
    player_x: Box<dyn Player>,
    player_o: Box<dyn Player>,
    turn: Mark,
}

impl TicTacToe {
    pub fn new(player_x: Box<dyn Player>, player_o: Box<dyn Player>) -> Self {
        Self {
            board: Board::new(),
            player_x,
            player_o,
            turn: Mark::X,
        }
    }

    pub fn with_first_turn(mut self, mark: Mark) -> Self {
        self.turn = mark;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self, mark: Mark) -> &dyn Player {
        match mark {
            Mark::X => self.player_x.as_ref(),
            Mark::O => self.player_o.as_ref(),
        }
    }

    fn player_mut(&mut self, mark: Mark) -> &mut dyn Player {
        match mark {
            Mark::X => self.player_x.as_mut(),
            Mark::O => self.player_o.as_mut(),
        }
    }

    /// Plays until the board is won or full.
    pub fn run(&mut self) -> Result<GameOutcome> {
        while !self.board.is_over() {
            self.play_turn()?;
        }

        let outcome = match self.board.winner() {
            Some(mark) => GameOutcome::Win(mark),
            None => GameOutcome::Tie,
        };
        info!("game over: {:?}", outcome);
        Ok(outcome)
    }

    // The same player is asked again until it names an empty square.
    fn play_turn(&mut self) -> Result<()> {
        let mark = self.turn;
        loop {
            // Players only ever see a copy of the live board.
            let snapshot = self.board.clone();
            let pos = self.player_mut(mark).choose_move(&snapshot, mark)?;
            match self.board.set(pos, mark) {
                Ok(()) => {
                    info!("{} ({}) plays {}", self.player(mark).name(), mark, pos);
                    break;
                }
                Err(err @ GameError::IllegalMove { .. }) => {
                    warn!("{}; asking {} again", err, self.player(mark).name());
                }
                Err(err) => return Err(err.into()),
            }
        }
        self.turn = mark.opponent();
        Ok(())
    }

    pub fn announcement(&self, outcome: GameOutcome) -> String {
        match outcome {
            GameOutcome::Win(mark) => format!("{} won the game!", self.player(mark).name()),
            GameOutcome::Tie => "No one wins!".to_string(),
        }
    }
}
