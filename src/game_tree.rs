use crate::tic_tac_toe::{Board, Mark, Position};

/// A hypothetical position reached during search. Owns its own copy of the
/// board, so nothing here can touch the live game.
#[derive(Debug, Clone)]
pub(crate) struct GameTreeNode {
    board: Board,
    next_player: Mark,
    prev_move: Option<Position>,
}

impl GameTreeNode {
    pub fn new(board: Board, next_player: Mark) -> Self {
        Self {
            board,
            next_player,
            prev_move: None,
        }
    }

    /// The move that produced this node; `None` only at the root.
    pub fn prev_move(&self) -> Option<Position> {
        self.prev_move
    }

    /// One child per empty cell, in row-major order.
    pub fn children(&self) -> Vec<GameTreeNode> {
        self.board
            .empty_positions()
            .filter_map(|pos| {
                let mut board = self.board.clone();
                board.set(pos, self.next_player).ok()?;
                Some(GameTreeNode {
                    board,
                    next_player: self.next_player.opponent(),
                    prev_move: Some(pos),
                })
            })
            .collect()
    }

    /// True when `player` loses from here against best play. A tie is not a loss.
    pub fn is_losing_for(&self, player: Mark) -> bool {
        if self.board.is_over() {
            return self.board.winner() == Some(player.opponent());
        }

        if self.next_player == player {
            self.children().iter().all(|node| node.is_losing_for(player))
        } else {
            self.children().iter().any(|node| node.is_losing_for(player))
        }
    }

    /// True when `player` can force a win from here.
    pub fn is_winning_for(&self, player: Mark) -> bool {
        if self.board.is_over() {
            return self.board.winner() == Some(player);
        }

        if self.next_player == player {
            self.children().iter().any(|node| node.is_winning_for(player))
        } else {
            self.children().iter().all(|node| node.is_winning_for(player))
        }
    }
}
