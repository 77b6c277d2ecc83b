mod error;
mod game;
mod game_tree;
mod player;
mod tic_tac_toe;

use std::io;

use game::TicTacToe;
use player::{HumanPlayer, PerfectPlayer};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let human = HumanPlayer::new("Ryan", io::stdin().lock(), io::stdout());
    let computer = PerfectPlayer::new();

    let mut game = TicTacToe::new(Box::new(human), Box::new(computer));
    let outcome = game.run()?;

    print!("{}", game.board());
    println!("{}", game.announcement(outcome));

    Ok(())
}
