use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::board::Square;
use crate::config::RuleSet;
use crate::game::Game;
use crate::rules::GameState;

const HELP: &str = "commands:\n  E2 E4     move a piece (or e2e4)\n  moves E2  list legal targets\n  board     show the board\n  new       start over\n  help      show this text\n  quit      leave\n";

/// Line-oriented front end: reads coordinate commands, prints the board and game events.
pub struct ConsoleHandler {
    game: Game,
    finished: bool,
    closed: bool,
}

impl ConsoleHandler {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            game: Game::with_rules(rules),
            finished: false,
            closed: false,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// True once `quit` has been handled.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut reader = stdin.lock();
        let mut line = String::new();

        write!(stdout, "{}{}", self.game.board(), self.prompt())?;
        stdout.flush()?;

        while reader.read_line(&mut line).context("reading from stdin")? > 0 {
            let command = line.trim();
            match self.handle_command(command) {
                Ok(response) => write!(stdout, "{}", response)?,
                Err(err) => {
                    warn!(%err, command, "bad input");
                    writeln!(stdout, "{}", err)?;
                }
            }
            if self.closed {
                break;
            }
            write!(stdout, "{}", self.prompt())?;
            stdout.flush()?;
            line.clear();
        }
        info!("console closed");
        Ok(())
    }

    fn prompt(&self) -> String {
        if self.finished {
            "game over, type 'new' or 'quit'> ".to_string()
        } else {
            format!("{} to move> ", self.game.turn())
        }
    }

    pub fn handle_command(&mut self, command: &str) -> Result<String> {
        let parts: Vec<&str> = command.split_whitespace().collect();
        match parts.as_slice() {
            [] => Ok(String::new()),
            ["help"] => Ok(HELP.to_string()),
            ["quit"] => {
                self.closed = true;
                Ok(String::new())
            }
            ["board"] => Ok(self.game.board().to_string()),
            ["new"] => {
                self.game.new_game();
                self.finished = false;
                Ok(self.game.board().to_string())
            }
            ["moves", square] => self.handle_moves(square),
            [from, to] => self.handle_move(from, to),
            [joined] if joined.len() == 4 && joined.is_ascii() => {
                self.handle_move(&joined[..2], &joined[2..])
            }
            _ => Ok(format!("unknown command: {}\n{}", command, HELP)),
        }
    }

    fn handle_moves(&self, square: &str) -> Result<String> {
        let square: Square = square.parse()?;
        if self.game.piece_owner(square) != Some(self.game.turn()) {
            return Ok(format!("{} is not one of your pieces\n", square));
        }

        let targets: Vec<String> = self.game.legal_moves(square).map(|s| s.to_string()).collect();
        if targets.is_empty() {
            Ok(format!("{} has no legal moves\n", square))
        } else {
            Ok(format!("{}: {}\n", square, targets.join(", ")))
        }
    }

    fn handle_move(&mut self, from: &str, to: &str) -> Result<String> {
        if self.finished {
            return Ok("the game is over\n".to_string());
        }
        let from: Square = from.parse()?;
        let to: Square = to.parse()?;

        let outcome = match self.game.apply_move(from, to) {
            Ok(outcome) => outcome,
            Err(err) if err.is_self_check() => {
                return Ok("that move would be valid, but your king would be in check\n".to_string());
            }
            Err(err) => return Ok(format!("{}\n", err)),
        };

        let mut response = String::new();
        if outcome.promotion_due {
            self.game.promote(outcome.to)?;
            response.push_str(&format!("pawn on {} promoted to queen\n", outcome.to));
        }
        response.push_str(&self.game.board().to_string());

        match self.game.state()? {
            GameState::Checkmate { winner } => {
                self.finished = true;
                response.push_str(&format!("checkmate, {} wins\n", winner));
            }
            GameState::Stalemate | GameState::InsufficientMaterial => {
                self.finished = true;
                response.push_str("stalemate, the game is drawn\n");
            }
            GameState::Check => response.push_str(&format!("{} is in check\n", self.game.turn())),
            GameState::Ongoing => {}
        }
        Ok(response)
    }
}
