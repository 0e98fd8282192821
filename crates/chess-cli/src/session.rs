//! One game played from line-based input.
//!
//! Every fact is written as one JSON line. The board diagram follows each
//! accepted command when enabled.

use std::io::Write;

use anyhow::Result;
use chess_core::notation::{parse_input, Input};
use chess_core::CastlingSide;
use chess_engine::{Command, Fact, GameId, GameRegistry};
use chrono::Utc;
use tracing::warn;

/// Whether to keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    registry: GameRegistry,
    game_id: GameId,
    show_board: bool,
}

impl Session {
    /// Starts game `game_id` and writes its opening facts to `out`.
    pub fn start(
        game_id: &str,
        white_player: &str,
        black_player: &str,
        show_board: bool,
        out: &mut impl Write,
    ) -> Result<Self> {
        let session = Session {
            registry: GameRegistry::new(),
            game_id: game_id.to_string(),
            show_board,
        };
        let facts = session.registry.dispatch(&Command::StartGame {
            game_id: session.game_id.clone(),
            at: Utc::now(),
            white_player: white_player.to_string(),
            black_player: black_player.to_string(),
        })?;
        session.report(&facts, out)?;
        Ok(session)
    }

    /// Handles one line of input.
    ///
    /// Besides moves and castlings, `history` reprints every fact so far and
    /// `quit` ends the session. Unparseable input is reported and skipped.
    pub fn handle_line(&self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let line = line.trim();
        match line {
            "" => return Ok(Flow::Continue),
            "quit" | "exit" => return Ok(Flow::Quit),
            "history" => {
                for fact in self.registry.history(&self.game_id)? {
                    writeln!(out, "{}", serde_json::to_string(&fact)?)?;
                }
                return Ok(Flow::Continue);
            }
            _ => {}
        }

        let input = match parse_input(line) {
            Ok(input) => input,
            Err(err) => {
                warn!(%err, "input ignored");
                writeln!(out, "{}", err)?;
                return Ok(Flow::Continue);
            }
        };
        let command = self.command_for(input);
        let facts = self.registry.dispatch(&command)?;
        self.report(&facts, out)?;

        if self.registry.state(&self.game_id)?.is_over() {
            return Ok(Flow::Quit);
        }
        Ok(Flow::Continue)
    }

    fn command_for(&self, input: Input) -> Command {
        let game_id = self.game_id.clone();
        let at = Utc::now();
        match input {
            Input::Move { from, to } => Command::MoveChessPiece {
                game_id,
                at,
                from,
                to,
            },
            Input::Castling(CastlingSide::Short) => Command::CastleShort { game_id, at },
            Input::Castling(CastlingSide::Long) => Command::CastleLong { game_id, at },
        }
    }

    fn report(&self, facts: &[Fact], out: &mut impl Write) -> Result<()> {
        for fact in facts {
            writeln!(out, "{}", serde_json::to_string(fact)?)?;
        }
        let accepted = facts.first().is_some_and(|fact| !fact.is_rejection());
        if self.show_board && accepted {
            let state = self.registry.state(&self.game_id)?;
            writeln!(out, "{}", state.board())?;
            if !state.is_over() {
                writeln!(out, "{} to move", state.turn())?;
            }
        }
        Ok(())
    }
}
