//! Many games behind one handle.
//!
//! Each game lives in its own `Mutex`, so commands for one game run one at a
//! time while different games proceed in parallel. The outer `RwLock` is only
//! held long enough to look an entry up or insert it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::debug;

use crate::game::{Command, Fact, GameError, GameId, GameState, Transition};

#[derive(Debug, Default)]
struct GameEntry {
    state: GameState,
    journal: Vec<Fact>,
}

/// In-memory registry of games and their fact journals.
#[derive(Debug, Default)]
pub struct GameRegistry {
    games: RwLock<HashMap<GameId, Arc<Mutex<GameEntry>>>>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `command` to its game and journals the resulting facts.
    ///
    /// A `StartGame` creates the entry; any other command for an id with no
    /// entry fails with [`GameError::UnknownGame`]. On error the game is left
    /// as it was.
    pub fn dispatch(&self, command: &Command) -> Result<Vec<Fact>, GameError> {
        let entry = match command {
            Command::StartGame { game_id, .. } => self.entry_or_insert(game_id),
            _ => self.entry(command.game_id())?,
        };
        // A panic mid-dispatch cannot leave a half-applied state: the entry is
        // only written after `apply` succeeded.
        let mut entry = entry.lock().unwrap_or_else(PoisonError::into_inner);

        let Transition { state, facts } = entry.state.apply(command)?;
        entry.state = state;
        entry.journal.extend(facts.iter().cloned());
        debug!(game_id = %command.game_id(), journal = entry.journal.len(), "dispatched");
        Ok(facts)
    }

    /// Current state of a game.
    pub fn state(&self, game_id: &str) -> Result<GameState, GameError> {
        let entry = self.entry(game_id)?;
        let entry = entry.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entry.state.clone())
    }

    /// All facts recorded for a game, oldest first.
    pub fn history(&self, game_id: &str) -> Result<Vec<Fact>, GameError> {
        let entry = self.entry(game_id)?;
        let entry = entry.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entry.journal.clone())
    }

    /// Rebuilds a game's state from its journal alone.
    pub fn rebuild(&self, game_id: &str) -> Result<GameState, GameError> {
        GameState::replay(&self.history(game_id)?)
    }

    /// Ids of all known games, sorted.
    pub fn game_ids(&self) -> Vec<GameId> {
        let games = self.games.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<GameId> = games.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn entry(&self, game_id: &str) -> Result<Arc<Mutex<GameEntry>>, GameError> {
        let games = self.games.read().unwrap_or_else(PoisonError::into_inner);
        games
            .get(game_id)
            .cloned()
            .ok_or_else(|| GameError::UnknownGame(game_id.to_string()))
    }

    fn entry_or_insert(&self, game_id: &str) -> Arc<Mutex<GameEntry>> {
        let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(games.entry(game_id.to_string()).or_default())
    }
}
