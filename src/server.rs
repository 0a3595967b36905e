use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::game::game::GameInstance;
use crate::logger;
use crate::models::settings::Settings;
use crate::utils::errors::SettingsError;
use crate::utils::logger::Logger;

/// Registry of the matches hosted by one server process.
///
/// Matches never share state; each one serialises its own commands.
pub struct ServerInstance {
    settings: Arc<Settings>,
    games: RwLock<HashMap<Uuid, Arc<GameInstance>>>,
}

impl ServerInstance {
    pub fn new(settings: Settings) -> Self {
        Logger::set_level(settings.log_level);
        Self {
            settings: Arc::new(settings),
            games: RwLock::new(HashMap::new()),
        }
    }

    /// Builds a server from a settings file and `CARD_TABLE_*` overrides.
    pub fn from_settings_file(path: &str) -> Result<Self, SettingsError> {
        let settings = Settings::load(path)?;
        Ok(Self::new(settings))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub async fn create_game(&self) -> Arc<GameInstance> {
        let game = Arc::new(GameInstance::new(Arc::clone(&self.settings)));
        self.games.write().await.insert(game.id, Arc::clone(&game));
        logger!(INFO, "[SERVER] Game `{}` created", game.id);
        game
    }

    pub async fn get_game(&self, id: Uuid) -> Option<Arc<GameInstance>> {
        self.games.read().await.get(&id).cloned()
    }

    /// Forgets a match. Sessions still holding it keep it alive until they
    /// drop their handle.
    pub async fn close_game(&self, id: Uuid) -> bool {
        let closed = self.games.write().await.remove(&id).is_some();
        if closed {
            logger!(INFO, "[SERVER] Game `{id}` closed");
        }
        closed
    }

    pub async fn game_count(&self) -> usize {
        self.games.read().await.len()
    }
}
