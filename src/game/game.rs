use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::game::actions::CardTarget;
use crate::game::card::CardId;
use crate::game::counter::Color;
use crate::game::events::{AttachTarget, CardInfo, GameEventQueue};
use crate::game::game_state::GameState;
use crate::game::player::PlayerId;
use crate::logger;
use crate::models::deck::DeckList;
use crate::models::requests::{CreateArrowRequest, CreateTokenRequest, MoveCardsRequest};
use crate::models::settings::Settings;
use crate::session::client::{Session, SessionKind};
use crate::session::router::SessionRegistry;
use crate::utils::errors::GameError;

/// One running match: its state behind a single lock plus the sessions
/// watching it.
///
/// Commands run one at a time. The events a command produces are handed to
/// the sessions before the lock is released, so two commands never
/// interleave in any session's stream.
pub struct GameInstance {
    pub id: Uuid,
    settings: Arc<Settings>,
    state: Mutex<GameState>,
    sessions: RwLock<SessionRegistry>,
}

impl GameInstance {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self::with_state(settings, GameState::new())
    }

    pub fn with_state(settings: Arc<Settings>, state: GameState) -> Self {
        let backlog_warning = settings.session_backlog_warning;
        Self {
            id: Uuid::new_v4(),
            settings,
            state: Mutex::new(state),
            sessions: RwLock::new(SessionRegistry::new(backlog_warning)),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs `command` under the match lock and routes whatever it emitted.
    ///
    /// Rejected commands emit nothing.
    pub async fn execute<T, F>(&self, actor: PlayerId, name: &str, command: F) -> Result<T, GameError>
    where
        F: FnOnce(&mut GameState, &mut GameEventQueue) -> Result<T, GameError>,
    {
        self.execute_then(actor, name, command, |_| {}).await
    }

    /// Like `execute`, then lets `after` update the sessions of a successful
    /// command before the match lock is released.
    async fn execute_then<T, F, A>(&self, actor: PlayerId, name: &str, command: F, after: A) -> Result<T, GameError>
    where
        F: FnOnce(&mut GameState, &mut GameEventQueue) -> Result<T, GameError>,
        A: FnOnce(&mut SessionRegistry),
    {
        let mut state = self.state.lock().await;
        let mut queue = GameEventQueue::new();

        let result = command(&mut *state, &mut queue);
        match &result {
            Ok(_) => {
                logger!(DEBUG, "[GAME] `{}` {} by player {}", self.id, name, actor);
                let mut sessions = self.sessions.write().await;
                sessions.route(self.id, &queue);
                after(&mut *sessions);
            }
            Err(error) => {
                logger!(DEBUG, "[GAME] `{}` {} by player {} rejected ({error})", self.id, name, actor);
            }
        }
        result
    }

    /// Read-only access to the current state, under the match lock.
    pub async fn inspect<T>(&self, read: impl FnOnce(&GameState) -> T) -> T {
        let state = self.state.lock().await;
        read(&*state)
    }

    /// Opens a session of the given kind on this match.
    pub async fn subscribe(&self, kind: SessionKind) -> Session {
        let (session, handle) = Session::new(kind);
        self.sessions.write().await.register(handle);
        session
    }

    pub async fn unsubscribe(&self, session: Uuid) -> bool {
        self.sessions.write().await.unregister(session).is_some()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Seats a player and returns their id with a session bound to them.
    pub async fn join(&self, name: &str) -> (PlayerId, Session) {
        let player = {
            let mut state = self.state.lock().await;
            state.add_player(name, &self.settings)
        };
        let session = self.subscribe(SessionKind::Player(player)).await;
        logger!(INFO, "[GAME] `{name}` joined `{}` as player {player}", self.id);
        (player, session)
    }

    /// Removes a player and closes their sessions. The sessions are gone
    /// before any later command can emit.
    pub async fn leave(&self, player: PlayerId) -> Result<(), GameError> {
        let mut closed = 0;
        self.execute_then(
            player,
            "leave",
            |state, queue| state.remove_player(player, queue),
            |sessions| closed = sessions.unregister_player(player),
        )
        .await?;
        logger!(INFO, "[GAME] Player {player} left `{}` ({closed} session(s) closed)", self.id);
        Ok(())
    }

    /// Starts the player over with a fresh layout and the given deck.
    pub async fn load_deck(&self, player: PlayerId, deck: &DeckList) -> Result<(), GameError> {
        let settings = Arc::clone(&self.settings);
        self.execute(player, "load deck", |state, queue| {
            state.clear_zones(player, queue)?;
            state.setup_player(player, &settings)?;
            state.load_deck(player, deck)
        })
        .await
    }

    /// Draws the configured opening hand.
    pub async fn deal_opening_hand(&self, player: PlayerId) -> Result<(), GameError> {
        let number = self.settings.initial_hand_size;
        self.draw_cards(player, number).await
    }

    /// Empties and re-creates every zone of a player for a new game.
    pub async fn reset_player(&self, player: PlayerId) -> Result<(), GameError> {
        let settings = Arc::clone(&self.settings);
        self.execute(player, "reset", |state, queue| {
            state.clear_zones(player, queue)?;
            state.setup_player(player, &settings)
        })
        .await
    }

    pub async fn draw_cards(&self, player: PlayerId, number: usize) -> Result<(), GameError> {
        self.execute(player, "draw", |state, queue| state.draw_cards(player, number, queue))
            .await
    }

    pub async fn undo_draw(&self, player: PlayerId) -> Result<(), GameError> {
        self.execute(player, "undo draw", |state, queue| state.undo_draw(player, queue))
            .await
    }

    pub async fn move_cards(&self, player: PlayerId, request: &MoveCardsRequest) -> Result<(), GameError> {
        self.execute(player, "move", |state, queue| state.move_cards(player, request, queue))
            .await
    }

    pub async fn set_card_attr(
        &self,
        player: PlayerId,
        zone: &str,
        target: CardTarget,
        attr_name: &str,
        value: &str,
    ) -> Result<(), GameError> {
        self.execute(player, "set card attribute", |state, queue| {
            state.set_card_attr(player, zone, target, attr_name, value, queue)
        })
        .await
    }

    pub async fn set_card_counter(
        &self,
        player: PlayerId,
        zone: &str,
        card_id: CardId,
        counter_id: u32,
        value: i32,
    ) -> Result<(), GameError> {
        self.execute(player, "set card counter", |state, queue| {
            state.set_card_counter(player, zone, card_id, counter_id, value, queue)
        })
        .await
    }

    pub async fn create_token(&self, player: PlayerId, request: &CreateTokenRequest) -> Result<CardId, GameError> {
        self.execute(player, "create token", |state, queue| state.create_token(player, request, queue))
            .await
    }

    pub async fn attach_card(
        &self,
        player: PlayerId,
        zone: &str,
        card_id: CardId,
        target: &AttachTarget,
    ) -> Result<(), GameError> {
        self.execute(player, "attach", |state, queue| {
            state.attach_card(player, zone, card_id, target, queue)
        })
        .await
    }

    pub async fn unattach_card(&self, player: PlayerId, zone: &str, card_id: CardId) -> Result<(), GameError> {
        self.execute(player, "unattach", |state, queue| {
            state.unattach_card(player, zone, card_id, queue)
        })
        .await
    }

    pub async fn create_arrow(&self, player: PlayerId, request: &CreateArrowRequest) -> Result<u32, GameError> {
        self.execute(player, "create arrow", |state, queue| state.create_arrow(player, request, queue))
            .await
    }

    pub async fn delete_arrow(&self, player: PlayerId, arrow_id: u32) -> Result<(), GameError> {
        self.execute(player, "delete arrow", |state, queue| state.delete_arrow(player, arrow_id, queue))
            .await
    }

    pub async fn create_counter(
        &self,
        player: PlayerId,
        name: &str,
        color: Color,
        radius: u32,
        value: i32,
    ) -> Result<u32, GameError> {
        self.execute(player, "create counter", |state, queue| {
            state.create_counter(player, name, color, radius, value, queue)
        })
        .await
    }

    pub async fn set_counter(&self, player: PlayerId, counter_id: u32, value: i32) -> Result<(), GameError> {
        self.execute(player, "set counter", |state, queue| {
            state.set_counter(player, counter_id, value, queue)
        })
        .await
    }

    pub async fn inc_counter(&self, player: PlayerId, counter_id: u32, delta: i32) -> Result<i32, GameError> {
        self.execute(player, "increment counter", |state, queue| {
            state.inc_counter(player, counter_id, delta, queue)
        })
        .await
    }

    pub async fn del_counter(&self, player: PlayerId, counter_id: u32) -> Result<(), GameError> {
        self.execute(player, "delete counter", |state, queue| {
            state.del_counter(player, counter_id, queue)
        })
        .await
    }

    pub async fn shuffle_zone(&self, player: PlayerId, zone: &str) -> Result<(), GameError> {
        self.execute(player, "shuffle", |state, queue| state.shuffle_zone(player, zone, queue))
            .await
    }

    pub async fn look_at_zone(
        &self,
        player: PlayerId,
        owner: PlayerId,
        zone: &str,
        number_cards: i32,
    ) -> Result<Vec<CardInfo>, GameError> {
        self.execute(player, "dump zone", |state, queue| {
            state.look_at_zone(player, owner, zone, number_cards, queue)
        })
        .await
    }

    pub async fn stop_looking(&self, player: PlayerId, owner: PlayerId, zone: &str) -> Result<(), GameError> {
        self.execute(player, "stop dump zone", |state, queue| {
            state.stop_looking(player, owner, zone, queue)
        })
        .await
    }
}
