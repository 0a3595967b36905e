use std::collections::HashMap;

use uuid::Uuid;

use crate::game::events::{GameEvent, GameEventContainer, GameEventQueue};
use crate::game::player::PlayerId;
use crate::logger;
use crate::session::client::{SessionHandle, SessionKind};

/// Live sessions of one match.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: HashMap<Uuid, SessionHandle>,
    backlog_warning: usize,
}

impl SessionRegistry {
    pub fn new(backlog_warning: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            backlog_warning,
        }
    }

    pub fn register(&mut self, handle: SessionHandle) {
        self.sessions.insert(handle.id, handle);
    }

    pub fn unregister(&mut self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.remove(&id)
    }

    /// Drops every session seated as `player`. Returns how many there were.
    pub fn unregister_player(&mut self, player: PlayerId) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, handle| handle.kind != SessionKind::Player(player));
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// The events a session of `kind` gets out of one command.
    ///
    /// A player named by a private event gets the private view only. When
    /// the command produced an omniscient view, omniscient sessions get that
    /// instead of the public one.
    fn view_for(kind: SessionKind, queue: &GameEventQueue) -> Vec<GameEvent> {
        match kind {
            SessionKind::Player(player) if queue.private.iter().any(|(to, _)| *to == player) => {
                queue.private_for(player).into_iter().cloned().collect()
            }
            kind if kind.is_omniscient() && !queue.omniscient.is_empty() => queue.omniscient.clone(),
            _ => queue.public.clone(),
        }
    }

    /// Hands one command's events to every session as a single container.
    /// Closed sessions are dropped from the registry.
    pub fn route(&mut self, game_id: Uuid, queue: &GameEventQueue) {
        if queue.is_empty() {
            return;
        }

        let mut closed = Vec::new();
        for handle in self.sessions.values() {
            let events = Self::view_for(handle.kind, queue);
            if events.is_empty() {
                continue;
            }

            match handle.deliver(GameEventContainer::new(game_id, events)) {
                Ok(backlog) if backlog > self.backlog_warning => {
                    logger!(
                        WARN,
                        "[SESSION] `{}` has {} event containers in queue",
                        handle.id,
                        backlog
                    );
                }
                Ok(_) => {}
                Err(error) => {
                    logger!(DEBUG, "[SESSION] Dropping session ({error})");
                    closed.push(handle.id);
                }
            }
        }

        for id in closed {
            self.sessions.remove(&id);
        }
    }
}
