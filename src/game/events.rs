use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::card::CardId;
use crate::game::counter::{Color, Counter};
use crate::game::player::PlayerId;

/// Why an otherwise identical state change happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventContext {
    MoveCard,
    UndoDraw,
}

/// Who an emitted event is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Audience {
    /// Only the named player.
    Private(PlayerId),
    /// Every participant without a more specific view of the same command.
    Public,
    /// Observers that see everything.
    Omniscient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInfo {
    pub id: CardId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachTarget {
    pub player_id: PlayerId,
    pub zone: String,
    pub card_id: CardId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArrowEndpoint {
    Card {
        player_id: PlayerId,
        zone: String,
        card_id: CardId,
    },
    Player {
        player_id: PlayerId,
    },
}

/// Payload of a game event. `None` ids and positions mean the observer is
/// not allowed to know them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEventKind {
    DrawCards {
        number: usize,
        cards: Vec<CardInfo>,
    },
    MoveCard {
        card_id: Option<CardId>,
        card_name: String,
        start_zone: String,
        position: Option<usize>,
        target_player_id: PlayerId,
        target_zone: String,
        x: Option<i32>,
        y: i32,
        new_card_id: Option<CardId>,
        face_down: bool,
    },
    DestroyCard {
        zone: String,
        card_id: CardId,
    },
    AttachCard {
        start_zone: String,
        card_id: CardId,
        target: Option<AttachTarget>,
    },
    SetCardAttr {
        zone: String,
        /// `None` when the change applied to the whole zone.
        card_id: Option<CardId>,
        attr_name: String,
        attr_value: String,
    },
    SetCardCounter {
        zone: String,
        card_id: CardId,
        counter_id: u32,
        value: i32,
    },
    CreateToken {
        zone: String,
        card_id: CardId,
        card_name: String,
        color: String,
        pt: String,
        annotation: String,
        destroy_on_zone_change: bool,
        x: i32,
        y: i32,
    },
    CreateArrow {
        arrow_id: u32,
        start: ArrowEndpoint,
        target: ArrowEndpoint,
        color: Color,
    },
    DeleteArrow {
        arrow_id: u32,
    },
    CreateCounter {
        counter: Counter,
    },
    SetCounter {
        counter_id: u32,
        value: i32,
    },
    DelCounter {
        counter_id: u32,
    },
    Shuffle {
        zone: String,
    },
    DumpZone {
        zone_owner_id: PlayerId,
        zone: String,
        number_cards: i32,
    },
    StopDumpZone {
        zone_owner_id: PlayerId,
        zone: String,
    },
    Leave,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// The player whose state the event describes.
    pub player_id: PlayerId,
    pub kind: GameEventKind,
    pub context: Option<EventContext>,
}

impl GameEvent {
    pub fn new(player_id: PlayerId, kind: GameEventKind) -> Self {
        Self {
            player_id,
            kind,
            context: None,
        }
    }

    pub fn with_context(mut self, context: EventContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// Receives the events produced while a command runs.
pub trait EventSink {
    fn emit(&mut self, audience: Audience, event: GameEvent);

    /// Sends the same, unredacted event to all three audiences.
    fn emit_unredacted(&mut self, actor: PlayerId, event: GameEvent) {
        self.emit(Audience::Private(actor), event.clone());
        self.emit(Audience::Omniscient, event.clone());
        self.emit(Audience::Public, event);
    }
}

/// Events collected during one command, split by audience.
///
/// The queue is routed to sessions as a single unit so that no other
/// command's events can interleave with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameEventQueue {
    pub private: Vec<(PlayerId, GameEvent)>,
    pub public: Vec<GameEvent>,
    pub omniscient: Vec<GameEvent>,
}

impl GameEventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.private.is_empty() && self.public.is_empty() && self.omniscient.is_empty()
    }

    /// Private events addressed to `player`, in emission order.
    pub fn private_for(&self, player: PlayerId) -> Vec<&GameEvent> {
        self.private
            .iter()
            .filter(|(recipient, _)| *recipient == player)
            .map(|(_, event)| event)
            .collect()
    }
}

impl EventSink for GameEventQueue {
    fn emit(&mut self, audience: Audience, event: GameEvent) {
        match audience {
            Audience::Private(player) => self.private.push((player, event)),
            Audience::Public => self.public.push(event),
            Audience::Omniscient => self.omniscient.push(event),
        }
    }
}

/// What a session receives: one audience's view of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEventContainer {
    pub game_id: Uuid,
    pub events: Vec<GameEvent>,
}

impl GameEventContainer {
    pub fn new(game_id: Uuid, events: Vec<GameEvent>) -> Self {
        Self { game_id, events }
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, serde_cbor::Error> {
        serde_cbor::to_vec(self)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self, serde_cbor::Error> {
        serde_cbor::from_slice(bytes)
    }
}
