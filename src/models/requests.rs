use serde::{Deserialize, Serialize};

use crate::game::card::CardId;
use crate::game::counter::Color;
use crate::game::player::PlayerId;

/// One card of a move command, with the hints the requester attached to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardToMove {
    pub card_id: CardId,
    #[serde(default)]
    pub face_down: bool,
    #[serde(default)]
    pub tapped: bool,
    #[serde(default)]
    pub pt: String,
}

impl CardToMove {
    pub fn new(card_id: CardId) -> Self {
        Self {
            card_id,
            ..Default::default()
        }
    }

    pub fn face_down(mut self) -> Self {
        self.face_down = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCardsRequest {
    pub start_zone: String,
    pub cards: Vec<CardToMove>,
    pub target_player_id: PlayerId,
    pub target_zone: String,
    /// Anchor column. `None` appends to the end of a sequence zone.
    #[serde(default)]
    pub x: Option<i32>,
    #[serde(default)]
    pub y: i32,
    /// Re-pack the source rows after the move when the source has coordinates.
    #[serde(default)]
    pub fix_free_spaces: bool,
}

impl MoveCardsRequest {
    pub fn new(
        start_zone: &str,
        cards: Vec<CardToMove>,
        target_player_id: PlayerId,
        target_zone: &str,
    ) -> Self {
        Self {
            start_zone: start_zone.to_string(),
            cards,
            target_player_id,
            target_zone: target_zone.to_string(),
            x: None,
            y: 0,
            fix_free_spaces: false,
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = Some(x);
        self.y = y;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTokenRequest {
    pub zone: String,
    pub card_name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub pt: String,
    #[serde(default)]
    pub annotation: String,
    #[serde(default)]
    pub destroy_on_zone_change: bool,
    pub x: i32,
    pub y: i32,
}

/// Endpoint of an arrow as named by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArrowTargetRequest {
    Card {
        player_id: PlayerId,
        zone: String,
        card_id: CardId,
    },
    Player {
        player_id: PlayerId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateArrowRequest {
    pub start_player_id: PlayerId,
    pub start_zone: String,
    pub start_card_id: CardId,
    pub target: ArrowTargetRequest,
    pub color: Color,
}
