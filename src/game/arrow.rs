use crate::game::card::CardKey;
use crate::game::counter::Color;
use crate::game::player::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowTarget {
    Card(CardKey),
    Player(PlayerId),
}

/// A directed targeting annotation, owned by the player who drew it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrow {
    pub id: u32,
    pub start: CardKey,
    pub target: ArrowTarget,
    pub color: Color,
}

impl Arrow {
    /// Whether either endpoint is `key`.
    pub fn touches(&self, key: CardKey) -> bool {
        self.start == key || self.target == ArrowTarget::Card(key)
    }
}
