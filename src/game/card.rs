use std::collections::{BTreeMap, HashMap};
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::player::PlayerId;
use crate::utils::errors::GameError;

/// Card identity as seen by clients. Unique inside the owning player's
/// allocation space and re-issued when a card turns face down or changes
/// controller.
pub type CardId = u32;

/// Stable handle of a card inside the match arena. Never leaves the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardKey(u64);

/// Back-reference from a card to the zone it currently sits in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneRef {
    pub player_id: PlayerId,
    pub name: String,
}

impl ZoneRef {
    pub fn new(player_id: PlayerId, name: &str) -> Self {
        Self {
            player_id,
            name: name.to_string(),
        }
    }
}

/// Attributes a client may change with a set-attribute command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAttribute {
    Tapped,
    Attacking,
    FaceDown,
    Color,
    Pt,
    Annotation,
    DoesntUntap,
}

impl CardAttribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardAttribute::Tapped => "tapped",
            CardAttribute::Attacking => "attacking",
            CardAttribute::FaceDown => "facedown",
            CardAttribute::Color => "color",
            CardAttribute::Pt => "pt",
            CardAttribute::Annotation => "annotation",
            CardAttribute::DoesntUntap => "doesnt_untap",
        }
    }
}

impl FromStr for CardAttribute {
    type Err = GameError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "tapped" => Ok(CardAttribute::Tapped),
            "attacking" => Ok(CardAttribute::Attacking),
            "facedown" => Ok(CardAttribute::FaceDown),
            "color" => Ok(CardAttribute::Color),
            "pt" => Ok(CardAttribute::Pt),
            "annotation" => Ok(CardAttribute::Annotation),
            "doesnt_untap" => Ok(CardAttribute::DoesntUntap),
            _ => Err(GameError::invalid(format!("unknown card attribute `{name}`"))),
        }
    }
}

fn parse_flag(attribute: CardAttribute, value: &str) -> Result<bool, GameError> {
    match value {
        "1" => Ok(true),
        "0" => Ok(false),
        _ => Err(GameError::invalid(format!(
            "`{value}` is not a valid value for `{}`",
            attribute.as_str()
        ))),
    }
}

/// One physical card instance of a match.
#[derive(Debug, Clone)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub zone: ZoneRef,
    pub x: i32,
    pub y: i32,
    pub face_down: bool,
    pub tapped: bool,
    pub attacking: bool,
    pub doesnt_untap: bool,
    pub pt: String,
    pub color: String,
    pub annotation: String,
    pub counters: BTreeMap<u32, i32>,
    pub destroy_on_zone_change: bool,
    pub parent: Option<CardKey>,
    pub attached: Vec<CardKey>,
}

impl Card {
    pub fn new(id: CardId, name: &str, zone: ZoneRef) -> Self {
        Self {
            id,
            name: name.to_string(),
            zone,
            x: 0,
            y: 0,
            face_down: false,
            tapped: false,
            attacking: false,
            doesnt_untap: false,
            pt: String::new(),
            color: String::new(),
            annotation: String::new(),
            counters: BTreeMap::new(),
            destroy_on_zone_change: false,
            parent: None,
            attached: Vec::new(),
        }
    }

    /// Forgets all per-battlefield state. Called when a card enters a zone
    /// without coordinates.
    pub fn reset_state(&mut self) {
        self.counters.clear();
        self.tapped = false;
        self.attacking = false;
        self.doesnt_untap = false;
        self.pt.clear();
        self.annotation.clear();
    }

    /// Applies `value` to `attribute` and returns the value that was stored.
    ///
    /// `all_cards` marks a bulk change over a whole zone; a bulk untap leaves
    /// cards flagged as doesn't-untap tapped.
    pub fn set_attribute(
        &mut self,
        attribute: CardAttribute,
        value: &str,
        all_cards: bool,
    ) -> Result<String, GameError> {
        match attribute {
            CardAttribute::Tapped => {
                let tapped = parse_flag(attribute, value)?;
                if !(!tapped && all_cards && self.doesnt_untap) {
                    self.tapped = tapped;
                }
            }
            CardAttribute::Attacking => self.attacking = parse_flag(attribute, value)?,
            CardAttribute::FaceDown => self.face_down = parse_flag(attribute, value)?,
            CardAttribute::DoesntUntap => self.doesnt_untap = parse_flag(attribute, value)?,
            CardAttribute::Color => self.color = value.to_string(),
            CardAttribute::Annotation => self.annotation = value.to_string(),
            CardAttribute::Pt => {
                if !value.is_empty() && value.matches('/').count() != 1 {
                    return Err(GameError::invalid(format!(
                        "`{value}` is not a power/toughness value"
                    )));
                }
                self.pt = value.to_string();
                return Ok(self.pt.clone());
            }
        }
        Ok(value.to_string())
    }

    /// Sets a per-card counter. Non-positive values remove it.
    pub fn set_counter(&mut self, counter_id: u32, value: i32) {
        if value <= 0 {
            self.counters.remove(&counter_id);
        } else {
            self.counters.insert(counter_id, value);
        }
    }

    pub fn counter(&self, counter_id: u32) -> i32 {
        self.counters.get(&counter_id).copied().unwrap_or(0)
    }
}

/// Owns every card of a match, addressed by `CardKey`.
#[derive(Debug, Default)]
pub struct CardArena {
    cards: HashMap<CardKey, Card>,
    next_key: u64,
}

impl CardArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, card: Card) -> CardKey {
        let key = CardKey(self.next_key);
        self.next_key += 1;
        self.cards.insert(key, card);
        key
    }

    pub fn get(&self, key: CardKey) -> Option<&Card> {
        self.cards.get(&key)
    }

    pub fn get_mut(&mut self, key: CardKey) -> Option<&mut Card> {
        self.cards.get_mut(&key)
    }

    pub fn remove(&mut self, key: CardKey) -> Option<Card> {
        self.cards.remove(&key)
    }

    pub fn contains(&self, key: CardKey) -> bool {
        self.cards.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CardKey, &Card)> {
        self.cards.iter().map(|(key, card)| (*key, card))
    }
}

impl Index<CardKey> for CardArena {
    type Output = Card;

    fn index(&self, key: CardKey) -> &Card {
        match self.cards.get(&key) {
            Some(card) => card,
            None => panic!("card {key:?} is not in the arena"),
        }
    }
}

impl IndexMut<CardKey> for CardArena {
    fn index_mut(&mut self, key: CardKey) -> &mut Card {
        match self.cards.get_mut(&key) {
            Some(card) => card,
            None => panic!("card {key:?} is not in the arena"),
        }
    }
}
