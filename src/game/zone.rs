use std::collections::{BTreeMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::card::{CardArena, CardId, CardKey, ZoneRef};
use crate::game::player::PlayerId;

pub const DECK_ZONE: &str = "deck";
pub const SIDEBOARD_ZONE: &str = "sb";
pub const TABLE_ZONE: &str = "table";
pub const HAND_ZONE: &str = "hand";
pub const STACK_ZONE: &str = "stack";
pub const GRAVE_ZONE: &str = "grave";
pub const EXILE_ZONE: &str = "rfg";

/// Who may see the contents of a zone by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneType {
    /// Everyone.
    Public,
    /// The owner only.
    Private,
    /// No one; neither order nor identity may leak.
    Hidden,
}

/// The part of a hidden zone its owner is currently examining.
///
/// `Top(n)` reveals positions `0..n`; `All` reveals every position. The
/// default `Top(0)` reveals nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookWindow {
    Top(usize),
    All,
}

impl Default for LookWindow {
    fn default() -> Self {
        LookWindow::Top(0)
    }
}

impl LookWindow {
    /// Reads the wire form: `-1` for everything, `n >= 0` for the top `n`.
    pub fn from_raw(raw: i32) -> Self {
        if raw < 0 {
            LookWindow::All
        } else {
            LookWindow::Top(raw as usize)
        }
    }

    pub fn raw(&self) -> i32 {
        match self {
            LookWindow::All => -1,
            LookWindow::Top(n) => *n as i32,
        }
    }

    pub fn covers(&self, position: usize) -> bool {
        match self {
            LookWindow::All => true,
            LookWindow::Top(n) => *n > position,
        }
    }
}

/// A named container of cards owned by one player.
///
/// Zones with coordinates keep their cards on a sparse grid; other zones are
/// plain sequences where index 0 is the top.
#[derive(Debug, Clone)]
pub struct Zone {
    owner: PlayerId,
    name: String,
    zone_type: ZoneType,
    has_coords: bool,
    look_window: LookWindow,
    cards: Vec<CardKey>,
}

impl Zone {
    pub fn new(owner: PlayerId, name: &str, has_coords: bool, zone_type: ZoneType) -> Self {
        Self {
            owner,
            name: name.to_string(),
            zone_type,
            has_coords,
            look_window: LookWindow::default(),
            cards: Vec::new(),
        }
    }

    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn zone_ref(&self) -> ZoneRef {
        ZoneRef::new(self.owner, &self.name)
    }

    pub fn zone_type(&self) -> ZoneType {
        self.zone_type
    }

    pub fn has_coords(&self) -> bool {
        self.has_coords
    }

    pub fn look_window(&self) -> LookWindow {
        self.look_window
    }

    pub fn set_look_window(&mut self, window: LookWindow) {
        self.look_window = window;
    }

    pub fn cards(&self) -> &[CardKey] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, key: CardKey) -> bool {
        self.cards.contains(&key)
    }

    /// Whether the owner can currently see what sits at `position`.
    pub fn is_revealed(&self, position: usize) -> bool {
        self.zone_type != ZoneType::Hidden || self.look_window.covers(position)
    }

    /// Finds a card by its visible id, returning its key and ordinal position.
    pub fn card_at(&self, id: CardId, arena: &CardArena) -> Option<(CardKey, usize)> {
        self.cards
            .iter()
            .position(|key| arena[*key].id == id)
            .map(|position| (self.cards[position], position))
    }

    /// Takes a card out of the zone and returns the position it occupied.
    ///
    /// # Panics
    /// If the card is not in this zone.
    pub fn remove(&mut self, key: CardKey) -> usize {
        let Some(position) = self.cards.iter().position(|k| *k == key) else {
            panic!("card {key:?} is not in zone `{}` of player {}", self.name, self.owner);
        };
        self.cards.remove(position);
        position
    }

    /// Puts a card into the zone and returns where it landed.
    ///
    /// Grid zones resolve `x` to the nearest free column of row `y`; sequence
    /// zones insert at index `x`, clamped to the zone size, and zero the card
    /// coordinates.
    pub fn insert(&mut self, key: CardKey, x: i32, y: i32, arena: &mut CardArena) -> i32 {
        let landed = if self.has_coords {
            let column = self.free_grid_column(x, y, arena);
            let card = &mut arena[key];
            card.x = column;
            card.y = y;
            self.cards.push(key);
            column
        } else {
            let index = x.clamp(0, self.cards.len() as i32);
            let card = &mut arena[key];
            card.x = 0;
            card.y = 0;
            self.cards.insert(index as usize, key);
            index
        };
        arena[key].zone = self.zone_ref();
        landed
    }

    fn occupied_columns(&self, y: i32, arena: &CardArena) -> HashSet<i32> {
        self.cards
            .iter()
            .map(|key| &arena[*key])
            .filter(|card| card.y == y && card.parent.is_none())
            .map(|card| card.x)
            .collect()
    }

    /// True when no unattached card sits at `(x, y)`. Always true for zones
    /// without coordinates.
    pub fn is_column_empty(&self, x: i32, y: i32, arena: &CardArena) -> bool {
        !self.has_coords || !self.occupied_columns(y, arena).contains(&x)
    }

    /// Scans outward from `x` for the nearest free column of row `y`.
    /// Ties go to the right; negative columns clamp to 0 and the scan never
    /// runs past `i32::MAX`.
    pub fn free_grid_column(&self, x: i32, y: i32, arena: &CardArena) -> i32 {
        let occupied = self.occupied_columns(y, arena);
        let start = x.max(0);
        let mut distance = 0;
        loop {
            if let Some(column) = start.checked_add(distance) {
                if !occupied.contains(&column) {
                    return column;
                }
            }
            if distance > 0 && start - distance >= 0 && !occupied.contains(&(start - distance)) {
                return start - distance;
            }
            distance += 1;
        }
    }

    /// Randomises the order of the zone. Visibility is untouched.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Column shifts that close the gaps of every row, leftmost card first.
    pub fn compaction_plan(&self, arena: &CardArena) -> Vec<(CardKey, i32)> {
        let mut rows: BTreeMap<i32, Vec<(i32, CardKey)>> = BTreeMap::new();
        for key in &self.cards {
            let card = &arena[*key];
            if card.parent.is_none() {
                rows.entry(card.y).or_default().push((card.x, *key));
            }
        }

        let mut plan = Vec::new();
        for row in rows.values_mut() {
            row.sort();
            for (column, (x, key)) in row.iter().enumerate() {
                if *x != column as i32 {
                    plan.push((*key, column as i32));
                }
            }
        }
        plan
    }

    pub(crate) fn push(&mut self, key: CardKey) {
        self.cards.push(key);
    }

    pub(crate) fn drain(&mut self) -> Vec<CardKey> {
        std::mem::take(&mut self.cards)
    }
}
