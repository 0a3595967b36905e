use std::collections::BTreeMap;

use crate::game::arrow::Arrow;
use crate::game::card::CardId;
use crate::game::counter::Counter;
use crate::game::zone::Zone;
use crate::models::settings::Settings;
use crate::utils::errors::GameError;

pub type PlayerId = u32;

/// Everything one participant owns inside a match.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    zones: BTreeMap<String, Zone>,
    counters: BTreeMap<u32, Counter>,
    arrows: BTreeMap<u32, Arrow>,
    next_card_id: CardId,
    last_draw: Vec<CardId>,
}

impl PlayerState {
    pub fn new(id: PlayerId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            zones: BTreeMap::new(),
            counters: BTreeMap::new(),
            arrows: BTreeMap::new(),
            next_card_id: 0,
            last_draw: Vec::new(),
        }
    }

    /// Creates the configured zones and counters. Existing entries with the
    /// same names are replaced.
    pub fn setup_zones(&mut self, settings: &Settings) {
        for spec in &settings.zones {
            self.add_zone(Zone::new(self.id, &spec.name, spec.has_coords, spec.zone_type));
        }
        for (id, spec) in settings.counters.iter().enumerate() {
            self.add_counter(Counter::new(
                id as u32,
                &spec.name,
                spec.color,
                spec.radius,
                spec.value,
            ));
        }
    }

    pub fn zones(&self) -> &BTreeMap<String, Zone> {
        &self.zones
    }

    pub fn zone(&self, name: &str) -> Result<&Zone, GameError> {
        self.zones
            .get(name)
            .ok_or_else(|| GameError::not_found(format!("zone {name}")))
    }

    pub fn zone_mut(&mut self, name: &str) -> Result<&mut Zone, GameError> {
        self.zones
            .get_mut(name)
            .ok_or_else(|| GameError::not_found(format!("zone {name}")))
    }

    pub fn add_zone(&mut self, zone: Zone) {
        self.zones.insert(zone.name().to_string(), zone);
    }

    pub(crate) fn take_zones(&mut self) -> BTreeMap<String, Zone> {
        std::mem::take(&mut self.zones)
    }

    pub fn counters(&self) -> &BTreeMap<u32, Counter> {
        &self.counters
    }

    pub fn counter_mut(&mut self, id: u32) -> Result<&mut Counter, GameError> {
        self.counters
            .get_mut(&id)
            .ok_or_else(|| GameError::not_found(format!("counter {id}")))
    }

    pub fn add_counter(&mut self, counter: Counter) {
        self.counters.insert(counter.id, counter);
    }

    pub fn delete_counter(&mut self, id: u32) -> Result<Counter, GameError> {
        self.counters
            .remove(&id)
            .ok_or_else(|| GameError::not_found(format!("counter {id}")))
    }

    pub fn arrows(&self) -> &BTreeMap<u32, Arrow> {
        &self.arrows
    }

    pub fn add_arrow(&mut self, arrow: Arrow) {
        self.arrows.insert(arrow.id, arrow);
    }

    pub fn delete_arrow(&mut self, id: u32) -> Result<Arrow, GameError> {
        self.arrows
            .remove(&id)
            .ok_or_else(|| GameError::not_found(format!("arrow {id}")))
    }

    /// Removes every arrow matching `predicate` and returns the removed ids.
    pub(crate) fn delete_arrows_where(&mut self, predicate: impl Fn(&Arrow) -> bool) -> Vec<u32> {
        let ids: Vec<u32> = self
            .arrows
            .values()
            .filter(|arrow| predicate(arrow))
            .map(|arrow| arrow.id)
            .collect();
        for id in &ids {
            self.arrows.remove(id);
        }
        ids
    }

    pub fn new_card_id(&mut self) -> CardId {
        let id = self.next_card_id;
        self.next_card_id += 1;
        id
    }

    pub(crate) fn reset_card_ids(&mut self) {
        self.next_card_id = 0;
    }

    pub fn new_counter_id(&self) -> u32 {
        self.counters.keys().next_back().map_or(1, |id| id + 1)
    }

    pub fn new_arrow_id(&self) -> u32 {
        self.arrows.keys().next_back().map_or(1, |id| id + 1)
    }

    /// Ids drawn since the history was last cleared, oldest first.
    pub fn last_draw(&self) -> &[CardId] {
        &self.last_draw
    }

    pub(crate) fn record_draw(&mut self, id: CardId) {
        self.last_draw.push(id);
    }

    /// Forgets a single drawn id. Returns false if it was not in the history.
    pub(crate) fn forget_draw(&mut self, id: CardId) -> bool {
        match self.last_draw.iter().position(|drawn| *drawn == id) {
            Some(index) => {
                self.last_draw.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear_draw_history(&mut self) {
        self.last_draw.clear();
    }

    /// Drops zones, counters, arrows and draw history. The card records the
    /// zones pointed at are the caller's to dispose of.
    pub(crate) fn clear(&mut self) -> BTreeMap<String, Zone> {
        self.counters.clear();
        self.arrows.clear();
        self.last_draw.clear();
        self.take_zones()
    }
}
