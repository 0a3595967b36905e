use std::collections::{BTreeMap, HashSet};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::game::arrow::ArrowTarget;
use crate::game::card::{Card, CardArena, CardId, CardKey, ZoneRef};
use crate::game::events::{
    Audience, CardInfo, EventContext, EventSink, GameEvent, GameEventKind,
};
use crate::game::player::{PlayerId, PlayerState};
use crate::game::transfer::Placement;
use crate::game::zone::{Zone, DECK_ZONE, HAND_ZONE, SIDEBOARD_ZONE};
use crate::models::deck::{DeckList, DeckSection};
use crate::models::requests::CardToMove;
use crate::models::settings::Settings;
use crate::utils::errors::GameError;

/// The complete mutable state of one match.
///
/// Every method here is synchronous and expects the caller to hold the
/// match lock. Events are pushed into the supplied sink as they happen.
#[derive(Debug)]
pub struct GameState {
    pub(crate) players: BTreeMap<PlayerId, PlayerState>,
    pub(crate) cards: CardArena,
    pub(crate) rng: StdRng,
    next_player_id: PlayerId,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A state whose shuffles are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            players: BTreeMap::new(),
            cards: CardArena::new(),
            rng,
            next_player_id: 0,
        }
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.values()
    }

    pub fn player(&self, id: PlayerId) -> Result<&PlayerState, GameError> {
        self.players
            .get(&id)
            .ok_or_else(|| GameError::not_found(format!("player {id}")))
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Result<&mut PlayerState, GameError> {
        self.players
            .get_mut(&id)
            .ok_or_else(|| GameError::not_found(format!("player {id}")))
    }

    pub fn zone(&self, player: PlayerId, name: &str) -> Result<&Zone, GameError> {
        self.player(player)?.zone(name)
    }

    pub(crate) fn zone_mut(&mut self, player: PlayerId, name: &str) -> Result<&mut Zone, GameError> {
        self.player_mut(player)?.zone_mut(name)
    }

    /// Cards of a zone in zone order.
    pub fn zone_cards(&self, player: PlayerId, name: &str) -> Result<Vec<&Card>, GameError> {
        let zone = self.zone(player, name)?;
        Ok(zone.cards().iter().map(|key| &self.cards[*key]).collect())
    }

    pub fn find_card(&self, player: PlayerId, zone: &str, id: CardId) -> Result<&Card, GameError> {
        let (key, _) = self.locate(&ZoneRef::new(player, zone), id)?;
        Ok(&self.cards[key])
    }

    pub fn cards(&self) -> &CardArena {
        &self.cards
    }

    /// Resolves a visible card id inside a zone.
    pub(crate) fn locate(&self, zone: &ZoneRef, id: CardId) -> Result<(CardKey, usize), GameError> {
        self.zone(zone.player_id, &zone.name)?
            .card_at(id, &self.cards)
            .ok_or_else(|| GameError::not_found(format!("card {id} in {}", zone.name)))
    }

    /// Seats a new participant with the configured zones and counters.
    pub fn add_player(&mut self, name: &str, settings: &Settings) -> PlayerId {
        let id = self.next_player_id;
        self.next_player_id += 1;

        let mut player = PlayerState::new(id, name);
        player.setup_zones(settings);
        self.players.insert(id, player);
        id
    }

    /// Fills `deck` and `sb` from a deck list, applies its sideboard plan
    /// and shuffles the deck. Ids restart from 0, so every other zone of the
    /// player must be empty.
    pub fn load_deck(&mut self, player: PlayerId, deck: &DeckList) -> Result<(), GameError> {
        let occupied = self
            .player(player)?
            .zones()
            .iter()
            .find(|(name, zone)| *name != DECK_ZONE && *name != SIDEBOARD_ZONE && !zone.is_empty())
            .map(|(name, _)| name.clone());
        if let Some(name) = occupied {
            return Err(GameError::context(format!(
                "`{name}` of player {player} must be empty to load a deck"
            )));
        }
        self.player_mut(player)?.clear_draw_history();

        for name in [DECK_ZONE, SIDEBOARD_ZONE] {
            let keys = self.zone_mut(player, name)?.drain();
            for key in keys {
                self.cards.remove(key);
            }
        }
        self.player_mut(player)?.reset_card_ids();

        for (section, zone_name) in [(DeckSection::Main, DECK_ZONE), (DeckSection::Side, SIDEBOARD_ZONE)] {
            for entry in deck.section(section) {
                for _ in 0..entry.amount {
                    let id = self.player_mut(player)?.new_card_id();
                    let key = self
                        .cards
                        .insert(Card::new(id, &entry.name, ZoneRef::new(player, zone_name)));
                    self.zone_mut(player, zone_name)?.push(key);
                }
            }
        }

        for plan in &deck.sideboard_plan {
            let (from, to) = match (plan.from, plan.to) {
                (DeckSection::Main, DeckSection::Side) => (DECK_ZONE, SIDEBOARD_ZONE),
                (DeckSection::Side, DeckSection::Main) => (SIDEBOARD_ZONE, DECK_ZONE),
                _ => continue,
            };
            let found = self
                .zone(player, from)?
                .cards()
                .iter()
                .copied()
                .find(|key| self.cards[*key].name == plan.card_name);
            if let Some(key) = found {
                self.zone_mut(player, from)?.remove(key);
                self.zone_mut(player, to)?.push(key);
                self.cards[key].zone = ZoneRef::new(player, to);
            }
        }

        let player_state = self
            .players
            .get_mut(&player)
            .ok_or_else(|| GameError::not_found(format!("player {player}")))?;
        player_state.zone_mut(DECK_ZONE)?.shuffle(&mut self.rng);
        Ok(())
    }

    /// Destroys every zone, card, counter and arrow of a player. Arrows
    /// other players drew to the removed cards are deleted as well.
    pub fn clear_zones(&mut self, player: PlayerId, sink: &mut dyn EventSink) -> Result<(), GameError> {
        let zones = self.player_mut(player)?.clear();
        let mut removed = HashSet::new();

        for zone in zones.into_values() {
            for key in zone.cards() {
                if let Some(card) = self.cards.remove(*key) {
                    if let Some(parent) = card.parent {
                        if let Some(parent) = self.cards.get_mut(parent) {
                            parent.attached.retain(|child| child != key);
                        }
                    }
                    for child in card.attached {
                        if let Some(child) = self.cards.get_mut(child) {
                            child.parent = None;
                        }
                    }
                    removed.insert(*key);
                }
            }
        }

        for other in self.players.values_mut().filter(|other| other.id != player) {
            let deleted = other.delete_arrows_where(|arrow| {
                removed.contains(&arrow.start)
                    || match arrow.target {
                        ArrowTarget::Card(key) => removed.contains(&key),
                        ArrowTarget::Player(target) => target == player,
                    }
            });
            for arrow_id in deleted {
                sink.emit(
                    Audience::Public,
                    GameEvent::new(other.id, GameEventKind::DeleteArrow { arrow_id }),
                );
            }
        }
        Ok(())
    }

    /// Re-creates the configured zones and counters of a cleared player.
    pub fn setup_player(&mut self, player: PlayerId, settings: &Settings) -> Result<(), GameError> {
        self.player_mut(player)?.setup_zones(settings);
        Ok(())
    }

    /// Drains the player's state and forgets them.
    pub fn remove_player(&mut self, player: PlayerId, sink: &mut dyn EventSink) -> Result<(), GameError> {
        self.clear_zones(player, sink)?;
        self.players.remove(&player);
        sink.emit(Audience::Public, GameEvent::new(player, GameEventKind::Leave));
        Ok(())
    }

    /// Moves up to `number` cards from the top of `deck` into `hand`.
    pub fn draw_cards(
        &mut self,
        actor: PlayerId,
        number: usize,
        sink: &mut dyn EventSink,
    ) -> Result<(), GameError> {
        self.zone(actor, HAND_ZONE)?;
        let deck_len = self.zone(actor, DECK_ZONE)?.len();
        let number = number.min(deck_len);

        let player = self
            .players
            .get_mut(&actor)
            .ok_or_else(|| GameError::not_found(format!("player {actor}")))?;
        let mut drawn = Vec::with_capacity(number);
        for _ in 0..number {
            let deck = player.zone_mut(DECK_ZONE)?;
            let key = deck.cards()[0];
            deck.remove(key);

            let hand = player.zone_mut(HAND_ZONE)?;
            let end = hand.len() as i32;
            hand.insert(key, end, 0, &mut self.cards);

            let card = &self.cards[key];
            player.record_draw(card.id);
            drawn.push(CardInfo {
                id: card.id,
                name: card.name.clone(),
            });
        }

        let private = GameEvent::new(
            actor,
            GameEventKind::DrawCards {
                number,
                cards: drawn,
            },
        );
        sink.emit(Audience::Private(actor), private.clone());
        sink.emit(Audience::Omniscient, private);
        sink.emit(
            Audience::Public,
            GameEvent::new(
                actor,
                GameEventKind::DrawCards {
                    number,
                    cards: Vec::new(),
                },
            ),
        );
        Ok(())
    }

    /// Puts the most recently drawn card back on top of the deck.
    pub fn undo_draw(&mut self, actor: PlayerId, sink: &mut dyn EventSink) -> Result<(), GameError> {
        let Some(&id) = self.player(actor)?.last_draw().last() else {
            return Err(GameError::context("no draw to undo"));
        };

        let hand = ZoneRef::new(actor, HAND_ZONE);
        let deck = ZoneRef::new(actor, DECK_ZONE);
        self.zone(actor, DECK_ZONE)?;
        let (key, _) = self.locate(&hand, id)?;

        let hint = CardToMove::new(id);
        let placement = Placement {
            from: &hand,
            to: &deck,
            x: 0,
            y: 0,
            hint: &hint,
            context: EventContext::UndoDraw,
        };
        self.relocate(actor, key, placement, sink);
        Ok(())
    }
}
