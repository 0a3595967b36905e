use serde::{Deserialize, Serialize};

use crate::game::arrow::{Arrow, ArrowTarget};
use crate::game::card::{Card, CardAttribute, CardId, CardKey, ZoneRef};
use crate::game::counter::{Color, Counter};
use crate::game::events::{
    ArrowEndpoint, AttachTarget, CardInfo, EventContext, EventSink, GameEvent, GameEventKind,
};
use crate::game::game_state::GameState;
use crate::game::player::PlayerId;
use crate::game::transfer::Placement;
use crate::game::zone::{LookWindow, ZoneType};
use crate::models::requests::{ArrowTargetRequest, CardToMove, CreateArrowRequest, CreateTokenRequest};
use crate::utils::errors::GameError;

/// A single card, or every card of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardTarget {
    Card(CardId),
    All,
}

impl GameState {
    /// Changes one attribute of a card, or of every card, in one of the
    /// actor's coordinate zones.
    pub fn set_card_attr(
        &mut self,
        actor: PlayerId,
        zone: &str,
        target: CardTarget,
        attr_name: &str,
        value: &str,
        sink: &mut dyn EventSink,
    ) -> Result<(), GameError> {
        if !self.zone(actor, zone)?.has_coords() {
            return Err(GameError::context(format!("`{zone}` has no coordinates")));
        }
        let attribute: CardAttribute = attr_name.parse()?;
        self.apply_card_attr(actor, &ZoneRef::new(actor, zone), target, attribute, value, sink)
    }

    pub(crate) fn apply_card_attr(
        &mut self,
        actor: PlayerId,
        zone: &ZoneRef,
        target: CardTarget,
        attribute: CardAttribute,
        value: &str,
        sink: &mut dyn EventSink,
    ) -> Result<(), GameError> {
        let zone_state = self.zone(zone.player_id, &zone.name)?;
        if !zone_state.has_coords() {
            return Err(GameError::context(format!("`{}` has no coordinates", zone.name)));
        }

        let all_cards = target == CardTarget::All;
        let keys: Vec<CardKey> = match target {
            CardTarget::Card(id) => vec![self.locate(zone, id)?.0],
            CardTarget::All => zone_state.cards().to_vec(),
        };

        // Reject bad values before touching any card.
        let mut stored = Card::new(0, "", zone.clone()).set_attribute(attribute, value, all_cards)?;
        for key in keys {
            stored = self.cards[key].set_attribute(attribute, value, all_cards)?;
        }

        let card_id = match target {
            CardTarget::Card(id) => Some(id),
            CardTarget::All => None,
        };
        sink.emit_unredacted(
            actor,
            GameEvent::new(
                zone.player_id,
                GameEventKind::SetCardAttr {
                    zone: zone.name.clone(),
                    card_id,
                    attr_name: attribute.as_str().to_string(),
                    attr_value: stored,
                },
            ),
        );
        Ok(())
    }

    pub fn set_card_counter(
        &mut self,
        actor: PlayerId,
        zone: &str,
        card_id: CardId,
        counter_id: u32,
        value: i32,
        sink: &mut dyn EventSink,
    ) -> Result<(), GameError> {
        let (key, _) = self.locate(&ZoneRef::new(actor, zone), card_id)?;
        let card = &mut self.cards[key];
        card.set_counter(counter_id, value);

        sink.emit_unredacted(
            actor,
            GameEvent::new(
                actor,
                GameEventKind::SetCardCounter {
                    zone: zone.to_string(),
                    card_id,
                    counter_id,
                    value: card.counter(counter_id),
                },
            ),
        );
        Ok(())
    }

    /// Puts a new card on a coordinate zone of the actor.
    pub fn create_token(
        &mut self,
        actor: PlayerId,
        request: &CreateTokenRequest,
        sink: &mut dyn EventSink,
    ) -> Result<CardId, GameError> {
        let zone = ZoneRef::new(actor, &request.zone);
        if !self.zone(actor, &request.zone)?.has_coords() {
            return Err(GameError::context(format!("`{}` has no coordinates", request.zone)));
        }

        let id = self.player_mut(actor)?.new_card_id();
        let mut card = Card::new(id, &request.card_name, zone.clone());
        card.color = request.color.clone();
        card.pt = request.pt.clone();
        card.annotation = request.annotation.clone();
        card.destroy_on_zone_change = request.destroy_on_zone_change;
        let key = self.cards.insert(card);

        let player = self
            .players
            .get_mut(&actor)
            .ok_or_else(|| GameError::not_found(format!("player {actor}")))?;
        let x = player
            .zone_mut(&request.zone)?
            .insert(key, request.x, request.y, &mut self.cards);

        sink.emit_unredacted(
            actor,
            GameEvent::new(
                actor,
                GameEventKind::CreateToken {
                    zone: zone.name,
                    card_id: id,
                    card_name: request.card_name.clone(),
                    color: request.color.clone(),
                    pt: request.pt.clone(),
                    annotation: request.annotation.clone(),
                    destroy_on_zone_change: request.destroy_on_zone_change,
                    x,
                    y: request.y,
                },
            ),
        );
        Ok(id)
    }

    /// Attaches one of the actor's cards to a card on a public coordinate
    /// zone, moving it there first when needed.
    pub fn attach_card(
        &mut self,
        actor: PlayerId,
        zone: &str,
        card_id: CardId,
        target: &AttachTarget,
        sink: &mut dyn EventSink,
    ) -> Result<(), GameError> {
        let from = ZoneRef::new(actor, zone);
        let to = ZoneRef::new(target.player_id, &target.zone);
        let (key, _) = self.locate(&from, card_id)?;
        let (target_key, _) = self.locate(&to, target.card_id)?;

        let target_zone = self.zone(to.player_id, &to.name)?;
        if !self.zone(actor, zone)?.has_coords()
            || !target_zone.has_coords()
            || target_zone.zone_type() != ZoneType::Public
        {
            return Err(GameError::context("cards can only be attached on the table"));
        }
        if key == target_key {
            return Err(GameError::context("a card cannot be attached to itself"));
        }
        if self.cards[target_key].parent.is_some() {
            return Err(GameError::context(format!(
                "card {} is itself attached",
                target.card_id
            )));
        }

        for child in self.cards[key].attached.clone() {
            self.unattach(actor, child, sink);
        }
        if let Some(parent) = self.cards[key].parent.take() {
            if let Some(parent) = self.cards.get_mut(parent) {
                parent.attached.retain(|child| *child != key);
            }
        }

        if from != to {
            let card = &self.cards[key];
            let target_card = &self.cards[target_key];
            let hint = CardToMove {
                card_id: card.id,
                face_down: card.face_down,
                ..Default::default()
            };
            let placement = Placement {
                from: &from,
                to: &to,
                x: target_card.x,
                y: target_card.y,
                hint: &hint,
                context: EventContext::MoveCard,
            };
            self.relocate(actor, key, placement, sink);
        }

        let card = &mut self.cards[key];
        card.parent = Some(target_key);
        let attached_id = card.id;
        self.cards[target_key].attached.push(key);

        sink.emit_unredacted(
            actor,
            GameEvent::new(
                to.player_id,
                GameEventKind::AttachCard {
                    start_zone: to.name.clone(),
                    card_id: attached_id,
                    target: Some(target.clone()),
                },
            ),
        );
        Ok(())
    }

    /// Releases an attached card of the actor onto a free cell of its zone.
    pub fn unattach_card(
        &mut self,
        actor: PlayerId,
        zone: &str,
        card_id: CardId,
        sink: &mut dyn EventSink,
    ) -> Result<(), GameError> {
        let (key, _) = self.locate(&ZoneRef::new(actor, zone), card_id)?;
        if self.cards[key].parent.is_none() {
            return Err(GameError::context(format!("card {card_id} is not attached")));
        }
        self.unattach(actor, key, sink);
        Ok(())
    }

    pub fn create_arrow(
        &mut self,
        actor: PlayerId,
        request: &CreateArrowRequest,
        sink: &mut dyn EventSink,
    ) -> Result<u32, GameError> {
        self.player(actor)?;
        let start_zone = ZoneRef::new(request.start_player_id, &request.start_zone);
        let (start, _) = self.locate(&start_zone, request.start_card_id)?;

        let (target, target_endpoint) = match &request.target {
            ArrowTargetRequest::Card {
                player_id,
                zone,
                card_id,
            } => {
                let (key, _) = self.locate(&ZoneRef::new(*player_id, zone), *card_id)?;
                if key == start {
                    return Err(GameError::context("an arrow needs two different ends"));
                }
                let endpoint = ArrowEndpoint::Card {
                    player_id: *player_id,
                    zone: zone.clone(),
                    card_id: *card_id,
                };
                (ArrowTarget::Card(key), endpoint)
            }
            ArrowTargetRequest::Player { player_id } => {
                self.player(*player_id)?;
                let endpoint = ArrowEndpoint::Player {
                    player_id: *player_id,
                };
                (ArrowTarget::Player(*player_id), endpoint)
            }
        };

        let player = self.player_mut(actor)?;
        let arrow_id = player.new_arrow_id();
        player.add_arrow(Arrow {
            id: arrow_id,
            start,
            target,
            color: request.color,
        });

        sink.emit_unredacted(
            actor,
            GameEvent::new(
                actor,
                GameEventKind::CreateArrow {
                    arrow_id,
                    start: ArrowEndpoint::Card {
                        player_id: request.start_player_id,
                        zone: request.start_zone.clone(),
                        card_id: request.start_card_id,
                    },
                    target: target_endpoint,
                    color: request.color,
                },
            ),
        );
        Ok(arrow_id)
    }

    pub fn delete_arrow(
        &mut self,
        actor: PlayerId,
        arrow_id: u32,
        sink: &mut dyn EventSink,
    ) -> Result<(), GameError> {
        self.player_mut(actor)?.delete_arrow(arrow_id)?;
        sink.emit_unredacted(actor, GameEvent::new(actor, GameEventKind::DeleteArrow { arrow_id }));
        Ok(())
    }

    pub fn create_counter(
        &mut self,
        actor: PlayerId,
        name: &str,
        color: Color,
        radius: u32,
        value: i32,
        sink: &mut dyn EventSink,
    ) -> Result<u32, GameError> {
        let player = self.player_mut(actor)?;
        let counter = Counter::new(player.new_counter_id(), name, color, radius, value);
        let id = counter.id;
        player.add_counter(counter.clone());

        sink.emit_unredacted(actor, GameEvent::new(actor, GameEventKind::CreateCounter { counter }));
        Ok(id)
    }

    pub fn set_counter(
        &mut self,
        actor: PlayerId,
        counter_id: u32,
        value: i32,
        sink: &mut dyn EventSink,
    ) -> Result<(), GameError> {
        self.player_mut(actor)?.counter_mut(counter_id)?.value = value;
        sink.emit_unredacted(
            actor,
            GameEvent::new(actor, GameEventKind::SetCounter { counter_id, value }),
        );
        Ok(())
    }

    pub fn inc_counter(
        &mut self,
        actor: PlayerId,
        counter_id: u32,
        delta: i32,
        sink: &mut dyn EventSink,
    ) -> Result<i32, GameError> {
        let counter = self.player_mut(actor)?.counter_mut(counter_id)?;
        counter.value = counter.value.saturating_add(delta);
        let value = counter.value;

        sink.emit_unredacted(
            actor,
            GameEvent::new(actor, GameEventKind::SetCounter { counter_id, value }),
        );
        Ok(value)
    }

    pub fn del_counter(
        &mut self,
        actor: PlayerId,
        counter_id: u32,
        sink: &mut dyn EventSink,
    ) -> Result<(), GameError> {
        self.player_mut(actor)?.delete_counter(counter_id)?;
        sink.emit_unredacted(actor, GameEvent::new(actor, GameEventKind::DelCounter { counter_id }));
        Ok(())
    }

    /// Shuffles a hidden sequence zone of the actor.
    pub fn shuffle_zone(
        &mut self,
        actor: PlayerId,
        zone: &str,
        sink: &mut dyn EventSink,
    ) -> Result<(), GameError> {
        let player = self
            .players
            .get_mut(&actor)
            .ok_or_else(|| GameError::not_found(format!("player {actor}")))?;
        let zone_state = player.zone_mut(zone)?;
        if zone_state.zone_type() != ZoneType::Hidden || zone_state.has_coords() {
            return Err(GameError::context(format!("`{zone}` cannot be shuffled")));
        }
        zone_state.shuffle(&mut self.rng);

        sink.emit_unredacted(
            actor,
            GameEvent::new(actor, GameEventKind::Shuffle { zone: zone.to_string() }),
        );
        Ok(())
    }

    /// Shows the actor the top `number_cards` cards of a zone, or all of
    /// them for a negative count.
    ///
    /// Looking into one of the actor's own hidden zones opens its look
    /// window, so later moves out of that range reveal the card to the actor.
    /// Other players' zones can only be looked at when public.
    pub fn look_at_zone(
        &mut self,
        actor: PlayerId,
        owner: PlayerId,
        zone: &str,
        number_cards: i32,
        sink: &mut dyn EventSink,
    ) -> Result<Vec<CardInfo>, GameError> {
        self.player(actor)?;
        let zone_state = self.zone_mut(owner, zone)?;
        let own = owner == actor;
        match zone_state.zone_type() {
            ZoneType::Public => {}
            ZoneType::Hidden if own => zone_state.set_look_window(LookWindow::from_raw(number_cards)),
            _ if own => {}
            _ => return Err(GameError::context(format!("`{zone}` of player {owner} is not public"))),
        }

        let window = LookWindow::from_raw(number_cards);
        let zone_state = self.zone(owner, zone)?;
        let cards = zone_state
            .cards()
            .iter()
            .enumerate()
            .filter(|(position, _)| window.covers(*position))
            .map(|(_, key)| {
                let card = &self.cards[*key];
                CardInfo {
                    id: card.id,
                    name: card.name.clone(),
                }
            })
            .collect();

        sink.emit_unredacted(
            actor,
            GameEvent::new(
                actor,
                GameEventKind::DumpZone {
                    zone_owner_id: owner,
                    zone: zone.to_string(),
                    number_cards,
                },
            ),
        );
        Ok(cards)
    }

    pub fn stop_looking(
        &mut self,
        actor: PlayerId,
        owner: PlayerId,
        zone: &str,
        sink: &mut dyn EventSink,
    ) -> Result<(), GameError> {
        self.player(actor)?;
        let zone_state = self.zone_mut(owner, zone)?;
        if owner == actor && zone_state.zone_type() == ZoneType::Hidden {
            zone_state.set_look_window(LookWindow::default());
        }

        sink.emit_unredacted(
            actor,
            GameEvent::new(
                actor,
                GameEventKind::StopDumpZone {
                    zone_owner_id: owner,
                    zone: zone.to_string(),
                },
            ),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::GameEventQueue;
    use crate::game::zone::{DECK_ZONE, GRAVE_ZONE, HAND_ZONE, TABLE_ZONE};
    use crate::models::deck::{DeckEntry, DeckList};
    use crate::models::requests::MoveCardsRequest;
    use crate::models::settings::Settings;

    fn table_with(cards: usize) -> (GameState, PlayerId, PlayerId, Vec<CardId>) {
        let mut state = GameState::with_seed(2);
        let settings = Settings::default();
        let alice = state.add_player("alice", &settings);
        let bob = state.add_player("bob", &settings);
        let deck = DeckList {
            main: vec![DeckEntry {
                name: "Soldier".to_string(),
                amount: 20,
            }],
            ..Default::default()
        };
        state.load_deck(alice, &deck).unwrap();
        state.load_deck(bob, &deck).unwrap();

        let mut queue = GameEventQueue::new();
        let ids: Vec<CardId> = state
            .zone_cards(alice, DECK_ZONE)
            .unwrap()
            .iter()
            .take(cards)
            .map(|card| card.id)
            .collect();
        for (column, id) in ids.iter().enumerate() {
            let request = MoveCardsRequest::new(DECK_ZONE, vec![CardToMove::new(*id)], alice, TABLE_ZONE)
                .at(column as i32, 0);
            state.move_cards(alice, &request, &mut queue).unwrap();
        }
        (state, alice, bob, ids)
    }

    fn token(zone: &str, name: &str) -> CreateTokenRequest {
        CreateTokenRequest {
            zone: zone.to_string(),
            card_name: name.to_string(),
            pt: "1/1".to_string(),
            destroy_on_zone_change: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_set_card_attr_errors() {
        let (mut state, alice, _, ids) = table_with(1);
        let mut queue = GameEventQueue::new();

        assert!(matches!(
            state.set_card_attr(alice, "nowhere", CardTarget::Card(ids[0]), "tapped", "1", &mut queue),
            Err(GameError::NotFound(_))
        ));
        assert!(matches!(
            state.set_card_attr(alice, HAND_ZONE, CardTarget::All, "tapped", "1", &mut queue),
            Err(GameError::ContextError(_))
        ));
        assert!(matches!(
            state.set_card_attr(alice, TABLE_ZONE, CardTarget::Card(999), "tapped", "1", &mut queue),
            Err(GameError::NotFound(_))
        ));
        assert!(matches!(
            state.set_card_attr(alice, TABLE_ZONE, CardTarget::Card(ids[0]), "pt", "big", &mut queue),
            Err(GameError::InvalidCommand(_))
        ));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_bulk_untap() {
        let (mut state, alice, _, ids) = table_with(3);
        let mut queue = GameEventQueue::new();
        state
            .set_card_attr(alice, TABLE_ZONE, CardTarget::All, "tapped", "1", &mut queue)
            .unwrap();
        state
            .set_card_attr(alice, TABLE_ZONE, CardTarget::Card(ids[1]), "doesnt_untap", "1", &mut queue)
            .unwrap();
        state
            .set_card_attr(alice, TABLE_ZONE, CardTarget::All, "tapped", "0", &mut queue)
            .unwrap();

        let tapped: Vec<bool> = ids
            .iter()
            .map(|id| state.find_card(alice, TABLE_ZONE, *id).unwrap().tapped)
            .collect();
        assert_eq!(tapped, vec![false, true, false]);

        let last = queue.public.last().unwrap();
        assert_eq!(
            last.kind,
            GameEventKind::SetCardAttr {
                zone: TABLE_ZONE.to_string(),
                card_id: None,
                attr_name: "tapped".to_string(),
                attr_value: "0".to_string(),
            }
        );
        assert_eq!(queue.omniscient.len(), 3);
    }

    #[test]
    fn test_card_counters() {
        let (mut state, alice, _, ids) = table_with(1);
        let mut queue = GameEventQueue::new();
        state.set_card_counter(alice, TABLE_ZONE, ids[0], 2, 3, &mut queue).unwrap();
        assert_eq!(state.find_card(alice, TABLE_ZONE, ids[0]).unwrap().counter(2), 3);

        state.set_card_counter(alice, TABLE_ZONE, ids[0], 2, -1, &mut queue).unwrap();
        assert!(state.find_card(alice, TABLE_ZONE, ids[0]).unwrap().counters.is_empty());
    }

    #[test]
    fn test_create_token_takes_free_cell() {
        let (mut state, alice, _, ids) = table_with(2);
        let mut queue = GameEventQueue::new();
        let mut request = token(TABLE_ZONE, "Spirit");
        request.x = 1;

        let id = state.create_token(alice, &request, &mut queue).unwrap();
        let created = state.find_card(alice, TABLE_ZONE, id).unwrap();
        assert_eq!(created.x, 2);
        assert_eq!(created.pt, "1/1");
        assert!(!ids.contains(&id));
        assert!(matches!(
            queue.public[0].kind,
            GameEventKind::CreateToken { x: 2, .. }
        ));

        assert!(matches!(
            state.create_token(alice, &token(GRAVE_ZONE, "Spirit"), &mut queue),
            Err(GameError::ContextError(_))
        ));
    }

    #[test]
    fn test_attach_rules() {
        let (mut state, alice, _, ids) = table_with(3);
        let mut queue = GameEventQueue::new();
        let onto = |card_id| AttachTarget {
            player_id: alice,
            zone: TABLE_ZONE.to_string(),
            card_id,
        };

        assert!(matches!(
            state.attach_card(alice, TABLE_ZONE, ids[0], &onto(ids[0]), &mut queue),
            Err(GameError::ContextError(_))
        ));

        state.attach_card(alice, TABLE_ZONE, ids[1], &onto(ids[0]), &mut queue).unwrap();
        let host = state.locate(&ZoneRef::new(alice, TABLE_ZONE), ids[0]).unwrap().0;
        let aura = state.locate(&ZoneRef::new(alice, TABLE_ZONE), ids[1]).unwrap().0;
        assert_eq!(state.cards[aura].parent, Some(host));
        assert_eq!(state.cards[host].attached, vec![aura]);

        assert!(matches!(
            state.attach_card(alice, TABLE_ZONE, ids[0], &onto(ids[1]), &mut queue),
            Err(GameError::ContextError(_))
        ));

        state.attach_card(alice, TABLE_ZONE, ids[1], &onto(ids[2]), &mut queue).unwrap();
        assert!(state.cards[host].attached.is_empty());

        state.unattach_card(alice, TABLE_ZONE, ids[1], &mut queue).unwrap();
        assert_eq!(state.cards[aura].parent, None);
        assert!(state.unattach_card(alice, TABLE_ZONE, ids[1], &mut queue).is_err());
    }

    #[test]
    fn test_attach_to_opponent_card() {
        let (mut state, alice, bob, ids) = table_with(1);
        let mut queue = GameEventQueue::new();
        let mut spirit = token(TABLE_ZONE, "Spirit");
        spirit.destroy_on_zone_change = false;
        let bob_card = state.create_token(bob, &spirit, &mut queue).unwrap();

        let target = AttachTarget {
            player_id: bob,
            zone: TABLE_ZONE.to_string(),
            card_id: bob_card,
        };
        state.attach_card(alice, TABLE_ZONE, ids[0], &target, &mut queue).unwrap();

        assert!(state.zone(alice, TABLE_ZONE).unwrap().is_empty());
        let bob_table = state.zone_cards(bob, TABLE_ZONE).unwrap();
        assert_eq!(bob_table.len(), 2);
        assert!(bob_table.iter().any(|card| card.name == "Soldier" && card.parent.is_some()));
    }

    #[test]
    fn test_arrows_and_counters() {
        let (mut state, alice, bob, ids) = table_with(2);
        let mut queue = GameEventQueue::new();

        let request = CreateArrowRequest {
            start_player_id: alice,
            start_zone: TABLE_ZONE.to_string(),
            start_card_id: ids[0],
            target: ArrowTargetRequest::Player { player_id: bob },
            color: Color::new(255, 0, 0),
        };
        assert_eq!(state.create_arrow(alice, &request, &mut queue).unwrap(), 1);
        assert_eq!(state.create_arrow(alice, &request, &mut queue).unwrap(), 2);
        state.delete_arrow(alice, 1, &mut queue).unwrap();
        assert!(matches!(state.delete_arrow(alice, 1, &mut queue), Err(GameError::NotFound(_))));

        let poison = state
            .create_counter(alice, "poison", Color::new(0, 200, 0), 20, 0, &mut queue)
            .unwrap();
        assert_eq!(poison, 8);
        assert_eq!(state.inc_counter(alice, poison, 3, &mut queue).unwrap(), 3);
        state.set_counter(alice, 0, 17, &mut queue).unwrap();
        assert_eq!(state.player(alice).unwrap().counters()[&0].value, 17);
        state.del_counter(alice, poison, &mut queue).unwrap();
        assert!(state.set_counter(alice, poison, 1, &mut queue).is_err());
    }

    #[test]
    fn test_shuffle_only_hidden_sequences() {
        let (mut state, alice, _, _) = table_with(0);
        let mut queue = GameEventQueue::new();
        state.shuffle_zone(alice, DECK_ZONE, &mut queue).unwrap();
        assert!(matches!(
            state.shuffle_zone(alice, TABLE_ZONE, &mut queue),
            Err(GameError::ContextError(_))
        ));
        assert!(matches!(
            state.shuffle_zone(alice, HAND_ZONE, &mut queue),
            Err(GameError::ContextError(_))
        ));
    }

    #[test]
    fn test_look_at_zone_opens_window() {
        let (mut state, alice, bob, _) = table_with(0);
        let mut queue = GameEventQueue::new();

        let seen = state.look_at_zone(alice, alice, DECK_ZONE, 3, &mut queue).unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(state.zone(alice, DECK_ZONE).unwrap().look_window(), LookWindow::Top(3));

        assert!(matches!(
            state.look_at_zone(alice, bob, DECK_ZONE, -1, &mut queue),
            Err(GameError::ContextError(_))
        ));
        assert!(state.look_at_zone(alice, bob, GRAVE_ZONE, -1, &mut queue).unwrap().is_empty());

        state.stop_looking(alice, alice, DECK_ZONE, &mut queue).unwrap();
        assert_eq!(state.zone(alice, DECK_ZONE).unwrap().look_window(), LookWindow::Top(0));
        assert!(matches!(
            queue.public.last().unwrap().kind,
            GameEventKind::StopDumpZone { .. }
        ));
    }
}
