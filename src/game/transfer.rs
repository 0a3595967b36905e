use std::collections::{BTreeMap, HashSet};

use crate::game::actions::CardTarget;
use crate::game::card::{CardAttribute, CardId, CardKey, ZoneRef};
use crate::game::events::{Audience, EventContext, EventSink, GameEvent, GameEventKind};
use crate::game::game_state::GameState;
use crate::game::player::{PlayerId, PlayerState};
use crate::game::zone::{Zone, ZoneType, HAND_ZONE};
use crate::logger;
use crate::models::requests::{CardToMove, MoveCardsRequest};
use crate::utils::errors::GameError;

/// Where a single card goes and what the requester asked for it.
pub(crate) struct Placement<'a> {
    pub from: &'a ZoneRef,
    pub to: &'a ZoneRef,
    pub x: i32,
    pub y: i32,
    pub hint: &'a CardToMove,
    pub context: EventContext,
}

fn zone_in<'a>(players: &'a BTreeMap<PlayerId, PlayerState>, zone: &ZoneRef) -> &'a Zone {
    match players.get(&zone.player_id).and_then(|player| player.zones().get(&zone.name)) {
        Some(zone) => zone,
        None => panic!("zone `{}` of player {} vanished during a transfer", zone.name, zone.player_id),
    }
}

fn zone_in_mut<'a>(players: &'a mut BTreeMap<PlayerId, PlayerState>, zone: &ZoneRef) -> &'a mut Zone {
    match players
        .get_mut(&zone.player_id)
        .and_then(|player| player.zone_mut(&zone.name).ok())
    {
        Some(zone) => zone,
        None => panic!("zone `{}` of player {} vanished during a transfer", zone.name, zone.player_id),
    }
}

fn player_in_mut(players: &mut BTreeMap<PlayerId, PlayerState>, id: PlayerId) -> &mut PlayerState {
    match players.get_mut(&id) {
        Some(player) => player,
        None => panic!("player {id} vanished during a transfer"),
    }
}

/// How the cards of one request are sequenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveOrder {
    /// Inside one sequence zone: cards at or right of the anchor ascending
    /// from it, then the cards left of it descending from `anchor - 1`, so
    /// the moved block keeps its relative order.
    Reorder,
    /// Inside one grid zone: ascending source position.
    Ascending,
    /// Between zones: cards at or right of the anchor ascending, then the
    /// cards left of it descending, each one column further on.
    AnchorRelative,
}

/// Orders the cards of a move and assigns each its column or index.
///
/// The anchor is compared against source positions. Callers keep
/// `anchor + moving.len()` inside `i32`.
fn placement_order(
    mut moving: Vec<(CardKey, usize, &CardToMove)>,
    anchor: i32,
    order: MoveOrder,
) -> Vec<(CardKey, &CardToMove, i32)> {
    moving.sort_by_key(|(_, position, _)| *position);
    let split = moving.partition_point(|(_, position, _)| (*position as i64) < anchor as i64);
    let (left, right) = moving.split_at(split);

    let ordered: Vec<&(CardKey, usize, &CardToMove)> = match order {
        MoveOrder::Ascending => moving.iter().collect(),
        MoveOrder::Reorder | MoveOrder::AnchorRelative => right.iter().chain(left.iter().rev()).collect(),
    };
    let cohort = right.len();
    ordered
        .into_iter()
        .enumerate()
        .map(|(index, (key, _, hint))| {
            let x = if order == MoveOrder::Reorder && index >= cohort {
                anchor - 1 - (index - cohort) as i32
            } else {
                anchor + index as i32
            };
            (*key, *hint, x)
        })
        .collect()
}

impl GameState {
    /// Moves cards from one of the actor's zones to a zone of any player.
    ///
    /// Every requested card is validated before the first one moves; a
    /// failed request leaves the state untouched.
    pub fn move_cards(
        &mut self,
        actor: PlayerId,
        request: &MoveCardsRequest,
        sink: &mut dyn EventSink,
    ) -> Result<(), GameError> {
        let from = ZoneRef::new(actor, &request.start_zone);
        let to = ZoneRef::new(request.target_player_id, &request.target_zone);
        let source = self.zone(from.player_id, &from.name)?;
        let target = self.zone(to.player_id, &to.name)?;

        if to.player_id != from.player_id
            && (target.zone_type() != ZoneType::Public || !target.has_coords())
        {
            return Err(GameError::context(format!(
                "cards of player {} cannot be moved to `{}` of player {}",
                from.player_id, to.name, to.player_id
            )));
        }

        let order = match (from == to, target.has_coords()) {
            (true, false) => MoveOrder::Reorder,
            (true, true) => MoveOrder::Ascending,
            (false, _) => MoveOrder::AnchorRelative,
        };
        let anchor = match request.x {
            None if target.has_coords() => 0,
            None => target.len() as i32,
            Some(x) if target.has_coords() => x,
            // Past the end of both zones every anchor places the same way.
            Some(x) => x.clamp(0, source.len().max(target.len()) as i32),
        };
        let span = i32::try_from(request.cards.len().saturating_sub(1)).ok();
        if span.and_then(|span| anchor.checked_add(span)).is_none() {
            return Err(GameError::invalid(format!("column {anchor} is out of range")));
        }

        let mut seen = HashSet::new();
        let mut moving = Vec::with_capacity(request.cards.len());
        for hint in &request.cards {
            if !seen.insert(hint.card_id) {
                return Err(GameError::invalid(format!("card {} requested twice", hint.card_id)));
            }
            let (key, position) = source.card_at(hint.card_id, &self.cards).ok_or_else(|| {
                GameError::not_found(format!("card {} in {}", hint.card_id, from.name))
            })?;
            if request.x.is_some()
                && !self.cards[key].attached.is_empty()
                && !target.is_column_empty(anchor, request.y, &self.cards)
            {
                return Err(GameError::context(format!(
                    "card {} has attachments and ({anchor}, {}) is taken",
                    hint.card_id, request.y
                )));
            }
            moving.push((key, position, hint));
        }

        logger!(
            DEBUG,
            "[MOVE] Player {} moves {} card(s) from {} to {}:{}",
            actor,
            moving.len(),
            from.name,
            to.player_id,
            to.name
        );

        for (key, hint, x) in placement_order(moving, anchor, order) {
            let placement = Placement {
                from: &from,
                to: &to,
                x,
                y: request.y,
                hint,
                context: EventContext::MoveCard,
            };
            self.relocate(actor, key, placement, sink);
        }

        if request.fix_free_spaces && zone_in(&self.players, &from).has_coords() {
            self.fix_free_spaces(actor, &from, sink);
        }
        Ok(())
    }

    /// Moves one already validated card and emits what each audience may
    /// learn about it.
    ///
    /// # Panics
    /// If either zone or the card is missing.
    pub(crate) fn relocate(
        &mut self,
        actor: PlayerId,
        key: CardKey,
        placement: Placement<'_>,
        sink: &mut dyn EventSink,
    ) {
        let Placement {
            from,
            to,
            x,
            y,
            hint,
            context,
        } = placement;

        let position = zone_in_mut(&mut self.players, from).remove(key);
        let old_id = self.cards[key].id;

        if from.name == HAND_ZONE {
            let owner = player_in_mut(&mut self.players, from.player_id);
            if context == EventContext::UndoDraw {
                owner.forget_draw(old_id);
            } else if owner.last_draw().contains(&old_id) {
                owner.clear_draw_history();
            }
        }

        if from.name != to.name {
            if let Some(parent) = self.cards[key].parent.take() {
                if let Some(parent) = self.cards.get_mut(parent) {
                    parent.attached.retain(|child| *child != key);
                }
            }
            for child in std::mem::take(&mut self.cards[key].attached) {
                self.unattach(actor, child, sink);
            }
        }
        if from != to {
            self.delete_arrows_touching(actor, key, sink);
        }

        if self.cards[key].destroy_on_zone_change && from.name != to.name {
            self.cards.remove(key);
            let event = GameEvent::new(
                from.player_id,
                GameEventKind::DestroyCard {
                    zone: from.name.clone(),
                    card_id: old_id,
                },
            )
            .with_context(EventContext::MoveCard);
            sink.emit_unredacted(actor, event);
            return;
        }

        let target = zone_in_mut(&mut self.players, to);
        let y = if target.has_coords() { y } else { 0 };
        if !target.has_coords() {
            self.cards[key].reset_state();
        }
        let landed = target.insert(key, x, y, &mut self.cards);

        let source = zone_in(&self.players, from);
        let target = zone_in(&self.players, to);
        let source_type = source.zone_type();
        let target_type = target.zone_type();
        let source_looked_at = source.is_revealed(position);
        let target_looked_at = target.is_revealed(landed as usize);

        let card = &self.cards[key];
        let was_face_down = card.face_down;
        let target_hidden_to_player = hint.face_down || !target_looked_at;
        let target_hidden_to_others = hint.face_down || target_type != ZoneType::Public;
        let source_hidden_to_player = was_face_down || !source_looked_at;
        let source_hidden_to_others = was_face_down || source_type != ZoneType::Public;

        let private_name = if source_hidden_to_player && target_hidden_to_player {
            String::new()
        } else {
            card.name.clone()
        };
        let public_name = if source_hidden_to_others && target_hidden_to_others {
            String::new()
        } else {
            card.name.clone()
        };

        let new_id = if (hint.face_down && !was_face_down) || from.player_id != to.player_id {
            player_in_mut(&mut self.players, to.player_id).new_card_id()
        } else {
            old_id
        };
        let card = &mut self.cards[key];
        card.id = new_id;
        card.face_down = hint.face_down;

        // Nobody may correlate the two ends of a move they cannot see.
        let seen_by_actor = source_looked_at || target_looked_at;
        let private_event = GameEvent::new(
            from.player_id,
            GameEventKind::MoveCard {
                card_id: seen_by_actor.then_some(old_id),
                card_name: if seen_by_actor { private_name } else { String::new() },
                start_zone: from.name.clone(),
                position: (source_type == ZoneType::Hidden).then_some(position),
                target_player_id: to.player_id,
                target_zone: to.name.clone(),
                x: Some(landed),
                y,
                new_card_id: seen_by_actor.then_some(new_id),
                face_down: hint.face_down,
            },
        )
        .with_context(context);
        sink.emit(Audience::Private(actor), private_event.clone());
        sink.emit(Audience::Omniscient, private_event);

        let public_position = match source_type {
            ZoneType::Public => None,
            ZoneType::Hidden if source_looked_at => None,
            _ => Some(position),
        };
        let public_x = if target_type == ZoneType::Hidden && target_looked_at {
            None
        } else {
            Some(landed)
        };
        let revealed = source_type == ZoneType::Public || target_type == ZoneType::Public;
        let public_event = GameEvent::new(
            from.player_id,
            GameEventKind::MoveCard {
                card_id: revealed.then_some(old_id),
                card_name: if revealed { public_name } else { String::new() },
                start_zone: from.name.clone(),
                position: public_position,
                target_player_id: to.player_id,
                target_zone: to.name.clone(),
                x: public_x,
                y,
                new_card_id: revealed.then_some(new_id),
                face_down: revealed && hint.face_down,
            },
        )
        .with_context(context);
        sink.emit(Audience::Public, public_event);

        if hint.tapped {
            self.apply_hint(actor, to, new_id, CardAttribute::Tapped, "1", sink);
        }
        if !hint.pt.is_empty() && !hint.face_down {
            self.apply_hint(actor, to, new_id, CardAttribute::Pt, &hint.pt, sink);
        }
    }

    fn apply_hint(
        &mut self,
        actor: PlayerId,
        zone: &ZoneRef,
        card_id: CardId,
        attribute: CardAttribute,
        value: &str,
        sink: &mut dyn EventSink,
    ) {
        let target = CardTarget::Card(card_id);
        if let Err(err) = self.apply_card_attr(actor, zone, target, attribute, value, sink) {
            logger!(
                DEBUG,
                "[MOVE] Ignoring `{}` hint for card {} in {}: {}",
                attribute.as_str(),
                card_id,
                zone.name,
                err
            );
        }
    }

    /// Detaches a card from its parent and puts it back on a free cell of
    /// its own zone.
    pub(crate) fn unattach(&mut self, actor: PlayerId, key: CardKey, sink: &mut dyn EventSink) {
        let card = &mut self.cards[key];
        let parent = card.parent.take();
        let zone = card.zone.clone();
        let (id, x, y, face_down) = (card.id, card.x, card.y, card.face_down);

        if let Some(parent) = parent.and_then(|parent| self.cards.get_mut(parent)) {
            parent.attached.retain(|child| *child != key);
        }

        sink.emit_unredacted(
            actor,
            GameEvent::new(
                zone.player_id,
                GameEventKind::AttachCard {
                    start_zone: zone.name.clone(),
                    card_id: id,
                    target: None,
                },
            ),
        );

        let hint = CardToMove {
            card_id: id,
            face_down,
            ..Default::default()
        };
        let placement = Placement {
            from: &zone,
            to: &zone,
            x,
            y,
            hint: &hint,
            context: EventContext::MoveCard,
        };
        self.relocate(actor, key, placement, sink);
    }

    /// Deletes every arrow, of any player, that starts or ends at `key`.
    fn delete_arrows_touching(&mut self, actor: PlayerId, key: CardKey, sink: &mut dyn EventSink) {
        for player in self.players.values_mut() {
            for arrow_id in player.delete_arrows_where(|arrow| arrow.touches(key)) {
                sink.emit_unredacted(
                    actor,
                    GameEvent::new(player.id, GameEventKind::DeleteArrow { arrow_id }),
                );
            }
        }
    }

    /// Shifts the cards of every row of a coordinate zone leftwards until no
    /// gaps remain. Each shift is reported as a regular move.
    fn fix_free_spaces(&mut self, actor: PlayerId, zone: &ZoneRef, sink: &mut dyn EventSink) {
        let plan = zone_in(&self.players, zone).compaction_plan(&self.cards);
        for (key, column) in plan {
            let card = &self.cards[key];
            let hint = CardToMove {
                card_id: card.id,
                face_down: card.face_down,
                ..Default::default()
            };
            let placement = Placement {
                from: zone,
                to: zone,
                x: column,
                y: card.y,
                hint: &hint,
                context: EventContext::MoveCard,
            };
            self.relocate(actor, key, placement, sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::arrow::{Arrow, ArrowTarget};
    use crate::game::counter::Color;
    use crate::game::events::GameEventQueue;
    use crate::game::zone::{LookWindow, DECK_ZONE, GRAVE_ZONE, SIDEBOARD_ZONE, TABLE_ZONE};
    use crate::models::deck::{DeckEntry, DeckList};
    use crate::models::settings::Settings;

    fn two_players() -> (GameState, PlayerId, PlayerId) {
        let mut state = GameState::with_seed(11);
        let settings = Settings::default();
        let alice = state.add_player("alice", &settings);
        let bob = state.add_player("bob", &settings);
        for (player, name) in [(alice, "Bear"), (bob, "Wolf")] {
            let deck = DeckList {
                main: vec![DeckEntry {
                    name: name.to_string(),
                    amount: 10,
                }],
                ..Default::default()
            };
            state.load_deck(player, &deck).unwrap();
        }
        (state, alice, bob)
    }

    fn ids(state: &GameState, player: PlayerId, zone: &str) -> Vec<CardId> {
        state
            .zone_cards(player, zone)
            .unwrap()
            .iter()
            .map(|card| card.id)
            .collect()
    }

    fn move_event(event: &GameEvent) -> &GameEventKind {
        assert!(matches!(event.kind, GameEventKind::MoveCard { .. }));
        &event.kind
    }

    fn to_table(state: &mut GameState, player: PlayerId, id: CardId, x: i32) {
        let mut queue = GameEventQueue::new();
        let request =
            MoveCardsRequest::new(DECK_ZONE, vec![CardToMove::new(id)], player, TABLE_ZONE).at(x, 0);
        state.move_cards(player, &request, &mut queue).unwrap();
    }

    #[test]
    fn test_reorder_keeps_relative_order() {
        let (mut state, alice, _) = two_players();
        let deck = ids(&state, alice, DECK_ZONE);
        let mut queue = GameEventQueue::new();

        let request = MoveCardsRequest::new(
            DECK_ZONE,
            vec![CardToMove::new(deck[0]), CardToMove::new(deck[1])],
            alice,
            DECK_ZONE,
        )
        .at(4, 0);
        state.move_cards(alice, &request, &mut queue).unwrap();

        let after = ids(&state, alice, DECK_ZONE);
        assert_eq!(&after[..5], &[deck[2], deck[3], deck[0], deck[1], deck[4]]);

        let request = MoveCardsRequest::new(
            DECK_ZONE,
            vec![CardToMove::new(after[4]), CardToMove::new(after[3])],
            alice,
            DECK_ZONE,
        )
        .at(1, 0);
        state.move_cards(alice, &request, &mut queue).unwrap();
        let last = ids(&state, alice, DECK_ZONE);
        assert_eq!(&last[..5], &[after[0], after[3], after[4], after[1], after[2]]);
    }

    #[test]
    fn test_missing_card_fails_before_any_move() {
        let (mut state, alice, _) = two_players();
        let deck = ids(&state, alice, DECK_ZONE);
        let mut queue = GameEventQueue::new();

        let request = MoveCardsRequest::new(
            DECK_ZONE,
            vec![CardToMove::new(deck[0]), CardToMove::new(999)],
            alice,
            GRAVE_ZONE,
        );
        assert!(matches!(
            state.move_cards(alice, &request, &mut queue),
            Err(GameError::NotFound(_))
        ));
        assert_eq!(ids(&state, alice, DECK_ZONE), deck);
        assert!(queue.is_empty());

        let twice = MoveCardsRequest::new(
            DECK_ZONE,
            vec![CardToMove::new(deck[0]), CardToMove::new(deck[0])],
            alice,
            GRAVE_ZONE,
        );
        assert!(matches!(
            state.move_cards(alice, &twice, &mut queue),
            Err(GameError::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_cross_player_rules() {
        let (mut state, alice, bob) = two_players();
        let card = ids(&state, alice, DECK_ZONE)[0];
        let mut queue = GameEventQueue::new();

        for zone in [GRAVE_ZONE, DECK_ZONE, "hand"] {
            let request = MoveCardsRequest::new(DECK_ZONE, vec![CardToMove::new(card)], bob, zone);
            assert!(matches!(
                state.move_cards(alice, &request, &mut queue),
                Err(GameError::ContextError(_))
            ));
        }
        assert_eq!(state.zone(alice, DECK_ZONE).unwrap().len(), 10);

        let request =
            MoveCardsRequest::new(DECK_ZONE, vec![CardToMove::new(card)], bob, TABLE_ZONE).at(0, 0);
        state.move_cards(alice, &request, &mut queue).unwrap();

        let moved = &state.zone_cards(bob, TABLE_ZONE).unwrap()[0];
        assert_eq!(moved.name, "Bear");
        assert_eq!(moved.zone, ZoneRef::new(bob, TABLE_ZONE));
        assert_eq!(moved.id, 10, "controller change takes an id from the new owner");
    }

    #[test]
    fn test_hidden_to_hidden_is_opaque() {
        let (mut state, alice, _) = two_players();
        let card = ids(&state, alice, DECK_ZONE)[3];
        let mut queue = GameEventQueue::new();

        let request = MoveCardsRequest::new(DECK_ZONE, vec![CardToMove::new(card)], alice, SIDEBOARD_ZONE);
        state.move_cards(alice, &request, &mut queue).unwrap();

        let private = move_event(queue.private_for(alice)[0]);
        let public = move_event(&queue.public[0]);
        for kind in [private, public] {
            let GameEventKind::MoveCard {
                card_id,
                card_name,
                new_card_id,
                ..
            } = kind
            else {
                unreachable!()
            };
            assert_eq!(*card_id, None);
            assert_eq!(*new_card_id, None);
            assert!(card_name.is_empty());
        }
        let GameEventKind::MoveCard { position, .. } = private else { unreachable!() };
        assert_eq!(*position, Some(3));
    }

    #[test]
    fn test_look_window_reveals_to_actor_only() {
        let (mut state, alice, _) = two_players();
        state
            .zone_mut(alice, DECK_ZONE)
            .unwrap()
            .set_look_window(LookWindow::Top(1));
        let card = ids(&state, alice, DECK_ZONE)[0];
        let mut queue = GameEventQueue::new();

        let request = MoveCardsRequest::new(DECK_ZONE, vec![CardToMove::new(card)], alice, SIDEBOARD_ZONE);
        state.move_cards(alice, &request, &mut queue).unwrap();

        let GameEventKind::MoveCard { card_name, card_id, .. } = move_event(queue.private_for(alice)[0])
        else {
            unreachable!()
        };
        assert_eq!(card_name, "Bear");
        assert_eq!(*card_id, Some(card));

        let GameEventKind::MoveCard { card_name, position, .. } = move_event(&queue.public[0]) else {
            unreachable!()
        };
        assert!(card_name.is_empty());
        assert_eq!(*position, None);
    }

    #[test]
    fn test_face_down_reissues_id() {
        let (mut state, alice, _) = two_players();
        let card = ids(&state, alice, DECK_ZONE)[0];
        let mut queue = GameEventQueue::new();

        let request =
            MoveCardsRequest::new(DECK_ZONE, vec![CardToMove::new(card).face_down()], alice, TABLE_ZONE)
                .at(0, 0);
        state.move_cards(alice, &request, &mut queue).unwrap();

        let on_table = &state.zone_cards(alice, TABLE_ZONE).unwrap()[0];
        assert!(on_table.face_down);
        assert_ne!(on_table.id, card);

        let GameEventKind::MoveCard {
            card_name,
            face_down,
            new_card_id,
            ..
        } = move_event(&queue.public[0])
        else {
            unreachable!()
        };
        assert!(card_name.is_empty());
        assert!(*face_down);
        assert_eq!(*new_card_id, Some(on_table.id));
    }

    #[test]
    fn test_attached_card_onto_occupied_cell() {
        let (mut state, alice, _) = two_players();
        let deck = ids(&state, alice, DECK_ZONE);
        to_table(&mut state, alice, deck[0], 0);
        to_table(&mut state, alice, deck[1], 1);
        let host = state.locate(&ZoneRef::new(alice, TABLE_ZONE), deck[0]).unwrap().0;
        let aura = state.locate(&ZoneRef::new(alice, TABLE_ZONE), deck[1]).unwrap().0;
        state.cards[aura].parent = Some(host);
        state.cards[host].attached.push(aura);

        to_table(&mut state, alice, deck[2], 3);
        let mut queue = GameEventQueue::new();
        let request =
            MoveCardsRequest::new(TABLE_ZONE, vec![CardToMove::new(deck[0])], alice, TABLE_ZONE).at(3, 0);
        assert!(matches!(
            state.move_cards(alice, &request, &mut queue),
            Err(GameError::ContextError(_))
        ));

        let request = MoveCardsRequest::new(TABLE_ZONE, vec![CardToMove::new(deck[0])], alice, GRAVE_ZONE);
        state.move_cards(alice, &request, &mut queue).unwrap();

        let aura_card = &state.cards[aura];
        assert_eq!(aura_card.parent, None);
        assert_eq!(aura_card.zone.name, TABLE_ZONE);
        assert!(queue.public.iter().any(|event| matches!(
            event.kind,
            GameEventKind::AttachCard { target: None, .. }
        )));
    }

    #[test]
    fn test_arrows_removed_on_zone_change() {
        let (mut state, alice, bob) = two_players();
        let alice_card = ids(&state, alice, DECK_ZONE)[0];
        let bob_card = ids(&state, bob, DECK_ZONE)[0];
        to_table(&mut state, alice, alice_card, 0);
        to_table(&mut state, bob, bob_card, 0);
        let alice_key = state.locate(&ZoneRef::new(alice, TABLE_ZONE), alice_card).unwrap().0;
        let bob_key = state.locate(&ZoneRef::new(bob, TABLE_ZONE), bob_card).unwrap().0;

        let red = Color::new(255, 0, 0);
        state.player_mut(bob).unwrap().add_arrow(Arrow {
            id: 1,
            start: bob_key,
            target: ArrowTarget::Card(alice_key),
            color: red,
        });
        state.player_mut(bob).unwrap().add_arrow(Arrow {
            id: 2,
            start: bob_key,
            target: ArrowTarget::Player(alice),
            color: red,
        });

        let mut queue = GameEventQueue::new();
        let request = MoveCardsRequest::new(TABLE_ZONE, vec![CardToMove::new(alice_card)], alice, TABLE_ZONE).at(4, 0);
        state.move_cards(alice, &request, &mut queue).unwrap();
        assert_eq!(state.player(bob).unwrap().arrows().len(), 2);

        let request = MoveCardsRequest::new(TABLE_ZONE, vec![CardToMove::new(alice_card)], alice, GRAVE_ZONE);
        state.move_cards(alice, &request, &mut queue).unwrap();
        let arrows = state.player(bob).unwrap().arrows();
        assert_eq!(arrows.keys().copied().collect::<Vec<_>>(), vec![2]);
        assert!(queue.public.contains(&GameEvent::new(bob, GameEventKind::DeleteArrow { arrow_id: 1 })));
    }

    #[test]
    fn test_token_destroyed_on_zone_change() {
        let (mut state, alice, _) = two_players();
        let card = ids(&state, alice, DECK_ZONE)[0];
        to_table(&mut state, alice, card, 0);
        let key = state.locate(&ZoneRef::new(alice, TABLE_ZONE), card).unwrap().0;
        state.cards[key].destroy_on_zone_change = true;
        let before = state.cards().len();

        let mut queue = GameEventQueue::new();
        let request = MoveCardsRequest::new(TABLE_ZONE, vec![CardToMove::new(card)], alice, GRAVE_ZONE);
        state.move_cards(alice, &request, &mut queue).unwrap();

        assert_eq!(state.cards().len(), before - 1);
        assert!(state.zone(alice, GRAVE_ZONE).unwrap().is_empty());
        let expected = GameEvent::new(
            alice,
            GameEventKind::DestroyCard {
                zone: TABLE_ZONE.to_string(),
                card_id: card,
            },
        )
        .with_context(EventContext::MoveCard);
        assert_eq!(queue.public, vec![expected.clone()]);
        assert_eq!(queue.omniscient, vec![expected]);
    }

    #[test]
    fn test_hints_apply_after_move() {
        let (mut state, alice, _) = two_players();
        let card = ids(&state, alice, DECK_ZONE)[0];
        let mut queue = GameEventQueue::new();
        let hint = CardToMove {
            card_id: card,
            tapped: true,
            pt: "4/4".to_string(),
            ..Default::default()
        };

        let request = MoveCardsRequest::new(DECK_ZONE, vec![hint], alice, TABLE_ZONE).at(2, 0);
        state.move_cards(alice, &request, &mut queue).unwrap();

        let on_table = state.find_card(alice, TABLE_ZONE, card).unwrap();
        assert!(on_table.tapped);
        assert_eq!(on_table.pt, "4/4");
        assert_eq!(on_table.x, 2);
        assert_eq!(queue.public.len(), 3);
        assert!(matches!(queue.public[1].kind, GameEventKind::SetCardAttr { .. }));
    }

    #[test]
    fn test_fix_free_spaces_compacts_source_row() {
        let (mut state, alice, _) = two_players();
        let deck = ids(&state, alice, DECK_ZONE);
        for (column, id) in deck.iter().take(3).enumerate() {
            to_table(&mut state, alice, *id, column as i32 * 2);
        }

        let mut queue = GameEventQueue::new();
        let mut request = MoveCardsRequest::new(TABLE_ZONE, vec![CardToMove::new(deck[0])], alice, GRAVE_ZONE);
        request.fix_free_spaces = true;
        state.move_cards(alice, &request, &mut queue).unwrap();

        let mut columns: Vec<i32> = state
            .zone_cards(alice, TABLE_ZONE)
            .unwrap()
            .iter()
            .map(|card| card.x)
            .collect();
        columns.sort();
        assert_eq!(columns, vec![0, 1]);
        assert_eq!(queue.public.len(), 3);
    }

    #[test]
    fn test_placement_order_for_plain_moves() {
        let a = CardToMove::new(0);
        let mut arena = crate::game::card::CardArena::new();
        let zone = ZoneRef::new(0, DECK_ZONE);
        let keys: Vec<CardKey> = (0..3)
            .map(|id| arena.insert(crate::game::card::Card::new(id, "", zone.clone())))
            .collect();

        let summary = |anchor, order| -> Vec<(CardKey, i32)> {
            placement_order(vec![(keys[2], 7, &a), (keys[0], 1, &a), (keys[1], 4, &a)], anchor, order)
                .iter()
                .map(|(key, _, x)| (*key, *x))
                .collect()
        };
        assert_eq!(
            summary(5, MoveOrder::Ascending),
            vec![(keys[0], 5), (keys[1], 6), (keys[2], 7)]
        );
        assert_eq!(
            summary(4, MoveOrder::AnchorRelative),
            vec![(keys[1], 4), (keys[2], 5), (keys[0], 6)]
        );
        assert_eq!(
            summary(4, MoveOrder::Reorder),
            vec![(keys[1], 4), (keys[2], 5), (keys[0], 3)]
        );
    }

    #[test]
    fn test_cross_zone_move_starts_at_anchor() {
        let (mut state, alice, _) = two_players();
        let mut queue = GameEventQueue::new();
        state.draw_cards(alice, 4, &mut queue).unwrap();
        let hand = ids(&state, alice, HAND_ZONE);

        let request = MoveCardsRequest::new(
            HAND_ZONE,
            vec![CardToMove::new(hand[0]), CardToMove::new(hand[3])],
            alice,
            GRAVE_ZONE,
        )
        .at(2, 0);
        state.move_cards(alice, &request, &mut queue).unwrap();

        assert_eq!(ids(&state, alice, GRAVE_ZONE), vec![hand[3], hand[0]]);
        assert_eq!(ids(&state, alice, HAND_ZONE), vec![hand[1], hand[2]]);
    }

    #[test]
    fn test_reorder_anchor_is_clamped_to_zone() {
        let (mut state, alice, _) = two_players();
        let mut queue = GameEventQueue::new();
        state.draw_cards(alice, 4, &mut queue).unwrap();
        let hand = ids(&state, alice, HAND_ZONE);

        let request = MoveCardsRequest::new(
            HAND_ZONE,
            vec![CardToMove::new(hand[0]), CardToMove::new(hand[1])],
            alice,
            HAND_ZONE,
        )
        .at(100, 0);
        state.move_cards(alice, &request, &mut queue).unwrap();
        let after = ids(&state, alice, HAND_ZONE);
        assert_eq!(after, vec![hand[2], hand[3], hand[0], hand[1]]);

        let request = MoveCardsRequest::new(
            HAND_ZONE,
            vec![CardToMove::new(after[0]), CardToMove::new(after[1])],
            alice,
            HAND_ZONE,
        )
        .at(-5, 0);
        state.move_cards(alice, &request, &mut queue).unwrap();
        assert_eq!(ids(&state, alice, HAND_ZONE), after);
    }

    #[test]
    fn test_extreme_columns() {
        let (mut state, alice, _) = two_players();
        let deck = ids(&state, alice, DECK_ZONE);
        let mut queue = GameEventQueue::new();

        let request = MoveCardsRequest::new(
            DECK_ZONE,
            vec![CardToMove::new(deck[0]), CardToMove::new(deck[1])],
            alice,
            TABLE_ZONE,
        )
        .at(i32::MAX, 0);
        assert!(matches!(
            state.move_cards(alice, &request, &mut queue),
            Err(GameError::InvalidCommand(_))
        ));
        assert_eq!(ids(&state, alice, DECK_ZONE), deck);
        assert!(queue.is_empty());

        to_table(&mut state, alice, deck[0], i32::MAX);
        to_table(&mut state, alice, deck[1], i32::MAX);
        let columns: Vec<i32> = state
            .zone_cards(alice, TABLE_ZONE)
            .unwrap()
            .iter()
            .map(|card| card.x)
            .collect();
        assert_eq!(columns, vec![i32::MAX, i32::MAX - 1]);

        let request = MoveCardsRequest::new(
            DECK_ZONE,
            vec![CardToMove::new(deck[2]), CardToMove::new(deck[3])],
            alice,
            GRAVE_ZONE,
        )
        .at(i32::MAX, 0);
        state.move_cards(alice, &request, &mut queue).unwrap();
        assert_eq!(ids(&state, alice, GRAVE_ZONE), vec![deck[3], deck[2]]);
    }
}
