//! Property-based checks on invariants a sequence of requests must never
//! violate, regardless of which legal moves are taken.

use coup_core::room::{Action, Phase, Response, Role, Room};
use proptest::prelude::*;

fn four_player_room() -> Room {
    let mut room = Room::new(1);
    for name in ["Alice", "Bob", "Carol", "Dan"] {
        room.join(name.to_string()).unwrap();
    }
    room
}

fn total_cards_in_play(room: &Room) -> usize {
    let in_hands: usize = room.seats.iter().map(|s| s.hand.len()).sum();
    in_hands + room.discard.len() + room.deck.len() + room.pending.exchange_pool.len()
}

#[test]
fn fifteen_cards_exist_at_every_stage_of_a_fresh_room() {
    let room = four_player_room();
    assert_eq!(total_cards_in_play(&room), 15);
}

#[test]
fn fifteen_cards_survive_a_challenge_and_a_card_swap() {
    let mut room = four_player_room();
    room.seats[0].hand = vec![Role::Duke, Role::Assassin];
    room.declare_action(0, Action::Tax, None).unwrap();
    room.respond(1, Response::Challenge).unwrap();
    // Alice genuinely holds the Duke: Bob, the challenger, loses a card.
    room.choose_lose_influence(1, room.seats[1].hand[0]).unwrap();
    assert_eq!(total_cards_in_play(&room), 15);
}

#[test]
fn fifteen_cards_survive_an_ambassador_exchange() {
    let mut room = four_player_room();
    room.declare_action(0, Action::Exchange, None).unwrap();
    for seat in [1, 2, 3] {
        room.respond(seat, Response::Pass).unwrap();
    }
    assert_eq!(total_cards_in_play(&room), 15);
    let kept = vec![room.pending.exchange_pool[0], room.pending.exchange_pool[1]];
    room.confirm_exchange(0, kept).unwrap();
    assert_eq!(total_cards_in_play(&room), 15);
}

#[test]
fn ambassador_exchange_preserves_hand_size() {
    let mut room = four_player_room();
    let original_hand_size = room.seats[0].hand.len();
    room.declare_action(0, Action::Exchange, None).unwrap();
    for seat in [1, 2, 3] {
        room.respond(seat, Response::Pass).unwrap();
    }
    let pool = room.pending.exchange_pool.clone();
    let kept: Vec<Role> = pool[..original_hand_size].to_vec();
    room.confirm_exchange(0, kept).unwrap();
    assert_eq!(room.seats[0].hand.len(), original_hand_size);
}

#[test]
fn a_sustained_block_refunds_nothing_and_just_advances_the_turn() {
    let mut room = four_player_room();
    room.declare_action(0, Action::ForeignAid, None).unwrap();
    let coins_before = room.seats[0].coins;
    room.respond(1, Response::Block).unwrap();
    room.respond(0, Response::Pass).unwrap();
    assert_eq!(room.seats[0].coins, coins_before);
    assert_eq!(room.current_seat, 1);
}

#[test]
fn view_for_never_exposes_another_seats_hand() {
    let room = four_player_room();
    let view = room.view_for(0);
    for seat in &view.seats {
        if seat.id == 0 {
            assert!(seat.hand.is_some());
        } else {
            assert!(seat.hand.is_none());
            assert_eq!(seat.hand_size, 2);
        }
    }
}

proptest! {
    /// A few rounds of nothing but Income (never enough to trip the
    /// must-coup threshold) must leave the total card count untouched:
    /// Income never draws from or returns to the deck.
    #[test]
    fn repeated_income_never_changes_total_card_count(rounds in 1u32..3) {
        let mut room = four_player_room();
        let before = total_cards_in_play(&room);
        for _ in 0..rounds {
            for seat in 0..4 {
                room.declare_action(seat, Action::Income, None).unwrap();
            }
        }
        prop_assert_eq!(total_cards_in_play(&room), before);
        prop_assert!(matches!(room.phase, Phase::AwaitingAction | Phase::MustCoup));
    }

    /// Whichever seat the deck hands back after a reshuffle, the total
    /// number of cards in the deck is conserved across a draw-then-return.
    #[test]
    fn deck_round_trip_preserves_card_count(draws in 1usize..8) {
        let mut room = four_player_room();
        let before = room.deck.len();
        let mut drawn = Vec::new();
        for _ in 0..draws {
            if let Some(card) = room.deck.draw() {
                drawn.push(card);
            }
        }
        room.deck.return_many_and_reshuffle(drawn);
        prop_assert_eq!(room.deck.len(), before);
    }
}
