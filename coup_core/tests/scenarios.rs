//! End-to-end scenarios exercising the action/response/resolution
//! pipeline the way a sequence of client requests would drive it.

use coup_core::room::{Action, Phase, Response, Role, Room};
use coup_core::RoomError;

fn four_player_room() -> Room {
    let mut room = Room::new(1);
    for name in ["Alice", "Bob", "Carol", "Dan"] {
        room.join(name.to_string()).unwrap();
    }
    room
}

#[test]
fn income_smoke_test() {
    let mut room = four_player_room();
    room.declare_action(0, Action::Income, None).unwrap();
    assert_eq!(room.seats[0].coins, 3);
    assert_eq!(room.current_seat, 1);
    assert!(matches!(room.phase, Phase::AwaitingAction | Phase::MustCoup));
}

#[test]
fn caught_bluff_on_tax() {
    let mut room = four_player_room();
    room.seats[0].hand = vec![Role::Captain, Role::Assassin];
    room.declare_action(0, Action::Tax, None).unwrap();
    room.respond(1, Response::Challenge).unwrap();
    assert_eq!(room.phase, Phase::ChoosingInfluenceToLose);
    assert_eq!(room.pending.losing, Some(0));
    room.choose_lose_influence(0, Role::Captain).unwrap();
    assert_eq!(room.seats[0].coins, 2, "tax effect must not apply after a caught bluff");
    assert_eq!(room.current_seat, 1);
}

#[test]
fn successful_block_of_foreign_aid() {
    let mut room = four_player_room();
    room.declare_action(0, Action::ForeignAid, None).unwrap();
    room.respond(1, Response::Block).unwrap();
    assert_eq!(room.phase, Phase::AwaitingBlockChallenge);
    room.respond(0, Response::Pass).unwrap();
    assert_eq!(room.seats[0].coins, 2, "the blocked aid never pays out");
    assert_eq!(room.current_seat, 1);
}

#[test]
fn assassinate_block_challenged_and_sustained() {
    let mut room = four_player_room();
    room.seats[0].hand = vec![Role::Assassin, Role::Duke];
    room.seats[1].hand = vec![Role::Contessa, Role::Captain];
    room.seats[0].coins = 3;
    room.declare_action(0, Action::Assassinate, Some(1)).unwrap();
    assert_eq!(room.seats[0].coins, 0);

    room.respond(1, Response::Block).unwrap();
    assert_eq!(room.phase, Phase::AwaitingBlockChallenge);
    room.respond(0, Response::Challenge).unwrap();

    // Bob genuinely holds the Contessa, so the block is sustained and
    // Alice, the challenger, is the one who loses an influence.
    assert_eq!(room.phase, Phase::ChoosingInfluenceToLose);
    assert_eq!(room.pending.losing, Some(0));
    room.choose_lose_influence(0, Role::Duke).unwrap();

    assert_eq!(room.seats[1].hand.len(), 2, "Bob's revealed Contessa is replaced, not lost");
    assert_eq!(room.current_seat, 1);
    assert_eq!(room.seats[0].coins, 0, "the assassination cost is never refunded");
}

#[test]
fn coup_skips_response_phase() {
    let mut room = four_player_room();
    room.seats[0].coins = 8;
    room.declare_action(0, Action::Coup, Some(2)).unwrap();
    assert_eq!(room.seats[0].coins, 1);
    assert_eq!(room.phase, Phase::ChoosingInfluenceToLose);
    assert_eq!(room.pending.losing, Some(2));
    let card = room.seats[2].hand[0];
    room.choose_lose_influence(2, card).unwrap();
    assert_eq!(room.current_seat, 1);
}

#[test]
fn ten_coin_force() {
    let mut room = four_player_room();
    room.declare_action(0, Action::Income, None).unwrap();
    room.declare_action(1, Action::Income, None).unwrap();
    room.declare_action(2, Action::Income, None).unwrap();

    // Put Alice over the must-coup threshold before her turn comes
    // back around; the phase is only recomputed at turn entry.
    room.seats[0].coins = 10;
    room.declare_action(3, Action::Income, None).unwrap();

    assert_eq!(room.current_seat, 0);
    assert_eq!(room.phase, Phase::MustCoup);
    let err = room.declare_action(0, Action::Income, None).unwrap_err();
    assert_eq!(err, RoomError::MustCoup);

    room.declare_action(0, Action::Coup, Some(1)).unwrap();
    assert_eq!(room.seats[0].coins, 3);
    assert_eq!(room.phase, Phase::ChoosingInfluenceToLose);
}
