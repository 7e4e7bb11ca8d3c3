//! The room: the four seats at a table plus the finite-state machine that
//! adjudicates a single game of Coup between them.

use crate::constants::{MUST_COUP_THRESHOLD, SEAT_COUNT};
use crate::errors::{Result, RoomError};
use crate::room::action::Action;
use crate::room::entities::{Deck, Role, Seat};
use crate::room::phase::{Pending, Phase, PostLoss};
use crate::room::response::Response;

/// A single table. Lives behind `Arc<Mutex<_>>` in the manager; every
/// method here takes `&mut self` and assumes the caller already holds
/// that lock, so no method suspends and none needs to be `async`.
#[derive(Clone, Debug)]
pub struct Room {
    pub id: u64,
    pub seats: Vec<Seat>,
    pub deck: Deck,
    pub discard: Vec<Role>,
    pub phase: Phase,
    pub current_seat: usize,
    pub pending: Pending,
    pub message: String,
}

impl Room {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id,
            seats: Vec::with_capacity(SEAT_COUNT),
            deck: Deck::new_shuffled(),
            discard: Vec::new(),
            phase: Phase::WaitingForPlayers,
            current_seat: 0,
            pending: Pending::default(),
            message: "waiting for players".to_string(),
        }
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.seats.len() == SEAT_COUNT
    }

    fn seat(&self, id: usize) -> Result<&Seat> {
        self.seats.get(id).ok_or(RoomError::UnknownSeat(id))
    }

    fn seat_mut(&mut self, id: usize) -> Result<&mut Seat> {
        self.seats.get_mut(id).ok_or(RoomError::UnknownSeat(id))
    }

    fn alive_seat_ids(&self) -> Vec<usize> {
        self.seats
            .iter()
            .filter(|s| !s.eliminated())
            .map(|s| s.id)
            .collect()
    }

    // ---- joining / leaving --------------------------------------------

    /// Seat a new player. Only accepted while the room has open seats.
    pub fn join(&mut self, name: String) -> Result<usize> {
        if self.seats.len() >= SEAT_COUNT {
            return Err(RoomError::RoomFull);
        }
        if self.phase != Phase::WaitingForPlayers {
            return Err(RoomError::NotWaitingForPlayers);
        }
        let id = self.seats.len();
        self.seats.push(Seat::new(id, name));
        if self.seats.len() == SEAT_COUNT {
            self.deal_hands();
            self.enter_awaiting_action(0);
        }
        Ok(id)
    }

    fn deal_hands(&mut self) {
        for seat in &mut self.seats {
            for _ in 0..2 {
                if let Some(role) = self.deck.draw() {
                    seat.hand.push(role);
                }
            }
        }
    }

    /// A seat leaves the game, at any point. Before four seats have
    /// joined this just drops the roster entry (seat ids below the
    /// departing one are unaffected, later ones shift down — the
    /// roster is an ordered join list, not a fixed-width table, until
    /// the room fills). Once the game is underway the seat stays in
    /// place, forfeits its hand back to the deck, and the FSM is
    /// nudged exactly as far as it needs to go to stop waiting on a
    /// seat that is never coming back.
    pub fn quit(&mut self, seat_id: usize) -> Result<()> {
        if seat_id >= self.seats.len() {
            return Err(RoomError::UnknownSeat(seat_id));
        }
        if self.phase == Phase::WaitingForPlayers {
            self.seats.remove(seat_id);
            for (new_id, seat) in self.seats.iter_mut().enumerate() {
                seat.id = new_id;
            }
            return Ok(());
        }
        if self.phase == Phase::GameOver {
            return Ok(());
        }

        let hand = std::mem::take(&mut self.seats[seat_id].hand);
        self.deck.return_many_and_reshuffle(hand);
        self.seats[seat_id].coins = 0;

        if self.alive_seat_ids().len() <= 1 {
            self.finish_game();
            return Ok(());
        }

        if self.phase == Phase::AwaitingResponse && self.pending.responders.contains(&seat_id) {
            self.pending.responders.remove(&seat_id);
            self.pending.passed.remove(&seat_id);
            if self.pending.passed.is_superset(&self.pending.responders) {
                self.execute_action();
            }
            return Ok(());
        }

        if self.current_seat == seat_id {
            self.next_turn();
            return Ok(());
        }

        if self.pending.losing == Some(seat_id) {
            self.resolve_loss();
            return Ok(());
        }

        if self.pending.blocker == Some(seat_id) {
            self.pending.blocker = None;
            self.pending.challenger = None;
            self.execute_action();
            return Ok(());
        }

        Ok(())
    }

    // ---- turn prologue / epilogue --------------------------------------

    fn enter_awaiting_action(&mut self, seat_id: usize) {
        self.current_seat = seat_id;
        self.pending.clear();
        let coins = self.seats[seat_id].coins;
        if coins >= MUST_COUP_THRESHOLD {
            self.phase = Phase::MustCoup;
            self.message = format!(
                "{} has {} coins and must Coup",
                self.seats[seat_id].name, coins
            );
        } else {
            self.phase = Phase::AwaitingAction;
            self.message = format!("{}'s turn", self.seats[seat_id].name);
        }
    }

    fn finish_game(&mut self) {
        self.phase = Phase::GameOver;
        self.pending.clear();
        self.message = match self.alive_seat_ids().as_slice() {
            [winner] => format!("{} wins", self.seats[*winner].name),
            _ => "the game has ended with no winner".to_string(),
        };
    }

    fn next_turn(&mut self) {
        self.pending.clear();
        let alive = self.alive_seat_ids();
        if alive.len() <= 1 {
            self.finish_game();
            return;
        }
        let mut next = (self.current_seat + 1) % self.seats.len();
        while self.seats[next].eliminated() {
            next = (next + 1) % self.seats.len();
        }
        self.enter_awaiting_action(next);
    }

    // ---- declaring an action --------------------------------------------

    pub fn declare_action(&mut self, seat_id: usize, action: Action, target: Option<usize>) -> Result<()> {
        if self.phase == Phase::GameOver {
            return Err(RoomError::GameOver);
        }
        if self.phase == Phase::MustCoup && action != Action::Coup {
            return Err(RoomError::MustCoup);
        }
        if self.phase != Phase::AwaitingAction && self.phase != Phase::MustCoup {
            return Err(RoomError::WrongPhase);
        }
        if seat_id != self.current_seat {
            return Err(RoomError::OutOfTurn(self.current_seat));
        }

        let meta = action.metadata();
        if self.seat(seat_id)?.coins < meta.cost {
            return Err(RoomError::InsufficientCoins);
        }

        if action.is_targeted() {
            if let Some(target_id) = target {
                self.validate_target(seat_id, target_id)?;
            }
        }

        self.seat_mut(seat_id)?.coins -= meta.cost;
        self.pending.action = Some(action);
        self.pending.actor = Some(seat_id);

        if action.is_targeted() {
            match target {
                Some(target_id) => {
                    self.pending.target = Some(target_id);
                    self.message = format!(
                        "{} declares {:?} against {}",
                        self.seats[seat_id].name, action, self.seats[target_id].name
                    );
                    self.enter_response_phase();
                }
                None => {
                    self.message = format!(
                        "{} declares {:?}, choosing a target",
                        self.seats[seat_id].name, action
                    );
                    self.phase = Phase::SelectingTarget;
                }
            }
        } else {
            self.message = format!("{} declares {:?}", self.seats[seat_id].name, action);
            self.enter_response_phase();
        }
        Ok(())
    }

    fn validate_target(&self, actor: usize, target: usize) -> Result<()> {
        if target == actor {
            return Err(RoomError::CannotTargetSelf);
        }
        let target_seat = self.seat(target)?;
        if target_seat.eliminated() {
            return Err(RoomError::TargetEliminated);
        }
        Ok(())
    }

    /// A separate request used only when a client submits the target
    /// after the fact rather than bundled with the declare-action call;
    /// the core logic is identical to the targeted branch of
    /// `declare_action` above.
    pub fn select_target(&mut self, seat_id: usize, target: usize) -> Result<()> {
        if self.phase != Phase::SelectingTarget {
            return Err(RoomError::WrongPhase);
        }
        if seat_id != self.current_seat {
            return Err(RoomError::OutOfTurn(self.current_seat));
        }
        if self.pending.target.is_some() {
            return Err(RoomError::WrongPhase);
        }
        self.validate_target(seat_id, target)?;
        self.pending.target = Some(target);
        self.enter_response_phase();
        Ok(())
    }

    /// Computes the responder set for the pending action and either
    /// resolves it immediately (unblockable, unchallengeable actions,
    /// or an empty responder set) or moves to `awaiting-response`.
    fn enter_response_phase(&mut self) {
        let action = self.pending.action.expect("pending action set");
        let meta = action.metadata();
        let actor = self.pending.actor.expect("pending actor set");

        if !meta.challengeable && meta.blockable_by.is_empty() {
            self.execute_action();
            return;
        }

        let responders: std::collections::BTreeSet<usize> = if meta.targeted {
            let target = self.pending.target.expect("pending target set");
            std::iter::once(target).collect()
        } else {
            self.seats
                .iter()
                .filter(|s| s.id != actor && !s.eliminated())
                .map(|s| s.id)
                .collect()
        };

        if responders.is_empty() {
            self.execute_action();
            return;
        }

        self.pending.responders = responders;
        self.pending.passed.clear();
        self.phase = Phase::AwaitingResponse;
    }

    // ---- responding to the declared action ------------------------------

    pub fn respond(&mut self, seat_id: usize, response: Response) -> Result<()> {
        match self.phase {
            Phase::AwaitingResponse => self.respond_to_action(seat_id, response),
            Phase::AwaitingBlockChallenge => self.respond_to_block(seat_id, response),
            _ => Err(RoomError::WrongPhase),
        }
    }

    fn respond_to_action(&mut self, seat_id: usize, response: Response) -> Result<()> {
        if !self.pending.responders.contains(&seat_id) {
            return Err(RoomError::NotAResponder(seat_id));
        }
        let action = self.pending.action.expect("pending action set");
        let meta = action.metadata();

        match response {
            Response::Pass => {
                self.pending.passed.insert(seat_id);
                self.message = format!("{} passes", self.seats[seat_id].name);
                if self.pending.passed.is_superset(&self.pending.responders) {
                    self.execute_action();
                }
                Ok(())
            }
            Response::Challenge => {
                if !meta.challengeable {
                    return Err(RoomError::NotAResponder(seat_id));
                }
                self.pending.challenger = Some(seat_id);
                self.resolve_action_challenge();
                Ok(())
            }
            Response::Block => {
                if meta.blockable_by.is_empty() {
                    return Err(RoomError::BlockNotOffered);
                }
                self.pending.blocker = Some(seat_id);
                self.message = format!("{} blocks", self.seats[seat_id].name);
                self.phase = Phase::AwaitingBlockChallenge;
                Ok(())
            }
        }
    }

    fn respond_to_block(&mut self, seat_id: usize, response: Response) -> Result<()> {
        let actor = self.pending.actor.expect("pending actor set");
        if seat_id != actor {
            return Err(RoomError::NotTheActor);
        }
        match response {
            Response::Pass => {
                self.message = format!("{} lets the block stand", self.seats[actor].name);
                self.next_turn();
                Ok(())
            }
            Response::Challenge => {
                self.pending.challenger = Some(actor);
                self.resolve_block_challenge();
                Ok(())
            }
            Response::Block => Err(RoomError::WrongPhase),
        }
    }

    /// §4.2.1 — the actor's claim on the declared action is challenged.
    fn resolve_action_challenge(&mut self) {
        let actor = self.pending.actor.expect("pending actor set");
        let challenger = self.pending.challenger.expect("challenger set");
        let action = self.pending.action.expect("pending action set");
        let character = action.metadata().character.expect("challengeable action has a character");

        if self.seats[actor].has_role(character) {
            self.message = format!(
                "{} reveals {character} and survives the challenge from {}",
                self.seats[actor].name, self.seats[challenger].name
            );
            self.swap_revealed_card(actor, character);
            self.pending.losing = Some(challenger);
            self.pending.post_loss = Some(PostLoss::ExecuteAction);
        } else {
            self.message = format!(
                "{} cannot reveal {character} and was bluffing",
                self.seats[actor].name
            );
            self.pending.losing = Some(actor);
            self.pending.post_loss = Some(PostLoss::NextTurn);
        }
        self.phase = Phase::ChoosingInfluenceToLose;
    }

    /// §4.2.2 — the block itself is challenged.
    fn resolve_block_challenge(&mut self) {
        let actor = self.pending.actor.expect("pending actor set");
        let blocker = self.pending.blocker.expect("blocker set");
        let action = self.pending.action.expect("pending action set");
        let claimed = action.metadata().blockable_by;

        let proven = claimed.iter().copied().find(|r| self.seats[blocker].has_role(*r));
        if let Some(role) = proven {
            self.message = format!(
                "{} reveals {role} and the block holds",
                self.seats[blocker].name
            );
            self.swap_revealed_card(blocker, role);
            self.pending.losing = Some(actor);
            self.pending.post_loss = Some(PostLoss::NextTurn);
        } else {
            self.message = format!(
                "{} cannot prove the block and was bluffing",
                self.seats[blocker].name
            );
            self.pending.losing = Some(blocker);
            self.pending.post_loss = Some(PostLoss::ExecuteAction);
        }
        self.phase = Phase::ChoosingInfluenceToLose;
    }

    /// Returns a revealed card to the deck and draws a fresh replacement
    /// so hand size is preserved.
    fn swap_revealed_card(&mut self, seat_id: usize, role: Role) {
        self.seats[seat_id].remove_role(role);
        self.deck.return_and_reshuffle(role);
        if let Some(replacement) = self.deck.draw() {
            self.seats[seat_id].hand.push(replacement);
        }
    }

    // ---- losing an influence --------------------------------------------

    pub fn choose_lose_influence(&mut self, seat_id: usize, role: Role) -> Result<()> {
        if self.phase != Phase::ChoosingInfluenceToLose {
            return Err(RoomError::WrongPhase);
        }
        if self.pending.losing != Some(seat_id) {
            return Err(RoomError::NotLosing(seat_id));
        }
        let seat = self.seat_mut(seat_id)?;
        let chosen = if seat.has_role(role) {
            role
        } else {
            seat.hand.first().copied().ok_or_else(|| {
                RoomError::Invariant(format!("seat {seat_id} has no influence to lose"))
            })?
        };
        self.seats[seat_id].remove_role(chosen);
        self.discard.push(chosen);
        self.message = format!("{} loses their {chosen}", self.seats[seat_id].name);
        self.resolve_loss();
        Ok(())
    }

    /// Common tail shared by an explicit card choice and a quitting
    /// seat whose hand is already empty: dispatch to whatever the
    /// pending sub-protocol decided should happen next.
    fn resolve_loss(&mut self) {
        match self.pending.post_loss {
            Some(PostLoss::ExecuteAction) => self.execute_action(),
            Some(PostLoss::NextTurn) => self.next_turn(),
            None => {}
        }
    }

    // ---- executing the resolved action ----------------------------------

    fn execute_action(&mut self) {
        let action = self.pending.action.expect("pending action set");
        let actor = self.pending.actor.expect("pending actor set");

        match action {
            Action::Income => {
                self.seats[actor].coins += 1;
                self.message = format!("{} takes Income", self.seats[actor].name);
                self.next_turn();
            }
            Action::ForeignAid => {
                self.seats[actor].coins += 2;
                self.message = format!("{} takes Foreign Aid", self.seats[actor].name);
                self.next_turn();
            }
            Action::Tax => {
                self.seats[actor].coins += 3;
                self.message = format!("{} collects Tax", self.seats[actor].name);
                self.next_turn();
            }
            Action::Steal => {
                let target = self.pending.target.expect("steal has a target");
                let taken = self.seats[target].coins.min(2);
                self.seats[target].coins -= taken;
                self.seats[actor].coins += taken;
                self.message = format!(
                    "{} steals {} coins from {}",
                    self.seats[actor].name, taken, self.seats[target].name
                );
                self.next_turn();
            }
            Action::Coup => {
                let target = self.pending.target.expect("coup has a target");
                self.message = format!(
                    "{} launches a coup against {}",
                    self.seats[actor].name, self.seats[target].name
                );
                self.pending.losing = Some(target);
                self.pending.post_loss = Some(PostLoss::NextTurn);
                self.phase = Phase::ChoosingInfluenceToLose;
            }
            Action::Assassinate => {
                let target = self.pending.target.expect("assassinate has a target");
                self.message = format!(
                    "{} assassinates {}",
                    self.seats[actor].name, self.seats[target].name
                );
                self.pending.losing = Some(target);
                self.pending.post_loss = Some(PostLoss::NextTurn);
                self.phase = Phase::ChoosingInfluenceToLose;
            }
            Action::Exchange => {
                self.begin_ambassador_exchange(actor);
            }
        }
    }

    fn begin_ambassador_exchange(&mut self, actor: usize) {
        let keep_count = self.seats[actor].hand.len();
        let mut pool = std::mem::take(&mut self.seats[actor].hand);
        for _ in 0..2 {
            if let Some(role) = self.deck.draw() {
                pool.push(role);
            }
        }
        self.pending.exchange_pool = pool;
        self.pending.exchange_keep_count = keep_count;
        self.message = format!("{} exchanges cards with the deck", self.seats[actor].name);
        self.phase = Phase::AmbassadorExchange;
    }

    /// The actor picks which cards to keep from the exchange pool; the
    /// rest return to the deck and it is reshuffled.
    pub fn confirm_exchange(&mut self, seat_id: usize, kept: Vec<Role>) -> Result<()> {
        if self.phase != Phase::AmbassadorExchange {
            return Err(RoomError::WrongPhase);
        }
        let actor = self.pending.actor.expect("pending actor set");
        if seat_id != actor {
            return Err(RoomError::NotTheActor);
        }
        if kept.len() != self.pending.exchange_keep_count {
            return Err(RoomError::InvalidAmbassadorSelection);
        }

        let mut pool = self.pending.exchange_pool.clone();
        for role in &kept {
            let Some(idx) = pool.iter().position(|r| r == role) else {
                return Err(RoomError::InvalidAmbassadorSelection);
            };
            pool.remove(idx);
        }

        self.seats[actor].hand = kept;
        self.deck.return_many_and_reshuffle(pool);
        self.message = format!("{} keeps their new hand", self.seats[actor].name);
        self.next_turn();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_player_room() -> Room {
        let mut room = Room::new(1);
        for name in ["A", "B", "C", "D"] {
            room.join(name.to_string()).unwrap();
        }
        room
    }

    #[test]
    fn room_starts_awaiting_action_once_full() {
        let room = four_player_room();
        assert!(matches!(room.phase, Phase::AwaitingAction | Phase::MustCoup));
        assert_eq!(room.current_seat, 0);
        for seat in &room.seats {
            assert_eq!(seat.hand.len(), 2);
            assert_eq!(seat.coins, 2);
        }
        assert_eq!(room.deck.len(), 7);
    }

    #[test]
    fn income_resolves_immediately_and_advances_turn() {
        let mut room = four_player_room();
        room.declare_action(0, Action::Income, None).unwrap();
        assert_eq!(room.seats[0].coins, 3);
        assert_eq!(room.current_seat, 1);
        assert!(matches!(room.phase, Phase::AwaitingAction | Phase::MustCoup));
    }

    #[test]
    fn coup_costs_seven_and_skips_response_phase() {
        let mut room = four_player_room();
        room.seats[0].coins = 7;
        room.declare_action(0, Action::Coup, Some(1)).unwrap();
        assert_eq!(room.seats[0].coins, 0);
        assert_eq!(room.phase, Phase::ChoosingInfluenceToLose);
        assert_eq!(room.pending.losing, Some(1));
    }

    #[test]
    fn must_coup_rejects_other_actions_at_ten_coins() {
        let mut room = four_player_room();
        room.seats[0].coins = 10;
        room.enter_awaiting_action(0);
        assert_eq!(room.phase, Phase::MustCoup);
        let err = room.declare_action(0, Action::Income, None).unwrap_err();
        assert_eq!(err, RoomError::MustCoup);
    }

    #[test]
    fn foreign_aid_can_be_blocked_by_duke_claim() {
        let mut room = four_player_room();
        room.declare_action(0, Action::ForeignAid, None).unwrap();
        assert_eq!(room.phase, Phase::AwaitingResponse);
        room.respond(1, Response::Block).unwrap();
        assert_eq!(room.phase, Phase::AwaitingBlockChallenge);
        room.respond(0, Response::Pass).unwrap();
        assert_eq!(room.seats[0].coins, 2);
        assert_eq!(room.current_seat, 1);
    }

    #[test]
    fn tax_challenge_fails_bluff_loses_influence() {
        let mut room = four_player_room();
        room.seats[0].hand = vec![Role::Captain, Role::Assassin];
        room.declare_action(0, Action::Tax, None).unwrap();
        room.respond(1, Response::Challenge).unwrap();
        assert_eq!(room.phase, Phase::ChoosingInfluenceToLose);
        assert_eq!(room.pending.losing, Some(0));
        room.choose_lose_influence(0, Role::Captain).unwrap();
        assert_eq!(room.seats[0].coins, 2);
        assert_eq!(room.current_seat, 1);
    }

    #[test]
    fn tax_challenge_proven_true_loses_challenger_then_resolves() {
        let mut room = four_player_room();
        room.seats[0].hand = vec![Role::Duke, Role::Assassin];
        room.declare_action(0, Action::Tax, None).unwrap();
        room.respond(1, Response::Challenge).unwrap();
        assert_eq!(room.pending.losing, Some(1));
        room.choose_lose_influence(1, room.seats[1].hand[0]).unwrap();
        assert_eq!(room.seats[0].coins, 5);
        assert_eq!(room.current_seat, 1);
    }

    #[test]
    fn quit_mid_response_can_resolve_action_if_all_others_passed() {
        let mut room = four_player_room();
        room.declare_action(0, Action::ForeignAid, None).unwrap();
        room.respond(1, Response::Pass).unwrap();
        room.respond(2, Response::Pass).unwrap();
        room.quit(3).unwrap();
        assert_eq!(room.seats[0].coins, 4);
    }

    #[test]
    fn quit_by_current_seat_advances_turn() {
        let mut room = four_player_room();
        room.quit(0).unwrap();
        assert_eq!(room.current_seat, 1);
        assert!(room.seats[0].eliminated());
    }

    #[test]
    fn ambassador_exchange_round_trip() {
        let mut room = four_player_room();
        room.seats[0].hand = vec![Role::Duke, Role::Captain];
        room.declare_action(0, Action::Exchange, None).unwrap();
        room.respond(1, Response::Pass).unwrap();
        room.respond(2, Response::Pass).unwrap();
        room.respond(3, Response::Pass).unwrap();
        assert_eq!(room.phase, Phase::AmbassadorExchange);
        assert_eq!(room.pending.exchange_pool.len(), 4);
        let kept = vec![room.pending.exchange_pool[0], room.pending.exchange_pool[1]];
        room.confirm_exchange(0, kept.clone()).unwrap();
        assert_eq!(room.seats[0].hand, kept);
        assert_eq!(room.current_seat, 1);
    }

    #[test]
    fn steal_transfers_at_most_two_coins() {
        let mut room = four_player_room();
        room.seats[1].coins = 1;
        room.seats[0].hand = vec![Role::Captain, Role::Duke];
        room.declare_action(0, Action::Steal, Some(1)).unwrap();
        room.respond(1, Response::Pass).unwrap();
        assert_eq!(room.seats[0].coins, 3);
        assert_eq!(room.seats[1].coins, 0);
    }

    #[test]
    fn game_ends_when_one_seat_remains() {
        let mut room = four_player_room();
        room.quit(1).unwrap();
        room.quit(2).unwrap();
        room.quit(3).unwrap();
        assert_eq!(room.phase, Phase::GameOver);
    }
}
