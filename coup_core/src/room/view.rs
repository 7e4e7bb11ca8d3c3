//! Pure projection from room state to what one seat is allowed to see.
//!
//! A view never leaks another seat's hand. The acting seat's own hand is
//! always visible; every other seat is reduced to its public facts
//! (name, coin count, how many cards remain) plus whatever the current
//! sub-protocol legitimately reveals (a just-lost card moves to the
//! discard pile, which is public).

use serde::Serialize;

use crate::room::action::Action;
use crate::room::engine::Room;
use crate::room::entities::Role;
use crate::room::phase::Phase;

/// The one decision, if any, this viewer is empowered to make right
/// now. Every other seat's `/state` read gets [`UiContext::None`] even
/// while the room itself is mid sub-protocol.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind")]
pub enum UiContext {
    None,
    SelectingTarget { action: Action },
    BroadcastResponse { action: Action, can_challenge: bool, can_block: bool },
    ChallengeBlock,
    LoseInfluence { cards: Vec<Role> },
    AmbassadorExchange { cards: Vec<Role>, num_to_keep: usize },
}

#[derive(Clone, Debug, Serialize)]
pub struct SeatView {
    pub id: usize,
    pub name: String,
    pub coins: u32,
    pub hand_size: usize,
    /// Only populated for the viewing seat itself.
    pub hand: Option<Vec<Role>>,
    pub eliminated: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct PendingView {
    pub action: Option<String>,
    pub actor: Option<usize>,
    pub target: Option<usize>,
    pub responders: Vec<usize>,
    pub passed: Vec<usize>,
    pub blocker: Option<usize>,
    pub challenger: Option<usize>,
    pub losing: Option<usize>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RoomView {
    pub room_id: u64,
    pub you: usize,
    pub phase: Phase,
    pub current_seat: usize,
    pub message: String,
    pub seats: Vec<SeatView>,
    pub discard: Vec<Role>,
    pub deck_remaining: usize,
    pub pending: PendingView,
    /// Present only while `you` is the seat deciding what to keep in an
    /// ambassador exchange.
    pub exchange_pool: Option<Vec<Role>>,
    /// The only decision this viewer may make right now, or `None`.
    pub ui_context: UiContext,
}

impl Room {
    /// Build the sanitized view for `viewer_seat`. Returns an error-free
    /// view even for a seat id past `self.seats.len()`, since a seat that
    /// has not joined yet (room still in `waiting-for-players`) is a
    /// normal, expected caller.
    #[must_use]
    pub fn view_for(&self, viewer_seat: usize) -> RoomView {
        let seats = self
            .seats
            .iter()
            .map(|seat| SeatView {
                id: seat.id,
                name: seat.name.clone(),
                coins: seat.coins,
                hand_size: seat.hand.len(),
                hand: (seat.id == viewer_seat).then(|| seat.hand.clone()),
                eliminated: seat.eliminated(),
            })
            .collect();

        let exchange_pool = (self.phase == Phase::AmbassadorExchange
            && self.pending.actor == Some(viewer_seat))
        .then(|| self.pending.exchange_pool.clone());

        let ui_context = self.ui_context_for(viewer_seat);

        RoomView {
            room_id: self.id,
            you: viewer_seat,
            phase: self.phase,
            current_seat: self.current_seat,
            message: self.message.clone(),
            seats,
            discard: self.discard.clone(),
            deck_remaining: self.deck.len(),
            pending: PendingView {
                action: self.pending.action.map(|a| format!("{a:?}")),
                actor: self.pending.actor,
                target: self.pending.target,
                responders: self.pending.responders.iter().copied().collect(),
                passed: self.pending.passed.iter().copied().collect(),
                blocker: self.pending.blocker,
                challenger: self.pending.challenger,
                losing: self.pending.losing,
            },
            exchange_pool,
            ui_context,
        }
    }

    /// Per §4.6: the tagged decision owed to `viewer_seat` right now, or
    /// `UiContext::None` if this seat has nothing to do.
    fn ui_context_for(&self, viewer_seat: usize) -> UiContext {
        match self.phase {
            Phase::SelectingTarget if self.pending.actor == Some(viewer_seat) => {
                if let Some(action) = self.pending.action {
                    return UiContext::SelectingTarget { action };
                }
                UiContext::None
            }
            Phase::AwaitingResponse
                if self.pending.responders.contains(&viewer_seat)
                    && !self.pending.passed.contains(&viewer_seat) =>
            {
                if let Some(action) = self.pending.action {
                    let meta = action.metadata();
                    UiContext::BroadcastResponse {
                        action,
                        can_challenge: meta.challengeable,
                        can_block: !meta.blockable_by.is_empty(),
                    }
                } else {
                    UiContext::None
                }
            }
            Phase::AwaitingBlockChallenge if self.pending.actor == Some(viewer_seat) => {
                UiContext::ChallengeBlock
            }
            Phase::ChoosingInfluenceToLose if self.pending.losing == Some(viewer_seat) => {
                let cards = self
                    .seats
                    .get(viewer_seat)
                    .map(|s| s.hand.clone())
                    .unwrap_or_default();
                UiContext::LoseInfluence { cards }
            }
            Phase::AmbassadorExchange if self.pending.actor == Some(viewer_seat) => {
                UiContext::AmbassadorExchange {
                    cards: self.pending.exchange_pool.clone(),
                    num_to_keep: self.pending.exchange_keep_count,
                }
            }
            _ => UiContext::None,
        }
    }
}
