//! The room's finite-state machine phases and the transient sub-protocol
//! fields carried between them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::room::action::Action;
use crate::room::entities::Role;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Phase {
    WaitingForPlayers,
    AwaitingAction,
    MustCoup,
    SelectingTarget,
    AwaitingResponse,
    AwaitingBlockChallenge,
    ChoosingInfluenceToLose,
    AmbassadorExchange,
    GameOver,
}

/// Where the FSM goes once `pending.losing` finishes choosing a card.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PostLoss {
    ExecuteAction,
    NextTurn,
}

/// Transient sub-protocol state, valid only while a declared action is
/// working its way through challenge/block/resolution. Cleared in full
/// at every `next_turn` boundary (see [`Pending::clear`]).
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Pending {
    pub action: Option<Action>,
    pub actor: Option<usize>,
    pub target: Option<usize>,
    pub responders: BTreeSet<usize>,
    pub passed: BTreeSet<usize>,
    pub blocker: Option<usize>,
    pub challenger: Option<usize>,
    pub losing: Option<usize>,
    pub post_loss: Option<PostLoss>,
    pub exchange_pool: Vec<Role>,
    pub exchange_keep_count: usize,
}

impl Pending {
    /// Null out every transient field. Called defensively at every
    /// turn boundary so no sub-protocol state carries over to the next
    /// turn.
    pub fn clear(&mut self) {
        *self = Pending::default();
    }
}
