//! Pure data: roles, the shared deck, and per-seat state.

use std::fmt;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::constants::{ALL_ROLES, COPIES_PER_ROLE, STARTING_COINS, STARTING_HAND_SIZE};

/// One of the five characters in the standard Coup deck.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Role {
    Duke,
    Captain,
    Assassin,
    Ambassador,
    Contessa,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Duke => "Duke",
            Self::Captain => "Captain",
            Self::Assassin => "Assassin",
            Self::Ambassador => "Ambassador",
            Self::Contessa => "Contessa",
        };
        write!(f, "{repr}")
    }
}

/// The shared deck: a randomizable stack of role cards.
///
/// `draw` pops from the end; `return_and_reshuffle` appends then
/// reshuffles the whole remaining vector, never just the returned
/// cards, so the multiset stays uniformly permuted.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Deck {
    cards: Vec<Role>,
}

impl Deck {
    /// A freshly shuffled 15-card deck (three of each role).
    #[must_use]
    pub fn new_shuffled() -> Self {
        let mut cards = Vec::with_capacity(ALL_ROLES.len() * COPIES_PER_ROLE);
        for role in ALL_ROLES {
            for _ in 0..COPIES_PER_ROLE {
                cards.push(role);
            }
        }
        cards.shuffle(&mut rand::rng());
        Self { cards }
    }

    /// Draw the top card, if any remain.
    pub fn draw(&mut self) -> Option<Role> {
        self.cards.pop()
    }

    /// Return a card to the deck and reshuffle the whole deck uniformly.
    pub fn return_and_reshuffle(&mut self, role: Role) {
        self.cards.push(role);
        self.cards.shuffle(&mut rand::rng());
    }

    /// Return several cards at once, then reshuffle once.
    pub fn return_many_and_reshuffle(&mut self, roles: impl IntoIterator<Item = Role>) {
        self.cards.extend(roles);
        self.cards.shuffle(&mut rand::rng());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Immutable seat identity plus mutable per-game state.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Seat {
    pub id: usize,
    pub name: String,
    pub coins: u32,
    pub hand: Vec<Role>,
}

impl Seat {
    #[must_use]
    pub fn new(id: usize, name: String) -> Self {
        Self {
            id,
            name,
            coins: STARTING_COINS,
            hand: Vec::with_capacity(STARTING_HAND_SIZE),
        }
    }

    #[must_use]
    pub fn eliminated(&self) -> bool {
        self.hand.is_empty()
    }

    /// Remove one copy of `role` from this seat's hand, if held.
    pub fn remove_role(&mut self, role: Role) -> bool {
        if let Some(idx) = self.hand.iter().position(|r| *r == role) {
            self.hand.remove(idx);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.hand.contains(&role)
    }
}
