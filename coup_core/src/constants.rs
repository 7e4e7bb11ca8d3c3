//! Fixed game configuration: the things the rules book nails down rather
//! than something a table operator would ever want to tune.
//!
//! Modeled as module-level constants rather than a runtime-configured
//! singleton — there is exactly one Coup ruleset, unlike blind structures
//! or buy-ins which vary per table.

use crate::room::entities::Role;

/// Seats per room. The spec fixes this at four; it is not a tunable.
pub const SEAT_COUNT: usize = 4;

/// Copies of each role in the shared deck.
pub const COPIES_PER_ROLE: usize = 3;

/// Influence cards dealt to each seat at the start of a game.
pub const STARTING_HAND_SIZE: usize = 2;

/// Coins a seat starts a game with.
pub const STARTING_COINS: u32 = 2;

/// Coin count at or above which a seat must Coup on their turn.
pub const MUST_COUP_THRESHOLD: u32 = 10;

/// All five roles in the standard deck, in a fixed order used to build
/// a fresh shuffled deck.
pub const ALL_ROLES: [Role; 5] = [
    Role::Duke,
    Role::Captain,
    Role::Assassin,
    Role::Ambassador,
    Role::Contessa,
];
