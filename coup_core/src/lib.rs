//! # Coup Rooms
//!
//! A server-side engine for the bluffing card game Coup: four seats,
//! one table, and a finite-state machine that adjudicates the
//! challenge/block sub-protocol between a declared action and its
//! resolution.
//!
//! ## Core modules
//!
//! - [`room`]: the per-table FSM — entities, the action taxonomy,
//!   phases, and the per-seat view projection.
//! - [`manager`]: matchmaking across many rooms, player-to-seat
//!   routing, and idle-room eviction.
//! - [`net`]: wire-level request/response shapes for the HTTP surface.
//! - [`errors`]: the error types both layers return.
//!
//! ## Example
//!
//! ```
//! use coup_core::room::{Action, Room};
//!
//! let mut room = Room::new(1);
//! for name in ["Alice", "Bob", "Carol", "Dan"] {
//!     room.join(name.to_string()).unwrap();
//! }
//! room.declare_action(0, Action::Income, None).unwrap();
//! assert_eq!(room.view_for(0).seats[0].coins, 3);
//! ```

pub mod constants;
pub mod errors;
pub mod manager;
pub mod net;
pub mod room;

pub use errors::{ManagerError, ManagerResult, Result, RoomError};
pub use manager::{ActionRequest, RoomManager};
pub use room::{Action, Phase, Role, Room, RoomView, Seat};
