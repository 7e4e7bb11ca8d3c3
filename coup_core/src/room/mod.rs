//! The per-table game engine: entities, the action taxonomy, the FSM
//! itself, and the per-seat view projection over it.

pub mod action;
pub mod engine;
pub mod entities;
pub mod phase;
pub mod response;
pub mod view;

pub use action::{Action, ActionMetadata};
pub use engine::Room;
pub use entities::{Deck, Role, Seat};
pub use phase::{Pending, Phase, PostLoss};
pub use response::Response;
pub use view::{PendingView, RoomView, SeatView, UiContext};
