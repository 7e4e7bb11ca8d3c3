//! Domain errors for room operations.
//!
//! Mirrors the split the spec draws in §7: [`RoomError`] variants other
//! than [`RoomError::Invariant`] are "out-of-turn or out-of-phase"
//! rejections — the request is silently absorbed by the caller (the
//! FSM does not change phase, `message` narrates the reason) rather
//! than treated as exceptional. [`RoomError::Invariant`] is the one
//! kind that represents a genuine bug.

use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum RoomError {
    #[error("room is full")]
    RoomFull,
    #[error("room already has four seated players")]
    NotWaitingForPlayers,
    #[error("seat {0} does not exist")]
    UnknownSeat(usize),
    #[error("it is not seat {0}'s turn")]
    OutOfTurn(usize),
    #[error("action not accepted in the current phase")]
    WrongPhase,
    #[error("insufficient coins for this action")]
    InsufficientCoins,
    #[error("must-coup: only Coup is accepted at 10+ coins")]
    MustCoup,
    #[error("cannot target self")]
    CannotTargetSelf,
    #[error("cannot target an eliminated seat")]
    TargetEliminated,
    #[error("seat {0} is not a valid responder right now")]
    NotAResponder(usize),
    #[error("block is not offered for this action")]
    BlockNotOffered,
    #[error("only the actor may respond to a declared block")]
    NotTheActor,
    #[error("seat {0} is not the one choosing an influence to lose")]
    NotLosing(usize),
    #[error("invalid ambassador selection")]
    InvalidAmbassadorSelection,
    #[error("game is already over")]
    GameOver,
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, RoomError>;

/// Errors raised above the single-room FSM: routing a request to a room
/// and a seat at all, before any [`RoomError`] rejection can apply.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ManagerError {
    #[error("no such room")]
    UnknownRoom,
    #[error("player is not seated in this room")]
    UnknownPlayer,
    #[error(transparent)]
    Room(#[from] RoomError),
}

pub type ManagerResult<T> = std::result::Result<T, ManagerError>;
