//! The three-way reply a responder or an actor-under-block gives.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Response {
    Pass,
    Challenge,
    Block,
}
