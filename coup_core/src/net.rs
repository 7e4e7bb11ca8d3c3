//! Wire-level request and response shapes for the four HTTP endpoints.
//! Kept alongside the engine rather than in the server crate so the
//! server only has to translate HTTP framing, not game semantics.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::manager::ActionRequest;
use crate::room::{Action, Response, Role};

#[derive(Clone, Debug, Deserialize)]
pub struct MatchmakeRequest {
    pub name: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct MatchmakeResponse {
    pub player_id: Uuid,
    pub game_id: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StateQuery {
    pub player_id: Uuid,
    pub game_id: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QuitRequest {
    pub player_id: Uuid,
    pub game_id: u64,
}

/// The five shapes an `/action` request can take, tagged on the wire by
/// `type` the same way the teacher's `ActionPayload` tags a poker move.
/// Field names otherwise follow the wire vocabulary directly:
/// `target_id` for a seat target, `card`/`cards` for role choices.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ActionPayload {
    Declare {
        action: Action,
        #[serde(default)]
        target_id: Option<usize>,
    },
    SelectTarget {
        target_id: usize,
    },
    Respond {
        response: Response,
    },
    LoseInfluence {
        card: Role,
    },
    ConfirmExchange {
        cards: Vec<Role>,
    },
}

impl From<ActionPayload> for ActionRequest {
    fn from(payload: ActionPayload) -> Self {
        match payload {
            ActionPayload::Declare { action, target_id } => {
                ActionRequest::Declare { action, target: target_id }
            }
            ActionPayload::SelectTarget { target_id } => ActionRequest::SelectTarget { target: target_id },
            ActionPayload::Respond { response } => ActionRequest::Respond { response },
            ActionPayload::LoseInfluence { card } => ActionRequest::LoseInfluence { role: card },
            ActionPayload::ConfirmExchange { cards } => ActionRequest::ConfirmExchange { kept: cards },
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ActionRequestEnvelope {
    pub player_id: Uuid,
    pub game_id: u64,
    #[serde(flatten)]
    pub payload: ActionPayload,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct OkResponse {
    pub status: &'static str,
}

impl Default for OkResponse {
    fn default() -> Self {
        Self { status: "ok" }
    }
}
