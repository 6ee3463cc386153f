//! JSON bodies exchanged between the screening client and the judging service.

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Action, Decision, Guest, GuestId, Verdict},
    error::PayloadError,
};

/// Body of `GET /api/next-guest`.
///
/// Every field is optional on the wire so a client can tell a malformed
/// success apart from a transport failure; [`Guest::try_from`] enforces
/// presence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facts: Option<Vec<String>>,
}

impl From<Guest> for GuestResponse {
    fn from(guest: Guest) -> Self {
        Self {
            guest_id: Some(guest.id.0),
            name: Some(guest.name),
            introduction: Some(guest.introduction),
            facts: Some(guest.facts),
        }
    }
}

impl TryFrom<GuestResponse> for Guest {
    type Error = PayloadError;

    fn try_from(value: GuestResponse) -> Result<Self, Self::Error> {
        let guest_id = value
            .guest_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(PayloadError::MissingField("guestId"))?;
        let name = value.name.ok_or(PayloadError::MissingField("name"))?;
        let introduction = value
            .introduction
            .ok_or(PayloadError::MissingField("introduction"))?;
        let facts = value.facts.ok_or(PayloadError::MissingField("facts"))?;
        Ok(Guest {
            id: GuestId(guest_id),
            name,
            introduction,
            facts,
        })
    }
}

/// Body of `POST /api/authorize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeRequest {
    pub guest_id: GuestId,
    pub action: Action,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizeResponse {
    pub correct: bool,
    pub message: String,
    /// Whether the guest was actually admissible. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<bool>,
}

impl From<Decision> for AuthorizeRequest {
    fn from(decision: Decision) -> Self {
        Self {
            guest_id: decision.guest_id,
            action: decision.action,
        }
    }
}

impl From<AuthorizeResponse> for Verdict {
    fn from(value: AuthorizeResponse) -> Self {
        Self {
            correct: value.correct,
            message: value.message,
        }
    }
}

/// Failure body; `detail` is shown to the operator verbatim when present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub detail: Option<String>,
}
