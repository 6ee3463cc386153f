use async_trait::async_trait;
use shared::domain::{Action, Guest, GuestId, Verdict};

pub mod controller;
pub mod error;
mod score;
pub mod transport;

pub use controller::{ControllerState, InteractionController};
pub use error::ClientError;
pub use score::ScoreTracker;
pub use transport::HttpBouncerClient;

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Supplies the next guest waiting at the door.
///
/// A call after a failure is a fresh attempt; implementations make no
/// exactly-once promise.
#[async_trait]
pub trait GuestSource: Send + Sync {
    async fn fetch_next(&self) -> ClientResult<Guest>;
}

/// Judges whether the operator's decision about a guest was right.
#[async_trait]
pub trait DecisionOracle: Send + Sync {
    async fn authorize(&self, guest_id: &GuestId, action: Action) -> ClientResult<Verdict>;
}

/// Rendering boundary driven by [`InteractionController`].
///
/// Calls are made in transition order and never concurrently.
pub trait PresentationPort: Send + Sync {
    fn show_loading(&self);
    fn show_guest(&self, guest: &Guest);
    fn show_feedback(&self, message: &str);
    fn show_score(&self, correct: u32, total: u32);
    fn set_decision_enabled(&self, enabled: bool);
    fn show_next_available(&self, available: bool);
}

pub struct MissingGuestSource;

#[async_trait]
impl GuestSource for MissingGuestSource {
    async fn fetch_next(&self) -> ClientResult<Guest> {
        Err(ClientError::transport("guest source is unavailable"))
    }
}

pub struct MissingDecisionOracle;

#[async_trait]
impl DecisionOracle for MissingDecisionOracle {
    async fn authorize(&self, _guest_id: &GuestId, _action: Action) -> ClientResult<Verdict> {
        Err(ClientError::transport("decision oracle is unavailable"))
    }
}
