//! Session state machine: guest retrieval, decision submission, verdict and score.

use std::sync::Arc;

use shared::domain::{Action, Guest, Score};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{DecisionOracle, GuestSource, PresentationPort, ScoreTracker};

pub const PENDING_DECISION_MESSAGE: &str = "Checking with the robot...";
pub const GUEST_FETCH_FALLBACK: &str = "Unable to load guest. Try again.";
pub const DECISION_FALLBACK: &str = "The robot is unsure. Try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Nothing requested yet.
    Idle,
    Loading,
    /// A guest is on screen and awaits a decision.
    Ready,
    Submitting,
    /// Verdict shown; the operator may advance.
    Resolved,
    /// No guest could be loaded. Only a fresh `start` leaves this state.
    Error,
}

impl ControllerState {
    fn accepts_start(self) -> bool {
        !matches!(self, Self::Loading | Self::Submitting)
    }

    fn accepts_advance(self) -> bool {
        self == Self::Resolved
    }
}

struct SessionState {
    state: ControllerState,
    current_guest: Option<Guest>,
    score: ScoreTracker,
}

/// Owns one screening session.
///
/// Guards are checked and transitions applied under `inner`, which is never
/// held across a collaborator call. Because `Loading` and `Submitting` reject
/// every operation that would issue another call, at most one call is
/// outstanding and a verdict always lands before the next guest is requested.
pub struct InteractionController {
    guest_source: Arc<dyn GuestSource>,
    oracle: Arc<dyn DecisionOracle>,
    presenter: Arc<dyn PresentationPort>,
    inner: Mutex<SessionState>,
}

impl InteractionController {
    pub fn new(
        guest_source: Arc<dyn GuestSource>,
        oracle: Arc<dyn DecisionOracle>,
        presenter: Arc<dyn PresentationPort>,
    ) -> Self {
        Self {
            guest_source,
            oracle,
            presenter,
            inner: Mutex::new(SessionState {
                state: ControllerState::Idle,
                current_guest: None,
                score: ScoreTracker::new(),
            }),
        }
    }

    pub async fn state(&self) -> ControllerState {
        self.inner.lock().await.state
    }

    pub async fn score(&self) -> Score {
        self.inner.lock().await.score.snapshot()
    }

    pub async fn current_guest(&self) -> Option<Guest> {
        self.inner.lock().await.current_guest.clone()
    }

    /// Requests a guest. Ignored while a guest request or a decision is in flight.
    pub async fn start(&self) {
        self.load_guest(ControllerState::accepts_start).await;
    }

    /// Moves on to the next guest once the current verdict is shown.
    pub async fn advance(&self) {
        self.load_guest(ControllerState::accepts_advance).await;
    }

    pub async fn submit_decision(&self, action: Action) {
        let guest_id = {
            let mut inner = self.inner.lock().await;
            if inner.state != ControllerState::Ready {
                debug!(state = ?inner.state, %action, "decision ignored");
                return;
            }
            let Some(guest_id) = inner.current_guest.as_ref().map(|guest| guest.id.clone())
            else {
                debug!(%action, "decision ignored: no guest held");
                return;
            };
            inner.state = ControllerState::Submitting;
            self.presenter.set_decision_enabled(false);
            self.presenter.show_feedback(PENDING_DECISION_MESSAGE);
            guest_id
        };

        info!(guest_id = %guest_id, %action, "submitting decision");
        let result = self.oracle.authorize(&guest_id, action).await;

        let mut inner = self.inner.lock().await;
        match result {
            Ok(verdict) => {
                inner.score.record(&verdict);
                let score = inner.score.snapshot();
                info!(
                    guest_id = %guest_id,
                    correct = verdict.correct,
                    score_correct = score.correct,
                    score_total = score.total,
                    "verdict received"
                );
                self.presenter.show_score(score.correct, score.total);
                self.presenter.show_feedback(&verdict.message);
                self.presenter.show_next_available(true);
                inner.state = ControllerState::Resolved;
            }
            Err(error) => {
                warn!(guest_id = %guest_id, %error, "decision submission failed");
                self.presenter
                    .show_feedback(error.operator_message(DECISION_FALLBACK));
                self.presenter.set_decision_enabled(true);
                inner.state = ControllerState::Ready;
            }
        }
    }

    async fn load_guest(&self, accepts: fn(ControllerState) -> bool) {
        {
            let mut inner = self.inner.lock().await;
            if !accepts(inner.state) {
                debug!(state = ?inner.state, "guest request ignored");
                return;
            }
            inner.state = ControllerState::Loading;
            inner.current_guest = None;
            self.presenter.set_decision_enabled(false);
            self.presenter.show_next_available(false);
            self.presenter.show_loading();
        }

        let result = self.guest_source.fetch_next().await;

        let mut inner = self.inner.lock().await;
        match result {
            Ok(guest) => {
                info!(guest_id = %guest.id, facts = guest.facts.len(), "guest loaded");
                self.presenter.show_guest(&guest);
                self.presenter.set_decision_enabled(true);
                inner.current_guest = Some(guest);
                inner.state = ControllerState::Ready;
            }
            Err(error) => {
                warn!(%error, "failed to load guest");
                self.presenter
                    .show_feedback(error.operator_message(GUEST_FETCH_FALLBACK));
                inner.state = ControllerState::Error;
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
