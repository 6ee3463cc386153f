//! Admission rules: who may enter, and whether an operator's call was right.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::domain::{Action, Guest, GuestId};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Deserialize)]
pub struct GuestProfile {
    pub id: GuestId,
    pub name: String,
    #[serde(default)]
    pub introduction: String,
    #[serde(default)]
    pub facts: Vec<String>,
    pub allowed: bool,
    #[serde(default)]
    pub allowed_until: Option<DateTime<Utc>>,
}

impl GuestProfile {
    pub fn can_enter(&self, at: DateTime<Utc>) -> bool {
        self.allowed && self.allowed_until.map_or(true, |until| at <= until)
    }

    pub fn to_guest(&self) -> Guest {
        Guest {
            id: self.id.clone(),
            name: self.name.clone(),
            introduction: self.introduction.clone(),
            facts: self.facts.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    #[error("unknown guest '{0}'")]
    UnknownGuest(GuestId),
    #[error("Guest '{guest_id}' is not allowed to enter.")]
    NotAllowed { guest_id: GuestId, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Judgement {
    pub allowed: bool,
    pub correct: bool,
    pub message: String,
}

#[async_trait]
pub trait GuestRepository: Send + Sync {
    async fn get_by_identifier(&self, guest_id: &GuestId) -> Option<GuestProfile>;
    /// The next guest to send to the door, or `None` when the roster is empty.
    async fn next_profile(&self) -> Option<GuestProfile>;
}

#[derive(Default)]
struct Roster {
    order: Vec<GuestId>,
    profiles: HashMap<GuestId, GuestProfile>,
    cursor: usize,
}

/// Roster kept in insertion order; `next_profile` cycles through it.
#[derive(Default)]
pub struct InMemoryGuestRepository {
    roster: Mutex<Roster>,
}

impl InMemoryGuestRepository {
    pub fn new(profiles: impl IntoIterator<Item = GuestProfile>) -> Self {
        let mut roster = Roster::default();
        for profile in profiles {
            roster.insert(profile);
        }
        Self {
            roster: Mutex::new(roster),
        }
    }

    pub async fn len(&self) -> usize {
        self.roster.lock().await.order.len()
    }
}

impl Roster {
    /// A repeated id replaces the earlier profile but keeps its place in line.
    fn insert(&mut self, profile: GuestProfile) {
        if !self.profiles.contains_key(&profile.id) {
            self.order.push(profile.id.clone());
        }
        self.profiles.insert(profile.id.clone(), profile);
    }
}

#[async_trait]
impl GuestRepository for InMemoryGuestRepository {
    async fn get_by_identifier(&self, guest_id: &GuestId) -> Option<GuestProfile> {
        self.roster.lock().await.profiles.get(guest_id).cloned()
    }

    async fn next_profile(&self) -> Option<GuestProfile> {
        let mut roster = self.roster.lock().await;
        if roster.order.is_empty() {
            return None;
        }
        let index = roster.cursor % roster.order.len();
        roster.cursor = index + 1;
        let guest_id = &roster.order[index];
        roster.profiles.get(guest_id).cloned()
    }
}

pub struct GuardService {
    repository: Arc<dyn GuestRepository>,
}

impl GuardService {
    pub fn new(repository: Arc<dyn GuestRepository>) -> Self {
        Self { repository }
    }

    pub async fn next_guest(&self) -> Option<Guest> {
        self.repository
            .next_profile()
            .await
            .map(|profile| profile.to_guest())
    }

    /// Returns the guest's profile if they may enter at `at`.
    pub async fn admit(
        &self,
        guest_id: &GuestId,
        at: DateTime<Utc>,
    ) -> Result<GuestProfile, GuardError> {
        let profile = self
            .repository
            .get_by_identifier(guest_id)
            .await
            .ok_or_else(|| GuardError::UnknownGuest(guest_id.clone()))?;
        if profile.can_enter(at) {
            Ok(profile)
        } else {
            Err(GuardError::NotAllowed {
                guest_id: profile.id,
                name: profile.name,
            })
        }
    }

    pub async fn judge(
        &self,
        guest_id: &GuestId,
        action: Action,
        at: DateTime<Utc>,
    ) -> Result<Judgement, GuardError> {
        let (name, allowed) = match self.admit(guest_id, at).await {
            Ok(profile) => (profile.name, true),
            Err(GuardError::NotAllowed { name, .. }) => (name, false),
            Err(err) => return Err(err),
        };
        let correct = (action == Action::Allow) == allowed;
        let message = match (correct, allowed) {
            (true, true) => format!("Correct! {name} is on the list."),
            (true, false) => format!("Correct! {name} is not getting in tonight."),
            (false, true) => format!("Wrong call. {name} was allowed in."),
            (false, false) => format!("Wrong call. {name} should have been turned away."),
        };
        Ok(Judgement {
            allowed,
            correct,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn profile(allowed: bool, allowed_until: Option<DateTime<Utc>>) -> GuestProfile {
        GuestProfile {
            id: GuestId::new("g"),
            name: "Guest".into(),
            introduction: String::new(),
            facts: Vec::new(),
            allowed,
            allowed_until,
        }
    }

    #[test]
    fn admission_window_is_inclusive() {
        let until = Utc.with_ymd_and_hms(2024, 5, 1, 22, 0, 0).unwrap();
        let guest = profile(true, Some(until));
        assert!(guest.can_enter(until));
        assert!(!guest.can_enter(until + chrono::Duration::seconds(1)));
    }

    #[test]
    fn denied_guest_never_enters() {
        assert!(!profile(false, None).can_enter(Utc::now()));
        assert!(profile(true, None).can_enter(Utc::now()));
    }
}
