use std::{collections::HashSet, fs, path::Path};

use anyhow::{bail, Context};
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use shared::domain::GuestId;

use crate::guard::GuestProfile;

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    guests: Vec<GuestProfile>,
}

/// Built-in guests used when no roster file is configured.
pub fn default_roster() -> Vec<GuestProfile> {
    vec![
        GuestProfile {
            id: GuestId::new("vip"),
            name: "Vera Ingram".into(),
            introduction: "Good evening. You'll find me near the top of the list.".into(),
            facts: vec![
                "Carries a gold-trimmed invitation".into(),
                "Greeted the owner by first name".into(),
                "Arrived in a chauffeured car".into(),
            ],
            allowed: true,
            allowed_until: None,
        },
        GuestProfile {
            id: GuestId::new("banned"),
            name: "Rex Danger".into(),
            introduction: "Let me in, I promise to behave this time.".into(),
            facts: vec![
                "Was escorted out last weekend".into(),
                "His photo is pinned behind the bar".into(),
                "Wearing sunglasses at midnight".into(),
            ],
            allowed: false,
            allowed_until: None,
        },
        GuestProfile {
            id: GuestId::new("crew"),
            name: "Casey Rowe".into(),
            introduction: "Sound check is in ten minutes, I'm with the band.".into(),
            facts: vec![
                "Holds a backstage lanyard".into(),
                "Carrying a guitar case".into(),
                "Listed on tonight's crew sheet".into(),
            ],
            allowed: true,
            allowed_until: None,
        },
        GuestProfile {
            id: GuestId::new("expired"),
            name: "Morgan Lee".into(),
            introduction: "My season pass should still be good.".into(),
            facts: vec![
                "Pass is stamped with last year's season".into(),
                "Knows the coat-check attendant".into(),
                "Insists the date is a misprint".into(),
            ],
            allowed: true,
            allowed_until: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).single(),
        },
    ]
}

pub fn load_roster(path: &Path) -> anyhow::Result<Vec<GuestProfile>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read roster file '{}'", path.display()))?;
    parse_roster(&raw).with_context(|| format!("invalid roster file '{}'", path.display()))
}

fn parse_roster(raw: &str) -> anyhow::Result<Vec<GuestProfile>> {
    let file: RosterFile = toml::from_str(raw)?;
    let mut seen = HashSet::new();
    for profile in &file.guests {
        if profile.id.as_str().trim().is_empty() {
            bail!("guest '{}' has an empty id", profile.name);
        }
        if !seen.insert(profile.id.clone()) {
            bail!("duplicate guest id '{}'", profile.id);
        }
    }
    Ok(file.guests)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roster_covers_each_admission_outcome() {
        let roster = default_roster();
        let now = Utc::now();
        let find = |id: &str| {
            roster
                .iter()
                .find(|profile| profile.id.as_str() == id)
                .expect("guest in roster")
        };
        assert!(find("vip").can_enter(now));
        assert!(find("crew").can_enter(now));
        assert!(!find("banned").can_enter(now));
        assert!(!find("expired").can_enter(now));
        assert!(roster.iter().all(|profile| !profile.facts.is_empty()));
    }

    #[test]
    fn parses_roster_toml() {
        let roster = parse_roster(
            r#"
            [[guests]]
            id = "dj"
            name = "Dee Jay"
            introduction = "I'm spinning tonight."
            facts = ["Carries a record bag"]
            allowed = true
            allowed_until = "2099-12-31T23:59:59Z"

            [[guests]]
            id = "heckler"
            name = "Hal"
            allowed = false
            "#,
        )
        .expect("roster");

        assert_eq!(roster.len(), 2);
        assert!(roster[0].allowed_until.is_some());
        assert!(roster[1].facts.is_empty());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = parse_roster(
            r#"
            [[guests]]
            id = "dj"
            name = "A"
            allowed = true

            [[guests]]
            id = "dj"
            name = "B"
            allowed = false
            "#,
        )
        .expect_err("duplicate");
        assert!(err.to_string().contains("duplicate guest id"));
    }
}
