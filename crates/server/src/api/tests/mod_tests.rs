use super::*;
use crate::{
    guard::{GuestProfile, GuestRepository, InMemoryGuestRepository},
    roster::default_roster,
};
use shared::domain::{Action, GuestId};

fn context() -> (ApiContext, Arc<InMemoryGuestRepository>) {
    let repository = Arc::new(InMemoryGuestRepository::new(default_roster()));
    let ctx = ApiContext {
        guard: Arc::new(GuardService::new(repository.clone())),
    };
    (ctx, repository)
}

fn request(guest_id: &str, action: Action) -> AuthorizeRequest {
    AuthorizeRequest {
        guest_id: GuestId::new(guest_id),
        action,
    }
}

#[tokio::test]
async fn vip_allow_is_correct() {
    let (ctx, _) = context();
    let response = authorize(&ctx, request("vip", Action::Allow), Utc::now())
        .await
        .expect("judged");
    assert!(response.correct);
    assert_eq!(response.allowed, Some(true));
    assert!(response.message.contains("Vera Ingram"));
}

#[tokio::test]
async fn banned_deny_is_correct() {
    let (ctx, _) = context();
    let response = authorize(&ctx, request("banned", Action::Deny), Utc::now())
        .await
        .expect("judged");
    assert!(response.correct);
    assert_eq!(response.allowed, Some(false));
}

#[tokio::test]
async fn crew_deny_is_incorrect() {
    let (ctx, _) = context();
    let response = authorize(&ctx, request("crew", Action::Deny), Utc::now())
        .await
        .expect("judged");
    assert!(!response.correct);
    assert_eq!(response.allowed, Some(true));
}

#[tokio::test]
async fn expired_pass_should_be_denied() {
    let (ctx, _) = context();
    let allow = authorize(&ctx, request("expired", Action::Allow), Utc::now())
        .await
        .expect("judged");
    assert!(!allow.correct);
    assert!(allow.message.starts_with("Wrong call."));
}

#[tokio::test]
async fn unknown_guest_is_not_found() {
    let (ctx, _) = context();
    let err = authorize(&ctx, request("unknown", Action::Allow), Utc::now())
        .await
        .expect_err("should fail");
    assert!(matches!(err.code, ErrorCode::NotFound));
    assert_eq!(err.detail, "unknown guest 'unknown'");
}

#[tokio::test]
async fn next_guest_cycles_through_roster() {
    let (ctx, repository) = context();
    let total = repository.len().await;
    let mut ids = Vec::new();
    for _ in 0..total + 1 {
        let guest = next_guest(&ctx).await.expect("guest");
        ids.push(guest.guest_id.expect("guest id"));
    }
    assert_eq!(ids[0], "vip");
    assert_eq!(ids[total], ids[0]);
    let mut distinct = ids[..total].to_vec();
    distinct.sort();
    distinct.dedup();
    assert_eq!(distinct.len(), total);
}

#[tokio::test]
async fn empty_roster_reports_no_guests() {
    let ctx = ApiContext {
        guard: Arc::new(GuardService::new(Arc::new(InMemoryGuestRepository::default()))),
    };
    let err = next_guest(&ctx).await.expect_err("should fail");
    assert!(matches!(err.code, ErrorCode::NotFound));
    assert_eq!(err.detail, "no guests available");
}

#[tokio::test]
async fn admit_rejects_denied_guest() {
    let (ctx, _) = context();
    let err = ctx
        .guard
        .admit(&GuestId::new("banned"), Utc::now())
        .await
        .expect_err("should fail");
    assert!(err.to_string().contains("not allowed"));

    let profile = ctx
        .guard
        .admit(&GuestId::new("vip"), Utc::now())
        .await
        .expect("admitted");
    assert_eq!(profile.id, GuestId::new("vip"));
}

#[tokio::test]
async fn repeated_id_replaces_earlier_profile() {
    let mut profiles = default_roster();
    let before = profiles.len();
    profiles.push(GuestProfile {
        id: GuestId::new("banned"),
        name: "Rex Danger".into(),
        introduction: "I've been pardoned.".into(),
        facts: vec!["Holds a signed apology".into()],
        allowed: true,
        allowed_until: None,
    });
    let repository = Arc::new(InMemoryGuestRepository::new(profiles));
    let ctx = ApiContext {
        guard: Arc::new(GuardService::new(repository.clone())),
    };

    assert_eq!(repository.len().await, before);
    let stored = repository
        .get_by_identifier(&GuestId::new("banned"))
        .await
        .expect("profile");
    assert!(stored.allowed);
    let response = authorize(&ctx, request("banned", Action::Allow), Utc::now())
        .await
        .expect("judged");
    assert!(response.correct);

    next_guest(&ctx).await.expect("first");
    let second = next_guest(&ctx).await.expect("second");
    assert_eq!(second.guest_id.as_deref(), Some("banned"));
}
