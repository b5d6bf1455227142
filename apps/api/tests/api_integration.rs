//! End-to-end API integration tests
//!
//! These tests drive the full router against the in-memory repositories:
//! - Onboarding, registration and JWT authentication
//! - Teams, rosters, tiers and plan limits
//! - Match lifecycle, events and lineups
//! - Schedules, player development and notifications
//! - Tenant and organization isolation

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use academy_api::api::routes::build_router;
use academy_api::config::Config;
use academy_api::domain::notification::NotificationLog;
use academy_api::infrastructure::notifications::{NotificationSender, SendError};
use academy_api::state::{AppState, Repositories};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for oneshot

/// Setup test application over a fresh in-memory store
fn setup_app() -> Router {
    build_router(AppState::new(Config::for_tests(), Repositories::in_memory()))
}

/// Sender that rejects every delivery
struct FailingSender;

#[async_trait]
impl NotificationSender for FailingSender {
    async fn send(&self, _notification: &NotificationLog) -> Result<(), SendError> {
        Err(SendError("gateway unavailable".to_string()))
    }
}

/// Send one request and decode the JSON body (Null when empty or not JSON)
async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Ids and token of a freshly onboarded academy
struct Academy {
    token: String,
    organization_id: String,
    admin_id: String,
}

async fn onboard(app: &Router, name: &str, email: &str) -> Academy {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/onboarding",
        None,
        Some(json!({
            "tenant_name": name,
            "organization_name": format!("{} Youth", name),
            "admin_email": email,
            "admin_password": "correct-horse-battery",
            "admin_name": "Academy Director"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "onboarding failed: {}", body);

    Academy {
        token: body["token"].as_str().unwrap().to_string(),
        organization_id: body["organization"]["id"].as_str().unwrap().to_string(),
        admin_id: body["user"]["id"].as_str().unwrap().to_string(),
    }
}

/// Creates a user with the given role and returns (user id, token)
async fn create_member(
    app: &Router,
    academy: &Academy,
    organization_id: &str,
    email: &str,
    role: &str,
) -> (String, String) {
    let (status, body) = call(
        app,
        Method::POST,
        &format!("/api/organizations/{}/users", organization_id),
        Some(&academy.token),
        Some(json!({
            "email": email,
            "password": "member-password",
            "full_name": format!("Member {}", email),
            "role": role
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "member creation failed: {}", body);
    let user_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "member-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (user_id, body["token"].as_str().unwrap().to_string())
}

/// Creates a player account without signing it in and returns its id
async fn create_player(app: &Router, academy: &Academy, email: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        &format!("/api/organizations/{}/users", academy.organization_id),
        Some(&academy.token),
        Some(json!({
            "email": email,
            "password": "member-password",
            "full_name": "Squad Player",
            "role": "player"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "player creation failed: {}", body);
    body["id"].as_str().unwrap().to_string()
}

async fn create_team(app: &Router, academy: &Academy, name: &str) -> (StatusCode, Value) {
    call(
        app,
        Method::POST,
        &format!("/api/organizations/{}/teams", academy.organization_id),
        Some(&academy.token),
        Some(json!({ "name": name, "sport": "football", "max_players": 22 })),
    )
    .await
}

async fn add_to_roster(
    app: &Router,
    token: &str,
    team_id: &str,
    player_id: &str,
    jersey: i32,
) -> (StatusCode, Value) {
    call(
        app,
        Method::POST,
        &format!("/api/teams/{}/players", team_id),
        Some(token),
        Some(json!({ "player_id": player_id, "jersey_number": jersey })),
    )
    .await
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_onboarding_issues_token_and_trial() {
    let app = setup_app();
    let academy = onboard(&app, "Northside", "director@northside.test").await;

    let (status, me) = call(&app, Method::GET, "/api/auth/me", Some(&academy.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "director@northside.test");
    assert_eq!(me["role"], "super_admin");
    assert_eq!(me["id"], academy.admin_id.as_str());
    assert!(me.get("password_hash").is_none());

    let (status, sub) = call(
        &app,
        Method::GET,
        &format!("/api/organizations/{}/subscription", academy.organization_id),
        Some(&academy.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sub["status"], "trial");
    assert_eq!(sub["plan"], "basic");

    // Same admin email again
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/onboarding",
        None,
        Some(json!({
            "tenant_name": "Copycat",
            "organization_name": "Copycat Youth",
            "admin_email": "director@northside.test",
            "admin_password": "correct-horse-battery",
            "admin_name": "Someone Else"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_authentication_failures() {
    let app = setup_app();
    onboard(&app, "Eastside", "director@eastside.test").await;

    let (status, _) = call(&app, Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, Method::GET, "/api/auth/me", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "director@eastside.test", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_player_self_registration() {
    let app = setup_app();
    let academy = onboard(&app, "Westside", "director@westside.test").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "email": "striker@westside.test",
            "password": "player-password",
            "full_name": "Sam Striker",
            "organization_id": academy.organization_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "player");
    assert!(body["token"].as_str().is_some());

    // Players cannot manage teams
    let player_token = body["token"].as_str().unwrap().to_string();
    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/api/organizations/{}/teams", academy.organization_id),
        Some(&player_token),
        Some(json!({ "name": "Rebels", "sport": "football", "max_players": 22 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_team_crud_and_roster_rules() {
    let app = setup_app();
    let academy = onboard(&app, "Harbour", "director@harbour.test").await;

    let (status, team) = create_team(&app, &academy, "Under 12s").await;
    assert_eq!(status, StatusCode::CREATED);
    let team_id = team["id"].as_str().unwrap().to_string();
    assert_eq!(team["is_active"], true);

    let (status, updated) = call(
        &app,
        Method::PUT,
        &format!("/api/teams/{}", team_id),
        Some(&academy.token),
        Some(json!({ "season": "2030" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["season"], "2030");

    let (first, _) = create_member(&app, &academy, &academy.organization_id, "p1@harbour.test", "player").await;
    let (second, _) = create_member(&app, &academy, &academy.organization_id, "p2@harbour.test", "player").await;
    let (coach, _) = create_member(&app, &academy, &academy.organization_id, "coach@harbour.test", "coach").await;

    let (status, entry) = add_to_roster(&app, &academy.token, &team_id, &first, 9).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["status"], "active");

    let (status, _) = add_to_roster(&app, &academy.token, &team_id, &first, 10).await;
    assert_eq!(status, StatusCode::CONFLICT, "same player twice");

    let (status, _) = add_to_roster(&app, &academy.token, &team_id, &second, 9).await;
    assert_eq!(status, StatusCode::CONFLICT, "jersey already worn");

    let (status, _) = add_to_roster(&app, &academy.token, &team_id, &coach, 4).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "coaches are not players");

    let (status, _) = add_to_roster(&app, &academy.token, &team_id, &second, 11).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, roster) = call(
        &app,
        Method::GET,
        &format!("/api/teams/{}/players", team_id),
        Some(&academy.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(roster.as_array().unwrap().len(), 2);

    let (status, _) = call(
        &app,
        Method::DELETE,
        &format!("/api/teams/{}/players/{}", team_id, second),
        Some(&academy.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(
        &app,
        Method::DELETE,
        &format!("/api/teams/{}", team_id),
        Some(&academy.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(
        &app,
        Method::GET,
        &format!("/api/teams/{}", team_id),
        Some(&academy.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_team_limit_follows_plan() {
    let app = setup_app();
    let academy = onboard(&app, "Riverside", "director@riverside.test").await;

    // Without a usable subscription the organization falls back to the free plan
    let (status, sub) = call(
        &app,
        Method::POST,
        &format!("/api/organizations/{}/subscription/cancel", academy.organization_id),
        Some(&academy.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sub["status"], "cancelled");

    let (status, _) = create_team(&app, &academy, "First Team").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = create_team(&app, &academy, "Second Team").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("free"));

    // Upgrading lifts the limit
    let (status, sub) = call(
        &app,
        Method::POST,
        &format!("/api/organizations/{}/subscription", academy.organization_id),
        Some(&academy.token),
        Some(json!({ "plan": "pro", "billing_cycle": "yearly" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sub["plan"], "pro");
    assert_eq!(sub["status"], "active");

    let (status, _) = create_team(&app, &academy, "Second Team").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_tier_promotion_and_demotion() {
    let app = setup_app();
    let academy = onboard(&app, "Lakeside", "director@lakeside.test").await;
    let (_, team) = create_team(&app, &academy, "Academy Squad").await;
    let team_id = team["id"].as_str().unwrap().to_string();
    let (player_id, player_token) =
        create_member(&app, &academy, &academy.organization_id, "winger@lakeside.test", "player").await;
    add_to_roster(&app, &academy.token, &team_id, &player_id, 7).await;

    for (name, level, min) in [("Development", 1, None), ("Elite", 2, Some("7.5"))] {
        let (status, _) = call(
            &app,
            Method::POST,
            &format!("/api/teams/{}/tiers", team_id),
            Some(&academy.token),
            Some(json!({ "name": name, "level": level, "min_skill_rating": min })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let promote = format!("/api/teams/{}/players/{}/promote", team_id, player_id);
    let demote = format!("/api/teams/{}/players/{}/demote", team_id, player_id);

    // Untiered players enter at the bottom
    let (status, entry) = call(&app, Method::POST, &promote, Some(&academy.token), None).await;
    assert_eq!(status, StatusCode::OK);
    let development_tier = entry["tier_id"].as_str().unwrap().to_string();

    // Elite needs an average rating of 7.5
    let (status, _) = call(&app, Method::POST, &promote, Some(&academy.token), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, skills) = call(
        &app,
        Method::PUT,
        &format!("/api/players/{}/skills", player_id),
        Some(&academy.token),
        Some(json!({ "skills": [
            { "skill_name": "Dribbling", "rating": 8 },
            { "skill_name": "Passing", "rating": 7 },
            { "skill_name": "Pace", "rating": 9 }
        ] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(skills.as_array().unwrap().len(), 3);

    let (status, entry) = call(&app, Method::POST, &promote, Some(&academy.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(entry["tier_id"], development_tier.as_str());

    let (status, _) = call(&app, Method::POST, &promote, Some(&academy.token), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "already at the top");

    let (status, entry) = call(&app, Method::POST, &demote, Some(&academy.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["tier_id"], development_tier.as_str());

    let (status, _) = call(&app, Method::POST, &demote, Some(&academy.token), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "already at the bottom");

    // An occupied tier cannot be deleted
    let (status, _) = call(
        &app,
        Method::DELETE,
        &format!("/api/teams/{}/tiers/{}", team_id, development_tier),
        Some(&academy.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Players may not promote themselves
    let (status, _) = call(&app, Method::POST, &promote, Some(&player_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The player was told about each move
    let (status, inbox) = call(&app, Method::GET, "/api/notifications", Some(&player_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let kinds: Vec<&str> = inbox
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|n| n["notification_type"].as_str())
        .collect();
    assert!(kinds.len() >= 4, "expected roster and tier notices, got {:?}", kinds);
}

#[tokio::test]
async fn test_match_lifecycle_events_and_lineup() {
    let app = setup_app();
    let academy = onboard(&app, "Hillside", "director@hillside.test").await;
    let (_, team) = create_team(&app, &academy, "First XI").await;
    let team_id = team["id"].as_str().unwrap().to_string();
    let (player_id, _) =
        create_member(&app, &academy, &academy.organization_id, "nine@hillside.test", "player").await;
    add_to_roster(&app, &academy.token, &team_id, &player_id, 9).await;

    let (status, game) = call(
        &app,
        Method::POST,
        &format!("/api/teams/{}/matches", team_id),
        Some(&academy.token),
        Some(json!({
            "opponent_name": "Valley Rovers",
            "venue": "Hillside Park",
            "scheduled_at": "2030-03-02T10:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(game["status"], "scheduled");
    let match_id = game["id"].as_str().unwrap().to_string();
    let base = format!("/api/matches/{}", match_id);

    // Scheduling a match also books the calendar
    let (_, calendar) = call(
        &app,
        Method::GET,
        &format!("/api/teams/{}/schedules", team_id),
        Some(&academy.token),
        None,
    )
    .await;
    let entries = calendar.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["schedule_type"], "match");
    assert_eq!(entries[0]["match_id"], match_id.as_str());

    let (status, lineup) = call(
        &app,
        Method::PUT,
        &format!("{}/lineup", base),
        Some(&academy.token),
        Some(json!({ "players": [
            { "player_id": player_id, "position": "ST", "is_starter": true }
        ] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lineup[0]["jersey_number"], 9);

    let goal = json!({ "event_type": "goal", "side": "team", "player_id": player_id, "minute": 12 });
    let (status, _) = call(&app, Method::POST, &format!("{}/events", base), Some(&academy.token), Some(goal.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT, "events need a match in progress");

    let (status, game) = call(&app, Method::POST, &format!("{}/start", base), Some(&academy.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["status"], "in_progress");

    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("{}/lineup", base),
        Some(&academy.token),
        Some(json!({ "players": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "lineup is locked after kick-off");

    let (status, recorded) = call(&app, Method::POST, &format!("{}/events", base), Some(&academy.token), Some(goal)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(recorded["team_score"], 1);
    assert_eq!(recorded["opponent_score"], 0);

    let (status, recorded) = call(
        &app,
        Method::POST,
        &format!("{}/events", base),
        Some(&academy.token),
        Some(json!({ "event_type": "goal", "side": "opponent", "minute": 60 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(recorded["opponent_score"], 1);

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("{}/events", base),
        Some(&academy.token),
        Some(json!({ "event_type": "yellow_card", "side": "team", "minute": 70 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "cards need a player");

    let (status, game) = call(
        &app,
        Method::POST,
        &format!("{}/complete", base),
        Some(&academy.token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["status"], "completed");
    assert_eq!(game["team_score"], 1);
    assert_eq!(game["opponent_score"], 1);

    let (status, _) = call(&app, Method::POST, &format!("{}/start", base), Some(&academy.token), None).await;
    assert_eq!(status, StatusCode::CONFLICT, "completed matches never restart");

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("{}/cancel", base),
        Some(&academy.token),
        Some(json!({ "reason": "too late" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "completed matches cannot be cancelled");

    let (status, events) = call(&app, Method::GET, &format!("{}/events", base), Some(&academy.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(events.as_array().unwrap().len(), 2);

    let (status, completed) = call(
        &app,
        Method::GET,
        &format!("/api/teams/{}/matches?status=completed", team_id),
        Some(&academy.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cancelled_match_frees_calendar() {
    let app = setup_app();
    let academy = onboard(&app, "Cliffside", "director@cliffside.test").await;
    let (_, team) = create_team(&app, &academy, "Reserves").await;
    let team_id = team["id"].as_str().unwrap().to_string();

    let (_, game) = call(
        &app,
        Method::POST,
        &format!("/api/teams/{}/matches", team_id),
        Some(&academy.token),
        Some(json!({ "opponent_name": "Dune FC", "scheduled_at": "2030-04-06T14:00:00Z" })),
    )
    .await;
    let base = format!("/api/matches/{}", game["id"].as_str().unwrap());

    let (status, game) = call(
        &app,
        Method::POST,
        &format!("{}/cancel", base),
        Some(&academy.token),
        Some(json!({ "reason": "Pitch waterlogged" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["status"], "cancelled");
    assert_eq!(game["cancelled_reason"], "Pitch waterlogged");

    let (status, _) = call(&app, Method::POST, &format!("{}/start", base), Some(&academy.token), None).await;
    assert_eq!(status, StatusCode::CONFLICT, "cancelled matches cannot start");

    // The slot is free again for training
    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/api/teams/{}/schedules", team_id),
        Some(&academy.token),
        Some(json!({
            "title": "Recovery session",
            "schedule_type": "training",
            "starts_at": "2030-04-06T14:30:00Z",
            "ends_at": "2030-04-06T15:30:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_match_booking_respects_calendar() {
    let app = setup_app();
    let academy = onboard(&app, "Lakeside", "director@lakeside.test").await;
    let (_, team) = create_team(&app, &academy, "Under 16s").await;
    let team_id = team["id"].as_str().unwrap().to_string();

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/api/teams/{}/schedules", team_id),
        Some(&academy.token),
        Some(json!({
            "title": "Morning training",
            "schedule_type": "training",
            "starts_at": "2030-06-01T10:00:00Z",
            "ends_at": "2030-06-01T11:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/teams/{}/matches", team_id),
        Some(&academy.token),
        Some(json!({ "opponent_name": "Marsh United", "scheduled_at": "2030-06-01T10:30:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "kick-off during training");
    assert!(body["error"].as_str().unwrap().contains("Morning training"));

    let (_, fixtures) = call(
        &app,
        Method::GET,
        &format!("/api/teams/{}/matches", team_id),
        Some(&academy.token),
        None,
    )
    .await;
    assert!(fixtures.as_array().unwrap().is_empty(), "rejected match was stored");

    // Kick-off right after training is fine
    let (status, game) = call(
        &app,
        Method::POST,
        &format!("/api/teams/{}/matches", team_id),
        Some(&academy.token),
        Some(json!({ "opponent_name": "Marsh United", "scheduled_at": "2030-06-01T11:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let base = format!("/api/matches/{}", game["id"].as_str().unwrap());

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("{}/reschedule", base),
        Some(&academy.token),
        Some(json!({ "scheduled_at": "2030-06-01T09:30:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "moved onto training");

    let (_, unchanged) = call(&app, Method::GET, &base, Some(&academy.token), None).await;
    assert_eq!(unchanged["scheduled_at"], "2030-06-01T11:00:00Z");

    // Moving within its own slot only clashes with itself, which is ignored
    let (status, moved) = call(
        &app,
        Method::POST,
        &format!("{}/reschedule", base),
        Some(&academy.token),
        Some(json!({ "scheduled_at": "2030-06-01T11:30:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["scheduled_at"], "2030-06-01T11:30:00Z");

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/api/teams/{}/schedules", team_id),
        Some(&academy.token),
        Some(json!({
            "title": "Extra session",
            "schedule_type": "training",
            "starts_at": "2030-06-01T12:00:00Z",
            "ends_at": "2030-06-01T13:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "training during the match");
}

#[tokio::test]
async fn test_player_limit_follows_plan() {
    let app = setup_app();
    let academy = onboard(&app, "Meadow", "director@meadow.test").await;

    // Both teams exist before the organization drops to the free plan
    let (status, first_team) = call(
        &app,
        Method::POST,
        &format!("/api/organizations/{}/teams", academy.organization_id),
        Some(&academy.token),
        Some(json!({ "name": "Senior Squad", "sport": "football", "max_players": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let first_team = first_team["id"].as_str().unwrap().to_string();
    let (status, second_team) = create_team(&app, &academy, "Development Squad").await;
    assert_eq!(status, StatusCode::CREATED);
    let second_team = second_team["id"].as_str().unwrap().to_string();

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/api/organizations/{}/subscription/cancel", academy.organization_id),
        Some(&academy.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let mut players = Vec::new();
    for n in 1..=26 {
        players.push(create_player(&app, &academy, &format!("player{}@meadow.test", n)).await);
    }

    for (jersey, player) in (1..).zip(players.iter().take(25)) {
        let (status, body) = add_to_roster(&app, &academy.token, &first_team, player, jersey).await;
        assert_eq!(status, StatusCode::CREATED, "player {} rejected: {}", jersey, body);
    }

    let (status, body) = add_to_roster(&app, &academy.token, &first_team, &players[25], 26).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("25 players"));

    // Already counted, so a second team does not use up another slot
    let (status, _) = add_to_roster(&app, &academy.token, &second_team, &players[0], 1).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = add_to_roster(&app, &academy.token, &second_team, &players[25], 2).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_roster_and_tier_fields_can_be_cleared() {
    let app = setup_app();
    let academy = onboard(&app, "Orchard", "director@orchard.test").await;
    let (_, team) = create_team(&app, &academy, "Under 10s").await;
    let team_id = team["id"].as_str().unwrap().to_string();
    let (player, _) = create_member(&app, &academy, &academy.organization_id, "kid@orchard.test", "player").await;

    let (status, _) = add_to_roster(&app, &academy.token, &team_id, &player, 4).await;
    assert_eq!(status, StatusCode::CREATED);
    let entry_uri = format!("/api/teams/{}/players/{}", team_id, player);

    let (status, entry) = call(
        &app,
        Method::PATCH,
        &entry_uri,
        Some(&academy.token),
        Some(json!({ "position": "keeper" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["jersey_number"], 4, "omitted field is left alone");

    let (status, entry) = call(
        &app,
        Method::PATCH,
        &entry_uri,
        Some(&academy.token),
        Some(json!({ "jersey_number": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(entry["jersey_number"].is_null());
    assert_eq!(entry["position"], "keeper");

    let (status, tier) = call(
        &app,
        Method::POST,
        &format!("/api/teams/{}/tiers", team_id),
        Some(&academy.token),
        Some(json!({ "name": "Foundation", "level": 1, "description": "First steps" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let tier_uri = format!("/api/teams/{}/tiers/{}", team_id, tier["id"].as_str().unwrap());

    let (status, tier) = call(
        &app,
        Method::PUT,
        &tier_uri,
        Some(&academy.token),
        Some(json!({ "name": "Foundation Phase" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tier["description"], "First steps");

    let (status, tier) = call(
        &app,
        Method::PUT,
        &tier_uri,
        Some(&academy.token),
        Some(json!({ "description": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(tier["description"].is_null());
}

#[tokio::test]
async fn test_schedule_recurrence_and_overlap() {
    let app = setup_app();
    let academy = onboard(&app, "Parkside", "director@parkside.test").await;
    let (_, team) = create_team(&app, &academy, "Under 14s").await;
    let team_id = team["id"].as_str().unwrap().to_string();
    let schedules = format!("/api/teams/{}/schedules", team_id);

    let (status, series) = call(
        &app,
        Method::POST,
        &schedules,
        Some(&academy.token),
        Some(json!({
            "title": "Tuesday training",
            "schedule_type": "training",
            "starts_at": "2030-01-08T17:00:00Z",
            "ends_at": "2030-01-08T18:30:00Z",
            "location": "Pitch 2",
            "recurrence": { "frequency": "weekly", "until": "2030-01-29" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let series = series.as_array().unwrap().clone();
    assert_eq!(series.len(), 4);
    assert_eq!(series[3]["starts_at"], "2030-01-29T17:00:00Z");
    assert_eq!(series[0]["series_id"], series[3]["series_id"]);

    let (status, _) = call(
        &app,
        Method::POST,
        &schedules,
        Some(&academy.token),
        Some(json!({
            "title": "Team meeting",
            "schedule_type": "meeting",
            "starts_at": "2030-01-15T18:00:00Z",
            "ends_at": "2030-01-15T19:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Back-to-back is fine
    let (status, meeting) = call(
        &app,
        Method::POST,
        &schedules,
        Some(&academy.token),
        Some(json!({
            "title": "Team meeting",
            "schedule_type": "meeting",
            "starts_at": "2030-01-15T18:30:00Z",
            "ends_at": "2030-01-15T19:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let meeting_id = meeting[0]["id"].as_str().unwrap().to_string();

    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/api/schedules/{}", meeting_id),
        Some(&academy.token),
        Some(json!({ "starts_at": "2030-01-22T17:30:00Z", "ends_at": "2030-01-22T18:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Cancelling a training frees its slot
    let training_id = series[2]["id"].as_str().unwrap();
    let (status, cancelled) = call(
        &app,
        Method::POST,
        &format!("/api/schedules/{}/cancel", training_id),
        Some(&academy.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["is_cancelled"], true);

    let (status, moved) = call(
        &app,
        Method::PUT,
        &format!("/api/schedules/{}", meeting_id),
        Some(&academy.token),
        Some(json!({ "starts_at": "2030-01-22T17:30:00Z", "ends_at": "2030-01-22T18:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["starts_at"], "2030-01-22T17:30:00Z");

    let (status, window) = call(
        &app,
        Method::GET,
        &format!("{}?from=2030-01-14T00:00:00Z&to=2030-01-16T00:00:00Z", schedules),
        Some(&academy.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(window.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_player_evaluations() {
    let app = setup_app();
    let academy = onboard(&app, "Bayside", "director@bayside.test").await;
    let (_, team) = create_team(&app, &academy, "Under 16s").await;
    let team_id = team["id"].as_str().unwrap().to_string();
    let (player_id, player_token) =
        create_member(&app, &academy, &academy.organization_id, "keeper@bayside.test", "player").await;
    let (outsider_id, _) =
        create_member(&app, &academy, &academy.organization_id, "bench@bayside.test", "player").await;
    add_to_roster(&app, &academy.token, &team_id, &player_id, 1).await;

    let evaluations = format!("/api/teams/{}/evaluations", team_id);
    let scores = json!({
        "player_id": player_id,
        "technical": 7,
        "tactical": 8,
        "physical": 6,
        "mental": 9,
        "strengths": "Shot stopping"
    });

    let (status, evaluation) = call(&app, Method::POST, &evaluations, Some(&academy.token), Some(scores.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let overall: f64 = evaluation["overall_score"].as_str().unwrap().parse().unwrap();
    assert_eq!(overall, 7.5);
    assert_eq!(evaluation["technical"], 7);

    let mut off_roster = scores.clone();
    off_roster["player_id"] = json!(outsider_id);
    let (status, _) = call(&app, Method::POST, &evaluations, Some(&academy.token), Some(off_roster)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut out_of_range = scores.clone();
    out_of_range["mental"] = json!(11);
    let (status, _) = call(&app, Method::POST, &evaluations, Some(&academy.token), Some(out_of_range)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Evaluations tied to a match need the match to be over
    let (_, game) = call(
        &app,
        Method::POST,
        &format!("/api/teams/{}/matches", team_id),
        Some(&academy.token),
        Some(json!({ "opponent_name": "Estuary Athletic", "scheduled_at": "2030-05-10T09:00:00Z" })),
    )
    .await;
    let mut for_match = scores.clone();
    for_match["match_id"] = game["id"].clone();
    let (status, _) = call(&app, Method::POST, &evaluations, Some(&academy.token), Some(for_match)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, history) = call(
        &app,
        Method::GET,
        &format!("/api/players/{}/evaluations", player_id),
        Some(&player_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_broadcast_and_inbox() {
    let app = setup_app();
    let academy = onboard(&app, "Seaside", "director@seaside.test").await;
    let (_, team) = create_team(&app, &academy, "Girls U13").await;
    let team_id = team["id"].as_str().unwrap().to_string();
    let (player_id, player_token) =
        create_member(&app, &academy, &academy.organization_id, "mid@seaside.test", "player").await;
    let (_, coach_token) =
        create_member(&app, &academy, &academy.organization_id, "coach@seaside.test", "coach").await;
    add_to_roster(&app, &academy.token, &team_id, &player_id, 8).await;

    let (status, logs) = call(
        &app,
        Method::POST,
        &format!("/api/teams/{}/notifications", team_id),
        Some(&coach_token),
        Some(json!({ "subject": "Kit day", "body": "Bring both kits on Saturday." })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let logs = logs.as_array().unwrap().clone();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["status"], "sent");
    assert_eq!(logs[0]["data"]["team_id"], team_id.as_str());

    let (_, inbox) = call(&app, Method::GET, "/api/notifications", Some(&player_token), None).await;
    let broadcast = inbox
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["subject"] == "Kit day")
        .cloned()
        .unwrap();
    let read_uri = format!("/api/notifications/{}/read", broadcast["id"].as_str().unwrap());

    let (status, _) = call(&app, Method::POST, &read_uri, Some(&coach_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "only the recipient can mark it read");

    let (status, read) = call(&app, Method::POST, &read_uri, Some(&player_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["status"], "read");

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/api/teams/{}/notifications", team_id),
        Some(&player_token),
        Some(json!({ "subject": "Hi", "body": "Players cannot broadcast" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_failed_delivery_is_logged() {
    let state = AppState::new(Config::for_tests(), Repositories::in_memory())
        .with_notifier(Arc::new(FailingSender));
    let app = build_router(state);
    let academy = onboard(&app, "Stormside", "director@stormside.test").await;
    let (_, team) = create_team(&app, &academy, "Seniors").await;
    let team_id = team["id"].as_str().unwrap().to_string();
    let (player_id, _) =
        create_member(&app, &academy, &academy.organization_id, "back@stormside.test", "player").await;
    add_to_roster(&app, &academy.token, &team_id, &player_id, 2).await;

    let (status, logs) = call(
        &app,
        Method::POST,
        &format!("/api/teams/{}/notifications", team_id),
        Some(&academy.token),
        Some(json!({ "subject": "Training moved", "body": "Now at 18:00.", "channel": "email" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(logs[0]["status"], "failed");
    assert_eq!(logs[0]["channel"], "email");
    assert!(logs[0]["error"].as_str().unwrap().contains("gateway unavailable"));

    let (status, history) = call(
        &app,
        Method::GET,
        &format!("/api/organizations/{}/notifications", academy.organization_id),
        Some(&academy.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(history
        .as_array()
        .unwrap()
        .iter()
        .all(|n| n["status"] == "failed"));
}

#[tokio::test]
async fn test_tenant_isolation() {
    let app = setup_app();
    let home = onboard(&app, "Home Academy", "director@home.test").await;
    let away = onboard(&app, "Away Academy", "director@away.test").await;
    let (_, team) = create_team(&app, &home, "Home U10").await;
    let team_id = team["id"].as_str().unwrap().to_string();

    // Another tenant cannot even see that the resources exist
    let (status, _) = call(&app, Method::GET, &format!("/api/teams/{}", team_id), Some(&away.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &app,
        Method::GET,
        &format!("/api/organizations/{}", home.organization_id),
        Some(&away.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/api/teams/{}/tiers", team_id),
        Some(&away.token),
        Some(json!({ "name": "Intruders", "level": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, orgs) = call(&app, Method::GET, "/api/organizations", Some(&away.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orgs.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_organization_boundaries_within_tenant() {
    let app = setup_app();
    let academy = onboard(&app, "Metro", "director@metro.test").await;

    let (status, created) = call(
        &app,
        Method::POST,
        "/api/organizations",
        Some(&academy.token),
        Some(json!({ "name": "Metro South" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["subscription"]["status"], "trial");
    let south_id = created["organization"]["id"].as_str().unwrap().to_string();

    let (_, north_admin) =
        create_member(&app, &academy, &academy.organization_id, "admin@metro.test", "org_admin").await;

    // Same tenant, different organization
    let (status, _) = call(
        &app,
        Method::GET,
        &format!("/api/organizations/{}", south_id),
        Some(&north_admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(
        &app,
        Method::GET,
        &format!("/api/organizations/{}", academy.organization_id),
        Some(&north_admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Org admins cannot mint super admins or create organizations
    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/api/organizations/{}/users", academy.organization_id),
        Some(&north_admin),
        Some(json!({
            "email": "boss@metro.test",
            "password": "member-password",
            "full_name": "Would-be Boss",
            "role": "super_admin"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/organizations",
        Some(&north_admin),
        Some(json!({ "name": "Metro East" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The super admin sees every organization in the tenant
    let (_, orgs) = call(&app, Method::GET, "/api/organizations", Some(&academy.token), None).await;
    assert_eq!(orgs.as_array().unwrap().len(), 2);
}
