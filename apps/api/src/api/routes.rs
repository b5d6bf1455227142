// HTTP route table

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{
    auth, matches, notifications, organizations, players, schedules, subscriptions, teams, tiers,
};
use crate::state::AppState;

/// Builds the application router over the given state
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(auth::health_check))
        // Auth routes
        .route("/api/onboarding", post(auth::onboard))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        // Organization routes
        .route(
            "/api/organizations",
            post(organizations::create_organization).get(organizations::list_organizations),
        )
        .route(
            "/api/organizations/:id",
            get(organizations::get_organization)
                .put(organizations::update_organization)
                .delete(organizations::delete_organization),
        )
        .route(
            "/api/organizations/:id/users",
            post(organizations::create_user).get(organizations::list_users),
        )
        .route(
            "/api/organizations/:id/subscription",
            get(subscriptions::current_subscription).post(subscriptions::change_plan),
        )
        .route(
            "/api/organizations/:id/subscription/renew",
            post(subscriptions::renew_subscription),
        )
        .route(
            "/api/organizations/:id/subscription/cancel",
            post(subscriptions::cancel_subscription),
        )
        .route(
            "/api/organizations/:id/notifications",
            get(notifications::organization_log),
        )
        .route(
            "/api/organizations/:id/teams",
            post(teams::create_team).get(teams::list_teams),
        )
        // Team routes
        .route(
            "/api/teams/:id",
            get(teams::get_team)
                .put(teams::update_team)
                .delete(teams::delete_team),
        )
        .route(
            "/api/teams/:id/tiers",
            post(tiers::create_tier).get(tiers::list_tiers),
        )
        .route(
            "/api/teams/:id/tiers/:tier_id",
            put(tiers::update_tier).delete(tiers::delete_tier),
        )
        .route(
            "/api/teams/:id/players",
            post(teams::add_player).get(teams::list_roster),
        )
        .route(
            "/api/teams/:id/players/:player_id",
            patch(teams::update_roster_entry).delete(teams::remove_player),
        )
        .route(
            "/api/teams/:id/players/:player_id/tier",
            put(tiers::assign_tier),
        )
        .route(
            "/api/teams/:id/players/:player_id/promote",
            post(tiers::promote_player),
        )
        .route(
            "/api/teams/:id/players/:player_id/demote",
            post(tiers::demote_player),
        )
        .route(
            "/api/teams/:id/matches",
            post(matches::schedule_match).get(matches::list_matches),
        )
        .route(
            "/api/teams/:id/schedules",
            post(schedules::create_schedule).get(schedules::list_schedules),
        )
        .route(
            "/api/teams/:id/evaluations",
            post(players::create_evaluation),
        )
        .route(
            "/api/teams/:id/notifications",
            post(notifications::broadcast),
        )
        // Match routes
        .route(
            "/api/matches/:id",
            get(matches::get_match).delete(matches::delete_match),
        )
        .route("/api/matches/:id/start", post(matches::start_match))
        .route("/api/matches/:id/complete", post(matches::complete_match))
        .route("/api/matches/:id/cancel", post(matches::cancel_match))
        .route("/api/matches/:id/reschedule", post(matches::reschedule_match))
        .route(
            "/api/matches/:id/events",
            post(matches::record_event).get(matches::list_events),
        )
        .route(
            "/api/matches/:id/lineup",
            put(matches::set_lineup).get(matches::get_lineup),
        )
        // Schedule routes
        .route("/api/schedules/:id", put(schedules::move_schedule))
        .route("/api/schedules/:id/cancel", post(schedules::cancel_schedule))
        // Player development routes
        .route(
            "/api/players/:id/skills",
            put(players::rate_skills).get(players::list_skills),
        )
        .route("/api/players/:id/evaluations", get(players::list_evaluations))
        // Notification routes
        .route("/api/notifications", get(notifications::inbox))
        .route("/api/notifications/:id/read", post(notifications::mark_read))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
