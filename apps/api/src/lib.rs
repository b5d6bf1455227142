//! Sports Academy API Library
//!
//! Multi-tenant backend for sports academies: organizations, teams and tiers,
//! matches, schedules, player development, notifications and subscriptions.
//! The binary in `main.rs` wires these modules to Postgres; tests wire them to
//! the in-memory store.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;
pub mod telemetry;
