// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod errors;
pub mod game_match;
pub mod notification;
pub mod organization;
pub mod player;
pub mod repositories;
pub mod schedule;
pub mod subscription;
pub mod team;
pub mod tenant;
pub mod user;
