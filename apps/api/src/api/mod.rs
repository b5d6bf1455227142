// API layer module
// HTTP adapter over the services layer

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
