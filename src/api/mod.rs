//! Console HTTP API: composable axum router, bearer-session middleware,
//! structured JSON errors.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod types;
