//! Shared types for the console API layer.

use std::sync::Arc;

use uuid::Uuid;

use crate::authorization::Role;
use crate::core_state::CoreState;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// Authenticated session context, injected into request extensions by the
/// auth middleware after token validation.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_name: String,
    pub email: String,
    pub role: Role,
    pub doctor_id: Option<Uuid>,
}
