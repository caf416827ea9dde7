//! Response body types for API endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::User;

/// Returned by register and login.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
