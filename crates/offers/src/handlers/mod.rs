//! HTTP request handlers for the offers API.
//!
//! This module re-exports handlers from focused submodules organized by domain.

pub mod comments;
pub mod favorites;
pub mod health;
pub mod offers;

// Re-export handlers from submodules (including utoipa __path types for OpenAPI)
pub use comments::{__path_add_comment, __path_get_comments, add_comment, get_comments};
pub use favorites::{
    __path_add_favorite, __path_get_favorites, __path_remove_favorite, add_favorite,
    get_favorites, remove_favorite,
};
pub use offers::{
    __path_create_offer, __path_delete_offer, __path_get_offer, __path_get_premium_offers,
    __path_list_offers, __path_update_offer, create_offer, delete_offer, get_offer,
    get_premium_offers, list_offers, update_offer,
};
pub use health::{__path_health_check, health_check};
