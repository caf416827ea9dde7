//! Query parameter types for API endpoints.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Default number of offers in the listing.
pub const DEFAULT_OFFER_COUNT: i64 = 60;

/// Maximum number of premium offers returned per city.
pub const PREMIUM_OFFER_COUNT: i64 = 3;

/// Maximum number of comments returned per offer.
pub const DEFAULT_COMMENT_COUNT: i64 = 50;

pub fn default_offer_limit() -> i64 {
    DEFAULT_OFFER_COUNT
}

/// Offer listing query parameters.
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOffersQuery {
    /// Maximum number of offers to return.
    #[serde(default = "default_offer_limit")]
    pub limit: i64,
}

/// Premium offers query. `city` is required; a missing value is a bad request.
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PremiumQuery {
    pub city: Option<String>,
}
