//! Request body types for API endpoints.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Amenity, CityName, Coordinates, OfferType, UserType};

/// Offer creation request. The host is taken from the bearer token.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfferRequest {
    #[validate(length(min = 10, max = 100, message = "Title must be 10 to 100 characters"))]
    pub title: String,
    #[validate(length(
        min = 20,
        max = 1024,
        message = "Description must be 20 to 1024 characters"
    ))]
    pub description: String,
    pub city: CityName,
    #[validate(length(min = 1, message = "Image preview is required"))]
    pub image_preview: String,
    #[validate(length(equal = 6, message = "Exactly 6 photos are required"))]
    pub photos: Vec<String>,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(rename = "type")]
    pub offer_type: OfferType,
    #[validate(range(min = 1, max = 8, message = "Room count must be 1 to 8"))]
    pub room_count: i32,
    #[validate(range(min = 1, max = 10, message = "Guest count must be 1 to 10"))]
    pub guest_count: i32,
    #[validate(range(min = 100, max = 100000, message = "Rent price must be 100 to 100000"))]
    pub rent_price: i32,
    #[validate(length(min = 1, message = "At least one amenity is required"))]
    pub amenities: Vec<Amenity>,
    /// Defaults to the city center when omitted.
    pub coordinates: Option<Coordinates>,
}

/// Partial offer update. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOfferRequest {
    #[validate(length(min = 10, max = 100, message = "Title must be 10 to 100 characters"))]
    pub title: Option<String>,
    #[validate(length(
        min = 20,
        max = 1024,
        message = "Description must be 20 to 1024 characters"
    ))]
    pub description: Option<String>,
    pub city: Option<CityName>,
    #[validate(length(min = 1, message = "Image preview is required"))]
    pub image_preview: Option<String>,
    #[validate(length(equal = 6, message = "Exactly 6 photos are required"))]
    pub photos: Option<Vec<String>>,
    pub is_premium: Option<bool>,
    #[serde(rename = "type")]
    pub offer_type: Option<OfferType>,
    #[validate(range(min = 1, max = 8, message = "Room count must be 1 to 8"))]
    pub room_count: Option<i32>,
    #[validate(range(min = 1, max = 10, message = "Guest count must be 1 to 10"))]
    pub guest_count: Option<i32>,
    #[validate(range(min = 100, max = 100000, message = "Rent price must be 100 to 100000"))]
    pub rent_price: Option<i32>,
    #[validate(length(min = 1, message = "At least one amenity is required"))]
    pub amenities: Option<Vec<Amenity>>,
    pub coordinates: Option<Coordinates>,
}

/// Comment creation request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommentRequest {
    #[validate(length(min = 5, max = 1024, message = "Comment must be 5 to 1024 characters"))]
    pub comment: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be 1 to 5"))]
    pub rating: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 15, message = "Name must be 1 to 15 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(url(message = "Avatar must be a URL"))]
    pub avatar_url: Option<String>,
    #[validate(length(min = 6, max = 12, message = "Password must be 6 to 12 characters"))]
    pub password: String,
    #[serde(default)]
    pub user_type: UserType,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Profile update; only the avatar is editable.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(url(message = "Avatar must be a URL"))]
    pub avatar_url: String,
}
