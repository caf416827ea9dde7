//! Favorite flag handlers.

use axum::{Extension, extract::Path, response::Json};
use uuid::Uuid;

use crate::{auth::AuthUser, database::Database, errors::AppError, models::Offer};

/// List favorite offers.
#[utoipa::path(
    get,
    path = "/favorites",
    tag = "favorites",
    responses(
        (status = 200, description = "Favorite offers", body = Vec<Offer>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = []))
)]
pub async fn get_favorites(
    Extension(db): Extension<Database>,
    AuthUser(_claims): AuthUser,
) -> Result<Json<Vec<Offer>>, AppError> {
    let offers = db.favorite_offers().await?;
    Ok(Json(offers))
}

/// Mark an offer as favorite.
#[utoipa::path(
    post,
    path = "/favorites/{id}",
    tag = "favorites",
    params(("id" = Uuid, Path, description = "Offer ID")),
    responses(
        (status = 200, description = "Updated offer", body = Offer),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Offer not found")
    ),
    security(("bearer" = []))
)]
pub async fn add_favorite(
    Extension(db): Extension<Database>,
    AuthUser(_claims): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Offer>, AppError> {
    let offer = db.set_favorite(id, true).await?.ok_or(AppError::NotFound)?;
    Ok(Json(offer))
}

/// Clear an offer's favorite mark.
#[utoipa::path(
    delete,
    path = "/favorites/{id}",
    tag = "favorites",
    params(("id" = Uuid, Path, description = "Offer ID")),
    responses(
        (status = 200, description = "Updated offer", body = Offer),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Offer not found")
    ),
    security(("bearer" = []))
)]
pub async fn remove_favorite(
    Extension(db): Extension<Database>,
    AuthUser(_claims): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Offer>, AppError> {
    let offer = db.set_favorite(id, false).await?.ok_or(AppError::NotFound)?;
    Ok(Json(offer))
}
