//! Offer comment handlers.

use axum::{
    Extension,
    extract::Path,
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::AuthUser,
    database::Database,
    errors::AppError,
    models::Comment,
    types::{CreateCommentRequest, DEFAULT_COMMENT_COUNT},
};

/// Get comments for an offer.
#[utoipa::path(
    get,
    path = "/offers/{id}/comments",
    tag = "comments",
    params(("id" = Uuid, Path, description = "Offer ID")),
    responses(
        (status = 200, description = "Comments, newest first", body = Vec<Comment>),
        (status = 404, description = "Offer not found")
    )
)]
pub async fn get_comments(
    Extension(db): Extension<Database>,
    Path(offer_id): Path<Uuid>,
) -> Result<Json<Vec<Comment>>, AppError> {
    if !db.offer_exists(offer_id).await? {
        return Err(AppError::NotFound);
    }

    let comments = db.comments_for_offer(offer_id, DEFAULT_COMMENT_COUNT).await?;
    Ok(Json(comments))
}

/// Comment on an offer.
#[utoipa::path(
    post,
    path = "/offers/{id}/comments",
    tag = "comments",
    params(("id" = Uuid, Path, description = "Offer ID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Offer not found")
    ),
    security(("bearer" = []))
)]
pub async fn add_comment(
    Extension(db): Extension<Database>,
    AuthUser(claims): AuthUser,
    Path(offer_id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    req.validate()?;

    if !db.offer_exists(offer_id).await? {
        return Err(AppError::NotFound);
    }

    let comment = db.create_comment(offer_id, claims.sub, &req).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
