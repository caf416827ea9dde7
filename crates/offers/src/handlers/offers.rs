//! Offer CRUD and premium listing handlers.

use axum::{
    Extension,
    extract::{Path, Query},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::AuthUser,
    database::Database,
    errors::AppError,
    models::{CityName, Offer, ParseEnumError},
    types::{
        CreateOfferRequest, ListOffersQuery, PREMIUM_OFFER_COUNT, PremiumQuery,
        UpdateOfferRequest,
    },
};

/// Loads an offer and checks that the caller is its host.
async fn require_host(db: &Database, offer_id: Uuid, user_id: Uuid) -> Result<Offer, AppError> {
    let offer = db.get_offer(offer_id).await?.ok_or(AppError::NotFound)?;
    if offer.host.id != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(offer)
}

/// List the newest offers.
#[utoipa::path(
    get,
    path = "/offers",
    tag = "offers",
    params(ListOffersQuery),
    responses(
        (status = 200, description = "Newest offers", body = Vec<Offer>)
    )
)]
pub async fn list_offers(
    Extension(db): Extension<Database>,
    Query(query): Query<ListOffersQuery>,
) -> Result<Json<Vec<Offer>>, AppError> {
    if query.limit < 1 {
        return Err(AppError::InvalidInput("limit must be positive".to_string()));
    }
    let offers = db.list_offers(query.limit).await?;
    Ok(Json(offers))
}

/// Publish a new offer hosted by the caller.
#[utoipa::path(
    post,
    path = "/offers",
    tag = "offers",
    request_body = CreateOfferRequest,
    responses(
        (status = 201, description = "Offer created", body = Offer),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = []))
)]
pub async fn create_offer(
    Extension(db): Extension<Database>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CreateOfferRequest>,
) -> Result<(StatusCode, Json<Offer>), AppError> {
    req.validate()?;
    let offer = db.create_offer(claims.sub, &req).await?;
    Ok((StatusCode::CREATED, Json(offer)))
}

/// Get a single offer with its host.
#[utoipa::path(
    get,
    path = "/offers/{id}",
    tag = "offers",
    params(("id" = Uuid, Path, description = "Offer ID")),
    responses(
        (status = 200, description = "Offer", body = Offer),
        (status = 404, description = "Offer not found")
    )
)]
pub async fn get_offer(
    Extension(db): Extension<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<Offer>, AppError> {
    let offer = db.get_offer(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(offer))
}

/// Update an offer. Only its host may do this.
#[utoipa::path(
    patch,
    path = "/offers/{id}",
    tag = "offers",
    params(("id" = Uuid, Path, description = "Offer ID")),
    request_body = UpdateOfferRequest,
    responses(
        (status = 200, description = "Updated offer", body = Offer),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the host"),
        (status = 404, description = "Offer not found")
    ),
    security(("bearer" = []))
)]
pub async fn update_offer(
    Extension(db): Extension<Database>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOfferRequest>,
) -> Result<Json<Offer>, AppError> {
    req.validate()?;
    require_host(&db, id, claims.sub).await?;

    let offer = db.update_offer(id, &req).await?.ok_or(AppError::NotFound)?;
    Ok(Json(offer))
}

/// Delete an offer and its comments. Only its host may do this.
#[utoipa::path(
    delete,
    path = "/offers/{id}",
    tag = "offers",
    params(("id" = Uuid, Path, description = "Offer ID")),
    responses(
        (status = 204, description = "Offer deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the host"),
        (status = 404, description = "Offer not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_offer(
    Extension(db): Extension<Database>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    require_host(&db, id, claims.sub).await?;

    if db.delete_offer(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

/// Premium offers in a city.
#[utoipa::path(
    get,
    path = "/premium",
    tag = "offers",
    params(PremiumQuery),
    responses(
        (status = 200, description = "Premium offers in the city", body = Vec<Offer>),
        (status = 400, description = "Missing or unknown city")
    )
)]
pub async fn get_premium_offers(
    Extension(db): Extension<Database>,
    Query(query): Query<PremiumQuery>,
) -> Result<Json<Vec<Offer>>, AppError> {
    let city = query
        .city
        .ok_or_else(|| AppError::InvalidInput("city query parameter is required".to_string()))?;
    let city: CityName = city
        .parse()
        .map_err(|e: ParseEnumError| AppError::InvalidInput(e.to_string()))?;

    let offers = db
        .premium_offers_by_city(city.as_str(), PREMIUM_OFFER_COUNT)
        .await?;
    Ok(Json(offers))
}
