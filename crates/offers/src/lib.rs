pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod request_id;
pub mod types;

use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use sqlx::PgPool;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{login, me, register, update_me},
    database::Database,
    handlers::{
        add_comment, add_favorite, create_offer, delete_offer, get_comments, get_favorites,
        get_offer, get_premium_offers, health_check, list_offers, remove_favorite, update_offer,
    },
    request_id::request_id_middleware,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health_check,
        handlers::list_offers,
        handlers::create_offer,
        handlers::get_offer,
        handlers::update_offer,
        handlers::delete_offer,
        handlers::get_premium_offers,
        handlers::get_favorites,
        handlers::add_favorite,
        handlers::remove_favorite,
        handlers::get_comments,
        handlers::add_comment,
        auth::register,
        auth::login,
        auth::me,
        auth::update_me,
    ),
    components(schemas(
        models::Offer,
        models::User,
        models::Comment,
        models::Coordinates,
        models::CityName,
        models::OfferType,
        models::Amenity,
        models::UserType,
        types::CreateOfferRequest,
        types::UpdateOfferRequest,
        types::CreateCommentRequest,
        types::RegisterRequest,
        types::LoginRequest,
        types::UpdateUserRequest,
        types::AuthResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "offers", description = "Rental offers"),
        (name = "favorites", description = "Favorite offers"),
        (name = "comments", description = "Offer comments"),
        (name = "users", description = "Registration, login and profile"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn create_router(pool: PgPool) -> Router {
    let db = Database::new(pool);

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health_check))
        // User routes
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/me", get(me).patch(update_me))
        // Offer routes
        .route("/offers", get(list_offers).post(create_offer))
        .route(
            "/offers/{id}",
            get(get_offer).patch(update_offer).delete(delete_offer),
        )
        .route("/premium", get(get_premium_offers))
        // Comment routes
        .route(
            "/offers/{id}/comments",
            get(get_comments).post(add_comment),
        )
        // Favorite routes
        .route("/favorites", get(get_favorites))
        .route(
            "/favorites/{id}",
            post(add_favorite).delete(remove_favorite),
        )
        .layer(Extension(db))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(CompressionLayer::new())
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
}

pub async fn run_server(pool: PgPool, port: u16) -> anyhow::Result<()> {
    let app = create_router(pool);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    tracing::info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
