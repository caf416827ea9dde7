//! Password hashing, bearer tokens and the user endpoints.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    Extension, Json,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use crate::{
    database::Database,
    errors::AppError,
    models::User,
    types::{AuthResponse, LoginRequest, RegisterRequest, UpdateUserRequest},
};

const TOKEN_TTL: Duration = Duration::days(7);
const DEV_SECRET: &str = "six-cities-dev-secret-change-in-production";

/// Signing key from `JWT_SECRET`, falling back to a development key.
fn signing_secret() -> Vec<u8> {
    std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| DEV_SECRET.to_string())
        .into_bytes()
}

/// Bearer token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    fn for_user(user: &User, issued_at: OffsetDateTime) -> Self {
        Self {
            sub: user.id,
            email: user.email.clone(),
            iat: issued_at.unix_timestamp(),
            exp: (issued_at + TOKEN_TTL).unix_timestamp(),
        }
    }
}

/// Argon2 PHC string for `password` with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Password hashing failed: {e}");
            AppError::Internal
        })
}

/// Checks `password` against a stored PHC string.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored).map_err(|e| {
        error!("Stored password hash is unreadable: {e}");
        AppError::Internal
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub fn create_token(user: &User) -> Result<String, AppError> {
    let claims = Claims::for_user(user, OffsetDateTime::now_utc());
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(&signing_secret()),
    )
    .map_err(|e| {
        error!("Token signing failed: {e}");
        AppError::Internal
    })
}

/// Decodes a token, rejecting bad signatures and expired tokens.
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(&signing_secret()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized)
}

/// Claims of the caller, taken from `Authorization: Bearer <token>`.
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        verify_token(token.trim()).map(AuthUser)
    }
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/users/register",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    Extension(db): Extension<Database>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    req.validate()?;

    let password_hash = hash_password(&req.password)?;
    let user = User::new(req.name, req.email, req.avatar_url, req.user_type);

    db.create_user(&user, &password_hash).await?;

    let token = create_token(&user)?;

    Ok(Json(AuthResponse { token, user }))
}

/// Log in with email and password.
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Wrong email or password")
    )
)]
pub async fn login(
    Extension(db): Extension<Database>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    req.validate()?;

    let (user, hash) = db
        .get_user_with_password(&req.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&req.password, &hash)? {
        return Err(AppError::Unauthorized);
    }

    info!("User logged in: {}", user.email);
    let token = create_token(&user)?;

    Ok(Json(AuthResponse { token, user }))
}

/// Get the current user.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = []))
)]
pub async fn me(
    Extension(db): Extension<Database>,
    AuthUser(claims): AuthUser,
) -> Result<Json<User>, AppError> {
    let user = db
        .get_user(claims.sub)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(user))
}

/// Update the current user's avatar.
#[utoipa::path(
    patch,
    path = "/users/me",
    tag = "users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = []))
)]
pub async fn update_me(
    Extension(db): Extension<Database>,
    AuthUser(claims): AuthUser,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    req.validate()?;

    let user = db
        .update_avatar(claims.sub, &req.avatar_url)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserType;

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("secret2", &hash).unwrap());
    }

    #[test]
    fn test_token_round_trip() {
        let user = User::new(
            "Alice".to_string(),
            "alice@example.com".to_string(),
            None,
            UserType::Pro,
        );
        let token = create_token(&user).unwrap();
        let claims = verify_token(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "alice@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_rejected() {
        let user = User::new(
            "Bob".to_string(),
            "bob@example.com".to_string(),
            None,
            UserType::Regular,
        );
        let claims = Claims::for_user(&user, OffsetDateTime::now_utc() - Duration::days(8));
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&signing_secret()),
        )
        .unwrap();

        assert!(matches!(verify_token(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            verify_token("not-a-token"),
            Err(AppError::Unauthorized)
        ));
    }
}
