use sqlx::{PgConnection, PgPool};
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Amenity, Comment, CommentRow, Offer, OfferRow, User, UserRow};
use crate::types::{CreateCommentRequest, CreateOfferRequest, UpdateOfferRequest};

const OFFER_COLUMNS: &str = r#"
    SELECT o.id, o.title, o.description, o.publish_date, o.city, o.image_preview,
           o.photos, o.is_premium, o.is_favorite, o.rating, o.offer_type,
           o.room_count, o.guest_count, o.rent_price, o.amenities, o.comment_count,
           o.latitude, o.longitude,
           o.host_id, u.name AS host_name, u.email AS host_email,
           u.avatar_url AS host_avatar_url, u.user_type AS host_user_type,
           u.created_at AS host_created_at
    FROM offers o
    JOIN users u ON u.id = o.host_id
"#;

const COMMENT_COLUMNS: &str = r#"
    SELECT c.id, c.comment, c.publish_date, c.rating, c.offer_id,
           c.user_id, u.name AS user_name, u.email AS user_email,
           u.avatar_url AS user_avatar_url, u.user_type AS user_user_type,
           u.created_at AS user_created_at
    FROM comments c
    JOIN users u ON u.id = c.user_id
"#;

fn amenity_strings(amenities: &[Amenity]) -> Vec<String> {
    amenities.iter().map(|a| a.as_str().to_string()).collect()
}

fn into_offers(rows: Vec<OfferRow>) -> Result<Vec<Offer>, AppError> {
    Ok(rows
        .into_iter()
        .map(Offer::try_from)
        .collect::<Result<Vec<_>, _>>()?)
}

async fn increment_comment_count(conn: &mut PgConnection, offer_id: Uuid) -> Result<(), AppError> {
    sqlx::query("UPDATE offers SET comment_count = comment_count + 1 WHERE id = $1")
        .bind(offer_id)
        .execute(conn)
        .await?;
    Ok(())
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Offers

    /// Publishes a new offer. Rating starts at 1 and the offer is not a favorite.
    pub async fn create_offer(
        &self,
        host_id: Uuid,
        req: &CreateOfferRequest,
    ) -> Result<Offer, AppError> {
        let id = Uuid::new_v4();
        let coordinates = req.coordinates.unwrap_or_else(|| req.city.coordinates());

        sqlx::query(
            r#"
            INSERT INTO offers (id, title, description, publish_date, city, image_preview,
                                photos, is_premium, is_favorite, rating, offer_type,
                                room_count, guest_count, rent_price, amenities, host_id,
                                comment_count, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, 1, $9, $10, $11, $12, $13, $14,
                    0, $15, $16)
            "#,
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(OffsetDateTime::now_utc())
        .bind(req.city.as_str())
        .bind(&req.image_preview)
        .bind(&req.photos)
        .bind(req.is_premium)
        .bind(req.offer_type.as_str())
        .bind(req.room_count)
        .bind(req.guest_count)
        .bind(req.rent_price)
        .bind(amenity_strings(&req.amenities))
        .bind(host_id)
        .bind(coordinates.latitude)
        .bind(coordinates.longitude)
        .execute(&self.pool)
        .await?;

        info!("New offer created: {}", req.title);

        self.get_offer(id).await?.ok_or(AppError::Internal)
    }

    pub async fn get_offer(&self, id: Uuid) -> Result<Option<Offer>, AppError> {
        let row: Option<OfferRow> = sqlx::query_as(&format!("{OFFER_COLUMNS} WHERE o.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Offer::try_from).transpose()?)
    }

    /// Applies the fields present in `req`. Changing the city without new
    /// coordinates moves the offer to that city's center.
    pub async fn update_offer(
        &self,
        id: Uuid,
        req: &UpdateOfferRequest,
    ) -> Result<Option<Offer>, AppError> {
        let coordinates = req
            .coordinates
            .or_else(|| req.city.map(|city| city.coordinates()));

        let result = sqlx::query(
            r#"
            UPDATE offers SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                city = COALESCE($4, city),
                image_preview = COALESCE($5, image_preview),
                photos = COALESCE($6, photos),
                is_premium = COALESCE($7, is_premium),
                offer_type = COALESCE($8, offer_type),
                room_count = COALESCE($9, room_count),
                guest_count = COALESCE($10, guest_count),
                rent_price = COALESCE($11, rent_price),
                amenities = COALESCE($12, amenities),
                latitude = COALESCE($13, latitude),
                longitude = COALESCE($14, longitude)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.city.map(|c| c.as_str()))
        .bind(&req.image_preview)
        .bind(&req.photos)
        .bind(req.is_premium)
        .bind(req.offer_type.map(|t| t.as_str()))
        .bind(req.room_count)
        .bind(req.guest_count)
        .bind(req.rent_price)
        .bind(req.amenities.as_deref().map(amenity_strings))
        .bind(coordinates.map(|c| c.latitude))
        .bind(coordinates.map(|c| c.longitude))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_offer(id).await
    }

    /// Deletes an offer and, by cascade, its comments.
    pub async fn delete_offer(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM offers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Newest offers first.
    pub async fn list_offers(&self, limit: i64) -> Result<Vec<Offer>, AppError> {
        let rows: Vec<OfferRow> = sqlx::query_as(&format!(
            "{OFFER_COLUMNS} ORDER BY o.created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        into_offers(rows)
    }

    pub async fn premium_offers_by_city(
        &self,
        city: &str,
        limit: i64,
    ) -> Result<Vec<Offer>, AppError> {
        let rows: Vec<OfferRow> = sqlx::query_as(&format!(
            "{OFFER_COLUMNS} WHERE o.is_premium AND o.city = $1 ORDER BY o.created_at DESC LIMIT $2"
        ))
        .bind(city)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        into_offers(rows)
    }

    pub async fn favorite_offers(&self) -> Result<Vec<Offer>, AppError> {
        let rows: Vec<OfferRow> = sqlx::query_as(&format!(
            "{OFFER_COLUMNS} WHERE o.is_favorite ORDER BY o.created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        into_offers(rows)
    }

    pub async fn set_favorite(&self, id: Uuid, favorite: bool) -> Result<Option<Offer>, AppError> {
        let result = sqlx::query("UPDATE offers SET is_favorite = $2 WHERE id = $1")
            .bind(id)
            .bind(favorite)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_offer(id).await
    }

    pub async fn offer_exists(&self, id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM offers WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    // Comments

    /// Stores a comment and bumps the offer's comment count atomically.
    pub async fn create_comment(
        &self,
        offer_id: Uuid,
        user_id: Uuid,
        req: &CreateCommentRequest,
    ) -> Result<Comment, AppError> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO comments (id, comment, publish_date, rating, offer_id, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(&req.comment)
        .bind(OffsetDateTime::now_utc())
        .bind(req.rating)
        .bind(offer_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        increment_comment_count(&mut tx, offer_id).await?;

        let row: CommentRow = sqlx::query_as(&format!("{COMMENT_COLUMNS} WHERE c.id = $1"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Comment::try_from(row)?)
    }

    /// Newest comments first.
    pub async fn comments_for_offer(
        &self,
        offer_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Comment>, AppError> {
        let rows: Vec<CommentRow> = sqlx::query_as(&format!(
            "{COMMENT_COLUMNS} WHERE c.offer_id = $1 ORDER BY c.created_at DESC LIMIT $2"
        ))
        .bind(offer_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(Comment::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    // Users

    pub async fn create_user(&self, user: &User, password_hash: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, avatar_url, password_hash, user_type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.avatar_url)
        .bind(password_hash)
        .bind(user.user_type.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                info!("New user created: {}", user.email);
                Ok(())
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
                format!("User with email {} already exists", user.email),
            )),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, avatar_url, password_hash, user_type, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::try_from).transpose()?)
    }

    /// Looks up a user by email together with the stored password hash.
    pub async fn get_user_with_password(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, AppError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, avatar_url, password_hash, user_type, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let hash = row.password_hash.clone();
                Ok(Some((User::try_from(row)?, hash)))
            }
            None => Ok(None),
        }
    }

    pub async fn update_avatar(&self, id: Uuid, avatar_url: &str) -> Result<Option<User>, AppError> {
        let result = sqlx::query("UPDATE users SET avatar_url = $2 WHERE id = $1")
            .bind(id)
            .bind(avatar_url)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_user(id).await
    }
}
