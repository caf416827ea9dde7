//! Database seeding for imported offers.

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use offers::auth::hash_password;

use crate::tsv::{ParsedHost, ParsedOffer};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Failed to hash password for {email}: {message}")]
    PasswordHash { email: String, message: String },
}

/// Counts from one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub offers: usize,
    /// Distinct host emails touched in this run.
    pub hosts: usize,
}

/// Inserts imported offers and their hosts.
///
/// Hosts are matched by email: an existing user is reused, a new one is
/// created with the line's password hashed the same way registration does.
pub struct Seeder {
    pool: PgPool,
    batch_size: usize,
}

impl Seeder {
    /// Creates a new seeder with the given database pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            batch_size: 50,
        }
    }

    /// Sets the number of offers inserted per transaction.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    pub async fn seed_offers(&self, offers: &[ParsedOffer]) -> Result<SeedSummary, SeedError> {
        info!("Seeding {} offers...", offers.len());

        let mut hosts: HashMap<String, Uuid> = HashMap::new();
        let mut seeded = 0;

        for chunk in offers.chunks(self.batch_size) {
            let mut tx = self.pool.begin().await?;

            for offer in chunk {
                let host_id = match hosts.get(&offer.host.email) {
                    Some(id) => *id,
                    None => {
                        let id = upsert_host(&mut tx, &offer.host).await?;
                        hosts.insert(offer.host.email.clone(), id);
                        id
                    }
                };
                insert_offer(&mut tx, offer, host_id).await?;
            }

            tx.commit().await?;
            seeded += chunk.len();
            info!("  Seeded {seeded}/{} offers", offers.len());
        }

        Ok(SeedSummary {
            offers: seeded,
            hosts: hosts.len(),
        })
    }
}

/// Returns the id of the user with the host's email, creating it if needed.
async fn upsert_host(conn: &mut PgConnection, host: &ParsedHost) -> Result<Uuid, SeedError> {
    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&host.email)
        .fetch_optional(&mut *conn)
        .await?;

    if let Some(id) = existing {
        debug!("Reusing host {}", host.email);
        return Ok(id);
    }

    let password_hash = hash_password(&host.password).map_err(|e| SeedError::PasswordHash {
        email: host.email.clone(),
        message: e.to_string(),
    })?;

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, avatar_url, password_hash, user_type, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW())
        "#,
    )
    .bind(id)
    .bind(&host.name)
    .bind(&host.email)
    .bind(&host.avatar_url)
    .bind(&password_hash)
    .bind(host.user_type.as_str())
    .execute(&mut *conn)
    .await?;

    debug!("Created host {}", host.email);
    Ok(id)
}

async fn insert_offer(
    conn: &mut PgConnection,
    offer: &ParsedOffer,
    host_id: Uuid,
) -> Result<(), SeedError> {
    let amenities: Vec<&str> = offer.amenities.iter().map(|a| a.as_str()).collect();

    sqlx::query(
        r#"
        INSERT INTO offers (id, title, description, publish_date, city, image_preview,
                            photos, is_premium, is_favorite, rating, offer_type,
                            room_count, guest_count, rent_price, amenities, host_id,
                            comment_count, latitude, longitude)
        VALUES ($1, $2, $3, NOW(), $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                0, $16, $17)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&offer.title)
    .bind(&offer.description)
    .bind(offer.city.as_str())
    .bind(&offer.image_preview)
    .bind(&offer.photos)
    .bind(offer.is_premium)
    .bind(offer.is_favorite)
    .bind(f64::from(offer.rating))
    .bind(offer.offer_type.as_str())
    .bind(offer.room_count)
    .bind(offer.guest_count)
    .bind(offer.rent_price)
    .bind(&amenities)
    .bind(host_id)
    .bind(offer.coordinates.latitude)
    .bind(offer.coordinates.longitude)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
