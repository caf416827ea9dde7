//! Seeding tests against a real database.
//!
//! Skipped unless `DATABASE_URL` is set. Migrations from the offers crate
//! are applied on connect.
//!
//! Run with: `DATABASE_URL=postgres://... cargo test -p mock-data --test seed_integration`

use std::env;

use mock_data::db::Seeder;
use mock_data::generators::{OfferGenerator, TsvOfferGenerator};
use mock_data::pool::MockServerData;
use mock_data::tsv::parse_offer_line;
use offers::database::Database;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sqlx::{PgPool, postgres::PgPoolOptions};
use uuid::Uuid;

async fn get_test_pool() -> Option<PgPool> {
    let Ok(database_url) = env::var("DATABASE_URL") else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Skipping test: Failed to connect to database: {e}");
            return None;
        }
    };

    sqlx::migrate!("../offers/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

#[tokio::test]
async fn test_seed_generated_offers() {
    let Some(pool) = get_test_pool().await else {
        return;
    };

    let email = format!("seed-{}@example.com", Uuid::new_v4());
    let mock = MockServerData {
        titles: vec!["Seeded loft by the river".to_string()],
        descriptions: vec!["Generated for the seeding test".to_string()],
        image_previews: vec!["img.png".to_string()],
        photos: vec!["p1.png".to_string(), "p2.png".to_string()],
        names: vec!["Seeder".to_string()],
        emails: vec![email.clone()],
        avatars: vec!["av.png".to_string()],
        passwords: vec!["secret".to_string()],
    };
    let offer_gen = TsvOfferGenerator::new(&mock);
    let mut rng = StdRng::seed_from_u64(3);

    let parsed: Vec<_> = offer_gen
        .generate_batch(5, &mut rng)
        .iter()
        .map(|line| parse_offer_line(line).unwrap())
        .collect();

    let summary = Seeder::new(pool.clone())
        .with_batch_size(2)
        .seed_offers(&parsed)
        .await
        .expect("Failed to seed offers");

    assert_eq!(summary.offers, 5);
    assert_eq!(summary.hosts, 1);

    let db = Database::new(pool.clone());
    let (host, _) = db.get_user_with_password(&email).await.unwrap().unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM offers WHERE host_id = $1")
        .bind(host.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 5);

    let _ = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(host.id)
        .execute(&pool)
        .await;
}
