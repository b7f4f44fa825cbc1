//! Seed the database with a demo user and sample videos
//!
//! Creates the schema if it is missing, upserts a demo account, and inserts
//! 20 sample videos cycling through five genres. The generated API key is
//! logged so the endpoints can be exercised by hand.

use anyhow::Result;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use rand::{Rng, RngCore};
use sqlx::{PgPool, Row};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use common::database::{DatabaseConfig, init_pool};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    name TEXT,
    api_key TEXT NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS videos (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    description TEXT,
    duration DOUBLE PRECISION NOT NULL,
    genre TEXT NOT NULL,
    tags TEXT[] NOT NULL DEFAULT '{}',
    thumbnail_url TEXT,
    video_url TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX IF NOT EXISTS videos_user_created_idx ON videos (user_id, created_at DESC);
"#;

const GENRES: [&str; 5] = [
    "Tutorial",
    "Entertainment",
    "Documentary",
    "Music",
    "Gaming",
];

const TAG_SETS: [[&str; 3]; 5] = [
    ["javascript", "coding", "tutorial"],
    ["funny", "entertainment", "viral"],
    ["nature", "science", "educational"],
    ["rock", "music", "live"],
    ["gaming", "playthrough", "fps"],
];

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting seed");

    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    for statement in SCHEMA.split(';').filter(|s| !s.trim().is_empty()) {
        sqlx::query(statement).execute(&pool).await?;
    }

    let (user_id, email, api_key) = upsert_demo_user(&pool).await?;
    info!("Created user: {}", email);
    info!("API key: {}", api_key);

    let count = insert_sample_videos(&pool, user_id).await?;
    info!("Created {} sample videos", count);
    info!("Seed completed");

    Ok(())
}

async fn upsert_demo_user(pool: &PgPool) -> Result<(Uuid, String, String)> {
    let email = "demo@clipshelf.dev";

    let salt = SaltString::generate(&mut rand::thread_rng());
    let password_hash = Argon2::default()
        .hash_password(b"123456789", &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    let mut key_bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut key_bytes);
    let api_key = hex::encode(key_bytes);

    sqlx::query(
        r#"
        INSERT INTO users (email, password_hash, name, api_key)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO NOTHING
        "#,
    )
    .bind(email)
    .bind(&password_hash)
    .bind("Demo User")
    .bind(&api_key)
    .execute(pool)
    .await?;

    let row = sqlx::query("SELECT id, api_key FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await?;

    Ok((row.get("id"), email.to_string(), row.get("api_key")))
}

async fn insert_sample_videos(pool: &PgPool, user_id: Uuid) -> Result<usize> {
    let mut rng = rand::thread_rng();

    for i in 0..20usize {
        let genre_index = i % GENRES.len();
        let genre = GENRES[genre_index];
        let tags: Vec<String> = TAG_SETS[genre_index].iter().map(|t| t.to_string()).collect();
        let duration = f64::from(rng.gen_range(60..660));

        sqlx::query(
            r#"
            INSERT INTO videos (user_id, title, description, duration, genre, tags, thumbnail_url, video_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user_id)
        .bind(format!("Sample Video {}", i + 1))
        .bind(format!(
            "This is a sample {} video for testing purposes",
            genre.to_lowercase()
        ))
        .bind(duration)
        .bind(genre)
        .bind(&tags)
        .bind(format!("https://picsum.photos/seed/{}/640/360", i))
        .bind(format!("https://example.com/videos/sample-{}.mp4", i + 1))
        .execute(pool)
        .await?;
    }

    Ok(20)
}
