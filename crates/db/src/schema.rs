use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

const INDEXES: [&str; 4] = [
    "CREATE INDEX IF NOT EXISTS idx_pair_bookings_window ON pair_bookings(date, start_minute, end_minute)",
    "CREATE INDEX IF NOT EXISTS idx_pair_bookings_user_a ON pair_bookings(user_a)",
    "CREATE INDEX IF NOT EXISTS idx_pair_bookings_user_b ON pair_bookings(user_b)",
    "CREATE INDEX IF NOT EXISTS idx_pair_bookings_date ON pair_bookings(date)",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            company VARCHAR(255) NULL,
            phone VARCHAR(64) NULL,
            device_token TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create day_slot_sets table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS day_slot_sets (
            date DATE PRIMARY KEY,
            generation UUID NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create time_slots table; rows go away with their day
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_slots (
            date DATE NOT NULL REFERENCES day_slot_sets(date) ON DELETE CASCADE,
            slot_index INTEGER NOT NULL,
            start_minute INTEGER NOT NULL,
            end_minute INTEGER NOT NULL,
            is_booked BOOLEAN NOT NULL DEFAULT FALSE,
            is_approved BOOLEAN NOT NULL DEFAULT FALSE,
            booked_by UUID NULL,
            PRIMARY KEY (date, slot_index),
            CONSTRAINT valid_slot_range CHECK (end_minute > start_minute AND start_minute >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create pair_bookings table. No foreign key to time_slots: a regenerated day
    // leaves its bookings in place with a stale generation.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pair_bookings (
            id UUID PRIMARY KEY,
            date DATE NOT NULL,
            generation UUID NOT NULL,
            slot_index INTEGER NOT NULL,
            start_minute INTEGER NOT NULL,
            end_minute INTEGER NOT NULL,
            user_a UUID NOT NULL,
            user_b UUID NOT NULL,
            requested_by UUID NOT NULL,
            is_approved BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT ordered_distinct_users CHECK (user_a < user_b),
            CONSTRAINT requester_is_participant CHECK (requested_by = user_a OR requested_by = user_b)
        );
        "#,
    )
    .execute(pool)
    .await?;

    for statement in INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
