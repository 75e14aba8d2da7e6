use crate::models::{DbDaySlotSet, DbTimeSlot};
use chrono::{DateTime, NaiveDate, Utc};
use eyre::Result;
use sqlx::PgExecutor;
use uuid::Uuid;

/// Must run first in a transaction: every later read sees one snapshot.
pub async fn repeatable_read<'e, E: PgExecutor<'e>>(executor: E) -> Result<()> {
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn delete_day<'e, E: PgExecutor<'e>>(executor: E, date: NaiveDate) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM day_slot_sets
        WHERE date = $1
        "#,
    )
    .bind(date)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn insert_day<'e, E: PgExecutor<'e>>(
    executor: E,
    date: NaiveDate,
    generation: Uuid,
    created_at: DateTime<Utc>,
) -> Result<DbDaySlotSet> {
    let day = sqlx::query_as::<_, DbDaySlotSet>(
        r#"
        INSERT INTO day_slot_sets (date, generation, created_at)
        VALUES ($1, $2, $3)
        RETURNING date, generation, created_at
        "#,
    )
    .bind(date)
    .bind(generation)
    .bind(created_at)
    .fetch_one(executor)
    .await?;

    Ok(day)
}

pub async fn insert_time_slot<'e, E: PgExecutor<'e>>(executor: E, slot: &DbTimeSlot) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO time_slots (date, slot_index, start_minute, end_minute, is_booked, is_approved, booked_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(slot.date)
    .bind(slot.slot_index)
    .bind(slot.start_minute)
    .bind(slot.end_minute)
    .bind(slot.is_booked)
    .bind(slot.is_approved)
    .bind(slot.booked_by)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn get_day<'e, E: PgExecutor<'e>>(
    executor: E,
    date: NaiveDate,
) -> Result<Option<DbDaySlotSet>> {
    let day = sqlx::query_as::<_, DbDaySlotSet>(
        r#"
        SELECT date, generation, created_at
        FROM day_slot_sets
        WHERE date = $1
        "#,
    )
    .bind(date)
    .fetch_optional(executor)
    .await?;

    Ok(day)
}

pub async fn get_time_slots<'e, E: PgExecutor<'e>>(
    executor: E,
    date: NaiveDate,
) -> Result<Vec<DbTimeSlot>> {
    let slots = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT date, slot_index, start_minute, end_minute, is_booked, is_approved, booked_by
        FROM time_slots
        WHERE date = $1
        ORDER BY slot_index ASC
        "#,
    )
    .bind(date)
    .fetch_all(executor)
    .await?;

    Ok(slots)
}

/// Marks a slot approved, but only while the day still has the given generation.
/// Returns `false` when no slot matched.
pub async fn mark_slot_approved<'e, E: PgExecutor<'e>>(
    executor: E,
    date: NaiveDate,
    slot_index: i32,
    generation: Uuid,
    approver: Uuid,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE time_slots AS ts
        SET is_booked = TRUE, is_approved = TRUE, booked_by = $4
        FROM day_slot_sets AS d
        WHERE ts.date = $1
          AND ts.slot_index = $2
          AND d.date = ts.date
          AND d.generation = $3
        "#,
    )
    .bind(date)
    .bind(slot_index)
    .bind(generation)
    .bind(approver)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}
