use crate::models::DbPairBooking;
use chrono::NaiveDate;
use eyre::Result;
use sqlx::PgExecutor;
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, date, generation, slot_index, start_minute, end_minute, \
     user_a, user_b, requested_by, is_approved, created_at";

/// Takes a transaction-scoped advisory lock on one wall-clock window of a date, so
/// concurrent claim checks for that window run one at a time.
pub async fn lock_window<'e, E: PgExecutor<'e>>(
    executor: E,
    date: NaiveDate,
    start_minute: i32,
    end_minute: i32,
) -> Result<()> {
    let key = format!("pair_booking:{}:{}:{}", date, start_minute, end_minute);

    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(key)
        .execute(executor)
        .await?;

    Ok(())
}

/// Id of any booking on the window that involves either user.
pub async fn find_claim<'e, E: PgExecutor<'e>>(
    executor: E,
    date: NaiveDate,
    start_minute: i32,
    end_minute: i32,
    a: Uuid,
    b: Uuid,
) -> Result<Option<Uuid>> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id
        FROM pair_bookings
        WHERE date = $1
          AND start_minute = $2
          AND end_minute = $3
          AND (user_a IN ($4, $5) OR user_b IN ($4, $5))
        LIMIT 1
        "#,
    )
    .bind(date)
    .bind(start_minute)
    .bind(end_minute)
    .bind(a)
    .bind(b)
    .fetch_optional(executor)
    .await?;

    Ok(id)
}

pub async fn insert_booking<'e, E: PgExecutor<'e>>(
    executor: E,
    booking: &DbPairBooking,
) -> Result<DbPairBooking> {
    let sql = format!(
        r#"
        INSERT INTO pair_bookings ({BOOKING_COLUMNS})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {BOOKING_COLUMNS}
        "#
    );

    let inserted = sqlx::query_as::<_, DbPairBooking>(&sql)
        .bind(booking.id)
        .bind(booking.date)
        .bind(booking.generation)
        .bind(booking.slot_index)
        .bind(booking.start_minute)
        .bind(booking.end_minute)
        .bind(booking.user_a)
        .bind(booking.user_b)
        .bind(booking.requested_by)
        .bind(booking.is_approved)
        .bind(booking.created_at)
        .fetch_one(executor)
        .await?;

    Ok(inserted)
}

pub async fn get_booking<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<DbPairBooking>> {
    let sql = format!("SELECT {BOOKING_COLUMNS} FROM pair_bookings WHERE id = $1");

    let booking = sqlx::query_as::<_, DbPairBooking>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(booking)
}

/// Same as [`get_booking`] but locks the row until the surrounding transaction ends.
pub async fn get_booking_for_update<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<DbPairBooking>> {
    let sql = format!("SELECT {BOOKING_COLUMNS} FROM pair_bookings WHERE id = $1 FOR UPDATE");

    let booking = sqlx::query_as::<_, DbPairBooking>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(booking)
}

pub async fn bookings_on_date_involving<'e, E: PgExecutor<'e>>(
    executor: E,
    date: NaiveDate,
    a: Uuid,
    b: Uuid,
) -> Result<Vec<DbPairBooking>> {
    let sql = format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM pair_bookings
        WHERE date = $1
          AND (user_a IN ($2, $3) OR user_b IN ($2, $3))
        "#
    );

    let bookings = sqlx::query_as::<_, DbPairBooking>(&sql)
        .bind(date)
        .bind(a)
        .bind(b)
        .fetch_all(executor)
        .await?;

    Ok(bookings)
}

pub async fn bookings_for_user<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
) -> Result<Vec<DbPairBooking>> {
    let sql = format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM pair_bookings
        WHERE user_a = $1 OR user_b = $1
        ORDER BY date DESC, start_minute ASC
        "#
    );

    let bookings = sqlx::query_as::<_, DbPairBooking>(&sql)
        .bind(user_id)
        .fetch_all(executor)
        .await?;

    Ok(bookings)
}

/// Flips a pending booking to approved; `None` if it was missing or already approved.
pub async fn approve_if_pending<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<DbPairBooking>> {
    let sql = format!(
        r#"
        UPDATE pair_bookings
        SET is_approved = TRUE
        WHERE id = $1 AND is_approved = FALSE
        RETURNING {BOOKING_COLUMNS}
        "#
    );

    let booking = sqlx::query_as::<_, DbPairBooking>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(booking)
}

pub async fn delete_booking<'e, E: PgExecutor<'e>>(executor: E, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM pair_bookings
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}
