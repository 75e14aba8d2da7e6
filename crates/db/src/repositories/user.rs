use crate::models::DbUser;
use eyre::Result;
use sqlx::PgExecutor;
use uuid::Uuid;

pub async fn upsert_user<'e, E: PgExecutor<'e>>(executor: E, user: &DbUser) -> Result<DbUser> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (id, name, email, company, phone, device_token, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (id)
        DO UPDATE SET name = $2, email = $3, company = $4, phone = $5, device_token = $6
        RETURNING id, name, email, company, phone, device_token, created_at
        "#,
    )
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.company)
    .bind(&user.phone)
    .bind(&user.device_token)
    .bind(user.created_at)
    .fetch_one(executor)
    .await?;

    Ok(user)
}

pub async fn get_user_by_id<'e, E: PgExecutor<'e>>(executor: E, id: Uuid) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, name, email, company, phone, device_token, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

pub async fn update_device_token<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    device_token: Option<&str>,
) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        UPDATE users
        SET device_token = $2
        WHERE id = $1
        RETURNING id, name, email, company, phone, device_token, created_at
        "#,
    )
    .bind(id)
    .bind(device_token)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}
