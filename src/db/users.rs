use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

// TODO: store password hashes instead of the plaintext value
#[derive(Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
}

pub async fn get_user(pool: &SqlitePool, id: i64) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT * FROM users WHERE users.id = ?1
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT * FROM users WHERE users.username = ?1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn create_user(pool: &SqlitePool, username: &str, password: &str) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;
    let user_id = sqlx::query(
        r#"
        INSERT INTO users (username, password) VALUES (?1, ?2)
        "#,
    )
    .bind(username)
    .bind(password)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(user_id)
}
