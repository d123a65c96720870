use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// A question/answer pair, finalized in a single insert. `answer` is
/// nullable in the schema but every row this service writes has it set.
#[derive(Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub user_id: i64,
    pub question: String,
    pub answer: Option<String>,
}

pub async fn create_question(
    pool: &SqlitePool,
    user_id: i64,
    question: &str,
    answer: &str,
) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;
    let id = sqlx::query(
        r#"
        INSERT INTO questions (user_id, question, answer) VALUES (?1, ?2, ?3)
        "#,
    )
    .bind(user_id)
    .bind(question)
    .bind(answer)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

pub async fn get_questions_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT * FROM questions WHERE questions.user_id = ?1 ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
