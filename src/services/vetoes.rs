use crate::error::Result;
use crate::models::Veto;
use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

/// Record a veto. A user vetoes a given track at most once; a repeat is a
/// no-op and returns false.
pub async fn create(
    conn: &mut SqliteConnection,
    user_id: Uuid,
    track_id: i64,
    radio_id: i64,
) -> Result<bool> {
    let result = sqlx::query(
        "INSERT INTO vetoes (user_id, track_id, radio_id, created_at)
         VALUES (?, ?, ?, ?)
         ON CONFLICT (user_id, track_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(track_id)
    .bind(radio_id)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_for_user(conn: &mut SqliteConnection, user_id: Uuid) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM vetoes WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}

pub async fn count_for_track(conn: &mut SqliteConnection, track_id: i64) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM vetoes WHERE track_id = ?")
        .bind(track_id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}

pub async fn for_user(conn: &mut SqliteConnection, user_id: Uuid) -> Result<Vec<Veto>> {
    let vetoes = sqlx::query_as::<_, Veto>(
        "SELECT * FROM vetoes WHERE user_id = ? ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(vetoes)
}
