use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Open the station database. Foreign keys are enforced on every connection.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// In-memory database on a single long-lived connection, for tests and demos
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

pub async fn migrate(db: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(db).await
}

/// Migrated in-memory database holding one radio and `tracks` library tracks
#[cfg(test)]
pub(crate) async fn seeded_radio(tracks: usize) -> (SqlitePool, i64, Vec<i64>) {
    let db = connect_in_memory().await.unwrap();
    migrate(&db).await.unwrap();

    let now = chrono::Utc::now();
    let radio: i64 =
        sqlx::query_scalar("INSERT INTO radios (name, created_at) VALUES ('test', ?) RETURNING id")
            .bind(now)
            .fetch_one(&db)
            .await
            .unwrap();

    let mut ids = Vec::with_capacity(tracks);
    for n in 1..=tracks {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO tracks (title, artist, album, duration, path, created_at)
             VALUES (?, 'Artist', 'Album', 200, ?, ?) RETURNING id",
        )
        .bind(format!("Track {}", n))
        .bind(format!("/music/{}.mp3", n))
        .bind(now)
        .fetch_one(&db)
        .await
        .unwrap();
        ids.push(id);
    }

    (db, radio, ids)
}
