use log::{debug, info};
use sqlx::{Error as DbError, SqlitePool};

/// Candidates seeded into an empty store when no others are configured.
pub const DEFAULT_CANDIDATES: [&str; 3] = ["Candidate A", "Candidate B", "Candidate C"];

const CREATE_VOTERS: &str = "CREATE TABLE IF NOT EXISTS voters (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    voter_id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    has_voted INTEGER NOT NULL DEFAULT 0
)";

const CREATE_CANDIDATES: &str = "CREATE TABLE IF NOT EXISTS candidates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    votes INTEGER NOT NULL DEFAULT 0 CHECK (votes >= 0)
)";

/// Ensure that both tables exist.
///
/// This operation is idempotent.
pub async fn ensure_tables_exist(pool: &SqlitePool) -> Result<(), DbError> {
    debug!("Ensuring store tables exist");
    sqlx::query(CREATE_VOTERS).execute(pool).await?;
    sqlx::query(CREATE_CANDIDATES).execute(pool).await?;
    Ok(())
}

/// Insert the given candidates, in order, if and only if the candidate table
/// is empty. Returns how many were inserted.
pub async fn ensure_candidates_seeded<S: AsRef<str>>(
    pool: &SqlitePool,
    names: &[S],
) -> Result<u64, DbError> {
    let mut tx = pool.begin().await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM candidates")
        .fetch_one(&mut *tx)
        .await?;
    if existing > 0 {
        debug!("Found {existing} candidates, skipping seed");
        return Ok(0);
    }

    let mut seeded = 0;
    for name in names {
        seeded += sqlx::query("INSERT INTO candidates (name) VALUES (?1)")
            .bind(name.as_ref())
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }
    tx.commit().await?;

    info!("Seeded {seeded} candidates");
    Ok(seeded)
}
