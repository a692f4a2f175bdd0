use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::time::Duration;

use log::{debug, error};
use rocket::{
    http::Status,
    request::{self, FromRequest, Request},
};
use sqlx::{
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Error as DbError, Sqlite, SqliteConnection, SqlitePool,
};

use super::schema::{ensure_candidates_seeded, ensure_tables_exist};

/// How long a writer waits on a locked database file before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (creating if needed) the store at `path`, make sure the tables exist,
/// and seed the given candidates if there are none yet.
pub async fn open<P, S>(path: P, seed_candidates: &[S]) -> Result<SqlitePool, DbError>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    debug!("Opening store at {}", path.as_ref().display());
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .busy_timeout(BUSY_TIMEOUT);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    ensure_tables_exist(&pool).await?;
    ensure_candidates_seeded(&pool, seed_candidates).await?;

    Ok(pool)
}

/// A store connection checked out of the managed pool for the lifetime of a
/// single request. It goes back to the pool when the guard is dropped.
pub struct Db(PoolConnection<Sqlite>);

impl Deref for Db {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Db {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Db {
    type Error = DbError;

    /// Check a connection out of the [`SqlitePool`] in managed state.
    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let Some(pool) = req.rocket().state::<SqlitePool>() else {
            error!("No store pool in managed state");
            return request::Outcome::Failure((Status::InternalServerError, DbError::PoolClosed));
        };

        match pool.acquire().await {
            Ok(conn) => request::Outcome::Success(Db(conn)),
            Err(e) => {
                error!("Failed to acquire a store connection: {e}");
                request::Outcome::Failure((Status::ServiceUnavailable, e))
            }
        }
    }
}
