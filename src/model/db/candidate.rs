use std::fmt::{Display, Formatter};

use rocket::form::{self, FromFormField, ValueField};
use sqlx::{FromRow, SqliteConnection};

use crate::error::Result;

/// Row ID of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct CandidateId(pub i64);

impl Display for CandidateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[rocket::async_trait]
impl<'r> FromFormField<'r> for CandidateId {
    fn from_value(field: ValueField<'r>) -> form::Result<'r, Self> {
        i64::from_value(field).map(CandidateId)
    }
}

/// A candidate and their running tally.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub votes: i64,
}

impl Candidate {
    /// All candidates, in the order they were added.
    pub async fn all(conn: &mut SqliteConnection) -> Result<Vec<Self>> {
        let candidates = sqlx::query_as("SELECT id, name, votes FROM candidates ORDER BY id")
            .fetch_all(&mut *conn)
            .await?;
        Ok(candidates)
    }

    /// All candidates, most votes first. Ties keep the order candidates were added.
    pub async fn by_votes(conn: &mut SqliteConnection) -> Result<Vec<Self>> {
        let candidates =
            sqlx::query_as("SELECT id, name, votes FROM candidates ORDER BY votes DESC, id ASC")
                .fetch_all(&mut *conn)
                .await?;
        Ok(candidates)
    }
}
