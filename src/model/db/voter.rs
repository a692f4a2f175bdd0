use std::ops::Deref;

use sqlx::{FromRow, SqliteConnection};

use crate::error::{Error, Result};
use crate::model::sqlite::is_unique_violation;

/// Core voter data, as stored in the database.
#[derive(Debug, PartialEq, Eq, FromRow)]
pub struct VoterCore {
    /// The identifier the voter registered and logs in with. Unique.
    pub voter_id: String,
    /// Display name.
    pub name: String,
    /// Argon2 encoding of the voter's password.
    pub password_hash: String,
}

impl VoterCore {
    /// Check whether the given password is exactly the one registered.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> Result<bool> {
        Ok(argon2::verify_encoded(
            &self.password_hash,
            password.as_ref(),
        )?)
    }
}

/// A voter that has not been inserted yet.
pub type NewVoter = VoterCore;

impl NewVoter {
    /// Insert this voter, who has not yet voted. Returns the new row ID.
    ///
    /// Fails with [`Error::DuplicateIdentifier`] if the voter ID is taken; any
    /// other store failure is passed through untouched.
    pub async fn insert(&self, conn: &mut SqliteConnection) -> Result<i64> {
        let result =
            sqlx::query("INSERT INTO voters (voter_id, name, password_hash) VALUES (?1, ?2, ?3)")
                .bind(&self.voter_id)
                .bind(&self.name)
                .bind(&self.password_hash)
                .execute(&mut *conn)
                .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(e) if is_unique_violation(&e) => Err(Error::DuplicateIdentifier),
            Err(e) => Err(e.into()),
        }
    }
}

/// A voter from the database, with its row ID and voting status.
#[derive(Debug, FromRow)]
pub struct Voter {
    pub id: i64,
    #[sqlx(flatten)]
    pub voter: VoterCore,
    pub has_voted: bool,
}

impl Voter {
    /// Look a voter up by the identifier they registered with.
    pub async fn find(conn: &mut SqliteConnection, voter_id: &str) -> Result<Option<Self>> {
        let voter = sqlx::query_as(
            "SELECT id, voter_id, name, password_hash, has_voted FROM voters WHERE voter_id = ?1",
        )
        .bind(voter_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(voter)
    }
}

impl Deref for Voter {
    type Target = VoterCore;

    fn deref(&self) -> &Self::Target {
        &self.voter
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    use crate::model::api::auth::Registration;

    impl VoterCore {
        pub fn example() -> Self {
            Registration::example().try_into().unwrap()
        }

        pub fn example2() -> Self {
            Registration::example2().try_into().unwrap()
        }
    }

    impl Voter {
        pub async fn count(conn: &mut SqliteConnection) -> Result<i64> {
            let count = sqlx::query_scalar("SELECT COUNT(*) FROM voters")
                .fetch_one(&mut *conn)
                .await?;
            Ok(count)
        }
    }
}
