use log::info;
use sqlx::{Connection, SqliteConnection};

use crate::error::{Error, Result};

use super::{CandidateId, Voter};

/// Record `voter_id`'s vote for `candidate`.
///
/// The voter's flag flip and the candidate's increment commit together or not
/// at all. The flag is only flipped from false, so of any number of concurrent
/// casts by one voter at most one commits. Fails with:
///
/// - [`Error::AlreadyVoted`] if the voter has voted before,
/// - [`Error::NotAuthenticated`] if no such voter exists,
/// - [`Error::UnknownCandidate`] if no such candidate exists.
pub async fn cast_vote(
    conn: &mut SqliteConnection,
    voter_id: &str,
    candidate: CandidateId,
) -> Result<()> {
    let mut tx = conn.begin().await?;

    let flagged = sqlx::query("UPDATE voters SET has_voted = 1 WHERE voter_id = ?1 AND has_voted = 0")
        .bind(voter_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if flagged == 0 {
        return match Voter::find(&mut tx, voter_id).await? {
            Some(_) => Err(Error::AlreadyVoted),
            None => Err(Error::NotAuthenticated),
        };
    }

    let counted = sqlx::query("UPDATE candidates SET votes = votes + 1 WHERE id = ?1")
        .bind(candidate)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if counted == 0 {
        // Dropping `tx` rolls the flag back.
        return Err(Error::UnknownCandidate(candidate));
    }

    tx.commit().await?;
    info!("Voter {voter_id} voted for candidate {candidate}");
    Ok(())
}
