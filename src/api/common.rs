use sqlx::SqliteConnection;

use crate::error::{Error, Result};
use crate::model::{auth::VoterSession, db::Voter};

/// Return the logged-in voter, provided they are still allowed to vote.
///
/// A session naming a voter that does not exist counts as no session at all.
pub async fn eligible_voter(session: &VoterSession, conn: &mut SqliteConnection) -> Result<Voter> {
    let voter_id = session.voter_id()?;
    let voter = Voter::find(conn, voter_id)
        .await?
        .ok_or(Error::NotAuthenticated)?;

    if voter.has_voted {
        return Err(Error::AlreadyVoted);
    }
    Ok(voter)
}
