use rocket::{
    form::{Errors, Form},
    request::FlashMessage,
    response::{content::RawHtml, Redirect},
    Route,
};

use crate::error::{Error, Result};
use crate::model::{
    api::ballot::BallotForm,
    auth::VoterSession,
    db::{cast_vote, Candidate},
    sqlite::Db,
};
use crate::view;

use super::common::eligible_voter;

pub fn routes() -> Vec<Route> {
    routes![ballot, cast]
}

/// The candidate list, for a logged-in voter who has not voted yet.
#[get("/vote")]
pub async fn ballot(
    session: VoterSession,
    mut db: Db,
    flash: Option<FlashMessage<'_>>,
) -> Result<RawHtml<String>> {
    let voter = eligible_voter(&session, &mut db).await?;
    let candidates = Candidate::all(&mut db).await?;
    Ok(view::vote(&voter, &candidates, flash))
}

#[post("/vote", data = "<submitted>")]
pub async fn cast(
    session: VoterSession,
    mut db: Db,
    submitted: std::result::Result<Form<BallotForm>, Errors<'_>>,
) -> Result<Redirect> {
    // Refuse voters who may not vote before looking at what they submitted.
    let voter = eligible_voter(&session, &mut db).await?;
    let submitted = submitted.map_err(|_| Error::NoCandidate)?;

    cast_vote(&mut db, &voter.voter_id, submitted.candidate).await?;
    Ok(Redirect::to(uri!(super::public::thank_you)))
}
