use crate::model::db::CandidateId;

/// A ballot as submitted from the candidate list: the ID of the chosen
/// candidate. Whether that candidate exists is only known to the store.
#[derive(Debug, FromForm)]
pub struct BallotForm {
    pub candidate: CandidateId,
}
