//! Store-backed types.
//!
//! Every type in this module maps onto a row of the SQLite store, and the
//! functions alongside them are the only places that issue SQL.

mod candidate;
pub use candidate::{Candidate, CandidateId};

mod vote;
pub use vote::cast_vote;

mod voter;
pub use voter::{NewVoter, Voter, VoterCore};
