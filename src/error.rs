use argon2::Error as Argon2Error;
use jsonwebtoken::errors::Error as JwtError;
use log::{error, warn};
use rocket::{
    http::Status,
    response::{Flash, Redirect, Responder},
    Request,
};
use sqlx::Error as DbError;
use thiserror::Error;

use crate::model::db::CandidateId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Jwt(#[from] JwtError),
    #[error(transparent)]
    Argon2(#[from] Argon2Error),
    #[error("Voter ID already registered")]
    DuplicateIdentifier,
    #[error("Missing or empty fields submitted to {0}")]
    IncompleteForm(&'static str),
    #[error("Invalid voter ID or password")]
    InvalidCredentials,
    #[error("No voter is logged in")]
    NotAuthenticated,
    #[error("Voter has already voted")]
    AlreadyVoted,
    #[error("No candidate with ID {0}")]
    UnknownCandidate(CandidateId),
    #[error("No candidate selected")]
    NoCandidate,
}

impl Error {
    /// Is this an expected refusal that the voter can recover from, as opposed
    /// to a failure of the server itself?
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Db(_) | Self::Jwt(_) | Self::Argon2(_))
    }

    /// The user-facing notice shown after the redirect.
    fn notice(&self) -> &'static str {
        match self {
            Self::DuplicateIdentifier => "Voter ID already exists!",
            Self::IncompleteForm(_) => "Please fill in every field.",
            Self::InvalidCredentials => "Invalid Voter ID or Password!",
            Self::NotAuthenticated => "Please login first!",
            Self::AlreadyVoted => "You have already voted.",
            Self::UnknownCandidate(_) | Self::NoCandidate => {
                "Please choose one of the listed candidates."
            }
            Self::Db(_) | Self::Jwt(_) | Self::Argon2(_) => "Something went wrong.",
        }
    }

    /// The flash kind, which the pages render as the `alert-{kind}` class.
    fn flash_kind(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "warning",
            _ => "danger",
        }
    }

    /// Where the voter should be sent to recover.
    fn redirect_target(&self) -> &'static str {
        match self {
            Self::DuplicateIdentifier => "/register",
            Self::IncompleteForm(view) => *view,
            Self::InvalidCredentials | Self::NotAuthenticated => "/login",
            Self::AlreadyVoted => "/already_voted",
            Self::UnknownCandidate(_) | Self::NoCandidate => "/vote",
            Self::Db(_) | Self::Jwt(_) | Self::Argon2(_) => "/",
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> rocket::response::Result<'o> {
        if !self.is_user_error() {
            error!("{} {}: {self}", req.method(), req.uri());
            return Err(Status::InternalServerError);
        }

        warn!("{} {}: {self}", req.method(), req.uri());
        let redirect = Redirect::to(self.redirect_target());
        match self {
            // Arriving at the already-voted page is its own notice.
            Self::AlreadyVoted => redirect.respond_to(req),
            _ => Flash::new(redirect, self.flash_kind(), self.notice()).respond_to(req),
        }
    }
}
