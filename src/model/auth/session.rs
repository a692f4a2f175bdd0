use log::{error, warn};
use rocket::{
    http::{Cookie, CookieJar, Status},
    request::{self, FromRequest, Request},
};

use crate::error::{Error, Result};
use crate::Config;

use super::token::{AuthToken, AUTH_TOKEN_COOKIE};

/// The per-request view of who is logged in.
///
/// This guard never fails: a missing, expired, or forged cookie simply yields
/// an anonymous session. Handlers that need a voter call [`Self::voter_id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoterSession {
    token: Option<AuthToken>,
}

impl VoterSession {
    /// A session with nobody logged in.
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    /// The logged-in voter's identifier, if any.
    pub fn current(&self) -> Option<&str> {
        self.token.as_ref().map(AuthToken::voter_id)
    }

    /// The logged-in voter's identifier, or [`Error::NotAuthenticated`].
    pub fn voter_id(&self) -> Result<&str> {
        self.current().ok_or(Error::NotAuthenticated)
    }

    /// Bind the browser session to the given voter.
    pub fn bind(cookies: &CookieJar<'_>, voter_id: &str, config: &Config) -> Result<()> {
        cookies.add(AuthToken::new(voter_id).into_cookie(config)?);
        Ok(())
    }

    /// Clear any binding. Does nothing if there was none.
    pub fn clear(cookies: &CookieJar<'_>) {
        cookies.remove(Cookie::named(AUTH_TOKEN_COOKIE));
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for VoterSession {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let Some(config) = req.rocket().state::<Config>() else {
            error!("No application config in managed state");
            return request::Outcome::Failure((Status::InternalServerError, ()));
        };

        let session = match req.cookies().get(AUTH_TOKEN_COOKIE) {
            None => Self::anonymous(),
            Some(cookie) => match AuthToken::from_cookie(cookie, config) {
                Ok(token) => Self { token: Some(token) },
                Err(e) => {
                    warn!("Ignoring invalid session cookie: {e}");
                    Self::anonymous()
                }
            },
        };
        request::Outcome::Success(session)
    }
}
