mod session;
mod token;

pub use session::VoterSession;
pub use token::{AuthToken, AUTH_TOKEN_COOKIE};
