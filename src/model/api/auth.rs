use rand::Rng;

use crate::error::Error;
use crate::model::db::NewVoter;

/// A registration form as submitted by a prospective voter. The password is
/// in plaintext and is never stored directly.
#[derive(Clone, FromForm, UriDisplayQuery)]
pub struct Registration {
    #[field(validate = len(1..))]
    pub voter_id: String,
    #[field(validate = len(1..))]
    pub name: String,
    #[field(validate = len(1..))]
    pub password: String,
}

impl TryFrom<Registration> for NewVoter {
    type Error = Error;

    /// Convert a [`Registration`] to a [`NewVoter`] by hashing the password.
    fn try_from(registration: Registration) -> Result<Self, Self::Error> {
        let mut salt = [0_u8; 16];
        rand::thread_rng().fill(&mut salt);
        let password_hash = argon2::hash_encoded(
            registration.password.as_bytes(),
            &salt,
            &argon2::Config::default(),
        )?;

        Ok(Self {
            voter_id: registration.voter_id,
            name: registration.name,
            password_hash,
        })
    }
}

/// Login credentials as submitted by a voter.
#[derive(Clone, FromForm, UriDisplayQuery)]
pub struct Credentials {
    #[field(validate = len(1..))]
    pub voter_id: String,
    #[field(validate = len(1..))]
    pub password: String,
}
