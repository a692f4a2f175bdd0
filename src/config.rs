use chrono::Duration;
use log::{error, info};
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::sqlite::{self, DEFAULT_CANDIDATES};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Deserialize)]
pub struct Config {
    // non-secrets
    auth_ttl: u32,
    // secrets
    jwt_secret: String,
}

impl Config {
    /// Valid lifetime of the session cookie in seconds.
    pub fn auth_ttl(&self) -> Duration {
        Duration::seconds(self.auth_ttl.into())
    }

    /// Secret key used to sign session JWTs.
    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

/// A fairing that loads the application config and puts it in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

fn default_seed_candidates() -> Vec<String> {
    DEFAULT_CANDIDATES.iter().map(ToString::to_string).collect()
}

/// Configuration for the store.
#[derive(Deserialize)]
struct DbConfig {
    /// Path of the SQLite file, created if missing.
    db_path: String,
    /// Candidates to insert when the candidate table is empty.
    #[serde(default = "default_seed_candidates")]
    seed_candidates: Vec<String>,
}

/// A fairing that loads the store config, opens the SQLite file, creates the
/// tables and seeds candidates if necessary, and places the `SqlitePool`
/// into managed state.
pub struct DatabaseFairing;

#[rocket::async_trait]
impl Fairing for DatabaseFairing {
    fn info(&self) -> Info {
        Info {
            name: "SQLite",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<DbConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load database config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        info!("Loaded database config, opening {}...", config.db_path);

        let pool = match sqlite::open(&config.db_path, &config.seed_candidates).await {
            Ok(pool) => pool,
            Err(e) => {
                error!("Failed to open database: {e}");
                return Err(rocket);
            }
        };
        info!("...database online!");

        // Manage the state.
        rocket = rocket.manage(pool);
        Ok(rocket)
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Config {
        pub fn example() -> Self {
            Self::with_secret("test-only jwt secret")
        }

        pub fn with_secret(secret: &str) -> Self {
            Self {
                auth_ttl: 3600,
                jwt_secret: secret.to_string(),
            }
        }
    }
}
