#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{
    fs::{relative, FileServer},
    Build, Rocket,
};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod view;

pub use config::Config;

use config::{ConfigFairing, DatabaseFairing};
use logging::LoggerFairing;

/// Build the server: logging, config and store fairings, plus every route.
pub fn build() -> Rocket<Build> {
    mount(rocket::build())
        .attach(LoggerFairing)
        .attach(ConfigFairing)
        .attach(DatabaseFairing)
}

/// Mount the pages and the stylesheet directory.
fn mount(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .mount("/", api::routes())
        .mount("/static", FileServer::from(relative!("static")))
}

/// Build a server around an already-open store, with the example config.
#[cfg(test)]
fn rocket_for_pool(pool: sqlx::SqlitePool) -> Rocket<Build> {
    mount(rocket::build())
        .manage(Config::example())
        .manage(pool)
}
