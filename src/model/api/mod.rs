//! Form types, as submitted by browsers.

pub mod auth;
pub mod ballot;
