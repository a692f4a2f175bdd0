mod errors;
mod pool;
mod schema;

pub use errors::is_unique_violation;
pub use pool::{open, Db};
pub use schema::{ensure_candidates_seeded, ensure_tables_exist, DEFAULT_CANDIDATES};
