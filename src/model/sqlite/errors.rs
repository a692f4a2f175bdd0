//! Classification of the store errors the handlers care about.

use sqlx::Error as DbError;

/// Return true if the given error is a violation of a UNIQUE constraint.
pub fn is_unique_violation(err: &DbError) -> bool {
    match err {
        DbError::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
