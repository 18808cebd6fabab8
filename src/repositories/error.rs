//! Store errors shared by the in-memory and PostgreSQL repositories

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    /// Unique constraint violated; carries the constraint or key involved
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// Foreign key violated; carries the constraint involved
    #[error("foreign key violated: {0}")]
    ForeignKey(String),

    /// Value rejected by the store (not-null, check constraint, bad cast)
    #[error("invalid data: {0}")]
    Invalid(String),

    #[error("database unavailable")]
    Unavailable,

    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Database(sqlx::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorClass {
    Conflict,
    ForeignKey,
    Invalid,
}

/// SQLSTATE codes with a domain meaning; anything else stays a database error
const SQLSTATE_TABLE: &[(&str, ErrorClass)] = &[
    ("23505", ErrorClass::Conflict),   // unique_violation
    ("23503", ErrorClass::ForeignKey), // foreign_key_violation
    ("23502", ErrorClass::Invalid),    // not_null_violation
    ("23514", ErrorClass::Invalid),    // check_violation
    ("22P02", ErrorClass::Invalid),    // invalid_text_representation
    ("22001", ErrorClass::Invalid),    // string_data_right_truncation
];

fn classify(code: &str) -> Option<ErrorClass> {
    SQLSTATE_TABLE
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, class)| *class)
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => Self::Unavailable,
            sqlx::Error::Database(db_err) => {
                let detail = db_err
                    .constraint()
                    .map(str::to_string)
                    .unwrap_or_else(|| db_err.message().to_string());
                let class = db_err.code().as_deref().and_then(classify);
                match class {
                    Some(ErrorClass::Conflict) => Self::Conflict(detail),
                    Some(ErrorClass::ForeignKey) => Self::ForeignKey(detail),
                    Some(ErrorClass::Invalid) => Self::Invalid(detail),
                    None => Self::Database(sqlx::Error::Database(db_err)),
                }
            }
            other => Self::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlstate_lookup() {
        assert_eq!(classify("23505"), Some(ErrorClass::Conflict));
        assert_eq!(classify("23503"), Some(ErrorClass::ForeignKey));
        assert_eq!(classify("23502"), Some(ErrorClass::Invalid));
        assert_eq!(classify("40001"), None);
    }

    #[test]
    fn test_row_not_found_and_pool_errors() {
        assert!(matches!(StoreError::from(sqlx::Error::RowNotFound), StoreError::NotFound));
        assert!(matches!(StoreError::from(sqlx::Error::PoolTimedOut), StoreError::Unavailable));
        assert!(matches!(
            StoreError::from(sqlx::Error::Protocol("boom".into())),
            StoreError::Database(_)
        ));
    }
}
