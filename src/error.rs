use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RolsaError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Referenced {table} row {id} does not exist")]
    Reference { table: &'static str, id: i64 },

    #[error("No row {id} in {table}")]
    NotFound { table: &'static str, id: i64 },

    #[error("Database error: {0}")]
    Storage(#[from] SqlxError),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("Invalid password hashing parameters: {0}")]
    HashParams(String),
}

impl RolsaError {
    pub fn validation(msg: impl Into<String>) -> Self {
        RolsaError::Validation(msg.into())
    }

    /// Classify an error raised while writing a row that points at `users.id`.
    ///
    /// Unique, NOT NULL and CHECK violations become `Validation`, a foreign key
    /// violation becomes `Reference` against `user_id`, anything else stays a
    /// storage failure.
    pub(crate) fn from_write(err: SqlxError, table: &'static str, user_id: Option<i64>) -> Self {
        let SqlxError::Database(db) = &err else {
            return RolsaError::Storage(err);
        };
        if db.is_unique_violation() {
            return RolsaError::Validation(format!("{table}: duplicate value ({})", db.message()));
        }
        if db.is_foreign_key_violation() {
            return RolsaError::Reference {
                table: "users",
                id: user_id.unwrap_or_default(),
            };
        }
        if db.is_check_violation() {
            return RolsaError::Validation(format!("{table}: {}", db.message()));
        }
        match db.kind() {
            sqlx::error::ErrorKind::NotNullViolation => {
                RolsaError::Validation(format!("{table}: {}", db.message()))
            }
            _ => RolsaError::Storage(err),
        }
    }
}
