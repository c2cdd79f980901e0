use crate::db::models::{CascadeReport, NewUser, User};
use crate::db::schema::{SQLITE_DROP, SQLITE_INIT, USER_OWNED_TABLES, statements};
use crate::db::validate::Validate;
use crate::error::RolsaError;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

pub type SqlitePool = Pool<Sqlite>;

pub(crate) const USER_COLUMNS: &str = "id, full_name, email, password_hash, role, created_at";

/// Handle to the account & booking database.
///
/// Cheap to clone; every clone shares the same connection pool.
#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database at `database_url`.
    ///
    /// Foreign keys are switched on for every pooled connection and writers
    /// wait up to five seconds on a locked database.
    pub async fn connect(database_url: &str) -> Result<Self, RolsaError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        debug!(database_url, "sqlite pool ready");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create every table and index that does not exist yet.
    pub async fn create_all(&self) -> Result<(), RolsaError> {
        // sqlx::query runs one statement at a time
        for stmt in statements(SQLITE_INIT) {
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Drop every table. All data is lost.
    pub async fn drop_all(&self) -> Result<(), RolsaError> {
        warn!("dropping all tables");
        for stmt in statements(SQLITE_DROP) {
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn create_user(&self, new: NewUser) -> Result<User, RolsaError> {
        new.validate()?;
        let user: User = sqlx::query_as(&format!(
            "INSERT INTO users (full_name, email, password_hash, role, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(new.full_name)
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RolsaError::from_write(e, "users", None))?;
        info!(user_id = user.id, role = %user.role, "user created");
        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>, RolsaError> {
        let user = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RolsaError> {
        let user = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Persist every mutable field of `user`. `created_at` is never rewritten.
    pub async fn update_user(&self, user: &User) -> Result<(), RolsaError> {
        user.validate()?;
        let res = sqlx::query(
            "UPDATE users SET full_name = ?, email = ?, password_hash = ?, role = ? WHERE id = ?",
        )
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(|e| RolsaError::from_write(e, "users", None))?;
        if res.rows_affected() == 0 {
            return Err(RolsaError::NotFound {
                table: "users",
                id: user.id,
            });
        }
        Ok(())
    }

    /// Delete a user and every row it owns in one transaction.
    ///
    /// Either all rows go or none do: any failure before the commit rolls the
    /// whole cascade back and is reported as a storage error.
    pub async fn delete_user(&self, id: i64) -> Result<CascadeReport, RolsaError> {
        let mut tx = self.pool.begin().await?;
        let mut counts = [0u64; USER_OWNED_TABLES.len()];

        for (table, count) in USER_OWNED_TABLES.iter().zip(counts.iter_mut()) {
            *count = sqlx::query(&format!("DELETE FROM {table} WHERE user_id = ?"))
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        let res = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if res.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(RolsaError::NotFound { table: "users", id });
        }

        tx.commit().await?;

        let [admins, accessibility_settings, bookings, carbon_calculations, energy_usage_records] =
            counts;
        let report = CascadeReport {
            admins,
            accessibility_settings,
            bookings,
            carbon_calculations,
            energy_usage_records,
        };
        info!(
            user_id = id,
            bookings = report.bookings,
            carbon_calculations = report.carbon_calculations,
            energy_usage_records = report.energy_usage_records,
            admins = report.admins,
            accessibility_settings = report.accessibility_settings,
            "user deleted"
        );
        Ok(report)
    }

    /// Shared tail of the single-row deletes: map zero affected rows to `NotFound`.
    pub(crate) async fn delete_by_id(&self, table: &'static str, id: i64) -> Result<(), RolsaError> {
        let res = sqlx::query(&format!("DELETE FROM {table} WHERE id = ?"))
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(RolsaError::NotFound { table, id });
        }
        debug!(table, id, "row deleted");
        Ok(())
    }
}
