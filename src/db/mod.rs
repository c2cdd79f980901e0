//! Database module: models, schema and the storage handle.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows, plus the `New*` insert shapes
//! - `schema.rs`: SQL DDL for creating and dropping the tables (SQLite)
//! - `validate.rs`: checks run before any row is written
//! - `sqlite.rs`: `Storage`, schema lifecycle, users and the cascading delete
//! - `profiles.rs` / `activity.rs`: the remaining per-table operations on `Storage`

pub mod activity;
pub mod models;
pub mod profiles;
pub mod schema;
pub mod sqlite;
pub mod validate;

pub use models::{
    AccessibilitySettings, Admin, Booking, CarbonCalculation, CascadeReport, EnergyUsageRecord,
    NewAccessibilitySettings, NewAdmin, NewBooking, NewCarbonCalculation, NewEnergyUsageRecord,
    NewUser, User,
};
pub use schema::{SQLITE_DROP, SQLITE_INIT};
pub use sqlite::{SqlitePool, Storage};
pub use validate::Validate;
