//! SQL DDL for the account & booking tables (SQLite).

/// Creates every table and index if missing. Safe to run on every start.
///
/// - `users.email` UNIQUE (plus an explicit lookup index)
/// - `admins.user_id` and `accessibility_settings.user_id` UNIQUE for the 1:1 profiles
/// - every `user_id` is a foreign key to `users(id)` with `ON DELETE CASCADE`
/// - measurement columns carry `CHECK (... >= 0)`
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'customer',
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);

CREATE TABLE IF NOT EXISTS admins (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    admin_level TEXT NOT NULL DEFAULT 'staff',
    permissions TEXT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS bookings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    booking_type TEXT NOT NULL,
    service_type TEXT NOT NULL,
    preferred_date TEXT NOT NULL, -- YYYY-MM-DD
    preferred_time TEXT NOT NULL, -- HH:MM:SS
    address_line1 TEXT NULL,
    address_line2 TEXT NULL,
    city TEXT NULL,
    postcode TEXT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    notes TEXT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_bookings_user_id ON bookings(user_id);

CREATE TABLE IF NOT EXISTS carbon_calulations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    electricity_kwh REAL NULL CHECK (electricity_kwh >= 0),
    gas_kwh REAL NULL CHECK (gas_kwh >= 0),
    petrol_car_miles REAL NULL CHECK (petrol_car_miles >= 0),
    ev_miles REAL NULL CHECK (ev_miles >= 0),
    period_start TEXT NULL,
    period_end TEXT NULL,
    co2_kg REAL NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_carbon_calulations_user_id ON carbon_calulations(user_id);

CREATE TABLE IF NOT EXISTS energy_usage_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    record_date TEXT NOT NULL,
    electricity_kwh REAL NULL CHECK (electricity_kwh >= 0),
    gas_kwh REAL NULL CHECK (gas_kwh >= 0),
    solar_generation_kwh REAL NULL CHECK (solar_generation_kwh >= 0),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_energy_usage_records_user_id ON energy_usage_records(user_id);

CREATE TABLE IF NOT EXISTS accessibility_settings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    language TEXT NOT NULL DEFAULT 'en',
    high_contrast INTEGER NOT NULL DEFAULT 0,
    reduced_motion INTEGER NOT NULL DEFAULT 0,
    font_scale REAL NOT NULL DEFAULT 1.0,
    updated_at TEXT NOT NULL
)
"#;

/// Drops every table, children first. Destroys all data.
pub const SQLITE_DROP: &str = r#"
DROP TABLE IF EXISTS accessibility_settings;
DROP TABLE IF EXISTS energy_usage_records;
DROP TABLE IF EXISTS carbon_calulations;
DROP TABLE IF EXISTS bookings;
DROP TABLE IF EXISTS admins;
DROP TABLE IF EXISTS users
"#;

/// Tables holding rows owned by a user, in cascade order.
pub const USER_OWNED_TABLES: [&str; 5] = [
    "admins",
    "accessibility_settings",
    "bookings",
    "carbon_calulations",
    "energy_usage_records",
];

/// Split a DDL script into individual statements.
pub(crate) fn statements(script: &str) -> impl Iterator<Item = &str> {
    script.split(';').map(str::trim).filter(|s| !s.is_empty())
}
