use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::credential::PasswordHasher;
use crate::db::validate::{self, Validate};
use crate::error::RolsaError;
use crate::types::{AdminLevel, BookingStatus, BookingType, Language, Role, ServiceType};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Replace the stored digest. Nothing is written until `Storage::update_user`.
    pub fn set_password(&mut self, hasher: &PasswordHasher, raw: &str) -> Result<(), RolsaError> {
        self.password_hash = hasher.hash(raw)?;
        Ok(())
    }

    pub fn check_password(&self, hasher: &PasswordHasher, raw: &str) -> bool {
        hasher.verify(raw, &self.password_hash)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl NewUser {
    /// A customer with no password yet; call `set_password` before inserting.
    pub fn new(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            password_hash: String::new(),
            role: Role::default().into(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role.into();
        self
    }

    pub fn set_password(&mut self, hasher: &PasswordHasher, raw: &str) -> Result<(), RolsaError> {
        self.password_hash = hasher.hash(raw)?;
        Ok(())
    }
}

fn validate_user_fields(
    full_name: &str,
    email: &str,
    password_hash: &str,
    role: &str,
) -> Result<(), RolsaError> {
    validate::required("full_name", full_name, 80)?;
    validate::email(email)?;
    validate::password_digest(password_hash)?;
    validate::required("role", role, 20)
}

impl Validate for NewUser {
    fn validate(&self) -> Result<(), RolsaError> {
        validate_user_fields(&self.full_name, &self.email, &self.password_hash, &self.role)
    }
}

impl Validate for User {
    fn validate(&self) -> Result<(), RolsaError> {
        validate_user_fields(&self.full_name, &self.email, &self.password_hash, &self.role)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Admin {
    pub id: i64,
    pub user_id: i64,
    pub admin_level: String,
    pub permissions: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAdmin {
    pub user_id: i64,
    pub admin_level: String,
    pub permissions: Option<String>,
}

impl NewAdmin {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            admin_level: AdminLevel::default().into(),
            permissions: None,
        }
    }

    pub fn with_level(mut self, level: AdminLevel) -> Self {
        self.admin_level = level.into();
        self
    }
}

fn validate_admin_fields(admin_level: &str, permissions: Option<&str>) -> Result<(), RolsaError> {
    validate::required("admin_level", admin_level, 30)?;
    validate::optional("permissions", permissions, 255)
}

impl Validate for NewAdmin {
    fn validate(&self) -> Result<(), RolsaError> {
        validate_admin_fields(&self.admin_level, self.permissions.as_deref())
    }
}

impl Validate for Admin {
    fn validate(&self) -> Result<(), RolsaError> {
        validate_admin_fields(&self.admin_level, self.permissions.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub booking_type: String,
    pub service_type: String,
    pub preferred_date: NaiveDate,
    pub preferred_time: NaiveTime,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub user_id: i64,
    pub booking_type: String,
    pub service_type: String,
    pub preferred_date: NaiveDate,
    pub preferred_time: NaiveTime,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub status: String,
    pub notes: Option<String>,
}

impl NewBooking {
    /// A `pending` booking with no address or notes.
    pub fn new(
        user_id: i64,
        booking_type: BookingType,
        service_type: ServiceType,
        preferred_date: NaiveDate,
        preferred_time: NaiveTime,
    ) -> Self {
        Self {
            user_id,
            booking_type: booking_type.into(),
            service_type: service_type.into(),
            preferred_date,
            preferred_time,
            address_line1: None,
            address_line2: None,
            city: None,
            postcode: None,
            status: BookingStatus::default().into(),
            notes: None,
        }
    }
}

struct BookingText<'a> {
    booking_type: &'a str,
    service_type: &'a str,
    address_line1: Option<&'a str>,
    address_line2: Option<&'a str>,
    city: Option<&'a str>,
    postcode: Option<&'a str>,
    status: &'a str,
}

impl BookingText<'_> {
    fn validate(&self) -> Result<(), RolsaError> {
        validate::required("booking_type", self.booking_type, 50)?;
        validate::required("service_type", self.service_type, 30)?;
        validate::optional("address_line1", self.address_line1, 120)?;
        validate::optional("address_line2", self.address_line2, 120)?;
        validate::optional("city", self.city, 60)?;
        validate::optional("postcode", self.postcode, 12)?;
        validate::required("status", self.status, 20)
    }
}

impl Validate for NewBooking {
    fn validate(&self) -> Result<(), RolsaError> {
        BookingText {
            booking_type: &self.booking_type,
            service_type: &self.service_type,
            address_line1: self.address_line1.as_deref(),
            address_line2: self.address_line2.as_deref(),
            city: self.city.as_deref(),
            postcode: self.postcode.as_deref(),
            status: &self.status,
        }
        .validate()
    }
}

impl Validate for Booking {
    fn validate(&self) -> Result<(), RolsaError> {
        BookingText {
            booking_type: &self.booking_type,
            service_type: &self.service_type,
            address_line1: self.address_line1.as_deref(),
            address_line2: self.address_line2.as_deref(),
            city: self.city.as_deref(),
            postcode: self.postcode.as_deref(),
            status: &self.status,
        }
        .validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct CarbonCalculation {
    pub id: i64,
    pub user_id: i64,
    pub electricity_kwh: Option<f64>,
    pub gas_kwh: Option<f64>,
    pub petrol_car_miles: Option<f64>,
    pub ev_miles: Option<f64>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub co2_kg: f64,
    pub created_at: DateTime<Utc>,
}

/// Inputs and result of a footprint calculation done elsewhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCarbonCalculation {
    pub user_id: i64,
    pub electricity_kwh: Option<f64>,
    pub gas_kwh: Option<f64>,
    pub petrol_car_miles: Option<f64>,
    pub ev_miles: Option<f64>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub co2_kg: f64,
}

impl Validate for NewCarbonCalculation {
    fn validate(&self) -> Result<(), RolsaError> {
        validate::non_negative("electricity_kwh", self.electricity_kwh)?;
        validate::non_negative("gas_kwh", self.gas_kwh)?;
        validate::non_negative("petrol_car_miles", self.petrol_car_miles)?;
        validate::non_negative("ev_miles", self.ev_miles)?;
        validate::period(self.period_start, self.period_end)?;
        validate::finite("co2_kg", self.co2_kg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct EnergyUsageRecord {
    pub id: i64,
    pub user_id: i64,
    pub record_date: NaiveDate,
    pub electricity_kwh: Option<f64>,
    pub gas_kwh: Option<f64>,
    pub solar_generation_kwh: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewEnergyUsageRecord {
    pub user_id: i64,
    /// Defaults to the current UTC date when `None`.
    pub record_date: Option<NaiveDate>,
    pub electricity_kwh: Option<f64>,
    pub gas_kwh: Option<f64>,
    pub solar_generation_kwh: Option<f64>,
}

fn validate_usage(
    electricity_kwh: Option<f64>,
    gas_kwh: Option<f64>,
    solar_generation_kwh: Option<f64>,
) -> Result<(), RolsaError> {
    validate::non_negative("electricity_kwh", electricity_kwh)?;
    validate::non_negative("gas_kwh", gas_kwh)?;
    validate::non_negative("solar_generation_kwh", solar_generation_kwh)
}

impl Validate for NewEnergyUsageRecord {
    fn validate(&self) -> Result<(), RolsaError> {
        validate_usage(self.electricity_kwh, self.gas_kwh, self.solar_generation_kwh)
    }
}

impl Validate for EnergyUsageRecord {
    fn validate(&self) -> Result<(), RolsaError> {
        validate_usage(self.electricity_kwh, self.gas_kwh, self.solar_generation_kwh)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct AccessibilitySettings {
    pub id: i64,
    pub user_id: i64,
    pub language: String,
    pub high_contrast: bool,
    pub reduced_motion: bool,
    /// 1.0 is normal size; larger values render larger text.
    pub font_scale: f64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAccessibilitySettings {
    pub user_id: i64,
    pub language: String,
    pub high_contrast: bool,
    pub reduced_motion: bool,
    pub font_scale: f64,
}

impl NewAccessibilitySettings {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            language: Language::default().into(),
            high_contrast: false,
            reduced_motion: false,
            font_scale: 1.0,
        }
    }
}

fn validate_accessibility(language: &str, font_scale: f64) -> Result<(), RolsaError> {
    validate::required("language", language, 10)?;
    validate::finite("font_scale", font_scale)?;
    if font_scale <= 0.0 {
        return Err(RolsaError::validation("font_scale must be positive"));
    }
    Ok(())
}

impl Validate for NewAccessibilitySettings {
    fn validate(&self) -> Result<(), RolsaError> {
        validate_accessibility(&self.language, self.font_scale)
    }
}

impl Validate for AccessibilitySettings {
    fn validate(&self) -> Result<(), RolsaError> {
        validate_accessibility(&self.language, self.font_scale)
    }
}

/// Rows removed by `Storage::delete_user`, per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub admins: u64,
    pub accessibility_settings: u64,
    pub bookings: u64,
    pub carbon_calculations: u64,
    pub energy_usage_records: u64,
}

impl CascadeReport {
    pub fn total(&self) -> u64 {
        self.admins
            + self.accessibility_settings
            + self.bookings
            + self.carbon_calculations
            + self.energy_usage_records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn june_first() -> (NaiveDate, NaiveTime) {
        (
            NaiveDate::from_ymd_opt(2024, 6, 1).expect("date"),
            NaiveTime::from_hms_opt(9, 0, 0).expect("time"),
        )
    }

    #[test]
    fn new_rows_start_with_column_defaults() {
        let user = NewUser::new("Ada", "a@x.com");
        assert_eq!(user.role, "customer");

        let admin = NewAdmin::new(1);
        assert_eq!(admin.admin_level, "staff");
        assert_eq!(admin.permissions, None);

        let (date, time) = june_first();
        let booking = NewBooking::new(1, BookingType::Installation, ServiceType::Solar, date, time);
        assert_eq!(booking.status, "pending");
        assert_eq!(booking.booking_type, "installation");
        assert_eq!(booking.service_type, "solar");

        let settings = NewAccessibilitySettings::new(1);
        assert_eq!(settings.language, "en");
        assert!(!settings.high_contrast);
        assert!(!settings.reduced_motion);
        assert_eq!(settings.font_scale, 1.0);
    }

    #[test]
    fn user_without_password_is_invalid() {
        let user = NewUser::new("Ada", "a@x.com");
        assert!(matches!(user.validate(), Err(RolsaError::Validation(_))));
    }

    #[test]
    fn user_with_raw_password_in_digest_field_is_invalid() {
        let mut user = NewUser::new("Ada", "a@x.com");
        user.password_hash = "secret123".into();
        assert!(matches!(user.validate(), Err(RolsaError::Validation(_))));
    }

    #[test]
    fn user_with_digest_is_valid() {
        let mut user = NewUser::new("Ada", "a@x.com").with_role(Role::Admin);
        user.password_hash =
            "$argon2id$v=19$m=1024,t=1,p=1$c2FsdHNhbHRzYWx0$aGFzaGhhc2hoYXNoaGFzaA".into();
        assert!(user.validate().is_ok());
        assert_eq!(user.role, "admin");
    }

    #[test]
    fn booking_address_limits_apply() {
        let (date, time) = june_first();
        let mut booking =
            NewBooking::new(1, BookingType::Consultation, ServiceType::Ev, date, time);
        booking.postcode = Some("X".repeat(13));
        assert!(booking.validate().is_err());
        booking.postcode = Some("LS1 4AP".into());
        booking.city = Some("Leeds".into());
        assert!(booking.validate().is_ok());
    }

    #[test]
    fn carbon_calculation_rejects_negative_inputs() {
        let calc = NewCarbonCalculation {
            user_id: 1,
            petrol_car_miles: Some(-3.0),
            co2_kg: 1.0,
            ..Default::default()
        };
        assert!(calc.validate().is_err());
    }

    #[test]
    fn font_scale_must_be_positive() {
        let mut settings = NewAccessibilitySettings::new(1);
        settings.font_scale = 0.0;
        assert!(settings.validate().is_err());
        settings.font_scale = 1.2;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn cascade_total_sums_every_table() {
        let report = CascadeReport {
            admins: 1,
            accessibility_settings: 1,
            bookings: 3,
            carbon_calculations: 2,
            energy_usage_records: 4,
        };
        assert_eq!(report.total(), 11);
    }
}
