//! Per-user history rows: bookings, carbon calculations and energy usage.

use chrono::Utc;
use tracing::{debug, info};

use crate::db::models::{
    Booking, CarbonCalculation, EnergyUsageRecord, NewBooking, NewCarbonCalculation,
    NewEnergyUsageRecord,
};
use crate::db::sqlite::Storage;
use crate::db::validate::Validate;
use crate::error::RolsaError;

const BOOKING_COLUMNS: &str = "id, user_id, booking_type, service_type, preferred_date, \
     preferred_time, address_line1, address_line2, city, postcode, status, notes, created_at";
const CARBON_COLUMNS: &str = "id, user_id, electricity_kwh, gas_kwh, petrol_car_miles, \
     ev_miles, period_start, period_end, co2_kg, created_at";
const USAGE_COLUMNS: &str =
    "id, user_id, record_date, electricity_kwh, gas_kwh, solar_generation_kwh, created_at";

impl Storage {
    pub async fn create_booking(&self, new: NewBooking) -> Result<Booking, RolsaError> {
        new.validate()?;
        let user_id = new.user_id;
        let booking: Booking = sqlx::query_as(&format!(
            "INSERT INTO bookings (
                user_id, booking_type, service_type, preferred_date, preferred_time,
                address_line1, address_line2, city, postcode, status, notes, created_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(user_id)
        .bind(new.booking_type)
        .bind(new.service_type)
        .bind(new.preferred_date)
        .bind(new.preferred_time)
        .bind(new.address_line1)
        .bind(new.address_line2)
        .bind(new.city)
        .bind(new.postcode)
        .bind(new.status)
        .bind(new.notes)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await
        .map_err(|e| RolsaError::from_write(e, "bookings", Some(user_id)))?;
        info!(
            booking_id = booking.id,
            user_id,
            booking_type = %booking.booking_type,
            service_type = %booking.service_type,
            "booking created"
        );
        Ok(booking)
    }

    pub async fn get_booking(&self, id: i64) -> Result<Option<Booking>, RolsaError> {
        let booking = sqlx::query_as(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(booking)
    }

    /// Bookings of one user, soonest preferred slot first.
    pub async fn list_bookings_for_user(&self, user_id: i64) -> Result<Vec<Booking>, RolsaError> {
        let rows = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = ?
             ORDER BY preferred_date, preferred_time, id"
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Persist every mutable booking field. Ownership and `created_at` stay fixed.
    pub async fn update_booking(&self, booking: &Booking) -> Result<(), RolsaError> {
        booking.validate()?;
        let res = sqlx::query(
            r#"UPDATE bookings SET
                booking_type = ?,
                service_type = ?,
                preferred_date = ?,
                preferred_time = ?,
                address_line1 = ?,
                address_line2 = ?,
                city = ?,
                postcode = ?,
                status = ?,
                notes = ?
              WHERE id = ?"#,
        )
        .bind(&booking.booking_type)
        .bind(&booking.service_type)
        .bind(booking.preferred_date)
        .bind(booking.preferred_time)
        .bind(&booking.address_line1)
        .bind(&booking.address_line2)
        .bind(&booking.city)
        .bind(&booking.postcode)
        .bind(&booking.status)
        .bind(&booking.notes)
        .bind(booking.id)
        .execute(self.pool())
        .await
        .map_err(|e| RolsaError::from_write(e, "bookings", Some(booking.user_id)))?;
        if res.rows_affected() == 0 {
            return Err(RolsaError::NotFound {
                table: "bookings",
                id: booking.id,
            });
        }
        debug!(booking_id = booking.id, status = %booking.status, "booking updated");
        Ok(())
    }

    pub async fn delete_booking(&self, id: i64) -> Result<(), RolsaError> {
        self.delete_by_id("bookings", id).await
    }

    /// Store a footprint result together with the inputs it was computed from.
    pub async fn create_carbon_calculation(
        &self,
        new: NewCarbonCalculation,
    ) -> Result<CarbonCalculation, RolsaError> {
        new.validate()?;
        let user_id = new.user_id;
        let calc: CarbonCalculation = sqlx::query_as(&format!(
            "INSERT INTO carbon_calulations (
                user_id, electricity_kwh, gas_kwh, petrol_car_miles, ev_miles,
                period_start, period_end, co2_kg, created_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {CARBON_COLUMNS}"
        ))
        .bind(user_id)
        .bind(new.electricity_kwh)
        .bind(new.gas_kwh)
        .bind(new.petrol_car_miles)
        .bind(new.ev_miles)
        .bind(new.period_start)
        .bind(new.period_end)
        .bind(new.co2_kg)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await
        .map_err(|e| RolsaError::from_write(e, "carbon_calulations", Some(user_id)))?;
        debug!(calculation_id = calc.id, user_id, co2_kg = calc.co2_kg, "carbon calculation stored");
        Ok(calc)
    }

    pub async fn get_carbon_calculation(
        &self,
        id: i64,
    ) -> Result<Option<CarbonCalculation>, RolsaError> {
        let calc = sqlx::query_as(&format!(
            "SELECT {CARBON_COLUMNS} FROM carbon_calulations WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(calc)
    }

    /// Calculation history of one user, oldest first.
    pub async fn list_carbon_calculations_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<CarbonCalculation>, RolsaError> {
        let rows = sqlx::query_as(&format!(
            "SELECT {CARBON_COLUMNS} FROM carbon_calulations WHERE user_id = ?
             ORDER BY created_at, id"
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    pub async fn delete_carbon_calculation(&self, id: i64) -> Result<(), RolsaError> {
        self.delete_by_id("carbon_calulations", id).await
    }

    /// `record_date` falls back to today (UTC) when the caller leaves it unset.
    pub async fn create_energy_usage_record(
        &self,
        new: NewEnergyUsageRecord,
    ) -> Result<EnergyUsageRecord, RolsaError> {
        new.validate()?;
        let user_id = new.user_id;
        let now = Utc::now();
        let record: EnergyUsageRecord = sqlx::query_as(&format!(
            "INSERT INTO energy_usage_records (
                user_id, record_date, electricity_kwh, gas_kwh, solar_generation_kwh, created_at
             ) VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {USAGE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(new.record_date.unwrap_or_else(|| now.date_naive()))
        .bind(new.electricity_kwh)
        .bind(new.gas_kwh)
        .bind(new.solar_generation_kwh)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(|e| RolsaError::from_write(e, "energy_usage_records", Some(user_id)))?;
        debug!(record_id = record.id, user_id, record_date = %record.record_date, "energy usage recorded");
        Ok(record)
    }

    pub async fn get_energy_usage_record(
        &self,
        id: i64,
    ) -> Result<Option<EnergyUsageRecord>, RolsaError> {
        let record = sqlx::query_as(&format!(
            "SELECT {USAGE_COLUMNS} FROM energy_usage_records WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(record)
    }

    /// Usage history of one user ordered by `record_date`, for charting.
    pub async fn list_energy_usage_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<EnergyUsageRecord>, RolsaError> {
        let rows = sqlx::query_as(&format!(
            "SELECT {USAGE_COLUMNS} FROM energy_usage_records WHERE user_id = ?
             ORDER BY record_date, id"
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    pub async fn update_energy_usage_record(
        &self,
        record: &EnergyUsageRecord,
    ) -> Result<(), RolsaError> {
        record.validate()?;
        let res = sqlx::query(
            "UPDATE energy_usage_records
             SET record_date = ?, electricity_kwh = ?, gas_kwh = ?, solar_generation_kwh = ?
             WHERE id = ?",
        )
        .bind(record.record_date)
        .bind(record.electricity_kwh)
        .bind(record.gas_kwh)
        .bind(record.solar_generation_kwh)
        .bind(record.id)
        .execute(self.pool())
        .await
        .map_err(|e| RolsaError::from_write(e, "energy_usage_records", Some(record.user_id)))?;
        if res.rows_affected() == 0 {
            return Err(RolsaError::NotFound {
                table: "energy_usage_records",
                id: record.id,
            });
        }
        Ok(())
    }

    pub async fn delete_energy_usage_record(&self, id: i64) -> Result<(), RolsaError> {
        self.delete_by_id("energy_usage_records", id).await
    }
}
