//! Pre-write checks for rows.
//!
//! Uniqueness is left to the unique indexes; everything that can be decided
//! from the row alone is checked here so callers get a `Validation` error
//! before a statement is sent.

use argon2::password_hash::PasswordHash;
use chrono::NaiveDate;

use crate::error::RolsaError;

pub trait Validate {
    fn validate(&self) -> Result<(), RolsaError>;
}

pub(crate) fn required(field: &str, value: &str, max_chars: usize) -> Result<(), RolsaError> {
    if value.trim().is_empty() {
        return Err(RolsaError::validation(format!("{field} is required")));
    }
    max_len(field, value, max_chars)
}

pub(crate) fn optional(
    field: &str,
    value: Option<&str>,
    max_chars: usize,
) -> Result<(), RolsaError> {
    value.map_or(Ok(()), |v| max_len(field, v, max_chars))
}

fn max_len(field: &str, value: &str, max_chars: usize) -> Result<(), RolsaError> {
    let n = value.chars().count();
    if n > max_chars {
        return Err(RolsaError::validation(format!(
            "{field} is {n} characters, limit is {max_chars}"
        )));
    }
    Ok(())
}

pub(crate) fn email(value: &str) -> Result<(), RolsaError> {
    required("email", value, 120)?;
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(RolsaError::validation(format!(
            "email {value:?} is not an address"
        ))),
    }
}

/// The stored credential must be a PHC digest string, never a raw password.
pub(crate) fn password_digest(value: &str) -> Result<(), RolsaError> {
    required("password_hash", value, 255)?;
    if PasswordHash::new(value).is_err() {
        return Err(RolsaError::validation(
            "password_hash is not a password digest; use set_password",
        ));
    }
    Ok(())
}

pub(crate) fn finite(field: &str, value: f64) -> Result<(), RolsaError> {
    if !value.is_finite() {
        return Err(RolsaError::validation(format!("{field} must be a finite number")));
    }
    Ok(())
}

pub(crate) fn non_negative(field: &str, value: Option<f64>) -> Result<(), RolsaError> {
    let Some(v) = value else {
        return Ok(());
    };
    finite(field, v)?;
    if v < 0.0 {
        return Err(RolsaError::validation(format!("{field} must not be negative")));
    }
    Ok(())
}

pub(crate) fn period(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), RolsaError> {
    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        return Err(RolsaError::validation(format!(
            "period_start {start} is after period_end {end}"
        )));
    }
    Ok(())
}
