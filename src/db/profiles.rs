//! One-per-user profile rows: admin profiles and accessibility settings.

use chrono::Utc;
use tracing::{debug, info};

use crate::db::models::{AccessibilitySettings, Admin, NewAccessibilitySettings, NewAdmin};
use crate::db::sqlite::Storage;
use crate::db::validate::Validate;
use crate::error::RolsaError;

const ADMIN_COLUMNS: &str = "id, user_id, admin_level, permissions, created_at";
const SETTINGS_COLUMNS: &str =
    "id, user_id, language, high_contrast, reduced_motion, font_scale, updated_at";

impl Storage {
    /// Attach an admin profile. A user that already has one is a validation error.
    pub async fn create_admin(&self, new: NewAdmin) -> Result<Admin, RolsaError> {
        new.validate()?;
        let user_id = new.user_id;
        let admin: Admin = sqlx::query_as(&format!(
            "INSERT INTO admins (user_id, admin_level, permissions, created_at)
             VALUES (?, ?, ?, ?)
             RETURNING {ADMIN_COLUMNS}"
        ))
        .bind(user_id)
        .bind(new.admin_level)
        .bind(new.permissions)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await
        .map_err(|e| RolsaError::from_write(e, "admins", Some(user_id)))?;
        info!(user_id = admin.user_id, admin_level = %admin.admin_level, "admin profile created");
        Ok(admin)
    }

    pub async fn get_admin_for_user(&self, user_id: i64) -> Result<Option<Admin>, RolsaError> {
        let admin = sqlx::query_as(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admins WHERE user_id = ?"
        ))
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(admin)
    }

    /// Persist `admin_level` and `permissions`. The owning user cannot change.
    pub async fn update_admin(&self, admin: &Admin) -> Result<(), RolsaError> {
        admin.validate()?;
        let res = sqlx::query("UPDATE admins SET admin_level = ?, permissions = ? WHERE id = ?")
            .bind(&admin.admin_level)
            .bind(&admin.permissions)
            .bind(admin.id)
            .execute(self.pool())
            .await
            .map_err(|e| RolsaError::from_write(e, "admins", Some(admin.user_id)))?;
        if res.rows_affected() == 0 {
            return Err(RolsaError::NotFound {
                table: "admins",
                id: admin.id,
            });
        }
        Ok(())
    }

    pub async fn delete_admin(&self, id: i64) -> Result<(), RolsaError> {
        self.delete_by_id("admins", id).await
    }

    /// Attach accessibility settings. A user that already has a row is a validation error.
    pub async fn create_accessibility_settings(
        &self,
        new: NewAccessibilitySettings,
    ) -> Result<AccessibilitySettings, RolsaError> {
        new.validate()?;
        let user_id = new.user_id;
        let settings: AccessibilitySettings = sqlx::query_as(&format!(
            "INSERT INTO accessibility_settings
                (user_id, language, high_contrast, reduced_motion, font_scale, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {SETTINGS_COLUMNS}"
        ))
        .bind(user_id)
        .bind(new.language)
        .bind(new.high_contrast)
        .bind(new.reduced_motion)
        .bind(new.font_scale)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await
        .map_err(|e| RolsaError::from_write(e, "accessibility_settings", Some(user_id)))?;
        debug!(user_id = settings.user_id, "accessibility settings created");
        Ok(settings)
    }

    pub async fn get_accessibility_settings(
        &self,
        user_id: i64,
    ) -> Result<Option<AccessibilitySettings>, RolsaError> {
        let settings = sqlx::query_as(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM accessibility_settings WHERE user_id = ?"
        ))
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(settings)
    }

    /// Persist the preference fields and stamp a fresh `updated_at`.
    ///
    /// Returns the row as stored.
    pub async fn update_accessibility_settings(
        &self,
        settings: &AccessibilitySettings,
    ) -> Result<AccessibilitySettings, RolsaError> {
        settings.validate()?;
        let stored: Option<AccessibilitySettings> = sqlx::query_as(&format!(
            "UPDATE accessibility_settings
             SET language = ?, high_contrast = ?, reduced_motion = ?, font_scale = ?, updated_at = ?
             WHERE id = ?
             RETURNING {SETTINGS_COLUMNS}"
        ))
        .bind(&settings.language)
        .bind(settings.high_contrast)
        .bind(settings.reduced_motion)
        .bind(settings.font_scale)
        .bind(Utc::now())
        .bind(settings.id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            RolsaError::from_write(e, "accessibility_settings", Some(settings.user_id))
        })?;
        stored.ok_or(RolsaError::NotFound {
            table: "accessibility_settings",
            id: settings.id,
        })
    }

    pub async fn delete_accessibility_settings(&self, id: i64) -> Result<(), RolsaError> {
        self.delete_by_id("accessibility_settings", id).await
    }
}
