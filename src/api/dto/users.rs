/*
 * Responsibility
 * - Users の request/response DTO
 * - UserRow → UserResponse の明示的なマッピング
 */
use serde::{Deserialize, Serialize};

use crate::repos::user_repo::UserRow;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub profile_picture_url: Option<String>,
    pub enabled: bool,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            role: row.role,
            full_name: row.full_name,
            phone_number: row.phone_number,
            city: row.city,
            profile_picture_url: row.profile_picture_url,
            enabled: row.enabled,
        }
    }
}

/// Self-service profile update. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub profile_picture_url: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.full_name
            && name.len() > 100
        {
            return Err("full_name must be <= 100 chars");
        }
        if let Some(phone) = &self.phone_number
            && phone.len() > 20
        {
            return Err("phone_number must be <= 20 chars");
        }
        if let Some(city) = &self.city
            && city.len() > 100
        {
            return Err("city must be <= 100 chars");
        }
        Ok(())
    }
}

/// Admin update by explicit id. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub enabled: Option<bool>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub profile_picture_url: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.username {
            if name.trim().is_empty() {
                return Err("username cannot be empty");
            }
            if name.len() > 50 {
                return Err("username must be <= 50 chars");
            }
        }
        if let Some(email) = &self.email {
            if email.trim().is_empty() || !email.contains('@') {
                return Err("email must be a valid address");
            }
            if email.len() > 100 {
                return Err("email must be <= 100 chars");
            }
        }
        if let Some(name) = &self.full_name
            && name.len() > 100
        {
            return Err("full_name must be <= 100 chars");
        }
        if let Some(phone) = &self.phone_number
            && phone.len() > 20
        {
            return Err("phone_number must be <= 20 chars");
        }
        if let Some(city) = &self.city
            && city.len() > 100
        {
            return Err("city must be <= 100 chars");
        }
        Ok(())
    }
}
