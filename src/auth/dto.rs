use serde::{Deserialize, Serialize};

use super::{repo_types::PublicUser, services::is_valid_email};
use crate::error::AppError;

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 6;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// Trims and lowercases in place, then checks field rules.
    pub fn normalize(&mut self) -> Result<(), AppError> {
        self.username = self.username.trim().to_string();
        self.email = normalize_email(&self.email);

        if self.username.chars().count() < MIN_USERNAME_LEN {
            return Err(AppError::validation(
                "Username must be at least 3 characters long",
            ));
        }
        if !is_valid_email(&self.email) {
            return Err(AppError::validation("Invalid email address"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(
                "Password must be at least 6 characters long",
            ));
        }
        Ok(())
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn normalize(&mut self) -> Result<(), AppError> {
        self.email = normalize_email(&self.email);
        if !is_valid_email(&self.email) {
            return Err(AppError::validation("Invalid email address"));
        }
        Ok(())
    }
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Serialize)]
pub struct UserData {
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub status: &'static str,
    pub data: UserData,
}

impl UserResponse {
    pub fn success(user: PublicUser) -> Self {
        Self { status: "success", data: UserData { user } }
    }
}

/// Response returned after login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub token: String,
    pub data: UserData,
}
