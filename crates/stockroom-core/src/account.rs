//! Account wire types: registration and login.
//!
//! Hashing and token signing are I/O-free but need crypto crates, so they
//! live in the API. This module only shapes and validates what crosses
//! the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::types::{Role, User, UserSummary};
use crate::validation::{validate_email, validate_password, validate_username};

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Defaults to `employee`.
    #[serde(default)]
    pub role: Option<Role>,
}

impl RegisterRequest {
    pub fn validate(&self) -> CoreResult<()> {
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        Ok(())
    }

    pub fn requested_role(&self) -> Role {
        self.role.unwrap_or_default()
    }

    /// Builds the stored user around an already-computed password hash.
    pub fn into_user(self, id: String, password_hash: String, now: DateTime<Utc>) -> CoreResult<User> {
        self.validate()?;
        let role = self.requested_role();
        Ok(User {
            id,
            username: self.username.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password_hash,
            role,
            created_at: now,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CoreError, ValidationError};

    fn request(role: Option<Role>) -> RegisterRequest {
        RegisterRequest {
            username: "  rosa ".into(),
            email: "Rosa@Example.PE".into(),
            password: "secreto123".into(),
            role,
        }
    }

    #[test]
    fn test_role_defaults_to_employee() {
        assert_eq!(request(None).requested_role(), Role::Employee);
        assert_eq!(request(Some(Role::Admin)).requested_role(), Role::Admin);

        let body: RegisterRequest =
            serde_json::from_str(r#"{"username":"rosa","email":"r@x.pe","password":"secreto"}"#)
                .unwrap();
        assert_eq!(body.role, None);
    }

    #[test]
    fn test_into_user_normalizes() {
        let user = request(None)
            .into_user("u-1".into(), "$argon2id$...".into(), Utc::now())
            .unwrap();
        assert_eq!(user.username, "rosa");
        assert_eq!(user.email, "rosa@example.pe");
        assert_eq!(user.role, Role::Employee);
    }

    #[test]
    fn test_short_password_rejected() {
        let mut req = request(None);
        req.password = "abc".into();
        let err = req.validate().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::TooShort { ref field, .. }) if field == "password"
        ));
    }
}
