//! Registration and login.
//!
//! ## Who may register whom
//! ```text
//! no users yet ─────────────► anyone, any role (bootstrap the first admin)
//! role = employee ──────────► anyone
//! role = admin | manager ───► caller holding manage_users
//! ```

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use stockroom_core::account::{LoginRequest, LoginResponse, RegisterRequest};
use stockroom_core::{new_id, Capability, CoreError, Role, UserSummary};
use stockroom_db::{Database, DbError};

use crate::auth::{hash_password, verify_password, JwtManager};
use crate::error::{ApiError, ApiResult};
use crate::middleware::CurrentUser;

/// Returned for every failed login, whatever the cause.
pub const BAD_CREDENTIALS: &str = "Invalid username or password";

#[derive(Clone)]
pub struct AccountService {
    db: Database,
    jwt: Arc<JwtManager>,
}

impl AccountService {
    pub fn new(db: Database, jwt: Arc<JwtManager>) -> Self {
        AccountService { db, jwt }
    }

    pub async fn register(
        &self,
        body: RegisterRequest,
        caller: Option<&CurrentUser>,
    ) -> ApiResult<UserSummary> {
        body.validate()?;
        let role = body.requested_role();

        if role != Role::Employee && self.db.users().count().await? > 0 {
            match caller {
                Some(caller) => caller.require(Capability::ManageUsers)?,
                None => {
                    return Err(ApiError::Unauthorized(format!(
                        "Registering a {} requires an authenticated administrator",
                        role
                    )))
                }
            }
        }

        let password_hash = hash_password(&body.password)?;
        let user = body.into_user(new_id(), password_hash, Utc::now())?;

        self.db.users().insert(&user).await.map_err(|e| match e {
            DbError::UniqueViolation { .. } => {
                ApiError::from(CoreError::DuplicateUsername(user.username.clone()))
            }
            other => other.into(),
        })?;

        info!(id = %user.id, username = %user.username, role = %user.role, "User registered");
        Ok(UserSummary::from(&user))
    }

    pub async fn login(&self, body: LoginRequest) -> ApiResult<LoginResponse> {
        let user = self.db.users().get_by_username(&body.username).await?;

        let user = match user {
            Some(user) if verify_password(&body.password, &user.password_hash) => user,
            _ => {
                warn!(username = %body.username.trim(), "Failed login attempt");
                return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
            }
        };

        let token = self.jwt.issue(&user)?;
        info!(id = %user.id, role = %user.role, "User logged in");

        Ok(LoginResponse {
            token,
            user: UserSummary::from(&user),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_db::DbConfig;

    async fn service() -> AccountService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AccountService::new(db, Arc::new(JwtManager::new("test-secret", 3600)))
    }

    fn register(username: &str, role: Option<Role>) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: format!("{}@example.pe", username),
            password: "secreto123".into(),
            role,
        }
    }

    #[tokio::test]
    async fn test_first_user_may_be_admin() {
        let service = service().await;
        let admin = service
            .register(register("admin", Some(Role::Admin)), None)
            .await
            .unwrap();
        assert_eq!(admin.role, Role::Admin);

        // after bootstrap, elevated roles need an admin
        let err = service
            .register(register("gerente", Some(Role::Manager)), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let employee = CurrentUser {
            id: "u-9".into(),
            role: Role::Employee,
        };
        let err = service
            .register(register("gerente", Some(Role::Manager)), Some(&employee))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(Capability::ManageUsers)));

        let caller = CurrentUser {
            id: admin.id,
            role: Role::Admin,
        };
        let manager = service
            .register(register("gerente", Some(Role::Manager)), Some(&caller))
            .await
            .unwrap();
        assert_eq!(manager.role, Role::Manager);

        // employees are always open
        service.register(register("cajero", None), None).await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let service = service().await;
        service.register(register("rosa", None), None).await.unwrap();
        let err = service
            .register(register("ROSA", None), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_login() {
        let service = service().await;
        service.register(register("rosa", None), None).await.unwrap();

        let ok = service
            .login(LoginRequest {
                username: "rosa".into(),
                password: "secreto123".into(),
            })
            .await
            .unwrap();
        assert_eq!(ok.user.username, "rosa");
        assert!(!ok.token.is_empty());

        let wrong_password = service
            .login(LoginRequest {
                username: "rosa".into(),
                password: "nope-nope".into(),
            })
            .await
            .unwrap_err();
        let unknown_user = service
            .login(LoginRequest {
                username: "nadie".into(),
                password: "secreto123".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(wrong_password.to_string(), BAD_CREDENTIALS);
        assert_eq!(unknown_user.to_string(), BAD_CREDENTIALS);
    }
}
