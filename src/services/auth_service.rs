use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::crypto::{ hash_password, verify_password };
use crate::db::{ admin_user, user, LedgerRepository, UserRepository };
use crate::enums::AdminRole;
use crate::error::{ AppError, Result };

const MIN_PASSWORD_LEN: usize = 6;
const MAX_USERNAME_LEN: usize = 64;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A successful user login. `admin` is set when the same email belongs to an active administrator.
#[derive(Debug)]
pub struct LoginOutcome {
    pub user: user::Model,
    pub admin: Option<admin_user::Model>,
}

pub struct AuthService {
    users: Arc<UserRepository>,
    ledger: Arc<LedgerRepository>,
}

impl AuthService {
    pub fn new(users: Arc<UserRepository>, ledger: Arc<LedgerRepository>) -> Self {
        Self { users, ledger }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<user::Model> {
        let username = required(request.username, "username")?;
        let email = required(request.email, "email")?.to_lowercase();
        let password = request.password.filter(|p| !p.is_empty()).ok_or(AppError::MissingField("password"))?;

        if username.len() > MAX_USERNAME_LEN {
            return Err(AppError::InvalidInput(format!(
                "Username must be at most {} characters",
                MAX_USERNAME_LEN
            )));
        }
        if !email.contains('@') {
            return Err(AppError::InvalidInput("Email address is invalid".to_string()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AppError::InvalidInput("Username already exists".to_string()));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::InvalidInput("Email already registered".to_string()));
        }

        let password_hash = hash_password(&password)?;
        let user = self.users.create(username, email, password_hash).await?;
        self.ledger.get_or_create_portfolio(user.id).await?;

        tracing::info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    pub async fn login(&self, request: LoginRequest, ip: Option<String>) -> Result<LoginOutcome> {
        let username = required(request.username, "username")?;
        let password = request.password.ok_or(AppError::MissingField("password"))?;

        let Some(user) = self.users.find_by_username(&username).await? else {
            tracing::warn!("Login attempt for unknown user {}", username);
            return Err(invalid_credentials());
        };

        if !verify_password(&password, &user.password_hash)? {
            tracing::warn!("Failed login for user {}", user.id);
            return Err(invalid_credentials());
        }
        if !user.is_active {
            return Err(AppError::Forbidden("Account is deactivated".to_string()));
        }

        let user = self.users.record_login(user.id, ip).await?;

        let admin = self.users
            .find_admin_by_email(&user.email).await?
            .filter(|admin| admin.is_active);
        if let Some(admin) = &admin {
            tracing::info!("User {} also holds admin account {}", user.id, admin.id);
        }

        Ok(LoginOutcome { user, admin })
    }

    pub async fn admin_login(&self, request: AdminLoginRequest) -> Result<admin_user::Model> {
        let email = required(request.email, "email")?.to_lowercase();
        let password = request.password.ok_or(AppError::MissingField("password"))?;

        let Some(admin) = self.users.find_admin_by_email(&email).await? else {
            tracing::warn!("Admin login attempt for unknown email");
            return Err(invalid_credentials());
        };

        if !verify_password(&password, &admin.password_hash)? {
            tracing::warn!("Failed admin login for {}", admin.id);
            return Err(invalid_credentials());
        }
        if !admin.is_active {
            return Err(AppError::Unauthorized("Admin account is inactive".to_string()));
        }

        self.users.record_admin_login(admin).await
    }

    /// The user behind a session; deactivated accounts lose access immediately.
    pub async fn active_user(&self, user_id: Uuid) -> Result<user::Model> {
        let user = self.users
            .find_by_id(user_id).await
            .map_err(|_| AppError::Unauthorized("Not authenticated".to_string()))?;

        if !user.is_active {
            return Err(AppError::Forbidden("Account is deactivated".to_string()));
        }
        Ok(user)
    }

    pub async fn active_admin(&self, admin_id: Uuid) -> Result<admin_user::Model> {
        match self.users.find_admin_by_id(admin_id).await? {
            Some(admin) if admin.is_active => Ok(admin),
            Some(_) => Err(AppError::Unauthorized("Admin account is inactive".to_string())),
            None => Err(AppError::Unauthorized("Admin authentication required".to_string())),
        }
    }

    /// Create the configured administrator unless one with that email already exists.
    pub async fn ensure_admin(
        &self,
        email: &str,
        password: &str,
        role: AdminRole
    ) -> Result<admin_user::Model> {
        let email = email.trim().to_lowercase();
        if let Some(admin) = self.users.find_admin_by_email(&email).await? {
            return Ok(admin);
        }

        let password_hash = hash_password(password)?;
        let admin = self.users.create_admin(email, password_hash, role.to_string()).await?;

        tracing::info!("Created admin account {}", admin.id);
        Ok(admin)
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(AppError::MissingField(field))
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid username or password".to_string())
}
