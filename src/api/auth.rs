use axum::{ extract::State, http::{ header, StatusCode }, response::IntoResponse, Json };
use chrono::{ DateTime, Utc };
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::db::{ admin_user, user };
use crate::error::Result;
use crate::services::auth_service::{ AdminLoginRequest, LoginRequest, RegisterRequest };

use super::extract::{ AdminPrincipal, JsonBody, RequestMeta, SessionContext, UserPrincipal };
use super::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponse {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<admin_user::Model> for AdminResponse {
    fn from(admin: admin_user::Model) -> Self {
        Self {
            id: admin.id,
            email: admin.email,
            role: admin.role,
            is_active: admin.is_active,
            last_login_at: admin.last_login_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub is_admin: bool,
}

pub async fn register(
    State(state): State<AppState>,
    context: SessionContext,
    JsonBody(request): JsonBody<RegisterRequest>
) -> Result<impl IntoResponse> {
    let user = state.auth_service.register(request).await?;

    if let Some(previous) = context.session {
        state.session_service.destroy(&previous.id).await?;
    }
    let session = state.session_service.start(Some(user.id), None).await?;
    let cookie = state.session_service.set_cookie(&session);

    Ok((StatusCode::CREATED, [(header::SET_COOKIE, cookie)], Json(UserResponse::from(user))))
}

pub async fn login(
    State(state): State<AppState>,
    context: SessionContext,
    meta: RequestMeta,
    JsonBody(request): JsonBody<LoginRequest>
) -> Result<impl IntoResponse> {
    let outcome = state.auth_service.login(request, meta.ip_address).await?;

    // A fresh id on every login; the old session is discarded
    if let Some(previous) = context.session {
        state.session_service.destroy(&previous.id).await?;
    }
    let admin_id = outcome.admin.as_ref().map(|admin| admin.id);
    let session = state.session_service.start(Some(outcome.user.id), admin_id).await?;
    let cookie = state.session_service.set_cookie(&session);

    tracing::info!("User {} logged in", outcome.user.id);

    let body = LoginResponse {
        user: UserResponse::from(outcome.user),
        is_admin: admin_id.is_some(),
    };
    Ok(([(header::SET_COOKIE, cookie)], Json(body)))
}

/// Ends the session entirely: both the user and the admin slot are cleared.
pub async fn logout(
    State(state): State<AppState>,
    context: SessionContext
) -> Result<impl IntoResponse> {
    if let Some(session) = context.session {
        state.session_service.destroy(&session.id).await?;
    }
    let cookie = state.session_service.clear_cookie();

    Ok(([(header::SET_COOKIE, cookie)], Json(json!({ "message": "Logged out" }))))
}

pub async fn current_user(principal: UserPrincipal) -> Json<UserResponse> {
    Json(UserResponse::from(principal.user))
}

pub async fn admin_login(
    State(state): State<AppState>,
    context: SessionContext,
    JsonBody(request): JsonBody<AdminLoginRequest>
) -> Result<impl IntoResponse> {
    let admin = state.auth_service.admin_login(request).await?;
    let session = state.session_service.attach_admin(context.session, admin.id).await?;
    let cookie = state.session_service.set_cookie(&session);

    tracing::info!("Admin {} logged in", admin.id);

    Ok(([(header::SET_COOKIE, cookie)], Json(AdminResponse::from(admin))))
}

/// Drops only the admin slot; a user login in the same session survives.
pub async fn admin_logout(
    State(state): State<AppState>,
    context: SessionContext
) -> Result<Json<serde_json::Value>> {
    if let Some(session) = context.session {
        state.session_service.clear_admin(session).await?;
    }

    Ok(Json(json!({ "message": "Logged out" })))
}

pub async fn current_admin(principal: AdminPrincipal) -> Json<AdminResponse> {
    Json(AdminResponse::from(principal.admin))
}
