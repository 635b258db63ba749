//! Request-scoped authentication contexts.
//!
//! The session cookie is resolved once per request and cached in the request
//! extensions; `UserPrincipal` and `AdminPrincipal` are derived from it
//! independently so a request may carry either, both or neither.
//! JSON bodies go through [`JsonBody`] so malformed input gets the common error body.

use std::convert::Infallible;

use axum::{
    extract::{ FromRequest, FromRequestParts, OptionalFromRequest, Request },
    http::{ header, request::Parts, HeaderMap },
    Json,
};
use serde::de::DeserializeOwned;

use crate::db::{ admin_user, session, user };
use crate::error::AppError;
use crate::services::session_service::SESSION_COOKIE;
use crate::services::AdminActor;

use super::AppState;

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub session: Option<session::Model>,
}

impl FromRequestParts<AppState> for SessionContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState
    ) -> Result<Self, Self::Rejection> {
        if let Some(context) = parts.extensions.get::<SessionContext>() {
            return Ok(context.clone());
        }

        let session = match session_cookie(&parts.headers) {
            Some(value) => state.session_service.resolve(&value).await?,
            None => None,
        };

        let context = SessionContext { session };
        parts.extensions.insert(context.clone());
        Ok(context)
    }
}

/// An authenticated, active end user.
#[derive(Debug, Clone)]
pub struct UserPrincipal {
    pub user: user::Model,
    pub session: session::Model,
}

impl FromRequestParts<AppState> for UserPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState
    ) -> Result<Self, Self::Rejection> {
        let context = SessionContext::from_request_parts(parts, state).await?;

        let (session, user_id) = match context.session {
            Some(session) =>
                match session.user_id {
                    Some(user_id) => (session, user_id),
                    None => {
                        return Err(unauthenticated());
                    }
                }
            None => {
                return Err(unauthenticated());
            }
        };

        let user = state.auth_service.active_user(user_id).await?;
        Ok(UserPrincipal { user, session })
    }
}

/// An authenticated administrator. The account's active flag is checked on every request.
#[derive(Debug, Clone)]
pub struct AdminPrincipal {
    pub admin: admin_user::Model,
    pub session: session::Model,
}

impl AdminPrincipal {
    pub fn actor(&self, meta: &RequestMeta) -> AdminActor {
        AdminActor {
            admin_id: self.admin.id,
            ip_address: meta.ip_address.clone(),
            user_agent: meta.user_agent.clone(),
        }
    }
}

impl FromRequestParts<AppState> for AdminPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState
    ) -> Result<Self, Self::Rejection> {
        let context = SessionContext::from_request_parts(parts, state).await?;

        let (session, admin_id) = match context.session {
            Some(session) =>
                match session.admin_id {
                    Some(admin_id) => (session, admin_id),
                    None => {
                        return Err(admin_required());
                    }
                }
            None => {
                return Err(admin_required());
            }
        };

        let admin = state.auth_service.active_admin(admin_id).await?;
        Ok(AdminPrincipal { admin, session })
    }
}

/// `Json` extractor whose rejections are reported as `400 INVALID_INPUT`.
#[derive(Debug, Clone, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T> where T: DeserializeOwned, S: Send + Sync {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

/// A request without a JSON content type yields `None`; a bad JSON body is still an error.
impl<T, S> OptionalFromRequest<S> for JsonBody<T> where T: DeserializeOwned, S: Send + Sync {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        let body = <Json<T> as OptionalFromRequest<S>>::from_request(req, state).await?;
        Ok(body.map(|Json(value)| JsonBody(value)))
    }
}

/// Caller metadata recorded in audit entries and login stamps.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for RequestMeta {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestMeta::from_headers(&parts.headers))
    }
}

impl RequestMeta {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let forwarded = header_str(headers, "x-forwarded-for")
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty());
        let ip_address = forwarded
            .or_else(|| header_str(headers, "x-real-ip").map(str::trim))
            .map(str::to_string);

        RequestMeta {
            ip_address,
            user_agent: header_str(headers, header::USER_AGENT.as_str()).map(str::to_string),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

fn unauthenticated() -> AppError {
    AppError::Unauthorized("Authentication required".to_string())
}

fn admin_required() -> AppError {
    AppError::Unauthorized("Admin authentication required".to_string())
}
