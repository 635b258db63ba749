use axum::{ extract::State, http::StatusCode, Json };
use chrono::{ DateTime, Utc };
use serde::Serialize;
use uuid::Uuid;

use crate::db::{ deposit_request, user };
use crate::error::Result;
use crate::services::deposit_service::CreateDepositRequest;

use super::extract::{ JsonBody, UserPrincipal };
use super::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub crypto_type: String,
    pub amount: String,
    pub usd_value: String,
    pub deposit_address: String,
    pub tx_hash: Option<String>,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub notes: Option<String>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<deposit_request::Model> for DepositResponse {
    fn from(deposit: deposit_request::Model) -> Self {
        Self {
            id: deposit.id,
            user_id: deposit.user_id,
            crypto_type: deposit.crypto_type,
            amount: deposit.amount,
            usd_value: deposit.usd_value,
            deposit_address: deposit.deposit_address,
            tx_hash: deposit.tx_hash,
            status: deposit.status,
            rejection_reason: deposit.rejection_reason,
            notes: deposit.notes,
            approved_by: deposit.approved_by,
            approved_at: deposit.approved_at,
            created_at: deposit.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDepositResponse {
    #[serde(flatten)]
    pub deposit: DepositResponse,
    pub username: Option<String>,
    pub email: Option<String>,
}

impl From<(deposit_request::Model, Option<user::Model>)> for AdminDepositResponse {
    fn from((deposit, owner): (deposit_request::Model, Option<user::Model>)) -> Self {
        let (username, email) = match owner {
            Some(owner) => (Some(owner.username), Some(owner.email)),
            None => (None, None),
        };

        Self {
            deposit: deposit.into(),
            username,
            email,
        }
    }
}

pub async fn list_deposits(
    State(state): State<AppState>,
    principal: UserPrincipal
) -> Result<Json<Vec<DepositResponse>>> {
    let deposits = state.deposit_service.list_for_user(principal.user.id).await?;

    Ok(Json(deposits.into_iter().map(Into::into).collect()))
}

pub async fn create_deposit(
    State(state): State<AppState>,
    principal: UserPrincipal,
    JsonBody(request): JsonBody<CreateDepositRequest>
) -> Result<(StatusCode, Json<DepositResponse>)> {
    let deposit = state.deposit_service.create_request(principal.user.id, request).await?;

    Ok((StatusCode::CREATED, Json(deposit.into())))
}
