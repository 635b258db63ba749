use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{
    deposit_request,
    user,
    CryptoAddressRepository,
    DepositRepository,
    NewDepositRequest,
};
use crate::enums::ApprovalStatus;
use crate::error::{ AppError, Result };
use crate::money;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepositRequest {
    pub crypto_type: Option<String>,
    pub amount: Option<Decimal>,
    pub usd_value: Option<Decimal>,
    pub tx_hash: Option<String>,
}

/// User-submitted deposit claims against platform receiving addresses.
pub struct DepositService {
    deposits: Arc<DepositRepository>,
    addresses: Arc<CryptoAddressRepository>,
}

impl DepositService {
    pub fn new(deposits: Arc<DepositRepository>, addresses: Arc<CryptoAddressRepository>) -> Self {
        Self { deposits, addresses }
    }

    pub async fn create_request(
        &self,
        user_id: Uuid,
        request: CreateDepositRequest
    ) -> Result<deposit_request::Model> {
        let crypto_type = request.crypto_type
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .ok_or(AppError::MissingField("cryptoType"))?;
        let amount = money::require_positive(
            request.amount.ok_or(AppError::MissingField("amount"))?,
            "amount"
        )?;
        let usd_value = money::require_non_negative(
            request.usd_value.unwrap_or(Decimal::ZERO),
            "usdValue"
        )?;

        let address = self.addresses
            .find_active_for_symbol(&crypto_type).await?
            .ok_or_else(|| {
                AppError::InvalidInput(format!("Deposits in {} are not accepted", crypto_type))
            })?;

        let deposit = self.deposits.create(NewDepositRequest {
            user_id,
            crypto_type,
            amount,
            usd_value,
            deposit_address: address.address,
            crypto_address_id: Some(address.id),
            tx_hash: request.tx_hash.map(|h| h.trim().to_string()).filter(|h| !h.is_empty()),
        }).await?;

        tracing::info!(
            "User {} submitted deposit {} of {} {}",
            user_id,
            deposit.id,
            deposit.amount,
            deposit.crypto_type
        );
        Ok(deposit)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<deposit_request::Model>> {
        self.deposits.list_by_user(user_id).await
    }

    pub async fn list_all(
        &self,
        status: Option<ApprovalStatus>
    ) -> Result<Vec<(deposit_request::Model, Option<user::Model>)>> {
        self.deposits.list_all_with_users(status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_db;
    use crate::db::{ NewCryptoAddress, UserRepository };
    use rust_decimal::dec;
    use sea_orm::DatabaseConnection;

    async fn setup() -> (DepositService, Uuid, DatabaseConnection) {
        let db = memory_db().await;
        let user = UserRepository::new(db.clone())
            .create("quinn".into(), "quinn@example.com".into(), "hash".into()).await
            .unwrap();
        let service = DepositService::new(
            Arc::new(DepositRepository::new(db.clone())),
            Arc::new(CryptoAddressRepository::new(db.clone()))
        );

        (service, user.id, db)
    }

    fn request(crypto_type: &str, amount: Decimal) -> CreateDepositRequest {
        CreateDepositRequest {
            crypto_type: Some(crypto_type.to_string()),
            amount: Some(amount),
            usd_value: None,
            tx_hash: Some("  ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_deposit_requires_active_address() {
        let (service, user_id, db) = setup().await;

        let refused = service.create_request(user_id, request("eth", dec!(1))).await;
        assert!(matches!(refused, Err(AppError::InvalidInput(_))));

        let address = CryptoAddressRepository::create(&db, NewCryptoAddress {
            symbol: "ETH".into(),
            name: "Ethereum".into(),
            address: "0xabc".into(),
            network: "ERC20".into(),
            is_active: true,
        }).await
            .unwrap();

        let deposit = service.create_request(user_id, request("eth", dec!(1.5))).await.unwrap();
        assert_eq!(deposit.crypto_type, "ETH");
        assert_eq!(deposit.status, "pending");
        assert_eq!(deposit.deposit_address, "0xabc");
        assert_eq!(deposit.crypto_address_id, Some(address.id));
        assert_eq!(deposit.usd_value, "0");
        assert_eq!(deposit.tx_hash, None);

        assert_eq!(service.list_for_user(user_id).await.unwrap().len(), 1);
        assert_eq!(service.list_all(Some(ApprovalStatus::Pending)).await.unwrap().len(), 1);
        assert!(service.list_all(Some(ApprovalStatus::Approved)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deposit_amount_must_be_positive() {
        let (service, user_id, _) = setup().await;

        let zero = service.create_request(user_id, request("BTC", dec!(0))).await;
        assert!(matches!(zero, Err(AppError::InvalidInput(_))));

        let missing = service.create_request(user_id, CreateDepositRequest {
            crypto_type: None,
            amount: Some(dec!(1)),
            usd_value: None,
            tx_hash: None,
        }).await;
        assert!(matches!(missing, Err(AppError::MissingField("cryptoType"))));
    }
}
