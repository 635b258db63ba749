use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{ DatabaseConnection, TransactionTrait };
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::db::{
    admin_log,
    crypto_address,
    portfolio,
    stock_holding,
    trade,
    user,
    user_wallet,
    website_setting,
    AdminLogRepository,
    CryptoAddressChanges,
    CryptoAddressRepository,
    DepositRepository,
    LedgerRepository,
    NewCryptoAddress,
    SettingRepository,
    TradeRepository,
    UserRepository,
};
use crate::error::{ AppError, Result };
use crate::money;
use crate::services::audit::AdminActor;

const DEFAULT_LOG_LIMIT: u64 = 100;
const MAX_LOG_LIMIT: u64 = 500;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusRequest {
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCryptoAddressRequest {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub network: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCryptoAddressRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub network: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
    pub value: Option<String>,
    pub category: Option<String>,
}

/// Everything the back office shows about one user.
#[derive(Debug)]
pub struct UserPortfolioView {
    pub user: user::Model,
    pub portfolio: portfolio::Model,
    pub wallets: Vec<user_wallet::Model>,
    pub holdings: Vec<stock_holding::Model>,
    pub trades: Vec<trade::Model>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminStats {
    pub total_users: u64,
    pub active_users: u64,
    pub pending_trades: u64,
    pub pending_deposits: u64,
    pub total_balance: Decimal,
}

/// Back-office operations. Every mutation is recorded in the audit log.
pub struct AdminService {
    db: DatabaseConnection,
    users: Arc<UserRepository>,
    ledger: Arc<LedgerRepository>,
    trades: Arc<TradeRepository>,
    deposits: Arc<DepositRepository>,
    addresses: Arc<CryptoAddressRepository>,
    settings: Arc<SettingRepository>,
    logs: Arc<AdminLogRepository>,
}

impl AdminService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserRepository::new(db.clone())),
            ledger: Arc::new(LedgerRepository::new(db.clone())),
            trades: Arc::new(TradeRepository::new(db.clone())),
            deposits: Arc::new(DepositRepository::new(db.clone())),
            addresses: Arc::new(CryptoAddressRepository::new(db.clone())),
            settings: Arc::new(SettingRepository::new(db.clone())),
            logs: Arc::new(AdminLogRepository::new(db.clone())),
            db,
        }
    }

    // ─── Users ──────────────────────────────────────────────────────

    /// All users with their portfolio, when one exists.
    pub async fn list_users(&self) -> Result<Vec<(user::Model, Option<portfolio::Model>)>> {
        let users = self.users.list_all().await?;
        let mut portfolios: HashMap<Uuid, portfolio::Model> = self.ledger
            .list_portfolios().await?
            .into_iter()
            .map(|p| (p.user_id, p))
            .collect();

        Ok(
            users
                .into_iter()
                .map(|u| {
                    let portfolio = portfolios.remove(&u.id);
                    (u, portfolio)
                })
                .collect()
        )
    }

    pub async fn set_user_status(
        &self,
        user_id: Uuid,
        request: UserStatusRequest,
        actor: &AdminActor
    ) -> Result<user::Model> {
        let is_active = request.is_active.ok_or(AppError::MissingField("isActive"))?;
        let txn = self.db.begin().await?;

        let user = UserRepository::set_active(&txn, user_id, is_active).await?;

        AdminLogRepository::append(
            &txn,
            actor.entry(
                "update_user_status",
                "user",
                Some(user.id.to_string()),
                json!({ "username": user.username, "isActive": is_active })
            )
        ).await?;

        txn.commit().await?;

        tracing::info!("Admin {} set user {} active={}", actor.admin_id, user.id, is_active);
        Ok(user)
    }

    pub async fn user_portfolio(&self, user_id: Uuid) -> Result<UserPortfolioView> {
        let user = self.users.find_by_id(user_id).await?;
        let portfolio = self.ledger.get_or_create_portfolio(user_id).await?;
        let wallets = self.ledger.wallets_for_user(user_id).await?;
        let holdings = self.ledger.holdings_for_user(user_id).await?;
        let trades = self.trades.list_by_user(user_id).await?;

        Ok(UserPortfolioView {
            user,
            portfolio,
            wallets,
            holdings,
            trades,
        })
    }

    // ─── Crypto addresses ───────────────────────────────────────────

    pub async fn list_addresses(&self) -> Result<Vec<crypto_address::Model>> {
        self.addresses.list_all().await
    }

    pub async fn active_addresses(&self) -> Result<Vec<crypto_address::Model>> {
        self.addresses.list_active().await
    }

    pub async fn create_address(
        &self,
        request: CreateCryptoAddressRequest,
        actor: &AdminActor
    ) -> Result<crypto_address::Model> {
        let symbol = required(request.symbol, "symbol")?.to_uppercase();
        let name = required(request.name, "name")?;
        let address = required(request.address, "address")?;
        let network = required(request.network, "network")?;

        if self.addresses.find_by_symbol_and_network(&symbol, &network).await?.is_some() {
            return Err(AppError::InvalidInput(format!(
                "An address for {} on {} already exists",
                symbol,
                network
            )));
        }

        let txn = self.db.begin().await?;

        let created = CryptoAddressRepository::create(&txn, NewCryptoAddress {
            symbol,
            name,
            address,
            network,
            is_active: request.is_active.unwrap_or(true),
        }).await?;

        AdminLogRepository::append(
            &txn,
            actor.entry(
                "create_crypto_address",
                "crypto_address",
                Some(created.id.to_string()),
                json!({ "symbol": created.symbol, "address": created.address })
            )
        ).await?;

        txn.commit().await?;

        Ok(created)
    }

    pub async fn update_address(
        &self,
        id: Uuid,
        request: UpdateCryptoAddressRequest,
        actor: &AdminActor
    ) -> Result<crypto_address::Model> {
        let changes = CryptoAddressChanges {
            name: non_blank(request.name),
            address: non_blank(request.address),
            network: non_blank(request.network),
            is_active: request.is_active,
        };
        let txn = self.db.begin().await?;

        let updated = CryptoAddressRepository::update(&txn, id, changes).await?;

        AdminLogRepository::append(
            &txn,
            actor.entry(
                "update_crypto_address",
                "crypto_address",
                Some(updated.id.to_string()),
                json!({
                    "symbol": updated.symbol,
                    "address": updated.address,
                    "isActive": updated.is_active,
                })
            )
        ).await?;

        txn.commit().await?;

        Ok(updated)
    }

    pub async fn delete_address(&self, id: Uuid, actor: &AdminActor) -> Result<()> {
        let txn = self.db.begin().await?;

        let existing = CryptoAddressRepository::delete(&txn, id).await?;

        AdminLogRepository::append(
            &txn,
            actor.entry(
                "delete_crypto_address",
                "crypto_address",
                Some(id.to_string()),
                json!({ "symbol": existing.symbol, "address": existing.address })
            )
        ).await?;

        txn.commit().await?;

        Ok(())
    }

    // ─── Settings ───────────────────────────────────────────────────

    pub async fn list_settings(&self) -> Result<Vec<website_setting::Model>> {
        self.settings.list().await
    }

    pub async fn update_setting(
        &self,
        key: &str,
        request: UpdateSettingRequest,
        actor: &AdminActor
    ) -> Result<website_setting::Model> {
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::MissingField("key"));
        }
        let value = request.value.ok_or(AppError::MissingField("value"))?;

        let txn = self.db.begin().await?;

        let setting = SettingRepository::upsert(
            &txn,
            key,
            value,
            non_blank(request.category),
            actor.admin_id
        ).await?;

        AdminLogRepository::append(
            &txn,
            actor.entry(
                "update_setting",
                "website_setting",
                Some(setting.id.to_string()),
                json!({ "key": setting.key, "value": setting.value })
            )
        ).await?;

        txn.commit().await?;

        Ok(setting)
    }

    // ─── Audit & stats ──────────────────────────────────────────────

    pub async fn recent_logs(&self, limit: Option<u64>) -> Result<Vec<admin_log::Model>> {
        let limit = limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT);
        self.logs.recent(limit).await
    }

    pub async fn stats(&self) -> Result<AdminStats> {
        let mut total_balance = Decimal::ZERO;
        for portfolio in self.ledger.list_portfolios().await? {
            total_balance = money::add(total_balance, money::parse_stored(&portfolio.total_balance)?)?;
        }

        Ok(AdminStats {
            total_users: self.users.count().await?,
            active_users: self.users.count_active().await?,
            pending_trades: self.trades.count_pending().await?,
            pending_deposits: self.deposits.count_pending().await?,
            total_balance,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String> {
    non_blank(value).ok_or(AppError::MissingField(field))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_db;
    use crate::db::NewTrade;
    use crate::enums::{ AssetType, OrderType, TradeSide };
    use rust_decimal::dec;
    use sea_orm::ConnectionTrait;

    async fn setup() -> (AdminService, DatabaseConnection, AdminActor) {
        let db = memory_db().await;
        (AdminService::new(db.clone()), db, AdminActor::new(Uuid::new_v4()))
    }

    fn btc_address() -> CreateCryptoAddressRequest {
        CreateCryptoAddressRequest {
            symbol: Some("btc".into()),
            name: Some("Bitcoin".into()),
            address: Some("bc1qplatform".into()),
            network: Some("Bitcoin".into()),
            is_active: None,
        }
    }

    #[tokio::test]
    async fn test_crypto_address_lifecycle_is_audited() {
        let (admin, _db, actor) = setup().await;

        let created = admin.create_address(btc_address(), &actor).await.unwrap();
        assert_eq!(created.symbol, "BTC");
        assert!(created.is_active);

        let duplicate = admin.create_address(btc_address(), &actor).await;
        assert!(matches!(duplicate, Err(AppError::InvalidInput(_))));

        let updated = admin
            .update_address(created.id, UpdateCryptoAddressRequest {
                is_active: Some(false),
                ..Default::default()
            }, &actor).await
            .unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.address, "bc1qplatform");
        assert!(admin.active_addresses().await.unwrap().is_empty());
        assert_eq!(admin.list_addresses().await.unwrap().len(), 1);

        admin.delete_address(created.id, &actor).await.unwrap();
        let again = admin.delete_address(created.id, &actor).await;
        assert!(matches!(again, Err(AppError::NotFound(_))));

        let actions: Vec<String> = admin
            .recent_logs(None).await
            .unwrap()
            .into_iter()
            .map(|log| log.action)
            .collect();
        assert_eq!(actions.len(), 3);
        assert!(actions.contains(&"create_crypto_address".to_string()));
        assert!(actions.contains(&"update_crypto_address".to_string()));
        assert!(actions.contains(&"delete_crypto_address".to_string()));
    }

    #[tokio::test]
    async fn test_setting_upsert_keeps_category() {
        let (admin, _db, actor) = setup().await;

        let first = admin
            .update_setting("site_name", UpdateSettingRequest {
                value: Some("Sim Markets".into()),
                category: Some("branding".into()),
            }, &actor).await
            .unwrap();
        let second = admin
            .update_setting("site_name", UpdateSettingRequest {
                value: Some("Sim Markets Pro".into()),
                category: None,
            }, &actor).await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.value, "Sim Markets Pro");
        assert_eq!(second.category, "branding");
        assert_eq!(admin.list_settings().await.unwrap().len(), 1);

        let missing = admin.update_setting("site_name", UpdateSettingRequest {
            value: None,
            category: None,
        }, &actor).await;
        assert!(matches!(missing, Err(AppError::MissingField("value"))));
    }

    #[tokio::test]
    async fn test_user_status_and_stats() {
        let (admin, db, actor) = setup().await;
        let users = UserRepository::new(db.clone());
        let ledger = LedgerRepository::new(db.clone());

        let rita = users.create("rita".into(), "rita@example.com".into(), "hash".into()).await.unwrap();
        let sam = users.create("sam".into(), "sam@example.com".into(), "hash".into()).await.unwrap();
        ledger.get_or_create_portfolio(rita.id).await.unwrap();

        TradeRepository::new(db.clone())
            .create(NewTrade {
                user_id: sam.id,
                symbol: "AAPL".into(),
                asset_type: AssetType::Stock,
                side: TradeSide::Buy,
                order_type: OrderType::Market,
                quantity: dec!(1),
                price: dec!(100),
            }).await
            .unwrap();

        let disabled = admin
            .set_user_status(sam.id, UserStatusRequest { is_active: Some(false) }, &actor).await
            .unwrap();
        assert!(!disabled.is_active);

        let listed = admin.list_users().await.unwrap();
        assert_eq!(listed.len(), 2);
        let rita_row = listed.iter().find(|(u, _)| u.id == rita.id).unwrap();
        assert!(rita_row.1.is_some());
        let sam_row = listed.iter().find(|(u, _)| u.id == sam.id).unwrap();
        assert!(sam_row.1.is_none());

        let stats = admin.stats().await.unwrap();
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.active_users, 1);
        assert_eq!(stats.pending_trades, 1);
        assert_eq!(stats.pending_deposits, 0);
        assert_eq!(stats.total_balance, Decimal::ZERO);

        let view = admin.user_portfolio(sam.id).await.unwrap();
        assert_eq!(view.trades.len(), 1);
        assert_eq!(view.portfolio.user_id, sam.id);
    }

    #[tokio::test]
    async fn test_status_change_rolls_back_without_audit_entry() {
        let (admin, db, actor) = setup().await;
        let tess = UserRepository::new(db.clone())
            .create("tess".into(), "tess@example.com".into(), "hash".into()).await
            .unwrap();

        let unknown = admin
            .set_user_status(Uuid::new_v4(), UserStatusRequest { is_active: Some(false) }, &actor).await;
        assert!(matches!(unknown, Err(AppError::NotFound(_))));
        assert!(admin.recent_logs(None).await.unwrap().is_empty());

        db.execute_unprepared("DROP TABLE admin_logs").await.unwrap();
        let failed = admin
            .set_user_status(tess.id, UserStatusRequest { is_active: Some(false) }, &actor).await;
        assert!(matches!(failed, Err(AppError::Database(_))));

        let reloaded = UserRepository::new(db).find_by_id(tess.id).await.unwrap();
        assert!(reloaded.is_active);
    }

    #[tokio::test]
    async fn test_log_limit_is_clamped() {
        let (admin, _db, actor) = setup().await;
        for key in ["a", "b", "c"] {
            admin
                .update_setting(key, UpdateSettingRequest {
                    value: Some("1".into()),
                    category: None,
                }, &actor).await
                .unwrap();
        }

        assert_eq!(admin.recent_logs(Some(0)).await.unwrap().len(), 1);
        assert_eq!(admin.recent_logs(Some(2)).await.unwrap().len(), 2);
        assert_eq!(admin.recent_logs(None).await.unwrap().len(), 3);
    }
}
