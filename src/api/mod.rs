use std::sync::Arc;

use axum::{ routing::{ get, patch, post, put }, Router };
use sea_orm::DatabaseConnection;
use tower_http::{ cors::CorsLayer, trace::TraceLayer };

pub mod extract;
pub mod auth;
pub mod portfolio;
pub mod trade;
pub mod deposit;
pub mod admin;

use crate::db::{
    CryptoAddressRepository,
    DepositRepository,
    LedgerRepository,
    TradeRepository,
    UserRepository,
};
use crate::services::{
    AdminService,
    ApprovalService,
    AuthService,
    BalanceService,
    DepositService,
    PortfolioService,
    SessionService,
    TradeService,
};

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub session_service: Arc<SessionService>,
    pub portfolio_service: Arc<PortfolioService>,
    pub trade_service: Arc<TradeService>,
    pub deposit_service: Arc<DepositService>,
    pub approval_service: Arc<ApprovalService>,
    pub balance_service: Arc<BalanceService>,
    pub admin_service: Arc<AdminService>,
}

impl AppState {
    /// Wire every service onto one connection pool.
    pub fn new(db: DatabaseConnection, session_service: SessionService) -> Self {
        let users = Arc::new(UserRepository::new(db.clone()));
        let ledger = Arc::new(LedgerRepository::new(db.clone()));
        let trades = Arc::new(TradeRepository::new(db.clone()));
        let deposits = Arc::new(DepositRepository::new(db.clone()));
        let addresses = Arc::new(CryptoAddressRepository::new(db.clone()));

        Self {
            auth_service: Arc::new(AuthService::new(users, ledger.clone())),
            session_service: Arc::new(session_service),
            portfolio_service: Arc::new(PortfolioService::new(ledger)),
            trade_service: Arc::new(TradeService::new(trades)),
            deposit_service: Arc::new(DepositService::new(deposits, addresses)),
            approval_service: Arc::new(ApprovalService::new(db.clone())),
            balance_service: Arc::new(BalanceService::new(db.clone())),
            admin_service: Arc::new(AdminService::new(db)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/user", get(auth::current_user))
        .route("/portfolio", get(portfolio::get_portfolio))
        .route("/wallets", get(portfolio::get_wallets))
        .route("/holdings", get(portfolio::get_holdings))
        .route("/crypto-addresses", get(portfolio::get_crypto_addresses))
        .route("/trades", get(trade::list_trades).post(trade::place_trade))
        .route("/deposit-requests", get(deposit::list_deposits).post(deposit::create_deposit));

    let admin_routes = Router::new()
        .route("/login", post(auth::admin_login))
        .route("/logout", post(auth::admin_logout))
        .route("/me", get(auth::current_admin))
        .route("/users", get(admin::list_users))
        .route("/users/{id}/status", patch(admin::set_user_status))
        .route("/users/{id}/balance", patch(admin::adjust_balance))
        .route("/users/{id}/portfolio", get(admin::user_portfolio))
        .route("/trades", get(admin::list_trades))
        .route("/trades/{id}/approve", patch(admin::approve_trade))
        .route("/trades/{id}/reject", patch(admin::reject_trade))
        .route("/trades/{id}/close", patch(admin::close_trade))
        .route("/trades/{id}/profit-loss", patch(admin::set_trade_profit_loss))
        .route("/user/{id}/trades/approve", post(admin::bulk_approve_trades))
        .route("/deposit-requests", get(admin::list_deposits))
        .route("/deposit-requests/{id}/approve", patch(admin::approve_deposit))
        .route("/deposit-requests/{id}/reject", patch(admin::reject_deposit))
        .route(
            "/crypto-addresses",
            get(admin::list_crypto_addresses).post(admin::create_crypto_address)
        )
        .route(
            "/crypto-addresses/{id}",
            patch(admin::update_crypto_address).delete(admin::delete_crypto_address)
        )
        .route("/settings", get(admin::list_settings))
        .route("/settings/{key}", put(admin::update_setting))
        .route("/logs", get(admin::list_logs))
        .route("/stats", get(admin::stats));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/admin", admin_routes)
        .nest("/api", user_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health_check() -> &'static str {
    "OK"
}
