pub mod audit;
pub mod auth_service;
pub mod session_service;
pub mod portfolio_service;
pub mod trade_service;
pub mod deposit_service;
pub mod approval_service;
pub mod balance_service;
pub mod admin_service;

pub use audit::AdminActor;
pub use auth_service::AuthService;
pub use session_service::SessionService;
pub use portfolio_service::PortfolioService;
pub use trade_service::TradeService;
pub use deposit_service::DepositService;
pub use approval_service::ApprovalService;
pub use balance_service::BalanceService;
pub use admin_service::AdminService;
