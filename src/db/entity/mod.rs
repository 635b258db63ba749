pub mod user;
pub mod admin_user;
pub mod portfolio;
pub mod user_wallet;
pub mod stock_holding;
pub mod trade;
pub mod deposit_request;
pub mod crypto_address;
pub mod website_setting;
pub mod admin_log;
pub mod session;

pub use user::Entity as User;
pub use admin_user::Entity as AdminUser;
pub use portfolio::Entity as Portfolio;
pub use user_wallet::Entity as UserWallet;
pub use stock_holding::Entity as StockHolding;
pub use trade::Entity as Trade;
pub use deposit_request::Entity as DepositRequest;
pub use crypto_address::Entity as CryptoAddress;
pub use website_setting::Entity as WebsiteSetting;
pub use admin_log::Entity as AdminLog;
pub use session::Entity as Session;
