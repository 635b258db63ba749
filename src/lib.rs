pub mod config;
pub mod enums;
pub mod error;
pub mod money;
pub mod crypto;
pub mod db;
pub mod services;
pub mod api;

pub use config::Config;
pub use enums::{ AdjustmentType, AdminRole, ApprovalStatus, AssetType, OrderType, TradeSide, TradeStatus };
pub use error::{ AppError, Result };
