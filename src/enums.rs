use std::fmt;
use std::str::FromStr;

use serde::{ Deserialize, Serialize };

use crate::error::AppError;

// ─── AssetType ──────────────────────────────────────────────────────

/// Instrument class an order is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Stock,
    Crypto,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Stock => "stock",
            AssetType::Crypto => "crypto",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stock" | "stocks" | "equity" => Ok(AssetType::Stock),
            "crypto" | "cryptocurrency" => Ok(AssetType::Crypto),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid asset type: {}. Supported: stock, crypto",
                s
            ))),
        }
    }
}

// ─── TradeSide ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeSide {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buy" => Ok(TradeSide::Buy),
            "sell" => Ok(TradeSide::Sell),
            _ => Err(AppError::InvalidInput(format!("Invalid trade side: {}. Supported: buy, sell", s))),
        }
    }
}

// ─── OrderType ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Market,
    Limit,
    Stop,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "market",
            OrderType::Limit => "limit",
            OrderType::Stop => "stop",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "market" => Ok(OrderType::Market),
            "limit" => Ok(OrderType::Limit),
            "stop" => Ok(OrderType::Stop),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid order type: {}. Supported: market, limit, stop",
                s
            ))),
        }
    }
}

// ─── TradeStatus ────────────────────────────────────────────────────

/// Lifecycle of a trade. Tracked apart from the one-shot admin approval
/// because an approved trade can later be closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Open,
    Approved,
    Rejected,
    Closed,
    Executed,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Open => "open",
            TradeStatus::Approved => "approved",
            TradeStatus::Rejected => "rejected",
            TradeStatus::Closed => "closed",
            TradeStatus::Executed => "executed",
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(TradeStatus::Open),
            "approved" => Ok(TradeStatus::Approved),
            "rejected" => Ok(TradeStatus::Rejected),
            "closed" => Ok(TradeStatus::Closed),
            "executed" => Ok(TradeStatus::Executed),
            _ => Err(AppError::InvalidInput(format!("Invalid trade status: {}", s))),
        }
    }
}

// ─── ApprovalStatus ─────────────────────────────────────────────────

/// Admin decision on a trade or deposit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    /// Only `pending` may move, and only to a terminal decision.
    pub fn transition(self, target: ApprovalStatus) -> Result<ApprovalStatus, AppError> {
        match (self, target) {
            (ApprovalStatus::Pending, ApprovalStatus::Approved | ApprovalStatus::Rejected) =>
                Ok(target),
            (ApprovalStatus::Pending, ApprovalStatus::Pending) =>
                Err(AppError::InvalidInput("Target state must be approved or rejected".to_string())),
            (current, _) =>
                Err(AppError::InvalidState(format!("Record is already {}", current))),
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            _ => Err(AppError::InvalidInput(format!("Invalid approval status: {}", s))),
        }
    }
}

// ─── AdjustmentType ─────────────────────────────────────────────────

/// Kind of manual balance adjustment an admin can apply to a portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentType {
    Add,
    Remove,
    Profit,
}

impl AdjustmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentType::Add => "add",
            AdjustmentType::Remove => "remove",
            AdjustmentType::Profit => "profit",
        }
    }
}

impl fmt::Display for AdjustmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdjustmentType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" => Ok(AdjustmentType::Add),
            "remove" => Ok(AdjustmentType::Remove),
            "profit" => Ok(AdjustmentType::Profit),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid adjustment type: {}. Supported: add, remove, profit",
                s
            ))),
        }
    }
}

// ─── AdminRole ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    Admin,
    SuperAdmin,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Admin => "admin",
            AdminRole::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(AdminRole::Admin),
            "super_admin" | "superadmin" => Ok(AdminRole::SuperAdmin),
            _ => Err(AppError::InvalidInput(format!("Invalid admin role: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_moves_once() {
        let approved = ApprovalStatus::Pending.transition(ApprovalStatus::Approved).unwrap();
        assert_eq!(approved, ApprovalStatus::Approved);

        assert!(matches!(
            approved.transition(ApprovalStatus::Approved),
            Err(AppError::InvalidState(_))
        ));
        assert!(matches!(
            ApprovalStatus::Rejected.transition(ApprovalStatus::Approved),
            Err(AppError::InvalidState(_))
        ));
    }

    #[test]
    fn test_pending_to_pending_is_not_a_transition() {
        assert!(matches!(
            ApprovalStatus::Pending.transition(ApprovalStatus::Pending),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("BUY".parse::<TradeSide>().unwrap(), TradeSide::Buy);
        assert_eq!("Limit".parse::<OrderType>().unwrap(), OrderType::Limit);
        assert_eq!("stocks".parse::<AssetType>().unwrap(), AssetType::Stock);
        assert_eq!("superadmin".parse::<AdminRole>().unwrap(), AdminRole::SuperAdmin);
        assert!("short".parse::<TradeSide>().is_err());
    }

    #[test]
    fn test_round_trip_through_storage_strings() {
        for status in [
            TradeStatus::Open,
            TradeStatus::Approved,
            TradeStatus::Rejected,
            TradeStatus::Closed,
            TradeStatus::Executed,
        ] {
            assert_eq!(status.as_str().parse::<TradeStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_adjustment_type_deserializes_lowercase() {
        let kind: AdjustmentType = serde_json::from_str("\"profit\"").unwrap();
        assert_eq!(kind, AdjustmentType::Profit);
    }
}
