use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    DatabaseConnection,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::db::entity::{ crypto_address, CryptoAddress };
use crate::error::{ AppError, Result };

#[derive(Debug, Clone)]
pub struct NewCryptoAddress {
    pub symbol: String,
    pub name: String,
    pub address: String,
    pub network: String,
    pub is_active: bool,
}

/// Partial update; `None` leaves the column as it is.
#[derive(Debug, Clone, Default)]
pub struct CryptoAddressChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub network: Option<String>,
    pub is_active: Option<bool>,
}

/// Platform-controlled receiving addresses that users deposit to.
///
/// Writes take any connection so they can share a transaction with the audit entry.
pub struct CryptoAddressRepository {
    db: DatabaseConnection,
}

impl CryptoAddressRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        new_address: NewCryptoAddress
    ) -> Result<crypto_address::Model> {
        let now = chrono::Utc::now();
        let address = crypto_address::ActiveModel {
            id: Set(Uuid::new_v4()),
            symbol: Set(new_address.symbol),
            name: Set(new_address.name),
            address: Set(new_address.address),
            network: Set(new_address.network),
            is_active: Set(new_address.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(address.insert(conn).await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<crypto_address::Model> {
        Self::find_in(&self.db, id).await
    }

    async fn find_in<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<crypto_address::Model> {
        CryptoAddress::find_by_id(id)
            .one(conn).await?
            .ok_or_else(|| AppError::NotFound("Crypto address not found".to_string()))
    }

    pub async fn find_by_symbol_and_network(
        &self,
        symbol: &str,
        network: &str
    ) -> Result<Option<crypto_address::Model>> {
        let address = CryptoAddress::find()
            .filter(crypto_address::Column::Symbol.eq(symbol))
            .filter(crypto_address::Column::Network.eq(network))
            .one(&self.db).await?;

        Ok(address)
    }

    /// First active address for `symbol`, oldest first so the choice is stable.
    pub async fn find_active_for_symbol(&self, symbol: &str) -> Result<Option<crypto_address::Model>> {
        let address = CryptoAddress::find()
            .filter(crypto_address::Column::Symbol.eq(symbol))
            .filter(crypto_address::Column::IsActive.eq(true))
            .order_by_asc(crypto_address::Column::CreatedAt)
            .one(&self.db).await?;

        Ok(address)
    }

    pub async fn update<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
        changes: CryptoAddressChanges
    ) -> Result<crypto_address::Model> {
        let address = Self::find_in(conn, id).await?;

        let mut active: crypto_address::ActiveModel = address.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(address) = changes.address {
            active.address = Set(address);
        }
        if let Some(network) = changes.network {
            active.network = Set(network);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now());

        Ok(active.update(conn).await?)
    }

    /// Remove the address and return the row as it was.
    pub async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<crypto_address::Model> {
        let existing = Self::find_in(conn, id).await?;

        let result = CryptoAddress::delete_by_id(id).exec(conn).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Crypto address not found".to_string()));
        }
        Ok(existing)
    }

    pub async fn list_all(&self) -> Result<Vec<crypto_address::Model>> {
        let addresses = CryptoAddress::find()
            .order_by_asc(crypto_address::Column::Symbol)
            .order_by_asc(crypto_address::Column::Network)
            .all(&self.db).await?;

        Ok(addresses)
    }

    pub async fn list_active(&self) -> Result<Vec<crypto_address::Model>> {
        let addresses = CryptoAddress::find()
            .filter(crypto_address::Column::IsActive.eq(true))
            .order_by_asc(crypto_address::Column::Symbol)
            .order_by_asc(crypto_address::Column::Network)
            .all(&self.db).await?;

        Ok(addresses)
    }
}
