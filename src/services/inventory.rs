//! Inventory item storage: listing, creation, partial update and deletion.
//!
//! Items are addressed externally by their `uuid` column; the integer primary
//! key never crosses the API boundary.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, Order,
    QueryFilter, QueryOrder, TransactionTrait,
};
use sea_orm::sea_query::Expr;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::entities::inventory_item::{self, Entity as InventoryItem};
use crate::errors::ServiceError;
use crate::validation::{self, ItemFields, ItemPatch};

#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DatabaseConnection>,
}

impl InventoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All items, case-insensitively ordered by name. The explicit `LOWER`
    /// keeps the order identical across MySQL and SQLite collations.
    pub async fn list_all(&self) -> Result<Vec<inventory_item::Model>, ServiceError> {
        let items = InventoryItem::find()
            .order_by(Expr::cust("LOWER(name)"), Order::Asc)
            .all(&*self.db)
            .await?;
        Ok(items)
    }

    pub async fn get_by_uuid(
        &self,
        uuid: &str,
    ) -> Result<Option<inventory_item::Model>, ServiceError> {
        let found = InventoryItem::find()
            .filter(inventory_item::Column::Uuid.eq(uuid))
            .one(&*self.db)
            .await?;
        Ok(found)
    }

    /// Validates and persists a new item, minting its public uuid.
    pub async fn create(&self, fields: ItemFields) -> Result<inventory_item::Model, ServiceError> {
        validation::validate(&fields)?;

        let now = Utc::now().naive_utc();
        let model = inventory_item::ActiveModel {
            uuid: Set(Uuid::new_v4().to_string()),
            name: Set(fields.name),
            quantity: Set(fields.quantity),
            max_quantity: Set(fields.max_quantity),
            location: Set(fields.location),
            symbol_name: Set(fields.symbol_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let created = model.insert(&*self.db).await?;
        info!(uuid = %created.uuid, name = %created.name, "created inventory item");
        Ok(created)
    }

    /// Applies a partial update: read, merge, validate and write inside one
    /// transaction so two concurrent patches cannot interleave into a row
    /// that never passed validation.
    pub async fn modify(
        &self,
        uuid: &str,
        patch: &ItemPatch,
    ) -> Result<inventory_item::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let existing = InventoryItem::find()
            .filter(inventory_item::Column::Uuid.eq(uuid))
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No item found with id {uuid}.")))?;

        let merged = validation::merge(&existing, patch);
        validation::validate(&merged)?;

        let model = inventory_item::ActiveModel {
            id: Set(existing.id),
            name: Set(merged.name),
            quantity: Set(merged.quantity),
            max_quantity: Set(merged.max_quantity),
            location: Set(merged.location),
            symbol_name: Set(merged.symbol_name),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        let updated = model.update(&txn).await?;
        txn.commit().await?;

        info!(uuid = %updated.uuid, "modified inventory item");
        Ok(updated)
    }

    /// Deletes by public uuid, returning how many rows went away (0 or 1).
    pub async fn delete_by_uuid(&self, uuid: &str) -> Result<u64, ServiceError> {
        let result = InventoryItem::delete_many()
            .filter(inventory_item::Column::Uuid.eq(uuid))
            .exec(&*self.db)
            .await?;

        if result.rows_affected > 0 {
            info!(uuid, "deleted inventory item");
        }
        Ok(result.rows_affected)
    }
}
