use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};

/// An inventory item row. `id` is the storage-internal key and never leaves
/// the server; `uuid` is the identity the mobile clients see.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: String,
    pub name: String,
    pub quantity: i32,
    pub max_quantity: i32,
    pub location: String,
    pub symbol_name: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
