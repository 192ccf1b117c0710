//! The inventory item endpoints. All of them sit behind the bearer-token
//! middleware; any authenticated user may read and write stock.

use axum::{extract::State, response::Response, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::entities::inventory_item;
use crate::errors::ServiceError;
use crate::handlers::common::{created_response, ok_response, AppJson};
use crate::validation::{ItemFields, ItemPatch};
use crate::AppState;

/// Wire shape of an item: camelCase keys, the public uuid presented as `id`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    pub id: String,
    pub name: String,
    pub quantity: i32,
    pub max_quantity: i32,
    pub location: String,
    pub symbol_name: String,
}

impl From<&inventory_item::Model> for ItemBody {
    fn from(model: &inventory_item::Model) -> Self {
        Self {
            id: model.uuid.clone(),
            name: model.name.clone(),
            quantity: model.quantity,
            max_quantity: model.max_quantity,
            location: model.location.clone(),
            symbol_name: model.symbol_name.clone(),
        }
    }
}

/// `GET /get-all-items`: every item, ordered case-insensitively by name.
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<ItemBody>>, ServiceError> {
    let items = state.inventory.list_all().await?;
    Ok(Json(items.iter().map(ItemBody::from).collect()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub name: String,
    pub location: String,
    pub quantity: i32,
    pub max_quantity: i32,
    pub symbol_name: Option<String>,
}

/// `POST /add-item`: validates and creates an item, minting its uuid.
#[instrument(skip(state, body), fields(name = %body.name))]
pub async fn add_item(
    State(state): State<AppState>,
    AppJson(body): AppJson<AddItemRequest>,
) -> Result<Response, ServiceError> {
    let fields = ItemFields::new(
        &body.name,
        &body.location,
        body.quantity,
        body.max_quantity,
        body.symbol_name.as_deref(),
    );
    let created = state.inventory.create(fields).await?;
    Ok(created_response(json!({ "item": ItemBody::from(&created) })))
}

#[derive(Debug, Deserialize)]
pub struct ModifyItemRequest {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub patch: ItemPatch,
}

/// `POST /modify-item`: partial update addressed by the item's public id.
/// Fields absent from the body keep their stored values.
#[instrument(skip(state, body), fields(id = %body.id))]
pub async fn modify_item(
    State(state): State<AppState>,
    AppJson(body): AppJson<ModifyItemRequest>,
) -> Result<Response, ServiceError> {
    if body.id.trim().is_empty() {
        return Err(ServiceError::BadRequest(
            "Field 'id' (UUID) is required.".to_string(),
        ));
    }

    let updated = state.inventory.modify(body.id.trim(), &body.patch).await?;
    Ok(ok_response(json!({ "item": ItemBody::from(&updated) })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteItemRequest {
    #[serde(default)]
    pub id: String,
}

/// `POST /delete-item`: removes an item by public id. The id must parse as a
/// UUID; a syntactically bad id is a 400 rather than a 404.
#[instrument(skip(state, body), fields(id = %body.id))]
pub async fn delete_item(
    State(state): State<AppState>,
    AppJson(body): AppJson<DeleteItemRequest>,
) -> Result<Response, ServiceError> {
    let id = body.id.trim();
    if Uuid::parse_str(id).is_err() {
        return Err(ServiceError::BadRequest(
            "Field 'id' must be a valid UUID string.".to_string(),
        ));
    }

    let deleted = state.inventory.delete_by_uuid(id).await?;
    if deleted == 0 {
        return Err(ServiceError::NotFound(format!("No item found with id {id}.")));
    }

    Ok(ok_response(json!({
        "message": "Item deleted successfully.",
        "id": id,
    })))
}
