pub mod inventory_item;
pub mod user;
pub mod user_type;
