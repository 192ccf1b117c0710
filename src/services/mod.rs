pub mod inventory;
pub mod users;
