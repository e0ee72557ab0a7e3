pub mod order_create;
pub mod status_update;
