pub mod bus;
pub mod clock;
pub mod config;
pub mod error;
pub mod fulfillment;
pub mod intake;
pub mod microsvc;
pub mod status;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, InventoryMode};
pub use error::OrderError;
pub use status::{map_to_storefront, to_storefront, DeliveryStatus, FulfillmentStatus};
