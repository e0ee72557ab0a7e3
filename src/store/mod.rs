//! Stores - key-value storage owned by each service.
//!
//! Each service constructs its stores once at start and hands them to its
//! workflows behind an `Arc`. Two shapes exist:
//!
//! - [`InventoryStore`]: product id → [`Product`], with an atomic
//!   check-and-decrement so concurrent orders can never oversell.
//! - [`OrderStore`]: order id → record, written once and mutated in place.
//!
//! ## Example
//!
//! ```
//! use orderflow::store::{InMemoryInventory, InventoryStore, Product};
//! use rust_decimal::Decimal;
//!
//! let inventory = InMemoryInventory::new();
//! inventory.put(Product::new("PROD-1", "Widget", "Tools", Decimal::new(500, 2), 10)).unwrap();
//!
//! let product = inventory.checked_decrement("PROD-1", 3).unwrap();
//! assert_eq!(product.stock, 7);
//! assert!(inventory.checked_decrement("PROD-1", 8).is_err());
//! ```

mod inventory;
mod orders;

use thiserror::Error;

pub use inventory::{InMemoryInventory, Product, StockError};
pub use orders::InMemoryOrderStore;

/// Types that can be stored in an [`OrderStore`].
pub trait Record: Clone + Send + Sync {
    /// Collection name, used in log lines and error messages.
    const COLLECTION: &'static str;

    /// Unique key of this record.
    fn id(&self) -> &str;
}

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    #[error("{collection}:{id} already exists")]
    Duplicate { collection: &'static str, id: String },
}

/// Product catalogue with stock levels.
pub trait InventoryStore: Send + Sync {
    /// Look up a product.
    fn get(&self, product_id: &str) -> Result<Option<Product>, StoreError>;

    /// Insert or replace a product.
    fn put(&self, product: Product) -> Result<(), StoreError>;

    /// Atomically check that `quantity` units are available and remove them.
    ///
    /// Returns the product as it is after the decrement. On failure the stock
    /// is left untouched.
    fn checked_decrement(&self, product_id: &str, quantity: u32) -> Result<Product, StockError>;

    /// Return `quantity` units to stock. Used to undo a decrement whose
    /// follow-up step failed.
    fn restock(&self, product_id: &str, quantity: u32) -> Result<Product, StockError>;
}

/// Order records keyed by order id.
pub trait OrderStore<O: Record>: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<O>, StoreError>;

    /// Insert a new record. Fails with [`StoreError::Duplicate`] if the id is taken.
    fn insert(&self, record: O) -> Result<(), StoreError>;

    /// Mutate a record in place under the store lock. Returns the updated
    /// record, or `None` if the id is unknown.
    fn update(&self, id: &str, apply: &mut dyn FnMut(&mut O)) -> Result<Option<O>, StoreError>;

    fn len(&self) -> Result<usize, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}
