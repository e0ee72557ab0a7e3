//! InMemoryInventory - HashMap-backed product catalogue.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{InventoryStore, StoreError};

/// A catalogue entry.
///
/// The fulfillment side tracks both prices and the supplier; the intake side
/// only needs the sale price and uses `category` for the product group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Supplier (fulfillment) or product category (intake).
    pub category: String,
    pub purchase_price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub stock: u32,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        sale_price: Decimal,
        stock: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            purchase_price: None,
            sale_price: Some(sale_price),
            stock,
        }
    }

    pub fn with_purchase_price(mut self, price: Decimal) -> Self {
        self.purchase_price = Some(price);
        self
    }
}

/// Why a stock change was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    #[error("product {0} not found")]
    UnknownProduct(String),
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: u32,
        available: u32,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// In-memory inventory. Clone-friendly via `Arc`; clones share the map.
///
/// Every mutation takes the map-level write lock, so a check-and-decrement
/// never interleaves with another request on any product.
#[derive(Clone, Default)]
pub struct InMemoryInventory {
    products: Arc<RwLock<HashMap<String, Product>>>,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an inventory pre-populated with `products`.
    pub fn seeded(products: impl IntoIterator<Item = Product>) -> Self {
        let map = products.into_iter().map(|p| (p.id.clone(), p)).collect();
        Self {
            products: Arc::new(RwLock::new(map)),
        }
    }

    /// Current stock of a product, `None` if unknown.
    pub fn stock(&self, product_id: &str) -> Result<Option<u32>, StoreError> {
        Ok(self.get(product_id)?.map(|p| p.stock))
    }
}

impl InventoryStore for InMemoryInventory {
    fn get(&self, product_id: &str) -> Result<Option<Product>, StoreError> {
        let products = self
            .products
            .read()
            .map_err(|_| StoreError::LockPoisoned("inventory get"))?;
        Ok(products.get(product_id).cloned())
    }

    fn put(&self, product: Product) -> Result<(), StoreError> {
        let mut products = self
            .products
            .write()
            .map_err(|_| StoreError::LockPoisoned("inventory put"))?;
        products.insert(product.id.clone(), product);
        Ok(())
    }

    fn checked_decrement(&self, product_id: &str, quantity: u32) -> Result<Product, StockError> {
        let mut products = self
            .products
            .write()
            .map_err(|_| StoreError::LockPoisoned("inventory decrement"))?;

        let product = products
            .get_mut(product_id)
            .ok_or_else(|| StockError::UnknownProduct(product_id.to_string()))?;

        let remaining = product
            .stock
            .checked_sub(quantity)
            .ok_or_else(|| StockError::InsufficientStock {
                product_id: product_id.to_string(),
                requested: quantity,
                available: product.stock,
            })?;

        product.stock = remaining;
        Ok(product.clone())
    }

    fn restock(&self, product_id: &str, quantity: u32) -> Result<Product, StockError> {
        let mut products = self
            .products
            .write()
            .map_err(|_| StoreError::LockPoisoned("inventory restock"))?;

        let product = products
            .get_mut(product_id)
            .ok_or_else(|| StockError::UnknownProduct(product_id.to_string()))?;

        product.stock = product.stock.saturating_add(quantity);
        Ok(product.clone())
    }
}
