//! Store state

use shared::models::{DiningTable, Order, Product, StockLog, Supplier};

/// Local mirror of the server-side collections
///
/// `stale` flips on when an optimistic update failed to confirm; the data is
/// then untrusted until the next full refetch.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub products: Vec<Product>,
    pub suppliers: Vec<Supplier>,
    pub tables: Vec<DiningTable>,
    pub orders: Vec<Order>,
    pub stock_logs: Vec<StockLog>,
    pub stale: bool,
}
