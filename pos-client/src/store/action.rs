//! Store actions

use shared::models::{
    DiningTable, Order, OrderStatus, Product, StockLog, Supplier, TableStatus,
};

/// State transitions applied by [`reduce`](super::reduce)
///
/// Collection loads replace wholesale; the rest are incremental updates used
/// both optimistically (before the server confirms) and on confirmation.
#[derive(Debug, Clone)]
pub enum Action {
    ProductsLoaded(Vec<Product>),
    SuppliersLoaded(Vec<Supplier>),
    TablesLoaded(Vec<DiningTable>),
    OrdersLoaded(Vec<Order>),
    StockLogsLoaded(Vec<StockLog>),

    /// A stock movement: product stock snaps to `current_stock`, log prepends
    StockAdjusted(StockLog),

    /// Swap a provisional stock log for the server's authoritative one
    StockLogConfirmed {
        provisional_id: String,
        log: StockLog,
    },

    /// Optimistic placement: prepend order, table → SCANNED, apply the
    /// predicted OUT_SALE logs
    OrderPlaced {
        order: Order,
        logs: Vec<StockLog>,
    },

    /// Swap the provisional order (matched by order_no) for the server's
    OrderConfirmed {
        order_no: String,
        order: Order,
    },

    /// AVAILABLE clears the table's current_order_id
    TableStatusChanged {
        table_id: String,
        status: TableStatus,
    },

    /// CANCELLED also frees the order's table
    OrderStatusChanged {
        order_id: String,
        status: OrderStatus,
    },

    ProductUpserted(Product),
    SupplierAdded(Supplier),

    /// An optimistic update failed to confirm; data is untrusted until refetch
    MarkedStale,

    /// Full refetch finished; data is trusted again
    Reconciled,
}
