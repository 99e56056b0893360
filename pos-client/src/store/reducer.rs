//! Pure reducer
//!
//! 所有状态变更走这里。乐观更新与服务端确认复用同一组 Action，
//! reducer 本身不区分两者。

use shared::models::{OrderStatus, TableStatus};

use super::action::Action;
use super::state::StoreState;

/// Apply one action to the state
pub fn reduce(state: &mut StoreState, action: Action) {
    match action {
        Action::ProductsLoaded(products) => state.products = products,
        Action::SuppliersLoaded(suppliers) => state.suppliers = suppliers,
        Action::TablesLoaded(tables) => state.tables = tables,
        Action::OrdersLoaded(orders) => state.orders = orders,
        Action::StockLogsLoaded(logs) => state.stock_logs = logs,

        Action::StockAdjusted(log) => {
            apply_stock_log(state, &log);
            state.stock_logs.insert(0, log);
        }

        Action::StockLogConfirmed {
            provisional_id,
            log,
        } => {
            apply_stock_log(state, &log);
            match state.stock_logs.iter_mut().find(|l| l.id == provisional_id) {
                Some(slot) => *slot = log,
                None => state.stock_logs.insert(0, log),
            }
        }

        Action::OrderPlaced { order, logs } => {
            if let Some(table) = state.tables.iter_mut().find(|t| t.id == order.table_id) {
                table.status = TableStatus::Scanned;
                table.current_order_id = Some(order.id.clone());
            }
            for log in logs {
                apply_stock_log(state, &log);
                state.stock_logs.insert(0, log);
            }
            state.orders.insert(0, order);
        }

        Action::OrderConfirmed { order_no, order } => {
            match state.orders.iter_mut().find(|o| o.order_no == order_no) {
                Some(slot) => {
                    // The provisional id changes; keep the table pointing at
                    // the confirmed order.
                    if let Some(table) = state
                        .tables
                        .iter_mut()
                        .find(|t| t.current_order_id.as_deref() == Some(slot.id.as_str()))
                    {
                        table.current_order_id = Some(order.id.clone());
                    }
                    *slot = order;
                }
                None => state.orders.insert(0, order),
            }
        }

        Action::TableStatusChanged { table_id, status } => {
            if let Some(table) = state.tables.iter_mut().find(|t| t.id == table_id) {
                table.status = status;
                if status == TableStatus::Available {
                    table.current_order_id = None;
                }
            }
        }

        Action::OrderStatusChanged { order_id, status } => {
            let table_id = state
                .orders
                .iter_mut()
                .find(|o| o.id == order_id)
                .map(|order| {
                    order.status = status;
                    order.table_id.clone()
                });
            if status == OrderStatus::Cancelled
                && let Some(table_id) = table_id
                && let Some(table) = state.tables.iter_mut().find(|t| t.id == table_id)
            {
                table.status = TableStatus::Available;
                table.current_order_id = None;
            }
        }

        Action::ProductUpserted(product) => {
            match state.products.iter_mut().find(|p| p.id == product.id) {
                Some(slot) => *slot = product,
                None => state.products.push(product),
            }
        }

        Action::SupplierAdded(supplier) => state.suppliers.push(supplier),

        Action::MarkedStale => state.stale = true,
        Action::Reconciled => state.stale = false,
    }
}

/// Snap the product's stock to the log's post-movement value
fn apply_stock_log(state: &mut StoreState, log: &shared::models::StockLog) {
    if let Some(product) = state.products.iter_mut().find(|p| p.id == log.product_id) {
        product.stock = log.current_stock;
    }
}

#[cfg(test)]
mod tests {
    use shared::models::{
        DiningTable, Order, OrderItem, OrderType, Product, StockLog, StockLogType,
    };

    use super::*;

    fn product(id: &str, stock: i32) -> Product {
        Product {
            id: id.into(),
            name: format!("Product {id}"),
            price: 10.0,
            cost_price: Some(4.0),
            category_id: "cat-1".into(),
            image: None,
            stock,
            min_stock: Some(5),
            unit: "份".into(),
            sales_mode: None,
            is_on_shelf: true,
            supplier_id: None,
            barcode: None,
            description: None,
        }
    }

    fn table(id: &str) -> DiningTable {
        DiningTable {
            id: id.into(),
            name: "A1".into(),
            status: TableStatus::Available,
            capacity: 4,
            area: None,
            current_order_id: None,
            sort_order: 0,
        }
    }

    fn order(id: &str, order_no: &str, table_id: &str) -> Order {
        Order {
            id: id.into(),
            order_no: order_no.into(),
            table_id: table_id.into(),
            user_id: None,
            items: vec![OrderItem {
                id: format!("{id}-item"),
                order_id: id.into(),
                product_id: "p1".into(),
                name: "Product p1".into(),
                price: 10.0,
                cost_price: Some(4.0),
                image: None,
                unit: "份".into(),
                quantity: 3,
                subtotal: 30.0,
            }],
            total: 30.0,
            total_cost: Some(12.0),
            discount: None,
            status: OrderStatus::Pending,
            payment_method: None,
            paid_at: None,
            timestamp: 1_700_000_000_000,
            order_type: OrderType::DineIn,
            notes: None,
            operator_id: None,
        }
    }

    fn out_sale_log(id: &str, product_id: &str, before: i32, requested: i32) -> StockLog {
        let current = (before - requested).max(0);
        StockLog {
            id: id.into(),
            product_id: product_id.into(),
            product_name: format!("Product {product_id}"),
            log_type: StockLogType::OutSale,
            delta: current - before,
            before_stock: before,
            current_stock: current,
            cost_price: Some(4.0),
            operator: "system".into(),
            timestamp: 1_700_000_000_000,
            note: None,
            reference_no: Some("ORD-1".into()),
        }
    }

    #[test]
    fn optimistic_placement_updates_order_table_and_stock() {
        let mut state = StoreState {
            products: vec![product("p1", 20)],
            tables: vec![table("t1")],
            ..Default::default()
        };

        reduce(
            &mut state,
            Action::OrderPlaced {
                order: order("local-1", "ORD-1", "t1"),
                logs: vec![out_sale_log("local-log-1", "p1", 20, 3)],
            },
        );

        assert_eq!(state.orders.len(), 1);
        assert_eq!(state.orders[0].order_no, "ORD-1");
        assert_eq!(state.tables[0].status, TableStatus::Scanned);
        assert_eq!(state.tables[0].current_order_id.as_deref(), Some("local-1"));
        assert_eq!(state.products[0].stock, 17);
        assert_eq!(state.stock_logs.len(), 1);
        assert_eq!(state.stock_logs[0].delta, -3);
    }

    #[test]
    fn placement_clamps_stock_at_zero() {
        let mut state = StoreState {
            products: vec![product("p1", 2)],
            tables: vec![table("t1")],
            ..Default::default()
        };

        reduce(
            &mut state,
            Action::OrderPlaced {
                order: order("local-1", "ORD-1", "t1"),
                logs: vec![out_sale_log("local-log-1", "p1", 2, 5)],
            },
        );

        assert_eq!(state.products[0].stock, 0);
        assert_eq!(state.stock_logs[0].delta, -2);
    }

    #[test]
    fn confirmation_swaps_provisional_order_and_repoints_table() {
        let mut state = StoreState {
            products: vec![product("p1", 20)],
            tables: vec![table("t1")],
            ..Default::default()
        };
        reduce(
            &mut state,
            Action::OrderPlaced {
                order: order("local-1", "ORD-1", "t1"),
                logs: vec![],
            },
        );

        reduce(
            &mut state,
            Action::OrderConfirmed {
                order_no: "ORD-1".into(),
                order: order("srv-9", "ORD-1", "t1"),
            },
        );

        assert_eq!(state.orders.len(), 1);
        assert_eq!(state.orders[0].id, "srv-9");
        assert_eq!(state.tables[0].current_order_id.as_deref(), Some("srv-9"));
    }

    #[test]
    fn available_clears_current_order() {
        let mut state = StoreState {
            tables: vec![DiningTable {
                status: TableStatus::Paid,
                current_order_id: Some("o1".into()),
                ..table("t1")
            }],
            ..Default::default()
        };

        reduce(
            &mut state,
            Action::TableStatusChanged {
                table_id: "t1".into(),
                status: TableStatus::Available,
            },
        );

        assert_eq!(state.tables[0].status, TableStatus::Available);
        assert!(state.tables[0].current_order_id.is_none());
    }

    #[test]
    fn cancelling_an_order_frees_its_table() {
        let mut state = StoreState {
            tables: vec![DiningTable {
                status: TableStatus::Scanned,
                current_order_id: Some("o1".into()),
                ..table("t1")
            }],
            orders: vec![order("o1", "ORD-1", "t1")],
            ..Default::default()
        };

        reduce(
            &mut state,
            Action::OrderStatusChanged {
                order_id: "o1".into(),
                status: OrderStatus::Cancelled,
            },
        );

        assert_eq!(state.orders[0].status, OrderStatus::Cancelled);
        assert_eq!(state.tables[0].status, TableStatus::Available);
        assert!(state.tables[0].current_order_id.is_none());
    }

    #[test]
    fn reconciliation_replaces_collections_and_clears_stale() {
        let mut state = StoreState {
            products: vec![product("p1", 20)],
            tables: vec![table("t1")],
            ..Default::default()
        };
        // Optimistic update that the server will reject
        reduce(
            &mut state,
            Action::OrderPlaced {
                order: order("local-1", "ORD-1", "t1"),
                logs: vec![out_sale_log("local-log-1", "p1", 20, 3)],
            },
        );
        reduce(&mut state, Action::MarkedStale);
        assert!(state.stale);

        // Full refetch: the server never saw the order
        reduce(&mut state, Action::ProductsLoaded(vec![product("p1", 20)]));
        reduce(&mut state, Action::TablesLoaded(vec![table("t1")]));
        reduce(&mut state, Action::OrdersLoaded(vec![]));
        reduce(&mut state, Action::StockLogsLoaded(vec![]));
        reduce(&mut state, Action::Reconciled);

        assert!(!state.stale);
        assert!(state.orders.is_empty());
        assert_eq!(state.products[0].stock, 20);
        assert_eq!(state.tables[0].status, TableStatus::Available);
    }

    #[test]
    fn stock_log_confirmation_swaps_the_provisional_entry() {
        let mut state = StoreState {
            products: vec![product("p1", 20)],
            ..Default::default()
        };
        let mut provisional = out_sale_log("local-log-1", "p1", 20, 3);
        provisional.log_type = StockLogType::Adjustment;
        reduce(&mut state, Action::StockAdjusted(provisional));

        let mut confirmed = out_sale_log("srv-log-1", "p1", 20, 3);
        confirmed.log_type = StockLogType::Adjustment;
        reduce(
            &mut state,
            Action::StockLogConfirmed {
                provisional_id: "local-log-1".into(),
                log: confirmed,
            },
        );

        assert_eq!(state.stock_logs.len(), 1);
        assert_eq!(state.stock_logs[0].id, "srv-log-1");
        assert_eq!(state.products[0].stock, 17);
    }
}
