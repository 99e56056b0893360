//! Optimistic store
//!
//! 乐观更新三步走：本地先 dispatch，再请求服务端，确认后用权威数据换掉
//! 临时条目；失败则标记 stale 并全量回拉对账。

use shared::client::StockAdjustRequest;
use shared::models::{
    DiningTable, Order, OrderCreate, OrderItem, OrderStatus, StockLog, StockLogType, TableStatus,
};
use shared::util::{new_id, now_millis};

use super::action::Action;
use super::reducer::reduce;
use super::state::StoreState;
use crate::client::PosClient;
use crate::error::ClientResult;

/// Client-side data store with optimistic updates
#[derive(Debug)]
pub struct Store {
    state: parking_lot::RwLock<StoreState>,
    client: PosClient,
}

impl Store {
    pub fn new(client: PosClient) -> Self {
        Self {
            state: parking_lot::RwLock::new(StoreState::default()),
            client,
        }
    }

    pub fn client(&self) -> &PosClient {
        &self.client
    }

    /// A point-in-time copy of the state
    pub fn snapshot(&self) -> StoreState {
        self.state.read().clone()
    }

    pub fn is_stale(&self) -> bool {
        self.state.read().stale
    }

    pub fn dispatch(&self, action: Action) {
        reduce(&mut self.state.write(), action);
    }

    /// Replace every collection from the server and clear the stale flag
    pub async fn refresh_all(&self) -> ClientResult<()> {
        let products = self.client.products().list().await?;
        let suppliers = self.client.suppliers().list().await?;
        let tables = self.client.tables().list().await?;
        let orders = self.client.orders().list(None, None, None).await?;
        let logs = self.client.inventory().logs(None, None).await?;

        self.dispatch(Action::ProductsLoaded(products));
        self.dispatch(Action::SuppliersLoaded(suppliers));
        self.dispatch(Action::TablesLoaded(tables));
        self.dispatch(Action::OrdersLoaded(orders));
        self.dispatch(Action::StockLogsLoaded(logs));
        self.dispatch(Action::Reconciled);
        Ok(())
    }

    /// Place an order optimistically, then confirm with the server
    pub async fn place_order(&self, data: OrderCreate) -> ClientResult<Order> {
        let (order, logs) = self.build_provisional(&data);
        let order_no = order.order_no.clone();
        self.dispatch(Action::OrderPlaced { order, logs });

        match self.client.orders().place(&data).await {
            Ok(order) => {
                self.dispatch(Action::OrderConfirmed {
                    order_no,
                    order: order.clone(),
                });
                Ok(order)
            }
            Err(e) => {
                self.reconcile().await;
                Err(e)
            }
        }
    }

    /// Adjust product stock optimistically
    pub async fn adjust_stock(
        &self,
        product_id: &str,
        delta: i32,
        log_type: StockLogType,
        note: Option<String>,
    ) -> ClientResult<StockLog> {
        let provisional_id = new_id();
        if let Some(log) = self.build_provisional_log(product_id, &provisional_id, delta, log_type)
        {
            self.dispatch(Action::StockAdjusted(log));
        }

        let request = StockAdjustRequest {
            delta,
            log_type,
            note,
        };
        match self.client.products().adjust_stock(product_id, &request).await {
            Ok(log) => {
                self.dispatch(Action::StockLogConfirmed {
                    provisional_id,
                    log: log.clone(),
                });
                Ok(log)
            }
            Err(e) => {
                self.reconcile().await;
                Err(e)
            }
        }
    }

    /// Change a table's status optimistically
    pub async fn set_table_status(
        &self,
        table_id: &str,
        status: TableStatus,
    ) -> ClientResult<DiningTable> {
        self.dispatch(Action::TableStatusChanged {
            table_id: table_id.to_string(),
            status,
        });

        match self.client.tables().set_status(table_id, status).await {
            Ok(table) => Ok(table),
            Err(e) => {
                self.reconcile().await;
                Err(e)
            }
        }
    }

    /// Transition an order's status optimistically
    pub async fn set_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> ClientResult<Order> {
        self.dispatch(Action::OrderStatusChanged {
            order_id: order_id.to_string(),
            status,
        });

        match self.client.orders().set_status(order_id, status).await {
            Ok(order) => {
                self.dispatch(Action::OrderConfirmed {
                    order_no: order.order_no.clone(),
                    order: order.clone(),
                });
                Ok(order)
            }
            Err(e) => {
                self.reconcile().await;
                Err(e)
            }
        }
    }

    /// Mark stale, then try a full refetch. If the refetch itself fails the
    /// stale flag stays up for the next attempt.
    async fn reconcile(&self) {
        self.dispatch(Action::MarkedStale);
        if let Err(e) = self.refresh_all().await {
            tracing::warn!(error = %e, "Reconciliation refetch failed; store stays stale");
        }
    }

    /// Mirror of the server's placement effects, computed from local data
    fn build_provisional(&self, data: &OrderCreate) -> (Order, Vec<StockLog>) {
        let state = self.state.read();
        let order_id = new_id();

        let items: Vec<OrderItem> = data
            .items
            .iter()
            .map(|item| OrderItem {
                id: new_id(),
                order_id: order_id.clone(),
                product_id: item.product_id.clone(),
                name: item.name.clone(),
                price: item.price,
                cost_price: item.cost_price,
                image: item.image.clone(),
                unit: item.unit.clone(),
                quantity: item.quantity,
                subtotal: item.price * f64::from(item.quantity),
            })
            .collect();

        let total = items.iter().map(|i| i.subtotal).sum();
        let total_cost = if items.iter().any(|i| i.cost_price.is_some()) {
            Some(
                items
                    .iter()
                    .map(|i| i.cost_price.unwrap_or(0.0) * f64::from(i.quantity))
                    .sum(),
            )
        } else {
            None
        };

        let logs: Vec<StockLog> = items
            .iter()
            .filter_map(|item| {
                let product = state.products.iter().find(|p| p.id == item.product_id)?;
                let before = product.stock;
                let current = (before - item.quantity).max(0);
                Some(StockLog {
                    id: new_id(),
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    log_type: StockLogType::OutSale,
                    delta: current - before,
                    before_stock: before,
                    current_stock: current,
                    cost_price: product.cost_price,
                    operator: data.operator_id.clone().unwrap_or_else(|| "system".into()),
                    timestamp: data.timestamp,
                    note: None,
                    reference_no: Some(data.order_no.clone()),
                })
            })
            .collect();

        let order = Order {
            id: order_id,
            order_no: data.order_no.clone(),
            table_id: data.table_id.clone(),
            user_id: data.user_id.clone(),
            items,
            total,
            total_cost,
            discount: None,
            status: data.status,
            payment_method: data.payment_method.clone(),
            paid_at: (data.status == OrderStatus::Completed).then_some(data.timestamp),
            timestamp: data.timestamp,
            order_type: data.order_type,
            notes: data.notes.clone(),
            operator_id: data.operator_id.clone(),
        };

        (order, logs)
    }

    fn build_provisional_log(
        &self,
        product_id: &str,
        provisional_id: &str,
        delta: i32,
        log_type: StockLogType,
    ) -> Option<StockLog> {
        let state = self.state.read();
        let product = state.products.iter().find(|p| p.id == product_id)?;
        let before = product.stock;
        let current = (before + delta).max(0);
        Some(StockLog {
            id: provisional_id.to_string(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            log_type,
            delta: current - before,
            before_stock: before,
            current_stock: current,
            cost_price: product.cost_price,
            operator: "local".into(),
            timestamp: now_millis(),
            note: None,
            reference_no: None,
        })
    }
}
