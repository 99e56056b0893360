//! End-to-end API tests
//!
//! 每个测试起一个真实的 HTTP 服务 (临时 SQLite 文件 + 随机端口)，
//! 用 pos-client 走完整的请求链路。

use pos_client::{AuthEvent, ClientConfig, ClientError, PosClient, Store};
use pos_server::core::{Config, ServerState};
use shared::client::StockAdjustRequest;
use shared::models::{
    Category, CategoryCreate, DiningTable, DiningTableCreate, OrderCreate, OrderItemCreate,
    OrderStatus, OrderType, Product, ProductCreate, StockLogType, TableStatus, UserRole,
};
use shared::util::now_millis;

struct TestServer {
    base_url: String,
    _dir: tempfile::TempDir,
}

async fn spawn_server() -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("pos.db");
    let config = Config::with_overrides(db_path.to_string_lossy(), 0);

    let state = ServerState::initialize(&config).await.unwrap();
    let app = pos_server::api::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{addr}"),
        _dir: dir,
    }
}

fn client_for(server: &TestServer) -> PosClient {
    PosClient::new(ClientConfig::new(&server.base_url)).unwrap()
}

async fn admin_client(server: &TestServer) -> PosClient {
    let client = client_for(server);
    client.auth().login("admin", "admin123").await.unwrap();
    client
}

/// Category + product + table fixture for the order tests
async fn seed_menu(client: &PosClient, stock: i32) -> (Category, Product, DiningTable) {
    let category = client
        .categories()
        .create(&CategoryCreate {
            name: "主食".into(),
            icon: None,
            sort_order: Some(1),
        })
        .await
        .unwrap();

    let product = client
        .products()
        .create(&ProductCreate {
            name: "扬州炒饭".into(),
            price: 12.5,
            category_id: category.id.clone(),
            stock,
            unit: "份".into(),
            image: None,
            cost_price: Some(4.0),
            min_stock: Some(5),
            sales_mode: Some(vec!["dine-in".into(), "takeout".into()]),
            is_on_shelf: true,
            supplier_id: None,
            barcode: None,
            description: None,
        })
        .await
        .unwrap();

    let table = client
        .tables()
        .create(&DiningTableCreate {
            name: "A1".into(),
            status: None,
            capacity: 4,
            area: Some("大厅".into()),
            sort_order: None,
        })
        .await
        .unwrap();

    (category, product, table)
}

fn order_for(product: &Product, table: &DiningTable, order_no: &str, quantity: i32) -> OrderCreate {
    OrderCreate {
        order_no: order_no.into(),
        table_id: table.id.clone(),
        user_id: None,
        items: vec![OrderItemCreate {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            cost_price: product.cost_price,
            image: None,
            unit: product.unit.clone(),
            quantity,
        }],
        status: OrderStatus::Pending,
        payment_method: None,
        timestamp: now_millis(),
        order_type: OrderType::DineIn,
        notes: None,
        operator_id: None,
    }
}

#[tokio::test]
async fn login_rejects_bad_credentials_and_issues_tokens_on_success() {
    let server = spawn_server().await;
    let client = client_for(&server);

    let err = client.auth().login("admin", "wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));

    let resp = client.auth().login("admin", "admin123").await.unwrap();
    assert_eq!(resp.token_type, "bearer");
    assert_eq!(resp.user.role, UserRole::Admin);
    assert!(resp.user.permissions.contains(&"system:admin".to_string()));

    let me = client.auth().me().await.unwrap();
    assert_eq!(me.username, "admin");
}

#[tokio::test]
async fn unauthenticated_request_emits_unauthorized_exactly_once() {
    let server = spawn_server().await;
    let client = client_for(&server);
    client.auth().login("admin", "admin123").await.unwrap();
    let mut events = client.subscribe_auth_events();

    // Kill the session server-side, then reuse the stale access token
    client.tokens().set_tokens("not-a-jwt", "also-not-a-jwt");

    let err = client.products().list().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
    let err = client.products().list().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));

    assert_eq!(events.recv().await.unwrap(), AuthEvent::Unauthorized);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn logout_is_idempotent_and_revokes_the_access_token() {
    let server = spawn_server().await;
    let client = client_for(&server);
    client.auth().login("admin", "admin123").await.unwrap();
    let token = client.tokens().access_token().unwrap();

    client.auth().logout().await.unwrap();

    // Logging out again with the same token returns the same success
    client.tokens().set_tokens(&token, "x");
    client.auth().logout().await.unwrap();

    // Everything else rejects the revoked token
    client.tokens().set_tokens(&token, "x");
    let err = client.products().list().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
}

#[tokio::test]
async fn placing_an_order_deducts_stock_marks_table_and_writes_ledger() {
    let server = spawn_server().await;
    let client = admin_client(&server).await;
    let (_, product, table) = seed_menu(&client, 10).await;

    let order = client
        .orders()
        .place(&order_for(&product, &table, "ORD-1001", 3))
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total, 37.5);
    assert_eq!(order.total_cost, Some(12.0));
    assert_eq!(order.items.len(), 1);

    let product = client.products().get(&product.id).await.unwrap();
    assert_eq!(product.stock, 7);

    let tables = client.tables().list().await.unwrap();
    let table = tables.iter().find(|t| t.id == table.id).unwrap();
    assert_eq!(table.status, TableStatus::Scanned);
    assert_eq!(table.current_order_id.as_deref(), Some(order.id.as_str()));

    let logs = client
        .inventory()
        .logs(Some(&product.id), Some(StockLogType::OutSale))
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].delta, -3);
    assert_eq!(logs[0].reference_no.as_deref(), Some("ORD-1001"));
}

#[tokio::test]
async fn placement_clamps_stock_at_zero_and_logs_applied_delta() {
    let server = spawn_server().await;
    let client = admin_client(&server).await;
    let (_, product, table) = seed_menu(&client, 2).await;

    client
        .orders()
        .place(&order_for(&product, &table, "ORD-1002", 5))
        .await
        .unwrap();

    let product = client.products().get(&product.id).await.unwrap();
    assert_eq!(product.stock, 0);

    let logs = client.inventory().logs(Some(&product.id), None).await.unwrap();
    assert_eq!(logs[0].delta, -2);
    assert_eq!(logs[0].before_stock, 2);
    assert_eq!(logs[0].current_stock, 0);
}

#[tokio::test]
async fn duplicate_order_no_is_rejected_and_nothing_lands() {
    let server = spawn_server().await;
    let client = admin_client(&server).await;
    let (_, product, table) = seed_menu(&client, 10).await;

    client
        .orders()
        .place(&order_for(&product, &table, "ORD-1003", 2))
        .await
        .unwrap();

    let err = client
        .orders()
        .place(&order_for(&product, &table, "ORD-1003", 2))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 409, .. }));

    // First deduction only
    let product = client.products().get(&product.id).await.unwrap();
    assert_eq!(product.stock, 8);
    let orders = client.orders().list(None, None, None).await.unwrap();
    assert_eq!(orders.len(), 1);
}

#[tokio::test]
async fn cancelling_frees_the_table_without_restoring_stock() {
    let server = spawn_server().await;
    let client = admin_client(&server).await;
    let (_, product, table) = seed_menu(&client, 10).await;

    let order = client
        .orders()
        .place(&order_for(&product, &table, "ORD-1004", 4))
        .await
        .unwrap();

    let cancelled = client
        .orders()
        .set_status(&order.id, OrderStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let tables = client.tables().list().await.unwrap();
    let table = tables.iter().find(|t| t.id == table.id).unwrap();
    assert_eq!(table.status, TableStatus::Available);
    assert!(table.current_order_id.is_none());

    let product = client.products().get(&product.id).await.unwrap();
    assert_eq!(product.stock, 6);

    // CANCELLED is terminal
    let err = client
        .orders()
        .set_status(&order.id, OrderStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 422, .. }));
}

#[tokio::test]
async fn completed_orders_feed_the_dashboard() {
    let server = spawn_server().await;
    let client = admin_client(&server).await;
    let (_, product, table) = seed_menu(&client, 10).await;

    let order = client
        .orders()
        .place(&order_for(&product, &table, "ORD-1005", 2))
        .await
        .unwrap();
    client
        .orders()
        .set_status(&order.id, OrderStatus::Completed)
        .await
        .unwrap();

    let stats = client.analytics().dashboard().await.unwrap();
    assert_eq!(stats.today_revenue, 25.0);
    assert_eq!(stats.today_orders, 1);
    assert_eq!(stats.average_order_value, 25.0);

    let top = client.analytics().top_products(5).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].name, "扬州炒饭");
}

#[tokio::test]
async fn manual_stock_adjustment_and_low_stock_listing() {
    let server = spawn_server().await;
    let client = admin_client(&server).await;
    let (_, product, _) = seed_menu(&client, 10).await;

    let log = client
        .products()
        .adjust_stock(
            &product.id,
            &StockAdjustRequest {
                delta: -6,
                log_type: StockLogType::OutLoss,
                note: Some("盘亏".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(log.current_stock, 4);
    assert_eq!(log.operator, "Administrator");

    // 4 <= min_stock (5)
    let low = client.inventory().low_stock().await.unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].id, product.id);

    let value = client.inventory().value().await.unwrap();
    assert_eq!(value.item_count, 1);
    assert_eq!(value.total_value, 4.0 * 12.5);
}

#[tokio::test]
async fn store_confirms_optimistic_placement_against_the_server() {
    let server = spawn_server().await;
    let client = admin_client(&server).await;
    let (_, product, table) = seed_menu(&client, 10).await;

    let store = Store::new(client);
    store.refresh_all().await.unwrap();

    let placed = store
        .place_order(order_for(&product, &table, "ORD-2001", 3))
        .await
        .unwrap();

    let state = store.snapshot();
    assert!(!state.stale);
    assert_eq!(state.orders.len(), 1);
    assert_eq!(state.orders[0].id, placed.id);
    assert_eq!(state.products[0].stock, 7);
    assert_eq!(state.tables[0].status, TableStatus::Scanned);
    assert_eq!(
        state.tables[0].current_order_id.as_deref(),
        Some(placed.id.as_str())
    );
    assert_eq!(state.stock_logs.len(), 1);
    // Server's log replaced the provisional one
    assert_eq!(state.stock_logs[0].operator, "system");
}

#[tokio::test]
async fn store_reconciles_by_refetch_when_the_server_rejects() {
    let server = spawn_server().await;
    let client = admin_client(&server).await;
    let (_, product, table) = seed_menu(&client, 10).await;

    let store = Store::new(client);
    store.refresh_all().await.unwrap();

    let mut bad = order_for(&product, &table, "ORD-2002", 3);
    bad.table_id = "no-such-table".into();
    let err = store.place_order(bad).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 404, .. }));

    // Full refetch rolled the optimistic update back
    let state = store.snapshot();
    assert!(!state.stale);
    assert!(state.orders.is_empty());
    assert!(state.stock_logs.is_empty());
    assert_eq!(state.products[0].stock, 10);
    assert_eq!(state.tables[0].status, TableStatus::Available);
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let server = spawn_server().await;
    let body: serde_json::Value = reqwest::get(format!("{}/health", server.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
}
