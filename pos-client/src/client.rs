//! Typed API surface, grouped per resource
//!
//! `PosClient` owns the HTTP transport and the token store; the per-resource
//! accessors are cheap borrows, e.g. `client.products().list().await`.

use std::sync::Arc;

use shared::client::{
    AiStatus, AuthUser, BalanceRequest, CategorySales, ChangePasswordRequest, DashboardStats,
    DescriptionResponse, InsightRequest, InsightResponse, LoginRequest, LoginResponse,
    MessageResponse, OkResponse, OrderStatusRequest, PointsRequest, ProductDescriptionRequest,
    RefreshRequest, RefreshResponse, RegisterRequest, RegisterResponse, SalesSummary,
    StockAdjustRequest, StockValue, TableStatusRequest, TopProduct,
};
use shared::models::{
    Category, CategoryCreate, CategoryUpdate, DiningTable, DiningTableCreate, DiningTableUpdate,
    Member, MemberCreate, MemberUpdate, Order, OrderCreate, OrderStatus, Product, ProductCreate,
    ProductUpdate, Reservation, ReservationCreate, ReservationUpdate, StockLog, StockLogCreate,
    StockLogType, TableStatus,
};
use tokio::sync::broadcast;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::HttpClient;
use crate::token::{AuthEvent, TokenStore};

/// POS back-office API client
#[derive(Debug, Clone)]
pub struct PosClient {
    http: HttpClient,
}

impl PosClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Self::with_tokens(config, Arc::new(TokenStore::new()))
    }

    pub fn with_tokens(config: ClientConfig, tokens: Arc<TokenStore>) -> ClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(&config, tokens)?,
        })
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        self.http.tokens()
    }

    pub fn subscribe_auth_events(&self) -> broadcast::Receiver<AuthEvent> {
        self.http.tokens().subscribe()
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { http: &self.http }
    }

    pub fn categories(&self) -> CategoryApi<'_> {
        CategoryApi { http: &self.http }
    }

    pub fn suppliers(&self) -> SupplierApi<'_> {
        SupplierApi { http: &self.http }
    }

    pub fn products(&self) -> ProductApi<'_> {
        ProductApi { http: &self.http }
    }

    pub fn tables(&self) -> TableApi<'_> {
        TableApi { http: &self.http }
    }

    pub fn members(&self) -> MemberApi<'_> {
        MemberApi { http: &self.http }
    }

    pub fn orders(&self) -> OrderApi<'_> {
        OrderApi { http: &self.http }
    }

    pub fn reservations(&self) -> ReservationApi<'_> {
        ReservationApi { http: &self.http }
    }

    pub fn inventory(&self) -> InventoryApi<'_> {
        InventoryApi { http: &self.http }
    }

    pub fn analytics(&self) -> AnalyticsApi<'_> {
        AnalyticsApi { http: &self.http }
    }

    pub fn ai(&self) -> AiApi<'_> {
        AiApi { http: &self.http }
    }
}

// =============================================================================
// Auth
// =============================================================================

pub struct AuthApi<'a> {
    http: &'a HttpClient,
}

impl AuthApi<'_> {
    /// Login and store the returned token pair
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let resp: LoginResponse = self
            .http
            .post(
                "/api/auth/login",
                &LoginRequest {
                    username: username.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;
        self.http
            .tokens()
            .set_tokens(&resp.access_token, &resp.refresh_token);
        Ok(resp)
    }

    /// Logout server-side, then drop local tokens
    pub async fn logout(&self) -> ClientResult<MessageResponse> {
        let resp = self.http.post_empty("/api/auth/logout").await?;
        self.http.tokens().clear();
        Ok(resp)
    }

    /// Exchange the stored refresh token for a new access token
    pub async fn refresh(&self) -> ClientResult<RefreshResponse> {
        let refresh_token = self
            .http
            .tokens()
            .refresh_token()
            .ok_or(crate::ClientError::Unauthorized)?;
        let resp: RefreshResponse = self
            .http
            .post("/api/auth/refresh", &RefreshRequest { refresh_token })
            .await?;
        self.http.tokens().set_access_token(&resp.access_token);
        Ok(resp)
    }

    pub async fn me(&self) -> ClientResult<AuthUser> {
        self.http.get("/api/auth/me").await
    }

    pub async fn register(&self, data: &RegisterRequest) -> ClientResult<RegisterResponse> {
        self.http.post("/api/auth/register", data).await
    }

    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> ClientResult<MessageResponse> {
        self.http
            .post(
                "/api/auth/change-password",
                &ChangePasswordRequest {
                    old_password: old_password.to_string(),
                    new_password: new_password.to_string(),
                },
            )
            .await
    }
}

// =============================================================================
// Catalog
// =============================================================================

pub struct CategoryApi<'a> {
    http: &'a HttpClient,
}

impl CategoryApi<'_> {
    pub async fn list(&self) -> ClientResult<Vec<Category>> {
        self.http.get("/api/categories/").await
    }

    pub async fn create(&self, data: &CategoryCreate) -> ClientResult<Category> {
        self.http.post("/api/categories/", data).await
    }

    pub async fn update(&self, id: &str, data: &CategoryUpdate) -> ClientResult<Category> {
        self.http.put(&format!("/api/categories/{id}"), data).await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<OkResponse> {
        self.http.delete(&format!("/api/categories/{id}")).await
    }
}

pub struct SupplierApi<'a> {
    http: &'a HttpClient,
}

impl SupplierApi<'_> {
    pub async fn list(&self) -> ClientResult<Vec<shared::models::Supplier>> {
        self.http.get("/api/suppliers/").await
    }

    pub async fn create(
        &self,
        data: &shared::models::SupplierCreate,
    ) -> ClientResult<shared::models::Supplier> {
        self.http.post("/api/suppliers/", data).await
    }

    pub async fn update(
        &self,
        id: &str,
        data: &shared::models::SupplierUpdate,
    ) -> ClientResult<shared::models::Supplier> {
        self.http.put(&format!("/api/suppliers/{id}"), data).await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<OkResponse> {
        self.http.delete(&format!("/api/suppliers/{id}")).await
    }
}

pub struct ProductApi<'a> {
    http: &'a HttpClient,
}

impl ProductApi<'_> {
    pub async fn list(&self) -> ClientResult<Vec<Product>> {
        self.http.get("/api/products/").await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Product> {
        self.http.get(&format!("/api/products/{id}")).await
    }

    pub async fn create(&self, data: &ProductCreate) -> ClientResult<Product> {
        self.http.post("/api/products/", data).await
    }

    pub async fn update(&self, id: &str, data: &ProductUpdate) -> ClientResult<Product> {
        self.http.put(&format!("/api/products/{id}"), data).await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<OkResponse> {
        self.http.delete(&format!("/api/products/{id}")).await
    }

    /// POST /api/products/{id}/stock
    pub async fn adjust_stock(
        &self,
        id: &str,
        data: &StockAdjustRequest,
    ) -> ClientResult<StockLog> {
        self.http
            .post(&format!("/api/products/{id}/stock"), data)
            .await
    }
}

// =============================================================================
// Floor
// =============================================================================

pub struct TableApi<'a> {
    http: &'a HttpClient,
}

impl TableApi<'_> {
    pub async fn list(&self) -> ClientResult<Vec<DiningTable>> {
        self.http.get("/api/tables/").await
    }

    pub async fn create(&self, data: &DiningTableCreate) -> ClientResult<DiningTable> {
        self.http.post("/api/tables/", data).await
    }

    pub async fn update(&self, id: &str, data: &DiningTableUpdate) -> ClientResult<DiningTable> {
        self.http.put(&format!("/api/tables/{id}"), data).await
    }

    pub async fn set_status(&self, id: &str, status: TableStatus) -> ClientResult<DiningTable> {
        self.http
            .patch(
                &format!("/api/tables/{id}/status"),
                &TableStatusRequest { status },
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<OkResponse> {
        self.http.delete(&format!("/api/tables/{id}")).await
    }
}

pub struct ReservationApi<'a> {
    http: &'a HttpClient,
}

impl ReservationApi<'_> {
    pub async fn list(&self) -> ClientResult<Vec<Reservation>> {
        self.http.get("/api/reservations/").await
    }

    pub async fn create(&self, data: &ReservationCreate) -> ClientResult<Reservation> {
        self.http.post("/api/reservations/", data).await
    }

    pub async fn update(&self, id: &str, data: &ReservationUpdate) -> ClientResult<Reservation> {
        self.http.put(&format!("/api/reservations/{id}"), data).await
    }

    pub async fn cancel(&self, id: &str) -> ClientResult<Reservation> {
        self.http
            .post_empty(&format!("/api/reservations/{id}/cancel"))
            .await
    }

    pub async fn arrive(&self, id: &str) -> ClientResult<Reservation> {
        self.http
            .post_empty(&format!("/api/reservations/{id}/arrive"))
            .await
    }
}

// =============================================================================
// Customers
// =============================================================================

pub struct MemberApi<'a> {
    http: &'a HttpClient,
}

impl MemberApi<'_> {
    pub async fn list(&self) -> ClientResult<Vec<Member>> {
        self.http.get("/api/users/").await
    }

    pub async fn create(&self, data: &MemberCreate) -> ClientResult<Member> {
        self.http.post("/api/users/", data).await
    }

    pub async fn update(&self, id: &str, data: &MemberUpdate) -> ClientResult<Member> {
        self.http.put(&format!("/api/users/{id}"), data).await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<OkResponse> {
        self.http.delete(&format!("/api/users/{id}")).await
    }

    pub async fn add_balance(&self, id: &str, amount: f64) -> ClientResult<Member> {
        self.http
            .post(&format!("/api/users/{id}/balance"), &BalanceRequest { amount })
            .await
    }

    pub async fn add_points(&self, id: &str, points: i32) -> ClientResult<Member> {
        self.http
            .post(&format!("/api/users/{id}/points"), &PointsRequest { points })
            .await
    }
}

// =============================================================================
// Orders
// =============================================================================

pub struct OrderApi<'a> {
    http: &'a HttpClient,
}

impl OrderApi<'_> {
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        start_ts: Option<i64>,
        end_ts: Option<i64>,
    ) -> ClientResult<Vec<Order>> {
        let mut query = Vec::new();
        if let Some(status) = status {
            query.push(format!("status={}", status.as_str()));
        }
        if let Some(start_ts) = start_ts {
            query.push(format!("start_ts={start_ts}"));
        }
        if let Some(end_ts) = end_ts {
            query.push(format!("end_ts={end_ts}"));
        }
        let path = if query.is_empty() {
            "/api/orders/".to_string()
        } else {
            format!("/api/orders/?{}", query.join("&"))
        };
        self.http.get(&path).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Order> {
        self.http.get(&format!("/api/orders/{id}")).await
    }

    pub async fn place(&self, data: &OrderCreate) -> ClientResult<Order> {
        self.http.post("/api/orders/", data).await
    }

    pub async fn set_status(&self, id: &str, status: OrderStatus) -> ClientResult<Order> {
        self.http
            .patch(
                &format!("/api/orders/{id}/status"),
                &OrderStatusRequest { status },
            )
            .await
    }
}

// =============================================================================
// Inventory / Analytics / AI
// =============================================================================

pub struct InventoryApi<'a> {
    http: &'a HttpClient,
}

impl InventoryApi<'_> {
    pub async fn logs(
        &self,
        product_id: Option<&str>,
        log_type: Option<StockLogType>,
    ) -> ClientResult<Vec<StockLog>> {
        let mut query = Vec::new();
        if let Some(product_id) = product_id {
            query.push(format!("product_id={product_id}"));
        }
        if let Some(log_type) = log_type {
            query.push(format!("type={}", log_type.as_str()));
        }
        let path = if query.is_empty() {
            "/api/inventory/logs".to_string()
        } else {
            format!("/api/inventory/logs?{}", query.join("&"))
        };
        self.http.get(&path).await
    }

    pub async fn create_log(&self, data: &StockLogCreate) -> ClientResult<StockLog> {
        self.http.post("/api/inventory/logs", data).await
    }

    pub async fn low_stock(&self) -> ClientResult<Vec<Product>> {
        self.http.get("/api/inventory/low-stock").await
    }

    pub async fn value(&self) -> ClientResult<StockValue> {
        self.http.get("/api/inventory/value").await
    }
}

pub struct AnalyticsApi<'a> {
    http: &'a HttpClient,
}

impl AnalyticsApi<'_> {
    pub async fn sales_summary(&self) -> ClientResult<Vec<SalesSummary>> {
        self.http.get("/api/analytics/sales-summary").await
    }

    pub async fn dashboard(&self) -> ClientResult<DashboardStats> {
        self.http.get("/api/analytics/dashboard").await
    }

    pub async fn top_products(&self, limit: i64) -> ClientResult<Vec<TopProduct>> {
        self.http
            .get(&format!("/api/analytics/top-products?limit={limit}"))
            .await
    }

    pub async fn category_sales(&self) -> ClientResult<Vec<CategorySales>> {
        self.http.get("/api/analytics/category-sales").await
    }
}

pub struct AiApi<'a> {
    http: &'a HttpClient,
}

impl AiApi<'_> {
    pub async fn insight(&self, data: &InsightRequest) -> ClientResult<InsightResponse> {
        self.http.post("/api/ai/insight", data).await
    }

    pub async fn product_description(
        &self,
        product_name: &str,
    ) -> ClientResult<DescriptionResponse> {
        self.http
            .post(
                "/api/ai/product-description",
                &ProductDescriptionRequest {
                    product_name: product_name.to_string(),
                },
            )
            .await
    }

    pub async fn status(&self) -> ClientResult<AiStatus> {
        self.http.get("/api/ai/status").await
    }
}
