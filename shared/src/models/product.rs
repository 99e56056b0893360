//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
///
/// `stock` is the single source of truth for inventory and never goes
/// negative: writes clamp at 0 and the stock log records the applied delta.
/// `sales_mode` is stored comma-joined in SQLite and split by the
/// repository, so this type intentionally does not derive `FromRow`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub cost_price: Option<f64>,
    /// Category reference (String ID, required)
    pub category_id: String,
    pub image: Option<String>,
    pub stock: i32,
    pub min_stock: Option<i32>,
    pub unit: String,
    pub sales_mode: Option<Vec<String>>,
    pub is_on_shelf: bool,
    pub supplier_id: Option<String>,
    pub barcode: Option<String>,
    pub description: Option<String>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub category_id: String,
    pub stock: i32,
    pub unit: String,
    pub image: Option<String>,
    pub cost_price: Option<f64>,
    pub min_stock: Option<i32>,
    pub sales_mode: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub is_on_shelf: bool,
    pub supplier_id: Option<String>,
    pub barcode: Option<String>,
    pub description: Option<String>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub cost_price: Option<f64>,
    pub category_id: Option<String>,
    pub image: Option<String>,
    pub min_stock: Option<i32>,
    pub unit: Option<String>,
    pub sales_mode: Option<Vec<String>>,
    pub is_on_shelf: Option<bool>,
    pub supplier_id: Option<String>,
    pub barcode: Option<String>,
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}
