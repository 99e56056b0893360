//! AI Proxy API Handlers

use axum::{Json, extract::State};
use shared::client::{
    AiStatus, DescriptionResponse, InsightRequest, InsightResponse, ProductDescriptionRequest,
};

use crate::core::ServerState;
use crate::utils::AppResult;

const GEMINI_MODEL: &str = "gemini-2.5-flash";

const FALLBACK_INSIGHT: &str = "AI analysis is not configured. Based on the raw numbers: review \
your top-selling products and keep an eye on items approaching their minimum stock level.";

/// 调用 Gemini，任何一步失败都返回 None 由调用方兜底
async fn generate(state: &ServerState, prompt: &str) -> Option<String> {
    let key = state.config.gemini_api_key.as_deref()?;
    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/{GEMINI_MODEL}:generateContent"
    );
    let body = serde_json::json!({
        "contents": [{ "parts": [{ "text": prompt }] }]
    });

    let resp = state
        .http
        .post(&url)
        .header("x-goog-api-key", key)
        .json(&body)
        .send()
        .await
        .map_err(|e| tracing::warn!(target: "ai", error = %e, "Gemini request failed"))
        .ok()?;

    if !resp.status().is_success() {
        tracing::warn!(target: "ai", status = %resp.status(), "Gemini returned an error");
        return None;
    }

    let value: serde_json::Value = resp.json().await.ok()?;
    value["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(|s| s.trim().to_string())
}

/// POST /api/ai/insight - 经营洞察
pub async fn insight(
    State(state): State<ServerState>,
    Json(payload): Json<InsightRequest>,
) -> AppResult<Json<InsightResponse>> {
    let prompt = format!(
        "You are a restaurant business analyst. Given this sales data as JSON:\n{}\n\nAnd these recent orders:\n{}\n\nWrite a short, actionable insight (3-4 sentences) for the restaurant manager.",
        payload.sales_data,
        serde_json::Value::Array(payload.recent_orders)
    );

    let insight = generate(&state, &prompt)
        .await
        .unwrap_or_else(|| FALLBACK_INSIGHT.to_string());
    Ok(Json(InsightResponse { insight }))
}

/// POST /api/ai/product-description - 商品文案生成
pub async fn product_description(
    State(state): State<ServerState>,
    Json(payload): Json<ProductDescriptionRequest>,
) -> AppResult<Json<DescriptionResponse>> {
    let prompt = format!(
        "Write an appetizing one-sentence menu description for a dish called \"{}\". Reply with the sentence only.",
        payload.product_name
    );

    let description = generate(&state, &prompt).await.unwrap_or_else(|| {
        format!("Freshly prepared {} made with quality ingredients.", payload.product_name)
    });
    Ok(Json(DescriptionResponse { description }))
}

/// GET /api/ai/status - AI 可用性
pub async fn status(State(state): State<ServerState>) -> AppResult<Json<AiStatus>> {
    let available = state.config.gemini_api_key.is_some();
    Ok(Json(AiStatus {
        available,
        provider: available.then(|| "gemini".to_string()),
    }))
}
