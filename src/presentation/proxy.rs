// Proxy relay
//
// Fixed allow-list of internal paths, each forwarded to the reporting
// host and reshaped. Every outcome is served with status 200: a failed
// upstream degrades to the path's empty fallback body, so callers cannot
// tell a dead upstream from an empty report.

use crate::application::report_source::ReportSource;
use crate::domain::report::{remap_state_rows, UpstreamStateRow, WmsEnvelope};
use crate::presentation::app_state::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

async fn relay(
    source: &dyn ReportSource,
    url: &str,
    shape: fn(Value) -> Option<Value>,
    fallback: Value,
) -> Value {
    match source.get_json(url).await {
        Ok(body) => shape(body).unwrap_or(fallback),
        Err(err) => {
            tracing::warn!("proxy relay for {} failed: {}", url, err);
            fallback
        }
    }
}

/// `data[]` remapped to serial-numbered `{sr, state, active, inactive}`.
fn shape_state_franchise(body: Value) -> Option<Value> {
    let envelope: WmsEnvelope<UpstreamStateRow> = serde_json::from_value(body).ok()?;
    serde_json::to_value(remap_state_rows(envelope.data)).ok()
}

fn shape_first_data_element(body: Value) -> Option<Value> {
    body.get("data")?.as_array()?.first().cloned()
}

fn shape_data_field(body: Value) -> Option<Value> {
    body.get("data").cloned()
}

fn shape_full_body(body: Value) -> Option<Value> {
    Some(body)
}

pub async fn state_franchise(State(state): State<Arc<AppState>>) -> Json<Value> {
    let url = format!(
        "{}/api/v1/franchise/statewise_franchise",
        state.upstream.reports_base
    );
    Json(relay(state.source.as_ref(), &url, shape_state_franchise, json!([])).await)
}

pub async fn fr_registration_stats(State(state): State<Arc<AppState>>) -> Json<Value> {
    let url = format!(
        "{}/api/v1/franchise/getFrRegistrationStats",
        state.upstream.reports_base
    );
    Json(relay(state.source.as_ref(), &url, shape_first_data_element, json!({})).await)
}

pub async fn purchase_category_performance(State(state): State<Arc<AppState>>) -> Json<Value> {
    let url = format!(
        "{}/api/v1/franchise/purchaseCategorywiseFrPerformance",
        state.upstream.reports_base
    );
    Json(relay(state.source.as_ref(), &url, shape_data_field, json!([])).await)
}

pub async fn new_franchise_ytd_performance(State(state): State<Arc<AppState>>) -> Json<Value> {
    let url = format!(
        "{}/api/v1/franchise/getNewFrYTDPerformance",
        state.upstream.reports_base
    );
    Json(relay(state.source.as_ref(), &url, shape_full_body, json!({})).await)
}

pub async fn wh_stock_expiry_report(State(state): State<Arc<AppState>>) -> Json<Value> {
    let url = format!(
        "{}/api/v1/account_report/whStockExpiryReport",
        state.upstream.reports_base
    );
    Json(relay(state.source.as_ref(), &url, shape_data_field, json!([])).await)
}
