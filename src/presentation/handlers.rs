// HTTP request handlers
use crate::domain::slideshow::SlideShow;
use crate::infrastructure::sample_data;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn category_performance_sample() -> Json<Value> {
    Json(sample_data::category_performance())
}

pub async fn team_punch_sample() -> Json<Value> {
    Json(sample_data::team_punch())
}

pub async fn highlights_sample() -> Json<Value> {
    Json(sample_data::highlights())
}

/// The whole dashboard snapshot: widget slots plus chart series.
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(state.dashboard.snapshot().await)
}

fn slideshow_view(deck: &SlideShow) -> Value {
    json!({
        "current": deck.current(),
        "count": deck.count(),
        "auto_rotate": deck.auto_rotate(),
        "progress": deck.progress(),
    })
}

pub async fn slideshow_state(State(state): State<Arc<AppState>>) -> Json<Value> {
    let deck = state.slides.lock().await;
    Json(slideshow_view(&deck))
}

pub async fn slideshow_next(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut deck = state.slides.lock().await;
    deck.next();
    Json(slideshow_view(&deck))
}

pub async fn slideshow_prev(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut deck = state.slides.lock().await;
    deck.prev();
    Json(slideshow_view(&deck))
}

pub async fn slideshow_goto(
    Path(index): Path<usize>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let mut deck = state.slides.lock().await;
    match deck.goto(index) {
        Ok(()) => Json(slideshow_view(&deck)).into_response(),
        Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}

pub async fn slideshow_resume(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut deck = state.slides.lock().await;
    deck.resume();
    Json(slideshow_view(&deck))
}

pub async fn slideshow_toggle(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut deck = state.slides.lock().await;
    let on = !deck.auto_rotate();
    deck.set_auto_rotate(on);
    Json(slideshow_view(&deck))
}
