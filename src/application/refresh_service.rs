// Refresh orchestrator
//
// One detached task per widget: refresh immediately at startup, then on
// the widget's interval. Tasks never wait on each other and in-flight
// refreshes are never cancelled, so the last response to land owns the
// slot.

use crate::application::report_source::ReportSource;
use crate::application::widgets::refresh_widget;
use crate::domain::chart::{ChartRegistry, ChartUpdate};
use crate::domain::widget::{FailurePolicy, WidgetSnapshot};
use crate::infrastructure::config::{WidgetConfig, WidgetsConfig};
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared dashboard snapshot: one slot per widget plus the long-lived
/// chart registry. Every write replaces a slot wholesale.
pub struct DashboardState {
    widgets: RwLock<HashMap<String, WidgetSnapshot>>,
    charts: RwLock<ChartRegistry>,
}

impl DashboardState {
    pub fn new(charts: ChartRegistry) -> Self {
        Self {
            widgets: RwLock::new(HashMap::new()),
            charts: RwLock::new(charts),
        }
    }

    pub async fn set(&self, id: &str, snapshot: WidgetSnapshot) {
        self.widgets.write().await.insert(id.to_string(), snapshot);
    }

    pub async fn widget(&self, id: &str) -> Option<WidgetSnapshot> {
        self.widgets.read().await.get(id).cloned()
    }

    pub async fn apply_charts(&self, updates: Vec<ChartUpdate>) {
        let mut charts = self.charts.write().await;
        for update in updates {
            charts.apply(update);
        }
    }

    /// The full dashboard as served by `/api/dashboard`.
    pub async fn snapshot(&self) -> serde_json::Value {
        let widgets = self.widgets.read().await;
        let charts = self.charts.read().await;
        json!({
            "generated_at": Utc::now().to_rfc3339(),
            "widgets": &*widgets,
            "charts": &*charts,
        })
    }
}

pub struct RefreshService {
    state: Arc<DashboardState>,
    source: Arc<dyn ReportSource>,
    config: WidgetsConfig,
}

impl RefreshService {
    pub fn new(
        state: Arc<DashboardState>,
        source: Arc<dyn ReportSource>,
        config: WidgetsConfig,
    ) -> Self {
        Self {
            state,
            source,
            config,
        }
    }

    /// Fire-and-forget: one loop per configured widget.
    pub fn spawn_all(&self) {
        for cfg in self.config.widgets.clone() {
            let state = self.state.clone();
            let source = self.source.clone();
            let interval = cfg.interval(self.config.default_interval_secs);
            tokio::spawn(async move {
                loop {
                    run_refresh(&state, source.as_ref(), &cfg).await;
                    tokio::time::sleep(interval).await;
                }
            });
        }
        tracing::info!(
            "spawned {} widget refresh tasks (default interval {}s)",
            self.config.widgets.len(),
            self.config.default_interval_secs
        );
    }
}

/// One refresh pass for one widget. Failures stop here: they are logged
/// and folded into the slot according to the widget's policy.
pub async fn run_refresh(state: &DashboardState, source: &dyn ReportSource, cfg: &WidgetConfig) {
    if cfg.loading_placeholder {
        state.set(&cfg.id, WidgetSnapshot::Loading).await;
    }

    match refresh_widget(cfg, source).await {
        Ok(output) => {
            state.apply_charts(output.charts).await;
            state
                .set(
                    &cfg.id,
                    WidgetSnapshot::Ready {
                        view: output.view,
                        updated_at: Utc::now().to_rfc3339(),
                    },
                )
                .await;
        }
        Err(err) => {
            tracing::warn!(widget = %cfg.id, "refresh failed: {}", err);
            match cfg.on_error {
                FailurePolicy::ShowError => {
                    state
                        .set(
                            &cfg.id,
                            WidgetSnapshot::Error {
                                message: err.to_string(),
                            },
                        )
                        .await;
                }
                FailurePolicy::ShowEmpty => {
                    state.set(&cfg.id, WidgetSnapshot::Empty).await;
                }
                // Whatever rendered last stays up until the next tick.
                FailurePolicy::KeepStale => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::report_source::testing::StaticSource;
    use crate::domain::widget::WidgetKind;
    use serde_json::json;

    fn team_punch_cfg(policy: FailurePolicy, loading: bool) -> WidgetConfig {
        WidgetConfig {
            id: "team-punch".to_string(),
            kind: WidgetKind::TeamPunch,
            endpoint: "sample:team-punch".to_string(),
            online_sales_endpoint: None,
            interval_secs: None,
            on_error: policy,
            loading_placeholder: loading,
        }
    }

    fn punch_payload() -> serde_json::Value {
        json!({"inProcess": 53, "started": 27, "transferToFTD": 18})
    }

    #[tokio::test]
    async fn test_success_replaces_slot() {
        let state = DashboardState::new(ChartRegistry::with_defaults());
        let source = StaticSource::new().with("sample:team-punch", punch_payload());
        let cfg = team_punch_cfg(FailurePolicy::ShowError, false);

        run_refresh(&state, &source, &cfg).await;

        match state.widget("team-punch").await.unwrap() {
            WidgetSnapshot::Ready { view, .. } => {
                assert_eq!(view.tiles[0].text, "53");
            }
            other => panic!("expected ready snapshot, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_show_error_policy() {
        let state = DashboardState::new(ChartRegistry::with_defaults());
        let source = StaticSource::new();
        let cfg = team_punch_cfg(FailurePolicy::ShowError, false);

        run_refresh(&state, &source, &cfg).await;

        assert!(matches!(
            state.widget("team-punch").await.unwrap(),
            WidgetSnapshot::Error { .. }
        ));
    }

    #[tokio::test]
    async fn test_keep_stale_policy_leaves_previous_data() {
        let state = DashboardState::new(ChartRegistry::with_defaults());
        let cfg = team_punch_cfg(FailurePolicy::KeepStale, false);

        let good = StaticSource::new().with("sample:team-punch", punch_payload());
        run_refresh(&state, &good, &cfg).await;

        let dead = StaticSource::new();
        run_refresh(&state, &dead, &cfg).await;

        match state.widget("team-punch").await.unwrap() {
            WidgetSnapshot::Ready { view, .. } => assert_eq!(view.tiles[0].text, "53"),
            other => panic!("stale data should survive, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_show_empty_policy() {
        let state = DashboardState::new(ChartRegistry::with_defaults());
        let source = StaticSource::new();
        let cfg = team_punch_cfg(FailurePolicy::ShowEmpty, false);

        run_refresh(&state, &source, &cfg).await;

        assert!(matches!(
            state.widget("team-punch").await.unwrap(),
            WidgetSnapshot::Empty
        ));
    }

    #[tokio::test]
    async fn test_loading_placeholder_is_written_before_fetch() {
        // With a dead source and the keep-stale policy the loading
        // placeholder is the last write, so it must be observable.
        let state = DashboardState::new(ChartRegistry::with_defaults());
        let source = StaticSource::new();
        let cfg = team_punch_cfg(FailurePolicy::KeepStale, true);

        run_refresh(&state, &source, &cfg).await;

        assert!(matches!(
            state.widget("team-punch").await.unwrap(),
            WidgetSnapshot::Loading
        ));
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let state = DashboardState::new(ChartRegistry::with_defaults());
        let cfg = team_punch_cfg(FailurePolicy::ShowError, false);

        let first = StaticSource::new().with("sample:team-punch", punch_payload());
        let second = StaticSource::new().with(
            "sample:team-punch",
            json!({"inProcess": 99, "started": 1, "transferToFTD": 0}),
        );

        run_refresh(&state, &first, &cfg).await;
        run_refresh(&state, &second, &cfg).await;

        match state.widget("team-punch").await.unwrap() {
            WidgetSnapshot::Ready { view, .. } => assert_eq!(view.tiles[0].text, "99"),
            other => panic!("expected ready snapshot, got {:?}", other),
        }
    }
}
