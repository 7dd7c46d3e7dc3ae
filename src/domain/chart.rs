// Chart view models
//
// Chart identity and configuration (kind, colors, dataset labels) are
// created once at startup. Refreshes only swap labels and data arrays, so
// the display shell can feed updates into its long-lived chart objects.

use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Doughnut,
    Pie,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub label: Option<String>,
    pub colors: Vec<String>,
    pub data: Vec<f64>,
}

impl Dataset {
    fn new(label: Option<&str>, colors: &[&str]) -> Self {
        Self {
            label: label.map(str::to_string),
            colors: colors.iter().map(|c| c.to_string()).collect(),
            data: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub id: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// One refresh worth of new chart content. `labels: None` keeps the
/// chart's fixed labels (used by charts with static category axes).
#[derive(Debug, Clone)]
pub struct ChartUpdate {
    pub chart: String,
    pub labels: Option<Vec<String>>,
    pub data: Vec<Vec<f64>>,
}

const SEGMENT_COLORS: [&str; 6] = [
    "rgba(22, 163, 74, 0.8)",
    "rgba(14, 165, 233, 0.8)",
    "rgba(249, 115, 22, 0.8)",
    "rgba(139, 92, 246, 0.8)",
    "rgba(236, 72, 153, 0.8)",
    "rgba(156, 163, 175, 0.8)",
];

#[derive(Debug, Clone, Serialize)]
pub struct ChartRegistry {
    charts: HashMap<String, ChartSeries>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self {
            charts: HashMap::new(),
        }
    }

    /// The four charts of the stock slide deck.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ChartSeries {
            id: "catChart".to_string(),
            kind: ChartKind::Bar,
            labels: Vec::new(),
            datasets: vec![
                Dataset::new(Some("Current YTD"), &["rgba(14, 165, 233, 0.85)"]),
                Dataset::new(Some("Previous YTD"), &["rgba(22, 163, 74, 0.85)"]),
            ],
        });
        registry.register(ChartSeries {
            id: "stateChart".to_string(),
            kind: ChartKind::Doughnut,
            labels: Vec::new(),
            datasets: vec![Dataset::new(None, &SEGMENT_COLORS)],
        });
        registry.register(ChartSeries {
            id: "frRegChart".to_string(),
            kind: ChartKind::Bar,
            labels: vec!["YTD".to_string(), "Last Year YTD".to_string()],
            datasets: vec![Dataset::new(
                Some("Registrations"),
                &["rgba(14, 165, 233, 0.7)", "rgba(22, 163, 74, 0.7)"],
            )],
        });
        registry.register(ChartSeries {
            id: "medicineCatChart".to_string(),
            kind: ChartKind::Pie,
            labels: Vec::new(),
            datasets: vec![Dataset::new(None, &SEGMENT_COLORS)],
        });
        registry
    }

    pub fn register(&mut self, chart: ChartSeries) {
        self.charts.insert(chart.id.clone(), chart);
    }

    pub fn get(&self, id: &str) -> Option<&ChartSeries> {
        self.charts.get(id)
    }

    /// Mutate a chart in place. Unknown chart ids and surplus data arrays
    /// are ignored; configuration is never touched.
    pub fn apply(&mut self, update: ChartUpdate) {
        let Some(chart) = self.charts.get_mut(&update.chart) else {
            tracing::warn!("chart update for unknown chart {}", update.chart);
            return;
        };
        if let Some(labels) = update.labels {
            chart.labels = labels;
        }
        for (dataset, data) in chart.datasets.iter_mut().zip(update.data) {
            dataset.data = data;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_replaces_labels_and_data_only() {
        let mut registry = ChartRegistry::with_defaults();
        registry.apply(ChartUpdate {
            chart: "catChart".to_string(),
            labels: Some(vec!["A+".to_string(), "A".to_string()]),
            data: vec![vec![850.0, 650.0], vec![800.0, 600.0]],
        });

        let chart = registry.get("catChart").unwrap();
        assert_eq!(chart.labels, vec!["A+", "A"]);
        assert_eq!(chart.datasets[0].data, vec![850.0, 650.0]);
        assert_eq!(chart.datasets[1].data, vec![800.0, 600.0]);
        // Configuration survives the update.
        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.datasets[0].label.as_deref(), Some("Current YTD"));
        assert_eq!(chart.datasets[0].colors, vec!["rgba(14, 165, 233, 0.85)"]);
    }

    #[test]
    fn test_apply_keeps_fixed_labels_when_none() {
        let mut registry = ChartRegistry::with_defaults();
        registry.apply(ChartUpdate {
            chart: "frRegChart".to_string(),
            labels: None,
            data: vec![vec![412.0, 392.0]],
        });

        let chart = registry.get("frRegChart").unwrap();
        assert_eq!(chart.labels, vec!["YTD", "Last Year YTD"]);
        assert_eq!(chart.datasets[0].data, vec![412.0, 392.0]);
    }

    #[test]
    fn test_apply_unknown_chart_is_a_no_op() {
        let mut registry = ChartRegistry::with_defaults();
        registry.apply(ChartUpdate {
            chart: "nope".to_string(),
            labels: None,
            data: vec![vec![1.0]],
        });
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_surplus_data_arrays_are_ignored() {
        let mut registry = ChartRegistry::with_defaults();
        registry.apply(ChartUpdate {
            chart: "stateChart".to_string(),
            labels: Some(vec!["MH".to_string()]),
            data: vec![vec![3.0], vec![9.0, 9.0]],
        });
        let chart = registry.get("stateChart").unwrap();
        assert_eq!(chart.datasets.len(), 1);
        assert_eq!(chart.datasets[0].data, vec![3.0]);
    }
}
