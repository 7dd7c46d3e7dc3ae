// Widget view models
//
// A widget owns a set of display targets (KPI tiles, table bodies, the
// ticker). Every refresh replaces the widget's snapshot wholesale; there is
// no merging with earlier state.

use serde::{Deserialize, Serialize};

/// The fifteen refresh routines of the deck. Configuration binds one kind
/// to an endpoint, an interval and a failure policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    CategoryPerformance,
    StateFranchise,
    FrRegistration,
    NewFranchiseYtd,
    TeamPunch,
    Highlights,
    SourceRevenue,
    WarehouseExpiry,
    StockDispatch,
    MedicineCategory,
    DailySales,
    YoySales,
    PurchasePo,
    OdcStats,
    ManufacturerBilling,
}

/// What a widget shows when its refresh fails. Declared per widget in
/// configuration instead of being implicit at each call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Replace the widget with an error placeholder.
    #[default]
    ShowError,
    /// Leave whatever was rendered last in place.
    KeepStale,
    /// Replace the widget with an empty state.
    ShowEmpty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub target: String,
    pub text: String,
}

pub fn tile(target: &str, text: impl Into<String>) -> Tile {
    Tile {
        target: target.to_string(),
        text: text.into(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub target: String,
    /// Rendered header row, only for tables with payload-derived columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
    /// Rendered `<tr>` rows.
    pub body: String,
}

pub fn table(target: &str, body: impl Into<String>) -> TableView {
    TableView {
        target: target.to_string(),
        head: None,
        body: body.into(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WidgetView {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tiles: Vec<Tile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<TableView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
}

/// One widget's slot in the dashboard snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WidgetSnapshot {
    Loading,
    Error { message: String },
    Empty,
    Ready { view: WidgetView, updated_at: String },
}
