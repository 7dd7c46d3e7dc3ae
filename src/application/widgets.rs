// Widget refresh routines
//
// One routine per widget: fetch the configured endpoint, validate the
// payload, reduce it to KPI tiles / table markup / chart data. Routines
// never retry and never propagate errors past the orchestrator; the
// per-widget failure policy decides what the slot shows instead.

use crate::application::report_source::{FetchError, ReportSource};
use crate::domain::chart::ChartUpdate;
use crate::domain::format::{
    camel_label, format_currency, format_number, format_percent_signed, snake_label,
};
use crate::domain::kpi::{growth_percent, top_entry};
use crate::domain::render::{header_cell, message_row, num_cell, row, text_cell, toned_num_cell, Tone};
use crate::domain::report::{
    remap_state_rows, value_as_f64, CategoryRow, DailySales, ManufacturerRow, MedicineCategoryRow,
    NewFranchiseYtd, PosEnvelope, PurchasePoRow, RegistrationStats, RevenueRow, StatusEnvelope,
    StockDispatch, TeamPunch, UpstreamStateRow, WarehouseRow, WmsEnvelope, YoySales,
};
use crate::domain::widget::{table, tile, TableView, WidgetKind, WidgetView};
use crate::infrastructure::config::WidgetConfig;
use chrono::{Datelike, Local, NaiveDate};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// What one successful refresh produces: the replacement view plus any
/// chart mutations.
#[derive(Debug)]
pub struct WidgetOutput {
    pub view: WidgetView,
    pub charts: Vec<ChartUpdate>,
}

impl WidgetOutput {
    fn new(view: WidgetView) -> Self {
        Self {
            view,
            charts: Vec::new(),
        }
    }

    fn with_charts(view: WidgetView, charts: Vec<ChartUpdate>) -> Self {
        Self { view, charts }
    }
}

pub async fn refresh_widget(
    cfg: &WidgetConfig,
    source: &dyn ReportSource,
) -> Result<WidgetOutput, FetchError> {
    match cfg.kind {
        WidgetKind::CategoryPerformance => category_performance(cfg, source).await,
        WidgetKind::StateFranchise => state_franchise(cfg, source).await,
        WidgetKind::FrRegistration => fr_registration(cfg, source).await,
        WidgetKind::NewFranchiseYtd => new_franchise_ytd(cfg, source).await,
        WidgetKind::TeamPunch => team_punch(cfg, source).await,
        WidgetKind::Highlights => highlights(cfg, source).await,
        WidgetKind::SourceRevenue => source_revenue(cfg, source).await,
        WidgetKind::WarehouseExpiry => warehouse_expiry(cfg, source).await,
        WidgetKind::StockDispatch => stock_dispatch(cfg, source).await,
        WidgetKind::MedicineCategory => medicine_category(cfg, source).await,
        WidgetKind::DailySales => daily_sales(cfg, source).await,
        WidgetKind::YoySales => yoy_sales(cfg, source).await,
        WidgetKind::PurchasePo => purchase_po(cfg, source).await,
        WidgetKind::OdcStats => odc_stats(cfg, source).await,
        WidgetKind::ManufacturerBilling => manufacturer_billing(cfg, source).await,
    }
}

fn decode<T: DeserializeOwned>(url: &str, value: Value) -> Result<T, FetchError> {
    serde_json::from_value(value).map_err(|e| FetchError::shape(url, e.to_string()))
}

/// KPI total/growth/top-category, the category table and the grouped bar
/// chart, all from one category-wise purchase report.
async fn category_performance(
    cfg: &WidgetConfig,
    source: &dyn ReportSource,
) -> Result<WidgetOutput, FetchError> {
    let envelope: WmsEnvelope<CategoryRow> =
        decode(&cfg.endpoint, source.get_json(&cfg.endpoint).await?)?;
    if !envelope.success || envelope.data.is_empty() {
        return Err(FetchError::shape(
            &cfg.endpoint,
            "missing success marker or empty data",
        ));
    }
    let records = envelope.data;

    let current: Vec<f64> = records.iter().map(|r| r.ytd_current_year).collect();
    let last: Vec<f64> = records.iter().map(|r| r.ytd_last_year).collect();
    let total_current: f64 = current.iter().sum();
    let total_last: f64 = last.iter().sum();
    let growth = growth_percent(total_current, total_last);
    let top_category = top_entry(&current)
        .map(|i| records[i].category_name.clone())
        .unwrap_or_default();

    let labels: Vec<String> = records.iter().map(|r| r.category_name.clone()).collect();
    let body: String = records.iter().map(CategoryRow::table_row).collect();

    Ok(WidgetOutput::with_charts(
        WidgetView {
            tiles: vec![
                tile("kpi-total", format_currency(total_current)),
                tile("kpi-growth", format_percent_signed(growth, 1)),
                tile("kpi-topcat", top_category),
            ],
            tables: vec![table("tbl-category", body)],
            ticker: None,
        },
        vec![ChartUpdate {
            chart: "catChart".to_string(),
            labels: Some(labels),
            data: vec![current, last],
        }],
    ))
}

/// State-wise franchise counts: numbered table, grand-total KPI, doughnut
/// of per-state totals. Applies the same remap the proxy relay serves.
async fn state_franchise(
    cfg: &WidgetConfig,
    source: &dyn ReportSource,
) -> Result<WidgetOutput, FetchError> {
    let envelope: WmsEnvelope<UpstreamStateRow> =
        decode(&cfg.endpoint, source.get_json(&cfg.endpoint).await?)?;
    let records = remap_state_rows(envelope.data);

    let grand_total: i64 = records.iter().map(|r| r.total()).sum();
    let body: String = records.iter().map(|r| r.table_row()).collect();
    let labels: Vec<String> = records.iter().map(|r| r.state.clone()).collect();
    let totals: Vec<f64> = records.iter().map(|r| r.total() as f64).collect();

    Ok(WidgetOutput::with_charts(
        WidgetView {
            tiles: vec![tile(
                "stateKpi",
                format!("{} Total", format_number(grand_total as f64)),
            )],
            tables: vec![table("tbl-states", body)],
            ticker: None,
        },
        vec![ChartUpdate {
            chart: "stateChart".to_string(),
            labels: Some(labels),
            data: vec![totals],
        }],
    ))
}

async fn fr_registration(
    cfg: &WidgetConfig,
    source: &dyn ReportSource,
) -> Result<WidgetOutput, FetchError> {
    let envelope: WmsEnvelope<RegistrationStats> =
        decode(&cfg.endpoint, source.get_json(&cfg.endpoint).await?)?;
    let stats = envelope
        .data
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::shape(&cfg.endpoint, "empty data"))?;

    let growth = stats.growth_percentage;
    let body = [
        row(&[text_cell("MTD"), num_cell(&format_number(stats.mtd))]),
        row(&[text_cell("YTD"), num_cell(&format_number(stats.ytd))]),
        row(&[
            text_cell("Last Year YTD"),
            num_cell(&format_number(stats.last_year_ytd)),
        ]),
        row(&[
            text_cell("Growth"),
            toned_num_cell(&format_percent_signed(growth, 1), Tone::for_growth(growth)),
        ]),
    ]
    .concat();

    Ok(WidgetOutput::with_charts(
        WidgetView {
            tiles: Vec::new(),
            tables: vec![table("tbl-newfr", body)],
            ticker: None,
        },
        vec![ChartUpdate {
            chart: "frRegChart".to_string(),
            labels: None,
            data: vec![vec![stats.ytd, stats.last_year_ytd]],
        }],
    ))
}

async fn new_franchise_ytd(
    cfg: &WidgetConfig,
    source: &dyn ReportSource,
) -> Result<WidgetOutput, FetchError> {
    let envelope: WmsEnvelope<NewFranchiseYtd> =
        decode(&cfg.endpoint, source.get_json(&cfg.endpoint).await?)?;
    let perf = envelope
        .data
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::shape(&cfg.endpoint, "empty data"))?;

    let body = [
        row(&[
            text_cell("Total Registered YTD"),
            num_cell(&format_number(perf.total_registered_ytd)),
        ]),
        row(&[
            text_cell("Started YTD"),
            num_cell(&format_number(perf.started_ytd)),
        ]),
        row(&[
            text_cell("Excluding W.S Purchase MTD"),
            num_cell(&format_currency(perf.excl_ws_purchase_mtd)),
        ]),
        row(&[
            text_cell("Excluding W.S Purchase YTD"),
            num_cell(&format_currency(perf.excl_ws_purchase_ytd)),
        ]),
    ]
    .concat();

    Ok(WidgetOutput::new(WidgetView {
        tiles: vec![
            tile("mtdWS", format_currency(perf.excl_ws_purchase_mtd)),
            tile("ytdWS", format_currency(perf.excl_ws_purchase_ytd)),
        ],
        tables: vec![table("tbl-new-ytd", body)],
        ticker: None,
    }))
}

async fn team_punch(
    cfg: &WidgetConfig,
    source: &dyn ReportSource,
) -> Result<WidgetOutput, FetchError> {
    let punch: TeamPunch = decode(&cfg.endpoint, source.get_json(&cfg.endpoint).await?)?;

    let body: String = punch
        .entries()
        .iter()
        .map(|(key, value)| row(&[text_cell(&camel_label(key)), num_cell(&format_number(*value))]))
        .collect();

    Ok(WidgetOutput::new(WidgetView {
        tiles: vec![
            tile("tp-inproc", format_number(punch.in_process)),
            tile("tp-started", format_number(punch.started)),
            tile("tp-ftd", format_number(punch.transfer_to_ftd)),
        ],
        tables: vec![table("tbl-team", body)],
        ticker: None,
    }))
}

async fn highlights(
    cfg: &WidgetConfig,
    source: &dyn ReportSource,
) -> Result<WidgetOutput, FetchError> {
    let items: Vec<String> = decode(&cfg.endpoint, source.get_json(&cfg.endpoint).await?)?;

    Ok(WidgetOutput::new(WidgetView {
        tiles: Vec::new(),
        tables: Vec::new(),
        ticker: Some(items.join(" • ")),
    }))
}

/// Source-wise revenue merged with an online-sales aggregate built from
/// three date-windowed requests (current fiscal YTD, last fiscal YTD,
/// MTD). A failed online-sales leg contributes zero, not an error.
async fn source_revenue(
    cfg: &WidgetConfig,
    source: &dyn ReportSource,
) -> Result<WidgetOutput, FetchError> {
    let envelope: WmsEnvelope<Value> =
        decode(&cfg.endpoint, source.get_json(&cfg.endpoint).await?)?;
    let mut records: Vec<RevenueRow> = match envelope.data.into_iter().nth(1) {
        Some(group) => decode(&cfg.endpoint, group)?,
        None => Vec::new(),
    };

    if let Some(endpoint) = &cfg.online_sales_endpoint {
        let windows = fiscal_windows(Local::now().date_naive());
        records.push(RevenueRow {
            sale_source: "Online Sales".to_string(),
            mtd_total_amount: online_sales_total(source, endpoint, &windows.mtd).await,
            ytd_total_amount: online_sales_total(source, endpoint, &windows.ytd).await,
            last_ytd_total_amount: online_sales_total(source, endpoint, &windows.last_ytd).await,
        });
    }

    let body = if records.is_empty() {
        message_row(5, "No data available.")
    } else {
        records.iter().map(RevenueRow::table_row).collect()
    };

    Ok(WidgetOutput::new(WidgetView {
        tiles: Vec::new(),
        tables: vec![table("tbl-source-revenue", body)],
        ticker: None,
    }))
}

async fn warehouse_expiry(
    cfg: &WidgetConfig,
    source: &dyn ReportSource,
) -> Result<WidgetOutput, FetchError> {
    let envelope: WmsEnvelope<Value> =
        decode(&cfg.endpoint, source.get_json(&cfg.endpoint).await?)?;
    let records: Vec<WarehouseRow> = match envelope.data.into_iter().nth(1) {
        Some(group) => decode(&cfg.endpoint, group)?,
        None => Vec::new(),
    };

    let body = if records.is_empty() {
        message_row(9, "No data available.")
    } else {
        records.iter().map(WarehouseRow::table_row).collect()
    };

    Ok(WidgetOutput::new(WidgetView {
        tiles: Vec::new(),
        tables: vec![table("tbl-warehouse", body)],
        ticker: None,
    }))
}

async fn stock_dispatch(
    cfg: &WidgetConfig,
    source: &dyn ReportSource,
) -> Result<WidgetOutput, FetchError> {
    let envelope: WmsEnvelope<StockDispatch> =
        decode(&cfg.endpoint, source.get_json(&cfg.endpoint).await?)?;
    if !envelope.success {
        return Err(FetchError::shape(&cfg.endpoint, "missing success marker"));
    }
    let report = envelope
        .data
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::shape(&cfg.endpoint, "empty data"))?;

    Ok(WidgetOutput::new(WidgetView {
        tiles: vec![
            tile("dispatch-count", format_number(report.dispatch_count)),
            tile("stock-amount", format_currency(report.stock_amount)),
        ],
        tables: Vec::new(),
        ticker: None,
    }))
}

async fn medicine_category(
    cfg: &WidgetConfig,
    source: &dyn ReportSource,
) -> Result<WidgetOutput, FetchError> {
    let envelope: WmsEnvelope<MedicineCategoryRow> =
        decode(&cfg.endpoint, source.get_json(&cfg.endpoint).await?)?;
    if !envelope.success {
        return Err(FetchError::shape(&cfg.endpoint, "missing success marker"));
    }
    let records = envelope.data;

    // Two side-by-side tables; the first half takes the extra row.
    let half = records.len().div_ceil(2);
    let (first, second) = records.split_at(half);
    let first_body: String = first.iter().map(MedicineCategoryRow::table_row).collect();
    let second_body: String = second.iter().map(MedicineCategoryRow::table_row).collect();

    let labels: Vec<String> = records.iter().map(|r| r.category_name.clone()).collect();
    let amounts: Vec<f64> = records.iter().map(|r| r.amount).collect();

    Ok(WidgetOutput::with_charts(
        WidgetView {
            tiles: Vec::new(),
            tables: vec![
                table("tbl-medicine-category-1", first_body),
                table("tbl-medicine-category-2", second_body),
            ],
            ticker: None,
        },
        vec![ChartUpdate {
            chart: "medicineCatChart".to_string(),
            labels: Some(labels),
            data: vec![amounts],
        }],
    ))
}

async fn daily_sales(
    cfg: &WidgetConfig,
    source: &dyn ReportSource,
) -> Result<WidgetOutput, FetchError> {
    let envelope: WmsEnvelope<DailySales> =
        decode(&cfg.endpoint, source.get_json(&cfg.endpoint).await?)?;
    if !envelope.success {
        return Err(FetchError::shape(&cfg.endpoint, "missing success marker"));
    }
    let report = envelope
        .data
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::shape(&cfg.endpoint, "empty data"))?;

    Ok(WidgetOutput::new(WidgetView {
        tiles: vec![
            tile("ftd-amount", format_currency(report.ftd_amount)),
            tile("mtd-amount", format_currency(report.mtd_amount)),
            tile("ytd-amount", format_currency(report.ytd_amount)),
        ],
        tables: Vec::new(),
        ticker: None,
    }))
}

async fn yoy_sales(
    cfg: &WidgetConfig,
    source: &dyn ReportSource,
) -> Result<WidgetOutput, FetchError> {
    let envelope: WmsEnvelope<YoySales> =
        decode(&cfg.endpoint, source.get_json(&cfg.endpoint).await?)?;
    if !envelope.success {
        return Err(FetchError::shape(&cfg.endpoint, "missing success marker"));
    }
    let report = envelope
        .data
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::shape(&cfg.endpoint, "empty data"))?;

    Ok(WidgetOutput::new(WidgetView {
        tiles: vec![
            tile("this-year-mtd", format_currency(report.this_year_mtd)),
            tile("last-year-mtd", format_currency(report.last_year_mtd)),
            tile("this-year-ytd", format_currency(report.this_year_ytd)),
            tile("last-year-ytd", format_currency(report.last_year_ytd)),
        ],
        tables: Vec::new(),
        ticker: None,
    }))
}

async fn purchase_po(
    cfg: &WidgetConfig,
    source: &dyn ReportSource,
) -> Result<WidgetOutput, FetchError> {
    let envelope: WmsEnvelope<PurchasePoRow> =
        decode(&cfg.endpoint, source.get_json(&cfg.endpoint).await?)?;
    if !envelope.success {
        return Err(FetchError::shape(&cfg.endpoint, "missing success marker"));
    }
    let records = envelope.data;

    let total_pos: f64 = records.iter().map(|r| r.po_generated_count).sum();
    let total_amount: f64 = records.iter().map(|r| r.po_amount).sum();
    let body: String = records.iter().map(PurchasePoRow::table_row).collect();

    Ok(WidgetOutput::new(WidgetView {
        tiles: vec![
            tile("po-total-companies", format_number(records.len() as f64)),
            tile("po-total-pos", format_number(total_pos)),
            tile("po-total-amount", format_currency(total_amount)),
        ],
        tables: vec![table("tbl-po-report", body)],
        ticker: None,
    }))
}

/// The ODC report has no fixed schema; columns come from the first row's
/// keys in payload order.
async fn odc_stats(
    cfg: &WidgetConfig,
    source: &dyn ReportSource,
) -> Result<WidgetOutput, FetchError> {
    let envelope: PosEnvelope<serde_json::Map<String, Value>> =
        decode(&cfg.endpoint, source.get_json(&cfg.endpoint).await?)?;
    if envelope.status != 1 || envelope.result.is_empty() {
        return Err(FetchError::shape(
            &cfg.endpoint,
            "missing status marker or empty result",
        ));
    }
    let records = envelope.result;

    let headers: Vec<String> = records[0].keys().cloned().collect();
    let head = row(&headers
        .iter()
        .map(|h| header_cell(&snake_label(h)))
        .collect::<Vec<_>>());
    let body: String = records
        .iter()
        .map(|record| {
            let cells: Vec<String> = headers
                .iter()
                .map(|h| num_cell(&cell_text(record.get(h))))
                .collect();
            row(&cells)
        })
        .collect();

    Ok(WidgetOutput::new(WidgetView {
        tiles: Vec::new(),
        tables: vec![TableView {
            target: "tbl-odc-stats".to_string(),
            head: Some(head),
            body,
        }],
        ticker: None,
    }))
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => format_number(n.as_f64().unwrap_or(0.0)),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

async fn manufacturer_billing(
    cfg: &WidgetConfig,
    source: &dyn ReportSource,
) -> Result<WidgetOutput, FetchError> {
    let envelope: WmsEnvelope<ManufacturerRow> =
        decode(&cfg.endpoint, source.get_json(&cfg.endpoint).await?)?;
    if !envelope.success {
        return Err(FetchError::shape(&cfg.endpoint, "missing success marker"));
    }
    let records = envelope.data;

    let body = if records.is_empty() {
        message_row(3, "No data available.")
    } else {
        records.iter().map(ManufacturerRow::table_row).collect()
    };

    Ok(WidgetOutput::new(WidgetView {
        tiles: Vec::new(),
        tables: vec![table("tbl-manufacturer-billing", body)],
        ticker: None,
    }))
}

// --- Online sales date windows ---

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct DateWindow {
    pub from: String,
    pub to: String,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct FiscalWindows {
    pub ytd: DateWindow,
    pub last_ytd: DateWindow,
    pub mtd: DateWindow,
}

/// The fiscal year starts April 1st. "Last YTD" runs from last year's
/// fiscal start to the same calendar date one year back.
pub(crate) fn fiscal_windows(today: NaiveDate) -> FiscalWindows {
    let fiscal_year = if today.month() < 4 {
        today.year() - 1
    } else {
        today.year()
    };
    let iso = |d: NaiveDate| d.format("%Y-%m-%d").to_string();

    let fiscal_start = NaiveDate::from_ymd_opt(fiscal_year, 4, 1).unwrap();
    let last_fiscal_start = NaiveDate::from_ymd_opt(fiscal_year - 1, 4, 1).unwrap();
    // Feb 29 rolls over to Mar 1 in the previous year.
    let last_year_today = today
        .with_year(today.year() - 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(today.year() - 1, 3, 1).unwrap());
    let month_start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap();

    FiscalWindows {
        ytd: DateWindow {
            from: iso(fiscal_start),
            to: iso(today),
        },
        last_ytd: DateWindow {
            from: iso(last_fiscal_start),
            to: iso(last_year_today),
        },
        mtd: DateWindow {
            from: iso(month_start),
            to: iso(today),
        },
    }
}

async fn online_sales_total(
    source: &dyn ReportSource,
    endpoint: &str,
    window: &DateWindow,
) -> f64 {
    let url = format!(
        "{}?fromDate={}&toDate={}",
        endpoint,
        urlencoding::encode(&window.from),
        urlencoding::encode(&window.to)
    );
    let value = match source.get_json(&url).await {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("online sales window {}..{}: {}", window.from, window.to, err);
            return 0.0;
        }
    };
    match serde_json::from_value::<StatusEnvelope<Value>>(value) {
        Ok(envelope) if envelope.status == 1 => envelope
            .data
            .iter()
            .map(|item| item.get("total_paid_amount").map(value_as_f64).unwrap_or(0.0))
            .sum(),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::report_source::testing::StaticSource;
    use crate::domain::widget::FailurePolicy;
    use serde_json::json;

    fn widget(kind: WidgetKind, endpoint: &str) -> WidgetConfig {
        WidgetConfig {
            id: "test".to_string(),
            kind,
            endpoint: endpoint.to_string(),
            online_sales_endpoint: None,
            interval_secs: None,
            on_error: FailurePolicy::ShowError,
            loading_placeholder: false,
        }
    }

    #[tokio::test]
    async fn test_category_performance_kpis() {
        let cfg = widget(WidgetKind::CategoryPerformance, "https://r/cat");
        let source = StaticSource::new().with(
            "https://r/cat",
            json!({
                "success": true,
                "data": [
                    {"category_name": "A+", "YTD_Current_Year": 850, "YTD_Last_Year": 800},
                    {"category_name": "A", "YTD_Current_Year": 650, "YTD_Last_Year": 600},
                ]
            }),
        );

        let output = refresh_widget(&cfg, &source).await.unwrap();
        let tiles = &output.view.tiles;
        assert_eq!(tiles[0].target, "kpi-total");
        assert_eq!(tiles[0].text, "₹1,500");
        assert_eq!(tiles[1].text, "+7.1%");
        assert_eq!(tiles[2].text, "A+");

        let chart = &output.charts[0];
        assert_eq!(chart.chart, "catChart");
        assert_eq!(chart.labels.as_deref(), Some(&["A+".to_string(), "A".to_string()][..]));
        assert_eq!(chart.data, vec![vec![850.0, 650.0], vec![800.0, 600.0]]);
    }

    #[tokio::test]
    async fn test_category_performance_top_tie_keeps_first() {
        let cfg = widget(WidgetKind::CategoryPerformance, "https://r/cat");
        let source = StaticSource::new().with(
            "https://r/cat",
            json!({
                "success": true,
                "data": [
                    {"category_name": "B", "YTD_Current_Year": 500, "YTD_Last_Year": 1},
                    {"category_name": "C", "YTD_Current_Year": 500, "YTD_Last_Year": 1},
                ]
            }),
        );

        let output = refresh_widget(&cfg, &source).await.unwrap();
        assert_eq!(output.view.tiles[2].text, "B");
    }

    #[tokio::test]
    async fn test_category_performance_zero_prior_growth() {
        let cfg = widget(WidgetKind::CategoryPerformance, "https://r/cat");
        let source = StaticSource::new().with(
            "https://r/cat",
            json!({
                "success": true,
                "data": [{"category_name": "New", "YTD_Current_Year": 42, "YTD_Last_Year": 0}]
            }),
        );

        let output = refresh_widget(&cfg, &source).await.unwrap();
        assert_eq!(output.view.tiles[1].text, "+0.0%");
    }

    #[tokio::test]
    async fn test_category_performance_rejects_unsuccessful_payload() {
        let cfg = widget(WidgetKind::CategoryPerformance, "https://r/cat");
        let source = StaticSource::new().with("https://r/cat", json!({"success": false, "data": []}));
        let err = refresh_widget(&cfg, &source).await.unwrap_err();
        assert!(matches!(err, FetchError::Shape { .. }));
    }

    #[tokio::test]
    async fn test_state_franchise_totals_and_chart() {
        let cfg = widget(WidgetKind::StateFranchise, "https://r/states");
        let source = StaticSource::new().with(
            "https://r/states",
            json!({
                "data": [
                    {"State": "Maharashtra", "Active": 1200, "Inactive": 300},
                    {"State": "Gujarat", "Active": 700, "Inactive": 100},
                ]
            }),
        );

        let output = refresh_widget(&cfg, &source).await.unwrap();
        assert_eq!(output.view.tiles[0].text, "2,300 Total");
        let body = &output.view.tables[0].body;
        assert!(body.starts_with("<tr><td>1</td><td>Maharashtra</td>"));
        assert!(body.contains("<td>2</td><td>Gujarat</td>"));
        assert_eq!(output.charts[0].data, vec![vec![1500.0, 800.0]]);
    }

    #[tokio::test]
    async fn test_fr_registration_table_and_chart() {
        let cfg = widget(WidgetKind::FrRegistration, "https://r/reg");
        let source = StaticSource::new().with(
            "https://r/reg",
            json!({
                "success": true,
                "data": [{"MTD": 37, "YTD": 412, "Last_Year_YTD": 392, "Growth_Percentage": "5.1"}]
            }),
        );

        let output = refresh_widget(&cfg, &source).await.unwrap();
        let body = &output.view.tables[0].body;
        assert!(body.contains("<td>MTD</td><td class=\"num\">37</td>"));
        assert!(body.contains("+5.1%"));
        assert_eq!(output.charts[0].chart, "frRegChart");
        assert_eq!(output.charts[0].labels, None);
        assert_eq!(output.charts[0].data, vec![vec![412.0, 392.0]]);
    }

    #[tokio::test]
    async fn test_team_punch_labels() {
        let cfg = widget(WidgetKind::TeamPunch, "sample:team-punch");
        let source = StaticSource::new().with(
            "sample:team-punch",
            json!({"inProcess": 53, "started": 27, "transferToFTD": 18}),
        );

        let output = refresh_widget(&cfg, &source).await.unwrap();
        assert_eq!(output.view.tiles[0].text, "53");
        let body = &output.view.tables[0].body;
        assert!(body.contains("<td>In Process</td>"));
        assert!(body.contains("<td>Started</td>"));
    }

    #[tokio::test]
    async fn test_highlights_ticker() {
        let cfg = widget(WidgetKind::Highlights, "sample:highlights");
        let source =
            StaticSource::new().with("sample:highlights", json!(["first", "second"]));

        let output = refresh_widget(&cfg, &source).await.unwrap();
        assert_eq!(output.view.ticker.as_deref(), Some("first • second"));
    }

    #[tokio::test]
    async fn test_source_revenue_takes_second_group() {
        let cfg = widget(WidgetKind::SourceRevenue, "https://r/rev");
        let source = StaticSource::new().with(
            "https://r/rev",
            json!({
                "success": true,
                "data": [
                    [{"Sale_Source": "Summary", "MTD_Total_Amount": 0, "YTD_Total_Amount": 0, "Last_YTD_Total_Amount": 0}],
                    [{"Sale_Source": "Franchise", "MTD_Total_Amount": 100, "YTD_Total_Amount": 1200, "Last_YTD_Total_Amount": 1000}],
                ]
            }),
        );

        let output = refresh_widget(&cfg, &source).await.unwrap();
        let body = &output.view.tables[0].body;
        assert!(body.contains("Franchise"));
        assert!(!body.contains("Summary"));
        assert!(body.contains("20.00%"));
    }

    #[tokio::test]
    async fn test_source_revenue_online_row_survives_dead_endpoint() {
        let mut cfg = widget(WidgetKind::SourceRevenue, "https://r/rev");
        cfg.online_sales_endpoint = Some("https://sales/online-sales".to_string());
        let source = StaticSource::new().with(
            "https://r/rev",
            json!({"success": true, "data": [[], []]}),
        );

        // All three online-sales legs hit an unknown URL and fail; the
        // merged row still renders with zero amounts.
        let output = refresh_widget(&cfg, &source).await.unwrap();
        let body = &output.view.tables[0].body;
        assert!(body.contains("Online Sales"));
        assert!(body.contains("₹0"));
    }

    #[tokio::test]
    async fn test_warehouse_empty_renders_placeholder_row() {
        let cfg = widget(WidgetKind::WarehouseExpiry, "https://r/wh");
        let source =
            StaticSource::new().with("https://r/wh", json!({"success": true, "data": [[]]}));

        let output = refresh_widget(&cfg, &source).await.unwrap();
        assert_eq!(
            output.view.tables[0].body,
            "<tr><td colspan=\"9\" style=\"text-align:center;\">No data available.</td></tr>"
        );
    }

    #[tokio::test]
    async fn test_medicine_category_split_gives_first_half_the_extra_row() {
        let cfg = widget(WidgetKind::MedicineCategory, "https://r/med");
        let source = StaticSource::new().with(
            "https://r/med",
            json!({
                "success": true,
                "data": [
                    {"Category_Name": "A", "Amount": 1},
                    {"Category_Name": "B", "Amount": 2},
                    {"Category_Name": "C", "Amount": 3},
                ]
            }),
        );

        let output = refresh_widget(&cfg, &source).await.unwrap();
        let first = &output.view.tables[0].body;
        let second = &output.view.tables[1].body;
        assert_eq!(first.matches("<tr>").count(), 2);
        assert_eq!(second.matches("<tr>").count(), 1);
        assert_eq!(output.charts[0].data, vec![vec![1.0, 2.0, 3.0]]);
    }

    #[tokio::test]
    async fn test_purchase_po_totals() {
        let cfg = widget(WidgetKind::PurchasePo, "https://r/po");
        let source = StaticSource::new().with(
            "https://r/po",
            json!({
                "success": true,
                "data": [
                    {"Company_Name": "Acme", "PO_Generated_Count": 4, "PO_Amount": 250000},
                    {"Company_Name": "Zen", "PO_Generated_Count": 6, "PO_Amount": 750000},
                ]
            }),
        );

        let output = refresh_widget(&cfg, &source).await.unwrap();
        assert_eq!(output.view.tiles[0].text, "2");
        assert_eq!(output.view.tiles[1].text, "10");
        assert_eq!(output.view.tiles[2].text, "₹10,00,000");
    }

    #[tokio::test]
    async fn test_odc_stats_dynamic_headers() {
        let cfg = widget(WidgetKind::OdcStats, "https://pos/odc");
        let source = StaticSource::new().with(
            "https://pos/odc",
            json!({
                "status": 1,
                "result": [
                    {"odc_name": "Central", "total_sale": 120000, "bill_count": 42}
                ]
            }),
        );

        let output = refresh_widget(&cfg, &source).await.unwrap();
        let head = output.view.tables[0].head.as_deref().unwrap();
        assert_eq!(
            head,
            "<tr><th>Odc Name</th><th>Total Sale</th><th>Bill Count</th></tr>"
        );
        let body = &output.view.tables[0].body;
        assert!(body.contains("<td class=\"num\">Central</td>"));
        assert!(body.contains("<td class=\"num\">1,20,000</td>"));
    }

    #[tokio::test]
    async fn test_odc_stats_rejects_bad_status() {
        let cfg = widget(WidgetKind::OdcStats, "https://pos/odc");
        let source =
            StaticSource::new().with("https://pos/odc", json!({"status": 0, "result": [{}]}));
        assert!(refresh_widget(&cfg, &source).await.is_err());
    }

    #[tokio::test]
    async fn test_network_failure_propagates() {
        let cfg = widget(WidgetKind::DailySales, "https://r/daily");
        let source = StaticSource::new();
        let err = refresh_widget(&cfg, &source).await.unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }));
    }

    #[test]
    fn test_fiscal_windows_after_april() {
        let windows = fiscal_windows(NaiveDate::from_ymd_opt(2026, 8, 6).unwrap());
        assert_eq!(windows.ytd.from, "2026-04-01");
        assert_eq!(windows.ytd.to, "2026-08-06");
        assert_eq!(windows.last_ytd.from, "2025-04-01");
        assert_eq!(windows.last_ytd.to, "2025-08-06");
        assert_eq!(windows.mtd.from, "2026-08-01");
        assert_eq!(windows.mtd.to, "2026-08-06");
    }

    #[test]
    fn test_fiscal_windows_before_april() {
        let windows = fiscal_windows(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
        assert_eq!(windows.ytd.from, "2025-04-01");
        assert_eq!(windows.last_ytd.from, "2024-04-01");
        assert_eq!(windows.last_ytd.to, "2025-01-15");
    }

    #[tokio::test]
    async fn test_online_sales_total_sums_string_amounts() {
        let window = DateWindow {
            from: "2026-04-01".to_string(),
            to: "2026-08-06".to_string(),
        };
        let source = StaticSource::new().with(
            "https://sales/online-sales?fromDate=2026-04-01&toDate=2026-08-06",
            json!({
                "status": 1,
                "data": [
                    {"total_paid_amount": "100.5"},
                    {"total_paid_amount": 49.5},
                    {"other_field": 1}
                ]
            }),
        );

        let total = online_sales_total(&source, "https://sales/online-sales", &window).await;
        assert!((total - 150.0).abs() < 1e-9);
    }
}
