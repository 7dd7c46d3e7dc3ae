// Upstream report records
//
// One flat struct per reporting endpoint, deserialized fresh from every
// response and discarded on the next refresh. Field renames follow the
// upstream APIs verbatim.

use crate::domain::format::{format_currency, format_number, format_percent};
use crate::domain::kpi::growth_percent;
use crate::domain::render::{num_cell, row, text_cell, toned_num_cell, Tone};
use serde::{Deserialize, Deserializer, Serialize};

/// Envelope of the reporting host: `{"success": true, "data": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct WmsEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Vec<T>,
}

/// Envelope of the sales host: `{"status": 1, "data": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct StatusEnvelope<T> {
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub data: Vec<T>,
}

/// Envelope of the POS host: `{"status": 1, "result": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PosEnvelope<T> {
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub result: Vec<T>,
}

/// Some upstreams serialize amounts as strings ("1234.5"), some as
/// numbers. Accept both; anything else counts as zero, matching how the
/// reports treat absent figures.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value_as_f64(&value))
}

pub fn value_as_f64(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

// --- Category-wise purchase performance ---

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRow {
    pub category_name: String,
    #[serde(rename = "YTD_Current_Year", deserialize_with = "lenient_f64")]
    pub ytd_current_year: f64,
    #[serde(rename = "YTD_Last_Year", deserialize_with = "lenient_f64")]
    pub ytd_last_year: f64,
}

impl CategoryRow {
    pub fn growth(&self) -> f64 {
        growth_percent(self.ytd_current_year, self.ytd_last_year)
    }

    pub fn table_row(&self) -> String {
        let growth = self.growth();
        row(&[
            text_cell(&self.category_name),
            num_cell(&format_number(self.ytd_last_year)),
            num_cell(&format_number(self.ytd_current_year)),
            toned_num_cell(&format_percent(growth, 1), Tone::for_growth(growth)),
        ])
    }
}

// --- State-wise franchise counts ---

/// Row shape served by `/api/state-franchise`, already remapped by the
/// proxy relay from the upstream `{State, Active, Inactive}` records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFranchiseRow {
    pub sr: usize,
    pub state: String,
    pub active: i64,
    pub inactive: i64,
}

impl StateFranchiseRow {
    pub fn total(&self) -> i64 {
        self.active + self.inactive
    }

    pub fn table_row(&self) -> String {
        row(&[
            text_cell(&self.sr.to_string()),
            text_cell(&self.state),
            num_cell(&format_number(self.active as f64)),
            num_cell(&format_number(self.inactive as f64)),
            num_cell(&format_number(self.total() as f64)),
        ])
    }
}

/// Raw upstream record for the state-wise report.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamStateRow {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Active")]
    pub active: i64,
    #[serde(rename = "Inactive")]
    pub inactive: i64,
}

/// Remap upstream state records to the serial-numbered rows served by
/// `/api/state-franchise` and rendered by the state widget.
pub fn remap_state_rows(rows: Vec<UpstreamStateRow>) -> Vec<StateFranchiseRow> {
    rows.into_iter()
        .enumerate()
        .map(|(i, r)| StateFranchiseRow {
            sr: i + 1,
            state: r.state,
            active: r.active,
            inactive: r.inactive,
        })
        .collect()
}

// --- Franchise registration stats ---

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationStats {
    #[serde(rename = "MTD", deserialize_with = "lenient_f64")]
    pub mtd: f64,
    #[serde(rename = "YTD", deserialize_with = "lenient_f64")]
    pub ytd: f64,
    #[serde(rename = "Last_Year_YTD", deserialize_with = "lenient_f64")]
    pub last_year_ytd: f64,
    #[serde(rename = "Growth_Percentage", deserialize_with = "lenient_f64")]
    pub growth_percentage: f64,
}

// --- New franchise YTD performance ---

#[derive(Debug, Clone, Deserialize)]
pub struct NewFranchiseYtd {
    #[serde(rename = "Total_Registered_YTD", deserialize_with = "lenient_f64")]
    pub total_registered_ytd: f64,
    #[serde(rename = "Started_YTD", deserialize_with = "lenient_f64")]
    pub started_ytd: f64,
    #[serde(rename = "Excl_WS_Purchase_MTD", deserialize_with = "lenient_f64")]
    pub excl_ws_purchase_mtd: f64,
    #[serde(rename = "Excl_WS_Purchase_YTD", deserialize_with = "lenient_f64")]
    pub excl_ws_purchase_ytd: f64,
}

// --- Team punch ---

#[derive(Debug, Clone, Deserialize)]
pub struct TeamPunch {
    #[serde(rename = "inProcess", deserialize_with = "lenient_f64")]
    pub in_process: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub started: f64,
    #[serde(rename = "transferToFTD", deserialize_with = "lenient_f64")]
    pub transfer_to_ftd: f64,
}

impl TeamPunch {
    /// Payload keys and values in upstream field order, for the
    /// label/value table.
    pub fn entries(&self) -> [(&'static str, f64); 3] {
        [
            ("inProcess", self.in_process),
            ("started", self.started),
            ("transferToFTD", self.transfer_to_ftd),
        ]
    }
}

// --- Source-wise revenue ---

#[derive(Debug, Clone, Deserialize)]
pub struct RevenueRow {
    #[serde(rename = "Sale_Source")]
    pub sale_source: String,
    #[serde(rename = "MTD_Total_Amount", deserialize_with = "lenient_f64")]
    pub mtd_total_amount: f64,
    #[serde(rename = "YTD_Total_Amount", deserialize_with = "lenient_f64")]
    pub ytd_total_amount: f64,
    #[serde(rename = "Last_YTD_Total_Amount", deserialize_with = "lenient_f64")]
    pub last_ytd_total_amount: f64,
}

impl RevenueRow {
    pub fn growth(&self) -> f64 {
        growth_percent(self.ytd_total_amount, self.last_ytd_total_amount)
    }

    pub fn table_row(&self) -> String {
        let growth = self.growth();
        row(&[
            text_cell(&self.sale_source),
            num_cell(&format_currency(self.mtd_total_amount)),
            num_cell(&format_currency(self.ytd_total_amount)),
            num_cell(&format_currency(self.last_ytd_total_amount)),
            toned_num_cell(&format_percent(growth, 2), Tone::for_growth(growth)),
        ])
    }
}

// --- Warehouse stock expiry ---

#[derive(Debug, Clone, Deserialize)]
pub struct WarehouseRow {
    #[serde(rename = "Warehouse")]
    pub warehouse: String,
    #[serde(rename = "Present_Product_Count")]
    pub present_product_count: i64,
    #[serde(rename = "Present_Stock_Value", deserialize_with = "lenient_f64")]
    pub present_stock_value: f64,
    #[serde(rename = "Expiry_90_Product_Count")]
    pub expiry_90_product_count: i64,
    #[serde(rename = "Expiry_90_Value", deserialize_with = "lenient_f64")]
    pub expiry_90_value: f64,
    #[serde(rename = "Expiry_60_Product_Count")]
    pub expiry_60_product_count: i64,
    #[serde(rename = "Expiry_60_Value", deserialize_with = "lenient_f64")]
    pub expiry_60_value: f64,
    #[serde(rename = "Expiry_30_Product_Count")]
    pub expiry_30_product_count: i64,
    #[serde(rename = "Expiry_30_Value", deserialize_with = "lenient_f64")]
    pub expiry_30_value: f64,
}

impl WarehouseRow {
    pub fn table_row(&self) -> String {
        row(&[
            text_cell(&self.warehouse),
            num_cell(&self.present_product_count.to_string()),
            num_cell(&format_currency(self.present_stock_value)),
            num_cell(&self.expiry_90_product_count.to_string()),
            num_cell(&format_currency(self.expiry_90_value)),
            num_cell(&self.expiry_60_product_count.to_string()),
            num_cell(&format_currency(self.expiry_60_value)),
            num_cell(&self.expiry_30_product_count.to_string()),
            num_cell(&format_currency(self.expiry_30_value)),
        ])
    }
}

// --- Stock dispatch ---

#[derive(Debug, Clone, Deserialize)]
pub struct StockDispatch {
    #[serde(rename = "Dispatch_Count", deserialize_with = "lenient_f64")]
    pub dispatch_count: f64,
    #[serde(rename = "Stock_Amount", deserialize_with = "lenient_f64")]
    pub stock_amount: f64,
}

// --- Medicine category sales ---

#[derive(Debug, Clone, Deserialize)]
pub struct MedicineCategoryRow {
    #[serde(rename = "Category_Name")]
    pub category_name: String,
    #[serde(rename = "Amount", deserialize_with = "lenient_f64")]
    pub amount: f64,
}

impl MedicineCategoryRow {
    pub fn table_row(&self) -> String {
        row(&[
            text_cell(&self.category_name),
            num_cell(&format_currency(self.amount)),
        ])
    }
}

// --- Daily sales ---

#[derive(Debug, Clone, Deserialize)]
pub struct DailySales {
    #[serde(rename = "FTD_Amount", deserialize_with = "lenient_f64")]
    pub ftd_amount: f64,
    #[serde(rename = "MTD_Amount", deserialize_with = "lenient_f64")]
    pub mtd_amount: f64,
    #[serde(rename = "YTD_Amount", deserialize_with = "lenient_f64")]
    pub ytd_amount: f64,
}

// --- Year-over-year sales comparison ---

#[derive(Debug, Clone, Deserialize)]
pub struct YoySales {
    #[serde(rename = "This_Year_MTD", deserialize_with = "lenient_f64")]
    pub this_year_mtd: f64,
    #[serde(rename = "Last_Year_MTD", deserialize_with = "lenient_f64")]
    pub last_year_mtd: f64,
    #[serde(rename = "This_Year_YTD", deserialize_with = "lenient_f64")]
    pub this_year_ytd: f64,
    #[serde(rename = "Last_Year_YTD", deserialize_with = "lenient_f64")]
    pub last_year_ytd: f64,
}

// --- Purchase order report ---

#[derive(Debug, Clone, Deserialize)]
pub struct PurchasePoRow {
    #[serde(rename = "Company_Name")]
    pub company_name: String,
    #[serde(rename = "PO_Generated_Count", deserialize_with = "lenient_f64")]
    pub po_generated_count: f64,
    #[serde(rename = "PO_Amount", deserialize_with = "lenient_f64")]
    pub po_amount: f64,
}

impl PurchasePoRow {
    pub fn table_row(&self) -> String {
        row(&[
            text_cell(&self.company_name),
            num_cell(&format_number(self.po_generated_count)),
            num_cell(&format_currency(self.po_amount)),
        ])
    }
}

// --- Manufacturer-wise billing ---

#[derive(Debug, Clone, Deserialize)]
pub struct ManufacturerRow {
    #[serde(rename = "Manufacturer_Name")]
    pub manufacturer_name: String,
    #[serde(rename = "MTD_Amount", deserialize_with = "lenient_f64")]
    pub mtd_amount: f64,
    #[serde(rename = "YTD_Amount", deserialize_with = "lenient_f64")]
    pub ytd_amount: f64,
}

impl ManufacturerRow {
    pub fn table_row(&self) -> String {
        row(&[
            text_cell(&self.manufacturer_name),
            num_cell(&format_currency(self.mtd_amount)),
            num_cell(&format_currency(self.ytd_amount)),
        ])
    }
}
