// Fixed in-process sample payloads
//
// Served verbatim by the sample API endpoints and resolvable by the
// report client through the `sample:<name>` scheme.

use serde_json::{json, Value};

pub fn category_performance() -> Value {
    json!({
        "labels": ["A+", "A", "B", "C", "D", "E", "Inactive"],
        "ytdCurrent": [850, 650, 420, 300, 200, 110, 60],
        "ytdLast": [800, 600, 390, 290, 210, 120, 70]
    })
}

pub fn team_punch() -> Value {
    json!({
        "inProcess": 53,
        "started": 27,
        "transferToFTD": 18
    })
}

pub fn highlights() -> Value {
    json!(["No manual refresh needed — it’s all auto-magic every 30 seconds 🚀"])
}

pub fn by_name(name: &str) -> Option<Value> {
    match name {
        "category-performance" => Some(category_performance()),
        "team-punch" => Some(team_punch()),
        "highlights" => Some(highlights()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name_covers_all_samples() {
        assert!(by_name("category-performance").is_some());
        assert!(by_name("team-punch").is_some());
        assert!(by_name("highlights").is_some());
        assert!(by_name("other").is_none());
    }
}
