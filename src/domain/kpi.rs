// KPI arithmetic shared by the report transforms

/// Year-over-year growth as a percentage. Defined as zero whenever the
/// prior-period figure is zero or negative, so the result is always finite.
pub fn growth_percent(current: f64, prior: f64) -> f64 {
    if prior > 0.0 {
        (current - prior) / prior * 100.0
    } else {
        0.0
    }
}

/// Index of the entry with the strictly largest value. Ties resolve to the
/// first occurrence in input order. `None` on an empty slice.
pub fn top_entry(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, max)) if v <= max => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
