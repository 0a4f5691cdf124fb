use std::collections::HashSet;

use super::error::DataError;
use super::model::{ChartSeries, ProductHeader, ProductView, SalesTable, VendorSet};

// ---------------------------------------------------------------------------
// Row selection
// ---------------------------------------------------------------------------

/// Keep only rows from known vendors when `only_known_vendors` is set,
/// otherwise return every row unchanged.
pub fn apply_category_filter(
    table: &SalesTable,
    only_known_vendors: bool,
    vendors: &VendorSet,
) -> SalesTable {
    if !only_known_vendors {
        return table.clone();
    }
    let rows = table
        .rows()
        .iter()
        .filter(|row| vendors.contains(row.vendor))
        .cloned()
        .collect();
    SalesTable::from_subset(rows)
}

/// Distinct UPCs in order of first appearance.
pub fn distinct_identifiers(table: &SalesTable) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    table
        .rows()
        .iter()
        .filter(|row| seen.insert(row.upc.as_str()))
        .map(|row| row.upc.clone())
        .collect()
}

/// Rows whose UPC equals `upc`. The result may be empty.
pub fn filter_by_identifier(table: &SalesTable, upc: &str) -> SalesTable {
    let rows = table
        .rows()
        .iter()
        .filter(|row| row.upc == upc)
        .cloned()
        .collect();
    SalesTable::from_subset(rows)
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Read the header attributes from the first matched row.
///
/// Parent company is the vendor-set label for known vendors, otherwise the
/// row's own `first(L3)`.
pub fn extract_header(
    matched: &SalesTable,
    vendors: &VendorSet,
) -> Result<ProductHeader, DataError> {
    let first = matched
        .first()
        .ok_or(DataError::EmptyResult { upc: None })?;

    let parent_company = if vendors.contains(first.vendor) {
        vendors.label().to_string()
    } else {
        first.parent.clone()
    };

    Ok(ProductHeader {
        parent_company,
        brand: first.brand.clone(),
        description: first.description.clone(),
    })
}

/// One point per matched row, in row order. Repeated weeks stay separate.
pub fn extract_series(matched: &SalesTable) -> ChartSeries {
    let n = matched.len();
    let mut series = ChartSeries {
        weeks: Vec::with_capacity(n),
        revenue: Vec::with_capacity(n),
        units: Vec::with_capacity(n),
        pr_metric: Vec::with_capacity(n),
        d_metric: Vec::with_capacity(n),
    };
    for row in matched.rows() {
        series.weeks.push(row.week.clone());
        series.revenue.push(row.dollars);
        series.units.push(row.units);
        series.pr_metric.push(row.pr);
        series.d_metric.push(row.d);
    }
    series
}

/// Run the full selection for one product: category filter, UPC match,
/// header and series extraction.
pub fn select_product(
    table: &SalesTable,
    only_known_vendors: bool,
    vendors: &VendorSet,
    upc: &str,
) -> Result<ProductView, DataError> {
    let candidates = apply_category_filter(table, only_known_vendors, vendors);
    let matched = filter_by_identifier(&candidates, upc);
    if matched.is_empty() {
        return Err(DataError::EmptyResult {
            upc: Some(upc.to_string()),
        });
    }
    let header = extract_header(&matched, vendors)?;
    let series = extract_series(&matched);
    log::debug!("selected {upc}: {} rows", matched.len());

    Ok(ProductView {
        upc: upc.to_string(),
        header,
        series,
        matched,
    })
}
