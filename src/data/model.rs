use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::error::DataError;

// ---------------------------------------------------------------------------
// Column names as they appear in the exported chart data
// ---------------------------------------------------------------------------

pub const COL_UPC: &str = "UPC";
pub const COL_VEND: &str = "first(VEND)";
pub const COL_L3: &str = "first(L3)";
pub const COL_L5: &str = "first(L5)";
pub const COL_L9: &str = "first(L9)";
pub const COL_WEEK: &str = "WEEK";
pub const COL_DOLLARS: &str = "sum(DOLLARS)";
pub const COL_UNITS: &str = "sum(UNITS)";
pub const COL_PR: &str = "avg(PR)";
pub const COL_D: &str = "avg(D)";

/// Every column the loader requires, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    COL_UPC, COL_VEND, COL_L3, COL_L5, COL_L9, COL_WEEK, COL_DOLLARS, COL_UNITS, COL_PR, COL_D,
];

// ---------------------------------------------------------------------------
// Week – the chart axis value
// ---------------------------------------------------------------------------

/// A week key. The source data uses integer week ordinals, but date-like
/// labels are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Week {
    Ordinal(i64),
    Label(String),
}

impl Week {
    /// Parse a raw cell. Integers (including `"1582.0"`) become ordinals.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if let Ok(i) = s.parse::<i64>() {
            return Week::Ordinal(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            if f.fract() == 0.0 && f.is_finite() {
                return Week::Ordinal(f as i64);
            }
        }
        Week::Label(s.to_string())
    }

    /// Position on the x axis: the ordinal itself, or `fallback` for labels.
    pub fn axis_value(&self, fallback: usize) -> f64 {
        match self {
            Week::Ordinal(i) => *i as f64,
            Week::Label(_) => fallback as f64,
        }
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Week::Ordinal(i) => write!(f, "{i}"),
            Week::Label(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// SalesRow – one (product, week) observation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SalesRow {
    pub upc: String,
    /// Vendor code, `first(VEND)`.
    pub vendor: i64,
    /// Parent company, `first(L3)`.
    pub parent: String,
    /// Brand, `first(L5)`.
    pub brand: String,
    /// Product description, `first(L9)`.
    pub description: String,
    pub week: Week,
    pub dollars: f64,
    pub units: f64,
    /// Average time with price reduction.
    pub pr: f64,
    /// Average marketing support.
    pub d: f64,
}

// ---------------------------------------------------------------------------
// VendorSet – codes that identify the house vendor
// ---------------------------------------------------------------------------

/// Known vendor codes and the parent-company label reported for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorSet {
    codes: BTreeSet<i64>,
    label: String,
}

impl VendorSet {
    pub fn new(codes: impl IntoIterator<Item = i64>, label: impl Into<String>) -> Self {
        Self {
            codes: codes.into_iter().collect(),
            label: label.into(),
        }
    }

    pub fn contains(&self, code: i64) -> bool {
        self.codes.contains(&code)
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for VendorSet {
    fn default() -> Self {
        VendorSet::new(
            crate::config::KNOWN_VENDOR_CODES,
            crate::config::KNOWN_VENDOR_LABEL,
        )
    }
}

// ---------------------------------------------------------------------------
// SalesTable – the loaded (or filtered) dataset
// ---------------------------------------------------------------------------

/// An ordered, immutable set of rows.
///
/// Invariant: all rows sharing a UPC carry the same vendor, parent, brand
/// and description. [`SalesTable::new`] checks it; subsets produced by the
/// filter functions inherit it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SalesTable {
    rows: Vec<SalesRow>,
}

impl SalesTable {
    /// Build a table, validating the per-UPC invariant.
    pub fn new(rows: Vec<SalesRow>) -> Result<Self, DataError> {
        check_consistent_products(&rows)?;
        Ok(SalesTable { rows })
    }

    /// Wrap rows taken from an already validated table.
    pub(crate) fn from_subset(rows: Vec<SalesRow>) -> Self {
        SalesTable { rows }
    }

    pub fn rows(&self) -> &[SalesRow] {
        &self.rows
    }

    pub fn first(&self) -> Option<&SalesRow> {
        self.rows.first()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Fail on the first row whose attributes differ from its UPC's first row.
fn check_consistent_products(rows: &[SalesRow]) -> Result<(), DataError> {
    let mut first_seen: HashMap<&str, &SalesRow> = HashMap::new();
    for row in rows {
        let Some(first) = first_seen.get(row.upc.as_str()) else {
            first_seen.insert(&row.upc, row);
            continue;
        };
        let mismatch = if first.vendor != row.vendor {
            Some(COL_VEND)
        } else if first.parent != row.parent {
            Some(COL_L3)
        } else if first.brand != row.brand {
            Some(COL_L5)
        } else if first.description != row.description {
            Some(COL_L9)
        } else {
            None
        };
        if let Some(column) = mismatch {
            return Err(DataError::InconsistentProduct {
                upc: row.upc.clone(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Derived views handed to the presentation layer
// ---------------------------------------------------------------------------

/// The three header attributes shown above the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductHeader {
    pub parent_company: String,
    pub brand: String,
    pub description: String,
}

/// Four week-aligned series for a grouped bar chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSeries {
    pub weeks: Vec<Week>,
    pub revenue: Vec<f64>,
    pub units: Vec<f64>,
    pub pr_metric: Vec<f64>,
    pub d_metric: Vec<f64>,
}

impl ChartSeries {
    /// Number of points per series.
    pub fn len(&self) -> usize {
        self.weeks.len()
    }
}

/// Everything the Time Series tab needs for one selected product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductView {
    pub upc: String,
    pub header: ProductHeader,
    pub series: ChartSeries,
    pub matched: SalesTable,
}
