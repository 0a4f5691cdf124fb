//! Application configuration.
//!
//! Hardcoded defaults; the data path, vendor filter and initial product can
//! be overridden on the command line (see `main.rs`).

/// Data file opened at startup when none is given on the command line.
pub const DEFAULT_DATA_PATH: &str = "chart_data.csv";

/// Vendor codes identifying PepsiCo-affiliated products.
pub const KNOWN_VENDOR_CODES: [i64; 3] = [28400, 30000, 71461];

/// Parent company reported for any product from a known vendor.
pub const KNOWN_VENDOR_LABEL: &str = "PEPSICO INC";

/// Market named in the chart title.
pub const MARKET_NAME: &str = "New York";

pub const WINDOW_TITLE: &str = "PepsiCo Market Analysis";
pub const WINDOW_SIZE: [f32; 2] = [1200.0, 800.0];
pub const WINDOW_MIN_SIZE: [f32; 2] = [700.0, 450.0];

/// Chart title for the selected product.
pub fn chart_title(upc: &str) -> String {
    format!("Time Series Chart for {upc} in {MARKET_NAME}")
}
