use thiserror::Error;

/// Errors raised while loading or querying sales data.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    /// A selection matched no rows. `upc` names the product when known.
    #[error("selection matched no rows{}", for_product(.upc))]
    EmptyResult { upc: Option<String> },

    /// The input file lacks a required column.
    #[error("missing column '{0}'")]
    MissingColumn(String),

    /// Rows of one UPC disagree on an attribute that must be constant.
    #[error("product '{upc}' has more than one value in column '{column}'")]
    InconsistentProduct { upc: String, column: String },

    /// A cell could not be parsed as its column's type.
    #[error("row {row}, column '{column}': invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}

fn for_product(upc: &Option<String>) -> String {
    upc.as_ref()
        .map(|u| format!(" for product '{u}'"))
        .unwrap_or_default()
}
