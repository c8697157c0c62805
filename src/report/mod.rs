//! Rendering of cost reports and flattened BOMs
//!
//! The engine works in exact decimals; rounding to cents happens here and
//! nowhere else.

mod export;
mod table;
mod tree;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;

pub use export::{cost_csv, flat_csv, FLAT_CSV_HEADER};
pub use table::{cost_markdown, flat_markdown};
pub use tree::render_cost_tree;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("output is not valid UTF-8")]
    Encoding,
}

/// Format a money amount as a fixed two-decimal string
pub fn money(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Format a quantity without trailing zeros
pub fn quantity(qty: Decimal) -> String {
    qty.normalize().to_string()
}

/// Pretty JSON for any report type
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ReportError> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_rounds_half_away_from_zero() {
        assert_eq!(money("10".parse().unwrap()), "10.00");
        assert_eq!(money("0.105".parse().unwrap()), "0.11");
        assert_eq!(money("2.344".parse().unwrap()), "2.34");
    }

    #[test]
    fn test_quantity_is_normalized() {
        assert_eq!(quantity("50.000".parse().unwrap()), "50");
        assert_eq!(quantity("0.50".parse().unwrap()), "0.5");
    }

    #[test]
    fn test_json_keeps_exact_decimals() {
        let json = to_json(&fixtures::flat(3)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["root"], "KIT-1");
        assert_eq!(value["rows"].as_array().unwrap().len(), 2);
        assert!(json.contains("0.105"));
    }
}
