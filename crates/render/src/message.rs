//! Short user-facing texts.

use comparely_insights::AvailabilityGap;

pub const PARITY_MESSAGE: &str =
    "Availability parity achieved across zones. Maintain replenishment cadence to sustain share.";

/// Recommendation sentence for the competitor page, as plain text.
pub fn availability_message(gap: Option<&AvailabilityGap>) -> String {
    match gap {
        Some(gap) => format!(
            "Your product is ~{}% less available in Zone {}. Consider restocking to match competitors.",
            gap.pct, gap.region
        ),
        None => PARITY_MESSAGE.to_string(),
    }
}

pub fn price_text(currency: &str, price: i64) -> String {
    format!("{currency}{price}")
}

pub fn sales_text(expected_sales_increase: i64) -> String {
    format!("{expected_sales_increase}%")
}

pub fn margin_text(margin: i64) -> String {
    format!("{margin}%")
}
