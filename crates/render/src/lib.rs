//! Markup and chart generation for the Comparely pages.
//!
//! Converts products and derived figures into the HTML fragments written
//! into page containers, the chart configurations handed to the charting
//! library, and the short recommendation texts.

mod chart;
mod layout;
mod message;
mod table;

pub use chart::{
    availability_chart, competitors_chart, pricing_chart, ChartConfig, ChartData, ChartDataset,
    ChartKind,
};
pub use layout::{footer_markup, navbar_markup, NAV_LINKS};
pub use message::{availability_message, margin_text, price_text, sales_text, PARITY_MESSAGE};
pub use table::{availability_rows, competitor_rows};

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Format a price the way the dataset states it (`100`, `99.5`).
pub fn format_price(price: f64) -> String {
    price.to_string()
}
