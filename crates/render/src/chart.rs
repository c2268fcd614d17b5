//! Chart configurations in the charting library's
//! `{type, data: {labels, datasets}, options}` shape.

use comparely_insights::{competitor_pair, RegionTotals};
use comparely_model::Product;
use comparely_pricing::CurvePoint;
use serde::{Deserialize, Serialize};
use serde_json::json;

const BLUE: &str = "rgba(59,130,246,0.6)";
const GREEN: &str = "rgba(16,185,129,0.6)";
const AMBER: &str = "rgba(234,179,8,0.6)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

/// A complete chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// One data series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

impl ChartDataset {
    pub fn new(label: impl Into<String>, data: Vec<i64>) -> Self {
        Self {
            label: label.into(),
            data,
            ..Default::default()
        }
    }

    pub fn with_background(mut self, color: &str) -> Self {
        self.background_color = Some(color.to_string());
        self
    }
}

impl ChartConfig {
    /// Values of the series with the given label.
    pub fn series(&self, label: &str) -> Option<&[i64]> {
        self.data
            .datasets
            .iter()
            .find(|d| d.label == label)
            .map(|d| d.data.as_slice())
    }
}

/// Bar chart of total stock per region code.
pub fn availability_chart(totals: &RegionTotals) -> ChartConfig {
    ChartConfig {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: totals.labels(),
            datasets: vec![
                ChartDataset::new("Total Stock by Pincode", totals.values()).with_background(BLUE),
            ],
        },
        options: json!({ "responsive": true, "plugins": { "legend": { "display": true } } }),
    }
}

/// Grouped bar chart of brand stock against both competitors.
pub fn competitors_chart(products: &[Product]) -> ChartConfig {
    let mut brand = Vec::with_capacity(products.len());
    let mut comp_a = Vec::with_capacity(products.len());
    let mut comp_b = Vec::with_capacity(products.len());

    for product in products {
        let [a, b] = competitor_pair(product);
        brand.push(product.stock);
        comp_a.push(a.stock);
        comp_b.push(b.stock);
    }

    ChartConfig {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: products.iter().map(|p| p.name.clone()).collect(),
            datasets: vec![
                ChartDataset::new("Your Brand", brand).with_background(BLUE),
                ChartDataset::new("Competitor A", comp_a).with_background(GREEN),
                ChartDataset::new("Competitor B", comp_b).with_background(AMBER),
            ],
        },
        options: json!({
            "responsive": true,
            "scales": { "x": { "stacked": false }, "y": { "beginAtZero": true } }
        }),
    }
}

/// Line chart of predicted sales across candidate prices.
pub fn pricing_chart(curve: &[CurvePoint], currency: &str) -> ChartConfig {
    ChartConfig {
        kind: ChartKind::Line,
        data: ChartData {
            labels: curve.iter().map(|p| format!("{currency}{}", p.price)).collect(),
            datasets: vec![ChartDataset {
                label: "Predicted Sales".to_string(),
                data: curve.iter().map(|p| p.sales).collect(),
                background_color: Some("rgba(59,130,246,0.15)".to_string()),
                border_color: Some("rgba(59,130,246,1)".to_string()),
                fill: Some(true),
                tension: Some(0.35),
            }],
        },
        options: json!({ "responsive": true, "plugins": { "legend": { "display": false } } }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comparely_insights::region_totals;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_availability_chart_json_shape() {
        let products = vec![
            Product::new("p1", "A", 5, 1.0),
            Product::new("p2", "B", 3, 1.0),
            Product::new("p3", "A", 2, 1.0),
        ];
        let chart = availability_chart(&region_totals(&products));
        let value = serde_json::to_value(&chart).unwrap();

        assert_eq!(value["type"], "bar");
        assert_eq!(value["data"]["labels"], json!(["A", "B"]));
        assert_eq!(value["data"]["datasets"][0]["data"], json!([7, 3]));
        assert_eq!(value["data"]["datasets"][0]["backgroundColor"], BLUE);
        assert_eq!(value["options"]["plugins"]["legend"]["display"], true);
    }

    #[test]
    fn test_competitors_chart_series() {
        let products = vec![
            Product::new("Tea", "A", 20, 10.0),
            Product::new("Coffee", "B", 8, 10.0).with_fallback(Some(30), None),
        ];
        let chart = competitors_chart(&products);

        assert_eq!(chart.data.labels, vec!["Tea", "Coffee"]);
        assert_eq!(chart.series("Your Brand"), Some(&[20, 8][..]));
        assert_eq!(chart.series("Competitor A"), Some(&[15, 30][..]));
        assert_eq!(chart.series("Competitor B"), Some(&[10, 20][..]));
    }

    #[test]
    fn test_pricing_chart_labels() {
        let curve = [
            CurvePoint { price: 88, sales: 88 },
            CurvePoint { price: 90, sales: 100 },
        ];
        let chart = pricing_chart(&curve, "₹");
        let value = serde_json::to_value(&chart).unwrap();

        assert_eq!(value["type"], "line");
        assert_eq!(value["data"]["labels"], json!(["₹88", "₹90"]));
        assert_eq!(value["data"]["datasets"][0]["fill"], true);
        assert_eq!(value["data"]["datasets"][0]["tension"], 0.35);
        assert_eq!(value["options"]["plugins"]["legend"]["display"], false);
    }
}
