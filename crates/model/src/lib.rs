//! Core domain model for Comparely.
//!
//! This crate defines the fundamental types used throughout the site:
//! - `Product`: A brand product as it appears in the static dataset
//! - `Competitor`: A rival listing compared against a product
//! - `Dataset`: The top-level document holding every product
//! - `StockStatus`: Out of stock, Low stock, In stock

use serde::{Deserialize, Serialize};

/// Availability bucket derived from a stock level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    /// Nothing left (zero or negative stock)
    OutOfStock,
    /// Some stock, below the comfort threshold
    LowStock,
    /// Comfortably stocked
    InStock,
}

impl StockStatus {
    /// Get the user-facing label for this status.
    pub fn label(&self) -> &'static str {
        match self {
            Self::OutOfStock => "Out of stock",
            Self::LowStock => "Low stock",
            Self::InStock => "In stock",
        }
    }

    /// Get the badge style class for this status.
    pub fn style_class(&self) -> &'static str {
        match self {
            Self::OutOfStock => "out-of-stock",
            Self::LowStock => "low-stock",
            Self::InStock => "in-stock",
        }
    }
}

/// A competing listing for the same product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    /// Display name of the competitor
    #[serde(default)]
    pub name: String,

    /// Units in stock
    pub stock: i64,

    /// Listed price
    pub price: f64,
}

impl Competitor {
    pub fn new(name: impl Into<String>, stock: i64, price: f64) -> Self {
        Self {
            name: name.into(),
            stock,
            price,
        }
    }
}

/// A product record from the static dataset.
///
/// Records are read-only once loaded; their position in the dataset is
/// their only identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product name
    pub name: String,

    /// Region code the stock is held in
    pub pincode: String,

    /// Units in stock
    pub stock: i64,

    /// Brand price
    pub price: f64,

    /// Explicit competitor listings (only the first two are used)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitors: Option<Vec<Competitor>>,

    /// Fallback competitor stock when `competitors` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitor_stock: Option<i64>,

    /// Fallback competitor price when `competitors` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitor_price: Option<f64>,
}

impl Product {
    /// Create a product with no competitor data.
    pub fn new(name: impl Into<String>, pincode: impl Into<String>, stock: i64, price: f64) -> Self {
        Self {
            name: name.into(),
            pincode: pincode.into(),
            stock,
            price,
            competitors: None,
            competitor_stock: None,
            competitor_price: None,
        }
    }

    pub fn with_competitors(mut self, competitors: Vec<Competitor>) -> Self {
        self.competitors = Some(competitors);
        self
    }

    pub fn with_fallback(mut self, competitor_stock: Option<i64>, competitor_price: Option<f64>) -> Self {
        self.competitor_stock = competitor_stock;
        self.competitor_price = competitor_price;
        self
    }

    /// Explicit competitors, if the record carries a non-empty list.
    pub fn listed_competitors(&self) -> Option<&[Competitor]> {
        self.competitors.as_deref().filter(|c| !c.is_empty())
    }
}

/// The static dataset document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Every product, in display order
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Dataset {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_labels() {
        assert_eq!(StockStatus::OutOfStock.label(), "Out of stock");
        assert_eq!(StockStatus::LowStock.style_class(), "low-stock");
        assert_eq!(StockStatus::InStock.style_class(), "in-stock");
    }

    #[test]
    fn test_dataset_camel_case_fields() {
        let json = r#"{
            "products": [
                {"name": "Oat Milk", "pincode": "560001", "stock": 12, "price": 99,
                 "competitorStock": 30, "competitorPrice": 95.5},
                {"name": "Granola", "pincode": "560002", "stock": 40, "price": 250,
                 "competitors": [{"name": "Rival", "stock": 10, "price": 240}]}
            ]
        }"#;
        let dataset: Dataset = serde_json::from_str(json).unwrap();

        assert_eq!(dataset.products.len(), 2);
        assert_eq!(dataset.products[0].competitor_stock, Some(30));
        assert_eq!(dataset.products[0].competitor_price, Some(95.5));
        assert_eq!(
            dataset.products[1].listed_competitors(),
            Some(&[Competitor::new("Rival", 10, 240.0)][..])
        );
    }

    #[test]
    fn test_missing_products_is_empty() {
        let dataset: Dataset = serde_json::from_str("{}").unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_empty_competitor_list_is_not_listed() {
        let product = Product::new("Tea", "110001", 5, 10.0).with_competitors(Vec::new());
        assert_eq!(product.listed_competitors(), None);
    }
}
