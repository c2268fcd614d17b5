//! Derived figures for the availability and competitor pages.
//!
//! Provides pure functions over loaded products:
//! - Stock classification
//! - Competitor resolution (explicit listings or synthesized fallbacks)
//! - Stock totals per region code
//! - The availability-gap recommendation

use comparely_model::{Competitor, Product, StockStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stock below this (and above zero) is "Low stock".
pub const LOW_STOCK_THRESHOLD: i64 = 15;

/// Classify a stock level.
pub fn classify_stock(stock: i64) -> StockStatus {
    if stock <= 0 {
        StockStatus::OutOfStock
    } else if stock < LOW_STOCK_THRESHOLD {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

/// Round to the nearest integer, halves toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Resolve exactly two competitors (A, B) for a product.
///
/// Listed competitors are used verbatim. Missing ones are synthesized from
/// `competitorStock`/`competitorPrice`, or from the product's own stock and
/// price less fixed offsets.
pub fn competitor_pair(product: &Product) -> [Competitor; 2] {
    let listed = product.listed_competitors().unwrap_or(&[]);
    match listed {
        [a, b, ..] => [a.clone(), b.clone()],
        [a] => [a.clone(), fallback_b(product)],
        [] => [fallback_a(product), fallback_b(product)],
    }
}

/// The competitor the pricing heuristic reacts to.
pub fn primary_competitor(product: &Product) -> Competitor {
    let [a, _] = competitor_pair(product);
    a
}

fn fallback_a(product: &Product) -> Competitor {
    Competitor::new(
        "Competitor A",
        product
            .competitor_stock
            .unwrap_or_else(|| product.stock.saturating_sub(5).max(0)),
        product.competitor_price.unwrap_or(product.price - 2.0),
    )
}

fn fallback_b(product: &Product) -> Competitor {
    Competitor::new(
        "Competitor B",
        product
            .competitor_stock
            .unwrap_or(product.stock)
            .saturating_sub(10)
            .max(0),
        (product.competitor_price.unwrap_or(product.price) - 3.0).max(1.0),
    )
}

/// Summed stock per region code, in first-seen order. Totals saturate at
/// the `i64` bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionTotals {
    entries: Vec<(String, i64)>,
    index: HashMap<String, usize>,
}

impl RegionTotals {
    /// Add stock to a region, registering it on first sight.
    pub fn add(&mut self, region: &str, stock: i64) {
        match self.index.get(region) {
            Some(&i) => {
                let total = &mut self.entries[i].1;
                *total = total.saturating_add(stock);
            }
            None => {
                self.index.insert(region.to_string(), self.entries.len());
                self.entries.push((region.to_string(), stock));
            }
        }
    }

    pub fn get(&self, region: &str) -> Option<i64> {
        self.index.get(region).map(|&i| self.entries[i].1)
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(region, _)| region.clone()).collect()
    }

    pub fn values(&self) -> Vec<i64> {
        self.entries.iter().map(|(_, total)| *total).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(region, total)| (region.as_str(), *total))
    }
}

/// Aggregate stock by region code (the darkstore proxy).
pub fn region_totals(products: &[Product]) -> RegionTotals {
    let mut totals = RegionTotals::default();
    for product in products {
        totals.add(&product.pincode, product.stock);
    }
    totals
}

/// Tuning for the availability-gap recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapConfig {
    /// Competitors must lead by more than this many units
    pub stock_slack: i64,
    /// Lower bound of the reported percentage
    pub min_pct: i64,
    /// Upper bound of the reported percentage
    pub max_pct: i64,
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            stock_slack: 5,
            min_pct: 8,
            max_pct: 35,
        }
    }
}

/// A product that trails its best competitor on stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityGap {
    /// Position of the product in the dataset
    pub index: usize,
    /// Region code of that product
    pub region: String,
    /// How much less available, clamped to the configured bounds
    pub pct: i64,
}

/// Find the first product whose best competitor out-stocks it by more than
/// the slack. `None` means parity.
pub fn availability_gap(products: &[Product], config: &GapConfig) -> Option<AvailabilityGap> {
    products.iter().enumerate().find_map(|(index, product)| {
        let [a, b] = competitor_pair(product);
        let best = a.stock.max(b.stock);
        if product.stock.saturating_add(config.stock_slack) >= best {
            return None;
        }

        let diff = best.saturating_sub(product.stock) as f64;
        let pct = round_half_up(diff / product.stock.max(1) as f64 * 100.0)
            .clamp(config.min_pct, config.max_pct);

        Some(AvailabilityGap {
            index,
            region: product.pincode.clone(),
            pct,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(classify_stock(-3), StockStatus::OutOfStock);
        assert_eq!(classify_stock(0), StockStatus::OutOfStock);
        assert_eq!(classify_stock(1), StockStatus::LowStock);
        assert_eq!(classify_stock(14), StockStatus::LowStock);
        assert_eq!(classify_stock(15), StockStatus::InStock);
        assert_eq!(classify_stock(500), StockStatus::InStock);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(4.4), 4);
    }

    #[test]
    fn test_fallback_from_own_figures() {
        let product = Product::new("Chips", "A", 3, 2.5);
        let [a, b] = competitor_pair(&product);

        assert_eq!(a, Competitor::new("Competitor A", 0, 0.5));
        assert_eq!(b, Competitor::new("Competitor B", 0, 1.0));
    }

    #[test]
    fn test_fallback_from_scalars() {
        let product = Product::new("Chips", "A", 20, 50.0).with_fallback(Some(30), Some(45.0));
        let [a, b] = competitor_pair(&product);

        assert_eq!(a, Competitor::new("Competitor A", 30, 45.0));
        assert_eq!(b, Competitor::new("Competitor B", 20, 42.0));
    }

    #[test]
    fn test_listed_competitors_truncated() {
        let product = Product::new("Chips", "A", 20, 50.0).with_competitors(vec![
            Competitor::new("X", 1, 1.0),
            Competitor::new("Y", 2, 2.0),
            Competitor::new("Z", 3, 3.0),
        ]);
        let [a, b] = competitor_pair(&product);
        assert_eq!(a.name, "X");
        assert_eq!(b.name, "Y");
    }

    #[test]
    fn test_single_listed_competitor_pairs_with_fallback() {
        let product = Product::new("Chips", "A", 20, 50.0)
            .with_competitors(vec![Competitor::new("X", 40, 48.0)]);
        let [a, b] = competitor_pair(&product);
        assert_eq!(a.name, "X");
        assert_eq!(b, Competitor::new("Competitor B", 10, 47.0));
        assert_eq!(primary_competitor(&product).name, "X");
    }

    #[test]
    fn test_region_totals_first_seen_order() {
        let products = vec![
            Product::new("p1", "A", 5, 1.0),
            Product::new("p2", "B", 3, 1.0),
            Product::new("p3", "A", 2, 1.0),
        ];
        let totals = region_totals(&products);

        assert_eq!(totals.labels(), vec!["A", "B"]);
        assert_eq!(totals.values(), vec![7, 3]);
        assert_eq!(totals.get("A"), Some(7));
        assert_eq!(totals.get("C"), None);
    }

    #[test]
    fn test_extreme_stock_saturates() {
        let products = vec![
            Product::new("p1", "A", i64::MAX, 1.0),
            Product::new("p2", "A", 1, 1.0),
            Product::new("p3", "B", i64::MIN, 1.0),
            Product::new("p4", "B", -1, 1.0),
        ];
        let totals = region_totals(&products);
        assert_eq!(totals.values(), vec![i64::MAX, i64::MIN]);

        let [a, b] = competitor_pair(&products[2]);
        assert_eq!((a.stock, b.stock), (0, 0));

        let huge = vec![Product::new("p1", "A", i64::MAX, 10.0).with_fallback(Some(0), None)];
        assert_eq!(availability_gap(&huge, &GapConfig::default()), None);

        let deep = vec![Product::new("p1", "A", i64::MIN, 10.0).with_fallback(Some(i64::MAX), None)];
        let gap = availability_gap(&deep, &GapConfig::default()).unwrap();
        assert_eq!(gap.pct, 35);
    }

    #[test]
    fn test_gap_parity() {
        let products = vec![
            Product::new("p1", "A", 20, 10.0).with_fallback(Some(25), None),
            Product::new("p2", "B", 20, 10.0),
        ];
        assert_eq!(availability_gap(&products, &GapConfig::default()), None);
    }

    #[test]
    fn test_gap_first_qualifying_wins() {
        let products = vec![
            Product::new("p1", "A", 20, 10.0),
            Product::new("p2", "B", 10, 10.0).with_fallback(Some(12), None),
            Product::new("p3", "C", 10, 10.0).with_fallback(Some(100), None),
            Product::new("p4", "D", 10, 10.0).with_fallback(Some(16), None),
        ];
        let gap = availability_gap(&products, &GapConfig::default()).unwrap();

        assert_eq!(gap.index, 2);
        assert_eq!(gap.region, "C");
        assert_eq!(gap.pct, 35);
    }

    #[test]
    fn test_gap_pct_floor() {
        // (106 - 100) / 100 = 6% -> clamped to 8
        let products = vec![Product::new("p1", "Z", 100, 10.0).with_fallback(Some(106), None)];
        let gap = availability_gap(&products, &GapConfig::default()).unwrap();
        assert_eq!(gap.pct, 8);
    }

    #[test]
    fn test_gap_zero_stock_divides_by_one() {
        let products = vec![Product::new("p1", "Z", 0, 10.0).with_fallback(Some(6), None)];
        let gap = availability_gap(&products, &GapConfig::default()).unwrap();
        assert_eq!(gap.pct, 35);
    }
}
