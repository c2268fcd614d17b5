//! Pricing strategy for a single product.
//!
//! Takes a product and its primary competitor and applies a fixed decision
//! policy to produce a suggested price, an expected sales change, a margin
//! and a synthetic price/sales curve around the suggestion.

use comparely_insights::{primary_competitor, round_half_up};
use comparely_model::{Competitor, Product};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for the pricing policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Multiplier when a cheaper competitor also holds more stock
    pub undercut_multiplier: f64,
    /// Stock below this is treated as scarce
    pub scarcity_stock: i64,
    /// Multiplier for scarce stock
    pub scarcity_multiplier: f64,
    /// Stock above this is treated as surplus
    pub surplus_stock: i64,
    /// Multiplier for surplus stock
    pub surplus_multiplier: f64,
    /// Half-width of the multiplicative jitter (0.03 = ±3%)
    pub jitter_spread: f64,
    /// Assumed unit cost as a fraction of price
    pub cost_ratio: f64,
    /// Sales points gained or lost depending on competitor stock
    pub competitor_pressure: f64,
    /// Bounds of the expected sales increase, in percent
    pub sales_bounds: (i64, i64),
    /// Bounds of the margin, in percent
    pub margin_bounds: (i64, i64),
    /// Curve points on each side of the suggested price
    pub curve_half_width: i64,
    /// Price distance between curve points
    pub curve_step: i64,
    /// Predicted sales at the suggested price
    pub curve_peak: i64,
    /// Sales lost per unit of price distance
    pub curve_slope: i64,
    /// Lowest predicted sales on the curve
    pub curve_floor: i64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            undercut_multiplier: 0.9,
            scarcity_stock: 20,
            scarcity_multiplier: 1.1,
            surplus_stock: 50,
            surplus_multiplier: 0.95,
            jitter_spread: 0.03,
            cost_ratio: 0.6,
            competitor_pressure: 5.0,
            sales_bounds: (-10, 40),
            margin_bounds: (5, 45),
            curve_half_width: 4,
            curve_step: 2,
            curve_peak: 100,
            curve_slope: 6,
            curve_floor: 10,
        }
    }
}

/// Which branch of the policy produced the target price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingDecision {
    /// Competitor is cheaper and better stocked
    Undercut,
    /// Own stock is scarce
    Scarcity,
    /// Own stock is in surplus
    Surplus,
    /// Keep the current price
    Hold,
}

impl PricingDecision {
    /// Get a human-readable label for this decision.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Undercut => "Undercut competitor",
            Self::Scarcity => "Premium on scarce stock",
            Self::Surplus => "Clear surplus stock",
            Self::Hold => "Hold price",
        }
    }
}

/// Suggested strategy for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecommendation {
    /// Product the strategy was computed for
    pub product: String,
    /// Current brand price
    pub base_price: f64,
    /// Competitor the policy reacted to
    pub competitor: Competitor,
    /// Branch taken
    pub decision: PricingDecision,
    /// Jitter multiplier that was applied
    pub jitter: f64,
    /// Suggested price, rounded and at least 1
    pub optimal_price: i64,
    /// Expected sales change in percent
    pub expected_sales_increase: i64,
    /// Margin in percent
    pub margin: i64,
}

/// One point of the price/sales curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub price: i64,
    pub sales: i64,
}

/// Apply the decision policy, in priority order, to get the target price
/// before jitter.
pub fn target_price(
    product: &Product,
    competitor: &Competitor,
    config: &PricingConfig,
) -> (PricingDecision, f64) {
    let price = product.price;

    if competitor.price < price && competitor.stock > product.stock {
        (PricingDecision::Undercut, price * config.undercut_multiplier)
    } else if product.stock < config.scarcity_stock {
        (PricingDecision::Scarcity, price * config.scarcity_multiplier)
    } else if product.stock > config.surplus_stock {
        (PricingDecision::Surplus, price * config.surplus_multiplier)
    } else {
        (PricingDecision::Hold, price)
    }
}

/// Draw a jitter multiplier uniformly from `[1 - spread, 1 + spread]`.
pub fn draw_jitter<R: Rng + ?Sized>(rng: &mut R, config: &PricingConfig) -> f64 {
    let spread = config.jitter_spread.abs();
    1.0 + rng.gen_range(-spread..=spread)
}

/// Compute the full recommendation for a product with a given jitter.
pub fn recommend(product: &Product, jitter: f64, config: &PricingConfig) -> PriceRecommendation {
    let competitor = primary_competitor(product);
    let (decision, target) = target_price(product, &competitor, config);

    let optimal_price = round_half_up(target * jitter).max(1);
    let optimal = optimal_price as f64;

    let pressure = if competitor.stock > product.stock {
        -config.competitor_pressure
    } else {
        config.competitor_pressure
    };
    let (sales_lo, sales_hi) = config.sales_bounds;
    let expected_sales_increase =
        round_half_up((product.price - optimal) / product.price.max(1.0) * 100.0 + pressure)
            .clamp(sales_lo, sales_hi);

    let (margin_lo, margin_hi) = config.margin_bounds;
    let cost = (optimal * config.cost_ratio).max(1.0);
    let margin = round_half_up((optimal - cost) / optimal * 100.0).clamp(margin_lo, margin_hi);

    PriceRecommendation {
        product: product.name.clone(),
        base_price: product.price,
        competitor,
        decision,
        jitter,
        optimal_price,
        expected_sales_increase,
        margin,
    }
}

/// Draw a jitter from `rng` and compute the recommendation.
pub fn recommend_with_rng<R: Rng + ?Sized>(
    product: &Product,
    rng: &mut R,
    config: &PricingConfig,
) -> PriceRecommendation {
    let jitter = draw_jitter(rng, config);
    recommend(product, jitter, config)
}

/// Build the synthetic price/sales curve centred on `optimal_price`.
pub fn sales_curve(optimal_price: i64, config: &PricingConfig) -> Vec<CurvePoint> {
    (-config.curve_half_width..=config.curve_half_width)
        .map(|k| {
            let price = optimal_price
                .saturating_add(k.saturating_mul(config.curve_step))
                .max(1);
            let falloff = price
                .saturating_sub(optimal_price)
                .saturating_abs()
                .saturating_mul(config.curve_slope);
            let sales = config.curve_peak.saturating_sub(falloff).max(config.curve_floor);
            CurvePoint { price, sales }
        })
        .collect()
}

/// Pick a product uniformly at random. `None` for an empty list.
pub fn pick_product<'a, R: Rng + ?Sized>(products: &'a [Product], rng: &mut R) -> Option<&'a Product> {
    products.choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn product(stock: i64, price: f64, competitor_stock: i64, competitor_price: f64) -> Product {
        Product::new("Cold Brew", "400001", stock, price)
            .with_fallback(Some(competitor_stock), Some(competitor_price))
    }

    #[test]
    fn test_undercut_example() {
        let config = PricingConfig::default();
        let reco = recommend(&product(10, 100.0, 20, 90.0), 1.0, &config);

        assert_eq!(reco.decision, PricingDecision::Undercut);
        assert_eq!(reco.optimal_price, 90);
        assert_eq!(reco.expected_sales_increase, 5);
        assert_eq!(reco.margin, 40);
    }

    #[test]
    fn test_policy_priority() {
        let config = PricingConfig::default();

        // cheaper but not better stocked -> scarcity applies
        let (decision, target) = target_price(
            &product(10, 100.0, 5, 90.0),
            &Competitor::new("A", 5, 90.0),
            &config,
        );
        assert_eq!(decision, PricingDecision::Scarcity);
        assert!((target - 110.0).abs() < 1e-9);

        let (decision, target) =
            target_price(&product(60, 100.0, 0, 120.0), &Competitor::new("A", 0, 120.0), &config);
        assert_eq!(decision, PricingDecision::Surplus);
        assert!((target - 95.0).abs() < 1e-9);

        let (decision, target) =
            target_price(&product(30, 100.0, 0, 120.0), &Competitor::new("A", 0, 120.0), &config);
        assert_eq!(decision, PricingDecision::Hold);
        assert!((target - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_boundary_stock_holds() {
        let config = PricingConfig::default();
        for stock in [20, 50] {
            let reco = recommend(&product(stock, 100.0, 0, 200.0), 1.0, &config);
            assert_eq!(reco.decision, PricingDecision::Hold);
            assert_eq!(reco.optimal_price, 100);
        }
    }

    #[test]
    fn test_price_floor_and_bounds() {
        let config = PricingConfig::default();
        let reco = recommend(&product(30, 0.2, 0, 5.0), 1.0, &config);

        assert_eq!(reco.optimal_price, 1);
        // cost floors at 1 so the margin bottoms out
        assert_eq!(reco.margin, 5);
        assert!(reco.expected_sales_increase >= -10 && reco.expected_sales_increase <= 40);
    }

    #[test]
    fn test_jitter_within_spread() {
        let config = PricingConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let jitter = draw_jitter(&mut rng, &config);
            assert!((0.97..=1.03).contains(&jitter));
        }
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = PricingConfig::default();
        let p = product(35, 250.0, 10, 260.0);
        let a = recommend_with_rng(&p, &mut StdRng::seed_from_u64(42), &config);
        let b = recommend_with_rng(&p, &mut StdRng::seed_from_u64(42), &config);
        assert_eq!(a, b);
        assert!((243..=258).contains(&a.optimal_price));
    }

    #[test]
    fn test_sales_curve_shape() {
        let curve = sales_curve(90, &PricingConfig::default());
        let prices: Vec<i64> = curve.iter().map(|p| p.price).collect();
        let sales: Vec<i64> = curve.iter().map(|p| p.sales).collect();

        assert_eq!(prices, vec![82, 84, 86, 88, 90, 92, 94, 96, 98]);
        assert_eq!(sales, vec![52, 64, 76, 88, 100, 88, 76, 64, 52]);
    }

    #[test]
    fn test_sales_curve_floors() {
        let curve = sales_curve(3, &PricingConfig::default());
        assert_eq!(curve.len(), 9);
        assert!(curve.iter().all(|p| p.price >= 1 && p.sales >= 10));
        assert_eq!(curve[0].price, 1);
    }

    #[test]
    fn test_huge_price_curve_saturates() {
        let config = PricingConfig::default();
        let reco = recommend(&product(30, 1e30, 0, 2e30), 1.0, &config);
        assert_eq!(reco.optimal_price, i64::MAX);

        let curve = sales_curve(reco.optimal_price, &config);
        assert_eq!(curve.len(), 9);
        assert_eq!(curve[8].price, i64::MAX);
        assert_eq!(curve[4].sales, 100);
    }

    #[test]
    fn test_pick_product_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pick_product(&[], &mut rng).is_none());

        let products = vec![product(1, 1.0, 1, 1.0)];
        assert_eq!(pick_product(&products, &mut rng), Some(&products[0]));
    }
}
