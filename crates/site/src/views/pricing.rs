//! Pricing strategy page.
//!
//! Each cycle picks a random product, computes its strategy and redraws
//! the price/sales curve. The view owns at most one chart handle and
//! destroys it before drawing the next chart.

use crate::page::{ids, lock_page, ChartHandle, Page, SharedPage};
use crate::{SiteConfig, ViewError};
use comparely_fetch::{load_dataset, DatasetSource};
use comparely_model::Product;
use comparely_pricing::{
    draw_jitter, pick_product, recommend, sales_curve, PriceRecommendation, PricingConfig,
};
use comparely_render::{margin_text, price_text, pricing_chart, sales_text};
use rand::Rng;

const REQUIRED: [&str; 6] = [
    ids::PRICING_CONTAINER,
    ids::GENERATE_STRATEGY,
    ids::RECO_PRICE,
    ids::RECO_SALES,
    ids::RECO_MARGIN,
    ids::PRICING_CHART,
];

pub struct PricingView<R> {
    products: Vec<Product>,
    rng: R,
    config: PricingConfig,
    currency: String,
    current: Option<Product>,
    recommendation: Option<PriceRecommendation>,
    chart: Option<ChartHandle>,
}

impl<R: Rng> PricingView<R> {
    pub fn new(products: Vec<Product>, rng: R, config: &SiteConfig) -> Self {
        Self {
            products,
            rng,
            config: config.pricing.clone(),
            currency: config.currency.clone(),
            current: None,
            recommendation: None,
            chart: None,
        }
    }

    /// Load the dataset and run the first cycle. `None` if the page lacks
    /// the pricing containers.
    pub async fn mount<S: DatasetSource>(
        source: &S,
        page: &SharedPage,
        config: &SiteConfig,
        rng: R,
    ) -> Result<Option<Self>, ViewError> {
        if !lock_page(page).has_all(&REQUIRED) {
            tracing::debug!("Pricing containers absent, skipping");
            return Ok(None);
        }

        let dataset = load_dataset(source, &config.dataset_path).await?;
        let mut view = Self::new(dataset.products, rng, config);
        view.regenerate(&mut lock_page(page))?;
        Ok(Some(view))
    }

    /// Pick a random product and show a freshly jittered strategy for it.
    pub fn regenerate(&mut self, page: &mut Page) -> Result<&PriceRecommendation, ViewError> {
        let product = pick_product(&self.products, &mut self.rng)
            .cloned()
            .ok_or(ViewError::EmptyDataset)?;
        let jitter = draw_jitter(&mut self.rng, &self.config);
        self.show(page, product, jitter)
    }

    /// Compute and render the strategy for `product` with a fixed jitter.
    pub fn show(
        &mut self,
        page: &mut Page,
        product: Product,
        jitter: f64,
    ) -> Result<&PriceRecommendation, ViewError> {
        let reco = recommend(&product, jitter, &self.config);
        let curve = sales_curve(reco.optimal_price, &self.config);

        page.set_text(ids::RECO_PRICE, price_text(&self.currency, reco.optimal_price));
        page.set_text(ids::RECO_SALES, sales_text(reco.expected_sales_increase));
        page.set_text(ids::RECO_MARGIN, margin_text(reco.margin));

        if let Some(previous) = self.chart.take() {
            page.destroy_chart(previous);
        }
        self.chart = Some(page.draw_chart(ids::PRICING_CHART, pricing_chart(&curve, &self.currency))?);

        tracing::info!(
            product = %product.name,
            decision = ?reco.decision,
            price = reco.optimal_price,
            "Pricing strategy generated"
        );
        self.current = Some(product);
        Ok(self.recommendation.insert(reco))
    }

    pub fn current(&self) -> Option<&Product> {
        self.current.as_ref()
    }

    pub fn recommendation(&self) -> Option<&PriceRecommendation> {
        self.recommendation.as_ref()
    }

    pub fn chart(&self) -> Option<&ChartHandle> {
        self.chart.as_ref()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}
