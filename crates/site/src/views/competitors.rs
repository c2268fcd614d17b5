//! Competitor comparison page.

use crate::page::{ids, lock_page, ChartHandle, Page, SharedPage};
use crate::{SiteConfig, ViewError};
use comparely_fetch::{load_dataset, DatasetSource};
use comparely_insights::{availability_gap, AvailabilityGap};
use comparely_model::Product;
use comparely_render::{availability_message, competitor_rows, competitors_chart};

const REQUIRED: [&str; 3] = [ids::COMPETITOR_ROWS, ids::COMPETITORS_CHART, ids::AI_RECO];

pub struct CompetitorsView {
    products: Vec<Product>,
    chart: ChartHandle,
    gap: Option<AvailabilityGap>,
    recommendation: String,
}

impl CompetitorsView {
    /// Load the dataset and render the page. `None` if the page lacks the
    /// competitor containers.
    pub async fn mount<S: DatasetSource>(
        source: &S,
        page: &SharedPage,
        config: &SiteConfig,
    ) -> Result<Option<Self>, ViewError> {
        if !lock_page(page).has_all(&REQUIRED) {
            tracing::debug!("Competitor containers absent, skipping");
            return Ok(None);
        }

        let dataset = load_dataset(source, &config.dataset_path).await?;
        Self::render(dataset.products, &mut lock_page(page), config).map(Some)
    }

    /// Render already-loaded products.
    pub fn render(products: Vec<Product>, page: &mut Page, config: &SiteConfig) -> Result<Self, ViewError> {
        page.set_content(ids::COMPETITOR_ROWS, competitor_rows(&products));
        let chart = page.draw_chart(ids::COMPETITORS_CHART, competitors_chart(&products))?;

        let gap = availability_gap(&products, &config.gap);
        let recommendation = availability_message(gap.as_ref());
        page.set_text(ids::AI_RECO, recommendation.clone());

        tracing::info!(products = products.len(), gap = gap.is_some(), "Competitors view mounted");
        Ok(Self {
            products,
            chart,
            gap,
            recommendation,
        })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn gap(&self) -> Option<&AvailabilityGap> {
        self.gap.as_ref()
    }

    pub fn recommendation(&self) -> &str {
        &self.recommendation
    }

    pub fn chart(&self) -> &ChartHandle {
        &self.chart
    }
}
