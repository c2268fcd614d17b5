//! Stock availability page: filterable table plus stock by region code.

use crate::page::{ids, lock_page, ChartHandle, Page, SharedPage};
use crate::{SiteConfig, ViewError};
use comparely_fetch::{load_dataset, DatasetSource};
use comparely_filter::{filter_products, Debouncer};
use comparely_insights::region_totals;
use comparely_model::Product;
use comparely_render::{availability_chart, availability_rows};
use std::sync::Arc;

const REQUIRED: [&str; 3] = [
    ids::AVAILABILITY_ROWS,
    ids::AVAILABILITY_SEARCH,
    ids::AVAILABILITY_CHART,
];

pub struct AvailabilityView {
    products: Arc<Vec<Product>>,
    page: SharedPage,
    chart: ChartHandle,
    search: Debouncer<String>,
}

impl AvailabilityView {
    /// Load the dataset and render the page. `None` if the page lacks the
    /// availability containers.
    pub async fn mount<S: DatasetSource>(
        source: &S,
        page: SharedPage,
        config: &SiteConfig,
    ) -> Result<Option<Self>, ViewError> {
        if !lock_page(&page).has_all(&REQUIRED) {
            tracing::debug!("Availability containers absent, skipping");
            return Ok(None);
        }

        let dataset = load_dataset(source, &config.dataset_path).await?;
        Self::render(dataset.products, page, config).map(Some)
    }

    /// Render already-loaded products.
    pub fn render(products: Vec<Product>, page: SharedPage, config: &SiteConfig) -> Result<Self, ViewError> {
        let products = Arc::new(products);

        let chart = {
            let mut page = lock_page(&page);
            page.set_content(ids::AVAILABILITY_ROWS, availability_rows(products.iter()));
            page.draw_chart(ids::AVAILABILITY_CHART, availability_chart(&region_totals(&products)))?
        };

        let search = {
            let products = Arc::clone(&products);
            let page = Arc::clone(&page);
            Debouncer::new(config.search_debounce, move |query: String| {
                render_filtered(&mut lock_page(&page), &products, &query);
            })
        };

        tracing::info!(products = products.len(), "Availability view mounted");
        Ok(Self {
            products,
            page,
            chart,
            search,
        })
    }

    /// Record the search input and re-render the table once typing pauses.
    pub fn search(&self, query: impl Into<String>) {
        let query = query.into();
        lock_page(&self.page).set_text(ids::AVAILABILITY_SEARCH, query.clone());
        self.search.call(query);
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn chart(&self) -> &ChartHandle {
        &self.chart
    }
}

fn render_filtered(page: &mut Page, products: &[Product], query: &str) {
    let matches = filter_products(products, query);
    tracing::debug!(query, matches = matches.len(), "Filtering availability table");
    page.set_content(ids::AVAILABILITY_ROWS, availability_rows(matches));
}
