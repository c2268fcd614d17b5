//! The Comparely site.
//!
//! Wires the dataset source, page model and views together:
//! - `Page`: containers and chart canvases standing in for the DOM
//! - `inject_layout`: shared navigation bar and footer
//! - `views`: availability, competitors and pricing pages
//! - `register`: the mock registration flow over a `BrandStore`
//!
//! A page is opened for an explicit `Route`; the matching view loads the
//! dataset and renders into its own containers.

pub mod page;
pub mod register;
pub mod storage;
pub mod views;

pub use page::{ids, lock_page, shared, ChartHandle, Page, PageError, Route, SharedPage};
pub use register::{
    Provider, Redirect, RegistrationError, RegistrationForm, RegistrationHandler, ValidationError,
};
pub use storage::{BrandStore, FileStore, MemoryStore, StorageError};
pub use views::{AvailabilityView, CompetitorsView, PricingView};

use chrono::Datelike;
use comparely_fetch::{DatasetSource, LoadError};
use comparely_insights::GapConfig;
use comparely_pricing::PricingConfig;
use comparely_render::{footer_markup, navbar_markup};
use rand::Rng;
use std::time::Duration;
use thiserror::Error;

/// Site-wide settings.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Dataset path, resolved by the dataset source
    pub dataset_path: String,
    /// Quiet period before the availability search re-renders
    pub search_debounce: Duration,
    /// Storage key for the registered brand
    pub storage_key: String,
    /// Prefix for displayed prices
    pub currency: String,
    /// Availability-gap tuning
    pub gap: GapConfig,
    /// Pricing policy tuning
    pub pricing: PricingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            dataset_path: "data.json".to_string(),
            search_debounce: Duration::from_millis(200),
            storage_key: "ip_registered_brand".to_string(),
            currency: "₹".to_string(),
            gap: GapConfig::default(),
            pricing: PricingConfig::default(),
        }
    }
}

/// Errors from mounting or driving a view.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("No products to choose from")]
    EmptyDataset,

    #[error(transparent)]
    Page(#[from] PageError),
}

/// The current calendar year, for the footer.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Write the navigation bar and footer into whichever of their containers
/// the page has.
pub fn inject_layout(page: &mut Page, year: i32) {
    if !page.set_content(ids::NAVBAR, navbar_markup()) {
        tracing::debug!("No navbar container");
    }
    if !page.set_content(ids::FOOTER, footer_markup(year)) {
        tracing::debug!("No footer container");
    }
}

/// A view mounted on a page.
pub enum MountedView<R> {
    Availability(AvailabilityView),
    Competitors(CompetitorsView),
    Pricing(PricingView<R>),
    Registration,
}

/// Serves pages from one dataset source.
pub struct Site<S> {
    source: S,
    config: SiteConfig,
}

impl<S: DatasetSource> Site<S> {
    pub fn new(source: S, config: SiteConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Open the standard page for `route` and mount its view.
    pub async fn open<R: Rng>(
        &self,
        route: Route,
        rng: R,
    ) -> Result<(SharedPage, Option<MountedView<R>>), ViewError> {
        let page = shared(Page::new(route));
        let view = self.mount(&page, rng).await?;
        Ok((page, view))
    }

    /// Inject the layout, then mount the view the page's route selects.
    pub async fn mount<R: Rng>(
        &self,
        page: &SharedPage,
        rng: R,
    ) -> Result<Option<MountedView<R>>, ViewError> {
        let route = {
            let mut page = lock_page(page);
            inject_layout(&mut page, current_year());
            page.route()
        };
        tracing::debug!(%route, source = self.source.name(), "Mounting view");

        let view = match route {
            Route::Availability => {
                AvailabilityView::mount(&self.source, page.clone(), &self.config)
                    .await?
                    .map(MountedView::Availability)
            }
            Route::Competitors => CompetitorsView::mount(&self.source, page, &self.config)
                .await?
                .map(MountedView::Competitors),
            Route::Pricing => PricingView::mount(&self.source, page, &self.config, rng)
                .await?
                .map(MountedView::Pricing),
            Route::Registration => lock_page(page)
                .has(ids::REGISTER_FORM)
                .then_some(MountedView::Registration),
        };
        Ok(view)
    }

    /// Registration handler writing to `store`.
    pub fn registration<B: BrandStore>(&self, store: B) -> RegistrationHandler<B> {
        RegistrationHandler::new(store, &self.config)
    }
}
