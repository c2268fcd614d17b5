//! Page views. Each one loads the dataset itself and renders into its own
//! containers.

mod availability;
mod competitors;
mod pricing;

pub use availability::AvailabilityView;
pub use competitors::CompetitorsView;
pub use pricing::PricingView;
