//! Search filtering and input debouncing.
//!
//! - `ProductQuery`: case-insensitive substring match on name or region code
//! - `Debouncer`: collapses bursts of calls into one call after a quiet period

use comparely_model::Product;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// A normalized search query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    needle: String,
}

impl ProductQuery {
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.to_lowercase(),
        }
    }

    /// An empty query matches everything.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, product: &Product) -> bool {
        product.name.to_lowercase().contains(&self.needle)
            || product.pincode.to_lowercase().contains(&self.needle)
    }
}

/// Keep the products matching `query`, in their original order.
pub fn filter_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let query = ProductQuery::new(query);
    products.iter().filter(|p| query.matches(p)).collect()
}

/// Delays an action until calls stop arriving for `delay`.
///
/// Each `call` cancels the pending one and schedules a fresh call with the
/// latest argument. Calls are fire-and-forget. Must be used from within a
/// tokio runtime.
pub struct Debouncer<T> {
    delay: Duration,
    action: Arc<dyn Fn(T) + Send + Sync>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(delay: Duration, action: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            delay,
            action: Arc::new(action),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule the action with `arg`, replacing any pending call.
    pub fn call(&self, arg: T) {
        let deadline = Instant::now() + self.delay;
        let action = Arc::clone(&self.action);

        let task = tokio::spawn(async move {
            sleep_until(deadline).await;
            action(arg);
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(task) {
            previous.abort();
            tracing::trace!("Debounced call superseded");
        }
    }

    /// Drop the pending call, if any.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = pending.take() {
            task.abort();
        }
    }
}
