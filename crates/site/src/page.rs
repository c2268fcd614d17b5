//! In-memory page: named containers and chart canvases.
//!
//! Views write markup or plain text into containers by id and draw charts
//! onto canvases. Plain text is escaped only when the page is rendered.
//! A canvas holds at most one chart; the holder of the `ChartHandle` must
//! destroy it before anything else can be drawn there.

use comparely_render::{escape_html, ChartConfig};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Container and canvas ids.
pub mod ids {
    pub const NAVBAR: &str = "navbar";
    pub const FOOTER: &str = "footer";

    pub const AVAILABILITY_ROWS: &str = "availability-rows";
    pub const AVAILABILITY_SEARCH: &str = "availability-search";
    pub const AVAILABILITY_CHART: &str = "availability-chart";

    pub const COMPETITOR_ROWS: &str = "competitor-rows";
    pub const COMPETITORS_CHART: &str = "competitors-chart";
    pub const AI_RECO: &str = "ai-reco";

    pub const PRICING_CONTAINER: &str = "pricing-container";
    pub const GENERATE_STRATEGY: &str = "generate-strategy";
    pub const RECO_PRICE: &str = "reco-price";
    pub const RECO_SALES: &str = "reco-sales";
    pub const RECO_MARGIN: &str = "reco-margin";
    pub const PRICING_CHART: &str = "pricing-chart";

    pub const REGISTER_FORM: &str = "register-form";
    pub const BLINKIT_BTN: &str = "blinkit-btn";
    pub const ZEPTO_BTN: &str = "zepto-btn";
    pub const GOAT_BTN: &str = "goat-btn";
}

/// The pages of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Availability,
    Competitors,
    Pricing,
    Registration,
}

impl Route {
    pub const ALL: [Route; 4] = [
        Route::Availability,
        Route::Competitors,
        Route::Pricing,
        Route::Registration,
    ];

    /// File the page is served as.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Availability => "availability.html",
            Self::Competitors => "competitors.html",
            Self::Pricing => "pricing.html",
            Self::Registration => "register.html",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Availability => "Availability",
            Self::Competitors => "Competitors",
            Self::Pricing => "Pricing",
            Self::Registration => "Register",
        }
    }

    /// Markup containers the page template carries, besides the layout.
    pub fn containers(&self) -> &'static [&'static str] {
        match self {
            Self::Availability => &[ids::AVAILABILITY_SEARCH, ids::AVAILABILITY_ROWS],
            Self::Competitors => &[ids::COMPETITOR_ROWS, ids::AI_RECO],
            Self::Pricing => &[
                ids::PRICING_CONTAINER,
                ids::GENERATE_STRATEGY,
                ids::RECO_PRICE,
                ids::RECO_SALES,
                ids::RECO_MARGIN,
            ],
            Self::Registration => &[
                ids::REGISTER_FORM,
                ids::BLINKIT_BTN,
                ids::ZEPTO_BTN,
                ids::GOAT_BTN,
            ],
        }
    }

    /// Chart canvases the page template carries.
    pub fn canvases(&self) -> &'static [&'static str] {
        match self {
            Self::Availability => &[ids::AVAILABILITY_CHART],
            Self::Competitors => &[ids::COMPETITORS_CHART],
            Self::Pricing => &[ids::PRICING_CHART],
            Self::Registration => &[],
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Availability => "availability",
            Self::Competitors => "competitors",
            Self::Pricing => "pricing",
            Self::Registration => "registration",
        })
    }
}

#[derive(Debug, Error)]
#[error("Unknown page: {0}")]
pub struct UnknownRoute(pub String);

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_end_matches(".html").to_lowercase();
        match name.as_str() {
            "availability" => Ok(Self::Availability),
            "competitors" => Ok(Self::Competitors),
            "pricing" => Ok(Self::Pricing),
            "register" | "registration" => Ok(Self::Registration),
            _ => Err(UnknownRoute(s.to_string())),
        }
    }
}

/// Errors from drawing on a page.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("No canvas with id {0}")]
    MissingCanvas(String),

    #[error("Canvas {0} already holds a chart")]
    CanvasInUse(String),
}

/// Proof of ownership of the chart drawn on a canvas.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a chart handle must be kept to destroy the chart later"]
pub struct ChartHandle {
    id: u64,
    canvas: String,
}

impl ChartHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn canvas(&self) -> &str {
        &self.canvas
    }
}

#[derive(Debug, Clone)]
struct DrawnChart {
    id: u64,
    config: ChartConfig,
}

/// Serializable view of a page, for JSON output.
#[derive(Debug, Serialize)]
pub struct PageSnapshot<'a> {
    pub route: Route,
    pub containers: &'a BTreeMap<String, String>,
    pub charts: BTreeMap<&'a str, Option<&'a ChartConfig>>,
}

/// A page of the site.
#[derive(Debug, Clone)]
pub struct Page {
    route: Route,
    containers: BTreeMap<String, String>,
    text_ids: BTreeSet<String>,
    canvases: BTreeMap<String, Option<DrawnChart>>,
    next_chart_id: u64,
}

impl Page {
    /// A page with the layout slots and every container its route declares.
    pub fn new(route: Route) -> Self {
        let mut page = Self::empty(route)
            .with_container(ids::NAVBAR)
            .with_container(ids::FOOTER);
        for id in route.containers() {
            page = page.with_container(id);
        }
        for id in route.canvases() {
            page = page.with_canvas(id);
        }
        page
    }

    /// A page with no containers at all.
    pub fn empty(route: Route) -> Self {
        Self {
            route,
            containers: BTreeMap::new(),
            text_ids: BTreeSet::new(),
            canvases: BTreeMap::new(),
            next_chart_id: 1,
        }
    }

    pub fn with_container(mut self, id: &str) -> Self {
        self.containers.entry(id.to_string()).or_default();
        self
    }

    pub fn with_canvas(mut self, id: &str) -> Self {
        self.canvases.entry(id.to_string()).or_default();
        self
    }

    /// Remove a container or canvas.
    pub fn without(mut self, id: &str) -> Self {
        self.containers.remove(id);
        self.text_ids.remove(id);
        self.canvases.remove(id);
        self
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Whether a container or canvas with this id exists.
    pub fn has(&self, id: &str) -> bool {
        self.containers.contains_key(id) || self.canvases.contains_key(id)
    }

    pub fn has_all(&self, ids: &[&str]) -> bool {
        ids.iter().all(|id| self.has(id))
    }

    /// Replace a container's content with markup. Returns false if there is
    /// no such container.
    pub fn set_content(&mut self, id: &str, content: impl Into<String>) -> bool {
        self.replace(id, content.into(), false)
    }

    /// Replace a container's content with plain text. Returns false if there
    /// is no such container.
    pub fn set_text(&mut self, id: &str, text: impl Into<String>) -> bool {
        self.replace(id, text.into(), true)
    }

    fn replace(&mut self, id: &str, content: String, is_text: bool) -> bool {
        let Some(slot) = self.containers.get_mut(id) else {
            return false;
        };
        *slot = content;
        if is_text {
            self.text_ids.insert(id.to_string());
        } else {
            self.text_ids.remove(id);
        }
        true
    }

    pub fn content(&self, id: &str) -> Option<&str> {
        self.containers.get(id).map(String::as_str)
    }

    /// Draw a chart on an empty canvas.
    pub fn draw_chart(&mut self, canvas: &str, config: ChartConfig) -> Result<ChartHandle, PageError> {
        let slot = self
            .canvases
            .get_mut(canvas)
            .ok_or_else(|| PageError::MissingCanvas(canvas.to_string()))?;
        if slot.is_some() {
            return Err(PageError::CanvasInUse(canvas.to_string()));
        }

        let id = self.next_chart_id;
        self.next_chart_id += 1;
        *slot = Some(DrawnChart { id, config });
        tracing::debug!(canvas, chart = id, "Chart drawn");

        Ok(ChartHandle {
            id,
            canvas: canvas.to_string(),
        })
    }

    /// Destroy the chart a handle refers to, clearing its canvas.
    pub fn destroy_chart(&mut self, handle: ChartHandle) {
        if let Some(slot) = self.canvases.get_mut(&handle.canvas) {
            if slot.as_ref().is_some_and(|drawn| drawn.id == handle.id) {
                *slot = None;
                tracing::debug!(canvas = %handle.canvas, chart = handle.id, "Chart destroyed");
            }
        }
    }

    /// Configuration of the chart currently on a canvas.
    pub fn chart(&self, canvas: &str) -> Option<&ChartConfig> {
        self.canvases
            .get(canvas)
            .and_then(|slot| slot.as_ref())
            .map(|drawn| &drawn.config)
    }

    /// Id of the chart currently on a canvas.
    pub fn chart_id(&self, canvas: &str) -> Option<u64> {
        self.canvases
            .get(canvas)
            .and_then(|slot| slot.as_ref())
            .map(|drawn| drawn.id)
    }

    pub fn snapshot(&self) -> PageSnapshot<'_> {
        PageSnapshot {
            route: self.route,
            containers: &self.containers,
            charts: self
                .canvases
                .iter()
                .map(|(id, slot)| (id.as_str(), slot.as_ref().map(|d| &d.config)))
                .collect(),
        }
    }

    /// Render the page as a standalone HTML document.
    pub fn to_html(&self) -> String {
        let mut body = String::new();

        for (id, content) in &self.containers {
            body.push_str(&element(id, content, self.text_ids.contains(id)));
            body.push('\n');
        }

        for (id, slot) in &self.canvases {
            body.push_str(&format!("<canvas id=\"{}\"></canvas>\n", escape_html(id)));
            if let Some(drawn) = slot {
                let json = serde_json::to_string(&drawn.config)
                    .unwrap_or_default()
                    .replace("</", "<\\/");
                body.push_str(&format!(
                    "<script type=\"application/json\" data-chart-for=\"{}\">{}</script>\n",
                    escape_html(id),
                    json
                ));
            }
        }

        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Comparely · {}</title>\n</head>\n<body data-route=\"{}\">\n{}</body>\n</html>\n",
            self.route.title(),
            self.route,
            body
        )
    }
}

/// The element a container id is rendered as.
fn element(id: &str, content: &str, is_text: bool) -> String {
    let id_attr = escape_html(id);
    if id.ends_with("-rows") {
        format!("<table><tbody id=\"{id_attr}\">{content}</tbody></table>")
    } else if id == ids::AVAILABILITY_SEARCH {
        format!(
            "<input id=\"{id_attr}\" type=\"search\" value=\"{}\">",
            escape_html(content)
        )
    } else if id == ids::GENERATE_STRATEGY {
        format!("<button id=\"{id_attr}\">Generate strategy</button>")
    } else if let Some(provider) = id.strip_suffix("-btn") {
        format!("<button id=\"{id_attr}\" data-provider=\"{provider}\">{provider}</button>")
    } else if id == ids::REGISTER_FORM {
        format!(
            "<form id=\"{id_attr}\"><input name=\"brand\"><input name=\"email\" type=\"email\">\
             <input name=\"password\" type=\"password\"><button type=\"submit\">Register</button></form>"
        )
    } else if is_text {
        format!("<div id=\"{id_attr}\">{}</div>", escape_html(content))
    } else {
        format!("<div id=\"{id_attr}\">{content}</div>")
    }
}

/// A page shared between a view and its deferred re-renders.
pub type SharedPage = Arc<Mutex<Page>>;

pub fn shared(page: Page) -> SharedPage {
    Arc::new(Mutex::new(page))
}

/// Lock a shared page. A poisoned lock still yields the page.
pub fn lock_page(page: &SharedPage) -> MutexGuard<'_, Page> {
    page.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use comparely_render::{ChartData, ChartKind};
    use serde_json::json;

    fn config() -> ChartConfig {
        ChartConfig {
            kind: ChartKind::Bar,
            data: ChartData::default(),
            options: json!({}),
        }
    }

    #[test]
    fn test_route_parsing() {
        assert_eq!("pricing".parse::<Route>().unwrap(), Route::Pricing);
        assert_eq!("Competitors.html".parse::<Route>().unwrap(), Route::Competitors);
        assert_eq!("register".parse::<Route>().unwrap(), Route::Registration);
        assert!("index".parse::<Route>().is_err());
    }

    #[test]
    fn test_page_carries_route_containers() {
        let page = Page::new(Route::Availability);
        assert!(page.has_all(&[
            ids::NAVBAR,
            ids::FOOTER,
            ids::AVAILABILITY_ROWS,
            ids::AVAILABILITY_SEARCH,
            ids::AVAILABILITY_CHART,
        ]));
        assert!(!page.has(ids::AI_RECO));
    }

    #[test]
    fn test_set_content_skips_missing() {
        let mut page = Page::empty(Route::Pricing).with_container(ids::RECO_PRICE);
        assert!(page.set_content(ids::RECO_PRICE, "₹90"));
        assert!(!page.set_content(ids::RECO_SALES, "5%"));
        assert_eq!(page.content(ids::RECO_PRICE), Some("₹90"));
        assert_eq!(page.content(ids::RECO_SALES), None);
    }

    #[test]
    fn test_canvas_holds_one_chart() {
        let mut page = Page::new(Route::Pricing);
        let first = page.draw_chart(ids::PRICING_CHART, config()).unwrap();

        assert_eq!(
            page.draw_chart(ids::PRICING_CHART, config()),
            Err(PageError::CanvasInUse(ids::PRICING_CHART.to_string()))
        );

        page.destroy_chart(first);
        assert!(page.chart(ids::PRICING_CHART).is_none());

        let second = page.draw_chart(ids::PRICING_CHART, config()).unwrap();
        assert_eq!(second.id(), 2);
        assert_eq!(page.chart_id(ids::PRICING_CHART), Some(2));
    }

    #[test]
    fn test_draw_on_missing_canvas() {
        let mut page = Page::empty(Route::Pricing);
        assert_eq!(
            page.draw_chart(ids::PRICING_CHART, config()),
            Err(PageError::MissingCanvas(ids::PRICING_CHART.to_string()))
        );
    }

    #[test]
    fn test_text_escaped_only_in_html() {
        let mut page = Page::new(Route::Competitors);
        assert!(page.set_text(ids::AI_RECO, "Zone A&B <north>"));
        page.set_content(ids::COMPETITOR_ROWS, "<tr><td>A&amp;B</td></tr>");

        assert_eq!(page.content(ids::AI_RECO), Some("Zone A&B <north>"));
        let snapshot = serde_json::to_value(page.snapshot()).unwrap();
        assert_eq!(snapshot["containers"]["ai-reco"], "Zone A&B <north>");

        let html = page.to_html();
        assert!(html.contains("<div id=\"ai-reco\">Zone A&amp;B &lt;north&gt;</div>"));
        assert!(html.contains("<tbody id=\"competitor-rows\"><tr><td>A&amp;B</td></tr></tbody>"));

        // markup written later is no longer treated as text
        page.set_content(ids::AI_RECO, "<b>bold</b>");
        assert!(page.to_html().contains("<div id=\"ai-reco\"><b>bold</b></div>"));
    }

    #[test]
    fn test_html_embeds_chart() {
        let mut page = Page::new(Route::Availability);
        page.set_content(ids::AVAILABILITY_SEARCH, "\"milk\"");
        let _handle = page.draw_chart(ids::AVAILABILITY_CHART, config()).unwrap();
        let html = page.to_html();

        assert!(html.contains("<body data-route=\"availability\">"));
        assert!(html.contains("<tbody id=\"availability-rows\">"));
        assert!(html.contains("value=\"&quot;milk&quot;\""));
        assert!(html.contains("data-chart-for=\"availability-chart\">{\"type\":\"bar\""));
    }
}
