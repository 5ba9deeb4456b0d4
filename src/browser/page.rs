use crate::error::Result;
use serde::Deserialize;

/// One snapshot of page load state, taken by evaluating a script in the tab
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageProbe {
    /// `document.readyState`: `loading`, `interactive` or `complete`
    pub ready_state: String,

    /// Number of resource timing entries recorded so far
    pub resource_count: usize,

    /// HTTP status of the document response, when the browser exposes it
    #[serde(default)]
    pub status: Option<u16>,

    /// Whether any of the probed table selectors matched
    pub table_present: bool,
}

impl PageProbe {
    /// DOMContentLoaded has fired
    pub fn dom_loaded(&self) -> bool {
        matches!(self.ready_state.as_str(), "interactive" | "complete")
    }

    pub fn load_complete(&self) -> bool {
        self.ready_state == "complete"
    }
}

/// A single browser tab as seen by the navigator and the extractor.
///
/// Implemented by the live Chrome session and by test doubles.
pub trait PageHandle {
    /// Start navigating to `url`. Returns once the browser accepted the request.
    fn goto(&self, url: &str) -> Result<()>;

    /// Sample load state, checking each of `table_selectors` for presence
    fn probe(&self, table_selectors: &[&str]) -> Result<PageProbe>;

    /// Trimmed text of the first three cells of each `tr` under `selector`.
    ///
    /// `None` when `selector` matches nothing.
    fn table_rows(&self, selector: &str) -> Result<Option<Vec<Vec<String>>>>;
}

/// Build the probe script with the selectors passed as a JSON array literal
pub(crate) fn probe_script(table_selectors: &[&str]) -> String {
    let args = serde_json::to_string(table_selectors).unwrap_or_else(|_| "[]".to_string());
    format!("({})({})", include_str!("probe_page.js").trim(), args)
}

/// Build the row serialization script for one selector
pub(crate) fn table_rows_script(selector: &str) -> String {
    let arg = serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".to_string());
    format!("({})({})", include_str!("table_rows.js").trim(), arg)
}
