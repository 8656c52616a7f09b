//! Live-DOM surface backed by a WebDriver session.
//!
//! Row keys are pinned onto rendered rows as a tagged attribute, then
//! revalidated on every read; nothing DOM-side is trusted across a
//! suspension point.

use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Value};

use crate::{
    ChatSurface, PanelSnapshot, RowKey, RowSnapshot, StructuralError, SurfaceError,
};

/// Attribute used to pin a stable key onto rendered rows.
const KEY_ATTR: &str = "data-harvest-key";

/// CSS selectors for the host application's structure. All overridable:
/// none of them are under our control, and they drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Scrollable list container.
    pub list_container: String,
    /// One rendered list row.
    pub row: String,
    /// Title-bearing element inside a row.
    pub row_title: String,
    /// Conversation header candidates, tried in order.
    pub headers: Vec<String>,
    /// Panel-triggering sub-element inside the header.
    pub header_title: String,
    /// Detail panel candidates, tried in order.
    pub panels: Vec<String>,
    /// Directional inline fragments inside the panel.
    pub directional_fragment: String,
    /// Explicit panel close control.
    pub close_button: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            list_container: "#pane-side".to_string(),
            row: r#"div[role="row"]"#.to_string(),
            row_title: "span[title]".to_string(),
            headers: vec![
                "#main header".to_string(),
                r#"header[data-testid="conversation-header"]"#.to_string(),
            ],
            header_title: "span[title]".to_string(),
            panels: vec!["aside".to_string(), "section".to_string()],
            directional_fragment: r#"span[dir="auto"]"#.to_string(),
            close_button: r#"div[aria-label="Close"]"#.to_string(),
        }
    }
}

pub struct WebDriverSurface {
    client: Client,
    selectors: SelectorConfig,
}

impl WebDriverSurface {
    pub fn new(client: Client, selectors: SelectorConfig) -> Self {
        Self { client, selectors }
    }

    /// Connect to a WebDriver endpoint and wrap the session.
    pub async fn connect(
        webdriver_url: &str,
        selectors: SelectorConfig,
    ) -> Result<Self, StructuralError> {
        let client = ClientBuilder::native()
            .connect(webdriver_url)
            .await
            .map_err(|err| StructuralError::Session(err.to_string()))?;
        Ok(Self::new(client, selectors))
    }

    /// End the WebDriver session.
    pub async fn close(self) -> Result<(), SurfaceError> {
        self.client.close().await.map_err(driver_err)
    }

    async fn execute(&mut self, script: &str, args: Vec<Value>) -> Result<Value, SurfaceError> {
        self.client.execute(script, args).await.map_err(driver_err)
    }

    fn row_selector(&self, key: &RowKey) -> String {
        format!(r#"[{KEY_ATTR}="{}"]"#, key.as_str())
    }
}

#[async_trait]
impl ChatSurface for WebDriverSurface {
    async fn ensure_list_present(&mut self) -> Result<(), StructuralError> {
        let script = "return document.querySelector(arguments[0]) !== null;";
        let found = self
            .client
            .execute(script, vec![json!(self.selectors.list_container)])
            .await
            .map_err(|err| StructuralError::Session(err.to_string()))?;
        if found.as_bool().unwrap_or(false) {
            Ok(())
        } else {
            Err(StructuralError::ListMissing)
        }
    }

    async fn rendered_rows(&mut self) -> Result<Vec<RowSnapshot>, SurfaceError> {
        let script = r#"
            const rows = Array.from(document.querySelectorAll(arguments[0]));
            let next = window.__harvestNextKey || 0;
            const out = [];
            for (const row of rows) {
                if (!row.hasAttribute(arguments[2])) {
                    row.setAttribute(arguments[2], String(next));
                    next += 1;
                }
                const title = row.querySelector(arguments[1]);
                out.push({
                    key: row.getAttribute(arguments[2]),
                    title: title ? title.getAttribute('title') : null,
                });
            }
            window.__harvestNextKey = next;
            return out;
        "#;
        let value = self
            .execute(
                script,
                vec![
                    json!(self.selectors.row),
                    json!(self.selectors.row_title),
                    json!(KEY_ATTR),
                ],
            )
            .await?;
        parse_rows(&value)
    }

    async fn scroll_row_into_view(&mut self, key: &RowKey) -> Result<(), SurfaceError> {
        let script = r#"
            const row = document.querySelector(arguments[0]);
            if (!row) return false;
            row.scrollIntoView({ block: 'center', behavior: 'instant' });
            return true;
        "#;
        let selector = self.row_selector(key);
        let ok = self.execute(script, vec![json!(selector)]).await?;
        if ok.as_bool().unwrap_or(false) {
            Ok(())
        } else {
            Err(SurfaceError::NotFound(selector))
        }
    }

    async fn activate_row(&mut self, key: &RowKey) -> Result<(), SurfaceError> {
        // Synthetic press/release/click; the host listens for the discrete
        // phases.
        let script = r#"
            const row = document.querySelector(arguments[0]);
            if (!row) return false;
            for (const type of ['mousedown', 'mouseup', 'click']) {
                row.dispatchEvent(new MouseEvent(type, {
                    bubbles: true, cancelable: true, view: window,
                }));
            }
            return true;
        "#;
        let selector = self.row_selector(key);
        let ok = self.execute(script, vec![json!(selector)]).await?;
        if !ok.as_bool().unwrap_or(false) {
            return Err(SurfaceError::NotFound(selector));
        }

        // High-level click as well, unconditionally.
        let element = self
            .client
            .find(Locator::Css(&selector))
            .await
            .map_err(driver_err)?;
        element.click().await.map_err(driver_err)?;
        Ok(())
    }

    async fn row_text(&mut self, key: &RowKey) -> Result<String, SurfaceError> {
        let script = r#"
            const row = document.querySelector(arguments[0]);
            return row ? row.innerText : null;
        "#;
        let selector = self.row_selector(key);
        let value = self.execute(script, vec![json!(selector)]).await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or(SurfaceError::NotFound(selector))
    }

    async fn list_scroll_offset(&mut self) -> Result<f64, SurfaceError> {
        let script = r#"
            const list = document.querySelector(arguments[0]);
            return list ? list.scrollTop : null;
        "#;
        let value = self
            .execute(script, vec![json!(self.selectors.list_container)])
            .await?;
        value
            .as_f64()
            .ok_or_else(|| SurfaceError::NotFound(self.selectors.list_container.clone()))
    }

    async fn scroll_list_by(&mut self, delta: f64) -> Result<(), SurfaceError> {
        let script = r#"
            const list = document.querySelector(arguments[0]);
            if (!list) return false;
            list.scrollTop += arguments[1];
            return true;
        "#;
        let ok = self
            .execute(
                script,
                vec![json!(self.selectors.list_container), json!(delta)],
            )
            .await?;
        if ok.as_bool().unwrap_or(false) {
            Ok(())
        } else {
            Err(SurfaceError::NotFound(self.selectors.list_container.clone()))
        }
    }

    async fn open_detail_panel(&mut self) -> Result<bool, SurfaceError> {
        // Click the title sub-element inside the first header candidate
        // that exists; fall back to clicking the header itself.
        let script = r#"
            let header = null;
            for (const sel of arguments[0]) {
                header = document.querySelector(sel);
                if (header) break;
            }
            if (!header) return false;
            const title = header.querySelector(arguments[1]);
            if (title) {
                title.click();
            } else {
                header.click();
            }
            return true;
        "#;
        let value = self
            .execute(
                script,
                vec![
                    json!(self.selectors.headers),
                    json!(self.selectors.header_title),
                ],
            )
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn read_panel(&mut self) -> Result<Option<PanelSnapshot>, SurfaceError> {
        let script = r#"
            let panel = null;
            for (const sel of arguments[0]) {
                panel = document.querySelector(sel);
                if (panel) break;
            }
            if (!panel) return null;
            const spans = Array.from(panel.getElementsByTagName('span'));
            const dirs = Array.from(panel.querySelectorAll(arguments[1]));
            return {
                text: panel.innerText || '',
                fragments: spans.map(s => s.innerText || ''),
                directional: dirs.map(s => s.innerText || ''),
            };
        "#;
        let value = self
            .execute(
                script,
                vec![
                    json!(self.selectors.panels),
                    json!(self.selectors.directional_fragment),
                ],
            )
            .await?;
        if value.is_null() {
            return Ok(None);
        }
        parse_panel(&value).map(Some)
    }

    async fn dismiss_panel(&mut self) -> Result<(), SurfaceError> {
        let script = r#"
            const close = document.querySelector(arguments[0]);
            if (close) {
                close.click();
                return true;
            }
            document.dispatchEvent(new KeyboardEvent('keydown', {
                key: 'Escape', code: 'Escape', bubbles: true,
            }));
            return false;
        "#;
        self.execute(script, vec![json!(self.selectors.close_button)])
            .await?;
        Ok(())
    }
}

fn parse_rows(value: &Value) -> Result<Vec<RowSnapshot>, SurfaceError> {
    let items = value
        .as_array()
        .ok_or_else(|| SurfaceError::BadScriptResult(value.to_string()))?;
    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let key = item
            .get("key")
            .and_then(Value::as_str)
            .ok_or_else(|| SurfaceError::BadScriptResult(item.to_string()))?;
        let title = item.get("title").and_then(Value::as_str).map(str::to_string);
        rows.push(RowSnapshot {
            key: RowKey::new(key),
            title,
        });
    }
    Ok(rows)
}

fn parse_panel(value: &Value) -> Result<PanelSnapshot, SurfaceError> {
    let full_text = value
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let fragments = string_list(value.get("fragments"));
    let directional_fragments = string_list(value.get("directional"));
    Ok(PanelSnapshot {
        full_text,
        fragments,
        directional_fragments,
    })
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn driver_err(err: fantoccini::error::CmdError) -> SurfaceError {
    SurfaceError::Driver(err.to_string())
}
