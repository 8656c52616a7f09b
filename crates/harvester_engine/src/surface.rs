use async_trait::async_trait;

use crate::{PanelSnapshot, RowKey, RowSnapshot, StructuralError, SurfaceError};

/// Seam between the engine and the host UI.
///
/// Row handles are transient: callers re-read [`ChatSurface::rendered_rows`]
/// after every suspension point instead of retaining snapshots. The live
/// implementation drives a WebDriver session; tests script an in-memory
/// list.
#[async_trait]
pub trait ChatSurface: Send {
    /// Structural check: fails when the scrollable list container is absent.
    async fn ensure_list_present(&mut self) -> Result<(), StructuralError>;

    /// Snapshot all currently rendered rows in document order, assigning a
    /// stable key to any row seen for the first time.
    async fn rendered_rows(&mut self) -> Result<Vec<RowSnapshot>, SurfaceError>;

    async fn scroll_row_into_view(&mut self, key: &RowKey) -> Result<(), SurfaceError>;

    /// Activate a row with the full synthetic press/release/click sequence,
    /// then the host's high-level click. Both are attempted unconditionally;
    /// the host listens for the discrete phases, not just the aggregate
    /// click.
    async fn activate_row(&mut self, key: &RowKey) -> Result<(), SurfaceError>;

    /// The row's own visible text: title plus trailing snippet lines.
    async fn row_text(&mut self, key: &RowKey) -> Result<String, SurfaceError>;

    async fn list_scroll_offset(&mut self) -> Result<f64, SurfaceError>;

    async fn scroll_list_by(&mut self, delta: f64) -> Result<(), SurfaceError>;

    /// Try to open the detail panel: the panel-triggering sub-element inside
    /// the header first, the header itself as the default. Returns whether a
    /// header was found at all.
    async fn open_detail_panel(&mut self) -> Result<bool, SurfaceError>;

    /// Read the detail panel if it is currently rendered.
    async fn read_panel(&mut self) -> Result<Option<PanelSnapshot>, SurfaceError>;

    /// Close the panel: explicit close control when present, else a
    /// synthetic Escape.
    async fn dismiss_panel(&mut self) -> Result<(), SurfaceError>;
}
