use std::fmt;
use std::time::Duration;

/// Stable marker for one rendered list row, assigned by the surface the
/// first time the row is seen. The processed set is keyed by it, so
/// correctness does not depend on transient UI handles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey(String);

impl RowKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transient snapshot of one rendered row. Valid only until the next
/// suspension point; re-read instead of retaining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSnapshot {
    pub key: RowKey,
    /// The row's own rendered title attribute, when present.
    pub title: Option<String>,
}

/// Transient capture of the opened detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelSnapshot {
    /// Full visible text of the panel.
    pub full_text: String,
    /// All nested text fragments, document order.
    pub fragments: Vec<String>,
    /// Directional (`dir="auto"`) inline fragments.
    pub directional_fragments: Vec<String>,
}

/// Immutable result of processing one list row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HarvestedRecord {
    pub display_label: String,
    pub public_name: String,
    pub phone_number: String,
    pub last_message: String,
}

/// Progress phases emitted once per overlay-worthy transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestPhase {
    RowDiscovered { label: String },
    Opening,
    Reading,
    Retry { attempt: u32, limit: u32 },
    Saved,
    Scrolling,
}

/// Events emitted by the engine towards the hosting app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Phase(HarvestPhase),
    RecordReady(HarvestedRecord),
    RunCompleted {
        result: Result<RunSummary, StructuralError>,
    },
}

/// What a completed run produced and how it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub ended_by: RunEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    /// Pagination stalled repeatedly with no new row discovered in between.
    Exhausted,
    /// An external stop cleared the running flag.
    Stopped,
}

/// Fatal-to-the-run failures. Nothing is exported after one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    #[error("chat list container not found; the host UI structure may have changed")]
    ListMissing,
    #[error("webdriver session failed: {0}")]
    Session(String),
}

/// A single failed interaction with the host UI. Recovered per-row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("element not found: {0}")]
    NotFound(String),
    #[error("webdriver command failed: {0}")]
    Driver(String),
    #[error("unexpected script result: {0}")]
    BadScriptResult(String),
}

/// Fixed pauses tolerating asynchronous rendering. Production defaults
/// mimic the host UI's observed latency; tests inject [`WaitPolicy::instant`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitPolicy {
    /// After scrolling a row into view, before activating it.
    pub pre_open: Duration,
    /// After activating a row, before touching the header.
    pub post_open: Duration,
    /// Before the first panel read attempt.
    pub read_base: Duration,
    /// Added per further read attempt.
    pub read_step: Duration,
    /// After a record is saved, before the next scan.
    pub post_save: Duration,
    /// After advancing the scroll position, before re-reading the offset.
    pub post_scroll: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            pre_open: Duration::from_millis(800),
            post_open: Duration::from_millis(2500),
            read_base: Duration::from_millis(2000),
            read_step: Duration::from_millis(1000),
            post_save: Duration::from_millis(500),
            post_scroll: Duration::from_millis(2000),
        }
    }
}

impl WaitPolicy {
    /// Zero-delay policy for tests.
    pub fn instant() -> Self {
        Self {
            pre_open: Duration::ZERO,
            post_open: Duration::ZERO,
            read_base: Duration::ZERO,
            read_step: Duration::ZERO,
            post_save: Duration::ZERO,
            post_scroll: Duration::ZERO,
        }
    }
}

/// Tunables for one harvesting run.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestSettings {
    pub waits: WaitPolicy,
    /// Pixels to advance per pagination step.
    pub scroll_step: f64,
    /// Offset changes smaller than this count as a stalled scroll.
    pub scroll_tolerance: f64,
    /// Consecutive stalled paginations that end the list.
    pub exhaustion_limit: u32,
    /// Panel read attempts per row.
    pub read_attempts: u32,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            waits: WaitPolicy::default(),
            scroll_step: 600.0,
            scroll_tolerance: 5.0,
            exhaustion_limit: 3,
            read_attempts: 3,
        }
    }
}
