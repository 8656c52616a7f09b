//! Harvesting engine: drives the host chat UI and assembles records.
mod engine;
mod export;
mod extract;
mod persist;
mod processor;
mod surface;
mod types;
mod walker;
mod webdriver;

pub use engine::{run_harvest, ChannelEventSink, EngineHandle, EventSink};
pub use export::{
    build_csv, split_csv_line, write_csv_export, ExportError, ExportOptions, ExportSummary,
    CSV_HEADER,
};
pub use extract::{
    extract_public_name, fill_missing, is_phone_like, resolve_phone, ExtractedFields, PhoneContext,
};
pub use persist::{atomic_write, ensure_output_dir, PersistError};
pub use processor::ItemProcessor;
pub use surface::ChatSurface;
pub use types::{
    EngineEvent, HarvestPhase, HarvestSettings, HarvestedRecord, PanelSnapshot, RowKey,
    RowSnapshot, RunEnd, RunSummary, StructuralError, SurfaceError, WaitPolicy,
};
pub use walker::{ListWalker, PaginationResult};
pub use webdriver::{SelectorConfig, WebDriverSurface};
