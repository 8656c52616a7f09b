//! Shared in-memory surface scripting a virtualized chat list.
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;

use harvester_engine::{
    ChatSurface, EngineEvent, EventSink, HarvestSettings, HarvestedRecord, PanelSnapshot, RowKey,
    RowSnapshot, StructuralError, SurfaceError, WaitPolicy,
};

/// One scripted chat row.
#[derive(Debug, Clone)]
pub struct FakeRow {
    pub key: String,
    pub title: Option<String>,
    pub text: String,
    pub panel: Option<PanelSnapshot>,
    /// Panel reads that come back empty before the panel renders.
    pub panel_ready_after: u32,
    pub fail_activation: bool,
}

pub fn row(key: &str, title: Option<&str>, text: &str) -> FakeRow {
    FakeRow {
        key: key.to_string(),
        title: title.map(str::to_string),
        text: text.to_string(),
        panel: None,
        panel_ready_after: 0,
        fail_activation: false,
    }
}

pub fn row_with_panel(
    key: &str,
    title: Option<&str>,
    text: &str,
    panel: PanelSnapshot,
    ready_after: u32,
) -> FakeRow {
    FakeRow {
        panel: Some(panel),
        panel_ready_after: ready_after,
        ..row(key, title, text)
    }
}

pub fn panel(full_text: &str, fragments: &[&str], directional: &[&str]) -> PanelSnapshot {
    PanelSnapshot {
        full_text: full_text.to_string(),
        fragments: fragments.iter().map(|s| s.to_string()).collect(),
        directional_fragments: directional.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn instant_settings() -> HarvestSettings {
    HarvestSettings {
        waits: WaitPolicy::instant(),
        ..HarvestSettings::default()
    }
}

/// Scripted surface: a sequence of "pages", each the rendered window after
/// one scroll step. Scrolling past the last page stalls the offset, like a
/// list that has run out of content.
pub struct FakeSurface {
    pub list_present: bool,
    pub header_present: bool,
    pages: Vec<Vec<FakeRow>>,
    page: usize,
    offset: f64,
    active: Option<String>,
    panel_reads: u32,
    total_panel_reads: u32,
    stalls: u32,
    stall_inject: Option<(u32, FakeRow)>,
    pub activations: Vec<String>,
}

impl FakeSurface {
    pub fn new(pages: Vec<Vec<FakeRow>>) -> Self {
        Self {
            list_present: true,
            header_present: true,
            pages,
            page: 0,
            offset: 0.0,
            active: None,
            panel_reads: 0,
            total_panel_reads: 0,
            stalls: 0,
            stall_inject: None,
            activations: Vec::new(),
        }
    }

    pub fn single_page(rows: Vec<FakeRow>) -> Self {
        Self::new(vec![rows])
    }

    pub fn without_list(mut self) -> Self {
        self.list_present = false;
        self
    }

    pub fn without_header(mut self) -> Self {
        self.header_present = false;
        self
    }

    /// Make `row` appear in the rendered window after `stalls` stalled
    /// scrolls, the way a slow virtualized list renders late.
    pub fn inject_after_stalls(mut self, stalls: u32, row: FakeRow) -> Self {
        self.stall_inject = Some((stalls, row));
        self
    }

    pub fn panel_read_count(&self) -> u32 {
        self.total_panel_reads
    }

    /// Scroll attempts that did not move the offset.
    pub fn stall_count(&self) -> u32 {
        self.stalls
    }

    fn find_row(&self, key: &str) -> Option<&FakeRow> {
        self.pages.iter().flatten().find(|row| row.key == key)
    }
}

#[async_trait]
impl ChatSurface for FakeSurface {
    async fn ensure_list_present(&mut self) -> Result<(), StructuralError> {
        if self.list_present {
            Ok(())
        } else {
            Err(StructuralError::ListMissing)
        }
    }

    async fn rendered_rows(&mut self) -> Result<Vec<RowSnapshot>, SurfaceError> {
        Ok(self.pages[self.page]
            .iter()
            .map(|row| RowSnapshot {
                key: RowKey::new(row.key.clone()),
                title: row.title.clone(),
            })
            .collect())
    }

    async fn scroll_row_into_view(&mut self, key: &RowKey) -> Result<(), SurfaceError> {
        self.find_row(key.as_str())
            .map(|_| ())
            .ok_or_else(|| SurfaceError::NotFound(key.to_string()))
    }

    async fn activate_row(&mut self, key: &RowKey) -> Result<(), SurfaceError> {
        let row = self
            .find_row(key.as_str())
            .ok_or_else(|| SurfaceError::NotFound(key.to_string()))?;
        if row.fail_activation {
            return Err(SurfaceError::Driver("activation refused".to_string()));
        }
        self.activations.push(key.as_str().to_string());
        self.active = Some(key.as_str().to_string());
        self.panel_reads = 0;
        Ok(())
    }

    async fn row_text(&mut self, key: &RowKey) -> Result<String, SurfaceError> {
        self.find_row(key.as_str())
            .map(|row| row.text.clone())
            .ok_or_else(|| SurfaceError::NotFound(key.to_string()))
    }

    async fn list_scroll_offset(&mut self) -> Result<f64, SurfaceError> {
        Ok(self.offset)
    }

    async fn scroll_list_by(&mut self, delta: f64) -> Result<(), SurfaceError> {
        if self.page + 1 < self.pages.len() {
            self.page += 1;
            self.offset += delta;
        } else {
            self.stalls += 1;
            let due = self
                .stall_inject
                .as_ref()
                .is_some_and(|(after, _)| self.stalls >= *after);
            if due {
                let (_, row) = self.stall_inject.take().unwrap();
                self.pages[self.page].push(row);
            }
        }
        Ok(())
    }

    async fn open_detail_panel(&mut self) -> Result<bool, SurfaceError> {
        Ok(self.header_present)
    }

    async fn read_panel(&mut self) -> Result<Option<PanelSnapshot>, SurfaceError> {
        let Some(active) = self.active.clone() else {
            return Ok(None);
        };
        self.panel_reads += 1;
        self.total_panel_reads += 1;
        let reads = self.panel_reads;
        Ok(self.find_row(&active).and_then(|row| {
            if reads > row.panel_ready_after {
                row.panel.clone()
            } else {
                None
            }
        }))
    }

    async fn dismiss_panel(&mut self) -> Result<(), SurfaceError> {
        self.active = None;
        Ok(())
    }
}

/// Collects every emitted event for later assertions.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn records(&self) -> Vec<HarvestedRecord> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                EngineEvent::RecordReady(record) => Some(record),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}
