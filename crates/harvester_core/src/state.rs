use crate::view_model::OverlayViewModel;

/// Lifecycle of one harvesting session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    /// A stop was requested; the engine finishes its in-flight row first.
    Stopping,
    Done,
}

/// One harvested chat record. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRecord {
    pub display_label: String,
    pub public_name: String,
    pub phone_number: String,
    pub last_message: String,
}

/// Progress phases reported by the engine, one per overlay-worthy step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestPhase {
    RowDiscovered { label: String },
    Opening,
    Reading,
    Retry { attempt: u32, limit: u32 },
    Saved,
    Scrolling,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Pagination stalled repeatedly with nothing new rendered.
    Exhausted,
    /// An external stop command ended the loop.
    Stopped,
    /// The run aborted before walking the list.
    Aborted { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: SessionState,
    records: Vec<ChatRecord>,
    current_label: Option<String>,
    phase: Option<HarvestPhase>,
    last_outcome: Option<RunOutcome>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    /// Accumulated records, in processing order.
    pub fn records(&self) -> &[ChatRecord] {
        &self.records
    }

    pub fn view(&self) -> OverlayViewModel {
        OverlayViewModel {
            session: self.session,
            processed: self.records.len(),
            current_label: self.current_label.clone(),
            phase: self.phase.clone(),
            last_outcome: self.last_outcome.clone(),
        }
    }

    /// Returns the dirty flag and clears it. The app renders only when dirty.
    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    pub(crate) fn begin_run(&mut self) {
        self.session = SessionState::Running;
        self.current_label = None;
        self.phase = None;
        self.last_outcome = None;
        self.dirty = true;
        // `records` is retained on purpose: harvested data lives for the
        // whole app session, not one run.
    }

    pub(crate) fn request_stop(&mut self) {
        self.session = SessionState::Stopping;
        self.dirty = true;
    }

    pub(crate) fn apply_phase(&mut self, phase: HarvestPhase) {
        if let HarvestPhase::RowDiscovered { label } = &phase {
            self.current_label = Some(label.clone());
        }
        self.phase = Some(phase);
        self.dirty = true;
    }

    pub(crate) fn push_record(&mut self, record: ChatRecord) {
        self.records.push(record);
        self.dirty = true;
    }

    pub(crate) fn finish_run(&mut self, outcome: RunOutcome) {
        self.session = SessionState::Done;
        self.last_outcome = Some(outcome);
        self.dirty = true;
    }
}
