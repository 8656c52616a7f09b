use crate::{HarvestPhase, RunOutcome, SessionState};

/// Snapshot of everything the status overlay needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlayViewModel {
    pub session: SessionState,
    pub processed: usize,
    pub current_label: Option<String>,
    pub phase: Option<HarvestPhase>,
    pub last_outcome: Option<RunOutcome>,
}

impl OverlayViewModel {
    /// Free-text status lines; the delivery mechanism is the caller's.
    pub fn status_lines(&self) -> Vec<String> {
        match self.session {
            SessionState::Idle => vec!["Waiting to start.".to_string()],
            SessionState::Running | SessionState::Stopping => {
                let mut lines = vec![format!("Chats Found: {}", self.processed)];
                if let Some(label) = &self.current_label {
                    lines.push(format!("Current: {label}"));
                }
                if let Some(phase) = &self.phase {
                    lines.push(format!("Step: {}", phase_text(phase)));
                }
                if self.session == SessionState::Stopping {
                    lines.push("Stopping after current chat...".to_string());
                }
                lines
            }
            SessionState::Done => match &self.last_outcome {
                Some(RunOutcome::Aborted { reason }) => vec![format!("Aborted: {reason}")],
                _ if self.processed == 0 => vec!["No data extracted!".to_string()],
                _ => vec![format!("Finished! Processed {} chats.", self.processed)],
            },
        }
    }
}

fn phase_text(phase: &HarvestPhase) -> String {
    match phase {
        HarvestPhase::RowDiscovered { .. } => "Row discovered".to_string(),
        HarvestPhase::Opening => "Opening Chat...".to_string(),
        HarvestPhase::Reading => "Reading Info...".to_string(),
        HarvestPhase::Retry { attempt, limit } => format!("Retry {attempt}/{limit}..."),
        HarvestPhase::Saved => "Saved.".to_string(),
        HarvestPhase::Scrolling => "Scrolling for more...".to_string(),
    }
}
