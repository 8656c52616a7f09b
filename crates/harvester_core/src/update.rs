use crate::{AppState, Effect, Msg, RunOutcome, SessionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartRequested => match state.session() {
            SessionState::Idle | SessionState::Done => {
                state.begin_run();
                vec![Effect::BeginHarvest]
            }
            SessionState::Running | SessionState::Stopping => Vec::new(),
        },
        Msg::StopRequested => {
            if state.session() == SessionState::Running {
                state.request_stop();
                vec![Effect::SignalStop]
            } else {
                Vec::new()
            }
        }
        Msg::PhaseReported(phase) => {
            state.apply_phase(phase);
            Vec::new()
        }
        Msg::RecordHarvested(record) => {
            state.push_record(record);
            Vec::new()
        }
        Msg::RunFinished { outcome } => {
            state.finish_run(outcome.clone());
            finish_effects(&state, &outcome)
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn finish_effects(state: &AppState, outcome: &RunOutcome) -> Vec<Effect> {
    match outcome {
        // A structural abort produces no partial export.
        RunOutcome::Aborted { reason } => vec![Effect::NotifyDone {
            status: format!("Aborted: {reason}"),
        }],
        RunOutcome::Exhausted | RunOutcome::Stopped => {
            let processed = state.records().len();
            if processed == 0 {
                vec![
                    Effect::ReportNoData,
                    Effect::NotifyDone {
                        status: "No data extracted".to_string(),
                    },
                ]
            } else {
                vec![
                    Effect::ExportRecords {
                        records: state.records().to_vec(),
                    },
                    Effect::NotifyDone {
                        status: format!("Done. Processed {processed} chats."),
                    },
                ]
            }
        }
    }
}
