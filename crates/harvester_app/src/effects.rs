//! Bridges engine events to core messages and executes core effects.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use engine_logging::{engine_error, engine_info, engine_warn};
use harvester_core::{ChatRecord, Effect, Msg, RunOutcome};
use harvester_engine::{EngineEvent, EngineHandle, ExportOptions, WebDriverSurface};

use crate::config::AppConfig;
use crate::AppInput;

pub struct EffectRunner {
    engine: EngineHandle,
    output_dir: PathBuf,
    export_options: ExportOptions,
}

impl EffectRunner {
    /// Build the engine and start forwarding its events into the main loop.
    pub fn new(input_tx: mpsc::Sender<AppInput>, config: &AppConfig) -> Self {
        let settings = config.harvest_settings();
        let selectors = config.selector_config();
        let url = config.webdriver_url.clone();
        let (engine, events) = EngineHandle::spawn(settings, move || {
            let url = url.clone();
            let selectors = selectors.clone();
            async move { WebDriverSurface::connect(&url, selectors).await }
        });
        spawn_event_pump(events, input_tx);

        Self {
            engine,
            output_dir: config.output_dir.clone(),
            export_options: config.export_options(),
        }
    }

    pub fn execute(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::BeginHarvest => {
                    engine_info!("starting harvest run");
                    self.engine.start();
                }
                Effect::SignalStop => {
                    engine_info!("graceful stop requested");
                    self.engine.stop();
                }
                Effect::ExportRecords { records } => self.export(&records),
                Effect::ReportNoData => {
                    engine_warn!("run finished with zero records; no file written");
                }
                Effect::NotifyDone { status } => {
                    // The single completion notification, after any export.
                    println!("{status}");
                }
            }
        }
    }

    fn export(&self, records: &[ChatRecord]) {
        let records: Vec<_> = records.iter().map(to_engine_record).collect();
        match harvester_engine::write_csv_export(&self.output_dir, &self.export_options, &records)
        {
            Ok(summary) => engine_info!(
                "exported {} records to {}",
                summary.record_count,
                summary.output_path.display()
            ),
            Err(err) => engine_error!("export failed: {err}"),
        }
    }
}

fn spawn_event_pump(events: mpsc::Receiver<EngineEvent>, input_tx: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        for event in events {
            if input_tx.send(AppInput::Core(event_to_msg(event))).is_err() {
                break;
            }
        }
    });
}

/// Map one engine event onto the core message it feeds.
fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Phase(phase) => Msg::PhaseReported(map_phase(phase)),
        EngineEvent::RecordReady(record) => Msg::RecordHarvested(to_core_record(&record)),
        EngineEvent::RunCompleted { result } => Msg::RunFinished {
            outcome: map_outcome(result),
        },
    }
}

fn map_phase(phase: harvester_engine::HarvestPhase) -> harvester_core::HarvestPhase {
    use harvester_core::HarvestPhase as Core;
    match phase {
        harvester_engine::HarvestPhase::RowDiscovered { label } => Core::RowDiscovered { label },
        harvester_engine::HarvestPhase::Opening => Core::Opening,
        harvester_engine::HarvestPhase::Reading => Core::Reading,
        harvester_engine::HarvestPhase::Retry { attempt, limit } => Core::Retry { attempt, limit },
        harvester_engine::HarvestPhase::Saved => Core::Saved,
        harvester_engine::HarvestPhase::Scrolling => Core::Scrolling,
    }
}

fn map_outcome(
    result: Result<harvester_engine::RunSummary, harvester_engine::StructuralError>,
) -> RunOutcome {
    match result {
        Ok(summary) => match summary.ended_by {
            harvester_engine::RunEnd::Exhausted => RunOutcome::Exhausted,
            harvester_engine::RunEnd::Stopped => RunOutcome::Stopped,
        },
        Err(err) => RunOutcome::Aborted {
            reason: err.to_string(),
        },
    }
}

fn to_core_record(record: &harvester_engine::HarvestedRecord) -> ChatRecord {
    ChatRecord {
        display_label: record.display_label.clone(),
        public_name: record.public_name.clone(),
        phone_number: record.phone_number.clone(),
        last_message: record.last_message.clone(),
    }
}

fn to_engine_record(record: &ChatRecord) -> harvester_engine::HarvestedRecord {
    harvester_engine::HarvestedRecord {
        display_label: record.display_label.clone(),
        public_name: record.public_name.clone(),
        phone_number: record.phone_number.clone(),
        last_message: record.last_message.clone(),
    }
}
