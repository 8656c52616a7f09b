//! Run loop and the thread-owning engine handle.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_info, engine_warn};

use crate::processor::ItemProcessor;
use crate::walker::ListWalker;
use crate::{
    ChatSurface, EngineEvent, HarvestPhase, HarvestSettings, RunEnd, RunSummary, StructuralError,
};

/// Sink for engine events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Forwards events over a std channel to the hosting app.
pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// One full harvesting run over the list.
///
/// The running flag is read once per iteration boundary, so a stop request
/// takes effect only between rows.
pub async fn run_harvest<S>(
    surface: &mut S,
    settings: &HarvestSettings,
    sink: &dyn EventSink,
    running: &AtomicBool,
) -> Result<RunSummary, StructuralError>
where
    S: ChatSurface + ?Sized,
{
    surface.ensure_list_present().await?;

    let mut walker = ListWalker::new(settings);
    let processor = ItemProcessor::new(settings);
    let mut stalled_paginations = 0u32;
    let mut processed = 0usize;

    let ended_by = loop {
        if !running.load(Ordering::SeqCst) {
            break RunEnd::Stopped;
        }

        let next = match walker.find_next_unprocessed(surface).await {
            Ok(next) => next,
            Err(err) => {
                engine_warn!("row discovery failed: {err}");
                None
            }
        };

        match next {
            Some(row) => {
                // Any newly discovered row resets the exhaustion counter.
                stalled_paginations = 0;
                // Mark before the first suspension so a later scan cannot
                // re-select the row while it is being processed.
                walker.mark_processed(row.key.clone());
                let label = row
                    .title
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string());
                sink.emit(EngineEvent::Phase(HarvestPhase::RowDiscovered { label }));

                let record = processor.process(surface, &row, sink).await;
                processed += 1;
                sink.emit(EngineEvent::RecordReady(record));
                sink.emit(EngineEvent::Phase(HarvestPhase::Saved));
                tokio::time::sleep(settings.waits.post_save).await;
            }
            None => {
                sink.emit(EngineEvent::Phase(HarvestPhase::Scrolling));
                let progressed = match walker.paginate(surface, &settings.waits).await {
                    Ok(result) => result.progressed,
                    Err(err) => {
                        // A failed scroll reveals nothing new; count it as a
                        // stall so a dead surface still drains to exhaustion.
                        engine_warn!("pagination failed: {err}");
                        false
                    }
                };
                if !progressed {
                    stalled_paginations += 1;
                    if stalled_paginations >= settings.exhaustion_limit {
                        break RunEnd::Exhausted;
                    }
                }
            }
        }
    };

    engine_info!("run ended ({ended_by:?}), {processed} rows processed");
    Ok(RunSummary {
        processed,
        ended_by,
    })
}

enum EngineCommand {
    StartRun,
}

/// Handle to the engine thread. Commands in; events come back on the
/// receiver returned by [`EngineHandle::spawn`].
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    running: Arc<AtomicBool>,
}

impl EngineHandle {
    /// Spawn the engine thread. `make_surface` runs inside the engine's own
    /// tokio runtime, so the surface (and its WebDriver session) lives on
    /// the thread that drives it. The factory is retried on the next start
    /// if it fails.
    pub fn spawn<S, F, Fut>(
        settings: HarvestSettings,
        mut make_surface: F,
    ) -> (Self, mpsc::Receiver<EngineEvent>)
    where
        S: ChatSurface + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<S, StructuralError>>,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(false));
        let running_for_thread = running.clone();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let sink = ChannelEventSink::new(event_tx.clone());
            let mut surface_slot: Option<S> = None;

            while let Ok(EngineCommand::StartRun) = cmd_rx.recv() {
                running_for_thread.store(true, Ordering::SeqCst);
                let result = runtime.block_on(async {
                    let surface = match surface_slot.take() {
                        Some(surface) => surface_slot.insert(surface),
                        None => surface_slot.insert(make_surface().await?),
                    };
                    run_harvest(surface, &settings, &sink, &running_for_thread).await
                });
                running_for_thread.store(false, Ordering::SeqCst);
                let _ = event_tx.send(EngineEvent::RunCompleted { result });
            }
        });

        (
            Self {
                cmd_tx,
                running,
            },
            event_rx,
        )
    }

    /// Begin a run. A start while a run is active is ignored.
    pub fn start(&self) {
        if self.running.load(Ordering::SeqCst) {
            return;
        }
        let _ = self.cmd_tx.send(EngineCommand::StartRun);
    }

    /// Request a graceful stop; the in-flight row completes first.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
