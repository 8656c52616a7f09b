//! Per-row pipeline: open the chat, read the detail panel, build the record.

use engine_logging::engine_warn;
use tokio::time::sleep;

use crate::engine::EventSink;
use crate::extract::{self, ExtractedFields};
use crate::{
    ChatSurface, EngineEvent, HarvestPhase, HarvestSettings, HarvestedRecord, RowSnapshot,
    SurfaceError, WaitPolicy,
};

/// Label recorded when a row carries no title attribute.
const UNKNOWN_LABEL: &str = "Unknown";

pub struct ItemProcessor {
    waits: WaitPolicy,
    read_attempts: u32,
}

impl ItemProcessor {
    pub fn new(settings: &HarvestSettings) -> Self {
        Self {
            waits: settings.waits.clone(),
            read_attempts: settings.read_attempts,
        }
    }

    /// Process one row to a finished record.
    ///
    /// Never fails past this boundary: any interaction error is logged and
    /// the row still yields a record with whatever fields were resolved by
    /// that point.
    pub async fn process<S>(
        &self,
        surface: &mut S,
        row: &RowSnapshot,
        sink: &dyn EventSink,
    ) -> HarvestedRecord
    where
        S: ChatSurface + ?Sized,
    {
        let display_label = row
            .title
            .clone()
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
        let mut fields = ExtractedFields::default();
        let mut last_message = String::new();

        if let Err(err) = self
            .drive_row(surface, row, &display_label, &mut fields, &mut last_message, sink)
            .await
        {
            engine_warn!("row {} degraded: {}", row.key, err);
        }

        HarvestedRecord {
            display_label,
            public_name: fields.public_name,
            phone_number: fields.phone_number,
            last_message,
        }
    }

    async fn drive_row<S>(
        &self,
        surface: &mut S,
        row: &RowSnapshot,
        display_label: &str,
        fields: &mut ExtractedFields,
        last_message: &mut String,
        sink: &dyn EventSink,
    ) -> Result<(), SurfaceError>
    where
        S: ChatSurface + ?Sized,
    {
        surface.scroll_row_into_view(&row.key).await?;
        sink.emit(EngineEvent::Phase(HarvestPhase::Opening));
        sleep(self.waits.pre_open).await;

        surface.activate_row(&row.key).await?;
        sleep(self.waits.post_open).await;

        // The panel only opens from the conversation header; without one
        // there is nothing to read and the row keeps its defaults.
        if surface.open_detail_panel().await? {
            sink.emit(EngineEvent::Phase(HarvestPhase::Reading));
            self.read_with_retries(surface, display_label, fields, sink)
                .await?;
            surface.dismiss_panel().await?;
        }

        *last_message = final_line(&surface.row_text(&row.key).await?);
        Ok(())
    }

    async fn read_with_retries<S>(
        &self,
        surface: &mut S,
        display_label: &str,
        fields: &mut ExtractedFields,
        sink: &dyn EventSink,
    ) -> Result<(), SurfaceError>
    where
        S: ChatSurface + ?Sized,
    {
        let mut attempt = 0;
        while attempt < self.read_attempts && !fields.any_resolved() {
            sleep(self.waits.read_base + self.waits.read_step * attempt).await;
            let panel = surface.read_panel().await?;
            extract::fill_missing(fields, display_label, panel.as_ref());
            if fields.any_resolved() {
                break;
            }
            attempt += 1;
            sink.emit(EngineEvent::Phase(HarvestPhase::Retry {
                attempt,
                limit: self.read_attempts,
            }));
        }
        Ok(())
    }
}

fn final_line(text: &str) -> String {
    text.lines().last().map(str::trim).unwrap_or_default().to_string()
}
