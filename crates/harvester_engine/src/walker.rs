//! Discovery and pagination over the virtualized list.

use std::collections::HashSet;

use tokio::time::sleep;

use crate::{ChatSurface, HarvestSettings, RowKey, RowSnapshot, SurfaceError, WaitPolicy};

/// Outcome of one pagination attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationResult {
    /// False when the scroll offset did not move: the list rendered nothing
    /// new below the fold.
    pub progressed: bool,
}

/// Walks the rendered window of the virtualized list.
///
/// The processed set is owned here and keyed by [`RowKey`], decoupled from
/// the rendering layer: correctness does not depend on DOM markers
/// surviving a re-render.
pub struct ListWalker {
    visited: HashSet<RowKey>,
    scroll_step: f64,
    scroll_tolerance: f64,
}

impl ListWalker {
    pub fn new(settings: &HarvestSettings) -> Self {
        Self {
            visited: HashSet::new(),
            scroll_step: settings.scroll_step,
            scroll_tolerance: settings.scroll_tolerance,
        }
    }

    /// First rendered row, in document order, not yet marked processed.
    ///
    /// Marking is the caller's responsibility, done immediately on selection
    /// so a later scan cannot pick the row up again.
    pub async fn find_next_unprocessed<S>(
        &mut self,
        surface: &mut S,
    ) -> Result<Option<RowSnapshot>, SurfaceError>
    where
        S: ChatSurface + ?Sized,
    {
        let rows = surface.rendered_rows().await?;
        Ok(rows.into_iter().find(|row| !self.visited.contains(&row.key)))
    }

    /// Record a row as processed. Returns false when it was already marked.
    pub fn mark_processed(&mut self, key: RowKey) -> bool {
        self.visited.insert(key)
    }

    pub fn processed_count(&self) -> usize {
        self.visited.len()
    }

    /// Advance the scroll position one step and report whether the list
    /// actually moved.
    pub async fn paginate<S>(
        &mut self,
        surface: &mut S,
        waits: &WaitPolicy,
    ) -> Result<PaginationResult, SurfaceError>
    where
        S: ChatSurface + ?Sized,
    {
        let before = surface.list_scroll_offset().await?;
        surface.scroll_list_by(self.scroll_step).await?;
        sleep(waits.post_scroll).await;
        let after = surface.list_scroll_offset().await?;
        Ok(PaginationResult {
            progressed: (after - before).abs() >= self.scroll_tolerance,
        })
    }
}
