use aimcalc_model::{BatchRow, SceneParams, Solution, TableImport, solve, solve_batch};
use tracing::{debug, info};

use crate::camera::Viewport;
use crate::input::PointerEvent;
use crate::interaction::ViewerState;
use crate::overlay::{OverlayCollector, OverlayShape};

/// Everything one operator session owns: the parameter record, the view
/// and any loaded batch table.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub params: SceneParams,
    pub viewer: ViewerState,
    pub viewport: Viewport,
    batch: Vec<BatchRow>,
}

impl Session {
    pub fn new(params: SceneParams, viewport: Viewport) -> Self {
        Self {
            params,
            viewport,
            ..Self::default()
        }
    }

    pub fn solution(&self) -> Solution {
        solve(&self.params)
    }

    pub fn batch_rows(&self) -> &[BatchRow] {
        &self.batch
    }

    /// Routes a pointer event and applies any resulting edit. Returns true
    /// when the parameters changed.
    pub fn pointer(&mut self, event: PointerEvent) -> bool {
        let solution = self.solution();
        match self.viewer.handle(event, &solution, self.viewport) {
            Some(edit) => {
                debug!(?edit, "scene edit");
                self.params = self.params.apply(edit);
                true
            }
            None => false,
        }
    }

    /// Loads an imported table. Anything but a batch table clears the
    /// loaded batch.
    pub fn import_rows(&mut self, rows: Vec<BatchRow>) -> TableImport {
        let outcome = self.params.import_table(rows);
        self.batch = match &outcome {
            TableImport::Batch(rows) => rows.clone(),
            _ => Vec::new(),
        };
        info!(batch_rows = self.batch.len(), "table imported");
        outcome
    }

    pub fn solve_loaded_batch(&self) -> Vec<BatchRow> {
        solve_batch(&self.batch, &self.params)
    }

    /// Paint-ordered primitives for the current state.
    pub fn frame(&self) -> Vec<OverlayShape> {
        let mut collector = OverlayCollector::default();
        self.viewer.paint(&mut collector, &self.solution(), self.viewport);
        collector.shapes
    }

    /// Back to defaults, keeping only the viewport size.
    pub fn reset(&mut self) {
        *self = Self::new(SceneParams::default(), self.viewport);
    }
}
