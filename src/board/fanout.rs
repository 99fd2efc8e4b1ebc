//! Applying the fanout to footprints of a board.

use tracing::{info, warn};

use super::{Board, BoardError, BoardResult};
use crate::fanout::{FanoutEngine, FanoutResult};

/// Result of fanning out one footprint in a batch.
#[derive(Debug)]
pub struct FootprintOutcome {
    /// Footprint reference designator.
    pub reference: String,
    /// Computed fanout, or why the footprint was left untouched.
    pub result: BoardResult<FanoutResult>,
}

impl Board {
    /// Computes the fanout of one footprint without modifying the board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::FootprintNotFound`], a pad resolution error, or
    /// [`BoardError::Fanout`] wrapping the engine's error.
    pub fn plan_fanout(&self, reference: &str, engine: &FanoutEngine) -> BoardResult<FanoutResult> {
        let footprint = self
            .footprint(reference)
            .ok_or_else(|| BoardError::FootprintNotFound {
                reference: reference.to_string(),
            })?;
        let pads = self.pad_views(footprint)?;
        engine
            .run(&pads)
            .map_err(|e| BoardError::fanout(reference, e))
    }

    /// Fans out one footprint and adds the tracks and vias to the board.
    ///
    /// # Errors
    ///
    /// See [`Board::plan_fanout`]. The board is unchanged on error.
    pub fn fanout(&mut self, reference: &str, engine: &FanoutEngine) -> BoardResult<FanoutResult> {
        let result = self.plan_fanout(reference, engine)?;
        self.apply(&result.records);
        Ok(result)
    }

    /// Fans out several footprints.
    ///
    /// Every footprint is planned independently against the unmodified
    /// board; successful results are then applied in the order given. A
    /// failing footprint is reported in its outcome and does not stop the
    /// others. With `dry_run` nothing is applied.
    pub fn fanout_batch<S: AsRef<str>>(
        &mut self,
        references: &[S],
        engine: &FanoutEngine,
        dry_run: bool,
    ) -> Vec<FootprintOutcome> {
        let outcomes: Vec<FootprintOutcome> = references
            .iter()
            .map(|reference| {
                let reference = reference.as_ref();
                FootprintOutcome {
                    reference: reference.to_string(),
                    result: self.plan_fanout(reference, engine),
                }
            })
            .collect();

        for outcome in &outcomes {
            match &outcome.result {
                Ok(result) => {
                    info!(
                        reference = %outcome.reference,
                        spacing = result.spacing,
                        dogbones = result.records.len(),
                        dry_run,
                        "Footprint fanned out"
                    );
                    if !dry_run {
                        self.apply(&result.records);
                    }
                }
                Err(e) => {
                    let cause = e.as_fanout().map_or_else(|| e.to_string(), ToString::to_string);
                    warn!(reference = %outcome.reference, error = %cause, "Footprint skipped");
                }
            }
        }

        outcomes
    }
}
