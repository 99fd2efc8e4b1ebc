//! Error types for fanout computation.

use thiserror::Error;

/// Errors that can occur while computing a fanout.
///
/// Any of these rejects the whole component; no records are produced for it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FanoutError {
    /// The pads do not describe a usable grid (single column, no pitch).
    #[error("Degenerate pad grid: {reason}")]
    DegenerateGrid {
        /// Description of what's wrong.
        reason: String,
    },

    /// A pad does not land on its own cell of the inferred grid.
    #[error("Inconsistent pad grid: pad {index} at ({x}, {y}) {reason}")]
    InconsistentGrid {
        /// Index of the offending pad in the input slice.
        index: usize,
        /// Pad X position (mm).
        x: f64,
        /// Pad Y position (mm).
        y: f64,
        /// Description of what's wrong.
        reason: String,
    },

    /// Via diameter plus clearance is smaller than half the pitch.
    #[error(
        "Infeasible clearance{}: via diameter + clearance = {required_separation} mm is below half the pitch ({half_pitch} mm)",
        pad.map(|i| format!(" for pad {i}")).unwrap_or_default()
    )]
    InfeasibleClearance {
        /// Index of the pad whose net parameters failed, if pad-specific.
        pad: Option<usize>,
        /// Via diameter plus clearance (mm).
        required_separation: f64,
        /// Half of the detected pitch (mm).
        half_pitch: f64,
    },

    /// No pad on the component belongs to a net that connects elsewhere.
    #[error("No pad belongs to a multi-terminal net; nothing to fan out")]
    NoReferenceNet,

    /// No component (or no pads) was supplied.
    #[error("No component selected")]
    EmptySelection,
}

impl FanoutError {
    /// Creates a degenerate grid error.
    pub fn degenerate_grid(reason: impl Into<String>) -> Self {
        Self::DegenerateGrid {
            reason: reason.into(),
        }
    }

    /// Creates an inconsistent grid error for the pad at `index`.
    pub fn inconsistent_grid(index: usize, x: f64, y: f64, reason: impl Into<String>) -> Self {
        Self::InconsistentGrid {
            index,
            x,
            y,
            reason: reason.into(),
        }
    }
}
