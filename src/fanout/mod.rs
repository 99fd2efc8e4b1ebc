//! Dogbone fanout for BGA footprints.
//!
//! Every routed pad gets a short track to a via placed between the balls, so
//! the signal can drop to an inner layer without violating clearance against
//! neighbouring vias.
//!
//! # Pipeline
//!
//! 1. [`grid`] infers the pitch, the row/column counts and an occupancy map
//!    from the pad positions alone.
//! 2. [`classify`] maps each pad onto the grid and decides which escape
//!    pattern it gets (skipped, edge transition, inner transition, interior).
//! 3. [`escape`] turns the classification into an absolute via position.
//! 4. [`engine`] runs the three steps over a component and collects
//!    [`EscapeRecord`]s.
//!
//! The module never touches a board: pads come in as read-only [`PadView`]s
//! and records go out as plain data for the host to apply.
//!
//! # Example
//!
//! ```
//! use bga_fanout::fanout::{compute_fanout, PadView, Point};
//!
//! let mut pads = Vec::new();
//! for row in 0..4 {
//!     for col in 0..4 {
//!         let position = Point::new(f64::from(col), f64::from(row));
//!         pads.push(PadView::new(position, 1 + row * 4 + col, "F.Cu"));
//!     }
//! }
//!
//! let result = compute_fanout(&pads, 1, 0).unwrap();
//! assert!((result.spacing - 1.0).abs() < 1e-9);
//! assert_eq!(result.records.len(), 4);
//! ```

pub mod classify;
pub mod engine;
mod error;
pub mod escape;
pub mod grid;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

pub use classify::{GridPosition, PadClass};
pub use engine::{compute_fanout, FanoutEngine};
pub use error::FanoutError;
pub use escape::EscapeGeometry;
pub use grid::GridInfo;

/// A 2D point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate (mm).
    pub x: f64,
    /// Y coordinate (mm).
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length of the vector from the origin to this point.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Read-only view of a host pad, with its net's routing rules resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PadView {
    /// Pad centre (mm).
    pub position: Point,

    /// Net code of the pad.
    pub net_id: u32,

    /// Whether the net reaches at least one other pad on the board.
    pub is_multi_terminal: bool,

    /// Via diameter of the pad's net class (mm).
    pub via_diameter: f64,

    /// Via drill of the pad's net class (mm).
    pub via_drill_size: f64,

    /// Clearance of the pad's net class (mm).
    pub clearance: f64,

    /// Track width of the pad's net class (mm).
    pub track_width: f64,

    /// Copper layer the pad sits on.
    pub layer: String,
}

impl PadView {
    /// Default via diameter (mm) used by [`PadView::new`].
    pub const DEFAULT_VIA_DIAMETER: f64 = 0.4;
    /// Default via drill (mm) used by [`PadView::new`].
    pub const DEFAULT_VIA_DRILL: f64 = 0.2;
    /// Default clearance (mm) used by [`PadView::new`].
    pub const DEFAULT_CLEARANCE: f64 = 0.2;
    /// Default track width (mm) used by [`PadView::new`].
    pub const DEFAULT_TRACK_WIDTH: f64 = 0.2;

    /// Creates a multi-terminal pad with default net class rules.
    #[must_use]
    pub fn new(position: Point, net_id: u32, layer: impl Into<String>) -> Self {
        Self {
            position,
            net_id,
            is_multi_terminal: true,
            via_diameter: Self::DEFAULT_VIA_DIAMETER,
            via_drill_size: Self::DEFAULT_VIA_DRILL,
            clearance: Self::DEFAULT_CLEARANCE,
            track_width: Self::DEFAULT_TRACK_WIDTH,
            layer: layer.into(),
        }
    }

    /// Sets the via diameter and drill.
    #[must_use]
    pub fn with_via(mut self, diameter: f64, drill: f64) -> Self {
        self.via_diameter = diameter;
        self.via_drill_size = drill;
        self
    }

    /// Sets the clearance.
    #[must_use]
    pub fn with_clearance(mut self, clearance: f64) -> Self {
        self.clearance = clearance;
        self
    }

    /// Sets the track width.
    #[must_use]
    pub fn with_track_width(mut self, width: f64) -> Self {
        self.track_width = width;
        self
    }

    /// Marks the pad as the only terminal of its net.
    #[must_use]
    pub fn single_terminal(mut self) -> Self {
        self.is_multi_terminal = false;
        self
    }
}

/// One dogbone: a track from the pad to a via, and the via itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscapeRecord {
    /// Track start, the pad centre (mm).
    pub track_start: Point,
    /// Track end, the via centre (mm).
    pub track_end: Point,
    /// Copper layer of the track.
    pub track_layer: String,
    /// Track width (mm).
    pub track_width: f64,
    /// Net code shared by track and via.
    pub net_id: u32,
    /// Via centre (mm).
    pub via_position: Point,
    /// Via diameter (mm).
    pub via_diameter: f64,
    /// Via drill (mm).
    pub via_drill_size: f64,
}

impl EscapeRecord {
    /// Builds the record for `pad` escaping to `via_position`.
    #[must_use]
    pub fn new(pad: &PadView, via_position: Point) -> Self {
        Self {
            track_start: pad.position,
            track_end: via_position,
            track_layer: pad.layer.clone(),
            track_width: pad.track_width,
            net_id: pad.net_id,
            via_position,
            via_diameter: pad.via_diameter,
            via_drill_size: pad.via_drill_size,
        }
    }

    /// Vector from the pad to the via.
    #[must_use]
    pub fn offset(&self) -> Point {
        self.via_position - self.track_start
    }
}

/// Output of one fanout run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FanoutResult {
    /// Detected pad pitch (mm).
    pub spacing: f64,
    /// One record per escaped pad, in pad order.
    pub records: Vec<EscapeRecord>,
}
