//! Via placement for a single pad.
//!
//! Two vias on neighbouring grid lines must sit at least
//! `clearance + via_diameter` apart. With half the pitch as the fixed short
//! leg, that separation decomposes into
//!
//! ```text
//! fy = sqrt(required² - (spacing / 2)²)
//! fx = sqrt(required² - fy²)
//! ```
//!
//! and the edge patterns shift the via by `fx / 2` along the edge and
//! `(spacing - fy) / 2` across it.

use tracing::trace;

use super::classify::{GridPosition, PadClass};
use super::{FanoutError, GridInfo, Point};

/// Via offsets derived from one set of net class rules and the pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscapeGeometry {
    spacing: f64,
    required_separation: f64,
    fx: f64,
    fy: f64,
}

impl EscapeGeometry {
    /// Computes the offsets for a via of `via_diameter` with `clearance` on a
    /// grid of `spacing`.
    ///
    /// # Errors
    ///
    /// Returns [`FanoutError::InfeasibleClearance`] when
    /// `clearance + via_diameter` is below half the pitch, and
    /// [`FanoutError::DegenerateGrid`] for a non-positive pitch.
    pub fn new(via_diameter: f64, clearance: f64, spacing: f64) -> Result<Self, FanoutError> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(FanoutError::degenerate_grid(format!(
                "pitch {spacing} is not usable for via placement"
            )));
        }

        let required_separation = clearance + via_diameter;
        let half_pitch = spacing / 2.0;
        // Also rejects NaN rules
        if !(required_separation >= half_pitch) {
            return Err(FanoutError::InfeasibleClearance {
                pad: None,
                required_separation,
                half_pitch,
            });
        }

        let required_sq = required_separation * required_separation;
        let fy = half_pitch.mul_add(-half_pitch, required_sq).max(0.0).sqrt();
        let fx = fy.mul_add(-fy, required_sq).max(0.0).sqrt();

        Ok(Self {
            spacing,
            required_separation,
            fx,
            fy,
        })
    }

    /// Minimum via-to-via centre distance, `clearance + via_diameter`.
    #[must_use]
    pub const fn required_separation(&self) -> f64 {
        self.required_separation
    }

    /// Shift along the edge for edge patterns, `fx / 2`.
    #[must_use]
    pub fn along_edge(&self) -> f64 {
        self.fx / 2.0
    }

    /// Shift across the edge for edge patterns, `(spacing - fy) / 2`.
    #[must_use]
    pub fn across_edge(&self) -> f64 {
        (self.spacing - self.fy) / 2.0
    }

    /// Returns the via offset from the pad for the given classification, or
    /// `None` for skipped pads.
    #[must_use]
    pub fn escape_offset(
        &self,
        grid: &GridInfo,
        position: Point,
        pos: GridPosition,
        class: PadClass,
        edge_layer_rings: u32,
    ) -> Option<Point> {
        let from_center = position - grid.center;
        let horizontal = from_center.x.abs() > from_center.y.abs();
        let dx = outward(from_center.x);
        let dy = outward(from_center.y);
        let (along, across) = (self.along_edge(), self.across_edge());

        let offset = match class {
            PadClass::Skipped => return None,
            PadClass::EdgeTransition => {
                let band = i64::from(edge_layer_rings);
                if horizontal {
                    if (pos.row - band).rem_euclid(2) == 0 {
                        Point::new(along, -across)
                    } else {
                        Point::new(-along, across)
                    }
                } else if (pos.column - band).rem_euclid(2) == 0 {
                    Point::new(across, -along)
                } else {
                    Point::new(-across, along)
                }
            }
            PadClass::InnerTransition => {
                if horizontal {
                    Point::new(dx * along, -dx * across)
                } else {
                    Point::new(-dy * across, dy * along)
                }
            }
            PadClass::Interior => {
                let half = self.spacing / 2.0;
                Point::new(dx * half, dy * half)
            }
        };

        trace!(%pos, %class, dx = offset.x, dy = offset.y, "Escape offset");
        Some(offset)
    }

    /// Returns the absolute via position for the pad, or `None` for skipped
    /// pads.
    #[must_use]
    pub fn escape_point(
        &self,
        grid: &GridInfo,
        position: Point,
        pos: GridPosition,
        class: PadClass,
        edge_layer_rings: u32,
    ) -> Option<Point> {
        self.escape_offset(grid, position, pos, class, edge_layer_rings)
            .map(|offset| position + offset)
    }
}

/// `+1` for positive offsets from the centre, `-1` otherwise.
fn outward(offset: f64) -> f64 {
    if offset > 0.0 {
        1.0
    } else {
        -1.0
    }
}
