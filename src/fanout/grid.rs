//! Pad grid inference.
//!
//! A BGA footprint only carries pad positions, so the lattice has to be
//! recovered from them: the pitch from the smallest non-zero X distance to the
//! first pad, the extents from the bounding box, and an occupancy map from
//! snapping every pad onto that lattice.

use tracing::debug;

use super::{FanoutError, Point};

/// Upper bound on `rows * columns`.
///
/// A real package has a few thousand balls at most; a larger lattice means
/// the detected pitch is far too small for the footprint.
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// Snaps a distance onto the lattice (nearest, ties to even).
///
/// Both the occupancy map and [`crate::fanout::classify::pad_to_grid`] go
/// through this so that a pad lands on the same cell everywhere.
#[must_use]
pub fn lattice_steps(distance: f64, spacing: f64) -> f64 {
    (distance / spacing).round_ties_even()
}

/// Detects the column pitch of a pad grid.
///
/// Takes the first pad as reference and returns the smallest strictly
/// positive X distance from it to any other pad.
///
/// # Errors
///
/// Returns [`FanoutError::DegenerateGrid`] if there are fewer than two pads or
/// all pads share the reference X coordinate.
pub fn detect_spacing(positions: &[Point]) -> Result<f64, FanoutError> {
    let Some((first, rest)) = positions.split_first() else {
        return Err(FanoutError::degenerate_grid("no pads"));
    };

    rest.iter()
        .map(|p| (p.x - first.x).abs())
        .filter(|d| *d > 0.0)
        .min_by(f64::total_cmp)
        .ok_or_else(|| {
            FanoutError::degenerate_grid(format!(
                "all {} pads share x = {}; cannot infer a pitch",
                positions.len(),
                first.x
            ))
        })
}

/// Lattice description of one component, built fresh for every run.
#[derive(Debug, Clone, PartialEq)]
pub struct GridInfo {
    /// Pitch between adjacent columns (mm).
    pub spacing: f64,
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub columns: usize,
    /// Minimum corner of the pad bounding box, `(min x, min y)`.
    pub origin: Point,
    /// Midpoint of the pad bounding box.
    pub center: Point,
    /// Index of the pad on each cell, `row * columns + column`.
    cells: Vec<Option<usize>>,
}

impl GridInfo {
    /// Infers the grid from pad positions.
    ///
    /// # Errors
    ///
    /// - [`FanoutError::DegenerateGrid`] when no pitch can be detected or the
    ///   pitch is absurdly small for the footprint extent.
    /// - [`FanoutError::InconsistentGrid`] when a pad snaps outside the grid or
    ///   onto a cell already taken by another pad.
    pub fn from_positions(positions: &[Point]) -> Result<Self, FanoutError> {
        let spacing = detect_spacing(positions)?;
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(FanoutError::degenerate_grid(format!(
                "detected pitch {spacing} is not usable"
            )));
        }

        let (min, max) = bounding_box(positions);
        let columns = lattice_extent(max.x - min.x, spacing)?;
        let rows = lattice_extent(max.y - min.y, spacing)?;
        if rows.saturating_mul(columns) > MAX_GRID_CELLS {
            return Err(FanoutError::degenerate_grid(format!(
                "pitch {spacing} mm yields a {columns}x{rows} grid"
            )));
        }

        let origin = min;
        let center = Point::new(max.x.mul_add(0.5, min.x * 0.5), max.y.mul_add(0.5, min.y * 0.5));

        let mut cells = vec![None; rows * columns];
        for (index, p) in positions.iter().enumerate() {
            let column = lattice_steps(p.x - origin.x, spacing);
            let row = lattice_steps(p.y - origin.y, spacing);
            let in_bounds = (0.0..to_f64(columns)).contains(&column)
                && (0.0..to_f64(rows)).contains(&row);
            if !in_bounds {
                return Err(FanoutError::inconsistent_grid(
                    index,
                    p.x,
                    p.y,
                    format!("snaps to cell ({column}, {row}) outside the {columns}x{rows} grid"),
                ));
            }

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let slot = row as usize * columns + column as usize;
            if let Some(other) = cells[slot] {
                return Err(FanoutError::inconsistent_grid(
                    index,
                    p.x,
                    p.y,
                    format!("shares cell ({column}, {row}) with pad {other}"),
                ));
            }
            cells[slot] = Some(index);
        }

        let info = Self {
            spacing,
            rows,
            columns,
            origin,
            center,
            cells,
        };
        debug!(
            spacing,
            rows,
            columns,
            center_x = center.x,
            center_y = center.y,
            occupied = info.occupied_count(),
            "Inferred pad grid"
        );
        Ok(info)
    }

    /// Returns whether a pad sits on the given cell. Out-of-range cells are
    /// empty.
    #[must_use]
    pub fn is_occupied(&self, column: usize, row: usize) -> bool {
        self.pad_at(column, row).is_some()
    }

    /// Returns the input index of the pad on the given cell.
    #[must_use]
    pub fn pad_at(&self, column: usize, row: usize) -> Option<usize> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells[row * self.columns + column]
    }

    /// Number of cells holding a pad.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

fn bounding_box(positions: &[Point]) -> (Point, Point) {
    positions.iter().fold(
        (
            Point::new(f64::INFINITY, f64::INFINITY),
            Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        ),
        |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        },
    )
}

/// Number of lattice lines spanning `extent`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lattice_extent(extent: f64, spacing: f64) -> Result<usize, FanoutError> {
    let steps = lattice_steps(extent, spacing);
    if !steps.is_finite() || steps < 0.0 || steps >= to_f64(MAX_GRID_CELLS) {
        return Err(FanoutError::degenerate_grid(format!(
            "extent {extent} mm is not a usable multiple of pitch {spacing} mm"
        )));
    }
    Ok(steps as usize + 1)
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn to_f64(n: usize) -> f64 {
    n as f64
}

#[cfg(test)]
pub(crate) fn lattice(columns: u32, rows: u32, pitch: f64, offset: Point) -> Vec<Point> {
    let mut points = Vec::new();
    for row in 0..rows {
        for column in 0..columns {
            points.push(Point::new(
                f64::from(column).mul_add(pitch, offset.x),
                f64::from(row).mul_add(pitch, offset.y),
            ));
        }
    }
    points
}
