//! Pad classification relative to the inferred grid.
//!
//! Rings are counted inwards from the grid boundary: ring 0 is the outermost
//! row/column on every side, ring 1 the next one in, and so on.

use std::fmt;

use super::grid::{lattice_steps, to_f64};
use super::{GridInfo, Point};

/// Integer cell of a pad; `(0, 0)` is the top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPosition {
    /// Column index, growing with X.
    pub column: i64,
    /// Row index, growing with Y.
    pub row: i64,
}

impl GridPosition {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(column: i64, row: i64) -> Self {
        Self { column, row }
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Escape pattern assigned to a pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadClass {
    /// Outer-ring pad left for direct escape; no dogbone.
    Skipped,
    /// Pad on one edge of the edge-layer band (not a corner); axis-aligned
    /// offset alternating with its neighbours.
    EdgeTransition,
    /// Edge pad one ring inside the edge-layer band; offset leans outwards.
    InnerTransition,
    /// Everything else; diagonal half-pitch step away from the centre.
    Interior,
}

impl PadClass {
    /// Whether pads of this class get a track and via.
    #[must_use]
    pub const fn is_routed(self) -> bool {
        !matches!(self, Self::Skipped)
    }
}

impl fmt::Display for PadClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped => write!(f, "skipped"),
            Self::EdgeTransition => write!(f, "edge transition"),
            Self::InnerTransition => write!(f, "inner transition"),
            Self::Interior => write!(f, "interior"),
        }
    }
}

/// Maps an absolute pad position to its grid cell.
///
/// The offset from the grid centre is re-based by half the grid extent and
/// snapped with [`lattice_steps`], the same rule the occupancy map uses. On
/// an exact lattice this is `floor(offset / spacing) + n / 2` for both odd and
/// even `n`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn pad_to_grid(grid: &GridInfo, position: Point) -> GridPosition {
    let offset = position - grid.center;
    let half_width = to_f64(grid.columns.saturating_sub(1)) * grid.spacing / 2.0;
    let half_height = to_f64(grid.rows.saturating_sub(1)) * grid.spacing / 2.0;

    GridPosition::new(
        lattice_steps(offset.x + half_width, grid.spacing) as i64,
        lattice_steps(offset.y + half_height, grid.spacing) as i64,
    )
}

#[allow(clippy::cast_possible_wrap)]
const fn extents(grid: &GridInfo) -> (i64, i64) {
    (grid.columns as i64, grid.rows as i64)
}

/// Returns true if the pad is fewer than `rings` cells from any grid edge.
#[must_use]
pub fn is_outer_ring(grid: &GridInfo, pos: GridPosition, rings: u32) -> bool {
    let (columns, rows) = extents(grid);
    let rings = i64::from(rings);

    pos.column < rings
        || pos.row < rings
        || columns - pos.column <= rings
        || rows - pos.row <= rings
}

/// Returns true if the pad lies in the `rings` band along exactly one axis.
///
/// Corner regions, where the pad is close to both a row edge and a column
/// edge, are excluded.
#[must_use]
pub fn is_edge_transition(grid: &GridInfo, pos: GridPosition, rings: u32) -> bool {
    let (columns, rows) = extents(grid);
    let band = i64::from(rings);

    let clear_of_column_edges = pos.column >= band && columns - pos.column > band;
    let clear_of_row_edges = pos.row >= band && rows - pos.row > band;

    is_outer_ring(grid, pos, rings) && (clear_of_column_edges != clear_of_row_edges)
}

/// Classifies a pad for the given ring parameters.
///
/// Checked in order: skipped outer ring, edge transition, inner transition
/// (only when `edge_layer_rings > 0`), interior.
#[must_use]
pub fn classify(
    grid: &GridInfo,
    pos: GridPosition,
    skip_outer_rings: u32,
    edge_layer_rings: u32,
) -> PadClass {
    let edge = is_edge_transition(grid, pos, edge_layer_rings);

    if is_outer_ring(grid, pos, skip_outer_rings) && !edge {
        PadClass::Skipped
    } else if edge {
        PadClass::EdgeTransition
    } else if edge_layer_rings > 0
        && is_edge_transition(grid, pos, edge_layer_rings.saturating_add(1))
    {
        PadClass::InnerTransition
    } else {
        PadClass::Interior
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::fanout::grid::lattice;

    fn grid(columns: u32, rows: u32) -> (GridInfo, Vec<Point>) {
        let pads = lattice(columns, rows, 1.0, Point::default());
        (GridInfo::from_positions(&pads).unwrap(), pads)
    }

    fn class_counts(columns: u32, rows: u32, skip: u32, edge: u32) -> HashMap<PadClass, usize> {
        let (info, pads) = grid(columns, rows);
        let mut counts = HashMap::new();
        for p in pads {
            let class = classify(&info, pad_to_grid(&info, p), skip, edge);
            *counts.entry(class).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn even_grid_positions() {
        let pads = lattice(8, 8, 1.0, Point::new(-3.5, -3.5));
        let info = GridInfo::from_positions(&pads).unwrap();

        assert_eq!(pad_to_grid(&info, Point::new(-3.5, -3.5)), GridPosition::new(0, 0));
        assert_eq!(pad_to_grid(&info, Point::new(3.5, 3.5)), GridPosition::new(7, 7));
        assert_eq!(pad_to_grid(&info, Point::new(0.5, -0.5)), GridPosition::new(4, 3));
        assert_eq!(pad_to_grid(&info, Point::new(-0.5, 0.5)), GridPosition::new(3, 4));
    }

    #[test]
    fn odd_grid_positions() {
        let (info, _) = grid(7, 5);
        assert_eq!(pad_to_grid(&info, Point::new(3.0, 2.0)), GridPosition::new(3, 2));
        assert_eq!(pad_to_grid(&info, Point::new(0.0, 4.0)), GridPosition::new(0, 4));
        assert_eq!(pad_to_grid(&info, Point::new(6.0, 0.0)), GridPosition::new(6, 0));
    }

    #[test]
    fn every_pad_gets_its_own_cell() {
        let (info, pads) = grid(9, 6);
        let mut seen = std::collections::HashSet::new();
        for p in &pads {
            assert!(seen.insert(pad_to_grid(&info, *p)));
        }
        assert_eq!(seen.len(), pads.len());
    }

    #[test]
    fn pad_to_grid_is_idempotent() {
        let (info, pads) = grid(5, 5);
        for p in pads {
            assert_eq!(pad_to_grid(&info, p), pad_to_grid(&info, p));
        }
    }

    #[test]
    fn outer_ring_band() {
        let (info, _) = grid(8, 8);
        assert!(is_outer_ring(&info, GridPosition::new(0, 4), 1));
        assert!(is_outer_ring(&info, GridPosition::new(4, 7), 1));
        assert!(!is_outer_ring(&info, GridPosition::new(1, 1), 1));
        assert!(is_outer_ring(&info, GridPosition::new(1, 1), 2));
        assert!(is_outer_ring(&info, GridPosition::new(6, 3), 2));
        assert!(!is_outer_ring(&info, GridPosition::new(0, 0), 0));
    }

    #[test]
    fn edge_transition_excludes_corners() {
        let (info, _) = grid(8, 8);
        assert!(is_edge_transition(&info, GridPosition::new(0, 3), 1));
        assert!(is_edge_transition(&info, GridPosition::new(3, 7), 1));
        assert!(!is_edge_transition(&info, GridPosition::new(0, 0), 1));
        assert!(!is_edge_transition(&info, GridPosition::new(7, 0), 1));
        assert!(!is_edge_transition(&info, GridPosition::new(3, 3), 1));
        assert!(!is_edge_transition(&info, GridPosition::new(0, 3), 0));
    }

    #[test]
    fn skip_one_ring_without_edge_band() {
        let counts = class_counts(8, 8, 1, 0);
        assert_eq!(counts.get(&PadClass::Skipped), Some(&28));
        assert_eq!(counts.get(&PadClass::Interior), Some(&36));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn classification_covers_every_pad_once() {
        let counts = class_counts(10, 10, 1, 2);

        assert_eq!(counts.get(&PadClass::Skipped), Some(&12));
        assert_eq!(counts.get(&PadClass::EdgeTransition), Some(&48));
        assert_eq!(counts.get(&PadClass::InnerTransition), Some(&16));
        assert_eq!(counts.get(&PadClass::Interior), Some(&24));
        assert_eq!(counts.values().sum::<usize>(), 100);
    }

    #[test]
    fn nothing_skipped_without_rings() {
        let counts = class_counts(4, 6, 0, 0);
        assert_eq!(counts.get(&PadClass::Interior), Some(&24));
        assert!(PadClass::Interior.is_routed());
        assert!(!PadClass::Skipped.is_routed());
    }
}
