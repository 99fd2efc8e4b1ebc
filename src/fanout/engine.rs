//! Fanout orchestration for one component.

use tracing::{debug, trace};

use super::classify::{classify, pad_to_grid};
use super::{EscapeGeometry, EscapeRecord, FanoutError, FanoutResult, GridInfo, PadView, Point};

/// Runs the dogbone fanout over the pads of one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FanoutEngine {
    /// Outer rings left without dogbones.
    pub skip_outer_rings: u32,
    /// Rings escaped with the axis-aligned edge pattern.
    pub edge_layer_rings: u32,
}

impl FanoutEngine {
    /// Creates an engine with the given ring parameters.
    #[must_use]
    pub const fn new(skip_outer_rings: u32, edge_layer_rings: u32) -> Self {
        Self {
            skip_outer_rings,
            edge_layer_rings,
        }
    }

    /// Computes one escape record per routed pad.
    ///
    /// The via offsets are derived once from the first multi-terminal pad's
    /// net rules so that the pattern is uniform over the component. Each
    /// record still carries its own pad's net, layer, track width and via
    /// size, and each pad's own rules must be feasible for the pitch. Pads on
    /// single-terminal nets are left alone.
    ///
    /// # Errors
    ///
    /// - [`FanoutError::EmptySelection`] for an empty pad list.
    /// - [`FanoutError::NoReferenceNet`] if no pad is multi-terminal.
    /// - [`FanoutError::DegenerateGrid`] / [`FanoutError::InconsistentGrid`]
    ///   when the pad positions do not form a grid.
    /// - [`FanoutError::InfeasibleClearance`] when the reference or any routed
    ///   pad's via diameter plus clearance is below half the pitch.
    pub fn run(&self, pads: &[PadView]) -> Result<FanoutResult, FanoutError> {
        if pads.is_empty() {
            return Err(FanoutError::EmptySelection);
        }

        let (reference_index, reference) = pads
            .iter()
            .enumerate()
            .find(|(_, pad)| pad.is_multi_terminal)
            .ok_or(FanoutError::NoReferenceNet)?;

        let positions: Vec<Point> = pads.iter().map(|pad| pad.position).collect();
        let grid = GridInfo::from_positions(&positions)?;

        let geometry = EscapeGeometry::new(reference.via_diameter, reference.clearance, grid.spacing)
            .map_err(|e| for_pad(e, reference_index))?;
        debug!(
            reference_net = reference.net_id,
            required_separation = geometry.required_separation(),
            along_edge = geometry.along_edge(),
            across_edge = geometry.across_edge(),
            "Escape geometry ready"
        );

        let mut records = Vec::new();
        for (index, pad) in pads.iter().enumerate() {
            if !pad.is_multi_terminal {
                trace!(index, net = pad.net_id, "Skipping single-terminal pad");
                continue;
            }

            let pos = pad_to_grid(&grid, pad.position);
            let class = classify(&grid, pos, self.skip_outer_rings, self.edge_layer_rings);
            if !class.is_routed() {
                trace!(index, %pos, "Skipping outer-ring pad");
                continue;
            }

            if index != reference_index {
                EscapeGeometry::new(pad.via_diameter, pad.clearance, grid.spacing)
                    .map_err(|e| for_pad(e, index))?;
            }

            if let Some(via) =
                geometry.escape_point(&grid, pad.position, pos, class, self.edge_layer_rings)
            {
                records.push(EscapeRecord::new(pad, via));
            }
        }

        debug!(
            pads = pads.len(),
            records = records.len(),
            spacing = grid.spacing,
            "Fanout computed"
        );

        Ok(FanoutResult {
            spacing: grid.spacing,
            records,
        })
    }
}

/// Attaches the pad index to an infeasible clearance error.
fn for_pad(error: FanoutError, index: usize) -> FanoutError {
    match error {
        FanoutError::InfeasibleClearance {
            required_separation,
            half_pitch,
            ..
        } => FanoutError::InfeasibleClearance {
            pad: Some(index),
            required_separation,
            half_pitch,
        },
        other => other,
    }
}

/// Computes the dogbone fanout for one component's pads.
///
/// Convenience wrapper around [`FanoutEngine::run`].
///
/// # Errors
///
/// See [`FanoutEngine::run`].
pub fn compute_fanout(
    pads: &[PadView],
    skip_outer_rings: u32,
    edge_layer_rings: u32,
) -> Result<FanoutResult, FanoutError> {
    FanoutEngine::new(skip_outer_rings, edge_layer_rings).run(pads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fanout::grid::lattice;

    fn pads(columns: u32, rows: u32, pitch: f64) -> Vec<PadView> {
        lattice(columns, rows, pitch, Point::default())
            .into_iter()
            .zip(1..)
            .map(|(p, net)| PadView::new(p, net, "F.Cu"))
            .collect()
    }

    #[test]
    fn empty_selection() {
        assert_eq!(compute_fanout(&[], 1, 0), Err(FanoutError::EmptySelection));
    }

    #[test]
    fn no_reference_net() {
        let pads: Vec<PadView> = pads(4, 4, 1.0)
            .into_iter()
            .map(PadView::single_terminal)
            .collect();
        assert_eq!(compute_fanout(&pads, 1, 0), Err(FanoutError::NoReferenceNet));
    }

    #[test]
    fn single_terminal_pads_are_left_alone() {
        let mut pads = pads(6, 6, 1.0);
        // (2, 2) is interior
        pads[14] = pads[14].clone().single_terminal();

        let result = compute_fanout(&pads, 1, 0).unwrap();
        assert_eq!(result.records.len(), 15);
        assert!(result.records.iter().all(|r| r.net_id != 15));
    }

    #[test]
    fn reference_is_first_multi_terminal_pad() {
        let mut pads = pads(6, 6, 1.0);
        // Pad 0 is in the skipped ring; its single-terminal status moves the
        // reference to pad 1 whose rules are infeasible.
        pads[0] = pads[0].clone().single_terminal();
        pads[1] = pads[1].clone().with_via(0.1, 0.05).with_clearance(0.1);

        assert_eq!(
            compute_fanout(&pads, 1, 0),
            Err(FanoutError::InfeasibleClearance {
                pad: Some(1),
                required_separation: 0.2,
                half_pitch: 0.5,
            })
        );
    }

    #[test]
    fn infeasible_routed_pad_aborts_component() {
        let mut pads = pads(6, 6, 1.0);
        pads[21] = pads[21].clone().with_via(0.2, 0.1).with_clearance(0.1);

        let err = compute_fanout(&pads, 1, 0).unwrap_err();
        assert!(matches!(
            err,
            FanoutError::InfeasibleClearance { pad: Some(21), .. }
        ));
    }

    #[test]
    fn infeasible_skipped_pad_is_ignored() {
        let mut pads = pads(6, 6, 1.0);
        // Outer ring, never routed, and not the reference
        pads[5] = pads[5].clone().with_via(0.1, 0.05).with_clearance(0.05);

        let result = compute_fanout(&pads, 1, 0).unwrap();
        assert_eq!(result.records.len(), 16);
    }

    #[test]
    fn records_carry_pad_rules() {
        let mut pads = pads(4, 4, 1.0);
        pads[5] = PadView::new(pads[5].position, 42, "B.Cu")
            .with_via(0.6, 0.3)
            .with_track_width(0.1);

        let result = compute_fanout(&pads, 1, 0).unwrap();
        let record = result
            .records
            .iter()
            .find(|r| r.net_id == 42)
            .expect("pad 5 is interior");

        assert_eq!(record.track_layer, "B.Cu");
        assert!((record.via_diameter - 0.6).abs() < f64::EPSILON);
        assert!((record.via_drill_size - 0.3).abs() < f64::EPSILON);
        assert!((record.track_width - 0.1).abs() < f64::EPSILON);
        assert_eq!(record.track_start, Point::new(1.0, 1.0));
        assert_eq!(record.via_position, Point::new(0.5, 0.5));
    }

    #[test]
    fn huge_edge_band_does_not_overflow() {
        // Every pad lies inside the band along both axes, so none is an
        // edge transition and all escape diagonally.
        let result = compute_fanout(&pads(4, 4, 1.0), 0, u32::MAX).unwrap();
        assert_eq!(result.records.len(), 16);
        for record in &result.records {
            assert!((record.offset().length() - 0.5 * std::f64::consts::SQRT_2).abs() < 1e-9);
        }
    }

    #[test]
    fn reports_spacing() {
        let result = compute_fanout(&pads(5, 5, 0.65), 0, 0).unwrap();
        assert!((result.spacing - 0.65).abs() < 1e-9);
        assert_eq!(result.records.len(), 25);
    }
}
