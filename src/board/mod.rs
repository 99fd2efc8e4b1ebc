//! JSON board document: the host side of the fanout.
//!
//! The fanout core only sees [`PadView`]s and returns
//! [`EscapeRecord`]s. This module provides a small board model that
//! resolves pads into views (net connectivity, net class rules) and appends
//! the resulting tracks and vias.
//!
//! # Document Format
//!
//! ```json
//! {
//!   "net_classes": {
//!     "Default": { "clearance": 0.2, "track_width": 0.2, "via_diameter": 0.4, "via_drill": 0.2 }
//!   },
//!   "nets": [ { "code": 1, "name": "GND", "class": "Default" } ],
//!   "footprints": [
//!     { "reference": "U1", "selected": true,
//!       "pads": [ { "number": "A1", "x": 0.0, "y": 0.0, "net": 1, "layer": "F.Cu" } ] }
//!   ],
//!   "tracks": [],
//!   "vias": []
//! }
//! ```

mod error;
pub mod fanout;
pub mod primitives;

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use error::{BoardError, BoardResult};
pub use fanout::FootprintOutcome;
pub use primitives::{BoardPad, Footprint, Net, NetClass, Track, Via, DEFAULT_NET_CLASS, NO_NET};

use crate::fanout::{EscapeRecord, PadView, Point};

/// A board document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// Net classes by name, in document order.
    #[serde(default)]
    pub net_classes: IndexMap<String, NetClass>,

    /// Nets.
    #[serde(default)]
    pub nets: Vec<Net>,

    /// Placed footprints.
    #[serde(default)]
    pub footprints: Vec<Footprint>,

    /// Routed tracks.
    #[serde(default)]
    pub tracks: Vec<Track>,

    /// Vias.
    #[serde(default)]
    pub vias: Vec<Via>,
}

impl Board {
    /// Creates a new empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a board from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Parse`] if the JSON does not match the board model.
    pub fn from_json(json: &str) -> BoardResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialises the board as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Parse`] if serialisation fails.
    pub fn to_json(&self) -> BoardResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads a board from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid board.
    pub fn read(path: impl AsRef<Path>) -> BoardResult<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| BoardError::file_read(path, e))?;
        Self::from_json(&contents)
    }

    /// Writes the board to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, path: impl AsRef<Path>) -> BoardResult<()> {
        let path = path.as_ref();
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| BoardError::file_write(path, e))
    }

    /// Returns the net with the given code.
    #[must_use]
    pub fn net(&self, code: u32) -> Option<&Net> {
        self.nets.iter().find(|n| n.code == code)
    }

    /// Number of pads on the whole board connected to `net`.
    ///
    /// Unconnected pads (net 0) never count as connected to each other.
    #[must_use]
    pub fn node_count(&self, net: u32) -> usize {
        if net == NO_NET {
            return 0;
        }
        self.footprints
            .iter()
            .flat_map(|fp| &fp.pads)
            .filter(|pad| pad.net == net)
            .count()
    }

    /// Resolves the routing rules of a net, falling back to the "Default"
    /// class when the net's own class is missing.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownNetClass`] if neither class exists.
    pub fn net_class(&self, net: &Net) -> BoardResult<NetClass> {
        self.net_classes
            .get(&net.class)
            .or_else(|| self.net_classes.get(DEFAULT_NET_CLASS))
            .copied()
            .ok_or_else(|| BoardError::UnknownNetClass {
                net: net.name.clone(),
                class: net.class.clone(),
            })
    }

    /// Finds a footprint by reference designator.
    #[must_use]
    pub fn footprint(&self, reference: &str) -> Option<&Footprint> {
        self.footprints.iter().find(|fp| fp.reference == reference)
    }

    /// Reference designators of all selected footprints, in document order.
    #[must_use]
    pub fn selected_references(&self) -> Vec<String> {
        self.footprints
            .iter()
            .filter(|fp| fp.selected)
            .map(|fp| fp.reference.clone())
            .collect()
    }

    /// Projects the pads of a footprint into read-only views.
    ///
    /// Unconnected pads get the "Default" class rules, or zeros if the board
    /// has none; they are never routed.
    ///
    /// # Errors
    ///
    /// Returns an error if a pad references an unknown net or a net class
    /// cannot be resolved.
    pub fn pad_views(&self, footprint: &Footprint) -> BoardResult<Vec<PadView>> {
        footprint
            .pads
            .iter()
            .map(|pad| -> BoardResult<PadView> {
                let rules = if pad.net == NO_NET {
                    self.net_classes
                        .get(DEFAULT_NET_CLASS)
                        .copied()
                        .unwrap_or_default()
                } else {
                    let net = self.net(pad.net).ok_or_else(|| BoardError::UnknownNet {
                        reference: footprint.reference.clone(),
                        pad: pad.number.clone(),
                        net: pad.net,
                    })?;
                    self.net_class(net)?
                };

                Ok(PadView {
                    position: Point::new(pad.x, pad.y),
                    net_id: pad.net,
                    is_multi_terminal: self.node_count(pad.net) > 1,
                    via_diameter: rules.via_diameter,
                    via_drill_size: rules.via_drill,
                    clearance: rules.clearance,
                    track_width: rules.track_width,
                    layer: pad.layer.clone(),
                })
            })
            .collect()
    }

    /// Appends a track and a via for every record.
    pub fn apply(&mut self, records: &[EscapeRecord]) {
        self.tracks.extend(records.iter().map(Track::from));
        self.vias.extend(records.iter().map(Via::from));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::from_json(
            r#"{
                "net_classes": {
                    "Default": { "clearance": 0.2, "track_width": 0.2, "via_diameter": 0.4, "via_drill": 0.2 },
                    "Power": { "clearance": 0.25, "track_width": 0.4, "via_diameter": 0.5, "via_drill": 0.25 }
                },
                "nets": [
                    { "code": 1, "name": "GND" },
                    { "code": 2, "name": "VCC", "class": "Power" },
                    { "code": 3, "name": "SIG", "class": "Missing" }
                ],
                "footprints": [
                    { "reference": "U1", "selected": true, "pads": [
                        { "number": "1", "x": 0.0, "y": 0.0, "net": 1 },
                        { "number": "2", "x": 1.0, "y": 0.0, "net": 2, "layer": "B.Cu" },
                        { "number": "3", "x": 2.0, "y": 0.0, "net": 3 },
                        { "number": "4", "x": 3.0, "y": 0.0 }
                    ] },
                    { "reference": "C1", "pads": [
                        { "number": "1", "x": 10.0, "y": 0.0, "net": 1 },
                        { "number": "2", "x": 11.0, "y": 0.0, "net": 2 }
                    ] }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn node_counts() {
        let board = board();
        assert_eq!(board.node_count(1), 2);
        assert_eq!(board.node_count(3), 1);
        assert_eq!(board.node_count(NO_NET), 0);
    }

    #[test]
    fn net_class_fallback() {
        let board = board();
        let sig = board.net(3).unwrap();
        assert_eq!(board.net_class(sig).unwrap(), board.net_classes["Default"]);

        let mut no_default = board.clone();
        no_default.net_classes.shift_remove("Default");
        assert!(matches!(
            no_default.net_class(sig),
            Err(BoardError::UnknownNetClass { .. })
        ));
    }

    #[test]
    fn pad_views_resolve_rules() {
        let board = board();
        let views = board.pad_views(board.footprint("U1").unwrap()).unwrap();

        assert_eq!(views.len(), 4);
        assert!(views[0].is_multi_terminal);
        assert!((views[1].via_diameter - 0.5).abs() < f64::EPSILON);
        assert!((views[1].track_width - 0.4).abs() < f64::EPSILON);
        assert_eq!(views[1].layer, "B.Cu");
        assert!(!views[2].is_multi_terminal);
        assert!(!views[3].is_multi_terminal);
        assert_eq!(views[3].net_id, NO_NET);
    }

    #[test]
    fn unknown_net_is_an_error() {
        let mut board = board();
        board.footprints[0].pads[0].net = 42;
        let fp = board.footprint("U1").unwrap();
        assert!(matches!(
            board.pad_views(fp),
            Err(BoardError::UnknownNet { net: 42, .. })
        ));
    }

    #[test]
    fn selected_references() {
        assert_eq!(board().selected_references(), vec!["U1".to_string()]);
    }

    #[test]
    fn apply_appends_tracks_and_vias() {
        let mut board = board();
        let pad = PadView::new(Point::new(0.0, 0.0), 1, "F.Cu");
        let records = vec![
            EscapeRecord::new(&pad, Point::new(0.5, 0.5)),
            EscapeRecord::new(&pad, Point::new(-0.5, 0.5)),
        ];
        board.apply(&records);

        assert_eq!(board.tracks.len(), 2);
        assert_eq!(board.vias.len(), 2);
        assert_eq!(board.vias[1].x, -0.5);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(
            Board::from_json("{ \"nets\": 5 }"),
            Err(BoardError::Parse(_))
        ));
    }

    #[test]
    fn net_class_order_survives_round_trip() {
        let board = board();
        let again = Board::from_json(&board.to_json().unwrap()).unwrap();
        let names: Vec<_> = again.net_classes.keys().cloned().collect();
        assert_eq!(names, vec!["Default".to_string(), "Power".to_string()]);
        assert_eq!(again, board);
    }
}
