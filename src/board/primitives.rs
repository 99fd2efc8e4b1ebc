//! Board document primitives.
//!
//! All lengths are in millimetres.

use serde::{Deserialize, Serialize};

use crate::fanout::EscapeRecord;

/// Name of the net class used when a net does not name one.
pub const DEFAULT_NET_CLASS: &str = "Default";

/// Net code meaning "not connected".
pub const NO_NET: u32 = 0;

/// Routing rules shared by the nets of a class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetClass {
    /// Minimum copper-to-copper clearance.
    pub clearance: f64,
    /// Track width.
    pub track_width: f64,
    /// Via outer diameter.
    pub via_diameter: f64,
    /// Via drill diameter.
    pub via_drill: f64,
}

/// A net.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    /// Net code, referenced by pads, tracks and vias.
    pub code: u32,
    /// Net name.
    pub name: String,
    /// Net class name.
    #[serde(default = "default_class")]
    pub class: String,
}

fn default_class() -> String {
    DEFAULT_NET_CLASS.to_string()
}

fn default_layer() -> String {
    "F.Cu".to_string()
}

/// A footprint pad placed on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardPad {
    /// Pad number (e.g., "A1").
    pub number: String,
    /// X position.
    pub x: f64,
    /// Y position.
    pub y: f64,
    /// Net code, 0 for unconnected.
    #[serde(default)]
    pub net: u32,
    /// Copper layer.
    #[serde(default = "default_layer")]
    pub layer: String,
}

/// A placed footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    /// Reference designator (e.g., "U1").
    pub reference: String,
    /// Whether the footprint is selected in the editor.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
    /// Pads of the footprint.
    #[serde(default)]
    pub pads: Vec<BoardPad>,
}

/// A straight track segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Start X position.
    pub x1: f64,
    /// Start Y position.
    pub y1: f64,
    /// End X position.
    pub x2: f64,
    /// End Y position.
    pub y2: f64,
    /// Line width.
    pub width: f64,
    /// Copper layer.
    pub layer: String,
    /// Net code.
    pub net: u32,
}

/// A through via.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Via {
    /// X position.
    pub x: f64,
    /// Y position.
    pub y: f64,
    /// Outer diameter.
    pub diameter: f64,
    /// Drill diameter.
    pub drill: f64,
    /// Net code.
    pub net: u32,
}

impl From<&EscapeRecord> for Track {
    fn from(record: &EscapeRecord) -> Self {
        Self {
            x1: record.track_start.x,
            y1: record.track_start.y,
            x2: record.track_end.x,
            y2: record.track_end.y,
            width: record.track_width,
            layer: record.track_layer.clone(),
            net: record.net_id,
        }
    }
}

impl From<&EscapeRecord> for Via {
    fn from(record: &EscapeRecord) -> Self {
        Self {
            x: record.via_position.x,
            y: record.via_position.y,
            diameter: record.via_diameter,
            drill: record.via_drill_size,
            net: record.net_id,
        }
    }
}
