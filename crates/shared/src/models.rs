use serde::{Deserialize, Serialize};

use crate::color;
use crate::geo::LatLng;

/// A named point annotation with an optional radius circle.
///
/// The name is the sole stable identifier: lines and the share encoding
/// reference markers by name, never by list position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub name: String,
    /// Circle radius in meters; `0` means no circle.
    pub radius: f64,
    pub lat: f64,
    pub lng: f64,
    /// `RRGGBBAA` hex code for the circle stroke/fill.
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    color::DEFAULT_COLOR.to_string()
}

impl Marker {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    pub fn has_circle(&self) -> bool {
        self.radius > 0.0
    }
}

/// A connection between two markers, referenced by name, with the
/// geodesic distance cached at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    /// In-memory graphic handle. Never serialized; reassigned on restore.
    #[serde(skip)]
    pub id: u64,
    pub marker1: String,
    pub marker2: String,
    /// Meters between the endpoints when the line was created.
    pub distance: f64,
}

impl Line {
    pub fn touches(&self, name: &str) -> bool {
        self.marker1 == name || self.marker2 == name
    }

    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.marker1 == a && self.marker2 == b) || (self.marker1 == b && self.marker2 == a)
    }
}

// Equality ignores the transient graphic id so that snapshots compare by
// content across encode/decode.
impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.marker1 == other.marker1
            && self.marker2 == other.marker2
            && self.distance == other.distance
    }
}

/// The full serializable annotation state at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub markers: Vec<Marker>,
    pub lines: Vec<Line>,
}
