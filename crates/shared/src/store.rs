//! Authoritative in-memory annotation state.
//!
//! The store owns the canonical marker and line records and enforces the
//! data invariants: unique marker names, no dangling line endpoints, no
//! self-connections, valid color codes. It knows nothing about rendering
//! or persistence; the ops layer keeps those in sync after each mutation.

use thiserror::Error;

use crate::color;
use crate::models::{Line, Marker, Snapshot};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("marker names may only contain letters, digits and underscores")]
    InvalidName,
    #[error("coordinates must be finite numbers")]
    InvalidCoordinate,
    #[error("a marker named \"{0}\" already exists")]
    DuplicateName(String),
    #[error("no marker named \"{0}\"")]
    UnknownMarker(String),
    #[error("cannot connect a marker to itself")]
    SelfConnection,
    #[error("color must be an 8 hex digit RRGGBBAA code")]
    InvalidColor,
}

/// Marker names are non-empty strings of word characters.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Debug, Default)]
pub struct AnnotationStore {
    markers: Vec<Marker>,
    lines: Vec<Line>,
    next_line_id: u64,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markers in insertion order (which is also display order).
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn marker(&self, name: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.name == name)
    }

    pub fn line(&self, id: u64) -> Option<&Line> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Insert a new marker at the end of display order.
    ///
    /// `color` falls back to [`color::DEFAULT_COLOR`] when `None`. A
    /// negative radius is clamped to zero.
    pub fn add_marker(
        &mut self,
        name: &str,
        lat: f64,
        lng: f64,
        radius: f64,
        color_code: Option<&str>,
    ) -> Result<&Marker, StoreError> {
        if !is_valid_name(name) {
            return Err(StoreError::InvalidName);
        }
        if !lat.is_finite() || !lng.is_finite() {
            return Err(StoreError::InvalidCoordinate);
        }
        let color_code = match color_code {
            Some(c) if !color::is_valid(c) => return Err(StoreError::InvalidColor),
            Some(c) => c.to_string(),
            None => color::DEFAULT_COLOR.to_string(),
        };
        if self.marker(name).is_some() {
            return Err(StoreError::DuplicateName(name.to_string()));
        }

        let idx = self.markers.len();
        self.markers.push(Marker {
            name: name.to_string(),
            radius: radius.max(0.0),
            lat,
            lng,
            color: color_code,
        });
        Ok(&self.markers[idx])
    }

    /// Remove a marker and every line referencing it. Lines go first so
    /// no line ever references an absent marker. Returns the removed
    /// records so the caller can retire their graphics; `None` if the
    /// name is not present (idempotent).
    pub fn remove_marker(&mut self, name: &str) -> Option<(Marker, Vec<Line>)> {
        let idx = self.markers.iter().position(|m| m.name == name)?;

        let mut kept = Vec::with_capacity(self.lines.len());
        let mut removed = Vec::new();
        for line in self.lines.drain(..) {
            if line.touches(name) {
                removed.push(line);
            } else {
                kept.push(line);
            }
        }
        self.lines = kept;

        let marker = self.markers.remove(idx);
        Some((marker, removed))
    }

    /// Connect two existing, distinct markers. Parallel duplicates of the
    /// same pair are allowed. The distance is the caller's to supply (the
    /// map surface at creation time, or storage verbatim on restore).
    pub fn add_line(
        &mut self,
        name1: &str,
        name2: &str,
        distance: f64,
    ) -> Result<&Line, StoreError> {
        if self.marker(name1).is_none() {
            return Err(StoreError::UnknownMarker(name1.to_string()));
        }
        if self.marker(name2).is_none() {
            return Err(StoreError::UnknownMarker(name2.to_string()));
        }
        if name1 == name2 {
            return Err(StoreError::SelfConnection);
        }

        let id = self.next_line_id;
        self.next_line_id += 1;
        let idx = self.lines.len();
        self.lines.push(Line {
            id,
            marker1: name1.to_string(),
            marker2: name2.to_string(),
            distance,
        });
        Ok(&self.lines[idx])
    }

    /// Remove the first line connecting the pair, in either endpoint
    /// order. `None` if no such line exists (idempotent).
    pub fn remove_line(&mut self, name1: &str, name2: &str) -> Option<Line> {
        let idx = self.lines.iter().position(|l| l.connects(name1, name2))?;
        Some(self.lines.remove(idx))
    }

    /// Remove a specific line by its graphic handle.
    pub fn remove_line_by_id(&mut self, id: u64) -> Option<Line> {
        let idx = self.lines.iter().position(|l| l.id == id)?;
        Some(self.lines.remove(idx))
    }

    /// Update a marker's color. Rejected codes leave the stored color
    /// untouched.
    pub fn set_marker_color(&mut self, name: &str, code: &str) -> Result<(), StoreError> {
        if !color::is_valid(code) {
            return Err(StoreError::InvalidColor);
        }
        let marker = self
            .markers
            .iter_mut()
            .find(|m| m.name == name)
            .ok_or_else(|| StoreError::UnknownMarker(name.to_string()))?;
        marker.color = code.to_string();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.markers.clear();
        self.lines.clear();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            markers: self.markers.clone(),
            lines: self.lines.clone(),
        }
    }

    /// Replace the store contents with a snapshot, replaying markers
    /// first and then lines through the validated insertion paths.
    /// Entries that fail validation (duplicate or malformed names,
    /// non-finite coordinates, dangling or self-referencing lines) are
    /// silently skipped so one corrupt record never blocks the rest.
    /// Line distances are kept verbatim; line ids are freshly assigned.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.clear();
        for m in &snapshot.markers {
            let _ = self.add_marker(&m.name, m.lat, m.lng, m.radius, Some(&m.color));
        }
        for l in &snapshot.lines {
            let _ = self.add_line(&l.marker1, &l.marker2, l.distance);
        }
    }
}
