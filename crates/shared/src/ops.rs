//! Edit operations: the orchestration layer between user commands, the
//! annotation store, the map surface, and durable persistence.
//!
//! Every mutating command runs the same fixed sequence: validate inputs,
//! mutate the store, sync the affected graphics, rewrite the durable
//! snapshot. Validation failures abort before any of the later steps, so
//! a rejected command leaves every representation untouched.

use crate::codec;
use crate::color::{self, Rgba};
use crate::geo::{self, LatLng};
use crate::models::{Line, Marker, Snapshot};
use crate::store::{AnnotationStore, StoreError};

/// The rendering collaborator. Graphics are keyed by the marker name or
/// line id that owns them; the implementation holds the actual visuals.
pub trait MapSurface {
    fn place_marker(&mut self, marker: &Marker, popup: &str);
    fn remove_marker(&mut self, name: &str);
    fn place_circle(&mut self, marker: &Marker, style: &Rgba);
    fn remove_circle(&mut self, name: &str);
    fn restyle_circle(&mut self, name: &str, style: &Rgba);
    fn place_line(&mut self, id: u64, from: LatLng, to: LatLng, popup: &str);
    fn remove_line(&mut self, id: u64);
    /// Pan/zoom to a marker and open its popup.
    fn focus_marker(&mut self, marker: &Marker);
    /// Pan/zoom to fit both endpoints of a line.
    fn focus_line(&mut self, from: LatLng, to: LatLng);
    /// Great-circle distance in meters as the surface measures it.
    fn distance_m(&self, a: LatLng, b: LatLng) -> f64;
    fn clear(&mut self);
}

/// The persistence collaborator: a process-wide string key-value slot,
/// read once at startup and overwritten wholesale after every mutation.
pub trait SnapshotStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

pub struct Editor<S: MapSurface, P: SnapshotStore> {
    store: AnnotationStore,
    surface: S,
    persistence: P,
}

fn marker_popup(marker: &Marker) -> String {
    format!(
        "{}\nLat: {:.6}\nLng: {:.6}",
        marker.name, marker.lat, marker.lng
    )
}

fn line_popup(line: &Line) -> String {
    format!(
        "{} ↔ {} ({})",
        line.marker1,
        line.marker2,
        geo::format_distance(line.distance)
    )
}

impl<S: MapSurface, P: SnapshotStore> Editor<S, P> {
    pub fn new(surface: S, persistence: P) -> Self {
        Self {
            store: AnnotationStore::new(),
            surface,
            persistence,
        }
    }

    /// Startup sequence: load the durable snapshot, then apply a one-shot
    /// URL import if a query was supplied. An import overwrites the
    /// in-memory state and is immediately re-persisted; the return value
    /// tells the caller to strip the query from the address bar.
    pub fn startup(&mut self, url_query: Option<(&str, &str)>) -> bool {
        let markers_json = self
            .persistence
            .get(codec::MARKERS_KEY)
            .unwrap_or_else(|| "[]".to_string());
        let lines_json = self
            .persistence
            .get(codec::LINES_KEY)
            .unwrap_or_else(|| "[]".to_string());
        let stored = codec::decode_snapshot(&markers_json, &lines_json);
        self.apply_snapshot(&stored);

        let Some((markers_param, lines_param)) = url_query else {
            return false;
        };
        let surface = &self.surface;
        let imported = codec::decode_share_query(markers_param, lines_param, |a, b| {
            surface.distance_m(a, b)
        });
        self.apply_snapshot(&imported);
        self.persist_all();
        true
    }

    /// Add a marker. Surrounding whitespace in the name is not
    /// significant; everything else is validated by the store.
    pub fn add_marker(
        &mut self,
        name: &str,
        lat: f64,
        lng: f64,
        radius: f64,
        color_code: Option<&str>,
    ) -> Result<(), StoreError> {
        let name = name.trim();
        let marker = self
            .store
            .add_marker(name, lat, lng, radius, color_code)?
            .clone();
        Self::sync_marker(&mut self.surface, &marker);
        self.persist_markers();
        Ok(())
    }

    /// Remove a marker and cascade to its lines. No-op if absent.
    pub fn remove_marker(&mut self, name: &str) {
        let Some((marker, lines)) = self.store.remove_marker(name) else {
            return;
        };
        for line in &lines {
            self.surface.remove_line(line.id);
        }
        if marker.has_circle() {
            self.surface.remove_circle(&marker.name);
        }
        self.surface.remove_marker(&marker.name);
        self.persist_all();
    }

    /// Connect two markers with a line; the distance is measured by the
    /// surface at creation time and cached on the record.
    pub fn connect(&mut self, name1: &str, name2: &str) -> Result<(), StoreError> {
        let a = self
            .store
            .marker(name1)
            .ok_or_else(|| StoreError::UnknownMarker(name1.to_string()))?
            .position();
        let b = self
            .store
            .marker(name2)
            .ok_or_else(|| StoreError::UnknownMarker(name2.to_string()))?
            .position();
        let distance = self.surface.distance_m(a, b);
        let line = self.store.add_line(name1, name2, distance)?.clone();
        self.surface.place_line(line.id, a, b, &line_popup(&line));
        self.persist_lines();
        Ok(())
    }

    /// Remove the first line between the pair, either endpoint order.
    pub fn remove_line(&mut self, name1: &str, name2: &str) {
        if let Some(line) = self.store.remove_line(name1, name2) {
            self.surface.remove_line(line.id);
            self.persist_lines();
        }
    }

    /// Remove a specific line by its graphic handle.
    pub fn remove_line_by_id(&mut self, id: u64) {
        if let Some(line) = self.store.remove_line_by_id(id) {
            self.surface.remove_line(line.id);
            self.persist_lines();
        }
    }

    /// Change a marker's color and restyle its circle, if it has one.
    /// An invalid code is rejected with the prior color left in effect.
    pub fn recolor(&mut self, name: &str, code: &str) -> Result<(), StoreError> {
        self.store.set_marker_color(name, code)?;
        let Some(marker) = self.store.marker(name) else {
            return Ok(());
        };
        if marker.has_circle() {
            if let Some(style) = color::parse_rrggbbaa(&marker.color) {
                self.surface.restyle_circle(name, &style);
            }
        }
        self.persist_markers();
        Ok(())
    }

    /// Remove all markers, lines and graphics, and persist the empty
    /// snapshot.
    pub fn clear(&mut self) {
        self.store.clear();
        self.surface.clear();
        self.persist_all();
    }

    pub fn focus_marker(&mut self, name: &str) {
        if let Some(marker) = self.store.marker(name).cloned() {
            self.surface.focus_marker(&marker);
        }
    }

    pub fn focus_line(&mut self, id: u64) {
        let Some(line) = self.store.line(id) else {
            return;
        };
        if let (Some(a), Some(b)) = (
            self.store.marker(&line.marker1),
            self.store.marker(&line.marker2),
        ) {
            let (a, b) = (a.position(), b.position());
            self.surface.focus_line(a, b);
        }
    }

    /// The current snapshot as a share query string, ready to append to
    /// the app origin as `?markers=...&lines=...`.
    pub fn share_query(&self) -> String {
        codec::encode_share_query(&self.store.snapshot())
    }

    pub fn markers(&self) -> &[Marker] {
        self.store.markers()
    }

    pub fn lines(&self) -> &[Line] {
        self.store.lines()
    }

    pub fn marker(&self, name: &str) -> Option<&Marker> {
        self.store.marker(name)
    }

    /// Names in display order, for the connect-line selection lists.
    pub fn marker_names(&self) -> Vec<String> {
        self.store.markers().iter().map(|m| m.name.clone()).collect()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    // Replace store contents and re-render everything from scratch.
    fn apply_snapshot(&mut self, snapshot: &Snapshot) {
        self.surface.clear();
        self.store.restore(snapshot);
        for marker in self.store.markers() {
            Self::sync_marker(&mut self.surface, marker);
        }
        for line in self.store.lines() {
            if let (Some(a), Some(b)) = (
                self.store.marker(&line.marker1),
                self.store.marker(&line.marker2),
            ) {
                self.surface
                    .place_line(line.id, a.position(), b.position(), &line_popup(line));
            }
        }
    }

    fn sync_marker(surface: &mut S, marker: &Marker) {
        surface.place_marker(marker, &marker_popup(marker));
        if marker.has_circle() {
            if let Some(style) = color::parse_rrggbbaa(&marker.color) {
                surface.place_circle(marker, &style);
            }
        }
    }

    fn persist_markers(&mut self) {
        self.persistence
            .set(codec::MARKERS_KEY, &codec::encode_markers(self.store.markers()));
    }

    fn persist_lines(&mut self) {
        self.persistence
            .set(codec::LINES_KEY, &codec::encode_lines(self.store.lines()));
    }

    fn persist_all(&mut self) {
        self.persist_markers();
        self.persist_lines();
    }
}
