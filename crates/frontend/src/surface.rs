//! Retained-graphics map surface.
//!
//! `Scene` is the frontend's implementation of the core `MapSurface`
//! trait: the edit operations place and remove graphics here, and the
//! map view renders whatever the scene currently holds. Graphics are
//! keyed by the marker name or line id that owns them, so ownership
//! follows the store records exactly.

use bihmap_shared::color::Rgba;
use bihmap_shared::geo::{self, LatLng};
use bihmap_shared::models::Marker;
use bihmap_shared::ops::MapSurface;
use bihmap_shared::proj;

pub const ZOOM_MIN: f64 = 1.0;
pub const ZOOM_MAX: f64 = 10.0;

/// Zoom level used when focusing a single marker.
const FOCUS_ZOOM: f64 = 6.0;

/// Padding factor when fitting a line's bounding box into view.
const FIT_PADDING: f64 = 1.4;

#[derive(Debug, Clone, PartialEq)]
pub struct PointGraphic {
    pub name: String,
    pub position: LatLng,
    pub popup: String,
    pub popup_open: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleGraphic {
    pub name: String,
    pub position: LatLng,
    pub radius_m: f64,
    pub stroke: String,
    pub fill: String,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineGraphic {
    pub id: u64,
    pub from: LatLng,
    pub to: LatLng,
    pub popup: String,
}

/// What the map view is currently looking at: a center coordinate and a
/// magnification over the base frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: LatLng::new(44.0, 17.5),
            zoom: 1.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct Scene {
    pub points: Vec<PointGraphic>,
    pub circles: Vec<CircleGraphic>,
    pub lines: Vec<LineGraphic>,
    pub viewport: Viewport,
    /// Staged coordinate preview, shown translucent until the marker
    /// form is submitted.
    pub temp_marker: Option<LatLng>,
}

impl Scene {
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.viewport = Viewport {
            center,
            zoom: zoom.clamp(ZOOM_MIN, ZOOM_MAX),
        };
    }

    pub fn reset_view(&mut self) {
        self.viewport = Viewport::default();
    }

    pub fn stage(&mut self, position: LatLng) {
        self.temp_marker = Some(position);
    }

    pub fn clear_stage(&mut self) {
        self.temp_marker = None;
    }

    fn close_popups(&mut self) {
        for point in &mut self.points {
            point.popup_open = false;
        }
    }
}

/// Zoom level that fits a bounding box of the given pixel extent.
fn zoom_to_fit(extent_x_px: f64, extent_y_px: f64) -> f64 {
    let zx = proj::MAP_WIDTH_PX / (extent_x_px * FIT_PADDING).max(1.0);
    let zy = proj::MAP_HEIGHT_PX / (extent_y_px * FIT_PADDING).max(1.0);
    zx.min(zy).clamp(ZOOM_MIN, ZOOM_MAX)
}

impl MapSurface for Scene {
    fn place_marker(&mut self, marker: &Marker, popup: &str) {
        self.points.retain(|p| p.name != marker.name);
        self.points.push(PointGraphic {
            name: marker.name.clone(),
            position: marker.position(),
            popup: popup.to_string(),
            popup_open: false,
        });
    }

    fn remove_marker(&mut self, name: &str) {
        self.points.retain(|p| p.name != name);
    }

    fn place_circle(&mut self, marker: &Marker, style: &Rgba) {
        self.circles.retain(|c| c.name != marker.name);
        self.circles.push(CircleGraphic {
            name: marker.name.clone(),
            position: marker.position(),
            radius_m: marker.radius,
            stroke: style.stroke.clone(),
            fill: style.fill.clone(),
            fill_opacity: style.fill_opacity,
        });
    }

    fn remove_circle(&mut self, name: &str) {
        self.circles.retain(|c| c.name != name);
    }

    fn restyle_circle(&mut self, name: &str, style: &Rgba) {
        if let Some(circle) = self.circles.iter_mut().find(|c| c.name == name) {
            circle.stroke = style.stroke.clone();
            circle.fill = style.fill.clone();
            circle.fill_opacity = style.fill_opacity;
        }
    }

    fn place_line(&mut self, id: u64, from: LatLng, to: LatLng, popup: &str) {
        self.lines.retain(|l| l.id != id);
        self.lines.push(LineGraphic {
            id,
            from,
            to,
            popup: popup.to_string(),
        });
    }

    fn remove_line(&mut self, id: u64) {
        self.lines.retain(|l| l.id != id);
    }

    fn focus_marker(&mut self, marker: &Marker) {
        self.close_popups();
        if let Some(point) = self.points.iter_mut().find(|p| p.name == marker.name) {
            point.popup_open = true;
        }
        self.set_view(marker.position(), FOCUS_ZOOM);
    }

    fn focus_line(&mut self, from: LatLng, to: LatLng) {
        self.close_popups();
        let center = LatLng::new((from.lat + to.lat) / 2.0, (from.lng + to.lng) / 2.0);
        let (x1, y1) = proj::lat_lng_to_px(from.lat, from.lng);
        let (x2, y2) = proj::lat_lng_to_px(to.lat, to.lng);
        let zoom = zoom_to_fit((x2 - x1).abs(), (y2 - y1).abs());
        self.set_view(center, zoom);
    }

    fn distance_m(&self, a: LatLng, b: LatLng) -> f64 {
        geo::haversine_m(a, b)
    }

    fn clear(&mut self) {
        self.points.clear();
        self.circles.clear();
        self.lines.clear();
        self.temp_marker = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bihmap_shared::color;

    fn marker(name: &str, lat: f64, lng: f64, radius: f64) -> Marker {
        Marker {
            name: name.to_string(),
            radius,
            lat,
            lng,
            color: color::DEFAULT_COLOR.to_string(),
        }
    }

    #[test]
    fn test_place_marker_is_an_upsert() {
        let mut scene = Scene::default();
        scene.place_marker(&marker("A", 44.0, 17.5, 0.0), "A");
        scene.place_marker(&marker("A", 43.0, 18.0, 0.0), "A moved");
        assert_eq!(scene.points.len(), 1);
        assert_eq!(scene.points[0].position, LatLng::new(43.0, 18.0));
    }

    #[test]
    fn test_circle_lifecycle() {
        let mut scene = Scene::default();
        let m = marker("B", 44.0, 18.5, 500.0);
        let style = color::parse_rrggbbaa("ff0000ff").unwrap();
        scene.place_circle(&m, &style);
        assert_eq!(scene.circles[0].stroke, "rgb(255,0,0)");

        let restyle = color::parse_rrggbbaa("00ff00ff").unwrap();
        scene.restyle_circle("B", &restyle);
        assert_eq!(scene.circles[0].stroke, "rgb(0,255,0)");
        assert_eq!(scene.circles[0].radius_m, 500.0);

        scene.remove_circle("B");
        assert!(scene.circles.is_empty());
    }

    #[test]
    fn test_restyle_missing_circle_is_noop() {
        let mut scene = Scene::default();
        let style = color::parse_rrggbbaa("00ff00ff").unwrap();
        scene.restyle_circle("nobody", &style);
        assert!(scene.circles.is_empty());
    }

    #[test]
    fn test_focus_marker_opens_single_popup() {
        let mut scene = Scene::default();
        let a = marker("A", 44.0, 17.5, 0.0);
        let b = marker("B", 43.0, 18.0, 0.0);
        scene.place_marker(&a, "A");
        scene.place_marker(&b, "B");

        scene.focus_marker(&a);
        assert!(scene.points.iter().find(|p| p.name == "A").unwrap().popup_open);

        scene.focus_marker(&b);
        assert!(!scene.points.iter().find(|p| p.name == "A").unwrap().popup_open);
        assert!(scene.points.iter().find(|p| p.name == "B").unwrap().popup_open);
        assert_eq!(scene.viewport.center, b.position());
        assert!(scene.viewport.zoom > 1.0);
    }

    #[test]
    fn test_focus_line_centers_midpoint() {
        let mut scene = Scene::default();
        let from = LatLng::new(44.0, 17.5);
        let to = LatLng::new(44.0, 18.5);
        scene.focus_line(from, to);
        assert!((scene.viewport.center.lat - 44.0).abs() < 1e-9);
        assert!((scene.viewport.center.lng - 18.0).abs() < 1e-9);
        assert!(scene.viewport.zoom >= ZOOM_MIN && scene.viewport.zoom <= ZOOM_MAX);
    }

    #[test]
    fn test_zoom_to_fit_larger_extent_means_lower_zoom() {
        assert!(zoom_to_fit(800.0, 10.0) < zoom_to_fit(100.0, 10.0));
        // Degenerate extent clamps to max zoom rather than dividing by zero
        assert_eq!(zoom_to_fit(0.0, 0.0), ZOOM_MAX);
    }

    #[test]
    fn test_set_view_clamps_zoom() {
        let mut scene = Scene::default();
        scene.set_view(LatLng::new(44.0, 17.5), 99.0);
        assert_eq!(scene.viewport.zoom, ZOOM_MAX);
        scene.set_view(LatLng::new(44.0, 17.5), 0.1);
        assert_eq!(scene.viewport.zoom, ZOOM_MIN);
    }

    #[test]
    fn test_clear_drops_graphics_and_stage() {
        let mut scene = Scene::default();
        scene.place_marker(&marker("A", 44.0, 17.5, 0.0), "A");
        scene.place_line(1, LatLng::new(44.0, 17.5), LatLng::new(43.0, 18.0), "x");
        scene.stage(LatLng::new(44.5, 17.0));
        scene.clear();
        assert!(scene.points.is_empty());
        assert!(scene.lines.is_empty());
        assert!(scene.temp_marker.is_none());
    }
}
