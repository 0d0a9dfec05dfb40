//! Conversions between browser client coordinates, the zoom/pan
//! transformed container, and native map-image pixels.
//!
//! The map content renders at `width: 100%` of its container with a CSS
//! `translate(pan) scale(zoom)` transform, so both axes share one scale
//! factor (`MAP_WIDTH_PX / container_w`). The pure functions here are
//! the testable half; the `web_sys` lookups sit in thin wrappers.

use bihmap_shared::geo::LatLng;
use bihmap_shared::proj;

use crate::surface::Viewport;

/// Pure function: convert container-relative coordinates to native
/// map-image pixels, undoing the zoom/pan CSS transform.
pub fn container_to_map_px(
    container_x: f64,
    container_y: f64,
    container_w: f64,
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
) -> Option<(f64, f64)> {
    if container_w <= 0.0 || zoom <= 0.0 {
        return None;
    }

    let rendered_x = (container_x - pan_x) / zoom;
    let rendered_y = (container_y - pan_y) / zoom;

    let scale = proj::MAP_WIDTH_PX / container_w;
    let img_x = (rendered_x * scale).clamp(0.0, proj::MAP_WIDTH_PX);
    let img_y = (rendered_y * scale).clamp(0.0, proj::MAP_HEIGHT_PX);

    Some((img_x, img_y))
}

/// Pan offsets that put the viewport center in the middle of the
/// container at the viewport's zoom.
pub fn viewport_to_pan(viewport: &Viewport, container_w: f64, container_h: f64) -> (f64, f64) {
    let (cx, cy) = proj::lat_lng_to_px(viewport.center.lat, viewport.center.lng);
    let scale = container_w / proj::MAP_WIDTH_PX;
    let pan_x = container_w / 2.0 - cx * scale * viewport.zoom;
    let pan_y = container_h / 2.0 - cy * scale * viewport.zoom;
    clamp_pan(pan_x, pan_y, viewport.zoom, container_w, container_h)
}

/// Invert [`viewport_to_pan`]: recover the center coordinate from pan
/// offsets, for writing gesture results back to the viewport.
pub fn pan_to_center(
    pan_x: f64,
    pan_y: f64,
    zoom: f64,
    container_w: f64,
    container_h: f64,
) -> LatLng {
    let scale = container_w / proj::MAP_WIDTH_PX;
    let cx = (container_w / 2.0 - pan_x) / (scale * zoom);
    let cy = (container_h / 2.0 - pan_y) / (scale * zoom);
    let (lat, lng) = proj::px_to_lat_lng(cx, cy);
    LatLng::new(lat, lng)
}

/// Clamp pan values so the map can't be dragged off-screen. The content
/// height is derived from the container width because the map preserves
/// its aspect ratio.
pub fn clamp_pan(
    pan_x: f64,
    pan_y: f64,
    zoom: f64,
    container_w: f64,
    container_h: f64,
) -> (f64, f64) {
    let content_w = container_w * zoom;
    let content_h = container_w * (proj::MAP_HEIGHT_PX / proj::MAP_WIDTH_PX) * zoom;
    let min_pan_x = -(content_w - container_w).max(0.0);
    let min_pan_y = -(content_h - container_h).max(0.0);
    (pan_x.clamp(min_pan_x, 0.0), pan_y.clamp(min_pan_y, 0.0))
}

/// Compute new pan offsets so that `cursor` stays over the same content
/// point when zooming from `old_zoom` to `new_zoom`.
pub fn zoom_pan_at_cursor(
    cursor_x: f64,
    cursor_y: f64,
    old_zoom: f64,
    new_zoom: f64,
    old_pan_x: f64,
    old_pan_y: f64,
) -> (f64, f64) {
    let content_x = (cursor_x - old_pan_x) / old_zoom;
    let content_y = (cursor_y - old_pan_y) / old_zoom;
    (
        cursor_x - content_x * new_zoom,
        cursor_y - content_y * new_zoom,
    )
}

/// Get the bounding client rect of an element by id.
pub fn element_rect(id: &str) -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(id)?;
    Some(element.get_bounding_client_rect())
}

/// Convert a client-coordinate click on the given container into a
/// geographic coordinate, undoing the current viewport transform.
pub fn click_to_lat_lng(
    client_x: f64,
    client_y: f64,
    container_id: &str,
    viewport: &Viewport,
) -> Option<LatLng> {
    let rect = element_rect(container_id)?;
    let container_x = client_x - rect.left();
    let container_y = client_y - rect.top();
    let (pan_x, pan_y) = viewport_to_pan(viewport, rect.width(), rect.height());
    let (img_x, img_y) = container_to_map_px(
        container_x,
        container_y,
        rect.width(),
        viewport.zoom,
        pan_x,
        pan_y,
    )?;
    let (lat, lng) = proj::px_to_lat_lng(img_x, img_y);
    Some(LatLng::new(lat, lng))
}
