//! Fixed-region map projection.
//!
//! The map image covers a bounding box around Bosnia & Herzegovina.
//! Geographic coordinates map to native image pixels with a plain
//! equirectangular projection; at this scale the distortion is well
//! below marker size.

/// Southern edge of the map frame.
pub const MIN_LAT: f64 = 42.45;
/// Northern edge of the map frame.
pub const MAX_LAT: f64 = 45.35;
/// Western edge of the map frame.
pub const MIN_LNG: f64 = 15.65;
/// Eastern edge of the map frame.
pub const MAX_LNG: f64 = 19.70;

/// Native map image width in pixels.
pub const MAP_WIDTH_PX: f64 = 1024.0;
/// Native map image height in pixels:
/// width * lat span / (lng span * cos of the mid latitude).
pub const MAP_HEIGHT_PX: f64 = 1018.0;

/// Meters spanned by one degree of latitude.
const METERS_PER_DEG_LAT: f64 = 111_195.0;

/// Project a coordinate to native image pixels, clamped to the frame.
/// Pixel y grows southward.
pub fn lat_lng_to_px(lat: f64, lng: f64) -> (f64, f64) {
    let x = (lng - MIN_LNG) / (MAX_LNG - MIN_LNG) * MAP_WIDTH_PX;
    let y = (MAX_LAT - lat) / (MAX_LAT - MIN_LAT) * MAP_HEIGHT_PX;
    (x.clamp(0.0, MAP_WIDTH_PX), y.clamp(0.0, MAP_HEIGHT_PX))
}

/// Inverse of [`lat_lng_to_px`] for click handling.
pub fn px_to_lat_lng(x: f64, y: f64) -> (f64, f64) {
    let lng = MIN_LNG + x / MAP_WIDTH_PX * (MAX_LNG - MIN_LNG);
    let lat = MAX_LAT - y / MAP_HEIGHT_PX * (MAX_LAT - MIN_LAT);
    (lat.clamp(MIN_LAT, MAX_LAT), lng.clamp(MIN_LNG, MAX_LNG))
}

/// Convert a distance in meters to pixels in native image space, using
/// the latitude scale (constant across the frame).
pub fn meters_to_px(meters: f64) -> f64 {
    let frame_height_m = (MAX_LAT - MIN_LAT) * METERS_PER_DEG_LAT;
    meters * MAP_HEIGHT_PX / frame_height_m
}
