//! Serialization of the annotation snapshot.
//!
//! Two independent encodings with different tradeoffs:
//!
//! - The durable snapshot: two JSON array strings, one per storage key,
//!   decoded element-wise so a corrupt entry drops alone instead of
//!   taking the whole snapshot with it.
//! - The share encoding: a compact pipe/semicolon query-string format,
//!   `name|lat|lng|radius|color;...` for markers and `name1|name2;...`
//!   for lines. There is no escaping, so names and colors containing
//!   `|` or `;` are unsupported (word characters only, enforced on
//!   import).

use crate::color;
use crate::geo::LatLng;
use crate::models::{Line, Marker, Snapshot};
use crate::store;

/// Storage key for the marker array.
pub const MARKERS_KEY: &str = "markers";
/// Storage key for the line array.
pub const LINES_KEY: &str = "lines";

// --- Durable snapshot ---

pub fn encode_markers(markers: &[Marker]) -> String {
    serde_json::to_string(markers).unwrap_or_else(|_| "[]".to_string())
}

pub fn encode_lines(lines: &[Line]) -> String {
    serde_json::to_string(lines).unwrap_or_else(|_| "[]".to_string())
}

/// Decode the two stored JSON arrays into a snapshot.
///
/// Each array element is deserialized independently; entries that fail
/// to parse are dropped. Semantic validation (name rules, duplicates,
/// dangling line endpoints) happens when the snapshot is replayed into
/// the store, so stored line distances pass through verbatim here.
pub fn decode_snapshot(markers_json: &str, lines_json: &str) -> Snapshot {
    let mut snapshot = Snapshot::default();

    if let Ok(values) = serde_json::from_str::<Vec<serde_json::Value>>(markers_json) {
        for value in values {
            if let Ok(marker) = serde_json::from_value::<Marker>(value) {
                snapshot.markers.push(marker);
            }
        }
    }
    if let Ok(values) = serde_json::from_str::<Vec<serde_json::Value>>(lines_json) {
        for value in values {
            if let Ok(line) = serde_json::from_value::<Line>(value) {
                snapshot.lines.push(line);
            }
        }
    }

    snapshot
}

// --- Share URL encoding ---

/// Flatten a snapshot into the `markers=...&lines=...` query string.
pub fn encode_share_query(snapshot: &Snapshot) -> String {
    let mut markers_param = String::new();
    for m in &snapshot.markers {
        markers_param.push_str(&format!(
            "{}|{}|{}|{}|{};",
            m.name,
            m.lat,
            m.lng,
            m.radius.round() as i64,
            m.color
        ));
    }

    let mut lines_param = String::new();
    for l in &snapshot.lines {
        lines_param.push_str(&format!("{}|{};", l.marker1, l.marker2));
    }

    format!("markers={}&lines={}", markers_param, lines_param)
}

/// Parse the markers query value. Each entry must look like
/// `name|lat|lng|radius|color` with a word-character name, finite float
/// coordinates and an integer radius; anything else is silently skipped.
/// Duplicate names are skipped (first occurrence wins). A color field
/// that is not 8 hex digits falls back to the default color rather than
/// sinking the whole entry.
pub fn decode_markers_param(param: &str) -> Vec<Marker> {
    let mut out: Vec<Marker> = Vec::new();

    for entry in param.split(';').filter(|e| !e.is_empty()) {
        let fields: Vec<&str> = entry.split('|').collect();
        if fields.len() != 5 {
            continue;
        }
        let name = fields[0];
        if !store::is_valid_name(name) {
            continue;
        }
        let (Ok(lat), Ok(lng)) = (fields[1].parse::<f64>(), fields[2].parse::<f64>()) else {
            continue;
        };
        if !lat.is_finite() || !lng.is_finite() {
            continue;
        }
        let Ok(radius) = fields[3].parse::<u64>() else {
            continue;
        };
        if !fields[4]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            continue;
        }
        if out.iter().any(|m| m.name == name) {
            continue;
        }
        let color_code = if color::is_valid(fields[4]) {
            fields[4].to_string()
        } else {
            color::DEFAULT_COLOR.to_string()
        };

        out.push(Marker {
            name: name.to_string(),
            radius: radius as f64,
            lat,
            lng,
            color: color_code,
        });
    }

    out
}

/// Decode a full share query into a snapshot. Line entries referencing
/// names absent from the decoded marker list, or naming the same marker
/// twice, are silently skipped. Line distances are recomputed from the
/// marker coordinates with the supplied distance function (the share
/// format does not carry them).
pub fn decode_share_query<F>(markers_param: &str, lines_param: &str, distance: F) -> Snapshot
where
    F: Fn(LatLng, LatLng) -> f64,
{
    let markers = decode_markers_param(markers_param);
    let mut lines = Vec::new();

    for entry in lines_param.split(';').filter(|e| !e.is_empty()) {
        let fields: Vec<&str> = entry.split('|').collect();
        if fields.len() != 2 || fields[0] == fields[1] {
            continue;
        }
        let (Some(m1), Some(m2)) = (
            markers.iter().find(|m| m.name == fields[0]),
            markers.iter().find(|m| m.name == fields[1]),
        ) else {
            continue;
        };
        lines.push(Line {
            id: 0,
            marker1: m1.name.clone(),
            marker2: m2.name.clone(),
            distance: distance(m1.position(), m2.position()),
        });
    }

    Snapshot { markers, lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo;

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            markers: vec![
                Marker {
                    name: "A".to_string(),
                    radius: 0.0,
                    lat: 44.0,
                    lng: 17.5,
                    color: "ff0000ff".to_string(),
                },
                Marker {
                    name: "B".to_string(),
                    radius: 500.0,
                    lat: 44.0,
                    lng: 18.5,
                    color: crate::color::DEFAULT_COLOR.to_string(),
                },
            ],
            lines: vec![Line {
                id: 0,
                marker1: "A".to_string(),
                marker2: "B".to_string(),
                distance: geo::haversine_m(LatLng::new(44.0, 17.5), LatLng::new(44.0, 18.5)),
            }],
        }
    }

    // --- durable codec ---

    #[test]
    fn test_durable_round_trip() {
        let snapshot = sample_snapshot();
        let decoded = decode_snapshot(
            &encode_markers(&snapshot.markers),
            &encode_lines(&snapshot.lines),
        );
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_durable_decode_skips_corrupt_entries() {
        let markers_json = r#"[
            {"name":"A","radius":0,"lat":44.0,"lng":17.5,"color":"ff0000ff"},
            {"radius":"not a marker"},
            {"name":"B","radius":500,"lat":44.0,"lng":18.5}
        ]"#;
        let snapshot = decode_snapshot(markers_json, "[]");
        assert_eq!(snapshot.markers.len(), 2);
        assert_eq!(snapshot.markers[1].name, "B");
    }

    #[test]
    fn test_durable_decode_garbage_yields_empty() {
        let snapshot = decode_snapshot("not json at all", "{\"also\":\"wrong\"}");
        assert!(snapshot.markers.is_empty());
        assert!(snapshot.lines.is_empty());
    }

    #[test]
    fn test_durable_decode_keeps_stored_distance() {
        let lines_json = r#"[{"marker1":"A","marker2":"B","distance":42.5}]"#;
        let snapshot = decode_snapshot("[]", lines_json);
        assert_eq!(snapshot.lines[0].distance, 42.5);
    }

    // --- share codec ---

    #[test]
    fn test_share_encode_shape() {
        let query = encode_share_query(&sample_snapshot());
        assert_eq!(
            query,
            "markers=A|44|17.5|0|ff0000ff;B|44|18.5|500|0000ff1a;&lines=A|B;"
        );
    }

    #[test]
    fn test_share_round_trip() {
        let snapshot = sample_snapshot();
        let query = encode_share_query(&snapshot);
        let markers_param = query
            .strip_prefix("markers=")
            .unwrap()
            .split("&lines=")
            .next()
            .unwrap();
        let lines_param = query.split("&lines=").nth(1).unwrap();
        let decoded = decode_share_query(markers_param, lines_param, geo::haversine_m);
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_share_import_single_marker() {
        let decoded = decode_share_query("X|44.0|17.5|0|ff0000ff;", "", geo::haversine_m);
        assert_eq!(decoded.markers.len(), 1);
        assert_eq!(decoded.markers[0].name, "X");
        assert_eq!(decoded.markers[0].radius, 0.0);
        assert!(decoded.lines.is_empty());
    }

    #[test]
    fn test_share_import_skips_malformed_entries() {
        let param = "ok|44.0|17.5|0|ff0000ff;missing|fields;bad name|44|17|0|ff0000ff;\
                     nan|abc|17.5|0|ff0000ff;float_radius|44.0|17.5|2.5|ff0000ff;";
        let markers = decode_markers_param(param);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].name, "ok");
    }

    #[test]
    fn test_share_import_first_duplicate_wins() {
        let markers = decode_markers_param("X|44.0|17.5|0|ff0000ff;X|45.0|18.0|0|00ff00ff;");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].lat, 44.0);
    }

    #[test]
    fn test_share_import_bad_color_falls_back_to_default() {
        let markers = decode_markers_param("X|44.0|17.5|0|nothex;");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].color, crate::color::DEFAULT_COLOR);
    }

    #[test]
    fn test_share_import_non_word_color_skips_entry() {
        let markers = decode_markers_param("X|44.0|17.5|0|#ff0000;");
        assert!(markers.is_empty());
    }

    #[test]
    fn test_share_import_skips_unknown_and_self_lines() {
        let decoded = decode_share_query(
            "A|44.0|17.5|0|ff0000ff;B|44.0|18.5|0|ff0000ff;",
            "A|Ghost;A|A;A|B;",
            geo::haversine_m,
        );
        assert_eq!(decoded.lines.len(), 1);
        assert_eq!(decoded.lines[0].marker1, "A");
        assert_eq!(decoded.lines[0].marker2, "B");
    }

    #[test]
    fn test_share_import_recomputes_distance() {
        let decoded = decode_share_query(
            "A|44.0|17.5|0|ff0000ff;B|44.0|18.5|0|ff0000ff;",
            "A|B;",
            geo::haversine_m,
        );
        let d = decoded.lines[0].distance;
        assert!((d - 80_440.0).abs() < 600.0, "got {}", d);
    }

    #[test]
    fn test_share_import_empty_params() {
        let decoded = decode_share_query("", "", geo::haversine_m);
        assert!(decoded.markers.is_empty());
        assert!(decoded.lines.is_empty());
    }
}
