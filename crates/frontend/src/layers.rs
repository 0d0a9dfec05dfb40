//! Static GeoJSON reference layers.
//!
//! Five togglable overlays fetched from the backend's `/data` routes and
//! parsed into projected polyline paths. Roads are styled per highway
//! class; the other layers carry one stroke each.

use serde::Deserialize;

use bihmap_shared::proj;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerDef {
    pub id: &'static str,
    pub title: &'static str,
    pub file: &'static str,
    pub color: &'static str,
    pub weight: f64,
    pub default_on: bool,
}

pub const LAYERS: [LayerDef; 5] = [
    LayerDef {
        id: "country",
        title: "Country Outline",
        file: "bh_country.geojson",
        color: "#000",
        weight: 2.0,
        default_on: true,
    },
    LayerDef {
        id: "entities",
        title: "Entities",
        file: "bh_entities.geojson",
        color: "#1f78b4",
        weight: 2.0,
        default_on: false,
    },
    LayerDef {
        id: "cantons",
        title: "Cantons",
        file: "bh_cantons.geojson",
        color: "#33a02c",
        weight: 1.5,
        default_on: false,
    },
    LayerDef {
        id: "municipalities",
        title: "Municipalities",
        file: "bh_municipalities.geojson",
        color: "#33a02c",
        weight: 1.5,
        default_on: false,
    },
    LayerDef {
        id: "roads",
        title: "Roads",
        file: "bh_roads_filtered_noresid.geojson",
        color: "#999",
        weight: 1.0,
        default_on: false,
    },
];

/// Which reference layers are currently shown. The country outline is
/// on by default, everything else starts hidden.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerVisibility {
    pub country: bool,
    pub entities: bool,
    pub cantons: bool,
    pub municipalities: bool,
    pub roads: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            country: true,
            entities: false,
            cantons: false,
            municipalities: false,
            roads: false,
        }
    }
}

impl LayerVisibility {
    pub fn is_on(&self, id: &str) -> bool {
        match id {
            "country" => self.country,
            "entities" => self.entities,
            "cantons" => self.cantons,
            "municipalities" => self.municipalities,
            "roads" => self.roads,
            _ => false,
        }
    }

    pub fn toggle(&mut self, id: &str) {
        match id {
            "country" => self.country = !self.country,
            "entities" => self.entities = !self.entities,
            "cantons" => self.cantons = !self.cantons,
            "municipalities" => self.municipalities = !self.municipalities,
            "roads" => self.roads = !self.roads,
            _ => {}
        }
    }
}

/// Stroke for a road feature, by its `highway` property.
pub fn road_style(highway: &str) -> (&'static str, f64) {
    match highway {
        "motorway" => ("#e31a1c", 3.0),
        "primary" => ("#fd8d3c", 2.5),
        "secondary" => ("#fecc5c", 2.0),
        "tertiary" => ("#a1dab4", 1.5),
        "residential" => ("#bbbbbb", 1.0),
        _ => ("#999", 1.0),
    }
}

/// One projected stroke path in native map pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledPath {
    pub points: Vec<(f64, f64)>,
    pub color: String,
    pub weight: f64,
    pub closed: bool,
}

/// A fetched, parsed layer ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: String,
    pub paths: Vec<StyledPath>,
}

/// A GeoJSON feature, typed where the structure matters and an open
/// `properties` bag where it does not.
#[derive(Debug, Clone, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: serde_json::Value,
    geometry: Option<Geometry>,
}

/// The geometry types that render as strokes. Positions are kept as
/// loose float lists because exports may carry an altitude component.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    LineString { coordinates: Vec<Vec<f64>> },
    MultiLineString { coordinates: Vec<Vec<Vec<f64>>> },
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Other,
}

/// Project a list of `[lng, lat, ...]` positions into native pixels.
fn project_ring(positions: &[Vec<f64>]) -> Vec<(f64, f64)> {
    positions
        .iter()
        .filter_map(|position| match position.as_slice() {
            [lng, lat, ..] => Some(proj::lat_lng_to_px(*lat, *lng)),
            _ => None,
        })
        .collect()
}

/// Parse a GeoJSON FeatureCollection into styled paths. Each feature is
/// deserialized independently; geometry types without a line rendering
/// (points) and malformed features are skipped, so one bad feature
/// never drops the layer.
pub fn parse_layer(def: &LayerDef, json: &serde_json::Value) -> Vec<StyledPath> {
    let mut paths = Vec::new();
    let Some(features) = json.get("features").and_then(|f| f.as_array()) else {
        return paths;
    };

    for value in features {
        let Ok(feature) = serde_json::from_value::<Feature>(value.clone()) else {
            continue;
        };

        let (color, weight) = if def.id == "roads" {
            let highway = feature
                .properties
                .get("highway")
                .and_then(|h| h.as_str())
                .unwrap_or("");
            road_style(highway)
        } else {
            (def.color, def.weight)
        };

        let mut push = |points: Vec<(f64, f64)>, closed: bool| {
            if points.len() >= 2 {
                paths.push(StyledPath {
                    points,
                    color: color.to_string(),
                    weight,
                    closed,
                });
            }
        };

        match feature.geometry {
            Some(Geometry::LineString { coordinates }) => push(project_ring(&coordinates), false),
            Some(Geometry::MultiLineString { coordinates }) => {
                for part in &coordinates {
                    push(project_ring(part), false);
                }
            }
            Some(Geometry::Polygon { coordinates }) => {
                for ring in &coordinates {
                    push(project_ring(ring), true);
                }
            }
            Some(Geometry::MultiPolygon { coordinates }) => {
                for polygon in &coordinates {
                    for ring in polygon {
                        push(project_ring(ring), true);
                    }
                }
            }
            Some(Geometry::Other) | None => {}
        }
    }

    paths
}

/// SVG path data for a projected stroke.
pub fn svg_path_data(path: &StyledPath) -> String {
    let mut data = String::new();
    for (i, (x, y)) in path.points.iter().enumerate() {
        let command = if i == 0 { 'M' } else { 'L' };
        data.push_str(&format!("{}{:.1} {:.1} ", command, x, y));
    }
    if path.closed {
        data.push('Z');
    }
    data.trim_end().to_string()
}

/// Fetch and parse every reference layer. A layer that fails to load is
/// skipped so the rest still render.
pub async fn fetch_layers() -> Vec<Layer> {
    let mut layers = Vec::new();
    for def in &LAYERS {
        if let Ok(paths) = fetch_layer(def).await {
            layers.push(Layer {
                id: def.id.to_string(),
                paths,
            });
        }
    }
    layers
}

async fn fetch_layer(def: &LayerDef) -> Result<Vec<StyledPath>, String> {
    let window = web_sys::window().ok_or("no window")?;
    let origin = window.location().origin().map_err(|_| "no origin")?;
    let url = format!("{}/data/{}", origin, def.file);

    let resp = reqwest::get(&url).await.map_err(|e| e.to_string())?;
    let json: serde_json::Value = resp.json().await.map_err(|e| e.to_string())?;
    Ok(parse_layer(def, &json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn def(id: &'static str) -> LayerDef {
        LayerDef {
            id,
            title: "Test",
            file: "test.geojson",
            color: "#123456",
            weight: 2.0,
            default_on: false,
        }
    }

    #[test]
    fn test_visibility_defaults_match_layer_defs() {
        let visible = LayerVisibility::default();
        for layer in &LAYERS {
            assert_eq!(visible.is_on(layer.id), layer.default_on, "layer {}", layer.id);
        }
    }

    #[test]
    fn test_visibility_toggle() {
        let mut visible = LayerVisibility::default();
        visible.toggle("roads");
        assert!(visible.roads);
        visible.toggle("roads");
        assert!(!visible.roads);
        // Unknown ids are ignored
        visible.toggle("nope");
        assert!(!visible.is_on("nope"));
    }

    #[test]
    fn test_road_style_classes() {
        assert_eq!(road_style("motorway"), ("#e31a1c", 3.0));
        assert_eq!(road_style("primary"), ("#fd8d3c", 2.5));
        assert_eq!(road_style("secondary"), ("#fecc5c", 2.0));
        assert_eq!(road_style("tertiary"), ("#a1dab4", 1.5));
        assert_eq!(road_style("residential"), ("#bbbbbb", 1.0));
        assert_eq!(road_style("track"), ("#999", 1.0));
    }

    #[test]
    fn test_parse_linestring() {
        let json = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[17.5, 44.0], [18.5, 44.0], [18.5, 43.5]]
                }
            }]
        });
        let paths = parse_layer(&def("country"), &json);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].points.len(), 3);
        assert_eq!(paths[0].color, "#123456");
        assert!(!paths[0].closed);
    }

    #[test]
    fn test_parse_polygon_rings_close() {
        let json = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [
                        [[17.0, 44.0], [18.0, 44.0], [18.0, 43.0], [17.0, 44.0]]
                    ]
                }
            }]
        });
        let paths = parse_layer(&def("country"), &json);
        assert_eq!(paths.len(), 1);
        assert!(paths[0].closed);
    }

    #[test]
    fn test_parse_multipolygon() {
        let ring = json!([[17.0, 44.0], [18.0, 44.0], [18.0, 43.0], [17.0, 44.0]]);
        let json = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[ring], [ring]]
                }
            }]
        });
        let paths = parse_layer(&def("entities"), &json);
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_parse_roads_styles_by_highway() {
        let json = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"highway": "motorway"},
                    "geometry": {"type": "LineString", "coordinates": [[17.0, 44.0], [18.0, 44.0]]}
                },
                {
                    "type": "Feature",
                    "properties": {"highway": "secondary"},
                    "geometry": {"type": "LineString", "coordinates": [[17.0, 43.5], [18.0, 43.5]]}
                }
            ]
        });
        let paths = parse_layer(&def("roads"), &json);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].color, "#e31a1c");
        assert_eq!(paths[0].weight, 3.0);
        assert_eq!(paths[1].color, "#fecc5c");
    }

    #[test]
    fn test_parse_skips_malformed_features() {
        let json = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature"},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [17.0, 44.0]}},
                {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[17.0, 44.0]]}},
                {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[17.0, 44.0], [18.0, 44.0]]}}
            ]
        });
        let paths = parse_layer(&def("country"), &json);
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_parse_no_features_key() {
        assert!(parse_layer(&def("country"), &json!({})).is_empty());
    }

    #[test]
    fn test_svg_path_data_open_and_closed() {
        let mut path = StyledPath {
            points: vec![(10.0, 20.0), (30.0, 40.0)],
            color: "#000".to_string(),
            weight: 1.0,
            closed: false,
        };
        assert_eq!(svg_path_data(&path), "M10.0 20.0 L30.0 40.0");
        path.closed = true;
        assert_eq!(svg_path_data(&path), "M10.0 20.0 L30.0 40.0 Z");
    }
}
