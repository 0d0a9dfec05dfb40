use dioxus::html::geometry::WheelDelta;
use dioxus::prelude::*;

use bihmap_shared::ops::Editor;
use bihmap_shared::proj;

use crate::coords;
use crate::layers::{svg_path_data, Layer, LayerVisibility};
use crate::storage::LocalStore;
use crate::surface::{Scene, Viewport};

const MAP_CONTAINER_ID: &str = "bihmap-container";

/// Drag threshold in pixels. Movement below this is treated as a click.
const DRAG_THRESHOLD: f64 = 3.0;

const ZOOM_STEP: f64 = 1.1;

// ---------------------------------------------------------------------------
// SVG builder (pure, testable)
// ---------------------------------------------------------------------------

/// Build the map SVG as a string: background, visible reference layers,
/// then the annotation graphics from the scene. Stroke widths and marker
/// radii divide by the zoom factor so they keep a constant on-screen
/// size under the CSS scale transform.
pub fn build_svg_content(scene: &Scene, layers: &[Layer], visible: &LayerVisibility) -> String {
    let mut svg = String::with_capacity(8192);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" style="display:block;width:100%;height:auto;">"#,
        proj::MAP_WIDTH_PX,
        proj::MAP_HEIGHT_PX
    ));

    let s = 1.0 / scene.viewport.zoom.min(5.0);

    svg.push_str(&format!(
        r#"<rect x="0" y="0" width="{}" height="{}" fill="#f2efe9"/>"#,
        proj::MAP_WIDTH_PX,
        proj::MAP_HEIGHT_PX
    ));

    for layer in layers {
        if !visible.is_on(&layer.id) {
            continue;
        }
        for path in &layer.paths {
            svg.push_str(&format!(
                r#"<path d="{}" fill="none" stroke="{}" stroke-width="{:.2}"/>"#,
                svg_path_data(path),
                path.color,
                path.weight * s
            ));
        }
    }

    // Circles underneath their markers, real ground footprint
    for circle in &scene.circles {
        let (cx, cy) = proj::lat_lng_to_px(circle.position.lat, circle.position.lng);
        svg.push_str(&format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{:.2}" stroke="{}" stroke-width="{:.2}" fill="{}"/>"#,
            cx,
            cy,
            proj::meters_to_px(circle.radius_m),
            circle.stroke,
            2.0 * s,
            circle.fill
        ));
    }

    for line in &scene.lines {
        let (x1, y1) = proj::lat_lng_to_px(line.from.lat, line.from.lng);
        let (x2, y2) = proj::lat_lng_to_px(line.to.lat, line.to.lng);
        svg.push_str(&format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="red" stroke-width="{:.2}"/>"#,
            x1,
            y1,
            x2,
            y2,
            2.0 * s
        ));
    }

    if let Some(staged) = scene.temp_marker {
        let (x, y) = proj::lat_lng_to_px(staged.lat, staged.lng);
        svg.push_str(&format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{:.2}" fill="#666" opacity="0.6"/>"#,
            x,
            y,
            6.0 * s
        ));
    }

    for point in &scene.points {
        let (x, y) = proj::lat_lng_to_px(point.position.lat, point.position.lng);
        svg.push_str(&format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{:.2}" fill="#3388ff" stroke="#fff" stroke-width="{:.2}"/>"#,
            x,
            y,
            6.0 * s,
            1.5 * s
        ));
        if point.popup_open {
            build_popup(&mut svg, x, y, &point.popup, s);
        }
    }

    svg.push_str("</svg>");
    svg
}

/// Popup label above a focused marker: one tspan per popup line.
fn build_popup(svg: &mut String, x: f64, y: f64, popup: &str, s: f64) {
    let lines: Vec<&str> = popup.lines().collect();
    let line_height = 14.0 * s;
    let height = line_height * lines.len() as f64 + 10.0 * s;
    let width = 120.0 * s;
    let top = y - 12.0 * s - height;

    svg.push_str(&format!(
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="{:.1}" fill="#fff" stroke="#999" stroke-width="{:.2}"/>"#,
        x - width / 2.0,
        top,
        width,
        height,
        3.0 * s,
        1.0 * s
    ));
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" font-size="{:.1}" text-anchor="middle" fill="#222">"#,
        x,
        top + line_height,
        11.0 * s
    ));
    for (i, line) in lines.iter().enumerate() {
        svg.push_str(&format!(
            r#"<tspan x="{:.1}" dy="{}">{}</tspan>"#,
            x,
            if i == 0 { 0.0 } else { line_height },
            line
        ));
    }
    svg.push_str("</text>");
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// Current pan offsets for a viewport, from the live container size.
/// Falls back to the untranslated origin before the container mounts.
fn current_pan(viewport: &Viewport) -> (f64, f64) {
    match coords::element_rect(MAP_CONTAINER_ID) {
        Some(rect) => coords::viewport_to_pan(viewport, rect.width(), rect.height()),
        None => (0.0, 0.0),
    }
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

#[component]
pub fn MapView(
    editor: Signal<Editor<Scene, LocalStore>>,
    layers: Vec<Layer>,
    visible: Signal<LayerVisibility>,
    lat_input: Signal<String>,
    lng_input: Signal<String>,
) -> Element {
    let mut is_dragging = use_signal(|| false);
    let mut did_drag = use_signal(|| false);
    let mut drag_start = use_signal(|| (0.0f64, 0.0f64));
    let mut drag_start_pan = use_signal(|| (0.0f64, 0.0f64));

    let (svg_html, viewport) = {
        let ed = editor.read();
        (
            build_svg_content(ed.surface(), &layers, &visible.read()),
            ed.surface().viewport,
        )
    };
    let (pan_x, pan_y) = current_pan(&viewport);
    let transform_style = format!(
        "transform: translate({:.2}px, {:.2}px) scale({:.4}); transform-origin: 0 0;",
        pan_x, pan_y, viewport.zoom
    );

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "map-container",

            onmousedown: move |evt: Event<MouseData>| {
                let client = evt.client_coordinates();
                is_dragging.set(true);
                did_drag.set(false);
                drag_start.set((client.x, client.y));
                let vp = editor.read().surface().viewport;
                drag_start_pan.set(current_pan(&vp));
            },

            onmousemove: move |evt: Event<MouseData>| {
                if !*is_dragging.read() {
                    return;
                }
                let client = evt.client_coordinates();
                let (sx, sy) = *drag_start.read();
                let dx = client.x - sx;
                let dy = client.y - sy;

                if !*did_drag.read() && (dx.abs() > DRAG_THRESHOLD || dy.abs() > DRAG_THRESHOLD) {
                    did_drag.set(true);
                }
                if *did_drag.read() {
                    let Some(rect) = coords::element_rect(MAP_CONTAINER_ID) else {
                        return;
                    };
                    let (spx, spy) = *drag_start_pan.read();
                    let zoom = editor.read().surface().viewport.zoom;
                    let (px, py) =
                        coords::clamp_pan(spx + dx, spy + dy, zoom, rect.width(), rect.height());
                    let center =
                        coords::pan_to_center(px, py, zoom, rect.width(), rect.height());
                    editor.write().surface_mut().set_view(center, zoom);
                }
            },

            onmouseup: move |evt: Event<MouseData>| {
                let was_dragging = *is_dragging.read();
                let was_drag = *did_drag.read();
                is_dragging.set(false);

                // A mouseup without drag movement = a click: stage the
                // coordinate for the marker form.
                if was_dragging && !was_drag {
                    let client = evt.client_coordinates();
                    let vp = editor.read().surface().viewport;
                    if let Some(pos) =
                        coords::click_to_lat_lng(client.x, client.y, MAP_CONTAINER_ID, &vp)
                    {
                        lat_input.set(format!("{:.6}", pos.lat));
                        lng_input.set(format!("{:.6}", pos.lng));
                        editor.write().surface_mut().stage(pos);
                    }
                }
            },

            onmouseleave: move |_| {
                is_dragging.set(false);
            },

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();

                let delta_y = wheel_delta_y(evt.data().delta());
                let factor = if delta_y < 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
                let vp = editor.read().surface().viewport;
                let old_zoom = vp.zoom;
                let new_zoom = (old_zoom * factor)
                    .clamp(crate::surface::ZOOM_MIN, crate::surface::ZOOM_MAX);
                if (new_zoom - old_zoom).abs() < 1e-9 {
                    return;
                }

                let Some(rect) = coords::element_rect(MAP_CONTAINER_ID) else {
                    return;
                };
                let client = evt.data().client_coordinates();
                let cx = client.x - rect.left();
                let cy = client.y - rect.top();

                let (old_px, old_py) = coords::viewport_to_pan(&vp, rect.width(), rect.height());
                let (npx, npy) = coords::zoom_pan_at_cursor(cx, cy, old_zoom, new_zoom, old_px, old_py);
                let (npx, npy) = coords::clamp_pan(npx, npy, new_zoom, rect.width(), rect.height());
                let center = coords::pan_to_center(npx, npy, new_zoom, rect.width(), rect.height());
                editor.write().surface_mut().set_view(center, new_zoom);
            },

            ondoubleclick: move |evt: Event<MouseData>| {
                evt.prevent_default();
                editor.write().surface_mut().reset_view();
            },

            // Inner wrapper, CSS transform applies zoom/pan to the whole map
            div {
                class: "map-inner",
                style: "{transform_style}",
                div {
                    dangerous_inner_html: "{svg_html}",
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bihmap_shared::geo::LatLng;
    use bihmap_shared::models::Marker;
    use bihmap_shared::ops::MapSurface;
    use bihmap_shared::color;
    use crate::layers::StyledPath;

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
    fn test_svg_contains_scene_graphics() {
        let mut scene = Scene::default();
        scene.place_marker(&marker("A", 44.0, 17.5, 0.0), "A");
        let style = color::parse_rrggbbaa("ff0000ff").unwrap();
        scene.place_circle(&marker("B", 44.0, 18.5, 500.0), &style);
        scene.place_line(0, LatLng::new(44.0, 17.5), LatLng::new(44.0, 18.5), "A - B");

        let svg = build_svg_content(&scene, &[], &LayerVisibility::default());
        assert!(svg.contains("<svg"));
        assert!(svg.contains("fill=\"#3388ff\""));
        assert!(svg.contains("stroke=\"rgb(255,0,0)\""));
        assert!(svg.contains("<line "));
    }

    #[test]
    fn test_svg_respects_layer_visibility() {
        let layer = Layer {
            id: "roads".to_string(),
            paths: vec![StyledPath {
                points: vec![(0.0, 0.0), (10.0, 10.0)],
                color: "#e31a1c".to_string(),
                weight: 3.0,
                closed: false,
            }],
        };
        let scene = Scene::default();

        let hidden = build_svg_content(&scene, &[layer.clone()], &LayerVisibility::default());
        assert!(!hidden.contains("#e31a1c"));

        let mut visible = LayerVisibility::default();
        visible.toggle("roads");
        let shown = build_svg_content(&scene, &[layer], &visible);
        assert!(shown.contains("#e31a1c"));
    }

    #[test]
    fn test_svg_popup_only_when_open() {
        let mut scene = Scene::default();
        let m = marker("A", 44.0, 17.5, 0.0);
        scene.place_marker(&m, "A\nLat: 44.000000\nLng: 17.500000");

        let closed = build_svg_content(&scene, &[], &LayerVisibility::default());
        assert!(!closed.contains("<text"));

        scene.focus_marker(&m);
        let open = build_svg_content(&scene, &[], &LayerVisibility::default());
        assert!(open.contains("<text"));
        assert!(open.contains("Lat: 44.000000"));
    }

    #[test]
    fn test_svg_temp_marker_translucent() {
        let mut scene = Scene::default();
        scene.stage(LatLng::new(44.0, 17.5));
        let svg = build_svg_content(&scene, &[], &LayerVisibility::default());
        assert!(svg.contains("opacity=\"0.6\""));
    }
}
