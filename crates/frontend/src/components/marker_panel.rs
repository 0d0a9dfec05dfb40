use dioxus::prelude::*;

use bihmap_shared::color;
use bihmap_shared::models::Marker;
use bihmap_shared::ops::Editor;

use crate::components::alert;
use crate::storage::LocalStore;
use crate::surface::Scene;

const RADIUS_OPTIONS: [(&str, &str); 7] = [
    ("0", "No circle"),
    ("100", "100 m"),
    ("250", "250 m"),
    ("500", "500 m"),
    ("1000", "1 km"),
    ("2500", "2.5 km"),
    ("5000", "5 km"),
];

#[component]
pub fn MarkerPanel(
    editor: Signal<Editor<Scene, LocalStore>>,
    name_input: Signal<String>,
    lat_input: Signal<String>,
    lng_input: Signal<String>,
    radius_input: Signal<String>,
) -> Element {
    let markers: Vec<Marker> = editor.read().markers().to_vec();

    rsx! {
        div { class: "panel",
            h3 { "Markers & Circles" }
            input {
                r#type: "text",
                placeholder: "Marker name...",
                value: "{name_input}",
                oninput: move |evt: Event<FormData>| name_input.set(evt.value().to_string()),
            }
            div { class: "coord-inputs",
                input {
                    r#type: "text",
                    placeholder: "Latitude",
                    value: "{lat_input}",
                    oninput: move |evt: Event<FormData>| lat_input.set(evt.value().to_string()),
                }
                input {
                    r#type: "text",
                    placeholder: "Longitude",
                    value: "{lng_input}",
                    oninput: move |evt: Event<FormData>| lng_input.set(evt.value().to_string()),
                }
            }
            select {
                value: "{radius_input}",
                onchange: move |evt: Event<FormData>| radius_input.set(evt.value().to_string()),
                for (value, label) in RADIUS_OPTIONS {
                    option {
                        value: "{value}",
                        selected: *radius_input.read() == value,
                        "{label}"
                    }
                }
            }
            button {
                onclick: move |_| {
                    let lat = lat_input.read().trim().parse::<f64>();
                    let lng = lng_input.read().trim().parse::<f64>();
                    let (Ok(lat), Ok(lng)) = (lat, lng) else {
                        alert("Enter valid coordinates");
                        return;
                    };
                    let name = name_input.read().trim().to_string();
                    if name.is_empty() {
                        alert("Enter a name");
                        return;
                    }
                    let radius = radius_input.read().parse::<f64>().unwrap_or(0.0);

                    let result = editor.write().add_marker(&name, lat, lng, radius, None);
                    match result {
                        Ok(()) => {
                            name_input.set(String::new());
                            editor.write().surface_mut().clear_stage();
                        }
                        Err(e) => alert(&e.to_string()),
                    }
                },
                "Add Marker"
            }
            ul { class: "entry-list",
                for marker in markers {
                    li { key: "{marker.name}",
                        span {
                            class: "entry-label",
                            onclick: {
                                let name = marker.name.clone();
                                move |_| editor.write().focus_marker(&name)
                            },
                            oncontextmenu: {
                                let name = marker.name.clone();
                                move |evt: Event<MouseData>| {
                                    evt.prevent_default();
                                    editor.write().remove_marker(&name);
                                }
                            },
                            "{marker.name}"
                        }
                        input {
                            class: "color-input",
                            r#type: "text",
                            maxlength: "8",
                            value: "{marker.color}",
                            // Live recolor while the value is a valid code
                            oninput: {
                                let name = marker.name.clone();
                                move |evt: Event<FormData>| {
                                    let code = evt.value().to_string();
                                    if color::is_valid(&code) {
                                        let _ = editor.write().recolor(&name, &code);
                                    }
                                }
                            },
                            onchange: move |evt: Event<FormData>| {
                                if !color::is_valid(&evt.value()) {
                                    alert("Color must be 8 hex digits (RRGGBBAA)");
                                }
                            },
                        }
                    }
                }
            }
        }
    }
}
