use dioxus::prelude::*;

use bihmap_shared::geo;
use bihmap_shared::ops::Editor;

use crate::components::alert;
use crate::storage::LocalStore;
use crate::surface::Scene;

#[component]
pub fn LinePanel(
    editor: Signal<Editor<Scene, LocalStore>>,
    sel1: Signal<String>,
    sel2: Signal<String>,
) -> Element {
    let names = editor.read().marker_names();
    let lines: Vec<(u64, String)> = editor
        .read()
        .lines()
        .iter()
        .map(|l| {
            (
                l.id,
                format!(
                    "{} ↔ {} ({})",
                    l.marker1,
                    l.marker2,
                    geo::format_distance(l.distance)
                ),
            )
        })
        .collect();

    rsx! {
        div { class: "panel",
            h3 { "Connect Markers" }
            select {
                value: "{sel1}",
                onchange: move |evt: Event<FormData>| sel1.set(evt.value().to_string()),
                option { value: "", "Select marker 1" }
                for name in &names {
                    option { value: "{name}", selected: *sel1.read() == *name, "{name}" }
                }
            }
            select {
                value: "{sel2}",
                onchange: move |evt: Event<FormData>| sel2.set(evt.value().to_string()),
                option { value: "", "Select marker 2" }
                for name in &names {
                    option { value: "{name}", selected: *sel2.read() == *name, "{name}" }
                }
            }
            button {
                onclick: move |_| {
                    let a = sel1.read().clone();
                    let b = sel2.read().clone();
                    if a.is_empty() || b.is_empty() {
                        alert("Please select both markers");
                        return;
                    }
                    if a == b {
                        alert("Cannot connect the same marker");
                        return;
                    }
                    let result = editor.write().connect(&a, &b);
                    if let Err(e) = result {
                        alert(&e.to_string());
                    }
                },
                "Connect"
            }
            ul { class: "entry-list",
                for (id, label) in lines {
                    li {
                        key: "{id}",
                        class: "entry-label",
                        onclick: move |_| editor.write().focus_line(id),
                        oncontextmenu: move |evt: Event<MouseData>| {
                            evt.prevent_default();
                            editor.write().remove_line_by_id(id);
                        },
                        "{label}"
                    }
                }
            }
        }
    }
}
