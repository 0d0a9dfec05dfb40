use dioxus::prelude::*;

use crate::layers::{LayerVisibility, LAYERS};

#[component]
pub fn LayerPanel(visible: Signal<LayerVisibility>) -> Element {
    rsx! {
        div { class: "panel",
            h3 { "Layers" }
            for def in LAYERS {
                label { class: "layer-toggle",
                    input {
                        r#type: "checkbox",
                        checked: visible.read().is_on(def.id),
                        onchange: move |_| visible.write().toggle(def.id),
                    }
                    " {def.title}"
                }
            }
        }
    }
}
