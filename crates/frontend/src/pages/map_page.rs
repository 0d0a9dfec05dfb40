use dioxus::prelude::*;

use bihmap_shared::ops::Editor;

use crate::components::layer_panel::LayerPanel;
use crate::components::line_panel::LinePanel;
use crate::components::map_view::MapView;
use crate::components::marker_panel::MarkerPanel;
use crate::components::share_panel::SharePanel;
use crate::layers::{self, Layer, LayerVisibility};
use crate::share;
use crate::storage::LocalStore;
use crate::surface::Scene;

#[component]
pub fn MapPage() -> Element {
    // Startup sequence: load the durable snapshot, then apply a one-shot
    // URL import if present and strip the query from the address bar,
    // all before the first render.
    let editor = use_signal(|| {
        let mut editor = Editor::new(Scene::default(), LocalStore::new());
        let query = share::current_share_params();
        let imported = editor.startup(query.as_ref().map(|(m, l)| (m.as_str(), l.as_str())));
        if imported {
            share::strip_query();
        }
        editor
    });

    // Reference layers resolve independently of annotation state
    let layers_resource = use_resource(|| layers::fetch_layers());
    let layer_data: Vec<Layer> = match &*layers_resource.read() {
        Some(loaded) => loaded.clone(),
        None => Vec::new(),
    };

    let visible = use_signal(LayerVisibility::default);
    let name_input = use_signal(String::new);
    let lat_input = use_signal(String::new);
    let lng_input = use_signal(String::new);
    let radius_input = use_signal(|| "0".to_string());
    let sel1 = use_signal(String::new);
    let sel2 = use_signal(String::new);

    rsx! {
        div { class: "app",
            div { class: "header",
                h1 { "BiH Map" }
                SharePanel { editor }
            }

            div { class: "sidebar",
                MarkerPanel {
                    editor,
                    name_input,
                    lat_input,
                    lng_input,
                    radius_input,
                }
                LinePanel { editor, sel1, sel2 }
                LayerPanel { visible }
            }

            MapView {
                editor,
                layers: layer_data,
                visible,
                lat_input,
                lng_input,
            }
        }
    }
}
