use dioxus::prelude::*;

use bihmap_shared::ops::Editor;

use crate::share;
use crate::storage::LocalStore;
use crate::surface::Scene;

#[component]
pub fn SharePanel(editor: Signal<Editor<Scene, LocalStore>>) -> Element {
    let mut copied = use_signal(|| false);

    rsx! {
        div { class: "toolbar",
            button {
                onclick: move |_| {
                    let query = editor.read().share_query();
                    let Some(url) = share::share_url(&query) else {
                        return;
                    };
                    wasm_bindgen_futures::spawn_local(async move {
                        if let Some(window) = web_sys::window() {
                            let clipboard = window.navigator().clipboard();
                            let _ = wasm_bindgen_futures::JsFuture::from(
                                clipboard.write_text(&url)
                            ).await;
                        }
                    });
                    copied.set(true);
                    spawn(async move {
                        gloo_timers::future::TimeoutFuture::new(1500).await;
                        copied.set(false);
                    });
                },
                if *copied.read() { "Copied!" } else { "Share" }
            }
            button {
                class: "secondary",
                onclick: move |_| editor.write().clear(),
                "Clear All"
            }
        }
    }
}
