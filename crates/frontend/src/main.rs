mod components;
mod coords;
mod layers;
mod pages;
mod share;
mod storage;
mod surface;

use dioxus::prelude::*;

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        pages::map_page::MapPage {}
    }
}

fn main() {
    launch(App);
}
