pub mod layer_panel;
pub mod line_panel;
pub mod map_view;
pub mod marker_panel;
pub mod share_panel;

/// Blocking notification for rejected user actions.
pub(crate) fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
