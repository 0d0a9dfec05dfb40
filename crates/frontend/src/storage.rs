//! Durable persistence over browser localStorage.

use bihmap_shared::ops::SnapshotStore;

/// Namespace prefix so the two snapshot slots don't collide with other
/// apps on the same origin.
const KEY_PREFIX: &str = "bihmap.";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// `SnapshotStore` backed by `window.localStorage`. Storage failures
/// (private browsing, quota) degrade to an in-session-only state rather
/// than breaking the app.
#[derive(Default)]
pub struct LocalStore;

impl LocalStore {
    pub fn new() -> Self {
        Self
    }
}

impl SnapshotStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?
            .get_item(&format!("{}{}", KEY_PREFIX, key))
            .ok()
            .flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(&format!("{}{}", KEY_PREFIX, key), value);
        }
    }
}
