use mavigo_core::SettingsStore;
use tracing::warn;
use web_sys::Storage;

/// `window.localStorage`. Unavailable storage (private mode, sandboxed
/// iframes) degrades to "nothing stored".
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage(&self) -> Option<Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl SettingsStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let Some(storage) = self.storage() else {
            warn!(key, "localStorage unavailable, setting not saved");
            return;
        };
        if storage.set_item(key, value).is_err() {
            warn!(key, "failed to write localStorage");
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = self.storage() {
            if storage.remove_item(key).is_err() {
                warn!(key, "failed to clear localStorage entry");
            }
        }
    }
}
