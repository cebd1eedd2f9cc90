use chromatch_core::{KeyValueStore, StorageKey, StoreError, load_value, save_value};
use serde::{Deserialize, Serialize};

const DEFAULT_PLAYER_NAME: &str = "Player";

/// Host preferences kept next to the records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Settings {
    pub player_name: Option<String>,
    /// Opaque identity the remote keys synced scores by.
    pub user_id: Option<String>,
}

impl StorageKey for Settings {
    const KEY: &'static str = "chromatch:settings:v1";
}

impl Settings {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        load_value(store).unwrap_or_default()
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        save_value(store, self)
    }

    pub fn player_name(&self) -> &str {
        self.player_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_PLAYER_NAME)
    }

    pub fn ensure_user_id(&mut self, seed: u64) -> &str {
        self.user_id
            .get_or_insert_with(|| format!("local-{seed:016x}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chromatch_core::MemoryStore;

    #[test]
    fn storage_key_is_versioned() {
        assert_eq!(<Settings as StorageKey>::KEY, "chromatch:settings:v1");
    }

    #[test]
    fn blank_name_falls_back_to_default() {
        let mut settings = Settings::default();
        assert_eq!(settings.player_name(), "Player");
        settings.player_name = Some("  ".to_string());
        assert_eq!(settings.player_name(), "Player");
        settings.player_name = Some("Ren".to_string());
        assert_eq!(settings.player_name(), "Ren");
    }

    #[test]
    fn user_id_is_generated_once() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::load(&store);
        assert_eq!(settings.ensure_user_id(0xab), "local-00000000000000ab");
        assert_eq!(settings.ensure_user_id(0xcd), "local-00000000000000ab");

        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }
}
