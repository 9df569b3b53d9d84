use std::{collections::HashMap, fs};

use store::DEFAULT_COLLECTION;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the document-store service. `None` selects the in-memory
    /// store so the demo works offline.
    pub server_url: Option<String>,
    pub collection: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: None,
            collection: DEFAULT_COLLECTION.into(),
        }
    }
}

/// Defaults, then `chores.toml`, then environment. CLI flags are applied by
/// the caller on top.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("chores.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            apply_file_values(&mut settings, &file_cfg);
        }
    }

    if let Ok(v) = std::env::var("CHORES_SERVER_URL") {
        settings.server_url = Some(v);
    }
    if let Ok(v) = std::env::var("CHORES_COLLECTION") {
        settings.collection = v;
    }

    settings
}

fn apply_file_values(settings: &mut Settings, file_cfg: &HashMap<String, String>) {
    if let Some(v) = file_cfg.get("server_url") {
        settings.server_url = Some(v.clone());
    }
    if let Some(v) = file_cfg.get("collection") {
        settings.collection = v.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_in_memory_store_and_standard_collection() {
        let settings = Settings::default();
        assert_eq!(settings.server_url, None);
        assert_eq!(settings.collection, "chores_list");
    }

    #[test]
    fn file_values_override_defaults() {
        let mut settings = Settings::default();
        let file_cfg = toml::from_str::<HashMap<String, String>>(
            "server_url = \"https://store.example\"\ncollection = \"household\"\n",
        )
        .expect("parse toml");

        apply_file_values(&mut settings, &file_cfg);

        assert_eq!(
            settings.server_url.as_deref(),
            Some("https://store.example")
        );
        assert_eq!(settings.collection, "household");
    }

    #[test]
    fn unknown_file_keys_are_ignored() {
        let mut settings = Settings::default();
        let file_cfg = toml::from_str::<HashMap<String, String>>("region = \"eu-west-1\"\n")
            .expect("parse toml");

        apply_file_values(&mut settings, &file_cfg);

        assert_eq!(settings, Settings::default());
    }
}
