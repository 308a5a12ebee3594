use std::path::PathBuf;
use std::time::Duration;

use crate::api_connection::endpoints::{DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL, GEMINI_BASE_URL};
use crate::i18n::Language;
use crate::recipe_book::DEFAULT_EMBEDDING_MODEL;
use crate::recipe_generator::ModelSelection;

pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const RECIPE_BOOK_FILE: &str = "recipe_book.txt";
const RECIPE_BOOK_INDEX_FILE: &str = "recipe_book_index.json";

/// Runtime configuration. Priority: CLI flags > environment (and `.env`) > defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Seeds the credential when none has been saved from the settings dialog.
    pub default_api_key: Option<String>,
    pub api_base_url: String,
    pub models: ModelSelection,
    /// `None` means no client-side timeout.
    pub request_timeout: Option<Duration>,
    pub data_dir: PathBuf,
    pub language: Language,
    /// Plain-text book behind `ask-chef`; `None` means `<data_dir>/recipe_book.txt`.
    pub recipe_book: Option<PathBuf>,
    pub embedding_model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_api_key: None,
            api_base_url: GEMINI_BASE_URL.to_string(),
            models: ModelSelection {
                text_model: DEFAULT_TEXT_MODEL.to_string(),
                image_model: DEFAULT_IMAGE_MODEL.to_string(),
            },
            request_timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            data_dir: Self::default_data_dir(),
            language: Language::En,
            recipe_book: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        config.default_api_key = API_KEY_ENV_VARS.iter().find_map(|name| get(*name));
        if let Some(url) = get("CHEF_API_BASE_URL") {
            config.api_base_url = url;
        }
        if let Some(model) = get("CHEF_TEXT_MODEL") {
            config.models.text_model = model;
        }
        if let Some(model) = get("CHEF_IMAGE_MODEL") {
            config.models.image_model = model;
        }
        if let Some(secs) = get("CHEF_REQUEST_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(dir) = get("CHEF_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(language) = get("CHEF_LANGUAGE").and_then(|l| l.parse().ok()) {
            config.language = language;
        }
        if let Some(book) = get("CHEF_RECIPE_BOOK") {
            config.recipe_book = Some(PathBuf::from(book));
        }
        if let Some(model) = get("CHEF_EMBEDDING_MODEL") {
            config.embedding_model = model;
        }
        config
    }

    pub fn recipe_book_path(&self) -> PathBuf {
        self.recipe_book
            .clone()
            .unwrap_or_else(|| self.data_dir.join(RECIPE_BOOK_FILE))
    }

    /// Embedding cache for the recipe book, always under the data dir.
    pub fn recipe_book_index_path(&self) -> PathBuf {
        self.data_dir.join(RECIPE_BOOK_INDEX_FILE)
    }

    /// `<platform data dir>/chef_gourmet`, or `./.chef_gourmet` without one.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("chef_gourmet"))
            .unwrap_or_else(|| PathBuf::from(".chef_gourmet"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config.default_api_key, None);
        assert_eq!(config.api_base_url, GEMINI_BASE_URL);
        assert_eq!(config.models.text_model, DEFAULT_TEXT_MODEL);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(120)));
        assert_eq!(config.language, Language::En);
    }

    #[test]
    fn test_gemini_key_wins_over_generic_key() {
        let config = AppConfig::from_lookup(lookup(&[("API_KEY", "generic"), ("GEMINI_API_KEY", "gemini")]));
        assert_eq!(config.default_api_key.as_deref(), Some("gemini"));

        let config = AppConfig::from_lookup(lookup(&[("API_KEY", "generic"), ("GEMINI_API_KEY", "  ")]));
        assert_eq!(config.default_api_key.as_deref(), Some("generic"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CHEF_API_BASE_URL", "http://localhost:8080"),
            ("CHEF_IMAGE_MODEL", "vision-x"),
            ("CHEF_REQUEST_TIMEOUT_SECS", "0"),
            ("CHEF_DATA_DIR", "/tmp/chef"),
            ("CHEF_LANGUAGE", "pt"),
        ]));
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.models.image_model, "vision-x");
        assert_eq!(config.models.text_model, DEFAULT_TEXT_MODEL);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/chef"));
        assert_eq!(config.language, Language::Pt);
    }

    #[test]
    fn test_bad_numbers_keep_default_timeout() {
        let config = AppConfig::from_lookup(lookup(&[("CHEF_REQUEST_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_recipe_book_paths() {
        let config = AppConfig::from_lookup(lookup(&[("CHEF_DATA_DIR", "/tmp/chef")]));
        assert_eq!(config.recipe_book_path(), PathBuf::from("/tmp/chef/recipe_book.txt"));
        assert_eq!(config.recipe_book_index_path(), PathBuf::from("/tmp/chef/recipe_book_index.json"));
        assert_eq!(config.embedding_model, DEFAULT_EMBEDDING_MODEL);

        let config = AppConfig::from_lookup(lookup(&[
            ("CHEF_RECIPE_BOOK", "/srv/recipes.txt"),
            ("CHEF_EMBEDDING_MODEL", "minishlab/potion-base-8M"),
        ]));
        assert_eq!(config.recipe_book_path(), PathBuf::from("/srv/recipes.txt"));
        assert_eq!(config.embedding_model, "minishlab/potion-base-8M");
    }
}
