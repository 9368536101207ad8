pub mod domain;
pub mod form;
pub mod i18n;
pub mod model;
pub mod predict;

pub mod config {
    use crate::domain::variant::Variant;
    use crate::i18n::Language;
    use anyhow::Context;
    use std::path::{Path, PathBuf};

    pub const DEFAULT_NFT_PRICE_MODEL_PATH: &str = "models/nft_price_predictor.json";
    pub const DEFAULT_FLOOR_PRICE_MODEL_PATH: &str = "models/floor_price_predictor.json";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub nft_price_model_path: PathBuf,
        pub floor_price_model_path: PathBuf,
        pub default_language: Language,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let default_language = match non_empty_var("DEFAULT_LANGUAGE") {
                Some(key) => Language::from_key(&key)
                    .with_context(|| format!("DEFAULT_LANGUAGE is invalid: {key}"))?,
                None => Language::English,
            };

            Ok(Self {
                nft_price_model_path: non_empty_var("NFT_PRICE_MODEL_PATH")
                    .unwrap_or_else(|| DEFAULT_NFT_PRICE_MODEL_PATH.to_string())
                    .into(),
                floor_price_model_path: non_empty_var("FLOOR_PRICE_MODEL_PATH")
                    .unwrap_or_else(|| DEFAULT_FLOOR_PRICE_MODEL_PATH.to_string())
                    .into(),
                default_language,
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn model_path(&self, variant: Variant) -> &Path {
            match variant {
                Variant::NftPrice => &self.nft_price_model_path,
                Variant::FloorPrice => &self.floor_price_model_path,
            }
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::sync::{Mutex, OnceLock};

        // Tests in this module mutate process-wide env vars.
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

        fn env_lock() -> &'static Mutex<()> {
            ENV_LOCK.get_or_init(|| Mutex::new(()))
        }

        #[test]
        fn defaults_when_env_is_empty() {
            let _guard = env_lock().lock().unwrap();
            std::env::remove_var("NFT_PRICE_MODEL_PATH");
            std::env::remove_var("FLOOR_PRICE_MODEL_PATH");
            std::env::remove_var("DEFAULT_LANGUAGE");

            let settings = Settings::from_env().unwrap();
            assert_eq!(
                settings.model_path(Variant::NftPrice),
                Path::new(DEFAULT_NFT_PRICE_MODEL_PATH)
            );
            assert_eq!(
                settings.model_path(Variant::FloorPrice),
                Path::new(DEFAULT_FLOOR_PRICE_MODEL_PATH)
            );
            assert_eq!(settings.default_language, Language::English);
        }

        #[test]
        fn reads_overrides_and_rejects_unknown_language() {
            let _guard = env_lock().lock().unwrap();
            std::env::set_var("NFT_PRICE_MODEL_PATH", "/srv/models/a.json");
            std::env::set_var("DEFAULT_LANGUAGE", "id");

            let settings = Settings::from_env().unwrap();
            assert_eq!(
                settings.model_path(Variant::NftPrice),
                Path::new("/srv/models/a.json")
            );
            assert_eq!(settings.default_language, Language::Indonesian);

            std::env::set_var("DEFAULT_LANGUAGE", "fr");
            assert!(Settings::from_env().is_err());

            std::env::remove_var("NFT_PRICE_MODEL_PATH");
            std::env::remove_var("DEFAULT_LANGUAGE");
        }
    }
}
