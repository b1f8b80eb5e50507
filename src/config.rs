use std::path::PathBuf;

/// Default location of the gold-standard resume corpus, relative to the working directory.
pub const DEFAULT_CORPUS_DIR: &str = "data/resume_dataset/tech-resume";
/// Default location of the persisted model bundle, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "placement_model.bin";

/// Engine configuration.
/// Only locations are configurable; the vectorizer constants are fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub corpus_dir: PathBuf,
    pub model_path: PathBuf,
    pub rust_log: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            corpus_dir: PathBuf::from(DEFAULT_CORPUS_DIR),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            rust_log: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load from the environment (and a `.env` file if present).
    ///
    /// - `PLACEMENT_CORPUS_DIR`
    /// - `PLACEMENT_MODEL_PATH`
    /// - `RUST_LOG`
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EngineConfig::default();
        EngineConfig {
            corpus_dir: non_empty(lookup("PLACEMENT_CORPUS_DIR"))
                .map(PathBuf::from)
                .unwrap_or(defaults.corpus_dir),
            model_path: non_empty(lookup("PLACEMENT_MODEL_PATH"))
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            rust_log: non_empty(lookup("RUST_LOG")).unwrap_or(defaults.rust_log),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = EngineConfig::from_lookup(|_| None);
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn overrides_are_read() {
        let env: HashMap<&str, &str> = [
            ("PLACEMENT_CORPUS_DIR", "/srv/gold"),
            ("PLACEMENT_MODEL_PATH", "/var/lib/model.bin"),
            ("RUST_LOG", "debug"),
        ]
        .into_iter()
        .collect();
        let config = EngineConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.corpus_dir, PathBuf::from("/srv/gold"));
        assert_eq!(config.model_path, PathBuf::from("/var/lib/model.bin"));
        assert_eq!(config.rust_log, "debug");
    }

    #[test]
    fn blank_values_fall_back() {
        let config = EngineConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config, EngineConfig::default());
    }
}
