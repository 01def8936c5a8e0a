//! Application settings loaded from an optional TOML file.

use crate::ai::{GenerationOptions, ModelConfig, DEFAULT_MODEL};
use crate::ai::client::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "INTERVIEW_QUIZ_CONFIG";
pub const MODEL_ENV: &str = "INTERVIEW_QUIZ_MODEL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub notes_dir: PathBuf,
    pub export_dir: PathBuf,
    /// Ask for a confidence rating after every answer.
    pub confidence_step: bool,
    /// Ask the model to tag questions as logic or conceptual.
    pub tag_question_kind: bool,
    pub default_question_count: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            notes_dir: PathBuf::from("notes"),
            export_dir: PathBuf::from("."),
            confidence_step: true,
            tag_question_kind: true,
            default_question_count: 10,
        }
    }
}

impl AppConfig {
    /// Resolve the config file, read it, then apply environment overrides.
    pub fn load(data_dir: &Path) -> Self {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("config.toml"));
        Self::load_from(&path).with_model_override(std::env::var(MODEL_ENV).ok())
    }

    /// Defaults when the file is missing; parse and read errors are logged.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(s) => match toml::from_str::<AppConfig>(&s) {
                Ok(cfg) => {
                    tracing::info!(path = %path.display(), "loaded config");
                    cfg
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "failed to parse config");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to read config");
                Self::default()
            }
        }
    }

    pub fn with_model_override(mut self, model: Option<String>) -> Self {
        if let Some(model) = model
            && !model.trim().is_empty()
        {
            self.model = model.trim().to_string();
        }
        self
    }

    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            model: self.model.clone(),
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
        }
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            tag_question_kind: self.tag_question_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(&dir.path().join("config.toml"));
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.model, "openai/gpt-oss-120b");
        assert!(cfg.confidence_step);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "confidence_step = false\nnotes_dir = \"/tmp/notes\"\ndefault_question_count = 15\n",
        )
        .unwrap();

        let cfg = AppConfig::load_from(&path);
        assert!(!cfg.confidence_step);
        assert_eq!(cfg.notes_dir, PathBuf::from("/tmp/notes"));
        assert_eq!(cfg.default_question_count, 15);
        assert_eq!(cfg.max_tokens, 4096);
        assert!(cfg.tag_question_kind);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "temperature = \"hot\"").unwrap();
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }

    #[test]
    fn test_model_override() {
        let cfg = AppConfig::default()
            .with_model_override(Some("meta-llama/llama-3.1-70b-instruct".to_string()));
        assert_eq!(cfg.model, "meta-llama/llama-3.1-70b-instruct");
        assert_eq!(cfg.model_config().model, "meta-llama/llama-3.1-70b-instruct");

        let cfg = AppConfig::default().with_model_override(Some("  ".to_string()));
        assert_eq!(cfg.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_generation_options_follow_flag() {
        let cfg = AppConfig {
            tag_question_kind: false,
            ..AppConfig::default()
        };
        assert!(!cfg.generation_options().tag_question_kind);
    }
}
