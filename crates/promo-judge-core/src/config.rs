use crate::errors::ConfigError;
use crate::model::ResearchLevel;
use crate::score::{ScoringConfig, MAX_SCORE};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;
pub const ENV_RESEARCH_LEVEL: &str = "PROMO_JUDGE_RESEARCH_LEVEL";
pub const ENV_LLM_MODEL: &str = "PROMO_JUDGE_LLM_MODEL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeConfig {
    pub version: u32,
    /// Used when the caller does not pass a research level.
    pub research_level: ResearchLevel,
    pub scoring: ScoringConfig,
    pub llm: LlmAuditConfig,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            research_level: ResearchLevel::Lite,
            scoring: ScoringConfig::default(),
            llm: LlmAuditConfig::default(),
        }
    }
}

/// Generative audit pass settings. Temperature stays at 0 so the audit is as
/// repeatable as the provider allows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmAuditConfig {
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for LlmAuditConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            top_p: 1.0,
            max_output_tokens: 1200,
        }
    }
}

impl JudgeConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies `PROMO_JUDGE_RESEARCH_LEVEL` and `PROMO_JUDGE_LLM_MODEL`.
    /// Unset or unparsable values leave the current setting untouched.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var(ENV_RESEARCH_LEVEL) {
            match raw.parse::<ResearchLevel>() {
                Ok(level) => self.research_level = level,
                Err(e) => tracing::warn!("ignoring {}: {}", ENV_RESEARCH_LEVEL, e),
            }
        }
        if let Ok(model) = std::env::var(ENV_LLM_MODEL) {
            let model = model.trim();
            if !model.is_empty() {
                self.llm.model = model.to_string();
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != SUPPORTED_CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                supported: SUPPORTED_CONFIG_VERSION,
            });
        }
        if self.scoring.pass_threshold > MAX_SCORE {
            return Err(ConfigError::Invalid(format!(
                "scoring.pass_threshold must be <= {} (got {})",
                MAX_SCORE, self.scoring.pass_threshold
            )));
        }
        if self.scoring.max_recommendations == 0 {
            return Err(ConfigError::Invalid(
                "scoring.max_recommendations must be at least 1".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid(format!(
                "llm.temperature must be within 0..=2 (got {})",
                self.llm.temperature
            )));
        }
        if !(self.llm.top_p > 0.0 && self.llm.top_p <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "llm.top_p must be within (0, 1] (got {})",
                self.llm.top_p
            )));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model must not be empty".into()));
        }
        Ok(())
    }
}

/// Reads a YAML config, applies environment overrides and validates.
pub fn load_config(path: &Path) -> Result<JudgeConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let cfg: JudgeConfig =
        serde_yaml::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
    let cfg = cfg.with_env_overrides();
    cfg.validate()?;
    Ok(cfg)
}
