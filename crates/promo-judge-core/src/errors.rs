use crate::model::Phase;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse YAML: {0}")]
    Parse(String),
    #[error("unsupported config version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failures the judge propagates; everything else degrades to a default.
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("narrative store failed for campaign '{campaign_id}' ({phase}): {detail}")]
    NarrativeStore {
        campaign_id: String,
        phase: Phase,
        detail: String,
    },
    #[error("invalid campaign context: {0}")]
    InvalidContext(String),
}
