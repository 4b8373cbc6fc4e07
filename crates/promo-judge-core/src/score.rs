//! Severity-weighted score and pass gate.

use crate::model::{Issue, Severity};
use serde::{Deserialize, Serialize};

pub const BLOCKER_PENALTY: u32 = 25;
pub const WARN_PENALTY: u32 = 10;
pub const NIT_PENALTY: u32 = 3;
pub const PASS_THRESHOLD: u32 = 70;
pub const MAX_RECOMMENDATIONS: usize = 12;
pub const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub blocker_penalty: u32,
    pub warn_penalty: u32,
    pub nit_penalty: u32,
    pub pass_threshold: u32,
    pub max_recommendations: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            blocker_penalty: BLOCKER_PENALTY,
            warn_penalty: WARN_PENALTY,
            nit_penalty: NIT_PENALTY,
            pass_threshold: PASS_THRESHOLD,
            max_recommendations: MAX_RECOMMENDATIONS,
        }
    }
}

impl ScoringConfig {
    pub fn penalty(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Blocker => self.blocker_penalty,
            Severity::Warn => self.warn_penalty,
            Severity::Nit => self.nit_penalty,
        }
    }

    /// `clamp(100 - sum(penalties), 0, 100)`.
    pub fn score(&self, issues: &[Issue]) -> u32 {
        let total = issues
            .iter()
            .fold(0u32, |acc, i| acc.saturating_add(self.penalty(i.severity)));
        MAX_SCORE.saturating_sub(total)
    }

    /// No blockers and a score at or above the threshold.
    pub fn is_pass(&self, issues: &[Issue], score: u32) -> bool {
        !issues.iter().any(|i| i.severity == Severity::Blocker) && score >= self.pass_threshold
    }
}
