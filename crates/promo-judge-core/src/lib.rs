//! Narrative Compliance Judge.
//!
//! Audits generated campaign narratives (framing, evaluation, opinion,
//! strategist, export) against the originating brief and emits a
//! severity-weighted [`model::JudgeVerdict`] that gates regeneration of
//! upstream phases.

pub mod coerce;
pub mod config;
pub mod derived;
pub mod errors;
pub mod judge;
pub mod model;
pub mod providers;
pub mod report;
pub mod rules;
pub mod score;
pub mod signals;
pub mod verdict;

pub use config::{load_config, JudgeConfig};
pub use errors::{ConfigError, JudgeError};
pub use judge::{JudgeOptions, JudgeService};
pub use model::{Issue, JudgeVerdict, Severity};
