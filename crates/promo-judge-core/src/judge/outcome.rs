//! Result of each best-effort collaborator call, with its default on failure.

use crate::model::{Issue, OfferIqResult, ResearchPack};

/// Where the research pack came from.
///
/// A provider error, or no provider at all, becomes `Missing`, which the
/// research check reports as `RESEARCH_MISSING`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResearchOutcome {
    Supplied(ResearchPack),
    Fetched(ResearchPack),
    Missing { reason: String },
}

impl ResearchOutcome {
    pub fn pack(&self) -> Option<&ResearchPack> {
        match self {
            Self::Supplied(pack) | Self::Fetched(pack) => Some(pack),
            Self::Missing { .. } => None,
        }
    }
}

/// Where the offer assessment came from.
///
/// `Unavailable` means no assessment, so the offer check stays silent.
#[derive(Debug, Clone, PartialEq)]
pub enum OfferOutcome {
    Supplied(OfferIqResult),
    Scored(OfferIqResult),
    Unavailable { reason: String },
}

impl OfferOutcome {
    pub fn result(&self) -> Option<&OfferIqResult> {
        match self {
            Self::Supplied(r) | Self::Scored(r) => Some(r),
            Self::Unavailable { .. } => None,
        }
    }
}

/// What the generative audit pass contributed.
///
/// `Failed` contributes no issues and leaves the deterministic verdict as
/// is; the verdict still reports that an attempt was made.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditOutcome {
    Skipped,
    Merged { issues: Vec<Issue>, model: String },
    Failed { reason: String },
}

impl AuditOutcome {
    pub fn attempted(&self) -> bool {
        !matches!(self, Self::Skipped)
    }
}
