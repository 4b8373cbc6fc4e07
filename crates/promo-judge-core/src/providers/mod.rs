//! Collaborator seams the judge calls out to.
//!
//! Every trait here is async and object-safe so the service can hold them
//! as `Arc<dyn _>` and tests can swap in in-memory versions.

pub mod llm;
pub mod memory;

use crate::model::{CampaignContext, OfferIqResult, ResearchLevel, ResearchPack};
use async_trait::async_trait;

/// Read access to previously generated narratives.
#[async_trait]
pub trait NarrativeStore: Send + Sync {
    /// Latest stored text for the first alias that has any entry, or an
    /// empty string when none does.
    async fn fetch_latest(&self, campaign_id: &str, type_aliases: &[&str])
        -> anyhow::Result<String>;
}

#[async_trait]
pub trait ResearchProvider: Send + Sync {
    async fn fetch(
        &self,
        context: &CampaignContext,
        level: ResearchLevel,
    ) -> anyhow::Result<ResearchPack>;
}

#[derive(Debug, Clone, Copy)]
pub struct OfferScoreInput<'a> {
    pub context: &'a CampaignContext,
    pub research: Option<&'a ResearchPack>,
}

/// Scores whether the offer is adequate in its market.
#[async_trait]
pub trait OfferScorer: Send + Sync {
    async fn score(&self, input: OfferScoreInput<'_>) -> anyhow::Result<OfferIqResult>;
}
