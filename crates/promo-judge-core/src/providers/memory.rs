//! In-memory collaborators for the CLI and tests.

use super::{NarrativeStore, OfferScoreInput, OfferScorer, ResearchProvider};
use crate::model::{CampaignContext, OfferIqResult, ResearchLevel, ResearchPack};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Narratives keyed by `(campaign_id, type)`; later inserts are newer.
#[derive(Debug, Default)]
pub struct StaticNarrativeStore {
    entries: RwLock<HashMap<(String, String), Vec<String>>>,
}

impl StaticNarrativeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, campaign_id: &str, kind: &str, text: impl Into<String>) {
        self.entries
            .write()
            .await
            .entry((campaign_id.to_string(), kind.to_string()))
            .or_default()
            .push(text.into());
    }

    /// Builder form of [`Self::insert`] for setup code.
    pub fn with(mut self, campaign_id: &str, kind: &str, text: impl Into<String>) -> Self {
        self.entries
            .get_mut()
            .entry((campaign_id.to_string(), kind.to_string()))
            .or_default()
            .push(text.into());
        self
    }
}

#[async_trait]
impl NarrativeStore for StaticNarrativeStore {
    async fn fetch_latest(
        &self,
        campaign_id: &str,
        type_aliases: &[&str],
    ) -> anyhow::Result<String> {
        let entries = self.entries.read().await;
        let latest = type_aliases.iter().find_map(|kind| {
            entries
                .get(&(campaign_id.to_string(), kind.to_string()))
                .and_then(|texts| texts.last())
        });
        Ok(latest.cloned().unwrap_or_default())
    }
}

/// Returns the same pack for every campaign and level.
#[derive(Debug, Clone)]
pub struct StaticResearch(pub ResearchPack);

#[async_trait]
impl ResearchProvider for StaticResearch {
    async fn fetch(
        &self,
        _context: &CampaignContext,
        _level: ResearchLevel,
    ) -> anyhow::Result<ResearchPack> {
        Ok(self.0.clone())
    }
}

/// Always fails, which the judge reports as missing research.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResearch;

#[async_trait]
impl ResearchProvider for NoResearch {
    async fn fetch(
        &self,
        _context: &CampaignContext,
        level: ResearchLevel,
    ) -> anyhow::Result<ResearchPack> {
        anyhow::bail!("no research source configured ({})", level.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct StaticOfferScorer(pub OfferIqResult);

#[async_trait]
impl OfferScorer for StaticOfferScorer {
    async fn score(&self, _input: OfferScoreInput<'_>) -> anyhow::Result<OfferIqResult> {
        Ok(self.0.clone())
    }
}
