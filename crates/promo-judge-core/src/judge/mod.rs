mod judge_internal;
pub mod outcome;

use crate::config::JudgeConfig;
use crate::model::{
    CampaignContext, JudgeVerdict, NarrativeInputs, OfferIqResult, ResearchLevel, ResearchPack,
};
use crate::providers::llm::LlmClient;
use crate::providers::{NarrativeStore, OfferScorer, ResearchProvider};
use std::sync::Arc;

pub use outcome::{AuditOutcome, OfferOutcome, ResearchOutcome};

/// Per-call options.
#[derive(Debug, Clone, Default)]
pub struct JudgeOptions {
    /// Falls back to `JudgeConfig::research_level`.
    pub research_level: Option<ResearchLevel>,
    /// Pre-fetched research; skips the research provider.
    pub baseline_research: Option<ResearchPack>,
    /// Explicit narrative texts; missing phases come from the store.
    pub inputs: NarrativeInputs,
    pub use_llm: bool,
    /// Pre-computed offer assessment; skips the offer scorer.
    pub offer_iq: Option<OfferIqResult>,
}

#[derive(Clone)]
pub struct JudgeService {
    config: JudgeConfig,
    narratives: Arc<dyn NarrativeStore>,
    research: Option<Arc<dyn ResearchProvider>>,
    offer_scorer: Option<Arc<dyn OfferScorer>>,
    client: Option<Arc<dyn LlmClient>>,
}

impl JudgeService {
    pub fn new(config: JudgeConfig, narratives: Arc<dyn NarrativeStore>) -> Self {
        Self {
            config,
            narratives,
            research: None,
            offer_scorer: None,
            client: None,
        }
    }

    pub fn with_research(mut self, provider: Arc<dyn ResearchProvider>) -> Self {
        self.research = Some(provider);
        self
    }

    pub fn with_offer_scorer(mut self, scorer: Arc<dyn OfferScorer>) -> Self {
        self.offer_scorer = Some(scorer);
        self
    }

    pub fn with_llm(mut self, client: Arc<dyn LlmClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn config(&self) -> &JudgeConfig {
        &self.config
    }

    /// Audits the campaign's narratives and returns a fresh verdict.
    ///
    /// Only a narrative store failure (or an unusable context) is returned
    /// as an error. Research, offer scoring and the LLM audit degrade to
    /// their documented defaults instead.
    pub async fn evaluate(
        &self,
        context: &CampaignContext,
        opts: JudgeOptions,
    ) -> anyhow::Result<JudgeVerdict> {
        judge_internal::run::evaluate_impl(self, context, opts).await
    }
}
