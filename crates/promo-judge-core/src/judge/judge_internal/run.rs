use crate::derived::DerivedFlags;
use crate::errors::JudgeError;
use crate::judge::{AuditOutcome, JudgeOptions, JudgeService, OfferOutcome, ResearchOutcome};
use crate::model::{
    CampaignContext, JudgeVerdict, NarrativeInputs, NarrativeSet, OfferIqResult, Phase,
    ResearchLevel, ResearchPack, VerdictContext, VerdictMeta,
};
use crate::providers::OfferScoreInput;
use crate::rules::{self, RuleInput};
use crate::signals;
use crate::verdict::build_verdict;
use tracing::Instrument;

pub(crate) async fn evaluate_impl(
    svc: &JudgeService,
    context: &CampaignContext,
    opts: JudgeOptions,
) -> anyhow::Result<JudgeVerdict> {
    let span = tracing::info_span!("judge.evaluate", campaign_id = %context.campaign_id);
    evaluate_inner(svc, context, opts).instrument(span).await
}

async fn evaluate_inner(
    svc: &JudgeService,
    context: &CampaignContext,
    opts: JudgeOptions,
) -> anyhow::Result<JudgeVerdict> {
    let JudgeOptions {
        research_level,
        baseline_research,
        inputs,
        use_llm,
        offer_iq,
    } = opts;
    let level = research_level.unwrap_or(svc.config.research_level);

    let narratives = load_narratives(svc, context, &inputs).await?;
    let research = resolve_research(svc, context, level, baseline_research).await;
    let offer = resolve_offer(svc, context, research.pack(), offer_iq).await;

    let corpus = signals::build_corpus(context, &narratives);
    let derived = DerivedFlags::derive(&context.brief, &corpus);
    let mut findings = rules::run_checks(&RuleInput {
        brief: &context.brief,
        narratives: &narratives,
        derived: &derived,
        research: research.pack(),
        offer: offer.result(),
    });

    let audit = if use_llm {
        super::client::run_audit(svc, context, &narratives).await
    } else {
        AuditOutcome::Skipped
    };
    let meta = match audit {
        AuditOutcome::Skipped => None,
        AuditOutcome::Merged { issues, model } => {
            tracing::debug!(count = issues.len(), "merging auditor issues");
            findings.issues.extend(issues);
            Some(VerdictMeta {
                used_llm: true,
                model: Some(model),
            })
        }
        AuditOutcome::Failed { reason } => {
            tracing::warn!("LLM audit failed, keeping deterministic verdict: {}", reason);
            Some(VerdictMeta {
                used_llm: true,
                model: None,
            })
        }
    };

    let verdict_context = VerdictContext {
        campaign_id: context.campaign_id.clone(),
        promotion_type: context.brief.promotion_type().as_str().to_string(),
        derived,
        research_level: level,
        research_present: research.pack().is_some(),
        offer_verdict: offer.result().map(|o| o.verdict),
    };
    let verdict = build_verdict(findings, verdict_context, &svc.config.scoring, meta);
    tracing::info!(
        score = verdict.score,
        pass = verdict.pass,
        issues = verdict.issues.len(),
        "judge verdict"
    );
    Ok(verdict)
}

/// Explicit inputs win; other phases come from the store (primary type
/// name, then legacy alias). Store failures propagate.
async fn load_narratives(
    svc: &JudgeService,
    context: &CampaignContext,
    inputs: &NarrativeInputs,
) -> anyhow::Result<NarrativeSet> {
    let mut set = NarrativeSet::default();
    for phase in Phase::ALL {
        let text = match inputs.get(phase) {
            Some(text) => text.to_string(),
            None => fetch_phase(svc, context, phase).await?,
        };
        set.set(phase, text);
    }
    Ok(set)
}

async fn fetch_phase(
    svc: &JudgeService,
    context: &CampaignContext,
    phase: Phase,
) -> anyhow::Result<String> {
    if context.campaign_id.trim().is_empty() {
        return Err(JudgeError::InvalidContext(format!(
            "campaign id is required to fetch the {} narrative",
            phase
        ))
        .into());
    }
    svc.narratives
        .fetch_latest(&context.campaign_id, phase.store_aliases())
        .await
        .map_err(|e| {
            JudgeError::NarrativeStore {
                campaign_id: context.campaign_id.clone(),
                phase,
                detail: format!("{:#}", e),
            }
            .into()
        })
}

async fn resolve_research(
    svc: &JudgeService,
    context: &CampaignContext,
    level: ResearchLevel,
    baseline: Option<ResearchPack>,
) -> ResearchOutcome {
    if let Some(pack) = baseline {
        return ResearchOutcome::Supplied(pack);
    }
    let Some(provider) = &svc.research else {
        return ResearchOutcome::Missing {
            reason: "no research provider".into(),
        };
    };
    match provider.fetch(context, level).await {
        Ok(pack) => ResearchOutcome::Fetched(pack),
        Err(e) => {
            tracing::warn!(level = level.as_str(), "research fetch failed: {:#}", e);
            ResearchOutcome::Missing {
                reason: format!("{:#}", e),
            }
        }
    }
}

async fn resolve_offer(
    svc: &JudgeService,
    context: &CampaignContext,
    research: Option<&ResearchPack>,
    supplied: Option<OfferIqResult>,
) -> OfferOutcome {
    if let Some(result) = supplied {
        return OfferOutcome::Supplied(result);
    }
    let Some(scorer) = &svc.offer_scorer else {
        return OfferOutcome::Unavailable {
            reason: "no offer scorer".into(),
        };
    };
    match scorer.score(OfferScoreInput { context, research }).await {
        Ok(result) => OfferOutcome::Scored(result),
        Err(e) => {
            tracing::warn!("offer scoring failed, skipping offer check: {:#}", e);
            OfferOutcome::Unavailable {
                reason: format!("{:#}", e),
            }
        }
    }
}
