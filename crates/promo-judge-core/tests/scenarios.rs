//! End-to-end judge scenarios through the public API.

use promo_judge_core::model::{CampaignContext, NarrativeInputs, Phase, ResearchPack};
use promo_judge_core::providers::llm::fake::FakeClient;
use promo_judge_core::providers::memory::StaticNarrativeStore;
use promo_judge_core::rules::codes;
use promo_judge_core::{JudgeConfig, JudgeOptions, JudgeService, Severity};
use serde_json::json;
use std::sync::Arc;

fn service() -> JudgeService {
    JudgeService::new(JudgeConfig::default(), Arc::new(StaticNarrativeStore::new()))
}

fn context(brief: serde_json::Value) -> CampaignContext {
    serde_json::from_value(json!({"campaignId": "it-1", "brief": brief})).unwrap()
}

fn research() -> ResearchPack {
    serde_json::from_value(json!({
        "audience": [{"claim": "a1"}, {"claim": "a2"}, {"claim": "a3"}],
        "category": [{"claim": "c1"}, {"claim": "c2"}, {"claim": "c3"}],
        "retailers": [{"claim": "r1"}, {"claim": "r2"}],
        "competitorPromos": [
            {"text": "p1"}, {"text": "p2"}, {"text": "p3"}, {"text": "p4"}, {"text": "p5"}
        ]
    }))
    .unwrap()
}

fn narratives(evaluation: &str, opinion: &str) -> NarrativeInputs {
    NarrativeInputs {
        framing: Some(String::new()),
        evaluation: Some(evaluation.into()),
        opinion: Some(opinion.into()),
        strategist: Some(String::new()),
        export_summary: Some(String::new()),
    }
}

#[tokio::test]
async fn clean_prize_campaign_passes() {
    let ctx = context(json!({
        "typeOfPromotion": "PRIZE",
        "heroPrize": "Trip to Bali",
        "totalWinners": 1200
    }));
    let opts = JudgeOptions {
        inputs: narratives(
            "With 1,200 winners the odds story is strong. Raise the majors to 3 and convert the runner-up tier into instant wins.",
            "Lead with the 1,200 winners. Keep or replace the hook after testing.",
        ),
        baseline_research: Some(research()),
        ..Default::default()
    };
    let verdict = service().evaluate(&ctx, opts).await.unwrap();
    assert!(verdict.issues.is_empty(), "{:?}", verdict.issues);
    assert_eq!(verdict.score, 100);
    assert!(verdict.pass);
    assert!(verdict.requires_regeneration.is_empty());
    assert!(verdict.flags.contains(&"prize-led".to_string()));
}

#[tokio::test]
async fn cashback_vocabulary_never_blocks_assured_promotions() {
    let ctx = context(json!({"typeOfPromotion": "CASHBACK", "cashbackAmount": "$20"}));
    let opts = JudgeOptions {
        inputs: narratives("Every purchase gets $20 cashback.", "A rebate people trust."),
        baseline_research: Some(research()),
        ..Default::default()
    };
    let verdict = service().evaluate(&ctx, opts).await.unwrap();
    assert!(!verdict.has_issue(codes::PRIZE_NOT_CASHBACK));
    assert!(verdict.context.derived.assured);
    assert!(verdict.flags.contains(&"assured".to_string()));
}

#[tokio::test]
async fn blockers_always_fail_and_score_stays_in_range() {
    let ctx = context(json!({
        "typeOfPromotion": "PRIZE",
        "heroPrize": "Car",
        "totalWinners": "5,000"
    }));
    let opts = JudgeOptions {
        inputs: narratives(
            "A cashback style reward with a seamless QR entry.",
            "Gift with purchase energy.",
        ),
        offer_iq: Some(serde_json::from_value(json!({"verdict": "NO-GO"})).unwrap()),
        ..Default::default()
    };
    let verdict = service().evaluate(&ctx, opts).await.unwrap();
    assert!(verdict.count(Severity::Blocker) >= 2);
    assert!(!verdict.pass);
    assert!(verdict.score <= 100);
    assert_eq!(
        verdict.requires_regeneration,
        vec![Phase::Evaluation, Phase::Opinion]
    );
}

#[tokio::test]
async fn fake_llm_marks_meta_without_changing_rules() {
    let ctx = context(json!({"typeOfPromotion": "GWP", "gwpItem": "Tote bag"}));
    let opts = JudgeOptions {
        inputs: narratives("", ""),
        baseline_research: Some(research()),
        use_llm: true,
        ..Default::default()
    };
    let svc = service().with_llm(Arc::new(FakeClient::new("fake-model")));
    let verdict = svc.evaluate(&ctx, opts).await.unwrap();
    assert!(verdict.issues.is_empty());
    let meta = verdict.meta.unwrap();
    assert!(meta.used_llm);
    assert_eq!(meta.model.as_deref(), Some("fake-model"));
}

#[tokio::test]
async fn verdict_serializes_with_camel_case_wire_names() {
    let ctx = context(json!({"typeOfPromotion": "PRIZE", "heroPrize": "Car"}));
    let opts = JudgeOptions {
        inputs: narratives("", ""),
        ..Default::default()
    };
    let verdict = service().evaluate(&ctx, opts).await.unwrap();
    let v = serde_json::to_value(&verdict).unwrap();
    assert!(v.get("requiresRegeneration").is_some());
    assert_eq!(v["context"]["campaignId"], "it-1");
    assert_eq!(v["context"]["prizeLed"], true);
    assert_eq!(v["context"]["researchLevel"], "LITE");
    assert!(v.get("meta").is_none());
}
