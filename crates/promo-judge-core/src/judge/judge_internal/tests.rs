use super::client::parse_audit_issues;
use super::prompt::{build_prompt_impl, CHECKLIST};
use crate::config::JudgeConfig;
use crate::judge::{JudgeOptions, JudgeService};
use crate::model::{
    CampaignContext, NarrativeInputs, NarrativeSet, OfferIqResult, Phase, ResearchFact,
    ResearchLevel, ResearchPack, Severity,
};
use crate::providers::llm::{CompletionRequest, LlmClient, LlmResponse};
use crate::providers::memory::{NoResearch, StaticNarrativeStore, StaticOfferScorer, StaticResearch};
use crate::providers::{NarrativeStore, OfferScoreInput, OfferScorer};
use crate::rules::codes;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

struct MockLlmClient {
    responses: std::sync::Mutex<Vec<String>>,
    requests: std::sync::Mutex<Vec<CompletionRequest>>,
}

impl MockLlmClient {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let mut resps = self.responses.lock().unwrap();
        if resps.is_empty() {
            anyhow::bail!("No more mock responses");
        }
        let text = resps.remove(0);
        Ok(LlmResponse {
            text,
            provider: "mock".to_string(),
            model: "mock-model".to_string(),
        })
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

struct FailingStore;

#[async_trait]
impl NarrativeStore for FailingStore {
    async fn fetch_latest(&self, _id: &str, _aliases: &[&str]) -> anyhow::Result<String> {
        anyhow::bail!("connection refused")
    }
}

struct FailingScorer;

#[async_trait]
impl OfferScorer for FailingScorer {
    async fn score(&self, _input: OfferScoreInput<'_>) -> anyhow::Result<OfferIqResult> {
        anyhow::bail!("scorer timeout")
    }
}

fn scenario_a() -> CampaignContext {
    serde_json::from_value(json!({
        "campaignId": "bali-1",
        "brief": {
            "typeOfPromotion": "PRIZE",
            "heroPrize": "Trip to Bali",
            "totalWinners": 1200
        }
    }))
    .unwrap()
}

fn inputs(evaluation: &str, opinion: &str) -> NarrativeInputs {
    NarrativeInputs {
        framing: Some("Summer in Bali.".into()),
        evaluation: Some(evaluation.into()),
        opinion: Some(opinion.into()),
        strategist: Some(String::new()),
        export_summary: Some(String::new()),
    }
}

fn full_research() -> ResearchPack {
    let facts = |n: usize| {
        (0..n)
            .map(|i| ResearchFact {
                claim: format!("fact {}", i),
                source: None,
            })
            .collect::<Vec<_>>()
    };
    ResearchPack {
        audience: facts(3),
        category: facts(3),
        retailers: facts(2),
        competitors: facts(5),
    }
}

fn service() -> JudgeService {
    JudgeService::new(JudgeConfig::default(), Arc::new(StaticNarrativeStore::new()))
}

#[tokio::test]
async fn scenario_a_winners_not_surfaced() {
    let opts = JudgeOptions {
        inputs: inputs("A trip to Bali is a strong hero.", "Solid idea."),
        baseline_research: Some(full_research()),
        ..Default::default()
    };
    let verdict = service().evaluate(&scenario_a(), opts).await.unwrap();

    let issue = verdict
        .issues
        .iter()
        .find(|i| i.code == codes::WINNERS_NOT_SURFACED)
        .expect("winners issue");
    assert_eq!(issue.severity, Severity::Warn);
    assert!(verdict
        .recommendations
        .iter()
        .any(|r| r.starts_with("Lead with")));
    assert!(verdict.requires_regeneration.contains(&Phase::Opinion));
    assert_eq!(verdict.context.derived.total_winners, Some(1200));
    assert!(verdict.meta.is_none());
}

#[tokio::test]
async fn scenario_b_no_go_offer_blocks() {
    let offer: OfferIqResult = serde_json::from_value(json!({
        "verdict": "NO-GO",
        "hardFlags": [],
        "lenses": {"adequacy": {"fix": "Add a guaranteed reward tier."}}
    }))
    .unwrap();
    let opts = JudgeOptions {
        inputs: inputs(
            "1,200 winners make the odds real. Raise the majors to three and convert runner-ups into instant wins.",
            "Lead with the 1,200 winners. Replace the hook with a local angle.",
        ),
        baseline_research: Some(full_research()),
        offer_iq: Some(offer),
        ..Default::default()
    };
    let verdict = service().evaluate(&scenario_a(), opts).await.unwrap();

    assert!(verdict.has_issue(codes::OFFER_INADEQUATE));
    assert_eq!(verdict.count(Severity::Blocker), 1);
    assert!(!verdict.pass);
    assert!(verdict
        .recommendations
        .contains(&"Add a guaranteed reward tier.".to_string()));
    assert!(verdict.requires_regeneration.contains(&Phase::Opinion));
}

#[tokio::test]
async fn deterministic_path_is_idempotent() {
    let opts = JudgeOptions {
        inputs: inputs("Scan the QR code, it is seamless.", "Cash back vibes."),
        ..Default::default()
    };
    let svc = service();
    let first = svc.evaluate(&scenario_a(), opts.clone()).await.unwrap();
    let second = svc.evaluate(&scenario_a(), opts).await.unwrap();
    assert_eq!(first, second);
    assert!(first.has_issue(codes::PRIZE_NOT_CASHBACK));
    assert!(first.has_issue(codes::RESEARCH_MISSING));
}

#[tokio::test]
async fn missing_inputs_are_fetched_from_store_with_legacy_alias() {
    let store = StaticNarrativeStore::new()
        .with("bali-1", "evaluate", "There are 1200 winners.")
        .with("bali-1", "synthesis", "old opinion")
        .with("bali-1", "opinion", "Lead with the winners.");
    let svc = JudgeService::new(JudgeConfig::default(), Arc::new(store));
    let opts = JudgeOptions {
        inputs: NarrativeInputs {
            framing: Some("Given framing".into()),
            ..Default::default()
        },
        ..Default::default()
    };
    let verdict = svc.evaluate(&scenario_a(), opts).await.unwrap();
    assert!(!verdict.has_issue(codes::WINNERS_NOT_SURFACED));
}

#[tokio::test]
async fn narrative_store_failure_propagates() {
    let svc = JudgeService::new(JudgeConfig::default(), Arc::new(FailingStore));
    let err = svc
        .evaluate(&scenario_a(), JudgeOptions::default())
        .await
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("bali-1"), "{}", msg);
    assert!(msg.contains("connection refused"), "{}", msg);
}

#[tokio::test]
async fn store_not_consulted_when_all_inputs_supplied() {
    let svc = JudgeService::new(JudgeConfig::default(), Arc::new(FailingStore));
    let opts = JudgeOptions {
        inputs: inputs("x", "y"),
        ..Default::default()
    };
    assert!(svc.evaluate(&scenario_a(), opts).await.is_ok());
}

#[tokio::test]
async fn research_failure_degrades_to_missing() {
    let svc = service().with_research(Arc::new(NoResearch));
    let opts = JudgeOptions {
        inputs: inputs("", ""),
        research_level: Some(ResearchLevel::Deep),
        ..Default::default()
    };
    let verdict = svc.evaluate(&scenario_a(), opts).await.unwrap();
    assert!(verdict.has_issue(codes::RESEARCH_MISSING));
    assert!(!verdict.context.research_present);
    assert_eq!(verdict.context.research_level, ResearchLevel::Deep);
}

#[tokio::test]
async fn research_provider_and_offer_scorer_are_used_when_nothing_supplied() {
    let offer: OfferIqResult =
        serde_json::from_value(json!({"verdict": "CONDITIONAL", "hardFlags": "INADEQUATE_VALUE"}))
            .unwrap();
    let svc = service()
        .with_research(Arc::new(StaticResearch(full_research())))
        .with_offer_scorer(Arc::new(StaticOfferScorer(offer)));
    let opts = JudgeOptions {
        inputs: inputs("", ""),
        ..Default::default()
    };
    let verdict = svc.evaluate(&scenario_a(), opts).await.unwrap();
    assert!(verdict.context.research_present);
    assert!(!verdict.has_issue(codes::RESEARCH_MISSING));
    assert!(verdict.has_issue(codes::OFFER_INADEQUATE));
}

#[tokio::test]
async fn offer_scorer_failure_skips_offer_check() {
    let svc = service().with_offer_scorer(Arc::new(FailingScorer));
    let opts = JudgeOptions {
        inputs: inputs("", ""),
        ..Default::default()
    };
    let verdict = svc.evaluate(&scenario_a(), opts).await.unwrap();
    assert!(!verdict.has_issue(codes::OFFER_INADEQUATE));
    assert_eq!(verdict.context.offer_verdict, None);
}

#[tokio::test]
async fn llm_issues_are_merged_after_rule_issues() {
    let mock = Arc::new(MockLlmClient::new(&[r#"Sure! {"issues": [
        {"code": "TONE", "severity": "nit", "message": "Opinion is hedged.", "evidence": "maybe"},
        {"severity": "CRITICAL", "message": "Framing repeats itself."},
        {"code": "EMPTY", "severity": "WARN", "message": "   "}
    ]} trailing"#]));
    let svc = service().with_llm(mock.clone());
    let opts = JudgeOptions {
        inputs: inputs("", ""),
        use_llm: true,
        ..Default::default()
    };
    let verdict = svc.evaluate(&scenario_a(), opts).await.unwrap();

    let n = verdict.issues.len();
    assert_eq!(verdict.issues[n - 2].code, "TONE");
    assert_eq!(verdict.issues[n - 2].severity, Severity::Nit);
    assert_eq!(verdict.issues[n - 2].evidence.as_deref(), Some("maybe"));
    assert_eq!(verdict.issues[n - 1].code, codes::LLM_AUDIT);
    assert_eq!(verdict.issues[n - 1].severity, Severity::Warn);
    assert!(!verdict.has_issue("EMPTY"));

    let meta = verdict.meta.expect("meta");
    assert!(meta.used_llm);
    assert_eq!(meta.model.as_deref(), Some("mock-model"));

    let requests = mock.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].temperature, 0.0);
    assert!(requests[0].json);
}

#[tokio::test]
async fn llm_failure_is_swallowed() {
    let opts = JudgeOptions {
        inputs: inputs("", ""),
        baseline_research: Some(full_research()),
        ..Default::default()
    };
    let baseline = service()
        .evaluate(&scenario_a(), opts.clone())
        .await
        .unwrap();

    for response in [&[][..], &["not json at all"][..], &[r#"{"verdict": "ok"}"#][..]] {
        let svc = service().with_llm(Arc::new(MockLlmClient::new(response)));
        let with_llm = JudgeOptions {
            use_llm: true,
            ..opts.clone()
        };
        let verdict = svc.evaluate(&scenario_a(), with_llm).await.unwrap();
        assert_eq!(verdict.issues, baseline.issues);
        assert_eq!(verdict.score, baseline.score);
        assert_eq!(verdict.pass, baseline.pass);
        let meta = verdict.meta.expect("meta");
        assert!(meta.used_llm);
        assert_eq!(meta.model, None);
    }
}

#[tokio::test]
async fn use_llm_without_client_counts_as_failed_attempt() {
    let opts = JudgeOptions {
        inputs: inputs("", ""),
        use_llm: true,
        ..Default::default()
    };
    let verdict = service().evaluate(&scenario_a(), opts).await.unwrap();
    assert_eq!(verdict.meta.map(|m| m.used_llm), Some(true));
}

#[test]
fn parser_accepts_bare_arrays_and_findings_key() {
    let issues = parse_audit_issues(r#"[{"message": "a"}, {"message": 42}]"#).unwrap();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[1].message, "42");

    let issues = parse_audit_issues(r#"{"findings": [{"code": "X", "message": "b"}]}"#).unwrap();
    assert_eq!(issues[0].code, "X");

    assert!(parse_audit_issues("no json here").is_err());
    assert!(parse_audit_issues(r#"{"issues": "none"}"#).is_err());
}

#[test]
fn prompt_carries_brief_narratives_and_checklist() {
    let mut narratives = NarrativeSet::default();
    narratives.set(Phase::Opinion, "Opinion body".into());
    let prompt = build_prompt_impl(&scenario_a(), &narratives);
    assert!(prompt.contains("Trip to Bali"));
    assert!(prompt.contains("<narrative phase=\"opinion\">\nOpinion body"));
    assert!(prompt.contains("### Narrative (export):"));
    for (code, _) in CHECKLIST {
        assert!(prompt.contains(code));
    }
}
