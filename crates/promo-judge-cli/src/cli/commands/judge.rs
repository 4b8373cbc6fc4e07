use super::read_input;
use crate::cli::args::{JudgeArgs, LlmProvider, OutputFormat};
use crate::exit_codes::{CONFIG_ERROR, JUDGE_FAILED, SUCCESS};
use promo_judge_core::model::{
    CampaignContext, NarrativeInputs, OfferIqResult, ResearchLevel, ResearchPack,
};
use promo_judge_core::providers::llm::fake::FakeClient;
use promo_judge_core::providers::llm::openai::OpenAIClient;
use promo_judge_core::providers::llm::LlmClient;
use promo_judge_core::providers::memory::StaticNarrativeStore;
use promo_judge_core::{load_config, report, JudgeConfig, JudgeOptions, JudgeService};
use serde::Deserialize;
use std::sync::Arc;

/// Everything one judge run needs, as a single JSON document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeBundle {
    pub context: CampaignContext,
    #[serde(default)]
    pub inputs: NarrativeInputs,
    #[serde(default)]
    pub research: Option<ResearchPack>,
    #[serde(default, alias = "offerIQ")]
    pub offer_iq: Option<OfferIqResult>,
    #[serde(default)]
    pub research_level: Option<ResearchLevel>,
}

pub async fn run(args: JudgeArgs) -> anyhow::Result<i32> {
    let config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("config error: {}", e);
                return Ok(CONFIG_ERROR);
            }
        },
        None => JudgeConfig::from_env(),
    };

    let bundle: JudgeBundle = match read_input(&args.bundle)
        .and_then(|raw| serde_json::from_str(&raw).map_err(anyhow::Error::from))
    {
        Ok(bundle) => bundle,
        Err(e) => {
            eprintln!("invalid bundle {}: {:#}", args.bundle.display(), e);
            return Ok(CONFIG_ERROR);
        }
    };

    let mut svc = JudgeService::new(config.clone(), Arc::new(StaticNarrativeStore::new()));
    if args.llm {
        match build_llm_client(args.llm_provider, &config) {
            Ok(client) => svc = svc.with_llm(client),
            // The audit still counts as attempted and failed.
            Err(e) => tracing::warn!("LLM audit unavailable: {:#}", e),
        }
    }

    let opts = JudgeOptions {
        research_level: bundle.research_level,
        baseline_research: bundle.research,
        inputs: bundle.inputs,
        use_llm: args.llm,
        offer_iq: bundle.offer_iq,
    };
    let verdict = match svc.evaluate(&bundle.context, opts).await {
        Ok(v) => v,
        Err(e) => {
            eprintln!("judge error: {:#}", e);
            return Ok(CONFIG_ERROR);
        }
    };

    match args.format {
        OutputFormat::Text => print!("{}", report::render_console(&verdict)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&verdict)?),
    }
    if let Some(out) = &args.out {
        report::write_json(&verdict, out)?;
        tracing::info!("wrote verdict to {}", out.display());
    }

    Ok(if verdict.pass { SUCCESS } else { JUDGE_FAILED })
}

fn build_llm_client(
    provider: LlmProvider,
    config: &JudgeConfig,
) -> anyhow::Result<Arc<dyn LlmClient>> {
    Ok(match provider {
        LlmProvider::Openai => Arc::new(OpenAIClient::from_env()?),
        LlmProvider::Fake => Arc::new(FakeClient::new(config.llm.model.clone())),
    })
}
