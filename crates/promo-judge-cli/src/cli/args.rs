use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "promo-judge",
    version,
    about = "Audit generated promotional campaign narratives against the brief"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Judge a bundle of campaign context and narratives
    Judge(JudgeArgs),
    /// Print signal detector output for a text (JSON)
    Signals(SignalsArgs),
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct JudgeArgs {
    /// JSON bundle: { context, inputs?, research?, offerIq?, researchLevel? } ("-" for stdin)
    #[arg(long)]
    pub bundle: PathBuf,

    /// YAML judge config; defaults plus environment overrides when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Run the generative audit pass
    #[arg(long)]
    pub llm: bool,

    #[arg(long, value_enum, default_value_t = LlmProvider::Openai, env = "PROMO_JUDGE_LLM_PROVIDER")]
    pub llm_provider: LlmProvider,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the verdict as JSON to this file
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SignalsArgs {
    /// Text file to scan ("-" for stdin)
    pub input: PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Openai,
    Fake,
}
