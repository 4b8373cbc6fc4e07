use super::read_input;
use crate::cli::args::SignalsArgs;
use crate::exit_codes::SUCCESS;
use promo_judge_core::signals;

pub fn run(args: SignalsArgs) -> anyhow::Result<i32> {
    let text = read_input(&args.input)?.to_lowercase();
    let report = signals::report(&text);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(SUCCESS)
}
