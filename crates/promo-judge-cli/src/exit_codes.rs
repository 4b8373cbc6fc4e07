//! Exit codes are part of the CLI contract.

pub const SUCCESS: i32 = 0;
/// The verdict did not pass.
pub const JUDGE_FAILED: i32 = 1;
/// Bad config, unreadable bundle, or the judge could not run.
pub const CONFIG_ERROR: i32 = 2;
