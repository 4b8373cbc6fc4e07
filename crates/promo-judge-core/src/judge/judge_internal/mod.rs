//! Judge internals.
//!
//! - run.rs: evaluate flow, collaborator calls in fixed order
//! - prompt.rs: auditor prompt and checklist
//! - client.rs: auditor call and defensive response parse

pub(crate) mod client;
pub(crate) mod prompt;
pub(crate) mod run;

#[cfg(test)]
mod tests;
