//! Ordered rule checklist.
//!
//! Each check reads the up-front [`DerivedFlags`] snapshot plus narrative
//! text and appends to a shared [`Findings`]. Order is fixed so the
//! `issues` array is stable across runs.

mod narrative;
mod offer;
mod prize_shape;
mod research;
mod winners;

use crate::derived::DerivedFlags;
use crate::model::{Brief, Issue, NarrativeSet, OfferIqResult, Phase, ResearchPack};
use std::collections::{BTreeSet, HashSet};

pub use research::{
    MIN_AUDIENCE_FACTS, MIN_CATEGORY_FACTS, MIN_COMPETITOR_FACTS, MIN_COMPETITOR_FACTS_PRIZE_LED,
    MIN_RETAILER_FACTS,
};

pub mod codes {
    pub const PRIZE_NOT_CASHBACK: &str = "PRIZE_NOT_CASHBACK";
    pub const EASE_CHATTER: &str = "EASE_CHATTER";
    pub const PRIZE_SHAPE_MAJORS: &str = "PRIZE_SHAPE_MAJORS";
    pub const PRIZE_SHAPE_MAJORS_OPTIONAL: &str = "PRIZE_SHAPE_MAJORS_OPTIONAL";
    pub const PRIZE_SHAPE_INSTANTS: &str = "PRIZE_SHAPE_INSTANTS";
    pub const PRIZE_SHAPE_INSTANTS_OPTIONAL: &str = "PRIZE_SHAPE_INSTANTS_OPTIONAL";
    pub const HOOK_REPLACE: &str = "HOOK_REPLACE";
    pub const WINNERS_NOT_SURFACED: &str = "WINNERS_NOT_SURFACED";
    pub const RESEARCH_MISSING: &str = "RESEARCH_MISSING";
    pub const RESEARCH_AUDIENCE_THIN: &str = "RESEARCH_AUDIENCE_THIN";
    pub const RESEARCH_CATEGORY_THIN: &str = "RESEARCH_CATEGORY_THIN";
    pub const RESEARCH_RETAILERS_THIN: &str = "RESEARCH_RETAILERS_THIN";
    pub const RESEARCH_COMPETITORS_THIN: &str = "RESEARCH_COMPETITORS_THIN";
    pub const OFFER_INADEQUATE: &str = "OFFER_INADEQUATE";
    /// Default code for auditor issues that arrive without one.
    pub const LLM_AUDIT: &str = "LLM_AUDIT";
}

/// Read-only view every check receives.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub brief: &'a Brief,
    pub narratives: &'a NarrativeSet,
    pub derived: &'a DerivedFlags,
    pub research: Option<&'a ResearchPack>,
    pub offer: Option<&'a OfferIqResult>,
}

/// Accumulated issues, recommendations (insertion-ordered set) and phases
/// to regenerate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Findings {
    pub issues: Vec<Issue>,
    recommendations: Vec<String>,
    seen_recommendations: HashSet<String>,
    pub requires_regeneration: BTreeSet<Phase>,
}

impl Findings {
    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn recommend(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.seen_recommendations.insert(text.clone()) {
            self.recommendations.push(text);
        }
    }

    pub fn regenerate(&mut self, phases: &[Phase]) {
        self.requires_regeneration.extend(phases.iter().copied());
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }
}

pub type Check = fn(&RuleInput<'_>, &mut Findings);

/// The checklist, in execution order.
pub const CHECKS: &[(&str, Check)] = &[
    ("prize_vs_cashback", narrative::check_prize_not_cashback),
    ("ease_chatter", narrative::check_ease_chatter),
    ("prize_shape", prize_shape::check_prize_shape),
    ("winners_surfaced", winners::check_winners_surfaced),
    ("research_depth", research::check_research_depth),
    ("offer_adequacy", offer::check_offer_adequacy),
];

pub fn run_checks(input: &RuleInput<'_>) -> Findings {
    let mut findings = Findings::default();
    for (name, check) in CHECKS {
        let before = findings.issues.len();
        check(input, &mut findings);
        tracing::debug!(
            check = *name,
            new_issues = findings.issues.len() - before,
            "rule check complete"
        );
    }
    findings
}
