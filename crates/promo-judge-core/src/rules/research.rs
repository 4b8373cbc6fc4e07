use super::{codes, Findings, RuleInput};
use crate::model::{Issue, Phase, Severity};

pub const MIN_AUDIENCE_FACTS: usize = 3;
pub const MIN_CATEGORY_FACTS: usize = 3;
pub const MIN_RETAILER_FACTS: usize = 2;
pub const MIN_COMPETITOR_FACTS: usize = 3;
/// Prize-led work leans on competitor prize benchmarks, so it needs more.
pub const MIN_COMPETITOR_FACTS_PRIZE_LED: usize = 5;

struct DepthRule {
    code: &'static str,
    label: &'static str,
    have: usize,
    need: usize,
    severity: Severity,
    regenerate: &'static [Phase],
}

/// Check 5: research depth sanity.
pub(super) fn check_research_depth(input: &RuleInput<'_>, findings: &mut Findings) {
    let Some(pack) = input.research else {
        findings.push(Issue::warn(
            codes::RESEARCH_MISSING,
            "No research pack was available; audience, category and competitor claims are unsupported.",
        ));
        findings.recommend("Run research before the next regeneration so claims can cite facts.");
        return;
    };

    let competitor_need = if input.derived.prize_led {
        MIN_COMPETITOR_FACTS_PRIZE_LED
    } else {
        MIN_COMPETITOR_FACTS
    };
    const NARRATIVE: &[Phase] = &[Phase::Evaluation, Phase::Opinion];
    let rules = [
        DepthRule {
            code: codes::RESEARCH_AUDIENCE_THIN,
            label: "audience",
            have: pack.audience.len(),
            need: MIN_AUDIENCE_FACTS,
            severity: Severity::Warn,
            regenerate: NARRATIVE,
        },
        DepthRule {
            code: codes::RESEARCH_CATEGORY_THIN,
            label: "category",
            have: pack.category.len(),
            need: MIN_CATEGORY_FACTS,
            severity: Severity::Warn,
            regenerate: NARRATIVE,
        },
        DepthRule {
            code: codes::RESEARCH_RETAILERS_THIN,
            label: "retailer",
            have: pack.retailers.len(),
            need: MIN_RETAILER_FACTS,
            severity: Severity::Nit,
            regenerate: &[],
        },
        DepthRule {
            code: codes::RESEARCH_COMPETITORS_THIN,
            label: "competitor promotion",
            have: pack.competitors.len(),
            need: competitor_need,
            severity: Severity::Warn,
            regenerate: NARRATIVE,
        },
    ];

    for rule in rules.iter().filter(|r| r.have < r.need) {
        findings.push(
            Issue::new(
                rule.code,
                rule.severity,
                format!(
                    "Research has {} {} fact(s); at least {} expected.",
                    rule.have, rule.label, rule.need
                ),
            )
            .with_evidence(format!("{}={}/{}", rule.label, rule.have, rule.need)),
        );
        findings.regenerate(rule.regenerate);
    }
}
