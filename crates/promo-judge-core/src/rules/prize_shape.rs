use super::{codes, Findings, RuleInput};
use crate::model::{Issue, Severity};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MAJORS_TO_THREE: Regex = Regex::new(
        r"(?i)\b(?:3|three)\s+(?:major|hero|grand|top)\s+prizes?\b|\b(?:raise|increase|lift|boost|expand|add|grow)\b[^.\n]{0,40}\b(?:majors?|hero prizes?|major prizes?|grand prizes?)\b[^.\n]{0,20}\b(?:to\s+)?(?:3|three)\b",
    )
    .unwrap();
    static ref SECOND_TIER_TO_INSTANTS: Regex = Regex::new(
        r"(?i)\b(?:convert|turn|switch|move|shift|make|change)\b[^.\n]{0,60}\binstant[- ]?win",
    )
    .unwrap();
    static ref REPLACE_HOOK: Regex = Regex::new(
        r"(?i)\b(?:replace|swap|change|rethink|refresh|new)\b[^.\n]{0,30}\bhook\b|\bhook\b[^.\n]{0,30}\b(?:replac|swap)",
    )
    .unwrap();
}

/// Check 3: prize-shape guidance for prize-led, non-assured promotions.
///
/// Fame-first campaigns get the same guidance as optional NITs since their
/// cultural value already carries the draw. The hook check is always a NIT.
pub(super) fn check_prize_shape(input: &RuleInput<'_>, findings: &mut Findings) {
    let d = input.derived;
    if !(d.prize_led && !d.assured) {
        return;
    }
    let optional = d.fame_first;
    let severity = if optional { Severity::Nit } else { Severity::Warn };
    let combined = format!(
        "{}\n{}",
        input.narratives.evaluation, input.narratives.opinion
    );

    if !MAJORS_TO_THREE.is_match(&combined) {
        let (code, recommendation) = if optional {
            (
                codes::PRIZE_SHAPE_MAJORS_OPTIONAL,
                "Optional: consider 3 major prizes; the fame-first idea already carries the draw.",
            )
        } else {
            (
                codes::PRIZE_SHAPE_MAJORS,
                "Raise the major prizes to 3 so the hero tier feels winnable.",
            )
        };
        let current = d
            .hero_prize_count_from_brief
            .map(|n| format!(" (brief has {})", n))
            .unwrap_or_default();
        findings.push(Issue::new(
            code,
            severity,
            format!(
                "Evaluation/opinion do not discuss raising the majors to 3{}.",
                current
            ),
        ));
        findings.recommend(recommendation);
    }

    if !SECOND_TIER_TO_INSTANTS.is_match(&combined) {
        let (code, recommendation) = if optional {
            (
                codes::PRIZE_SHAPE_INSTANTS_OPTIONAL,
                "Optional: second-tier prizes could become instant wins for extra in-moment reward.",
            )
        } else {
            (
                codes::PRIZE_SHAPE_INSTANTS,
                "Convert second-tier prizes into instant wins to lift perceived odds.",
            )
        };
        findings.push(Issue::new(
            code,
            severity,
            "Evaluation/opinion do not discuss converting second-tier prizes to instant wins.",
        ));
        findings.recommend(recommendation);
    }

    if !REPLACE_HOOK.is_match(&combined) {
        findings.push(Issue::nit(
            codes::HOOK_REPLACE,
            "Evaluation/opinion never test whether the hook itself should be replaced.",
        ));
        findings.recommend("Say whether the current hook should stay or be replaced.");
    }
}
