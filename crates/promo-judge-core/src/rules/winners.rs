use super::{codes, Findings, RuleInput};
use crate::derived::MANY_WINNERS_THRESHOLD;
use crate::model::{Issue, Phase};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LEAD_WITH_WINNERS: Regex =
        Regex::new(r"(?i)\blead(?:s|ing)?\s+with\b[^.\n]{0,80}\bwinners\b").unwrap();
}

/// `1200` -> `1,200`.
pub(crate) fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// The literal count (plain or grouped) followed by at most two words and
/// then "winners".
fn number_near_winners(n: u64) -> Option<Regex> {
    let plain = n.to_string();
    let grouped = group_thousands(n);
    let pattern = format!(
        r"(?i)(?:^|[^\d,]){}\s+(?:\w+\s+){{0,2}}winners\b|(?:^|[^\d,]){}\s+(?:\w+\s+){{0,2}}winners\b",
        regex::escape(&grouped),
        regex::escape(&plain)
    );
    Regex::new(&pattern).ok()
}

/// Check 4: a broad winner count is a headline asset and must be surfaced.
pub(super) fn check_winners_surfaced(input: &RuleInput<'_>, findings: &mut Findings) {
    let Some(total) = input.derived.total_winners else {
        return;
    };
    if total < MANY_WINNERS_THRESHOLD {
        return;
    }
    let in_evaluation = number_near_winners(total)
        .is_some_and(|re| re.is_match(&input.narratives.evaluation));
    let in_opinion = LEAD_WITH_WINNERS.is_match(&input.narratives.opinion);
    if in_evaluation || in_opinion {
        return;
    }
    let grouped = group_thousands(total);
    findings.push(Issue::warn(
        codes::WINNERS_NOT_SURFACED,
        format!(
            "{} winners is a headline asset but neither evaluation nor opinion surfaces it.",
            grouped
        ),
    ));
    findings.recommend(format!(
        "Lead with the {} winners: breadth of winning is the strongest odds story.",
        grouped
    ));
    findings.regenerate(&[Phase::Evaluation, Phase::Opinion]);
}
