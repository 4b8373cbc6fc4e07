//! Packages findings, score and diagnostics into the final [`JudgeVerdict`].

use crate::derived::DerivedFlags;
use crate::model::{JudgeVerdict, VerdictContext, VerdictMeta};
use crate::rules::Findings;
use crate::score::ScoringConfig;

/// Fixed-shape flag tokens, one per boolean/enum, always in this order.
pub fn flags(promotion_type: &str, d: &DerivedFlags) -> Vec<String> {
    fn pick(on: bool, yes: &str, no: &str) -> String {
        (if on { yes } else { no }).to_string()
    }
    vec![
        format!("type:{}", promotion_type),
        pick(d.assured, "assured", "non-assured"),
        pick(d.prize_led, "prize-led", "not-prize-led"),
        pick(d.major_friction, "major-friction", "low-friction"),
        pick(d.many_winners_detected, "many-winners", "few-winners"),
        pick(d.fame_first, "fame-first", "not-fame-first"),
        pick(d.badge_value_detected, "badge-value", "no-badge-value"),
        pick(d.social_ugc_signals, "ugc", "no-ugc"),
        format!("calendar:{}", d.calendar_fit.as_str()),
    ]
}

pub fn build_verdict(
    findings: Findings,
    context: VerdictContext,
    scoring: &ScoringConfig,
    meta: Option<VerdictMeta>,
) -> JudgeVerdict {
    let score = scoring.score(&findings.issues);
    let pass = scoring.is_pass(&findings.issues, score);
    let recommendations = findings
        .recommendations()
        .iter()
        .take(scoring.max_recommendations)
        .cloned()
        .collect();
    let flags = flags(&context.promotion_type, &context.derived);

    JudgeVerdict {
        pass,
        score,
        issues: findings.issues,
        flags,
        recommendations,
        requires_regeneration: findings.requires_regeneration.into_iter().collect(),
        context,
        meta,
    }
}
