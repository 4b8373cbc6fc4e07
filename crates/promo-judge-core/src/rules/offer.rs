use super::{codes, Findings, RuleInput};
use crate::model::{Issue, OfferVerdict, Phase};

pub const INADEQUATE_VALUE_FLAG: &str = "INADEQUATE_VALUE";

const DEFAULT_FIX: &str =
    "Increase the value exchange before launch; the current offer will not motivate participation.";

/// Check 6: narratives cannot paper over an offer the scorer rejects.
pub(super) fn check_offer_adequacy(input: &RuleInput<'_>, findings: &mut Findings) {
    let Some(offer) = input.offer else {
        return;
    };
    let no_go = offer.verdict == OfferVerdict::NoGo;
    if !no_go && !offer.has_hard_flag(INADEQUATE_VALUE_FLAG) {
        return;
    }
    let reason = if no_go {
        "verdict NO-GO"
    } else {
        "hard flag INADEQUATE_VALUE"
    };
    let mut issue = Issue::blocker(
        codes::OFFER_INADEQUATE,
        format!("Offer scorer rates the offer inadequate ({}).", reason),
    );
    if !offer.hard_flags.is_empty() {
        issue = issue.with_evidence(offer.hard_flags.join(", "));
    }
    findings.push(issue);
    findings.recommend(offer.fix_text().unwrap_or(DEFAULT_FIX));
    findings.regenerate(&[Phase::Opinion]);
}
