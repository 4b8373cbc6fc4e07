use super::{codes, Findings, RuleInput};
use crate::model::{Issue, NarrativeSet, Phase};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CASHBACK_LANGUAGE: Regex = Regex::new(
        r"(?i)\b(?:cash[- ]?back|rebates?|money back|refunds?|gift with purchase|gwp|free gift|guaranteed (?:reward|gift)|every (?:purchase|entrant|customer) (?:gets|receives|is rewarded))\b",
    )
    .unwrap();
    static ref EASE_LANGUAGE: Regex = Regex::new(
        r"(?i)\b(?:easy to enter|ease of entry|easy entry|effortless entry|frictionless|seamless|simple to enter|qr(?: code)?s?|ocr|user experience|ux|one[- ]click|quick entry|hassle[- ]free)\b",
    )
    .unwrap();
}

/// First match across all narratives, as `phase: "match"`.
fn first_match(re: &Regex, narratives: &NarrativeSet) -> Option<String> {
    narratives.iter().find_map(|(phase, text)| {
        re.find(text)
            .map(|m| format!("{}: \"{}\"", phase, m.as_str()))
    })
}

/// Check 1: prize-led promotions must not be sold as cashback/GWP.
pub(super) fn check_prize_not_cashback(input: &RuleInput<'_>, findings: &mut Findings) {
    if !input.derived.prize_led {
        return;
    }
    let Some(evidence) = first_match(&CASHBACK_LANGUAGE, input.narratives) else {
        return;
    };
    findings.push(
        Issue::blocker(
            codes::PRIZE_NOT_CASHBACK,
            "Prize-led promotion is described with cashback or gift-with-purchase language.",
        )
        .with_evidence(evidence),
    );
    findings.recommend(
        "Strip cashback, rebate and gift-with-purchase language; winners are drawn, not every buyer is rewarded.",
    );
    findings.regenerate(&[Phase::Evaluation]);
}

/// Check 2: ease-of-entry talk only earns its place when entry is hard.
pub(super) fn check_ease_chatter(input: &RuleInput<'_>, findings: &mut Findings) {
    if input.derived.major_friction {
        return;
    }
    let Some(evidence) = first_match(&EASE_LANGUAGE, input.narratives) else {
        return;
    };
    findings.push(
        Issue::warn(
            codes::EASE_CHATTER,
            "Narrative spends words on ease of entry / QR / OCR although entry friction is low.",
        )
        .with_evidence(evidence),
    );
    findings.recommend(
        "Drop ease-of-entry, QR and OCR talk; with low friction it is table stakes, not a selling point.",
    );
    findings.regenerate(&[Phase::Evaluation]);
}
