//! Flags derived once per invocation, before any rule check runs.
//!
//! Checks read this snapshot only, which keeps them order-independent in
//! data dependency even though they execute sequentially.

use crate::coerce;
use crate::model::{Brief, CalendarFit, PromotionType};
use crate::signals;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const MANY_WINNERS_THRESHOLD: u64 = 50;
pub const FAME_SCORE_THRESHOLD: u32 = 60;

lazy_static! {
    static ref WINNERS_IN_TEXT: Regex =
        Regex::new(r"(?i)(\d{1,3}(?:,\d{3})+|\d+)\s+(?:\w+\s+){0,2}winners\b").unwrap();
    static ref UNCAPPED: Regex =
        Regex::new(r"(?i)\b(?:uncapped|unlimited|no cap|not capped|while stocks last)\b").unwrap();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFlags {
    pub assured: bool,
    pub prize_led: bool,
    pub total_winners: Option<u64>,
    pub hero_prize_count_from_brief: Option<u64>,
    pub major_friction: bool,
    pub many_winners_detected: bool,
    pub badge_value_detected: bool,
    #[serde(rename = "socialUGCSignals")]
    pub social_ugc_signals: bool,
    pub calendar_fit: CalendarFit,
    pub talkability_score: u32,
    pub cultural_spark_score: u32,
    pub fame_first: bool,
}

impl DerivedFlags {
    pub fn derive(brief: &Brief, corpus: &str) -> Self {
        let promotion_type = brief.promotion_type();
        let assured = is_assured(brief, promotion_type);
        let prize_led = !assured
            && (promotion_type.is_prize_based()
                || brief.hero_prize.is_some()
                || !brief.runner_ups.is_empty());

        let total_winners = resolve_total_winners(brief);
        let hero_prize_count_from_brief = brief
            .hero_prize_count
            .or_else(|| brief.hero_prize.as_ref().map(|_| 1));

        let major_friction = signals::detect_major_friction(corpus);
        let many_winners_detected = total_winners.is_some_and(|n| n >= MANY_WINNERS_THRESHOLD);
        let badge_value_detected = signals::detect_badge_value(corpus);
        let talkability_score = signals::compute_talkability_score(corpus);
        let cultural_spark_score = signals::compute_cultural_spark_score(corpus);

        let fame_first = (talkability_score >= FAME_SCORE_THRESHOLD
            || cultural_spark_score >= FAME_SCORE_THRESHOLD)
            && (many_winners_detected || badge_value_detected)
            && !major_friction;

        Self {
            assured,
            prize_led,
            total_winners,
            hero_prize_count_from_brief,
            major_friction,
            many_winners_detected,
            badge_value_detected,
            social_ugc_signals: signals::detect_ugc_signals(corpus),
            calendar_fit: signals::detect_calendar_fit(corpus),
            talkability_score,
            cultural_spark_score,
            fame_first,
        }
    }
}

/// Cashback, an explicit assured flag, or a GWP with no (or an unspecified) cap.
fn is_assured(brief: &Brief, promotion_type: PromotionType) -> bool {
    if brief.assured_value == Some(true) {
        return true;
    }
    if promotion_type == PromotionType::Cashback || brief.cashback_amount.is_some_and(|a| a > 0.0)
    {
        return true;
    }
    let is_gwp = promotion_type == PromotionType::Gwp || brief.gwp_item.is_some();
    is_gwp && !gwp_is_capped(brief)
}

fn gwp_is_capped(brief: &Brief) -> bool {
    if let Some(capped) = brief.gwp_capped {
        return capped;
    }
    match brief.gwp_cap.as_deref() {
        None => false,
        Some(cap) if UNCAPPED.is_match(cap) => false,
        Some(cap) => coerce::number_from_text(cap).is_some_and(|n| n > 0.0),
    }
}

/// Brief count field (first valid alias), else the first `<n> winners`
/// mention in the brief's free-text fields.
pub fn resolve_total_winners(brief: &Brief) -> Option<u64> {
    if let Some(n) = brief.total_winners {
        return Some(n);
    }
    let runner_ups = brief.runner_ups.join("; ");
    let texts = brief
        .hero_prize
        .iter()
        .chain(std::iter::once(&runner_ups))
        .chain(brief.mechanic.iter())
        .chain(brief.notes.iter());
    texts
        .filter_map(|text| WINNERS_IN_TEXT.captures(text))
        .find_map(|caps| coerce::number_from_text(caps.get(1)?.as_str()))
        .map(|n| n as u64)
}
