//! Text-heuristic signal detectors.
//!
//! Every detector is a pure function over text. Patterns live in ordered,
//! declarative tables compiled once; detectors only decide how matches
//! combine (short-circuit, threshold, additive points). Patterns are
//! case-insensitive, so callers may pass raw or pre-lowered text.

use crate::model::{CalendarFit, CampaignContext, NarrativeSet};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// Weak friction patterns needed before friction counts as major.
pub const WEAK_FRICTION_THRESHOLD: usize = 2;
/// Purchase quantity at or above which the trigger alone is major friction.
pub const FRICTION_QUANTITY_THRESHOLD: u64 = 3;
pub const SCORE_CEILING: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrictionTier {
    /// Any single match is major friction.
    Strong,
    /// Counts toward [`WEAK_FRICTION_THRESHOLD`].
    Accumulating,
}

pub struct SignalRule {
    pub id: &'static str,
    pub tier: FrictionTier,
    pub pattern: Regex,
}

pub struct ScoreRule {
    pub id: &'static str,
    pub points: u32,
    pub pattern: Regex,
}

fn friction(id: &'static str, tier: FrictionTier, pattern: &str) -> SignalRule {
    SignalRule {
        id,
        tier,
        pattern: Regex::new(&format!("(?i){}", pattern)).unwrap(),
    }
}

fn points(id: &'static str, points: u32, pattern: &str) -> ScoreRule {
    ScoreRule {
        id,
        points,
        pattern: Regex::new(&format!("(?i){}", pattern)).unwrap(),
    }
}

lazy_static! {
    pub static ref FRICTION_RULES: Vec<SignalRule> = vec![
        friction(
            "mail_in",
            FrictionTier::Strong,
            r"\bmail[- ]?in\b|\bpostal\s+(?:entry|entries|claim|submission|redemption)|\bby post\b|\bpost\s+(?:your|the|in)\s+(?:entry|claim|receipt|form)",
        ),
        friction(
            "app_download",
            FrictionTier::Strong,
            r"\b(?:must|need to|required to|have to|mandatory)\b[^.\n]{0,30}\b(?:download|install)\b[^.\n]{0,20}\bapp\b|\bapp[- ]only\b|\bmandatory app\b",
        ),
        friction(
            "manual_review",
            FrictionTier::Strong,
            r"\bmanual(?:ly)?\s+(?:review|verif|validat|approv|check)",
        ),
        friction(
            "long_survey",
            FrictionTier::Strong,
            r"\b(?:long|lengthy|detailed|extended)\s+survey|\b\d{2,}[- ]question\s+survey|\bcomplete\s+(?:a|the|our)\s+survey",
        ),
        friction(
            "registration",
            FrictionTier::Accumulating,
            r"\bregist(?:er|ers|ered|ering|ration)\b|\bcreate\s+(?:an|your)\s+account\b|\baccount creation\b|\bsign[- ]?up\b",
        ),
        friction(
            "receipt_upload",
            FrictionTier::Accumulating,
            r"\bupload(?:ing)?\s+(?:a\s+|your\s+|the\s+)?(?:photo of\s+(?:a\s+|your\s+|the\s+)?)?receipt|\breceipt upload|\bproof of purchase",
        ),
        friction(
            "code_entry",
            FrictionTier::Accumulating,
            r"\benter\s+(?:a\s+|the\s+|your\s+)?(?:unique\s+|on-pack\s+|promo\s+)?code\b|\bbar[- ]?code\b|\bunique code\b|\bpin code\b",
        ),
        friction(
            "multi_purchase",
            FrictionTier::Accumulating,
            r"\b(?:buy|purchase)\s+(?:any\s+)?(?:2|two|3|three|4|four|5|five|multiple)\b|\bmulti[- ]?(?:buy|purchase)\b",
        ),
        friction(
            "printed_form",
            FrictionTier::Accumulating,
            r"\bprint(?:ed)?\s+(?:out\s+)?(?:the\s+|a\s+)?(?:entry\s+|claim\s+)?form\b|\bpaper form\b",
        ),
    ];

    static ref TRIGGER_QUANTITY: Regex =
        Regex::new(r"(?i)\b(?:buy|purchase|collect|scan)\s+(?:any\s+|at least\s+)?(\d{1,2})\b").unwrap();

    static ref BADGE_VALUE: Regex = Regex::new(
        r"(?i)\b(?:jumpers?|tees?|t-?shirts?|caps?|beanies?|hoodies?|scarf|scarves|pins?|badges?|totes?|stickers?|merch|merchandise|collectibles?|collectables?|limited[- ]edition|drops?)\b",
    )
    .unwrap();

    static ref CALENDAR_STRONG: Regex = Regex::new(
        r"(?i)\b(?:christmas|xmas|easter|halloween|valentine'?s|mother'?s day|father'?s day|black friday|cyber monday|back[- ]to[- ]school|ramadan|eid|diwali|lunar new year|chinese new year|new year'?s (?:eve|day)|thanksgiving|boxing day|super bowl|world cup|grand final|olympics|st\.? patrick'?s|anzac day|australia day|fourth of july)\b",
    )
    .unwrap();

    static ref CALENDAR_WEAK: Regex = Regex::new(
        r"(?i)\b(?:summer|winter|spring|autumn|holidays?|seasonal|season|festive|long weekend|weekends?|rituals?|traditions?|end of (?:the )?(?:year|financial year))\b",
    )
    .unwrap();

    static ref UGC: Regex = Regex::new(
        r"(?i)#[a-z0-9_]{2,}|\bhashtags?\b|\bshare\s+(?:your|a|the)\b|\bpost\s+(?:a|your)\s+(?:photo|pic|video|selfie)|\btag\s+(?:us|a mate|your friends?)\b|\buser[- ]generated\b|\bugc\b|\bsocial\s+(?:share|sharing|post)|\binstagram\b|\btiktok\b",
    )
    .unwrap();

    pub static ref TALKABILITY_RULES: Vec<ScoreRule> = vec![
        points("money_cant_buy", 25, r"money[- ]can'?t[- ]buy|once[- ]in[- ]a[- ]lifetime|never[- ]been[- ]done|world[- ]first|first[- ]ever"),
        points("scarcity", 15, r"limited[- ]edition|\bexclusive\b|\bonly \d+\b|sold out|one[- ]off"),
        points("celebrity", 20, r"celebrit|influencer|ambassador|\bathlete|\bmusician|\bchef\b"),
        points("buzz", 20, r"\bviral|talk(?:ed)?[- ]about|talkab|\bbuzz|water[- ]?cooler|headline|\bstunt"),
        points("social", 10, r"\bshare\b|hashtag|tiktok|instagram|\bsocial\b"),
        points("surprise", 10, r"surprise|unexpected|quirky|cheeky|outrageous|bizarre"),
    ];

    pub static ref CULTURAL_SPARK_RULES: Vec<ScoreRule> = vec![
        points("music", 20, r"festival|concert|\bgigs?\b|\bmusic|\btour\b"),
        points("sport", 20, r"\bfooty\b|football|soccer|cricket|rugby|\bnba\b|\bnfl\b|grand final|world cup|olympic|\bsport"),
        points("internet_culture", 20, r"\bmemes?\b|\btrend|tiktok|\bviral|fandom|\bgaming\b|esports"),
        points("nostalgia", 15, r"nostalgi|\bretro\b|\biconic\b|heritage|throwback"),
        points("community", 10, r"\blocal\b|community|hometown|neighbou?rhood|\bfans\b"),
        points("fashion_art", 15, r"fashion|streetwear|\bart\b|\bartists?\b|\bcollab"),
    ];
}

/// Lower-cased corpus: brief JSON, mechanic/notes, then every narrative.
pub fn build_corpus(context: &CampaignContext, narratives: &NarrativeSet) -> String {
    let brief_json = serde_json::to_string(&context.brief).unwrap_or_default();
    let mut parts: Vec<&str> = vec![brief_json.as_str()];
    parts.extend(context.brief.mechanic.as_deref());
    parts.extend(context.brief.notes.as_deref());
    parts.extend(narratives.iter().map(|(_, text)| text));
    parts.join("\n").to_lowercase()
}

/// Largest purchase/collect quantity mentioned in `text`, if any.
pub fn max_trigger_quantity(text: &str) -> Option<u64> {
    TRIGGER_QUANTITY
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u64>().ok())
        .max()
}

/// Ids of all friction rules matching `text`, in table order.
pub fn matched_friction_rules(text: &str) -> Vec<&'static str> {
    FRICTION_RULES
        .iter()
        .filter(|rule| rule.pattern.is_match(text))
        .map(|rule| rule.id)
        .collect()
}

pub fn detect_major_friction(corpus: &str) -> bool {
    let mut weak_hits = 0usize;
    for rule in FRICTION_RULES.iter() {
        if !rule.pattern.is_match(corpus) {
            continue;
        }
        match rule.tier {
            FrictionTier::Strong => return true,
            FrictionTier::Accumulating => weak_hits += 1,
        }
    }
    if weak_hits >= WEAK_FRICTION_THRESHOLD {
        return true;
    }
    max_trigger_quantity(corpus).is_some_and(|n| n >= FRICTION_QUANTITY_THRESHOLD)
}

pub fn detect_badge_value(text: &str) -> bool {
    BADGE_VALUE.is_match(text)
}

pub fn detect_calendar_fit(text: &str) -> CalendarFit {
    if CALENDAR_STRONG.is_match(text) {
        CalendarFit::Strong
    } else if CALENDAR_WEAK.is_match(text) {
        CalendarFit::Weak
    } else {
        CalendarFit::None
    }
}

pub fn detect_ugc_signals(text: &str) -> bool {
    UGC.is_match(text)
}

/// Sum of points for each matching category, clamped to [`SCORE_CEILING`].
/// An ordinal heuristic, not a probability.
pub fn additive_score(rules: &[ScoreRule], text: &str) -> u32 {
    rules
        .iter()
        .filter(|rule| rule.pattern.is_match(text))
        .map(|rule| rule.points)
        .sum::<u32>()
        .min(SCORE_CEILING)
}

pub fn compute_talkability_score(text: &str) -> u32 {
    additive_score(&TALKABILITY_RULES, text)
}

pub fn compute_cultural_spark_score(text: &str) -> u32 {
    additive_score(&CULTURAL_SPARK_RULES, text)
}

/// Every detector over one text, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalReport {
    pub major_friction: bool,
    pub friction_rules: Vec<&'static str>,
    pub trigger_quantity: Option<u64>,
    pub badge_value: bool,
    pub calendar_fit: CalendarFit,
    pub ugc: bool,
    pub talkability_score: u32,
    pub cultural_spark_score: u32,
}

pub fn report(text: &str) -> SignalReport {
    SignalReport {
        major_friction: detect_major_friction(text),
        friction_rules: matched_friction_rules(text),
        trigger_quantity: max_trigger_quantity(text),
        badge_value: detect_badge_value(text),
        calendar_fit: detect_calendar_fit(text),
        ugc: detect_ugc_signals(text),
        talkability_score: compute_talkability_score(text),
        cultural_spark_score: compute_cultural_spark_score(text),
    }
}
