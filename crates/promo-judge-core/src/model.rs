use crate::coerce;
use crate::derived::DerivedFlags;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// --- Inputs ---

/// Normalized campaign context handed over by the context provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignContext {
    #[serde(alias = "id", default, deserialize_with = "coerce::text_or_empty")]
    pub campaign_id: String,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub market: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub category: Option<String>,
    #[serde(default)]
    pub brief: Brief,
}

impl CampaignContext {
    pub fn new(campaign_id: impl Into<String>, brief: Brief) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            market: None,
            category: None,
            brief,
        }
    }

    pub fn market(&self) -> Option<&str> {
        self.market.as_deref().or(self.brief.market.as_deref())
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().or(self.brief.category.as_deref())
    }
}

/// Denormalized campaign brief.
///
/// Deserialization never fails on field content: every known field is read
/// through a named coercion from [`crate::coerce`], trying each alias in turn
/// and keeping the first value that coerces. Unknown keys are preserved in
/// `extra` so they still reach the text corpus. A non-object brief (`null`,
/// a string) reads as an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct Brief {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_of_promotion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assured_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cashback_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gwp_item: Option<String>,
    /// Free text cap (`"5,000 units"`, `"uncapped"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gwp_cap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gwp_capped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_prize: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_prize_count: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub runner_ups: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_winners: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mechanic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub retailers: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

const TYPE_KEYS: &[&str] = &["typeOfPromotion", "promotionType", "promoType", "type"];
const ASSURED_KEYS: &[&str] = &["assuredValue", "assured", "isAssured"];
const CASHBACK_KEYS: &[&str] = &["cashbackAmount", "cashback", "rebateAmount"];
const GWP_ITEM_KEYS: &[&str] = &["gwpItem", "gwp", "giftWithPurchase"];
const GWP_CAP_KEYS: &[&str] = &["gwpCap", "gwpLimit", "gwpQuantity"];
const GWP_CAPPED_KEYS: &[&str] = &["gwpCapped", "gwpIsCapped"];
const HERO_KEYS: &[&str] = &["heroPrize", "majorPrize", "hero"];
const HERO_COUNT_KEYS: &[&str] = &["heroPrizeCount", "majorPrizeCount", "numberOfMajors"];
const RUNNER_UP_KEYS: &[&str] = &["runnerUps", "runnerUpPrizes", "secondaryPrizes"];
/// Aliases for the total winner count, in resolution order.
pub const TOTAL_WINNER_KEYS: &[&str] = &[
    "totalWinners",
    "total_winners",
    "winners",
    "winnerCount",
    "numberOfWinners",
];
const MECHANIC_KEYS: &[&str] = &["mechanic", "entryMechanic", "mechanics"];
const NOTES_KEYS: &[&str] = &["notes", "briefNotes", "additionalNotes"];
const START_KEYS: &[&str] = &["startDate", "start_date", "start"];
const END_KEYS: &[&str] = &["endDate", "end_date", "end"];
const MARKET_KEYS: &[&str] = &["market", "country"];
const CATEGORY_KEYS: &[&str] = &["category", "productCategory"];
const RETAILER_KEYS: &[&str] = &["retailers", "channels"];

fn first_of<T>(
    raw: &Map<String, Value>,
    keys: &[&str],
    coerce_fn: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    keys.iter().filter_map(|k| raw.get(*k)).find_map(coerce_fn)
}

fn first_list(raw: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .filter_map(|k| raw.get(*k))
        .map(coerce::list_from_value)
        .find(|list| !list.is_empty())
        .unwrap_or_default()
}

impl From<Value> for Brief {
    fn from(raw: Value) -> Self {
        match raw {
            Value::Object(map) => map.into(),
            _ => Self::default(),
        }
    }
}

impl From<Map<String, Value>> for Brief {
    fn from(raw: Map<String, Value>) -> Self {
        let known: Vec<&str> = [
            TYPE_KEYS,
            ASSURED_KEYS,
            CASHBACK_KEYS,
            GWP_ITEM_KEYS,
            GWP_CAP_KEYS,
            GWP_CAPPED_KEYS,
            HERO_KEYS,
            HERO_COUNT_KEYS,
            RUNNER_UP_KEYS,
            TOTAL_WINNER_KEYS,
            MECHANIC_KEYS,
            NOTES_KEYS,
            START_KEYS,
            END_KEYS,
            MARKET_KEYS,
            CATEGORY_KEYS,
            RETAILER_KEYS,
        ]
        .concat();
        let extra = raw
            .iter()
            .filter(|(k, _)| !known.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            type_of_promotion: first_of(&raw, TYPE_KEYS, coerce::text_from_value),
            assured_value: first_of(&raw, ASSURED_KEYS, coerce::boolish_from_value),
            cashback_amount: first_of(&raw, CASHBACK_KEYS, coerce::number_from_value),
            gwp_item: first_of(&raw, GWP_ITEM_KEYS, coerce::text_from_value),
            gwp_cap: first_of(&raw, GWP_CAP_KEYS, coerce::text_from_value),
            gwp_capped: first_of(&raw, GWP_CAPPED_KEYS, coerce::boolish_from_value),
            hero_prize: first_of(&raw, HERO_KEYS, coerce::text_from_value),
            hero_prize_count: first_of(&raw, HERO_COUNT_KEYS, coerce::count_from_value),
            runner_ups: first_list(&raw, RUNNER_UP_KEYS),
            total_winners: first_of(&raw, TOTAL_WINNER_KEYS, coerce::count_from_value),
            mechanic: first_of(&raw, MECHANIC_KEYS, coerce::text_from_value),
            notes: first_of(&raw, NOTES_KEYS, coerce::text_from_value),
            start_date: first_of(&raw, START_KEYS, coerce::text_from_value),
            end_date: first_of(&raw, END_KEYS, coerce::text_from_value),
            market: first_of(&raw, MARKET_KEYS, coerce::text_from_value),
            category: first_of(&raw, CATEGORY_KEYS, coerce::text_from_value),
            retailers: first_list(&raw, RETAILER_KEYS),
            extra,
        }
    }
}

impl Brief {
    pub fn promotion_type(&self) -> PromotionType {
        self.type_of_promotion
            .as_deref()
            .map(PromotionType::parse)
            .unwrap_or(PromotionType::Unknown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionType {
    Prize,
    InstantWin,
    Cashback,
    Gwp,
    Other,
    Unknown,
}

impl PromotionType {
    pub fn parse(raw: &str) -> Self {
        let norm: String = raw
            .trim()
            .to_ascii_uppercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();
        match norm.as_str() {
            "" => Self::Unknown,
            "PRIZE" | "PRIZE_DRAW" | "DRAW" | "SWEEPSTAKES" | "COMPETITION" | "CONTEST" => {
                Self::Prize
            }
            "INSTANT_WIN" | "INSTANT_WINS" | "INSTANTWIN" => Self::InstantWin,
            "CASHBACK" | "CASH_BACK" | "REBATE" | "MONEY_BACK" => Self::Cashback,
            "GWP" | "GIFT_WITH_PURCHASE" | "FREE_GIFT" => Self::Gwp,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prize => "PRIZE",
            Self::InstantWin => "INSTANT_WIN",
            Self::Cashback => "CASHBACK",
            Self::Gwp => "GWP",
            Self::Other => "OTHER",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Odds-based mechanics where a discrete prize is the draw.
    pub fn is_prize_based(&self) -> bool {
        matches!(self, Self::Prize | Self::InstantWin)
    }
}

impl fmt::Display for PromotionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Narratives ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Framing,
    Evaluation,
    Opinion,
    Strategist,
    Export,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Framing,
        Phase::Evaluation,
        Phase::Opinion,
        Phase::Strategist,
        Phase::Export,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Framing => "framing",
            Self::Evaluation => "evaluation",
            Self::Opinion => "opinion",
            Self::Strategist => "strategist",
            Self::Export => "export",
        }
    }

    /// Narrative store type names: primary first, then the legacy alias.
    pub fn store_aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Framing => &["framing", "framing_narrative"],
            Self::Evaluation => &["evaluation", "evaluate"],
            Self::Opinion => &["opinion", "synthesis"],
            Self::Strategist => &["strategist", "strategy"],
            Self::Export => &["export_summary", "export"],
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable text snapshot per phase, fetched once per invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeSet {
    pub framing: String,
    pub evaluation: String,
    pub opinion: String,
    pub strategist: String,
    pub export_summary: String,
}

impl NarrativeSet {
    pub fn get(&self, phase: Phase) -> &str {
        match phase {
            Phase::Framing => &self.framing,
            Phase::Evaluation => &self.evaluation,
            Phase::Opinion => &self.opinion,
            Phase::Strategist => &self.strategist,
            Phase::Export => &self.export_summary,
        }
    }

    pub fn set(&mut self, phase: Phase, text: String) {
        match phase {
            Phase::Framing => self.framing = text,
            Phase::Evaluation => self.evaluation = text,
            Phase::Opinion => self.opinion = text,
            Phase::Strategist => self.strategist = text,
            Phase::Export => self.export_summary = text,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Phase, &str)> {
        Phase::ALL.into_iter().map(move |p| (p, self.get(p)))
    }
}

/// Caller-supplied narrative texts; `None` means "fetch from the store".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeInputs {
    #[serde(default)]
    pub framing: Option<String>,
    #[serde(default)]
    pub evaluation: Option<String>,
    #[serde(default)]
    pub opinion: Option<String>,
    #[serde(default)]
    pub strategist: Option<String>,
    #[serde(default)]
    pub export_summary: Option<String>,
}

impl NarrativeInputs {
    pub fn get(&self, phase: Phase) -> Option<&str> {
        match phase {
            Phase::Framing => self.framing.as_deref(),
            Phase::Evaluation => self.evaluation.as_deref(),
            Phase::Opinion => self.opinion.as_deref(),
            Phase::Strategist => self.strategist.as_deref(),
            Phase::Export => self.export_summary.as_deref(),
        }
    }
}

// --- Research ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResearchLevel {
    #[default]
    Lite,
    Deep,
    Max,
}

impl ResearchLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lite => "LITE",
            Self::Deep => "DEEP",
            Self::Max => "MAX",
        }
    }
}

impl FromStr for ResearchLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LITE" => Ok(Self::Lite),
            "DEEP" => Ok(Self::Deep),
            "MAX" => Ok(Self::Max),
            other => Err(format!(
                "unknown research level '{}' (expected LITE, DEEP or MAX)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchFact {
    #[serde(alias = "text", alias = "fact")]
    pub claim: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Structured research facts for a market/category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchPack {
    #[serde(default)]
    pub audience: Vec<ResearchFact>,
    #[serde(default)]
    pub category: Vec<ResearchFact>,
    #[serde(default)]
    pub retailers: Vec<ResearchFact>,
    #[serde(default, alias = "competitorPromos")]
    pub competitors: Vec<ResearchFact>,
}

// --- Offer assessment ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferVerdict {
    #[serde(rename = "GO")]
    Go,
    #[serde(rename = "CONDITIONAL")]
    Conditional,
    #[serde(rename = "NO-GO", alias = "NO_GO", alias = "NOGO")]
    NoGo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferIqResult {
    pub verdict: OfferVerdict,
    #[serde(default, deserialize_with = "coerce::string_list")]
    pub hard_flags: Vec<String>,
    #[serde(default)]
    pub lenses: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
}

impl OfferIqResult {
    pub fn has_hard_flag(&self, flag: &str) -> bool {
        self.hard_flags.iter().any(|f| f.eq_ignore_ascii_case(flag))
    }

    /// Scorer-provided remedy, from the top-level field or the adequacy lens.
    pub fn fix_text(&self) -> Option<&str> {
        self.suggested_fix
            .as_deref()
            .or_else(|| {
                self.lenses
                    .pointer("/adequacy/fix")
                    .and_then(Value::as_str)
            })
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

// --- Output ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Blocker,
    Warn,
    Nit,
}

impl Severity {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BLOCKER" => Some(Self::Blocker),
            "WARN" => Some(Self::Warn),
            "NIT" => Some(Self::Nit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blocker => "BLOCKER",
            Self::Warn => "WARN",
            Self::Nit => "NIT",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

impl Issue {
    pub fn new(code: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            severity,
            message: message.into(),
            evidence: None,
        }
    }

    pub fn blocker(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Blocker, message)
    }

    pub fn warn(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Warn, message)
    }

    pub fn nit(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Nit, message)
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CalendarFit {
    Strong,
    Weak,
    #[default]
    None,
}

impl CalendarFit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "STRONG",
            Self::Weak => "WEAK",
            Self::None => "NONE",
        }
    }
}

/// Derived diagnostics for UI/analytics, independent of pass/fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictContext {
    pub campaign_id: String,
    pub promotion_type: String,
    #[serde(flatten)]
    pub derived: DerivedFlags,
    pub research_level: ResearchLevel,
    pub research_present: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_verdict: Option<OfferVerdict>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictMeta {
    #[serde(rename = "usedLLM")]
    pub used_llm: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// The sole output of a judge invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeVerdict {
    pub pass: bool,
    pub score: u32,
    pub issues: Vec<Issue>,
    pub flags: Vec<String>,
    pub recommendations: Vec<String>,
    pub requires_regeneration: Vec<Phase>,
    pub context: VerdictContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<VerdictMeta>,
}

impl JudgeVerdict {
    pub fn has_issue(&self, code: &str) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}
