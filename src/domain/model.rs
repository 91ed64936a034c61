use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// One financing round as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundingRound {
    pub pre_money_valuation: f64,
    pub investment_amount: f64,
    /// 1-based position in the round sequence.
    pub sequence_index: usize,
}

impl FundingRound {
    pub fn new(sequence_index: usize, pre_money_valuation: f64, investment_amount: f64) -> Self {
        Self {
            pre_money_valuation,
            investment_amount,
            sequence_index,
        }
    }

    /// Class introduced by this round.
    pub fn class(&self) -> OwnershipClass {
        OwnershipClass::Investor(self.sequence_index)
    }
}

/// Builds rounds from `(pre_money, investment)` pairs, assigning sequence indices in order.
pub fn rounds_from_pairs(pairs: &[(f64, f64)]) -> Vec<FundingRound> {
    pairs
        .iter()
        .enumerate()
        .map(|(i, &(pre_money, investment))| FundingRound::new(i + 1, pre_money, investment))
        .collect()
}

/// Participant bucket. Investor classes are keyed by the 1-based index of the round that
/// introduced them, so labels are derived rather than looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OwnershipClass {
    Founder,
    Investor(usize),
}

const NAMED_CLASSES: [&str; 5] = ["Seed", "Series A", "Series B", "Series C", "Series D"];

impl OwnershipClass {
    pub fn label(&self) -> String {
        match self {
            Self::Founder => "Founder".to_string(),
            Self::Investor(index) => match NAMED_CLASSES.get(index.wrapping_sub(1)) {
                Some(name) => (*name).to_string(),
                None => format!("Series {}", index),
            },
        }
    }

    pub fn is_investor(&self) -> bool {
        matches!(self, Self::Investor(_))
    }
}

impl fmt::Display for OwnershipClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for OwnershipClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllocationPolicy {
    Dilution,
    ProRata,
}

impl AllocationPolicy {
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Dilution => "dilution",
            Self::ProRata => "pro-rata",
        }
    }
}

impl fmt::Display for AllocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dilution => f.write_str("Dilution"),
            Self::ProRata => f.write_str("Pro-Rata"),
        }
    }
}

/// Running state of the allocation fold.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationState {
    pub total_shares_outstanding: f64,
    pub holdings: BTreeMap<OwnershipClass, f64>,
}

impl AllocationState {
    /// Formation: the founder holds every share.
    pub fn formation(founder_shares: u64) -> Self {
        let shares = founder_shares as f64;
        let mut holdings = BTreeMap::new();
        holdings.insert(OwnershipClass::Founder, shares);
        Self {
            total_shares_outstanding: shares,
            holdings,
        }
    }

    pub fn shares_held(&self, class: OwnershipClass) -> f64 {
        self.holdings.get(&class).copied().unwrap_or(0.0)
    }
}

/// What happened to the share count in one transition; the builder pairs it with the
/// resulting state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundPricing {
    pub pre_round_shares: f64,
    pub post_money: f64,
    pub price_per_share: f64,
    pub new_shares: f64,
}

/// State after a round, plus how the round was priced.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationSnapshot {
    pub round: Option<FundingRound>,
    pub pricing: RoundPricing,
    pub state: AllocationState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassPosition {
    pub class: OwnershipClass,
    pub shares: f64,
    pub ownership_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapTableRow {
    pub label: String,
    pub pre_money: f64,
    pub investment: f64,
    pub post_money: f64,
    pub pre_round_shares: f64,
    pub price_per_share: f64,
    pub new_shares: f64,
    pub display_price_per_share: f64,
    pub display_new_shares: f64,
    pub total_shares: f64,
    pub positions: Vec<ClassPosition>,
}

impl CapTableRow {
    pub fn position(&self, class: OwnershipClass) -> Option<&ClassPosition> {
        self.positions.iter().find(|p| p.class == class)
    }

    /// Ownership percentage of `class`, 0 when the class does not exist yet.
    pub fn ownership_pct(&self, class: OwnershipClass) -> f64 {
        self.position(class).map(|p| p.ownership_pct).unwrap_or(0.0)
    }

    pub fn shares_of(&self, class: OwnershipClass) -> f64 {
        self.position(class).map(|p| p.shares).unwrap_or(0.0)
    }

    pub fn ownership_total(&self) -> f64 {
        self.positions.iter().map(|p| p.ownership_pct).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub round: String,
    pub class: OwnershipClass,
    pub dilution_pct: f64,
    pub pro_rata_pct: f64,
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioComparison {
    pub rows: Vec<ComparisonRow>,
    pub founder_dilution_saved: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestorRetention {
    pub class: OwnershipClass,
    pub entry_pct: f64,
    pub final_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSummary {
    pub policy: AllocationPolicy,
    pub final_post_money: f64,
    pub total_shares: f64,
    pub founder_pct: f64,
    pub founder_dilution: f64,
    pub investors: Vec<InvestorRetention>,
}

/// Validated input to one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioInput {
    pub name: String,
    pub founder_shares: u64,
    pub rounds: Vec<FundingRound>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolicyRun {
    pub policy: AllocationPolicy,
    pub rows: Vec<CapTableRow>,
    pub summary: ScenarioSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub input: ScenarioInput,
    pub dilution: PolicyRun,
    pub pro_rata: PolicyRun,
    pub comparison: ScenarioComparison,
}
