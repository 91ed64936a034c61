//! Sequential share allocation.
//!
//! A run is a fold over the round sequence: each transition reads the previous
//! [`AllocationState`] and produces a fresh one, never mutating its input. The two
//! policies differ only in how a round's new shares are distributed.

use crate::core::valuation;
use crate::domain::model::{
    AllocationPolicy, AllocationSnapshot, AllocationState, FundingRound, OwnershipClass,
    RoundPricing,
};
use crate::utils::error::{CapTableError, Result};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Fail on rounds that cannot be priced instead of issuing zero shares.
    pub strict: bool,
}

pub trait Allocator: Send + Sync {
    fn policy(&self) -> AllocationPolicy;

    /// Post-round holdings, given the pre-round state and the shares issued this round.
    fn distribute(
        &self,
        state: &AllocationState,
        new_class: OwnershipClass,
        new_shares: f64,
    ) -> BTreeMap<OwnershipClass, f64>;

    fn transition(
        &self,
        state: &AllocationState,
        round: &FundingRound,
        options: EngineOptions,
    ) -> Result<AllocationSnapshot> {
        let pre_round_shares = state.total_shares_outstanding;
        let post_money = valuation::post_money(round.pre_money_valuation, round.investment_amount);
        let price_per_share = valuation::price_per_share(round.pre_money_valuation, pre_round_shares);

        if price_per_share == 0.0 && round.investment_amount > 0.0 {
            let reason = if pre_round_shares == 0.0 {
                "no shares outstanding before the round"
            } else {
                "pre-money valuation is zero"
            };
            if options.strict {
                return Err(CapTableError::DegenerateRoundError {
                    round: round.sequence_index,
                    reason: reason.to_string(),
                });
            }
            tracing::warn!(
                "⚠️ Round {} priced at zero ({}); issuing no shares",
                round.sequence_index,
                reason
            );
        }

        let new_shares = valuation::new_shares_issued(round.investment_amount, price_per_share);
        let total_shares_outstanding = pre_round_shares + new_shares;

        // 輸入各自有限，但組合後仍可能溢位
        for (quantity, value) in [
            ("post-money valuation", post_money),
            ("new shares", new_shares),
            ("total shares", total_shares_outstanding),
        ] {
            if !value.is_finite() {
                return Err(CapTableError::validation(
                    format!("rounds[{}]", round.sequence_index.saturating_sub(1)),
                    value,
                    format!("Round {} overflows its {}", round.sequence_index, quantity),
                ));
            }
        }

        let holdings = self.distribute(state, round.class(), new_shares);

        tracing::debug!(
            "{} round {}: price {:.6}, {:.2} new shares for {}",
            self.policy(),
            round.sequence_index,
            price_per_share,
            new_shares,
            round.class()
        );

        Ok(AllocationSnapshot {
            round: Some(*round),
            pricing: RoundPricing {
                pre_round_shares,
                post_money,
                price_per_share,
                new_shares,
            },
            state: AllocationState {
                total_shares_outstanding,
                holdings,
            },
        })
    }
}

/// Every new share goes to the round's own class.
#[derive(Debug, Clone, Copy, Default)]
pub struct DilutionAllocator;

impl Allocator for DilutionAllocator {
    fn policy(&self) -> AllocationPolicy {
        AllocationPolicy::Dilution
    }

    fn distribute(
        &self,
        state: &AllocationState,
        new_class: OwnershipClass,
        new_shares: f64,
    ) -> BTreeMap<OwnershipClass, f64> {
        let mut holdings = state.holdings.clone();
        holdings.insert(new_class, new_shares);
        holdings
    }
}

/// Earlier investor classes take their pre-round fraction of the new shares; the
/// round's own class receives the remainder. The founder does not participate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProRataAllocator;

impl Allocator for ProRataAllocator {
    fn policy(&self) -> AllocationPolicy {
        AllocationPolicy::ProRata
    }

    fn distribute(
        &self,
        state: &AllocationState,
        new_class: OwnershipClass,
        new_shares: f64,
    ) -> BTreeMap<OwnershipClass, f64> {
        let existing: Vec<(OwnershipClass, f64)> =
            state.holdings.iter().map(|(c, s)| (*c, *s)).collect();
        let allocations = pro_rata_allocations(
            &existing,
            new_class,
            state.total_shares_outstanding,
            new_shares,
        );
        let allocated: f64 = allocations.iter().map(|(_, shares)| shares).sum();
        let remainder = new_shares - allocated;

        debug_assert!(
            (allocated + remainder - new_shares).abs() <= f64::EPSILON * new_shares.max(1.0)
        );

        let mut holdings = state.holdings.clone();
        for (class, shares) in allocations {
            *holdings.entry(class).or_insert(0.0) += shares;
        }
        holdings.insert(new_class, remainder);
        holdings
    }
}

/// Pro-rata take-up for each participating class.
///
/// Every fraction is taken against the same pre-round total and pre-round holding, so
/// the result per class does not depend on the order of `existing`.
pub fn pro_rata_allocations(
    existing: &[(OwnershipClass, f64)],
    new_class: OwnershipClass,
    pre_round_total: f64,
    new_shares: f64,
) -> Vec<(OwnershipClass, f64)> {
    if pre_round_total == 0.0 {
        return Vec::new();
    }

    existing
        .iter()
        .filter(|(class, shares)| class.is_investor() && *class != new_class && *shares > 0.0)
        .map(|(class, shares)| (*class, shares / pre_round_total * new_shares))
        .collect()
}

static DILUTION: DilutionAllocator = DilutionAllocator;
static PRO_RATA: ProRataAllocator = ProRataAllocator;

pub fn allocator_for(policy: AllocationPolicy) -> &'static dyn Allocator {
    match policy {
        AllocationPolicy::Dilution => &DILUTION,
        AllocationPolicy::ProRata => &PRO_RATA,
    }
}

/// Snapshot for the synthetic Formation row: the founder's shares are the only issuance.
pub fn formation_snapshot(founder_shares: u64) -> AllocationSnapshot {
    let state = AllocationState::formation(founder_shares);
    AllocationSnapshot {
        round: None,
        pricing: RoundPricing {
            pre_round_shares: 0.0,
            post_money: 0.0,
            price_per_share: 0.0,
            new_shares: state.total_shares_outstanding,
        },
        state,
    }
}

/// Folds `rounds` into one snapshot per round, preceded by Formation.
pub fn allocate(
    founder_shares: u64,
    rounds: &[FundingRound],
    allocator: &dyn Allocator,
    options: EngineOptions,
) -> Result<Vec<AllocationSnapshot>> {
    let formation = formation_snapshot(founder_shares);
    let mut state = formation.state.clone();
    let mut snapshots = Vec::with_capacity(rounds.len() + 1);
    snapshots.push(formation);

    for round in rounds {
        let snapshot = allocator.transition(&state, round, options)?;
        state = snapshot.state.clone();
        snapshots.push(snapshot);
    }

    Ok(snapshots)
}
