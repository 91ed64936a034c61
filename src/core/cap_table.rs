use crate::core::allocator::{allocate, allocator_for, EngineOptions};
use crate::core::builder::{build_rows, summarize};
use crate::core::validator::{validate_founder_shares, validate_rounds};
use crate::domain::model::{AllocationPolicy, CapTableRow, FundingRound, PolicyRun};
use crate::utils::error::Result;

/// Cap table for `rounds` under `policy`: a Formation row followed by one row per round.
pub fn generate_cap_table(
    founder_initial_shares: u64,
    rounds: &[FundingRound],
    policy: AllocationPolicy,
) -> Result<Vec<CapTableRow>> {
    generate_cap_table_with(
        founder_initial_shares,
        rounds,
        policy,
        EngineOptions::default(),
    )
}

pub fn generate_cap_table_with(
    founder_initial_shares: u64,
    rounds: &[FundingRound],
    policy: AllocationPolicy,
    options: EngineOptions,
) -> Result<Vec<CapTableRow>> {
    validate_founder_shares(founder_initial_shares)?;
    let rounds = validate_rounds(rounds)?;

    let snapshots = allocate(
        founder_initial_shares,
        rounds,
        allocator_for(policy),
        options,
    )?;
    Ok(build_rows(&snapshots))
}

/// Rows plus headline summary for one policy.
pub fn run_policy(
    founder_initial_shares: u64,
    rounds: &[FundingRound],
    policy: AllocationPolicy,
    options: EngineOptions,
) -> Result<PolicyRun> {
    let rows = generate_cap_table_with(founder_initial_shares, rounds, policy, options)?;
    let summary = summarize(policy, &rows);
    Ok(PolicyRun {
        policy,
        rows,
        summary,
    })
}
