use crate::core::valuation::{ownership_percentage, round_to};
use crate::domain::model::{
    AllocationPolicy, AllocationSnapshot, CapTableRow, ClassPosition, InvestorRetention,
    OwnershipClass, ScenarioSummary,
};

pub const FORMATION_LABEL: &str = "Formation";
pub const PRICE_DISPLAY_DECIMALS: u32 = 4;
pub const SHARE_DISPLAY_DECIMALS: u32 = 0;

/// Turns allocation snapshots into table rows. Only the `display_*` fields are rounded.
pub fn build_rows(snapshots: &[AllocationSnapshot]) -> Vec<CapTableRow> {
    snapshots.iter().map(build_row).collect()
}

fn build_row(snapshot: &AllocationSnapshot) -> CapTableRow {
    let total_shares = snapshot.state.total_shares_outstanding;
    let positions = snapshot
        .state
        .holdings
        .iter()
        .map(|(class, shares)| ClassPosition {
            class: *class,
            shares: *shares,
            ownership_pct: ownership_percentage(*shares, total_shares),
        })
        .collect();

    let (label, pre_money, investment) = match &snapshot.round {
        Some(round) => (
            round.class().label(),
            round.pre_money_valuation,
            round.investment_amount,
        ),
        None => (FORMATION_LABEL.to_string(), 0.0, 0.0),
    };

    let pricing = snapshot.pricing;
    CapTableRow {
        label,
        pre_money,
        investment,
        post_money: pricing.post_money,
        pre_round_shares: pricing.pre_round_shares,
        price_per_share: pricing.price_per_share,
        new_shares: pricing.new_shares,
        display_price_per_share: round_to(pricing.price_per_share, PRICE_DISPLAY_DECIMALS),
        display_new_shares: round_to(pricing.new_shares, SHARE_DISPLAY_DECIMALS),
        total_shares,
        positions,
    }
}

/// Headline figures for the last row of a table.
pub fn summarize(policy: AllocationPolicy, rows: &[CapTableRow]) -> ScenarioSummary {
    let Some(last) = rows.last() else {
        return ScenarioSummary {
            policy,
            final_post_money: 0.0,
            total_shares: 0.0,
            founder_pct: 0.0,
            founder_dilution: 0.0,
            investors: Vec::new(),
        };
    };

    let founder_pct = last.ownership_pct(OwnershipClass::Founder);
    let investors = last
        .positions
        .iter()
        .filter_map(|position| match position.class {
            OwnershipClass::Investor(index) => Some(InvestorRetention {
                class: position.class,
                // 行 0 是 Formation，所以第 n 輪就在第 n 行
                entry_pct: rows
                    .get(index)
                    .map(|row| row.ownership_pct(position.class))
                    .unwrap_or(0.0),
                final_pct: position.ownership_pct,
            }),
            OwnershipClass::Founder => None,
        })
        .collect();

    ScenarioSummary {
        policy,
        final_post_money: last.post_money,
        total_shares: last.total_shares,
        founder_pct,
        founder_dilution: 100.0 - founder_pct,
        investors,
    }
}
