//! Stateless valuation formulas shared by every allocation policy.
//!
//! Degenerate divisions resolve to zero instead of failing so that a run always
//! produces a complete table; strict callers check for that upstream.

pub fn post_money(pre_money: f64, investment: f64) -> f64 {
    pre_money + investment
}

/// Pre-money valuation divided by the shares outstanding before the round.
/// Returns 0 when there are no pre-round shares.
pub fn price_per_share(pre_money: f64, pre_round_shares: f64) -> f64 {
    if pre_round_shares == 0.0 {
        return 0.0;
    }
    pre_money / pre_round_shares
}

/// Shares bought by `investment` at `price_per_share`. Returns 0 when the price is 0.
pub fn new_shares_issued(investment: f64, price_per_share: f64) -> f64 {
    if price_per_share == 0.0 {
        return 0.0;
    }
    investment / price_per_share
}

pub fn ownership_percentage(class_shares: f64, total_shares: f64) -> f64 {
    if total_shares == 0.0 {
        return 0.0;
    }
    100.0 * class_shares / total_shares
}

/// Rounds a display field to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
