use crate::domain::model::FundingRound;
use crate::utils::error::{CapTableError, Result};
use crate::utils::validation::{validate_amount, validate_positive_number, validate_range};

pub const MIN_ROUNDS: usize = 1;
pub const MAX_ROUNDS: usize = 25;

/// Checks a round sequence before any computation and hands it back untouched.
pub fn validate_rounds(rounds: &[FundingRound]) -> Result<&[FundingRound]> {
    validate_range("rounds", rounds.len(), MIN_ROUNDS, MAX_ROUNDS)?;

    for (position, round) in rounds.iter().enumerate() {
        let expected = position + 1;
        if round.sequence_index != expected {
            return Err(CapTableError::validation(
                format!("rounds[{}].sequence_index", position),
                round.sequence_index,
                format!("Expected sequence index {}", expected),
            ));
        }
        validate_amount(
            &format!("rounds[{}].pre_money", position),
            round.pre_money_valuation,
        )?;
        validate_amount(
            &format!("rounds[{}].investment", position),
            round.investment_amount,
        )?;
    }

    Ok(rounds)
}

pub fn validate_founder_shares(founder_shares: u64) -> Result<()> {
    validate_positive_number("founder_shares", founder_shares, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::rounds_from_pairs;

    fn uniform_rounds(count: usize) -> Vec<FundingRound> {
        rounds_from_pairs(&vec![(1_000_000.0, 250_000.0); count])
    }

    #[test]
    fn test_round_count_boundaries() {
        assert!(validate_rounds(&uniform_rounds(1)).is_ok());
        assert!(validate_rounds(&uniform_rounds(25)).is_ok());
        assert!(validate_rounds(&uniform_rounds(0)).is_err());
        assert!(validate_rounds(&uniform_rounds(26)).is_err());
    }

    #[test]
    fn test_returns_sequence_unchanged() {
        let rounds = uniform_rounds(3);
        let validated = validate_rounds(&rounds).unwrap();
        assert_eq!(validated, rounds.as_slice());
    }

    #[test]
    fn test_negative_amounts_rejected() {
        let rounds = rounds_from_pairs(&[(1_000_000.0, 100.0), (-1.0, 100.0)]);
        let err = validate_rounds(&rounds).unwrap_err();
        assert!(matches!(
            err,
            CapTableError::ValidationError { ref field, .. } if field == "rounds[1].pre_money"
        ));

        let rounds = rounds_from_pairs(&[(1_000_000.0, -5.0)]);
        assert!(validate_rounds(&rounds).is_err());
    }

    #[test]
    fn test_zero_amounts_accepted() {
        let rounds = rounds_from_pairs(&[(0.0, 0.0)]);
        assert!(validate_rounds(&rounds).is_ok());
    }

    #[test]
    fn test_out_of_order_sequence_rejected() {
        let rounds = vec![
            FundingRound::new(2, 1_000_000.0, 100.0),
            FundingRound::new(1, 1_000_000.0, 100.0),
        ];
        assert!(validate_rounds(&rounds).is_err());
    }

    #[test]
    fn test_founder_shares_must_be_positive() {
        assert!(validate_founder_shares(1).is_ok());
        assert!(validate_founder_shares(0).is_err());
    }
}
