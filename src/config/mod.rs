#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::FundingRound;
use serde::{Deserialize, Deserializer, Serialize};

pub const SUPPORTED_FORMATS: [&str; 2] = ["csv", "json"];

/// A round as written by the user, before sequence indices are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundInput {
    #[serde(deserialize_with = "deserialize_amount")]
    pub pre_money: f64,
    #[serde(deserialize_with = "deserialize_amount")]
    pub investment: f64,
}

pub fn to_funding_rounds(inputs: &[RoundInput]) -> Vec<FundingRound> {
    inputs
        .iter()
        .enumerate()
        .map(|(i, input)| FundingRound::new(i + 1, input.pre_money, input.investment))
        .collect()
}

/// 解析金額，支援 `k` / `M` / `B` 後綴，例如 `1.41M`、`$250,000`
pub fn parse_amount(raw: &str) -> Result<f64, String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '_' | ','))
        .collect();

    if cleaned.is_empty() {
        return Err(format!("'{}' is not an amount", raw));
    }

    let (number, multiplier) = match cleaned.chars().last() {
        Some('k') | Some('K') => (&cleaned[..cleaned.len() - 1], 1e3),
        Some('m') | Some('M') => (&cleaned[..cleaned.len() - 1], 1e6),
        Some('b') | Some('B') => (&cleaned[..cleaned.len() - 1], 1e9),
        _ => (cleaned.as_str(), 1.0),
    };

    number
        .parse::<f64>()
        .map(|value| value * multiplier)
        .map_err(|_| format!("'{}' is not an amount", raw))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountField {
    Number(f64),
    Text(String),
}

fn deserialize_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match AmountField::deserialize(deserializer)? {
        AmountField::Number(value) => Ok(value),
        AmountField::Text(text) => parse_amount(&text).map_err(serde::de::Error::custom),
    }
}
