use crate::domain::model::{
    AllocationPolicy, CapTableRow, OwnershipClass, PolicyRun, ScenarioComparison,
    ScenarioSummary,
};
use crate::utils::error::{CapTableError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

const FIXED_COLUMNS: [&str; 8] = [
    "round",
    "pre_money",
    "investment",
    "post_money",
    "pre_round_shares",
    "price_per_share",
    "new_shares",
    "total_shares",
];

#[derive(Serialize)]
struct PolicyDocument<'a> {
    scenario: &'a str,
    policy: AllocationPolicy,
    generated_at: DateTime<Utc>,
    rows: &'a [CapTableRow],
    summary: &'a ScenarioSummary,
}

#[derive(Serialize)]
struct ComparisonDocument<'a> {
    scenario: &'a str,
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    comparison: &'a ScenarioComparison,
}

/// File name stem derived from the scenario name, e.g. `Seed to A` -> `seed-to-a`.
pub fn file_stem(scenario: &str) -> String {
    let stem: String = scenario
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let stem = stem
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if stem.is_empty() {
        "scenario".to_string()
    } else {
        stem
    }
}

/// One line per row; every class in the final row gets a shares and a percentage column.
pub fn render_rows_csv(rows: &[CapTableRow]) -> Result<Vec<u8>> {
    let classes: Vec<OwnershipClass> = rows
        .last()
        .map(|row| row.positions.iter().map(|p| p.class).collect())
        .unwrap_or_default();

    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
    for class in &classes {
        header.push(format!("{} shares", class));
        header.push(format!("{} %", class));
    }
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![
            row.label.clone(),
            row.pre_money.to_string(),
            row.investment.to_string(),
            row.post_money.to_string(),
            row.pre_round_shares.to_string(),
            row.display_price_per_share.to_string(),
            row.display_new_shares.to_string(),
            row.total_shares.to_string(),
        ];
        for class in &classes {
            record.push(row.shares_of(*class).to_string());
            record.push(format!("{:.4}", row.ownership_pct(*class)));
        }
        writer.write_record(&record)?;
    }

    finish_csv(writer)
}

pub fn render_comparison_csv(comparison: &ScenarioComparison) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in &comparison.rows {
        writer.serialize(row)?;
    }
    finish_csv(writer)
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| CapTableError::IoError(e.into_error()))
}

pub fn render_policy_json(scenario: &str, run: &PolicyRun) -> Result<Vec<u8>> {
    let document = PolicyDocument {
        scenario,
        policy: run.policy,
        generated_at: Utc::now(),
        rows: &run.rows,
        summary: &run.summary,
    };
    Ok(serde_json::to_vec_pretty(&document)?)
}

pub fn render_comparison_json(scenario: &str, comparison: &ScenarioComparison) -> Result<Vec<u8>> {
    let document = ComparisonDocument {
        scenario,
        generated_at: Utc::now(),
        comparison,
    };
    Ok(serde_json::to_vec_pretty(&document)?)
}

/// Fixed-width table for terminal output.
pub fn render_text_table(run: &PolicyRun) -> String {
    let classes: Vec<OwnershipClass> = run
        .rows
        .last()
        .map(|row| row.positions.iter().map(|p| p.class).collect())
        .unwrap_or_default();

    let mut out = format!("{} cap table\n", run.policy);
    out.push_str(&format!(
        "{:<12}{:>16}{:>16}{:>16}{:>12}{:>16}",
        "Round", "Pre-Money", "Investment", "Post-Money", "Price", "Total Shares"
    ));
    for class in &classes {
        out.push_str(&format!("{:>12}", format!("{} %", class)));
    }
    out.push('\n');

    for row in &run.rows {
        out.push_str(&format!(
            "{:<12}{:>16.0}{:>16.0}{:>16.0}{:>12.4}{:>16.0}",
            row.label,
            row.pre_money,
            row.investment,
            row.post_money,
            row.display_price_per_share,
            row.total_shares
        ));
        for class in &classes {
            out.push_str(&format!("{:>12.2}", row.ownership_pct(*class)));
        }
        out.push('\n');
    }

    let summary = &run.summary;
    out.push_str(&format!(
        "Final valuation {:.0} | Founder {:.2}% | Founder dilution {:.2}%\n",
        summary.final_post_money, summary.founder_pct, summary.founder_dilution
    ));
    out
}
