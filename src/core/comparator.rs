use crate::domain::model::{CapTableRow, ComparisonRow, OwnershipClass, ScenarioComparison};
use crate::utils::error::{CapTableError, Result};

/// Per-round, per-class ownership deltas (`pro-rata - dilution`) between two tables
/// built from the same inputs.
pub fn compare_scenarios(
    dilution_rows: &[CapTableRow],
    pro_rata_rows: &[CapTableRow],
) -> Result<ScenarioComparison> {
    if dilution_rows.len() != pro_rata_rows.len() {
        return Err(CapTableError::mismatched(format!(
            "dilution table has {} rows, pro-rata table has {}",
            dilution_rows.len(),
            pro_rata_rows.len()
        )));
    }

    let mut rows = Vec::new();
    for (index, (dilution, pro_rata)) in dilution_rows.iter().zip(pro_rata_rows).enumerate() {
        ensure_same_round(index, dilution, pro_rata)?;

        for position in &dilution.positions {
            let counterpart = pro_rata.position(position.class).ok_or_else(|| {
                CapTableError::mismatched(format!(
                    "class {} missing from pro-rata row {}",
                    position.class, index
                ))
            })?;
            rows.push(ComparisonRow {
                round: dilution.label.clone(),
                class: position.class,
                dilution_pct: position.ownership_pct,
                pro_rata_pct: counterpart.ownership_pct,
                delta: counterpart.ownership_pct - position.ownership_pct,
            });
        }
    }

    let founder_dilution_saved = match (dilution_rows.last(), pro_rata_rows.last()) {
        (Some(dilution), Some(pro_rata)) => {
            (dilution.ownership_pct(OwnershipClass::Founder)
                - pro_rata.ownership_pct(OwnershipClass::Founder))
                * -1.0
        }
        _ => 0.0,
    };

    Ok(ScenarioComparison {
        rows,
        founder_dilution_saved,
    })
}

fn ensure_same_round(index: usize, dilution: &CapTableRow, pro_rata: &CapTableRow) -> Result<()> {
    let same_inputs = dilution.label == pro_rata.label
        && dilution.pre_money == pro_rata.pre_money
        && dilution.investment == pro_rata.investment
        && dilution.positions.len() == pro_rata.positions.len();

    if !same_inputs {
        return Err(CapTableError::mismatched(format!(
            "row {} differs: '{}' vs '{}'",
            index, dilution.label, pro_rata.label
        )));
    }
    Ok(())
}
