use crate::utils::error::{CapTableError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(CapTableError::validation(
            field_name,
            path,
            "Path cannot be empty",
        ));
    }

    if path.contains('\0') {
        return Err(CapTableError::validation(
            field_name,
            path,
            "Path contains null bytes",
        ));
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(CapTableError::validation(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(CapTableError::validation(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// 金額必須是有限且非負的數值
pub fn validate_amount(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(CapTableError::validation(
            field_name,
            value,
            "Amount must be a finite number",
        ));
    }
    if value < 0.0 {
        return Err(CapTableError::validation(
            field_name,
            value,
            "Amount cannot be negative",
        ));
    }
    Ok(())
}

pub fn validate_formats(field_name: &str, formats: &[String], allowed: &[&str]) -> Result<()> {
    for format in formats {
        if !allowed.contains(&format.as_str()) {
            return Err(CapTableError::validation(
                field_name,
                format,
                format!("Unsupported format. Valid formats: {}", allowed.join(", ")),
            ));
        }
    }
    Ok(())
}
