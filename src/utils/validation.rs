use crate::utils::error::{BookingError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if is_blank(value) {
        return Err(BookingError::validation(
            field_name,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| BookingError::validation(field_name, "Value is required"))
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(BookingError::ConfigError {
            field: field_name.to_string(),
            message: format!("{} must be between {} and {}", value, min, max),
        });
    }
    Ok(())
}

pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;
    let trimmed = value.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(BookingError::validation(
            field_name,
            format!("'{}' is not an email address", trimmed),
        )),
    }
}

/// 只保留數字
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}
