// Field rules shared by the team and project aggregates

use chrono::{DateTime, NaiveDate, Utc};

use super::error::DomainError;

/// Trims `value` and checks it is present and at most `max` characters
pub fn required_text(value: &str, field: &str, max: usize) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(format!("Please add a {}", field)));
    }
    max_length(value, field, max)?;
    Ok(value.to_string())
}

/// Checks `value` is at most `max` characters
pub fn max_length(value: &str, field: &str, max: usize) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{} cannot be more than {} characters",
            capitalize(field),
            max
        )));
    }
    Ok(())
}

/// Parses a client-supplied date
///
/// Accepts a bare calendar date (`2025-01-01`, read as midnight UTC) or a
/// full RFC 3339 timestamp.
///
/// # Example
/// ```
/// use teamboard_api::domain::validation::parse_date;
///
/// let date = parse_date("2025-01-01", "start date").unwrap();
/// assert_eq!(date.to_rfc3339(), "2025-01-01T00:00:00+00:00");
/// ```
pub fn parse_date(value: &str, field: &str) -> Result<DateTime<Utc>, DomainError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DomainError::validation(format!("Invalid {}: {}", field, value)))
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
