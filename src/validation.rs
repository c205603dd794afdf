//! Request validation utilities.

/// Validate that a string is not empty.
pub fn validate_non_empty(s: &str, field: &str) -> crate::types::Result<()> {
    if s.is_empty() {
        return Err(crate::types::Error::validation(format!(
            "{} is required",
            field
        )));
    }
    Ok(())
}

/// Validate that a string consists only of ASCII digits.
pub fn validate_numeric(s: &str, field: &str) -> crate::types::Result<()> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        let example = match field {
            "advisory_id" => "Numeric advisory ID",
            _ => field,
        };
        return Err(crate::types::Error::validation(format!(
            "{} required (e.g., 12345), got: {}",
            example, s
        )));
    }
    Ok(())
}
