use super::ApiError;

/// Trims and requires a non-empty value.
pub fn required_text(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation(format!("{field} is required")))
}

pub fn required_id(value: Option<i32>, field: &str) -> Result<i32, ApiError> {
    match value {
        Some(id) if id > 0 => Ok(id),
        Some(id) => Err(ApiError::validation(format!(
            "Invalid {field}: {id}. ID must be a positive integer"
        ))),
        None => Err(ApiError::validation(format!("{field} is required"))),
    }
}

/// Trims; blank becomes `None`.
#[must_use]
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn validate_student_name(name: &str) -> Result<&str, ApiError> {
    const MIN_LEN: usize = 2;

    let trimmed = name.trim();
    if trimmed.chars().count() < MIN_LEN {
        return Err(ApiError::validation(format!(
            "Student name must be at least {MIN_LEN} characters"
        )));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_missing() {
        assert!(required_text(Some("   ".to_string()), "diagnosis").is_err());
        assert!(required_text(None, "diagnosis").is_err());
        assert_eq!(
            required_text(Some(" Fever ".to_string()), "diagnosis").unwrap(),
            "Fever"
        );
    }

    #[test]
    fn ids_must_be_positive() {
        assert!(required_id(Some(0), "studentId").is_err());
        assert!(required_id(None, "studentId").is_err());
        assert_eq!(required_id(Some(4), "studentId").unwrap(), 4);
    }

    #[test]
    fn short_names_are_rejected() {
        assert!(validate_student_name(" A ").is_err());
        assert_eq!(validate_student_name(" Ali ").unwrap(), "Ali");
        assert_eq!(validate_student_name("عل").unwrap(), "عل");
    }
}
